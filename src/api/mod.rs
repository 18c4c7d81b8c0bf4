//! HTTP API 层
//!
//! 包含像素与监控页服务、请求中间件和 API 常量。

pub mod constants;
pub mod middleware;
pub mod services;
