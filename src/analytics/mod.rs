//! 访问记录数据模型
//!
//! 定义单次像素请求产生的访问详情，以及落库用的 Sink 抽象。

pub mod sink;

pub use sink::VisitSink;

use chrono::{DateTime, Utc};

use crate::services::{GeoInfo, UserAgentInfo};

/// 地理位置解析失败时的兜底值
pub const GEO_UNKNOWN: &str = "Unknown";

/// 详细访问信息
///
/// 所有字段在创建时确定，之后不再修改。
#[derive(Debug, Clone)]
pub struct VisitDetail {
    /// 客户端 IP 地址
    pub ip_address: String,
    /// 调用方标注的页面标识
    pub current_page: String,
    /// 原始 User-Agent
    pub user_agent: String,
    /// 入库时间戳 (UTC)
    pub timestamp: DateTime<Utc>,
    /// 浏览器（family + version）
    pub browser: String,
    /// 操作系统（family + version）
    pub os: String,
    /// 设备类型："Mobile" / "Tablet" / "PC"
    pub device: String,
    /// 国家全名，解析失败时为 "Unknown"
    pub country: String,
    /// 城市名称，解析失败时为 "Unknown"
    pub city: String,
}

impl VisitDetail {
    /// 创建新的访问详情，入库时间取当前 UTC
    pub fn new(
        ip_address: String,
        current_page: String,
        user_agent: String,
        ua_info: UserAgentInfo,
    ) -> Self {
        Self {
            ip_address,
            current_page,
            user_agent,
            timestamp: Utc::now(),
            browser: ua_info.browser,
            os: ua_info.os,
            device: ua_info.device.as_ref().to_string(),
            country: GEO_UNKNOWN.to_string(),
            city: GEO_UNKNOWN.to_string(),
        }
    }

    /// 应用地理位置解析结果
    ///
    /// 查询失败（None）或字段缺失时保持 "Unknown"，逐字段兜底。
    pub fn with_geo(mut self, geo: Option<GeoInfo>) -> Self {
        if let Some(geo) = geo {
            if let Some(country) = geo.country {
                self.country = country;
            }
            if let Some(city) = geo.city {
                self.city = city;
            }
        }
        self
    }
}
