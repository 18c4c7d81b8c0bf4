//! API 模块常量定义
//!
//! 包含像素响应体等相关的硬编码常量。

/// 1x1 透明 GIF 的完整字节序列（43 字节）
///
/// 逐字节固定：GIF89a 头、1x1 画布、全局颜色表（黑/白）、
/// 声明索引 0 透明的图形控制扩展、图像描述符、LZW 像素数据和结尾符。
/// 任何改动都会破坏对外承诺的响应体。
pub const TRANSPARENT_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, // "GIF89a"
    0x01, 0x00, 0x01, 0x00, // 1x1 逻辑屏幕
    0x80, 0x00, 0x00, // 全局颜色表标志
    0x00, 0x00, 0x00, // 颜色 0: 黑
    0xFF, 0xFF, 0xFF, // 颜色 1: 白
    0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, // 图形控制扩展，索引 0 透明
    0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // 图像描述符
    0x02, 0x02, 0x44, 0x01, 0x00, // LZW 最小码长 + 像素数据
    0x3B, // 结尾符
];

/// 请求字段缺失时的占位值
pub const UNKNOWN_LABEL: &str = "unknown";
