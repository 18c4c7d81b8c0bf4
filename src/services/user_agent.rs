//! UserAgent classification for visit enrichment
//!
//! Wraps woothee to turn a raw UserAgent string into the
//! browser / os / device triple stored with every visit.

use once_cell::sync::Lazy;
use strum::AsRefStr;
use woothee::parser::Parser;

/// Shared woothee parser (stateless, reused across requests)
static PARSER: Lazy<Parser> = Lazy::new(Parser::new);

/// Device classification derived from the UserAgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    PC,
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mobile => write!(f, "Mobile"),
            Self::Tablet => write!(f, "Tablet"),
            Self::PC => write!(f, "PC"),
        }
    }
}

impl std::str::FromStr for DeviceClass {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mobile" => Ok(Self::Mobile),
            "tablet" => Ok(Self::Tablet),
            "pc" | "desktop" => Ok(Self::PC),
            _ => Err(format!(
                "Invalid device class: '{}'. Valid: Mobile, Tablet, PC",
                s
            )),
        }
    }
}

/// Parsed UserAgent information stored with a visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub browser: String,
    pub os: String,
    pub device: DeviceClass,
}

/// Classify a raw UserAgent string
///
/// Best-effort and total: unparseable input degrades to
/// "Unknown" / "Unknown" / PC instead of failing.
pub fn classify(ua: &str) -> UserAgentInfo {
    let result = PARSER.parse(ua).unwrap_or_default();

    let name = result.name.to_string();
    let version = result.version.to_string();
    let os = result.os.to_string();
    let os_version = result.os_version.to_string();
    let category = result.category.to_string();

    UserAgentInfo {
        browser: display_name(&name, &version),
        os: display_name(&os, &os_version),
        device: device_class(ua, &category),
    }
}

/// 拼接 family + version 为展示字符串
///
/// woothee 对无法识别的字段返回 "UNKNOWN"，统一映射为 "Unknown"
fn display_name(family: &str, version: &str) -> String {
    if family.is_empty() || family == "UNKNOWN" {
        return "Unknown".to_string();
    }
    if version.is_empty() || version == "UNKNOWN" {
        family.to_string()
    } else {
        format!("{} {}", family, version)
    }
}

/// 设备分类
///
/// woothee 的 category 对截断 UA 经常给 UNKNOWN，所以在
/// category 之外补充关键子串判断。平板必须先于手机判断：
/// iPad / Android 平板的 UA 同样可能带 "Mobile" 标记。
fn device_class(ua: &str, category: &str) -> DeviceClass {
    if ua.contains("iPad")
        || ua.contains("Tablet")
        || ua.contains("Kindle")
        || (ua.contains("Android") && !ua.contains("Mobile"))
    {
        return DeviceClass::Tablet;
    }

    if category == "smartphone"
        || category == "mobilephone"
        || ua.contains("iPhone")
        || ua.contains("Mobile")
    {
        return DeviceClass::Mobile;
    }

    DeviceClass::PC
}
