use std::fmt;

#[derive(Debug, Clone)]
pub enum TrackpixelError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    GeoIpInit(String),
    Serialization(String),
    DateParse(String),
}

impl TrackpixelError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TrackpixelError::DatabaseConfig(_) => "E001",
            TrackpixelError::DatabaseConnection(_) => "E002",
            TrackpixelError::DatabaseOperation(_) => "E003",
            TrackpixelError::FileOperation(_) => "E004",
            TrackpixelError::GeoIpInit(_) => "E005",
            TrackpixelError::Serialization(_) => "E006",
            TrackpixelError::DateParse(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TrackpixelError::DatabaseConfig(_) => "Database Configuration Error",
            TrackpixelError::DatabaseConnection(_) => "Database Connection Error",
            TrackpixelError::DatabaseOperation(_) => "Database Operation Error",
            TrackpixelError::FileOperation(_) => "File Operation Error",
            TrackpixelError::GeoIpInit(_) => "GeoIP Initialization Error",
            TrackpixelError::Serialization(_) => "Serialization Error",
            TrackpixelError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TrackpixelError::DatabaseConfig(msg) => msg,
            TrackpixelError::DatabaseConnection(msg) => msg,
            TrackpixelError::DatabaseOperation(msg) => msg,
            TrackpixelError::FileOperation(msg) => msg,
            TrackpixelError::GeoIpInit(msg) => msg,
            TrackpixelError::Serialization(msg) => msg,
            TrackpixelError::DateParse(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于终端日志）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TrackpixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TrackpixelError {}

// 便捷的构造函数
impl TrackpixelError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TrackpixelError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        TrackpixelError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        TrackpixelError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TrackpixelError::FileOperation(msg.into())
    }

    pub fn geoip_init<T: Into<String>>(msg: T) -> Self {
        TrackpixelError::GeoIpInit(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TrackpixelError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        TrackpixelError::DateParse(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TrackpixelError {
    fn from(err: sea_orm::DbErr) -> Self {
        TrackpixelError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TrackpixelError {
    fn from(err: std::io::Error) -> Self {
        TrackpixelError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TrackpixelError {
    fn from(err: serde_json::Error) -> Self {
        TrackpixelError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TrackpixelError {
    fn from(err: chrono::ParseError) -> Self {
        TrackpixelError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackpixelError>;
