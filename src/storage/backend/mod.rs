//! SeaORM storage backend
//!
//! Persists tracking logs through SeaORM. SQLite is the default;
//! MySQL/MariaDB and PostgreSQL are selected by URL or explicit config.

mod connection;
mod mutations;
mod query;
mod visit_sink;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::analytics::VisitSink;
use crate::errors::{Result, TrackpixelError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
///
/// 裸文件路径（.db / .sqlite / :memory:）按 SQLite 处理，
/// 这样默认配置不写 scheme 也能工作。
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    let backend = if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        "sqlite"
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        "mysql"
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        "postgres"
    } else {
        return Err(TrackpixelError::database_config(format!(
            "无法识别的数据库 URL: {}. 支持 sqlite:// / mysql:// / mariadb:// / postgres://",
            database_url
        )));
    };

    Ok(backend.to_string())
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based storage backend
#[derive(Clone, Debug)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(TrackpixelError::database_config(
                "database_url 未配置".to_string(),
            ));
        }

        // SQLite 有独立的连接路径（pragma 调优），其余走通用 ConnectOptions
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        // 建表迁移在连接建立后立即执行，storage 可用即 schema 就绪
        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 当前后端名称（sqlite / mysql / postgres）
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 以 VisitSink 形式暴露（处理器只依赖窄接口）
    pub fn as_visit_sink(&self) -> Arc<dyn VisitSink> {
        Arc::new(self.clone()) as Arc<dyn VisitSink>
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
