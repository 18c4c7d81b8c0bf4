//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use sea_orm::EntityTrait;
use tracing::info;

use super::SeaOrmStorage;
use crate::errors::{Result, TrackpixelError};

use migration::entities::tracking_log;

impl SeaOrmStorage {
    /// 清空全部访问记录，返回删除的行数
    ///
    /// 仅在配置 reset_on_start 时于启动阶段调用。
    pub async fn clear_visits(&self) -> Result<u64> {
        let result = tracking_log::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| {
                TrackpixelError::database_operation(format!("清空访问记录失败: {}", e))
            })?;

        info!("Cleared {} tracking log rows", result.rows_affected);
        Ok(result.rows_affected)
    }
}
