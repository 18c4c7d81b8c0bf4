//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

use super::SeaOrmStorage;
use crate::errors::{Result, TrackpixelError};

use migration::entities::tracking_log;

impl SeaOrmStorage {
    /// 按 id 倒序加载全部访问记录（最新的在前）
    pub async fn list_visits(&self) -> Result<Vec<tracking_log::Model>> {
        tracking_log::Entity::find()
            .order_by_desc(tracking_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TrackpixelError::database_operation(format!("加载访问记录失败: {}", e)))
    }

    /// 访问记录总数
    pub async fn count_visits(&self) -> Result<u64> {
        tracking_log::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| TrackpixelError::database_operation(format!("统计访问记录失败: {}", e)))
    }
}
