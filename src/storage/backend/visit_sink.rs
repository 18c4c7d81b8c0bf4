//! VisitSink implementation for SeaOrmStorage
//!
//! Writes one tracking_logs row per recorded visit.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait};
use tracing::debug;

use super::SeaOrmStorage;
use crate::analytics::{VisitDetail, VisitSink};

use migration::entities::tracking_log;

#[async_trait]
impl VisitSink for SeaOrmStorage {
    async fn record_visit(&self, detail: VisitDetail) -> anyhow::Result<()> {
        let model = tracking_log::ActiveModel {
            ip_address: Set(detail.ip_address),
            current_page: Set(detail.current_page),
            user_agent: Set(detail.user_agent),
            timestamp: Set(detail.timestamp),
            browser: Set(detail.browser),
            os: Set(detail.os),
            device: Set(detail.device),
            country: Set(detail.country),
            city: Set(detail.city),
            ..Default::default()
        };

        tracking_log::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to insert tracking log: {}", e))?;

        debug!(
            "Visit recorded to {} database",
            self.backend_name.to_uppercase()
        );

        Ok(())
    }
}
