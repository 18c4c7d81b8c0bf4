//! Tracking log entity, one row per recorded visit

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tracking_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ip_address: String,
    #[sea_orm(column_type = "Text")]
    pub current_page: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub timestamp: DateTimeUtc,
    pub browser: String,
    pub os: String,
    /// One of "Mobile", "Tablet", "PC"
    pub device: String,
    pub country: String,
    pub city: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
