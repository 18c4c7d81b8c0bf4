//! 访问日志表迁移
//!
//! 创建 tracking_logs 表用于存储每次像素请求的完整访问记录，包括：
//! - IP 地址与页面标识
//! - 原始 User-Agent 及解析结果 (browser, os, device)
//! - 地理位置信息 (country, city)
//! - 入库时间戳

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 tracking_logs 表
        manager
            .create_table(
                Table::create()
                    .table(TrackingLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrackingLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrackingLogs::IpAddress)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrackingLogs::CurrentPage).text().not_null())
                    .col(ColumnDef::new(TrackingLogs::UserAgent).text().not_null())
                    .col(
                        ColumnDef::new(TrackingLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackingLogs::Browser)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrackingLogs::Os).string_len(255).not_null())
                    .col(
                        ColumnDef::new(TrackingLogs::Device)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackingLogs::Country)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackingLogs::City)
                            .string_len(100)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 timestamp 索引（用于时间范围查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tracking_logs_timestamp")
                    .table(TrackingLogs::Table)
                    .col(TrackingLogs::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除索引
        manager
            .drop_index(Index::drop().name("idx_tracking_logs_timestamp").to_owned())
            .await?;

        // 删除表
        manager
            .drop_table(Table::drop().table(TrackingLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TrackingLogs {
    #[sea_orm(iden = "tracking_logs")]
    Table,
    Id,
    IpAddress,
    CurrentPage,
    UserAgent,
    Timestamp,
    Browser,
    Os,
    Device,
    Country,
    City,
}
