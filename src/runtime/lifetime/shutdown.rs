//! 停机处理
//!
//! Ctrl+C 后在限定时间内收尾，超时就强制退出，
//! 避免停机流程自身把进程挂住。

use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 收尾任务的时间上限（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 等待停机信号，然后关闭数据库连接池
///
/// 返回即表示收尾完成；超时直接 exit(1)。
pub async fn listen_for_shutdown(db: &DatabaseConnection) {
    if let Err(e) = signal::ctrl_c().await {
        warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        );
    } else {
        info!("Shutdown signal received, closing database...");
    }

    let tasks = async {
        // 关闭连接池，SQLite 在此完成 WAL checkpoint
        if let Err(e) = db.clone().close().await {
            error!("Failed to close database connection: {}", e);
        }
    };

    if timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), tasks)
        .await
        .is_err()
    {
        error!(
            "Shutdown tasks timed out after {} seconds! Forcing exit.",
            SHUTDOWN_TIMEOUT_SECS
        );
        std::process::exit(1);
    }

    info!("All shutdown tasks completed successfully");
}
