use crate::services::GeoIpProvider;
use crate::storage::{SeaOrmStorage, StorageFactory};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub geoip: Arc<GeoIpProvider>,
}

/// 准备服务器启动的上下文
/// 包括存储和 GeoIP 解析器
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let config = crate::config::get_config();

    // reset_on_start 默认关闭，开启时启动即清空历史记录
    if config.database.reset_on_start {
        let removed = storage
            .clear_visits()
            .await
            .context("Failed to reset tracking logs")?;
        warn!("reset_on_start enabled: dropped {} historical rows", removed);
    }

    // GeoIP 解析器在启动时选定实现，handler 内按请求调用
    let geoip = Arc::new(GeoIpProvider::new(&config.analytics));

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, geoip })
}
