//! HTTP 服务器模式
//!
//! 组装存储、GeoIP、路由和中间件并运行 actix-web 服务器，
//! 直到进程收到停机信号。

use std::time::Duration;

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{beacon_routes, monitoring_routes};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// 运行 HTTP 服务器
///
/// 日志系统必须在调用前初始化完成。
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();

    let storage = startup.storage.clone();
    let sink = storage.as_visit_sink();
    let geoip = startup.geoip.clone();

    let workers = config.server.cpu_count.min(32);
    warn!("Using {} worker threads", workers);

    log_attribution_mode(&config);

    // 停机流程需要独立的连接句柄，storage 随后移入工厂闭包
    let db_for_shutdown = storage.get_db().clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(sink.clone()))
            .app_data(web::Data::new(geoip.clone()))
            // 像素响应自带 no-store，这里只兜底其余路由
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Keep-Alive", "timeout=30, max=1000"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(beacon_routes)
            .configure(monitoring_routes)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(workers);

    #[cfg(unix)]
    let server = if let Some(ref socket_path) = config.server.unix_socket {
        warn!("Starting server on Unix socket: {}", socket_path);
        if std::path::Path::new(socket_path).exists() {
            std::fs::remove_file(socket_path)?;
        }
        server.bind_uds(socket_path)?
    } else {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        warn!("Starting server at http://{}", addr);
        server.bind(addr)?
    };

    #[cfg(not(unix))]
    let server = {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        warn!("Starting server at http://{}", addr);
        server.bind(addr)?
    };

    tokio::select! {
        res = server.run() => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}

/// 启动时记录访问归属策略
///
/// 来源 IP 判断出错是最难事后排查的问题，启动日志里必须能看出
/// 当前信任哪些转发头。
fn log_attribution_mode(config: &StaticConfig) {
    #[cfg(unix)]
    if let Some(ref socket_path) = config.server.unix_socket {
        warn!(
            "Unix Socket mode enabled: {}. \
             Visit attribution requires the reverse proxy to set X-Forwarded-For.",
            socket_path
        );
        return;
    }

    let trusted_proxies = &config.analytics.trusted_proxies;
    if trusted_proxies.is_empty() {
        warn!(
            "Visit attribution: auto-detect mode. Forwarded headers are trusted \
             only for connections from private addresses; configure \
             analytics.trusted_proxies to pin this down."
        );
    } else {
        warn!(
            "Visit attribution: explicit trusted proxies {:?}",
            trusted_proxies
        );
    }
}
