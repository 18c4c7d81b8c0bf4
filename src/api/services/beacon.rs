//! 追踪像素服务
//!
//! GET /track.gif 记录一次访问并返回 1x1 透明 GIF。
//! 像素本身永远可用：UA 解析和 GeoIP 查询失败都只影响入库字段，
//! 仅当写入存储失败时才返回 500。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, error};

use crate::analytics::{VisitDetail, VisitSink};
use crate::api::constants::{TRANSPARENT_GIF, UNKNOWN_LABEL};
use crate::services::{GeoIpProvider, classify};
use crate::utils::ip::extract_client_ip;

/// /track.gif 查询参数
#[derive(Debug, Deserialize)]
pub struct BeaconQuery {
    /// 调用方标注的页面标识，缺省记为 "unknown"
    pub current_page: Option<String>,
}

pub struct BeaconService {}

impl BeaconService {
    /// 处理一次像素请求
    pub async fn track(
        req: HttpRequest,
        query: web::Query<BeaconQuery>,
        sink: web::Data<Arc<dyn VisitSink>>,
        geoip: web::Data<Arc<GeoIpProvider>>,
    ) -> HttpResponse {
        let current_page = query
            .into_inner()
            .current_page
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        let ip_address = extract_client_ip(&req).unwrap_or_else(|| UNKNOWN_LABEL.to_string());

        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();

        let ua_info = classify(&user_agent);

        // "unknown" 或私有地址会直接得到 None，字段落为 "Unknown"
        let geo = geoip.lookup(&ip_address).await;

        let detail = VisitDetail::new(ip_address, current_page, user_agent, ua_info).with_geo(geo);

        debug!(
            "Visit: page={}, device={}, country={}",
            detail.current_page, detail.device, detail.country
        );

        if let Err(e) = sink.record_visit(detail).await {
            error!("Failed to record visit: {}", e);
            return Self::error_response();
        }

        Self::gif_response()
    }

    /// 像素响应，禁止中间缓存复用
    #[inline]
    fn gif_response() -> HttpResponse {
        HttpResponse::Ok()
            .insert_header(("Content-Type", "image/gif"))
            .insert_header(("Cache-Control", "no-store, max-age=0"))
            .body(Bytes::from_static(TRANSPARENT_GIF))
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }
}

/// 注册像素路由
pub fn beacon_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/track.gif", web::get().to(BeaconService::track));
}
