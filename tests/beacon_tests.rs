//! Beacon service tests
//!
//! Tests for the core tracking pixel path: GET /track.gif must always
//! serve the 1x1 GIF and leave exactly one enriched visit row behind.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;

use trackpixel::analytics::{VisitDetail, VisitSink};
use trackpixel::api::constants::TRANSPARENT_GIF;
use trackpixel::api::services::beacon_routes;
use trackpixel::config::{StaticConfig, init_config_with};
use trackpixel::services::{GeoInfo, GeoIpLookup, GeoIpProvider};

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config_with(StaticConfig::default());
    });
}

/// In-memory sink that keeps every recorded visit for inspection
#[derive(Default)]
struct MemorySink {
    visits: Mutex<Vec<VisitDetail>>,
}

impl MemorySink {
    fn recorded(&self) -> Vec<VisitDetail> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisitSink for MemorySink {
    async fn record_visit(&self, detail: VisitDetail) -> anyhow::Result<()> {
        self.visits.lock().unwrap().push(detail);
        Ok(())
    }
}

/// Sink that always fails, simulating a broken database
struct FailingSink;

#[async_trait]
impl VisitSink for FailingSink {
    async fn record_visit(&self, _detail: VisitDetail) -> anyhow::Result<()> {
        anyhow::bail!("database unavailable")
    }
}

/// Deterministic lookup that always resolves to the same location
struct FixedGeo;

#[async_trait]
impl GeoIpLookup for FixedGeo {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        Some(GeoInfo {
            country: Some("Germany".to_string()),
            city: Some("Berlin".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Lookup that never resolves, simulating network failure
struct UnresolvedGeo;

#[async_trait]
impl GeoIpLookup for UnresolvedGeo {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "unresolved"
    }
}

fn fixed_geo() -> Arc<GeoIpProvider> {
    Arc::new(GeoIpProvider::with_lookup(Arc::new(FixedGeo)))
}

fn unresolved_geo() -> Arc<GeoIpProvider> {
    Arc::new(GeoIpProvider::with_lookup(Arc::new(UnresolvedGeo)))
}

fn public_peer() -> SocketAddr {
    "203.0.113.50:44000".parse().unwrap()
}

/// Create a test app with beacon routes
macro_rules! beacon_app {
    ($sink:expr, $geo:expr) => {{
        test::init_service(
            App::new()
                .app_data(web::Data::new($sink as Arc<dyn VisitSink>))
                .app_data(web::Data::new($geo))
                .configure(beacon_routes),
        )
        .await
    }};
}

// =============================================================================
// Pixel Response Tests
// =============================================================================

#[tokio::test]
async fn test_track_serves_exact_gif_bytes() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr(public_peer())
        .insert_header(("User-Agent", "Mozilla/5.0"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "image/gif"
    );
    let cache_control = resp
        .headers()
        .get("Cache-Control")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cache_control.contains("no-store"));

    let body = test::read_body(resp).await;
    assert_eq!(body.len(), 43);
    assert_eq!(&body[..], TRANSPARENT_GIF);
    // 字节序列是对外承诺的一部分，这里用字面量钉死，不依赖常量定义
    assert_eq!(
        &body[..],
        [
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
            0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C,
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00,
            0x3B,
        ]
    );
}

#[tokio::test]
async fn test_track_records_one_row_per_request() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    for page in ["a", "b", "c"] {
        let req = TestRequest::get()
            .uri(&format!("/track.gif?current_page={}", page))
            .peer_addr(public_peer())
            .insert_header(("User-Agent", "Mozilla/5.0"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let visits = sink.recorded();
    assert_eq!(visits.len(), 3);
    assert_eq!(visits[0].current_page, "a");
    assert_eq!(visits[1].current_page, "b");
    assert_eq!(visits[2].current_page, "c");
    // 时间戳随插入顺序单调不减
    assert!(visits[0].timestamp <= visits[1].timestamp);
    assert!(visits[1].timestamp <= visits[2].timestamp);
}

#[tokio::test]
async fn test_track_extra_query_params_ignored() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    let req = TestRequest::get()
        .uri("/track.gif?current_page=pricing&utm_source=mail&foo=bar")
        .peer_addr(public_peer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].current_page, "pricing");
}

// =============================================================================
// Default Value Tests
// =============================================================================

#[tokio::test]
async fn test_track_missing_user_agent_defaults_unknown() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr(public_peer())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].user_agent, "unknown");
    // "unknown" 无法解析，分类字段落到兜底值
    assert_eq!(visits[0].browser, "Unknown");
    assert_eq!(visits[0].os, "Unknown");
    assert_eq!(visits[0].device, "PC");
}

#[tokio::test]
async fn test_track_missing_current_page_defaults_unknown() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    let req = TestRequest::get()
        .uri("/track.gif")
        .peer_addr(public_peer())
        .insert_header(("User-Agent", "Mozilla/5.0"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits[0].current_page, "unknown");
}

#[tokio::test]
async fn test_track_missing_peer_addr_defaults_unknown() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    // TestRequest 不设置 peer_addr 时连接信息为空
    let req = TestRequest::get().uri("/track.gif").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits[0].ip_address, "unknown");
}

// =============================================================================
// Enrichment Tests
// =============================================================================

#[tokio::test]
async fn test_track_iphone_classified_mobile() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) \
              AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";
    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr(public_peer())
        .insert_header(("User-Agent", ua))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].device, "Mobile");
    assert!(visits[0].browser.starts_with("Safari"));
    assert!(visits[0].os.contains("iPhone"));
    assert_eq!(visits[0].user_agent, ua);
}

#[tokio::test]
async fn test_track_geo_success_records_location() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), fixed_geo());

    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr(public_peer())
        .insert_header(("User-Agent", "Mozilla/5.0"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits[0].country, "Germany");
    assert_eq!(visits[0].city, "Berlin");
}

#[tokio::test]
async fn test_track_geo_failure_still_serves_pixel() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr(public_peer())
        .insert_header(("User-Agent", "Mozilla/5.0"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits[0].country, "Unknown");
    assert_eq!(visits[0].city, "Unknown");
}

// =============================================================================
// Client IP Attribution Tests
// =============================================================================

#[tokio::test]
async fn test_track_private_peer_uses_forwarded_ip() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    // 私有 peer + X-Forwarded-For → 自动检测为反向代理
    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr("10.0.0.1:40000".parse().unwrap())
        .insert_header(("X-Forwarded-For", "198.51.100.7, 10.0.0.1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits[0].ip_address, "198.51.100.7");
}

#[tokio::test]
async fn test_track_public_peer_ignores_forwarded_header() {
    init_static_config();

    let sink = Arc::new(MemorySink::default());
    let app = beacon_app!(sink.clone(), unresolved_geo());

    // 公网直连时不信任 X-Forwarded-For，防止伪造
    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr(public_peer())
        .insert_header(("X-Forwarded-For", "198.51.100.7"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let visits = sink.recorded();
    assert_eq!(visits[0].ip_address, "203.0.113.50");
}

// =============================================================================
// Failure Path Tests
// =============================================================================

#[tokio::test]
async fn test_track_sink_failure_returns_500() {
    init_static_config();

    let sink: Arc<FailingSink> = Arc::new(FailingSink);
    let app = beacon_app!(sink, unresolved_geo());

    let req = TestRequest::get()
        .uri("/track.gif?current_page=home")
        .peer_addr(public_peer())
        .insert_header(("User-Agent", "Mozilla/5.0"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"Internal Server Error");
}
