//! 监控页服务
//!
//! GET /monitoring 按插入顺序倒序列出全部访问记录。
//! 所有字段都来自调用方可控的输入，渲染前逐个转义。

use std::fmt::Write as _;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::error;

use crate::storage::SeaOrmStorage;
use crate::utils::html::escape;

use migration::entities::tracking_log;

pub struct MonitoringService {}

impl MonitoringService {
    /// 渲染访问记录列表，最新的在最前面
    pub async fn index(storage: web::Data<Arc<SeaOrmStorage>>) -> HttpResponse {
        match storage.list_visits().await {
            Ok(rows) => HttpResponse::Ok()
                .insert_header(("Content-Type", "text/html; charset=utf-8"))
                .body(render_page(&rows)),
            Err(e) => {
                error!("Failed to load tracking logs: {}", e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }
}

/// 把访问记录渲染成完整的 HTML 页面
///
/// 行顺序由调用方保证（倒序查询），这里不再排序。
fn render_page(rows: &[tracking_log::Model]) -> String {
    let mut html = String::with_capacity(1024 + rows.len() * 256);

    html.push_str(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Visit Monitoring</title>\n\
         <style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; }\n\
         th { background: #f5f5f5; }\n\
         tr:nth-child(even) { background: #fafafa; }\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <h1>Visit Monitoring</h1>\n\
         <table>\n\
         <tr><th>IP</th><th>Page</th><th>User-Agent</th><th>Timestamp</th>\
         <th>Browser</th><th>OS</th><th>Device</th><th>Country</th><th>City</th></tr>\n",
    );

    for row in rows {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.ip_address),
            escape(&row.current_page),
            escape(&row.user_agent),
            row.timestamp.to_rfc3339(),
            escape(&row.browser),
            escape(&row.os),
            escape(&row.device),
            escape(&row.country),
            escape(&row.city),
        );
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// 注册监控页路由
pub fn monitoring_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/monitoring", web::get().to(MonitoringService::index));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_row(id: i64, page: &str, ua: &str) -> tracking_log::Model {
        tracking_log::Model {
            id,
            ip_address: "203.0.113.9".to_string(),
            current_page: page.to_string(),
            user_agent: ua.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            browser: "Chrome 120.0.0.0".to_string(),
            os: "Windows 10".to_string(),
            device: "PC".to_string(),
            country: "Germany".to_string(),
            city: "Berlin".to_string(),
        }
    }

    #[test]
    fn test_render_page_contains_all_fields() {
        let rows = vec![sample_row(1, "checkout", "Mozilla/5.0")];
        let html = render_page(&rows);

        assert!(html.contains("<td>203.0.113.9</td>"));
        assert!(html.contains("<td>checkout</td>"));
        assert!(html.contains("<td>Mozilla/5.0</td>"));
        assert!(html.contains("2026-03-01T12:00:00+00:00"));
        assert!(html.contains("<td>Chrome 120.0.0.0</td>"));
        assert!(html.contains("<td>Windows 10</td>"));
        assert!(html.contains("<td>PC</td>"));
        assert!(html.contains("<td>Germany</td>"));
        assert!(html.contains("<td>Berlin</td>"));
    }

    #[test]
    fn test_render_page_escapes_markup() {
        let rows = vec![sample_row(1, "<script>alert('x')</script>", "\"evil\" & <b>bold</b>")];
        let html = render_page(&rows);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
        assert!(html.contains("&quot;evil&quot; &amp; &lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_render_page_preserves_row_order() {
        let rows = vec![
            sample_row(3, "third", "ua"),
            sample_row(2, "second", "ua"),
            sample_row(1, "first", "ua"),
        ];
        let html = render_page(&rows);

        let third = html.find("<td>third</td>").unwrap();
        let second = html.find("<td>second</td>").unwrap();
        let first = html.find("<td>first</td>").unwrap();
        assert!(third < second);
        assert!(second < first);
    }

    #[test]
    fn test_render_page_empty() {
        let html = render_page(&[]);

        assert!(html.contains("<table>"));
        assert!(html.contains("<th>IP</th>"));
        assert!(!html.contains("<td>"));
    }
}
