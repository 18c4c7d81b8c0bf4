//! 外部 GeoIP API 实现
//!
//! 使用外部 HTTP API 进行 IP 地理位置查询（如 ipapi.co）
//! 每次调用都发起一次新请求：不缓存、不重试、不设超时

use std::net::IpAddr;
use std::sync::OnceLock;

use async_trait::async_trait;
use tracing::{debug, trace};
use ureq::Agent;

use super::provider::{GeoInfo, GeoIpLookup};
use crate::utils::ip::is_private_or_local;

/// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| Agent::config_builder().build().into())
}

/// 外部 API GeoIP Provider
pub struct ExternalApiProvider {
    api_url_template: String,
}

impl ExternalApiProvider {
    /// 创建外部 API Provider
    ///
    /// `api_url_template` 使用 `{ip}` 作为占位符
    /// 例如: `https://ipapi.co/{ip}/json/`
    pub fn new(api_url_template: &str) -> Self {
        Self {
            api_url_template: api_url_template.to_string(),
        }
    }

    /// 从外部 API 获取 GeoIP 信息（同步，在 spawn_blocking 中调用）
    fn fetch_from_api_sync(url: String) -> Option<GeoInfo> {
        let agent = get_agent();

        let resp = match agent.get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                debug!("GeoIP API request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let json: serde_json::Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                debug!("GeoIP API response from \"{}\" parse failed: {}", url, e);
                return None;
            }
        };

        parse_geo_response(json)
    }

    /// 从外部 API 获取 GeoIP 信息（异步包装）
    async fn fetch_from_api(&self, ip: &str) -> Option<GeoInfo> {
        let url = self.api_url_template.replace("{ip}", ip);

        // 使用 spawn_blocking 在线程池中执行同步 HTTP 请求
        tokio::task::spawn_blocking(move || Self::fetch_from_api_sync(url))
            .await
            .unwrap_or_else(|e| {
                debug!("GeoIP spawn_blocking failed: {}", e);
                None
            })
    }
}

/// 解析外部 API 响应
///
/// ipapi.co 成功格式: {"country_name": "United States", "city": "Mountain View"}
/// ipapi.co 失败格式: {"error": true, "reason": "Reserved IP Address"}
/// ip-api.com 风格的失败: {"status": "fail", ...}
fn parse_geo_response(json: serde_json::Value) -> Option<GeoInfo> {
    if json["error"].as_bool() == Some(true) || json["status"].as_str() == Some("fail") {
        trace!("External API returned error status");
        return None;
    }

    let country = json["country_name"]
        .as_str()
        .or_else(|| json["country"].as_str())
        .map(String::from);

    let city = json["city"].as_str().map(String::from);

    trace!(
        "External API lookup: country={:?}, city={:?}",
        country, city
    );

    Some(GeoInfo { country, city })
}

#[async_trait]
impl GeoIpLookup for ExternalApiProvider {
    /// 查询 IP 地理位置
    ///
    /// 私有地址和无法解析的地址直接返回 None，不发起请求：
    /// 公共 GeoIP 服务对保留地址一律返回错误。
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let Ok(ip_addr) = ip.parse::<IpAddr>() else {
            trace!("GeoIP skip: \"{}\" is not a valid IP", ip);
            return None;
        };
        if is_private_or_local(&ip_addr) {
            trace!("GeoIP skip: {} is private or local", ip);
            return None;
        }

        self.fetch_from_api(ip).await
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}
