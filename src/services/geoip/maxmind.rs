//! MaxMind GeoLite2 本地库实现
//!
//! 读取本地 GeoLite2-City.mmdb，查询全程无网络调用

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::Reader;
use tracing::trace;

use super::provider::{GeoInfo, GeoIpLookup};
use crate::errors::{Result, TrackpixelError};

/// MaxMind GeoIP Provider
pub struct MaxMindProvider {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindProvider {
    /// 从文件路径创建 MaxMind Provider
    pub fn new(path: &str) -> Result<Self> {
        let reader = Reader::open_readfile(path)
            .map_err(|e| TrackpixelError::geoip_init(format!("MaxMind database {}: {}", path, e)))?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindProvider {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let ip_addr: IpAddr = ip.parse().ok()?;

        let result = self.reader.lookup(ip_addr).ok()?;
        let city: maxminddb::geoip2::City = result.decode().ok()??;

        // 访问记录存国家全名；部分条目只有 ISO 代码，作为次选
        let country = city
            .country
            .names
            .english
            .map(|s| s.to_string())
            .or_else(|| city.country.iso_code.map(String::from));
        let city_name = city.city.names.english.map(|s| s.to_string());

        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip, country, city_name
        );

        Some(GeoInfo {
            country,
            city: city_name,
        })
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
