//! 客户端 IP 提取
//!
//! 访问归属的第一步是判断记录哪个 IP：直连时取 TCP 对端，
//! 经过反向代理时取代理转发头。转发头可被伪造，只有当对端
//! 是可信代理（显式配置或内网自动判定）时才采信。

use std::net::IpAddr;

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

use crate::config::get_config;

/// 判断 IP 是否属于私有网段或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            // fc00::/7 (ULA)、fe80::/10 (link-local)、::1
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// 判断对端地址是否在可信代理列表中
///
/// 列表条目支持单个 IP 或 CIDR 网段；`peer` 允许带端口。
pub fn is_trusted_proxy(peer: &str, trusted_proxies: &[String]) -> bool {
    let Some(peer_ip) = parse_ip_lenient(peer) else {
        return false;
    };

    trusted_proxies.iter().any(|entry| {
        if entry.contains('/') {
            cidr_contains(&peer_ip, entry)
        } else {
            entry.parse::<IpAddr>().is_ok_and(|proxy| proxy == peer_ip)
        }
    })
}

/// 解析 "ip" 或 "ip:port" 形式的地址串
fn parse_ip_lenient(addr: &str) -> Option<IpAddr> {
    addr.parse::<IpAddr>()
        .ok()
        .or_else(|| addr.parse::<std::net::SocketAddr>().ok().map(|s| s.ip()))
}

/// 判断 IP 是否落在 CIDR 网段内
///
/// 网段格式错误、地址族不一致、前缀长度越界一律视为不匹配。
pub fn cidr_contains(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix)) = cidr.split_once('/') else {
        return false;
    };
    let (Ok(network), Ok(prefix)) = (network.parse::<IpAddr>(), prefix.parse::<u32>()) else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

/// 提取真实客户端 IP
///
/// 采信顺序：
/// 1. Unix Socket 监听时对端无 IP，只能用转发头
/// 2. 对端命中显式 trusted_proxies：转发头，缺失时退回对端
/// 3. 未配置 trusted_proxies 且对端是内网地址：视作有前置代理，
///    有转发头就用转发头
/// 4. 其余情况（公网直连、对端不在白名单）：对端 IP
///
/// 无法确定对端时返回 None，由调用方决定兜底。
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    let config = get_config();

    #[cfg(unix)]
    if config.server.unix_socket.is_some() {
        return forwarded_client_ip(req.headers());
    }

    let conn_info = req.connection_info();
    let peer = conn_info.peer_addr()?;

    let trusted_proxies = &config.analytics.trusted_proxies;
    if !trusted_proxies.is_empty() {
        if is_trusted_proxy(peer, trusted_proxies) {
            let client = forwarded_client_ip(req.headers()).unwrap_or_else(|| peer.to_string());
            debug!("Peer {} is a trusted proxy, client IP {}", peer, client);
            return Some(client);
        }
        debug!("Peer {} not in trusted_proxies, ignoring forwarded headers", peer);
        return Some(peer.to_string());
    }

    let peer_is_internal = peer
        .parse::<IpAddr>()
        .is_ok_and(|ip| is_private_or_local(&ip));
    if peer_is_internal && let Some(client) = forwarded_client_ip(req.headers()) {
        debug!("Internal peer {}, trusting forwarded client IP {}", peer, client);
        return Some(client);
    }

    Some(peer.to_string())
}

/// 读取代理转发头里的客户端 IP
///
/// X-Forwarded-For 是逗号分隔链，最左侧是原始客户端；
/// 没有 XFF 时退回 X-Real-IP。
pub fn forwarded_client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .map(|ip| ip.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        })
}
