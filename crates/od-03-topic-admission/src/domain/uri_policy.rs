//! # Advertised URI Policy
//!
//! | Scheme | Extra rule |
//! |--------|------------|
//! | `https://`, `wss://` | - |
//! | `https+bsvauth://`, `https+bsvauth+smf://`, `https+bsvauth+scrypt-offchain://`, `https+rtt://` | path must be empty or `/` |
//! | `js8c+bsvauth+smf:` | `lat`, `long`, `freq`, `radius` query parameters |
//!
//! Loopback hosts (`localhost`, `127.0.0.0/8`, `::1`) are rejected for every
//! hierarchical scheme.

use super::errors::UriError;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

static POSITIVE_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(\.\d+)?)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathRule {
    Any,
    RootOnly,
}

/// Whether `uri` may be advertised.
#[must_use]
pub fn is_advertisable_uri(uri: &str) -> bool {
    check_uri(uri).is_ok()
}

/// Check `uri` against the allow-list.
///
/// # Errors
/// The first [`UriError`] found.
pub fn check_uri(uri: &str) -> Result<(), UriError> {
    let (scheme, rest) = uri.split_once(':').ok_or(UriError::UnsupportedScheme)?;

    // Prefixes match literally: `HTTPS://` is not on the list
    match scheme {
        "https" | "wss" => check_hierarchical(rest, PathRule::Any),
        "https+bsvauth" | "https+bsvauth+smf" | "https+bsvauth+scrypt-offchain" | "https+rtt" => {
            check_hierarchical(rest, PathRule::RootOnly)
        }
        "js8c+bsvauth+smf" => check_js8c(rest),
        _ => Err(UriError::UnsupportedScheme),
    }
}

fn check_hierarchical(rest: &str, rule: PathRule) -> Result<(), UriError> {
    let rest = rest.strip_prefix("//").ok_or(UriError::MissingHost)?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(end);

    let host = parse_host(authority)?;
    if is_loopback(host) {
        return Err(UriError::Loopback(host.to_string()));
    }

    if rule == PathRule::RootOnly {
        let path_end = tail.find(['?', '#']).unwrap_or(tail.len());
        let path = &tail[..path_end];
        if !path.is_empty() && path != "/" {
            return Err(UriError::PathNotAllowed);
        }
    }
    Ok(())
}

/// Host part of `[userinfo@]host[:port]`, brackets stripped for IPv6.
fn parse_host(authority: &str) -> Result<&str, UriError> {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let (host, port) = if let Some(inner) = host_port.strip_prefix('[') {
        let (host, after) = inner.split_once(']').ok_or(UriError::MissingHost)?;
        let port = match after {
            "" => None,
            other => Some(other.strip_prefix(':').ok_or(UriError::InvalidPort)?),
        };
        (host, port)
    } else {
        match host_port.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if host.is_empty() {
        return Err(UriError::MissingHost);
    }
    if let Some(port) = port.filter(|p| !p.is_empty()) {
        port.parse::<u16>().map_err(|_| UriError::InvalidPort)?;
    }
    Ok(host)
}

fn is_loopback(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host == "localhost" {
        return true;
    }
    if let Ok(v4) = host.parse::<Ipv4Addr>() {
        return v4.is_loopback();
    }
    if let Ok(v6) = host.parse::<Ipv6Addr>() {
        return v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback());
    }
    false
}

/// `js8c+bsvauth+smf:?lat=..&long=..&freq=..&radius=..`
fn check_js8c(rest: &str) -> Result<(), UriError> {
    let query = rest
        .split_once('?')
        .map_or("", |(_, query)| query)
        .split('#')
        .next()
        .unwrap_or_default();

    let param = |key: &'static str| -> Result<&str, UriError> {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .ok_or(UriError::MissingParameter(key))
    };

    check_coordinate("lat", param("lat")?, 90.0)?;
    check_coordinate("long", param("long")?, 180.0)?;
    check_positive_measure("freq", param("freq")?)?;
    check_positive_measure("radius", param("radius")?)?;
    Ok(())
}

fn check_coordinate(key: &'static str, value: &str, bound: f64) -> Result<(), UriError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && (-bound..=bound).contains(&v) => Ok(()),
        _ => Err(UriError::InvalidParameter(key)),
    }
}

/// A positive number, optionally followed by units (`7.078MHz`, `100km`).
fn check_positive_measure(key: &'static str, value: &str) -> Result<(), UriError> {
    POSITIVE_DECIMAL
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| *v > 0.0)
        .map(|_| ())
        .ok_or(UriError::InvalidParameter(key))
}
