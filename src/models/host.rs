//! Probe targets and address sanitization

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// A validated, addressable probe target
///
/// `address` always holds a bare hostname or IP literal; URLs are reduced to
/// their host component when the host is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Host {
    /// Opaque identifier, the address as supplied unless given explicitly
    pub id: String,
    /// Hostname or IP literal to probe
    pub address: String,
}

impl Host {
    /// Build a host with an explicit identifier
    pub fn new<I: Into<String>>(id: I, address: &str) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            address: sanitize_address(address)?,
        })
    }

    /// Build a host whose identifier is the raw input
    pub fn parse(address: &str) -> Result<Self> {
        Self::new(address, address)
    }

    /// Re-run sanitization, yielding a host whose address is guaranteed bare
    pub fn sanitized(&self) -> Result<Self> {
        Ok(Self {
            id: self.id.clone(),
            address: sanitize_address(&self.address)?,
        })
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Reduce a host argument to a bare hostname or IP
///
/// IP literals and plain hostnames are returned unchanged. Anything that
/// starts with a scheme (`name:`) or contains a `/` is treated as a URL and
/// must read `scheme://authority...` with a non-empty host.
pub fn sanitize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_address("host address cannot be empty"));
    }

    if trimmed.parse::<IpAddr>().is_ok() {
        return Ok(trimmed.to_string());
    }

    let scheme = scheme_prefix(trimmed);
    if scheme.is_none() && !trimmed.contains('/') {
        return Ok(trimmed.to_string());
    }

    let invalid = |reason: &str| AppError::invalid_address(format!("invalid host address {}: {}", trimmed, reason));

    let Some(scheme) = scheme else {
        return Err(invalid("missing scheme"));
    };

    // The parser would accept `https:/path` and `https:path` as if the
    // slashes were present, so the authority is checked on the raw text.
    let Some(after_slashes) = trimmed[scheme.len() + 1..].strip_prefix("//") else {
        return Err(invalid("missing host"));
    };
    let authority = after_slashes.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return Err(invalid("missing host"));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;

    match parsed.host() {
        Some(url::Host::Domain(domain)) if !domain.is_empty() => Ok(domain.to_string()),
        Some(url::Host::Ipv4(ip)) => Ok(ip.to_string()),
        Some(url::Host::Ipv6(ip)) => Ok(ip.to_string()),
        _ => Err(invalid("missing host")),
    }
}

/// The `scheme` of a leading `scheme:`, if the text starts with one
fn scheme_prefix(address: &str) -> Option<&str> {
    let (candidate, _) = address.split_once(':')?;
    let mut chars = candidate.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_reduced_to_hostname() {
        assert_eq!(sanitize_address("https://m1.example.com/path").unwrap(), "m1.example.com");
        assert_eq!(sanitize_address("http://mirror.example.org:8080/debian/").unwrap(), "mirror.example.org");
        assert_eq!(sanitize_address("ftp://10.1.2.3/pub").unwrap(), "10.1.2.3");
    }

    #[test]
    fn test_ipv6_url_loses_brackets() {
        assert_eq!(sanitize_address("https://[2001:db8::1]/").unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_bare_host_unchanged() {
        assert_eq!(sanitize_address("m1.example.com").unwrap(), "m1.example.com");
        assert_eq!(sanitize_address("192.168.1.1").unwrap(), "192.168.1.1");
        assert_eq!(sanitize_address("::1").unwrap(), "::1");
        assert_eq!(sanitize_address("  padded.example  ").unwrap(), "padded.example");
    }

    #[test]
    fn test_malformed_urls_rejected() {
        for bad in [
            "://bad",
            "/just/a/path",
            "file:///etc/hosts",
            "https://",
            "",
            "https://?q=1",
            "https:/path",
            "http:example.com",
            "example.com:443",
        ] {
            let err = sanitize_address(bad).unwrap_err();
            assert!(matches!(err, AppError::InvalidAddress(_)), "{:?} gave {:?}", bad, err);
        }
    }

    #[test]
    fn test_scheme_without_authority_rejected() {
        for bad in ["https:/path", "https:path", "localhost:8080", "mailto:ops@example.com"] {
            let err = sanitize_address(bad).unwrap_err();
            assert!(matches!(err, AppError::InvalidAddress(_)), "{:?} gave {:?}", bad, err);
            assert!(err.to_string().contains("missing host"), "{}", err);
        }
    }

    #[test]
    fn test_ip_literals_are_not_schemes() {
        assert_eq!(sanitize_address("2001:db8::1").unwrap(), "2001:db8::1");
        assert_eq!(sanitize_address("fe80::1").unwrap(), "fe80::1");
        assert_eq!(sanitize_address("10.0.0.1").unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_url_with_credentials_and_port() {
        assert_eq!(sanitize_address("https://user@mirror.example:8443/x?y=1").unwrap(), "mirror.example");
        assert_eq!(sanitize_address("HTTP://Mirror.Example/").unwrap(), "mirror.example");
    }

    #[test]
    fn test_host_constructors() {
        let host = Host::parse("https://m1.example.com/path").unwrap();
        assert_eq!(host.id, "https://m1.example.com/path");
        assert_eq!(host.address, "m1.example.com");
        assert_eq!(host.to_string(), "m1.example.com");

        let host = Host::new("primary", "10.0.0.1").unwrap();
        assert_eq!(host.id, "primary");
        assert_eq!(host.address, "10.0.0.1");

        assert!(Host::parse("://bad").is_err());
    }

    #[test]
    fn test_sanitized_catches_mutated_address() {
        let mut host = Host::parse("ok.example").unwrap();
        host.address = "https://late.example/x".to_string();
        assert_eq!(host.sanitized().unwrap().address, "late.example");

        host.address = "://broken".to_string();
        assert!(host.sanitized().is_err());
    }
}
