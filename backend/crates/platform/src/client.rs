//! Client identification
//!
//! Sessions are bound to the hash of the client's User-Agent.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

use crate::crypto::sha256;

#[derive(Debug, Clone)]
pub struct ClientFingerprint {
    /// SHA-256 of the User-Agent header
    pub hash: [u8; 32],
    pub ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

impl ClientFingerprint {
    pub fn hash_vec(&self) -> Vec<u8> {
        self.hash.to_vec()
    }

    pub fn ip_string(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }

    /// True when `stored` was produced from the same User-Agent
    pub fn matches(&self, stored: &[u8]) -> bool {
        stored.len() == self.hash.len()
            && stored
                .iter()
                .zip(self.hash.iter())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FingerprintError {
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),
}

/// Build a fingerprint from the request headers
pub fn extract_fingerprint(
    headers: &HeaderMap,
    client_ip: Option<IpAddr>,
) -> Result<ClientFingerprint, FingerprintError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|ua| !ua.trim().is_empty())
        .ok_or(FingerprintError::MissingHeader("User-Agent"))?;

    Ok(ClientFingerprint {
        hash: sha256(user_agent.as_bytes()),
        ip: client_ip,
        user_agent: Some(user_agent.to_string()),
    })
}

/// First hop of `X-Forwarded-For`, else the socket address
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_fingerprint_matches_same_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Firefox/130"));

        let fp = extract_fingerprint(&headers, None).unwrap();
        assert_eq!(fp.user_agent.as_deref(), Some("Firefox/130"));
        assert!(fp.matches(&sha256(b"Firefox/130")));
        assert!(!fp.matches(&sha256(b"Chrome/128")));
        assert!(!fp.matches(&[0u8; 4]));
    }

    #[test]
    fn test_missing_or_blank_agent() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            extract_fingerprint(&headers, None),
            Err(FingerprintError::MissingHeader("User-Agent"))
        ));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("   "));
        assert!(extract_fingerprint(&headers, None).is_err());
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(extract_client_ip(&headers, Some(direct)), Some(direct));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(
            extract_client_ip(&headers, Some(direct)),
            Some("203.0.113.9".parse().unwrap())
        );

        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        assert_eq!(extract_client_ip(&headers, Some(direct)), Some(direct));
    }
}
