//! Client fingerprint extraction from an HTTP request

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{Extensions, HeaderMap, request::Parts};
use platform::client::{ClientFingerprint, extract_client_ip, extract_fingerprint};

use crate::error::AuthError;

/// Fingerprint from headers plus the socket address, when the server was
/// started with connect info
pub fn client_fingerprint(
    headers: &HeaderMap,
    extensions: &Extensions,
) -> Result<ClientFingerprint, AuthError> {
    let direct_ip = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(headers, direct_ip);
    Ok(extract_fingerprint(headers, client_ip)?)
}

/// Extractor for the caller's fingerprint
pub struct Client(pub ClientFingerprint);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        client_fingerprint(&parts.headers, &parts.extensions).map(Client)
    }
}
