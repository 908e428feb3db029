//! Request classification.
//!
//! # Responsibilities
//! - Derive the registry lookup key from the request target
//! - Capture method, headers and body for logging and alerts
//! - Resolve the real client address behind reverse proxies
//!
//! # Design Decisions
//! - The lookup key is the request target as received; no decoding,
//!   case folding or trailing-slash cleanup
//! - Bodies are buffered only for non-GET requests, up to a size limit
//! - Header capture keeps every value of every header, no deduplication

use std::borrow::Cow;
use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Uri};
use thiserror::Error;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Failure to capture the request. Aborts the request.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

/// Everything captured about one inbound request.
///
/// Owned by the request's task and dropped with it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Request target (path plus query), also the registry lookup key.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Socket-level peer address.
    pub remote_addr: SocketAddr,
    /// Client address after applying proxy header precedence.
    pub client_ip: String,
}

impl RequestContext {
    /// Capture the request head. The body stays empty until `read_body`.
    pub fn from_parts(parts: &Parts, remote_addr: SocketAddr) -> Self {
        Self {
            method: parts.method.clone(),
            uri: request_target(&parts.uri),
            headers: parts.headers.clone(),
            body: Bytes::new(),
            remote_addr,
            client_ip: resolve_client_ip(remote_addr, &parts.headers),
        }
    }

    /// Buffer the body for non-GET requests.
    pub async fn read_body(&mut self, body: Body, limit: usize) -> Result<(), ClassifyError> {
        if self.method != Method::GET {
            self.body = axum::body::to_bytes(body, limit).await?;
        }
        Ok(())
    }

    /// Key used to look the request up in the token registry.
    pub fn lookup_key(&self) -> &str {
        &self.uri
    }

    /// All headers as `name: value` lines, one per value.
    pub fn header_block(&self) -> String {
        let mut block = String::new();
        for (name, value) in &self.headers {
            block.push_str(name.as_str());
            block.push_str(": ");
            block.push_str(&String::from_utf8_lossy(value.as_bytes()));
            block.push('\n');
        }
        block
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// The request target as sent by the client.
///
/// Origin-form targets (`/path?query`) are returned verbatim. Absolute-form
/// targets and HTTP/2 requests, which carry scheme and authority in the URI,
/// are reduced to their path and query so both forms share one key.
pub fn request_target(uri: &Uri) -> String {
    match uri.path_and_query() {
        Some(path_and_query) => path_and_query.as_str().to_string(),
        None => uri.to_string(),
    }
}

/// Resolve the client address.
///
/// Precedence, later wins: socket address, first `X-Forwarded-For` entry,
/// `X-Real-Ip`. Empty header values are ignored.
pub fn resolve_client_ip(remote_addr: SocketAddr, headers: &HeaderMap) -> String {
    let mut client_ip = remote_addr.ip().to_string();

    if let Some(forwarded) = first_header_value(headers, X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next().map(str::trim))
        .filter(|v| !v.is_empty())
    {
        client_ip = forwarded.to_string();
    }

    if let Some(real_ip) = first_header_value(headers, X_REAL_IP)
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        client_ip = real_ip.to_string();
    }

    client_ip
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
