pub mod http;

use anyhow::Result;
use async_trait::async_trait;

pub use http::HttpTransport;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Raw HTTP outcome handed back to the camera client.
/// Status interpretation and body decoding are left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outbound HTTP capability used by the camera client.
///
/// Implementations return `Err` only when no response was obtained
/// (connect failure, timeout, TLS error). Any status code is a response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` verbatim with `Content-Type: application/json; charset=utf-8`.
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse>;

    async fn get(&self, url: &str) -> Result<TransportResponse>;
}
