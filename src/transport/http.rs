use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace};

use super::{Transport, TransportResponse, JSON_CONTENT_TYPE};

/// reqwest-backed transport. The only place a request timeout is applied.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building http client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn collect(resp: reqwest::Response) -> Result<TransportResponse> {
        let status = resp.status().as_u16();
        let body = resp.bytes().await.context("read response body")?;
        debug!(status_code = %status, body_len = body.len(), "camera response received");
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse> {
        trace!(url = %url, body_len = body.len(), "sending POST request");

        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .context("post send")?;

        Self::collect(resp).await
    }

    async fn get(&self, url: &str) -> Result<TransportResponse> {
        trace!(url = %url, "sending GET request");

        let resp = self.client.get(url).send().await.context("get send")?;

        Self::collect(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn post_json_sends_body_and_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/camerapi/start_recording")
            .match_header("content-type", Matcher::Exact(JSON_CONTENT_TYPE.into()))
            .match_body(Matcher::Exact(r#"{"password":"secret"}"#.into()))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(None).unwrap();
        let url = format!("{}/camerapi/start_recording", server.url());
        let resp = transport
            .post_json(&url, br#"{"password":"secret"}"#.to_vec())
            .await
            .expect("post should succeed");

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body_text(), r#"{"success":true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_still_a_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/camerapi/is_recording")
            .with_status(503)
            .with_body("busy")
            .create_async()
            .await;

        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        let url = format!("{}/camerapi/is_recording", server.url());
        let resp = transport.get(&url).await.expect("get should return a response");

        assert_eq!(resp.status, 503);
        assert!(!resp.is_success());
        assert_eq!(resp.body_text(), "busy");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        // Port 9 (discard) is not served in test environments.
        let transport = HttpTransport::new(Some(Duration::from_secs(2))).unwrap();
        let result = transport.get("http://127.0.0.1:9/camerapi/is_recording").await;
        assert!(result.is_err());
    }
}
