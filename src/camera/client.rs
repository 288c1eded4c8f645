use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::url::{SlashJoiner, UrlJoiner};
use super::{CommandFailure, CommandResult, PasswordBody, IS_RECORDING, START_RECORDING, STOP_RECORDING};
use crate::messages::MessageSink;
use crate::transport::{Transport, TransportResponse};

/// Issues recording commands against the camera API and reports every
/// attempt to the message log.
///
/// Failures never reach the caller of the fail-soft methods; they are
/// logged as `"<command> failed: <reason>"` and replaced by a fallback.
#[derive(Clone)]
pub struct CameraCommandClient {
    base_location: String,
    transport: Arc<dyn Transport>,
    messages: Arc<dyn MessageSink>,
    joiner: Arc<dyn UrlJoiner>,
}

impl CameraCommandClient {
    pub fn new(
        base_location: impl Into<String>,
        transport: Arc<dyn Transport>,
        messages: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            base_location: base_location.into(),
            transport,
            messages,
            joiner: Arc::new(SlashJoiner),
        }
    }

    pub fn with_joiner(mut self, joiner: Arc<dyn UrlJoiner>) -> Self {
        self.joiner = joiner;
        self
    }

    pub fn url_for(&self, subpath: &str) -> String {
        self.joiner.join(&self.base_location, subpath)
    }

    pub async fn start_recording(&self, password: &str) -> CommandResult {
        self.invoke("Start recording", START_RECORDING, password).await
    }

    pub async fn stop_recording(&self, password: &str) -> CommandResult {
        self.invoke("Stop recording", STOP_RECORDING, password).await
    }

    /// Ask the camera whether it is recording. `success` carries the flag.
    pub async fn is_recording(&self) -> CommandResult {
        let operation = "Is recording";
        self.messages.add(&format!("{operation} requested"), None);

        let url = self.url_for(IS_RECORDING);
        let outcome = match self.transport.get(&url).await {
            Ok(resp) => parse_result(resp),
            Err(e) => Err(CommandFailure::Transport(e)),
        };

        self.settle(operation, outcome).unwrap_or_default()
    }

    /// POST `{password}` to `subpath`, falling back to an empty result on failure.
    pub async fn invoke(&self, operation: &str, subpath: &str, password: &str) -> CommandResult {
        self.invoke_or(operation, subpath, password, CommandResult::default())
            .await
    }

    /// Like [`invoke`](Self::invoke) with a caller-chosen fallback.
    pub async fn invoke_or(
        &self,
        operation: &str,
        subpath: &str,
        password: &str,
        fallback: CommandResult,
    ) -> CommandResult {
        self.try_invoke(operation, subpath, password)
            .await
            .unwrap_or(fallback)
    }

    /// Typed path behind the fail-soft methods. Logs exactly one
    /// "requested" entry and one completion entry.
    pub async fn try_invoke(
        &self,
        operation: &str,
        subpath: &str,
        password: &str,
    ) -> Result<CommandResult, CommandFailure> {
        self.messages.add(&format!("{operation} requested"), None);

        let url = self.url_for(subpath);
        debug!(operation = %operation, url = %url, "issuing camera command");

        let outcome = self.post_password(&url, password).await;
        self.settle(operation, outcome)
    }

    async fn post_password(&self, url: &str, password: &str) -> Result<CommandResult, CommandFailure> {
        let body = serde_json::to_vec(&PasswordBody { password }).map_err(CommandFailure::Encode)?;
        let resp = self
            .transport
            .post_json(url, body)
            .await
            .map_err(CommandFailure::Transport)?;
        parse_result(resp)
    }

    fn settle(
        &self,
        operation: &str,
        outcome: Result<CommandResult, CommandFailure>,
    ) -> Result<CommandResult, CommandFailure> {
        match &outcome {
            Ok(result) => {
                self.messages.add(
                    &format!("{operation} succeeded"),
                    Some(Value::Bool(result.success)),
                );
            }
            Err(err) => {
                warn!(operation = %operation, error = %err, "camera command failed");
                self.messages.add(&format!("{operation} failed: {err}"), None);
            }
        }
        outcome
    }
}

fn parse_result(resp: TransportResponse) -> Result<CommandResult, CommandFailure> {
    if !resp.is_success() {
        return Err(CommandFailure::Status {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    serde_json::from_slice(&resp.body).map_err(CommandFailure::Decode)
}
