pub mod client;
pub mod url;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use client::CameraCommandClient;

pub const START_RECORDING: &str = "start_recording";
pub const STOP_RECORDING: &str = "stop_recording";
pub const IS_RECORDING: &str = "is_recording";

/// Body the camera returns for every control call.
///
/// `Default` is the fallback handed out when a call fails: `success` is
/// false and no server fields are present.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CommandResult {
    #[serde(default)]
    pub success: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordBody<'a> {
    pub password: &'a str,
}

/// Everything that can go wrong between issuing a command and holding a
/// parsed result. The message is what ends up in the user's log.
#[derive(Debug, Error)]
pub enum CommandFailure {
    #[error("{0:#}")]
    Transport(anyhow::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("could not encode request: {0}")]
    Encode(#[source] serde_json::Error),
}
