use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_STREAM_LOCATION: &str = "http://localhost:8080/camerapi/";

const URL_ENV: &str = "CAMERA_URL";
const PASSWORD_ENV: &str = "CAMERA_PASSWORD";
const TIMEOUT_ENV: &str = "CAMERA_TIMEOUT_SECS";

fn default_stream_location() -> String {
    DEFAULT_STREAM_LOCATION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the camera API, e.g. `http://raspberrypi.local/camerapi/`.
    #[serde(default = "default_stream_location")]
    pub stream_location: String,
    /// Password the emulator accepts. Clients pass theirs per call.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stream_location: default_stream_location(),
            password: None,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path).context("reading config file")?;
        let cfg: Config = serde_json::from_str(&raw).context("parsing JSON")?;
        Ok(cfg)
    }

    /// Read `path` if it exists, fall back to defaults otherwise, then apply
    /// `CAMERA_*` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let cfg = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        cfg.with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(URL_ENV) {
            self.stream_location = url;
        }
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            self.password = Some(password);
        }
        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{TIMEOUT_ENV} must be a number of seconds"))?;
            self.request_timeout_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Password with surrounding whitespace removed, empty when unset.
    pub fn expected_password(&self) -> String {
        self.password.as_deref().unwrap_or("").trim().to_string()
    }
}
