use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::agent::config::Config;

pub const BASE_PATH: &str = "/camerapi/";
pub const STREAM_PATH: &str = "/camerapi/stream/";

type SharedState = Arc<AppState>;

/// Emulated camera: a password and a recording flag.
#[derive(Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    password: String,
    recording: AtomicBool,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let password = config.expected_password();
        Self {
            config,
            password,
            recording: AtomicBool::new(false),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn set_recording(&self, on: bool) {
        self.recording.store(on, Ordering::SeqCst);
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Password from a JSON body. Anything unparsable counts as empty.
/// Scalars are rendered the way the Pi-side Python server prints them.
fn extract_password(body: &[u8]) -> String {
    let parsed: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => return String::new(),
    };
    match parsed.get("password") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(Value::Null) => "None".to_string(),
        None => String::new(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn authorize(state: &AppState, body: &[u8]) -> bool {
    let given = extract_password(body);
    debug!("password received");
    if given == state.password {
        info!("password correct");
        true
    } else {
        warn!("password incorrect");
        false
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn to_stream() -> impl IntoResponse {
    debug!("redirecting to {}", STREAM_PATH);
    (StatusCode::FOUND, [(LOCATION, STREAM_PATH)])
}

async fn stream() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Streaming is not available on the emulator")
}

async fn start_recording(State(state): State<SharedState>, body: Bytes) -> impl IntoResponse {
    info!("start recording requested");
    if !authorize(&state, &body) {
        return Json(SuccessResponse { success: false });
    }
    state.set_recording(true);
    Json(SuccessResponse { success: true })
}

async fn stop_recording(State(state): State<SharedState>, body: Bytes) -> impl IntoResponse {
    info!("stop recording requested");
    if !authorize(&state, &body) {
        return Json(SuccessResponse { success: false });
    }
    state.set_recording(false);
    Json(SuccessResponse { success: true })
}

async fn is_recording(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("is recording requested");
    Json(SuccessResponse {
        success: state.is_recording(),
    })
}

async fn start_streaming() -> impl IntoResponse {
    warn!("start streaming not implemented");
    (StatusCode::NOT_FOUND, "Start streaming not yet implemented")
}

async fn stop_streaming() -> impl IntoResponse {
    warn!("stop streaming not implemented");
    (StatusCode::NOT_FOUND, "Stop streaming not yet implemented")
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(to_stream))
        .route(BASE_PATH, get(to_stream))
        .route(STREAM_PATH, get(stream))
        .route("/camerapi/start_recording", post(start_recording))
        .route("/camerapi/stop_recording", post(stop_recording))
        .route("/camerapi/is_recording", get(is_recording))
        .route("/camerapi/start_streaming", get(start_streaming))
        .route("/camerapi/stop_streaming", get(stop_streaming))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the emulator on an already bound listener.
pub async fn serve_on(listener: tokio::net::TcpListener, config: Config) -> Result<()> {
    let state = Arc::new(AppState::new(Arc::new(config)));
    let app = create_router(state);
    let addr = listener.local_addr().context("reading listener address")?;
    info!("camera emulator listening on {}", addr);
    axum::serve(listener, app).into_future().await?;
    Ok(())
}

pub async fn serve(config: Config, port: u16) -> Result<()> {
    if config.expected_password().is_empty() {
        warn!("no password configured; only empty passwords will be accepted");
    }
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    serve_on(listener, config).await
}
