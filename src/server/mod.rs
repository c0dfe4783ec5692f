//! Generation endpoint proxy: forwards chat-completion requests upstream with the server-held key.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::core::app;
use crate::core::config::{Config, ConfigError};

pub const DEFAULT_PORT: u16 = 3001;

const ALLOW_METHODS: &str = "POST";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Shared state of the proxy: upstream location, credential and deadline.
pub struct ProxyState {
    client: reqwest::Client,
    upstream_url: String,
    api_key: String,
    timeout: Duration,
}

impl ProxyState {
    pub fn new(upstream_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream_url: upstream_url.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.completions_url(),
            config.require_api_key()?,
            config.timeout,
        ))
    }
}

pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat).options(preflight))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: ProxyState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!(
        "{} {} proxy forwarding to {}",
        app::NAME,
        app::VERSION,
        state.upstream_url
    );
    println!("API server running on http://{}", listener.local_addr()?);
    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

async fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
        ],
    )
        .into_response()
}

async fn chat(State(state): State<Arc<ProxyState>>, body: Bytes) -> Response {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Rejecting chat request: {}", e);
            return respond(
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Invalid JSON body: {}", e) }),
            );
        }
    };
    log::info!(
        "Forwarding chat request (model {})",
        body.get("model").and_then(Value::as_str).unwrap_or("?")
    );
    match forward(&state, &body).await {
        Ok(data) => respond(StatusCode::OK, data),
        Err((status, message)) => {
            log::error!("Proxy request failed: {}", message);
            respond(status, json!({ "error": message }))
        }
    }
}

async fn forward(state: &ProxyState, body: &Value) -> Result<Value, (StatusCode, String)> {
    let resp = state
        .client
        .post(&state.upstream_url)
        .bearer_auth(&state.api_key)
        .header(header::ACCEPT, "application/json")
        .json(body)
        .timeout(state.timeout)
        .send()
        .await
        .map_err(upstream_error)?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("API request failed: {} - {}", status.as_u16(), text),
        ));
    }
    resp.json::<Value>().await.map_err(upstream_error)
}

fn upstream_error(e: reqwest::Error) -> (StatusCode, String) {
    if e.is_timeout() {
        (StatusCode::GATEWAY_TIMEOUT, "Request timeout".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

fn respond(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(body),
    )
        .into_response()
}
