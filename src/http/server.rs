//! HTTP server setup and the per-operation handler.
//!
//! # Responsibilities
//! - Create the Axum router: one POST route per operation plus health
//! - Wire up middleware (tracing)
//! - Validate headers and body, then hand off to the gateway
//! - Bound each call by the request timeout, answering SYS003 when it fires
//! - Graceful shutdown on the lifecycle broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::error::{ErrorKind, GatewayError};
use crate::gateway::Gateway;
use crate::http::request::{ApiHeaders, API_REQUEST_ID, X_REQUEST_ID};
use crate::observability::{metrics, tracing as spans};
use crate::operations::{CollectionDetail, CollectionLog, MyCard, MyCardAll, Operation, UpdateConsent};
use crate::security::ApiKeyRepository;

pub const HEALTH_PATH: &str = "/Api/healthz";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub api_keys: Arc<ApiKeyRepository>,
    /// Whole-call budget, from header checks to the decoded response.
    pub request_timeout: Duration,
}

/// HTTP front of the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self { router: Self::build_router(state) }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health))
            .route(CollectionDetail::PATH, post(handle::<CollectionDetail>))
            .route(CollectionLog::PATH, post(handle::<CollectionLog>))
            .route(MyCard::PATH, post(handle::<MyCard>))
            .route(MyCardAll::PATH, post(handle::<MyCardAll>))
            .route(UpdateConsent::PATH, post(handle::<UpdateConsent>))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until the shutdown broadcast fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serve operation `O`.
async fn handle<O: Operation>(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let api = ApiHeaders::from_headers(&headers);
    let span = spans::request_span(&api.request_id, &api.channel, &api.language, O::NAME, O::PATH);

    let result = tokio::time::timeout(state.request_timeout, serve::<O>(&state, &api, &body))
        .instrument(span.clone())
        .await
        .unwrap_or_else(|_| {
            span.in_scope(|| {
                tracing::warn!(timeout_ms = state.request_timeout.as_millis() as u64, "Request timed out");
            });
            Err(GatewayError::new(ErrorKind::Timeout))
        });
    let mut response = match result {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(e) => e.into_response(),
    };

    if let Ok(value) = HeaderValue::from_str(&api.request_id) {
        response.headers_mut().insert(API_REQUEST_ID, value.clone());
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    metrics::record_http_request(O::PATH, response.status().as_u16());
    response
}

async fn serve<O: Operation>(state: &AppState, api: &ApiHeaders, body: &[u8]) -> Result<O::Response, GatewayError> {
    let client = api.validate(&state.api_keys, O::METHOD, O::PATH).inspect_err(|e| {
        tracing::info!(code = e.code(), "Request headers rejected");
    })?;
    tracing::debug!(client = %client.name, device_os = %api.device_os, "Request accepted");

    let request: O::Request = serde_json::from_slice(body).map_err(|e| {
        tracing::info!(error = %e, "Malformed request body");
        GatewayError::new(ErrorKind::Validation).with_source(e)
    })?;

    let missing = O::missing_fields(&request);
    if !missing.is_empty() {
        tracing::info!(fields = ?missing, "Required parameters missing");
        return Err(GatewayError::new(ErrorKind::RequiredParameter).with_detail(missing.join(", ")));
    }

    let oversized = O::oversized_fields(&request);
    if !oversized.is_empty() {
        tracing::info!(fields = ?oversized, "Parameters exceed max length");
        return Err(GatewayError::new(ErrorKind::FieldTooLong).with_detail(format!("({})", oversized.join(", "))));
    }

    state.gateway.execute::<O>(&api.request_id, &request).await
}
