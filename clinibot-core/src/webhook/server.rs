use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use clinibot_common::models::WebhookPayload;
use crate::crypto::SignatureVerifier;
use crate::services::ConversationService;
use crate::Error;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub conversation: Arc<ConversationService>,
    pub verifier: SignatureVerifier,
    /// Token expected in the subscription handshake.
    pub verify_token: String,
}

/// Query string of the subscription handshake:
/// `?hub.mode=subscribe&hub.verify_token=...&hub.challenge=...`
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode", alias = "mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token", alias = "verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge", alias = "challenge")]
    challenge: Option<String>,
}

pub fn build_router(state: WebhookState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/webhook", get(verify_subscription).post(receive_delivery))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Any origin, credentials allowed (the origin is mirrored back).
                .layer(CorsLayer::very_permissive()),
        )
}

/// Binds `addr` and serves until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: WebhookState, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Webhook server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Webhook server shut down.");
    Ok(())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn verify_subscription(
    State(state): State<WebhookState>,
    Query(query): Query<VerifyQuery>,
) -> (StatusCode, String) {
    let token_ok = query.verify_token.as_deref() == Some(state.verify_token.as_str());
    if query.mode.as_deref() == Some("subscribe") && token_ok {
        info!("Webhook subscription verified.");
        return (StatusCode::OK, query.challenge.unwrap_or_default());
    }
    warn!("Webhook verification failed (mode={:?})", query.mode);
    (StatusCode::FORBIDDEN, "Verification failed".to_string())
}

async fn receive_delivery(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !state.verifier.verify(&body, signature) {
        warn!("Rejected webhook delivery with invalid signature.");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Invalid signature" })),
        )
            .into_response();
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            warn!("Malformed webhook body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Malformed payload" })),
            )
                .into_response();
        }
    };

    match state.conversation.process_payload(&payload).await {
        Ok(handled) => {
            debug!("Webhook delivery done, {} message(s) handled.", handled);
            (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
        }
        Err(e) => {
            error!("Webhook delivery aborted: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Message processing failed" })),
            )
                .into_response()
        }
    }
}
