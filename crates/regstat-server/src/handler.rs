use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::{debug, warn};

use regstat_ingest::{EnvelopeIntake, IngestError};
use regstat_types::{Envelope, RegistryEvent, EVENTS_MEDIA_TYPE};

/// Shared handler state: the intake owns the store handle.
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<EnvelopeIntake>,
}

/// Notification endpoint.
///
/// The registry queues a notification and redelivers it until the endpoint
/// answers 2xx, so requests this collector merely isn't interested in
/// (wrong method, empty body, wrong content type) are answered `200 OK` on
/// purpose: a 4xx here would back the registry's delivery queue up
/// forever. Only bodies that should have been processable earn an error:
/// malformed encodings and rejected events get `400`, store failures
/// `502`, each naming the failing event's position where one exists.
pub async fn events_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        debug!(%method, "ignoring request with unsupported method");
        return ignored(format!(
            "ignoring request: required method is POST, got {method}"
        ));
    }

    if body.is_empty() {
        debug!("ignoring request with empty body");
        return ignored("ignoring request: required non-empty request body".to_owned());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !is_events_media_type(content_type) {
        debug!(content_type, "ignoring request with unsupported content type");
        return ignored(format!(
            "ignoring request: required content type is \"{EVENTS_MEDIA_TYPE}\", got \"{content_type}\""
        ));
    }

    let envelope = match decode_envelope(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "failed to decode notification body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("request body could not be decoded: {err}"),
                })),
            )
                .into_response();
        }
    };

    match state.intake.apply(&envelope).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "applied": summary.applied,
                "created": summary.created,
                "merged": summary.merged,
                "removed": summary.removed,
            })),
        )
            .into_response(),
        Err(err) => {
            let status = if err.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            warn!(index = err.index(), error = %err, "failed to apply envelope");
            failure(status, &err)
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "regstat",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn ignored(message: String) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "status": "ignored", "message": message })),
    )
        .into_response()
}

fn failure(status: StatusCode, err: &IngestError) -> Response {
    (
        status,
        Json(json!({ "error": err.to_string(), "index": err.index() })),
    )
        .into_response()
}

/// The content type check tolerates parameters (`; charset=...`).
fn is_events_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|mime| mime == EVENTS_MEDIA_TYPE)
}

/// Decode the batch form first, then fall back to the legacy single-event
/// form. The envelope error is the one reported when both fail, since the
/// batch form is what current registries send.
fn decode_envelope(body: &[u8]) -> Result<Envelope, serde_json::Error> {
    match serde_json::from_slice::<Envelope>(body) {
        Ok(envelope) => Ok(envelope),
        Err(envelope_err) => match serde_json::from_slice::<RegistryEvent>(body) {
            Ok(event) => Ok(Envelope::single(event)),
            Err(_) => Err(envelope_err),
        },
    }
}
