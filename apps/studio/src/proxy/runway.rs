//! Runway video-generation and task-status proxies.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
};
use reqwest::header::CONTENT_TYPE;
use serde::de::IgnoredAny;
use tracing::debug;
use url::Url;

use crate::errors::AppError;
use crate::proxy::relay::{relay, ContentTypePolicy};
use crate::proxy::Capability;
use crate::state::AppState;

/// POST /api/runway-text-to-video
///
/// The body must be JSON and is otherwise forwarded byte for byte; Runway
/// decides what it accepts.
pub async fn handle_text_to_video(
    State(state): State<AppState>,
    raw: Bytes,
) -> Result<Response, AppError> {
    let capability = Capability::RunwayVideo;
    let key = capability.credential(&state.config)?;
    serde_json::from_slice::<IgnoredAny>(&raw).map_err(|e| capability.failure(e))?;

    let url = format!("{}/text-to-video", state.config.runway_base_url);
    debug!(%url, "Forwarding video generation");

    let upstream = state
        .http
        .post(url)
        .bearer_auth(key)
        .header(CONTENT_TYPE, "application/json")
        .body(raw)
        .send()
        .await
        .map_err(|e| capability.failure(e))?;

    relay(upstream, ContentTypePolicy::Upstream)
        .await
        .map_err(|e| capability.failure(e))
}

/// GET /api/runway-task/:id
pub async fn handle_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Response, AppError> {
    let capability = Capability::RunwayTask;
    let key = capability.credential(&state.config)?;
    let url = task_url(&state.config.runway_base_url, &task_id).map_err(|e| capability.failure(e))?;
    debug!(%url, "Polling video task");

    let upstream = state
        .http
        .get(url)
        .bearer_auth(key)
        .send()
        .await
        .map_err(|e| capability.failure(e))?;

    relay(upstream, ContentTypePolicy::Upstream)
        .await
        .map_err(|e| capability.failure(e))
}

/// `{base}/tasks/{id}` with the id percent-encoded as a single path segment.
fn task_url(base: &str, task_id: &str) -> Result<Url, String> {
    let mut url = Url::parse(base).map_err(|e| e.to_string())?;
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .push("tasks")
        .push(task_id);
    Ok(url)
}
