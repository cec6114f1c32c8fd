use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use tracing::debug;

/// Which `Content-Type` the relayed response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTypePolicy {
    /// Always `application/json`.
    Json,
    /// The upstream's own content type, or `application/json` when absent.
    Upstream,
}

/// Buffers an upstream response and rebuilds it as ours: same status, same
/// bytes. reqwest and axum sit on different `http` versions, so status and
/// header values are converted through their raw forms.
pub async fn relay(
    upstream: reqwest::Response,
    policy: ContentTypePolicy,
) -> Result<Response, reqwest::Error> {
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);

    let upstream_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());

    let content_type = match policy {
        ContentTypePolicy::Json => None,
        ContentTypePolicy::Upstream => upstream_type,
    }
    .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let body = upstream.bytes().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "Relaying upstream response");

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}
