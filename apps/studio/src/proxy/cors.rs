use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use super::Capability;

const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Stamps the three CORS headers onto every response of a proxy route,
/// including preflights, 405s and errors.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(origin: &str) -> Self {
        let allow_origin = HeaderValue::from_str(origin).unwrap_or_else(|_| {
            warn!("PUBLIC_APP_URL is not a valid header value, allowing any origin");
            HeaderValue::from_static("*")
        });
        Self { allow_origin }
    }

    pub fn apply<S>(&self, router: Router<S>, capability: Capability) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    self.allow_origin.clone(),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(capability.allowed_methods()),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(ALLOW_HEADERS),
                )),
        )
    }
}
