//! Credential-injecting proxy routes for the upstream providers.
//!
//! One handler per upstream capability. Every handler shares the same policy:
//! OPTIONS answers 204, other methods outside the allowed set answer 405, a
//! missing credential answers 500, and anything the upstream returns is
//! relayed unchanged. No upstream call is made before those checks pass.

pub mod cors;
pub mod openai;
pub mod relay;
pub mod runway;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

pub use cors::CorsPolicy;

/// An upstream capability exposed through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Chat completions and image generation.
    OpenAiGenerate,
    /// Runway text-to-video kickoff.
    RunwayVideo,
    /// Runway task status polling.
    RunwayTask,
}

impl Capability {
    /// Environment variable holding the credential for this capability.
    pub fn credential_var(self) -> &'static str {
        match self {
            Capability::OpenAiGenerate => "OPENAI_API_KEY",
            Capability::RunwayVideo | Capability::RunwayTask => "RUNWAY_API_KEY",
        }
    }

    /// Message used when a local failure carries no message of its own.
    pub fn failure_message(self) -> &'static str {
        match self {
            Capability::OpenAiGenerate => "OpenAI proxy failed",
            Capability::RunwayVideo => "Runway proxy failed",
            Capability::RunwayTask => "Runway task poll failed",
        }
    }

    /// Value of `Access-Control-Allow-Methods`.
    pub fn allowed_methods(self) -> &'static str {
        match self {
            Capability::OpenAiGenerate | Capability::RunwayVideo => "POST, OPTIONS",
            Capability::RunwayTask => "GET, OPTIONS",
        }
    }

    /// Looks up the server-held credential, failing with the variable name.
    pub fn credential(self, config: &Config) -> Result<&str, AppError> {
        let key = match self {
            Capability::OpenAiGenerate => config.openai_api_key.as_deref(),
            Capability::RunwayVideo | Capability::RunwayTask => config.runway_api_key.as_deref(),
        };
        key.ok_or(AppError::MissingCredential(self.credential_var()))
    }

    /// Wraps a local failure for this capability.
    pub fn failure(self, err: impl std::fmt::Display) -> AppError {
        AppError::proxy(err, self.failure_message())
    }
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Builds the proxy routes, each wrapped in its own CORS policy.
pub fn proxy_routes(config: &Config) -> Router<AppState> {
    let cors = CorsPolicy::new(&config.public_app_url);

    let openai = Router::new().route(
        "/api/openai-generate",
        post(openai::handle_generate)
            .options(preflight)
            .fallback(method_not_allowed),
    );

    let video = Router::new().route(
        "/api/runway-text-to-video",
        post(runway::handle_text_to_video)
            .options(preflight)
            .fallback(method_not_allowed),
    );

    // HEAD is registered explicitly; axum would otherwise serve it from the GET handler.
    let task = Router::new().route(
        "/api/runway-task/:id",
        get(runway::handle_task_status)
            .head(method_not_allowed)
            .options(preflight)
            .fallback(method_not_allowed),
    );

    Router::new()
        .merge(cors.apply(openai, Capability::OpenAiGenerate))
        .merge(cors.apply(video, Capability::RunwayVideo))
        .merge(cors.apply(task, Capability::RunwayTask))
}
