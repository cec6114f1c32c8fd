//! Studio Client: the dashboard's only way to reach the generation providers.
//!
//! Every call goes through this service's own proxy routes, so provider
//! credentials stay server-side. Nothing here knows an API key.

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod marketing;
pub mod prompts;
pub mod video;

pub use marketing::MarketingCopy;
pub use video::{task_path_segment, VideoTask};

pub const OPENAI_GENERATE_PATH: &str = "/api/openai-generate";
pub const RUNWAY_VIDEO_PATH: &str = "/api/runway-text-to-video";
pub const RUNWAY_TASK_PATH: &str = "/api/runway-task";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model response did not include a function call")]
    MissingFunctionCall,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Proxy errors are `{"error": "..."}`; OpenAI errors are `{"error": {"message": "..."}}`.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Plain(String),
    Nested { message: String },
}

fn error_message(body: String) -> String {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            error: ErrorDetail::Plain(message),
        })
        | Ok(ErrorBody {
            error: ErrorDetail::Nested { message },
        }) => message,
        Err(_) => body,
    }
}

#[derive(Clone)]
pub struct StudioClient {
    client: Client,
    base_url: String,
}

impl StudioClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "Calling studio proxy");
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "Calling studio proxy");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(body),
            });
        }

        serde_json::from_str(&body).map_err(ClientError::Parse)
    }
}
