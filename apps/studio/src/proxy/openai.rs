//! Chat-completion and image-generation proxy.

use axum::{body::Bytes, extract::State, response::Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::proxy::relay::{relay, ContentTypePolicy};
use crate::proxy::Capability;
use crate::state::AppState;

/// Model used for every chat completion routed through the proxy.
pub const CHAT_MODEL: &str = "gpt-4o-mini";
/// Model used for every image generation routed through the proxy.
pub const IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Inbound body. Fields are kept as raw JSON and forwarded untouched.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub prompt: Option<Value>,
    pub messages: Option<Value>,
    pub temperature: Option<Value>,
    pub size: Option<Value>,
    pub functions: Option<Value>,
    pub function_call: Option<Value>,
}

impl GenerateBody {
    /// Parses the raw request body. Non-object JSON is treated as an empty request.
    pub fn parse(raw: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(raw)? {
            body @ Value::Object(_) => serde_json::from_value(body),
            _ => Ok(Self::default()),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(&self.kind, Some(Value::String(kind)) if kind == "image")
    }
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a Value>,
    size: Value,
    n: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages: Option<&'a Value>,
    temperature: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    functions: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<&'a Value>,
}

/// Empty, zero and false sizes fall back to the default, like any unset size.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// POST /api/openai-generate
///
/// `type: "image"` goes to the image endpoint, everything else to chat completions.
pub async fn handle_generate(
    State(state): State<AppState>,
    raw: Bytes,
) -> Result<Response, AppError> {
    let capability = Capability::OpenAiGenerate;
    let key = capability.credential(&state.config)?;
    let body = GenerateBody::parse(&raw).map_err(|e| capability.failure(e))?;

    let request = if body.is_image() {
        let payload = ImageGenerationRequest {
            model: IMAGE_MODEL,
            prompt: body.prompt.as_ref(),
            size: body
                .size
                .clone()
                .filter(|s| !is_blank(s))
                .unwrap_or_else(|| json!(DEFAULT_IMAGE_SIZE)),
            n: 1,
        };
        let url = format!("{}/images/generations", state.config.openai_base_url);
        debug!(%url, "Forwarding image generation");
        state.http.post(url).bearer_auth(key).json(&payload)
    } else {
        let payload = ChatCompletionRequest {
            model: CHAT_MODEL,
            messages: body.messages.as_ref(),
            temperature: body
                .temperature
                .clone()
                .unwrap_or_else(|| json!(DEFAULT_TEMPERATURE)),
            functions: body.functions.as_ref(),
            function_call: body.function_call.as_ref(),
        };
        let url = format!("{}/chat/completions", state.config.openai_base_url);
        debug!(%url, "Forwarding chat completion");
        state.http.post(url).bearer_auth(key).json(&payload)
    };

    let upstream = request.send().await.map_err(|e| capability.failure(e))?;
    relay(upstream, ContentTypePolicy::Json)
        .await
        .map_err(|e| capability.failure(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::proxy::test_support::proxy_server;
    use axum::http::{Method, StatusCode};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ROUTE: &str = "/api/openai-generate";
    const CHAT_BODY: &str = r#"{"id":"chatcmpl-1","choices":[{"message":{"content":"Hello"}}]}"#;

    #[test]
    fn test_parse_non_object_body_is_empty_request() {
        let body = GenerateBody::parse(b"[1, 2, 3]").unwrap();
        assert!(!body.is_image());
        assert!(body.messages.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(GenerateBody::parse(b"{not json").is_err());
    }

    #[test]
    fn test_is_image_requires_exact_string() {
        let body = GenerateBody::parse(br#"{"type":"image"}"#).unwrap();
        assert!(body.is_image());
        let body = GenerateBody::parse(br#"{"type":"IMAGE"}"#).unwrap();
        assert!(!body.is_image());
        let body = GenerateBody::parse(br#"{"type":1}"#).unwrap();
        assert!(!body.is_image());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!(null)));
        assert!(!is_blank(&json!("512x512")));
    }

    #[tokio::test]
    async fn test_chat_request_without_type_hits_chat_endpoint() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test-openai"))
            .and(body_partial_json(json!({
                "model": CHAT_MODEL,
                "temperature": DEFAULT_TEMPERATURE,
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(CHAT_BODY, "application/json"))
            .expect(1)
            .mount(&upstream)
            .await;
        Mock::given(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let server = proxy_server(Config::for_tests(&upstream.uri()));
        let response = server
            .post(ROUTE)
            .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), CHAT_BODY);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_image_request_uses_default_size() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(body_partial_json(json!({
                "model": IMAGE_MODEL,
                "prompt": "a red bicycle",
                "size": "1024x1024",
                "n": 1
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": "https://img"}]})),
            )
            .expect(1)
            .mount(&upstream)
            .await;

        let server = proxy_server(Config::for_tests(&upstream.uri()));
        let response = server
            .post(ROUTE)
            .json(&json!({"type": "image", "prompt": "a red bicycle"}))
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_image_request_keeps_explicit_size() {
        let upstream = MockServer::start().await;
        Mock::given(path("/images/generations"))
            .and(body_partial_json(json!({"size": "512x512"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&upstream)
            .await;

        let server = proxy_server(Config::for_tests(&upstream.uri()));
        server
            .post(ROUTE)
            .json(&json!({"type": "image", "prompt": "x", "size": "512x512"}))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_function_call_fields_are_forwarded() {
        let upstream = MockServer::start().await;
        Mock::given(path("/chat/completions"))
            .and(body_partial_json(json!({
                "function_call": {"name": "generate_marketing_copy"},
                "temperature": 0.2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .expect(1)
            .mount(&upstream)
            .await;

        let server = proxy_server(Config::for_tests(&upstream.uri()));
        server
            .post(ROUTE)
            .json(&json!({
                "messages": [],
                "temperature": 0.2,
                "functions": [{"name": "generate_marketing_copy"}],
                "function_call": {"name": "generate_marketing_copy"}
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_upstream_errors_are_relayed_verbatim() {
        let upstream = MockServer::start().await;
        let error_body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        Mock::given(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_raw(error_body, "application/json"))
            .mount(&upstream)
            .await;

        let server = proxy_server(Config::for_tests(&upstream.uri()));
        let response = server.post(ROUTE).json(&json!({"messages": []})).await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.text(), error_body);
    }

    #[tokio::test]
    async fn test_upstream_server_error_is_relayed_verbatim() {
        let upstream = MockServer::start().await;
        Mock::given(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&upstream)
            .await;

        let server = proxy_server(Config::for_tests(&upstream.uri()));
        let response = server.post(ROUTE).json(&json!({"messages": []})).await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.text(), "upstream down");
    }

    #[tokio::test]
    async fn test_disallowed_methods_never_reach_upstream() {
        let upstream = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let server = proxy_server(Config::for_tests(&upstream.uri()));
        for verb in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let response = server.method(verb, ROUTE).await;
            response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(
                response.json::<Value>(),
                json!({"error": "Method not allowed"})
            );
            assert!(response.headers().contains_key("access-control-allow-origin"));
        }
    }

    #[tokio::test]
    async fn test_missing_credential_never_reaches_upstream() {
        let upstream = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let mut config = Config::for_tests(&upstream.uri());
        config.openai_api_key = None;
        let server = proxy_server(config);
        let response = server.post(ROUTE).json(&json!({"messages": []})).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "OPENAI_API_KEY missing"})
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_local_failure() {
        let upstream = MockServer::start().await;
        let server = proxy_server(Config::for_tests(&upstream.uri()));
        let response = server.post(ROUTE).text("{not json").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_options_preflight_returns_no_content() {
        let server = proxy_server(Config::for_tests("http://127.0.0.1:9"));
        let response = server.method(Method::OPTIONS, ROUTE).await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.text().is_empty());
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "POST, OPTIONS"
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "Content-Type, Authorization"
        );
    }
}
