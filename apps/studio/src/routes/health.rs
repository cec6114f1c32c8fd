use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and which provider credentials are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "content-studio",
        "providers": {
            "openai": state.config.openai_api_key.is_some(),
            "runway": state.config.runway_api_key.is_some()
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routes::build_router;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_health_reports_providers_without_keys() {
        let mut config = Config::for_tests("http://127.0.0.1:9");
        config.runway_api_key = None;
        let server = TestServer::new(build_router(AppState::for_tests(config))).unwrap();

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["providers"], json!({"openai": true, "runway": false}));
        assert!(!response.text().contains("sk-test-openai"));
    }
}
