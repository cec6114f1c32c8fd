use anyhow::{Context, Result};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_RUNWAY_BASE_URL: &str = "https://api.runwayml.com/v1";
pub const DEFAULT_CALENDLY_LINK: &str = "https://calendly.com/your-link";

/// Application configuration loaded from environment variables.
///
/// Provider credentials are optional here: a missing key is reported per
/// request by the proxy handler that needs it, not at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub runway_api_key: Option<String>,
    /// Value for `Access-Control-Allow-Origin`.
    pub public_app_url: String,
    pub openai_base_url: String,
    pub runway_base_url: String,
    /// Base URL the client wrappers use to reach this service's proxy routes.
    pub proxy_base_url: String,
    pub default_calendly_link: String,
    pub auth_sign_out_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            runway_api_key: optional_env("RUNWAY_API_KEY"),
            public_app_url: optional_env("PUBLIC_APP_URL").unwrap_or_else(|| "*".to_string()),
            openai_base_url: base_url_env("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)?,
            runway_base_url: base_url_env("RUNWAY_BASE_URL", DEFAULT_RUNWAY_BASE_URL)?,
            proxy_base_url: base_url_env("STUDIO_PROXY_URL", &format!("http://127.0.0.1:{port}"))?,
            default_calendly_link: optional_env("DEFAULT_CALENDLY_LINK")
                .unwrap_or_else(|| DEFAULT_CALENDLY_LINK.to_string()),
            auth_sign_out_url: optional_env("AUTH_SIGN_OUT_URL"),
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Empty values count as unset, matching how the credentials are checked.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn base_url_env(key: &str, default: &str) -> Result<String> {
    let raw = optional_env(key).unwrap_or_else(|| default.to_string());
    url::Url::parse(&raw).with_context(|| format!("{key} must be an absolute URL, got '{raw}'"))?;
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
impl Config {
    /// Configuration pointing every upstream at `upstream` with both keys set.
    pub fn for_tests(upstream: &str) -> Self {
        Config {
            openai_api_key: Some("sk-test-openai".to_string()),
            runway_api_key: Some("rw-test-runway".to_string()),
            public_app_url: "*".to_string(),
            openai_base_url: upstream.trim_end_matches('/').to_string(),
            runway_base_url: upstream.trim_end_matches('/').to_string(),
            proxy_base_url: "http://127.0.0.1:9".to_string(),
            default_calendly_link: DEFAULT_CALENDLY_LINK.to_string(),
            auth_sign_out_url: None,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_env_strips_trailing_slash() {
        let url = base_url_env("STUDIO_TEST_UNSET_BASE_URL", "https://api.example.com/v1/").unwrap();
        assert_eq!(url, "https://api.example.com/v1");
    }

    #[test]
    fn test_base_url_env_rejects_relative_url() {
        assert!(base_url_env("STUDIO_TEST_UNSET_BASE_URL", "/v1").is_err());
    }

    #[test]
    fn test_optional_env_treats_unset_as_none() {
        assert_eq!(optional_env("STUDIO_TEST_DEFINITELY_UNSET"), None);
    }
}
