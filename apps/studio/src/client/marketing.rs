//! Marketing copy: caption, hashtags and CTA via a forced function call.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::prompts::{
    marketing_function, marketing_system_prompt, marketing_user_prompt, MARKETING_FUNCTION_NAME,
};
use super::{ClientError, StudioClient, OPENAI_GENERATE_PATH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingCopy {
    pub caption: String,
    pub hashtags: String,
    pub cta: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    /// JSON-encoded arguments, as a string.
    arguments: String,
}

/// Builds the chat request body sent to the proxy.
pub fn marketing_request(prompt: &str, calendly_link: &str, platform_names: &[&str]) -> Value {
    json!({
        "messages": [
            {
                "role": "system",
                "content": marketing_system_prompt(platform_names, calendly_link)
            },
            {
                "role": "user",
                "content": marketing_user_prompt(prompt)
            }
        ],
        "functions": [marketing_function()],
        "function_call": { "name": MARKETING_FUNCTION_NAME }
    })
}

/// Extracts the marketing copy from the first choice's function-call arguments.
pub fn parse_marketing_copy(completion: Value) -> Result<MarketingCopy, ClientError> {
    let completion: ChatCompletion = serde_json::from_value(completion)?;
    let call = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.function_call)
        .ok_or(ClientError::MissingFunctionCall)?;

    Ok(serde_json::from_str(&call.arguments)?)
}

impl StudioClient {
    pub async fn generate_marketing_copy(
        &self,
        prompt: &str,
        calendly_link: &str,
        platform_names: &[&str],
    ) -> Result<MarketingCopy, ClientError> {
        let body = marketing_request(prompt, calendly_link, platform_names);
        let completion: Value = self.post_json(OPENAI_GENERATE_PATH, &body).await?;
        let copy = parse_marketing_copy(completion)?;
        debug!(caption_len = copy.caption.len(), "Marketing copy generated");
        Ok(copy)
    }
}
