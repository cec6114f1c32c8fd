// Prompt text and function schema for marketing-copy generation.

use serde_json::{json, Value};

pub const MARKETING_FUNCTION_NAME: &str = "generate_marketing_copy";

/// System prompt naming the target platforms and pinning the booking link into the CTA.
pub fn marketing_system_prompt(platform_names: &[&str], calendly_link: &str) -> String {
    format!(
        "You are a social media marketing expert. Generate engaging captions, relevant hashtags, \
         and compelling CTAs for {}. Always include the Calendly link: {calendly_link} in the CTA.",
        platform_names.join(", ")
    )
}

pub fn marketing_user_prompt(prompt: &str) -> String {
    format!("Create marketing copy for: {prompt}")
}

/// Function definition the model is forced to call, so the reply arrives as structured arguments.
pub fn marketing_function() -> Value {
    json!({
        "name": MARKETING_FUNCTION_NAME,
        "description": "Generate social media marketing copy",
        "parameters": {
            "type": "object",
            "properties": {
                "caption": {
                    "type": "string",
                    "description": "An engaging caption for the post"
                },
                "hashtags": {
                    "type": "string",
                    "description": "Relevant hashtags (15-20 hashtags)"
                },
                "cta": {
                    "type": "string",
                    "description": "Call-to-action that includes the Calendly booking link"
                }
            },
            "required": ["caption", "hashtags", "cta"]
        }
    })
}
