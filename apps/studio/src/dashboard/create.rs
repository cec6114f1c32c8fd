//! Content creation flow: marketing copy first, then the video kickoff for video posts.

use tracing::info;

use crate::client::{ClientError, StudioClient};
use crate::models::generation::{ContentType, GenerationRequest, GenerationResult};

pub const STATUS_GENERATING_COPY: &str = "Generating AI marketing copy...";
pub const STATUS_GENERATING_VIDEO: &str = "Generating video with Runway AI...";
pub const STATUS_VIDEO_STARTED: &str = "Video generation started! Check back in a few minutes.";
pub const STATUS_CONTENT_READY: &str = "Content generated successfully!";
/// Result status for image posts, which need no background task.
pub const IMAGE_READY: &str = "ready";

/// Runs one generation. Any failure ends the whole submission.
pub async fn run_generation(
    client: &StudioClient,
    request: &GenerationRequest,
) -> Result<GenerationResult, ClientError> {
    info!(
        content_type = request.content_type.as_str(),
        platforms = request.platforms.len(),
        "{STATUS_GENERATING_COPY}"
    );
    let copy = client
        .generate_marketing_copy(
            &request.prompt,
            &request.calendly_link,
            &request.platform_names(),
        )
        .await?;

    let (task_id, status) = match request.content_type {
        ContentType::Video => {
            info!("{STATUS_GENERATING_VIDEO}");
            let task = client.generate_video(&request.prompt, None).await?;
            info!(task_id = %task.id, "Video task accepted");
            (Some(task.id), task.status)
        }
        ContentType::Image => (None, Some(IMAGE_READY.to_string())),
    };

    Ok(GenerationResult {
        content_type: request.content_type,
        title: request.title.clone(),
        prompt: request.prompt.clone(),
        platforms: request.platforms.iter().copied().collect(),
        copy,
        task_id,
        status,
    })
}

/// Final status line shown after a successful generation.
pub fn completion_message(result: &GenerationResult) -> &'static str {
    match result.content_type {
        ContentType::Video => STATUS_VIDEO_STARTED,
        ContentType::Image => STATUS_CONTENT_READY,
    }
}
