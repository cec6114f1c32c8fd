//! Video generation kickoff and task polling.

use serde::{Deserialize, Serialize};

use super::{ClientError, StudioClient, RUNWAY_TASK_PATH, RUNWAY_VIDEO_PATH};

pub const VIDEO_DURATION_SECS: u32 = 10;
pub const VIDEO_RATIO: &str = "16:9";

#[derive(Debug, Clone, Serialize)]
pub struct VideoRequest<'a> {
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    pub duration: u32,
    pub ratio: &'a str,
}

impl<'a> VideoRequest<'a> {
    pub fn new(prompt: &'a str, image_url: Option<&'a str>) -> Self {
        Self {
            prompt,
            image_url,
            duration: VIDEO_DURATION_SECS,
            ratio: VIDEO_RATIO,
        }
    }
}

/// The parts of a Runway task the dashboard reads. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTask {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<Vec<String>>,
    #[serde(default)]
    pub failure: Option<String>,
}

/// Percent-encodes a task id as one path segment.
///
/// Form encoding writes spaces as `+`, which a path segment keeps literally.
pub fn task_path_segment(task_id: &str) -> String {
    url::form_urlencoded::byte_serialize(task_id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl StudioClient {
    pub async fn generate_video(
        &self,
        prompt: &str,
        image_url: Option<&str>,
    ) -> Result<VideoTask, ClientError> {
        self.post_json(RUNWAY_VIDEO_PATH, &VideoRequest::new(prompt, image_url))
            .await
    }

    pub async fn check_video_status(&self, task_id: &str) -> Result<VideoTask, ClientError> {
        let segment = task_path_segment(task_id);
        self.get_json(&format!("{RUNWAY_TASK_PATH}/{segment}")).await
    }
}
