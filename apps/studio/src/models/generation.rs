use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::MarketingCopy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Video,
    Image,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Image => "image",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ContentType::Video),
            "image" => Ok(ContentType::Image),
            other => Err(format!("Unknown content type: {other}")),
        }
    }
}

/// A social platform the copy is written for. Ordering follows the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
    Youtube,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Youtube,
        Platform::Twitter,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::Twitter => "twitter",
        }
    }

    /// Name used in prompts and on screen.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Youtube => "YouTube",
            Platform::Twitter => "Twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| format!("Unknown platform: {s}"))
    }
}

pub const INCOMPLETE_FORM: &str = "Please fill in all fields and select at least one platform";

/// Raw submission, as it arrives from the form or the JSON endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentRequest {
    #[serde(default, alias = "contentType")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// A validated generation request. Lives for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub content_type: ContentType,
    pub title: String,
    pub prompt: String,
    pub platforms: BTreeSet<Platform>,
    pub calendly_link: String,
}

impl GenerateContentRequest {
    pub fn validate(&self, calendly_link: &str) -> Result<GenerationRequest, String> {
        let content_type = match self.content_type.as_deref() {
            None | Some("") => ContentType::default(),
            Some(raw) => raw.parse()?,
        };

        let platforms = self
            .platforms
            .iter()
            .map(|p| p.parse::<Platform>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        if self.title.trim().is_empty() || self.prompt.trim().is_empty() || platforms.is_empty() {
            return Err(INCOMPLETE_FORM.to_string());
        }

        Ok(GenerationRequest {
            content_type,
            title: self.title.trim().to_string(),
            prompt: self.prompt.trim().to_string(),
            platforms,
            calendly_link: calendly_link.to_string(),
        })
    }
}

impl GenerationRequest {
    pub fn platform_names(&self) -> Vec<&'static str> {
        self.platforms.iter().map(|p| p.name()).collect()
    }
}

/// What the dashboard shows after a generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub prompt: String,
    pub platforms: Vec<Platform>,
    #[serde(flatten)]
    pub copy: MarketingCopy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
