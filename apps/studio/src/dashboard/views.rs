//! Server-rendered HTML for the dashboard.
//!
//! Each panel is an askama template under `templates/` extending `base.html`,
//! which draws the navigation bar and the tab bar. Template output is
//! HTML-escaped by default.

use std::collections::BTreeSet;

use askama::Template;

use crate::client::{task_path_segment, VideoTask};
use crate::dashboard::create::{STATUS_GENERATING_COPY, STATUS_GENERATING_VIDEO};
use crate::dashboard::Tab;
use crate::models::generation::{ContentType, GenerationResult, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// A status line under the create form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            kind: StatusKind::Error,
            text: format!("Error: {message}"),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            StatusKind::Info => "status",
            StatusKind::Error => "status error",
        }
    }
}

/// A radio button or checkbox in the create form.
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Where the "Check status" link of a started video points.
pub struct TaskLink {
    pub id: String,
    pub href: String,
}

impl TaskLink {
    pub fn new(task_id: &str) -> Self {
        Self {
            id: task_id.to_string(),
            href: format!("/dashboard/tasks/{}", task_path_segment(task_id)),
        }
    }
}

/// Values echoed back into the create form.
#[derive(Debug, Clone)]
pub struct CreatePanel {
    pub content_type: ContentType,
    pub title: String,
    pub prompt: String,
    pub platforms: BTreeSet<Platform>,
    pub status: Option<StatusLine>,
    pub result: Option<GenerationResult>,
}

impl Default for CreatePanel {
    fn default() -> Self {
        Self {
            content_type: ContentType::Video,
            title: String::new(),
            prompt: String::new(),
            platforms: BTreeSet::from([Platform::Instagram]),
            status: None,
            result: None,
        }
    }
}

impl CreatePanel {
    fn content_types(&self) -> Vec<Choice> {
        [(ContentType::Video, "AI Video"), (ContentType::Image, "Image Post")]
            .into_iter()
            .map(|(kind, label)| Choice {
                value: kind.as_str(),
                label,
                checked: self.content_type == kind,
            })
            .collect()
    }

    fn platforms(&self) -> Vec<Choice> {
        Platform::ALL
            .into_iter()
            .map(|platform| Choice {
                value: platform.id(),
                label: platform.name(),
                checked: self.platforms.contains(&platform),
            })
            .collect()
    }

    fn prompt_placeholder(&self) -> &'static str {
        match self.content_type {
            ContentType::Video => "Describe the video you want to create...",
            ContentType::Image => "Describe your image post concept...",
        }
    }

    /// Only video results carry a task to check on.
    fn task_link(&self) -> Option<TaskLink> {
        let result = self.result.as_ref()?;
        match (result.content_type, &result.task_id) {
            (ContentType::Video, Some(task_id)) => Some(TaskLink::new(task_id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    pub calendly_link: String,
    pub message: Option<String>,
    pub error: Option<String>,
    pub openai_configured: bool,
    pub runway_configured: bool,
}

pub struct ApiStatus {
    pub name: &'static str,
    pub configured: bool,
}

impl ApiStatus {
    fn badge_class(&self) -> &'static str {
        if self.configured {
            "on"
        } else {
            "off"
        }
    }

    fn badge_label(&self) -> &'static str {
        if self.configured {
            "Connected"
        } else {
            "Not configured"
        }
    }
}

impl SettingsPanel {
    fn apis(&self) -> Vec<ApiStatus> {
        vec![
            ApiStatus {
                name: "OpenAI API",
                configured: self.openai_configured,
            },
            ApiStatus {
                name: "Runway API",
                configured: self.runway_configured,
            },
        ]
    }
}

pub enum Panel {
    Create(CreatePanel),
    Library,
    Settings(SettingsPanel),
    Task(Result<VideoTask, String>),
}

impl Panel {
    fn tab(&self) -> Tab {
        match self {
            Panel::Create(_) | Panel::Task(_) => Tab::Create,
            Panel::Library => Tab::Library,
            Panel::Settings(_) => Tab::Settings,
        }
    }
}

/// Everything the shell needs to render one page.
pub struct DashboardPage<'a> {
    pub email: Option<&'a str>,
    pub sign_out_url: Option<&'a str>,
    pub panel: Panel,
}

pub struct TabLink {
    pub id: &'static str,
    pub label: &'static str,
    pub class: &'static str,
}

/// Navigation and tab bar, drawn by `base.html`.
pub struct Shell<'a> {
    pub email: Option<&'a str>,
    pub sign_out_url: Option<&'a str>,
    pub tabs: Vec<TabLink>,
}

impl<'a> Shell<'a> {
    fn new(page: &DashboardPage<'a>) -> Self {
        let active = page.panel.tab();
        Self {
            email: page.email,
            sign_out_url: page.sign_out_url,
            tabs: Tab::ALL
                .into_iter()
                .map(|tab| TabLink {
                    id: tab.as_str(),
                    label: tab.label(),
                    class: if tab == active { "tab active" } else { "tab" },
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "create.html")]
struct CreateTemplate<'a> {
    shell: Shell<'a>,
    panel: &'a CreatePanel,
    copy_status: &'static str,
    video_status: &'static str,
}

#[derive(Template)]
#[template(path = "library.html")]
struct LibraryTemplate<'a> {
    shell: Shell<'a>,
}

#[derive(Template)]
#[template(path = "settings.html")]
struct SettingsTemplate<'a> {
    shell: Shell<'a>,
    panel: &'a SettingsPanel,
}

#[derive(Template)]
#[template(path = "task.html")]
struct TaskTemplate<'a> {
    shell: Shell<'a>,
    task: Result<&'a VideoTask, StatusLine>,
}

pub fn render_dashboard(page: &DashboardPage<'_>) -> askama::Result<String> {
    let shell = Shell::new(page);
    match &page.panel {
        Panel::Create(panel) => CreateTemplate {
            shell,
            panel,
            copy_status: STATUS_GENERATING_COPY,
            video_status: STATUS_GENERATING_VIDEO,
        }
        .render(),
        Panel::Library => LibraryTemplate { shell }.render(),
        Panel::Settings(panel) => SettingsTemplate { shell, panel }.render(),
        Panel::Task(task) => TaskTemplate {
            shell,
            task: task.as_ref().map_err(StatusLine::error),
        }
        .render(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MarketingCopy;

    fn page(panel: Panel) -> String {
        render_dashboard(&DashboardPage {
            email: Some("ana@example.com"),
            sign_out_url: Some("https://auth.example.com/logout"),
            panel,
        })
        .unwrap()
    }

    fn video_result(task_id: &str) -> GenerationResult {
        GenerationResult {
            content_type: ContentType::Video,
            title: "Summer Launch".to_string(),
            prompt: "beach".to_string(),
            platforms: vec![Platform::Instagram],
            copy: MarketingCopy {
                caption: "Golden hour".to_string(),
                hashtags: "#summer".to_string(),
                cta: "Book now".to_string(),
            },
            task_id: Some(task_id.to_string()),
            status: Some("PENDING".to_string()),
        }
    }

    #[test]
    fn test_shell_shows_user_and_active_tab() {
        let html = page(Panel::Library);
        assert!(html.contains("ana@example.com"));
        assert!(html.contains("Sign Out"));
        assert!(html.contains("class=\"tab active\" href=\"/dashboard?tab=library\""));
        assert!(html.contains("class=\"tab\" href=\"/dashboard?tab=create\""));
        assert!(html.contains("No content yet"));
    }

    #[test]
    fn test_sign_out_hidden_without_url() {
        let html = render_dashboard(&DashboardPage {
            email: None,
            sign_out_url: None,
            panel: Panel::Library,
        })
        .unwrap();
        assert!(!html.contains("Sign Out"));
    }

    #[test]
    fn test_create_form_escapes_input() {
        let panel = CreatePanel {
            title: "<script>x</script>".to_string(),
            prompt: "\"quoted\" & more".to_string(),
            ..CreatePanel::default()
        };
        let html = page(Panel::Create(panel));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&quot;quoted&quot; &amp; more"));
        assert!(html.contains("value=\"instagram\" checked"));
        assert!(html.contains("value=\"video\" checked"));
        assert!(!html.contains("value=\"tiktok\" checked"));
    }

    #[test]
    fn test_create_form_shows_progress_lines_on_submit() {
        let html = page(Panel::Create(CreatePanel::default()));
        assert!(html.contains("<div id=\"progress\" class=\"status\" hidden>"));
        assert!(html.contains(&format!("<p>{STATUS_GENERATING_COPY}</p>")));
        assert!(html.contains(&format!("<p id=\"progress-video\" hidden>{STATUS_GENERATING_VIDEO}</p>")));
        assert!(html.contains("addEventListener('submit'"));
        assert!(html.contains("document.getElementById('progress').hidden = false"));
    }

    #[test]
    fn test_video_result_shows_task() {
        let panel = CreatePanel {
            status: Some(StatusLine::info("Video generation started! Check back in a few minutes.")),
            result: Some(video_result("task-1")),
            ..CreatePanel::default()
        };
        let html = page(Panel::Create(panel));
        assert!(html.contains("Video Task ID: <code>task-1</code>"));
        assert!(html.contains("2-5 minutes"));
        assert!(html.contains("Golden hour"));
        assert!(html.contains(
            "<div class=\"status\">Video generation started! Check back in a few minutes.</div>"
        ));
        assert!(html.contains("href=\"/dashboard/tasks/task-1\""));
    }

    #[test]
    fn test_task_link_encodes_spaces_as_path_escapes() {
        let panel = CreatePanel {
            result: Some(video_result("task 1")),
            ..CreatePanel::default()
        };
        let html = page(Panel::Create(panel));
        assert!(html.contains("href=\"/dashboard/tasks/task%201\""));
        assert!(!html.contains("task+1"));
    }

    #[test]
    fn test_image_result_has_no_task_link() {
        let mut result = video_result("ignored");
        result.content_type = ContentType::Image;
        let panel = CreatePanel {
            result: Some(result),
            ..CreatePanel::default()
        };
        let html = page(Panel::Create(panel));
        assert!(!html.contains("Video Task ID"));
    }

    #[test]
    fn test_status_kind_drives_styling() {
        let failed = StatusLine::error("boom");
        assert_eq!(failed.kind, StatusKind::Error);
        assert_eq!(failed.text, "Error: boom");
        assert_eq!(failed.css_class(), "status error");

        // Info text that happens to mention an error is still info.
        let info = StatusLine::info("Error reports are emailed weekly");
        assert_eq!(info.kind, StatusKind::Info);
        assert_eq!(info.css_class(), "status");
    }

    #[test]
    fn test_settings_reports_credentials() {
        let html = page(Panel::Settings(SettingsPanel {
            calendly_link: "https://calendly.com/acme".to_string(),
            openai_configured: true,
            runway_configured: false,
            ..SettingsPanel::default()
        }));
        assert!(html.contains("value=\"https://calendly.com/acme\""));
        assert!(html.contains("<span class=\"badge on\">Connected</span>"));
        assert!(html.contains("<span class=\"badge off\">Not configured</span>"));
    }

    #[test]
    fn test_task_panel_failure_is_an_error_line() {
        let html = page(Panel::Task(Err("API error (status 404): Task not found".to_string())));
        assert!(html.contains(
            "<div class=\"status error\">Error: API error (status 404): Task not found</div>"
        ));
    }
}
