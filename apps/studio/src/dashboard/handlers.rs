//! Axum route handlers for the dashboard and the JSON generation endpoint.

use axum::{
    extract::{Path, Query, RawForm, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::dashboard::create::{completion_message, run_generation};
use crate::dashboard::settings::{validate_calendly_link, SETTINGS_SAVED};
use crate::dashboard::views::{
    render_dashboard, CreatePanel, DashboardPage, Panel, SettingsPanel, StatusLine,
};
use crate::dashboard::{Session, Tab};
use crate::errors::AppError;
use crate::models::generation::{GenerateContentRequest, GenerationResult, Platform};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TabQuery {
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub calendly_link: String,
}

fn render(state: &AppState, session: &Session, panel: Panel) -> Result<Html<String>, AppError> {
    let html = render_dashboard(&DashboardPage {
        email: session.email.as_deref(),
        sign_out_url: state.config.auth_sign_out_url.as_deref(),
        panel,
    })
    .map_err(anyhow::Error::from)?;
    Ok(Html(html))
}

/// The user's saved Calendly link, or the configured default.
async fn calendly_link_for(state: &AppState, session: &Session) -> Result<String, AppError> {
    Ok(state
        .settings
        .calendly_link(&session.user_id)
        .await?
        .unwrap_or_else(|| state.config.default_calendly_link.clone()))
}

async fn settings_panel(state: &AppState, session: &Session) -> Result<SettingsPanel, AppError> {
    Ok(SettingsPanel {
        calendly_link: calendly_link_for(state, session).await?,
        openai_configured: state.config.openai_api_key.is_some(),
        runway_configured: state.config.runway_api_key.is_some(),
        ..SettingsPanel::default()
    })
}

/// Reads the create form. `platforms` repeats once per ticked checkbox.
pub fn parse_create_form(raw: &[u8]) -> GenerateContentRequest {
    let mut form = GenerateContentRequest::default();
    for (key, value) in url::form_urlencoded::parse(raw) {
        match key.as_ref() {
            "content_type" => form.content_type = Some(value.into_owned()),
            "title" => form.title = value.into_owned(),
            "prompt" => form.prompt = value.into_owned(),
            "platforms" => form.platforms.push(value.into_owned()),
            _ => {}
        }
    }
    form
}

/// Echoes a submission back into the form, dropping values that don't parse.
fn create_panel_from(form: &GenerateContentRequest) -> CreatePanel {
    CreatePanel {
        content_type: form
            .content_type
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or_default(),
        title: form.title.clone(),
        prompt: form.prompt.clone(),
        platforms: form
            .platforms
            .iter()
            .filter_map(|p| p.parse::<Platform>().ok())
            .collect(),
        status: None,
        result: None,
    }
}

/// GET /
pub async fn handle_root() -> Redirect {
    Redirect::to("/dashboard")
}

/// GET /dashboard?tab=create|library|settings
pub async fn handle_dashboard(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<TabQuery>,
) -> Result<Html<String>, AppError> {
    let panel = match Tab::parse_or_default(query.tab.as_deref()) {
        Tab::Create => Panel::Create(CreatePanel::default()),
        Tab::Library => Panel::Library,
        Tab::Settings => Panel::Settings(settings_panel(&state, &session).await?),
    };
    render(&state, &session, panel)
}

/// POST /dashboard/create
pub async fn handle_create(
    State(state): State<AppState>,
    session: Session,
    RawForm(raw): RawForm,
) -> Result<Html<String>, AppError> {
    let form = parse_create_form(&raw);
    let mut panel = create_panel_from(&form);
    let calendly_link = calendly_link_for(&state, &session).await?;

    match form.validate(&calendly_link) {
        Err(message) => panel.status = Some(StatusLine::error(message)),
        Ok(request) => match run_generation(&state.studio, &request).await {
            Ok(result) => {
                info!(user_id = %session.user_id, "Content generated");
                panel.status = Some(StatusLine::info(completion_message(&result)));
                panel.result = Some(result);
            }
            Err(e) => {
                warn!(user_id = %session.user_id, "Content generation failed: {e}");
                panel.status = Some(StatusLine::error(e));
            }
        },
    }

    render(&state, &session, Panel::Create(panel))
}

/// POST /dashboard/settings
pub async fn handle_save_settings(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SettingsForm>,
) -> Result<Html<String>, AppError> {
    let mut panel = settings_panel(&state, &session).await?;

    match validate_calendly_link(&form.calendly_link) {
        Ok(link) => {
            state
                .settings
                .save_calendly_link(&session.user_id, &link)
                .await?;
            info!(user_id = %session.user_id, "Calendly link saved");
            panel.calendly_link = link;
            panel.message = Some(SETTINGS_SAVED.to_string());
        }
        Err(message) => {
            panel.calendly_link = form.calendly_link;
            panel.error = Some(message);
        }
    }

    render(&state, &session, Panel::Settings(panel))
}

/// GET /dashboard/tasks/:id
pub async fn handle_task_status(
    State(state): State<AppState>,
    session: Session,
    Path(task_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let task = state
        .studio
        .check_video_status(&task_id)
        .await
        .map_err(|e| e.to_string());
    render(&state, &session, Panel::Task(task))
}

/// POST /api/studio/generate
///
/// Same flow as the create form, as JSON.
pub async fn handle_generate(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<GenerateContentRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let calendly_link = calendly_link_for(&state, &session).await?;
    let request = request
        .validate(&calendly_link)
        .map_err(AppError::Validation)?;

    let result = run_generation(&state.studio, &request).await?;
    Ok(Json(result))
}
