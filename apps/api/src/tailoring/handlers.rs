//! Axum route handlers for the page (form posts) and the JSON API.

use axum::{
    extract::{Path, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap,
    },
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Phase;
use crate::state::AppState;
use crate::tailoring::controller::{self, GenerateReport};
use crate::tailoring::page::{self, PageView};
use crate::tailoring::prompts::PromptTemplate;

pub const SESSION_COOKIE: &str = "assistant_session";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub session_id: Option<Uuid>,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    #[serde(flatten)]
    pub report: GenerateReport,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub session_id: Uuid,
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub cover_letter: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub slots: &'static [&'static str],
}

// ────────────────────────────────────────────────────────────────────────────
// Page handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (session_id, handle) = state
        .sessions
        .load_or_create(session_from_cookies(&headers))
        .await;
    let session = handle.lock().await;

    let view = PageView {
        current_cover_letter: session.draft(),
        show_feedback: session.phase() == Phase::HasDraft,
        ..Default::default()
    };
    page_response(&state, session_id, &view)
}

/// POST /generate
///
/// Runs all four tasks. Validation and task failures are rendered inline.
pub async fn handle_generate_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Result<Response, AppError> {
    let (session_id, handle) = state
        .sessions
        .load_or_create(session_from_cookies(&headers))
        .await;
    let mut session = handle.lock().await;

    let outcome = controller::generate(
        state.llm.as_ref(),
        &state.documents,
        &mut session,
        &form.job_description,
    )
    .await;

    let (report, generate_error) = match outcome {
        Ok(report) => (Some(report), None),
        Err(e) => (None, Some(inline_error(&e))),
    };

    let view = PageView {
        job_description: &form.job_description,
        report: report.as_ref(),
        current_cover_letter: session.draft(),
        generate_error,
        show_feedback: session.phase() == Phase::HasDraft,
        ..Default::default()
    };
    page_response(&state, session_id, &view)
}

/// POST /feedback
pub async fn handle_feedback_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<FeedbackForm>,
) -> Result<Response, AppError> {
    let (session_id, handle) = state
        .sessions
        .load_or_create(session_from_cookies(&headers))
        .await;
    let mut session = handle.lock().await;

    let outcome = controller::apply_feedback(state.llm.as_ref(), &mut session, &form.feedback).await;

    let (updated, feedback_error) = match outcome {
        Ok(updated) => (Some(updated), None),
        Err(e) => (None, Some(inline_error(&e))),
    };

    let view = PageView {
        feedback: &form.feedback,
        current_cover_letter: session.draft(),
        updated_cover_letter: updated.as_deref(),
        feedback_error,
        show_feedback: session.phase() == Phase::HasDraft,
        ..Default::default()
    };
    page_response(&state, session_id, &view)
}

// ────────────────────────────────────────────────────────────────────────────
// JSON API handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate
///
/// An unknown or missing `session_id` starts a new session; the response carries its id.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            controller::EMPTY_JOB_DESCRIPTION.to_string(),
        ));
    }

    let (session_id, handle) = state.sessions.load_or_create(request.session_id).await;
    let mut session = handle.lock().await;

    let report = controller::generate(
        state.llm.as_ref(),
        &state.documents,
        &mut session,
        &request.job_description,
    )
    .await?;

    Ok(Json(GenerateResponse {
        session_id,
        phase: session.phase(),
        report,
    }))
}

/// POST /api/v1/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let handle = state
        .sessions
        .get(request.session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", request.session_id)))?;
    let mut session = handle.lock().await;

    let cover_letter =
        controller::apply_feedback(state.llm.as_ref(), &mut session, &request.feedback).await?;

    Ok(Json(FeedbackResponse {
        session_id: request.session_id,
        phase: session.phase(),
        cover_letter,
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    let session = handle.lock().await;

    Ok(Json(SessionResponse {
        session_id,
        phase: session.phase(),
        cover_letter: session.draft().map(str::to_string),
    }))
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(
        PromptTemplate::all()
            .into_iter()
            .map(|t| TemplateInfo {
                id: t.id(),
                slots: t.slots(),
            })
            .collect(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn inline_error(e: &AppError) -> String {
    if !matches!(e, AppError::Validation(_)) {
        tracing::error!("Action failed: {e}");
    }
    e.user_message()
}

fn page_response(
    state: &AppState,
    session_id: Uuid,
    view: &PageView<'_>,
) -> Result<Response, AppError> {
    let body = page::render(&state.pages, view)?;
    Ok(([(SET_COOKIE, session_cookie(session_id))], Html(body)).into_response())
}

pub fn session_cookie(session_id: Uuid) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Reads the session id from the `Cookie` header(s). Malformed ids are ignored.
pub fn session_from_cookies(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
