use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::contact::LeadForm;
use super::service::IntakeService;
use super::session::SessionStore;
use super::submission::{SubmissionGateway, SubmissionOutcome};
use super::views::{QuestionnaireView, ResultView, SessionView};
use crate::error::AppError;

type SharedService<S, G> = Arc<IntakeService<S, G>>;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub value: u32,
}

/// Router builder exposing the questionnaire flow over HTTP.
pub fn intake_router<S, G>(service: SharedService<S, G>) -> Router
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/intake/questionnaire",
            get(questionnaire_handler::<S, G>),
        )
        .route("/api/v1/intake/sessions", post(create_handler::<S, G>))
        .route(
            "/api/v1/intake/sessions/:session_id",
            get(session_handler::<S, G>).delete(reset_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/start",
            post(start_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/answers/:question_id",
            put(answer_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/next",
            post(next_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/previous",
            post(previous_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/lead",
            post(lead_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/result",
            get(result_handler::<S, G>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/submit",
            post(submit_handler::<S, G>),
        )
        .with_state(service)
}

pub(crate) async fn questionnaire_handler<S, G>(
    State(service): State<SharedService<S, G>>,
) -> Json<QuestionnaireView>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Json(service.questionnaire())
}

pub(crate) async fn create_handler<S, G>(
    State(service): State<SharedService<S, G>>,
) -> (StatusCode, Json<SessionView>)
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    (StatusCode::CREATED, Json(service.create_session()))
}

pub(crate) async fn session_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.session(&session_id)?))
}

pub(crate) async fn reset_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.reset(&session_id)?))
}

pub(crate) async fn start_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.start(&session_id)?))
}

pub(crate) async fn answer_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path((session_id, question_id)): Path<(String, String)>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.answer(
        &session_id,
        &question_id,
        request.value,
    )?))
}

pub(crate) async fn next_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.next(&session_id)?))
}

pub(crate) async fn previous_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.previous(&session_id)?))
}

pub(crate) async fn lead_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
    Json(form): Json<LeadForm>,
) -> Result<Json<SessionView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.capture_lead(&session_id, form)?))
}

pub(crate) async fn result_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<ResultView>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.result(&session_id)?))
}

pub(crate) async fn submit_handler<S, G>(
    State(service): State<SharedService<S, G>>,
    Path(session_id): Path<String>,
) -> Result<Json<SubmissionOutcome>, AppError>
where
    S: SessionStore + 'static,
    G: SubmissionGateway + 'static,
{
    Ok(Json(service.submit(&session_id).await?))
}
