//! HTTP handlers for competition endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::CompetitionService;
use crate::domain::competition::{CompetitionError, CompetitionView};
use crate::domain::foundation::CompetitionId;

use super::dto::{ErrorResponse, SubmitAnswerRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CompetitionHandlers {
    service: Arc<CompetitionService>,
}

impl CompetitionHandlers {
    pub fn new(service: Arc<CompetitionService>) -> Self {
        Self { service }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /competitions/:id/start - Activate the current question
pub async fn start_competition(
    State(handlers): State<CompetitionHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    respond(handlers.service.start(id).await)
}

/// POST /competitions/:id/answers - Submit the learner's answer
pub async fn submit_answer(
    State(handlers): State<CompetitionHandlers>,
    Path(id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    respond(handlers.service.submit(id, &req.question_id, req.answer).await)
}

/// POST /competitions/:id/force-complete - Close out every remaining question
pub async fn force_complete(
    State(handlers): State<CompetitionHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    respond(handlers.service.force_complete(id).await)
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_id(raw: &str) -> Result<CompetitionId, Response> {
    raw.parse::<CompetitionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid competition ID")),
        )
            .into_response()
    })
}

fn respond(result: Result<CompetitionView, CompetitionError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => handle_competition_error(e),
    }
}

fn handle_competition_error(error: CompetitionError) -> Response {
    let status = match &error {
        CompetitionError::NotFound(_) => StatusCode::NOT_FOUND,
        CompetitionError::QuestionMismatch { .. } => StatusCode::BAD_REQUEST,
        CompetitionError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
        CompetitionError::InvalidState(_) => StatusCode::CONFLICT,
        CompetitionError::Infrastructure(_) => {
            tracing::error!(error = %error, "Competition request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::from(&error))).into_response()
}
