pub mod backup;
pub mod library;
pub mod study;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{delete, get, post},
  Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::error::SchedulerError;
use crate::state::AppState;

/// Error returned by every JSON handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error(transparent)]
  Scheduler(#[from] SchedulerError),

  #[error("Study session not found or expired")]
  SessionNotFound,
}

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::SessionNotFound => StatusCode::NOT_FOUND,
      ApiError::Scheduler(e) => match e {
        SchedulerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SchedulerError::InvalidGrade(_)
        | SchedulerError::InvalidQuality(_)
        | SchedulerError::InvalidCard { .. }
        | SchedulerError::EmptyField(_)
        | SchedulerError::UnsupportedBackupVersion(_) => StatusCode::BAD_REQUEST,
        SchedulerError::DeckNotFound(_) | SchedulerError::CardNotFound(_) => StatusCode::NOT_FOUND,
        SchedulerError::ReviewInFlight(_) => StatusCode::CONFLICT,
      },
    }
  }
}

impl From<crate::error::StoreError> for ApiError {
  fn from(e: crate::error::StoreError) -> Self {
    ApiError::Scheduler(e.into())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("Request failed: {}", self);
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/due", get(study::due))
    .route("/api/review", post(study::review))
    .route("/api/stats/forgetting-rate", get(study::forgetting_rate))
    .route("/api/session", post(study::start_session))
    .route("/api/session/{id}", get(study::get_session))
    .route("/api/session/{id}/grade", post(study::grade_session))
    .route("/api/decks", get(library::list_decks).post(library::create_deck))
    .route("/api/decks/{id}", delete(library::delete_deck))
    .route("/api/decks/{id}/cards", get(library::deck_cards))
    .route("/api/cards", post(library::create_card))
    .route("/api/cards/{id}", get(library::get_card).delete(library::delete_card))
    .route("/api/backup", get(backup::export))
    .route("/api/restore", post(backup::restore))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
