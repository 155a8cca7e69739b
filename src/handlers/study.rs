use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult};
use crate::domain::Card;
use crate::session::StudySession;
use crate::srs::{DueQueue, ForgettingRate, ReviewOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReviewRequest {
  pub card_id: i64,
  pub grade: u8,
}

#[derive(Deserialize)]
pub struct GradeRequest {
  pub grade: u8,
}

/// Client view of a study session
#[derive(Debug, Serialize)]
pub struct SessionView {
  pub id: String,
  pub current: Option<Card>,
  pub remaining: usize,
  pub reviewed: u32,
  pub lapses: u32,
  pub skipped: u32,
  pub finished: bool,
}

impl SessionView {
  fn new(id: String, session: &StudySession) -> Self {
    Self {
      id,
      current: session.current().cloned(),
      remaining: session.remaining(),
      reviewed: session.reviewed(),
      lapses: session.lapses(),
      skipped: session.skipped(),
      finished: session.is_finished(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
  /// None when the session had nothing left to grade
  pub outcome: Option<ReviewOutcome>,
  pub session: SessionView,
}

pub async fn due(State(state): State<AppState>) -> ApiResult<Json<DueQueue>> {
  Ok(Json(state.scheduler.due_queue(Utc::now()).await?))
}

pub async fn review(
  State(state): State<AppState>,
  Json(req): Json<ReviewRequest>,
) -> ApiResult<Json<ReviewOutcome>> {
  let outcome = state
    .scheduler
    .submit_review(req.card_id, req.grade, Utc::now())
    .await?;
  Ok(Json(outcome))
}

pub async fn forgetting_rate(State(state): State<AppState>) -> ApiResult<Json<ForgettingRate>> {
  Ok(Json(state.scheduler.forgetting_rate(Utc::now()).await?))
}

pub async fn start_session(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<SessionView>)> {
  let now = Utc::now();
  let session = state.scheduler.start_session(now).await?;
  let view = SessionView::new(String::new(), &session);
  let id = state.sessions.insert(session, now);
  tracing::debug!(remaining = view.remaining, "Started study session");
  Ok((StatusCode::CREATED, Json(SessionView { id, ..view })))
}

pub async fn get_session(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> ApiResult<Json<SessionView>> {
  let handle = state
    .sessions
    .get(&id, Utc::now())
    .ok_or(ApiError::SessionNotFound)?;
  let session = handle.lock().await;
  Ok(Json(SessionView::new(id, &session)))
}

pub async fn grade_session(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Json(req): Json<GradeRequest>,
) -> ApiResult<Json<GradeResponse>> {
  let now = Utc::now();
  let handle = state.sessions.get(&id, now).ok_or(ApiError::SessionNotFound)?;

  // Held until the outcome is recorded, so overlapping requests grade one card each
  let mut session = handle.lock().await;
  let outcome = state.scheduler.grade_current(&mut session, req.grade, now).await?;

  Ok(Json(GradeResponse {
    outcome,
    session: SessionView::new(id, &session),
  }))
}
