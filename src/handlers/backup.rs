use axum::{extract::State, Json};
use chrono::Utc;

use super::ApiResult;
use crate::services::backup::{self, RestoreSummary, Snapshot};
use crate::state::AppState;

pub async fn export(State(state): State<AppState>) -> ApiResult<Json<Snapshot>> {
  let conn = state.store().conn()?;
  Ok(Json(backup::export_snapshot(&conn, Utc::now())?))
}

pub async fn restore(
  State(state): State<AppState>,
  Json(snapshot): Json<Snapshot>,
) -> ApiResult<Json<RestoreSummary>> {
  let conn = state.store().conn()?;
  Ok(Json(backup::import_snapshot(&conn, &snapshot)?))
}
