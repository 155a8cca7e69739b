use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use serde::{Deserialize, Serialize};

use super::ApiResult;
use crate::db::{LogOnError, Repository};
use crate::domain::{Card, Deck};
use crate::services::catalog::{self, NewCard};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NewDeck {
  pub name: String,
}

/// Deck with its card count for listing
#[derive(Debug, Serialize)]
pub struct DeckSummary {
  #[serde(flatten)]
  pub deck: Deck,
  pub card_count: usize,
}

pub async fn list_decks(State(state): State<AppState>) -> ApiResult<Json<Vec<DeckSummary>>> {
  let decks = catalog::list_decks(state.store()).await?;
  let mut summaries = Vec::with_capacity(decks.len());
  for deck in decks {
    let card_count = state
      .store()
      .cards_by_deck(deck.id)
      .await
      .log_warn_default("Failed to count deck cards")
      .len();
    summaries.push(DeckSummary { deck, card_count });
  }
  Ok(Json(summaries))
}

pub async fn create_deck(
  State(state): State<AppState>,
  Json(req): Json<NewDeck>,
) -> ApiResult<(StatusCode, Json<Deck>)> {
  let deck = catalog::create_deck(state.store(), &req.name).await?;
  Ok((StatusCode::CREATED, Json(deck)))
}

pub async fn delete_deck(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
  catalog::delete_deck(state.store(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn deck_cards(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Vec<Card>>> {
  Ok(Json(catalog::deck_cards(state.store(), id).await?))
}

pub async fn create_card(
  State(state): State<AppState>,
  Json(req): Json<NewCard>,
) -> ApiResult<(StatusCode, Json<Card>)> {
  let card = catalog::create_card(state.store(), req).await?;
  Ok((StatusCode::CREATED, Json(card)))
}

pub async fn get_card(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Card>> {
  Ok(Json(catalog::get_card(state.store(), id).await?))
}

pub async fn delete_card(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
  catalog::delete_card(state.store(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}
