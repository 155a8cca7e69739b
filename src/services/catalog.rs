//! Deck and card management on top of a [`Repository`].
//!
//! Handlers go through these functions so not-found and empty-field checks
//! live in one place.

use serde::Deserialize;

use crate::db::Repository;
use crate::domain::{Card, Deck};
use crate::error::SchedulerError;

/// Fields supplied when adding a card
#[derive(Debug, Clone, Deserialize)]
pub struct NewCard {
    pub deck_id: i64,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub front_image: Option<String>,
    #[serde(default)]
    pub back_image: Option<String>,
}

fn require(value: &str, field: &'static str) -> Result<String, SchedulerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchedulerError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

pub async fn create_deck<R: Repository>(repo: &R, name: &str) -> Result<Deck, SchedulerError> {
    let mut deck = Deck::new(require(name, "name")?);
    deck.id = repo.add_deck(&deck).await?;
    tracing::debug!(deck_id = deck.id, "Created deck");
    Ok(deck)
}

pub async fn list_decks<R: Repository>(repo: &R) -> Result<Vec<Deck>, SchedulerError> {
    Ok(repo.all_decks().await?)
}

/// Delete a deck and its cards. Review history is kept.
pub async fn delete_deck<R: Repository>(repo: &R, deck_id: i64) -> Result<(), SchedulerError> {
    if !repo.delete_deck(deck_id).await? {
        return Err(SchedulerError::DeckNotFound(deck_id));
    }
    tracing::info!(deck_id, "Deleted deck");
    Ok(())
}

pub async fn deck_cards<R: Repository>(repo: &R, deck_id: i64) -> Result<Vec<Card>, SchedulerError> {
    if repo.get_deck(deck_id).await?.is_none() {
        return Err(SchedulerError::DeckNotFound(deck_id));
    }
    Ok(repo.cards_by_deck(deck_id).await?)
}

/// Add a new, never-reviewed card to an existing deck
pub async fn create_card<R: Repository>(repo: &R, new: NewCard) -> Result<Card, SchedulerError> {
    let front = require(&new.front, "front")?;
    let back = require(&new.back, "back")?;
    if repo.get_deck(new.deck_id).await?.is_none() {
        return Err(SchedulerError::DeckNotFound(new.deck_id));
    }

    let mut card = Card::new(new.deck_id, front, back);
    card.front_image = new.front_image;
    card.back_image = new.back_image;
    card.id = repo.add_card(&card).await?;
    Ok(card)
}

pub async fn get_card<R: Repository>(repo: &R, card_id: i64) -> Result<Card, SchedulerError> {
    repo.get_card(card_id)
        .await?
        .ok_or(SchedulerError::CardNotFound(card_id))
}

pub async fn delete_card<R: Repository>(repo: &R, card_id: i64) -> Result<(), SchedulerError> {
    if !repo.delete_card(card_id).await? {
        return Err(SchedulerError::CardNotFound(card_id));
    }
    Ok(())
}
