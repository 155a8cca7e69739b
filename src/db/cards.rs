//! Card CRUD and query operations

use rusqlite::{params, Connection, Result};

use super::{format_ts, parse_opt_ts};
use crate::domain::Card;

const CARD_COLUMNS: &str = "id, deck_id, front, back, front_image, back_image, repetitions, \
     interval_days, ease_factor, next_review_at, last_review_at, total_successes";

pub fn insert_card(conn: &Connection, card: &Card) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO cards (deck_id, front, back, front_image, back_image, repetitions, interval_days,
                       ease_factor, next_review_at, last_review_at, total_successes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
        params![
            card.deck_id,
            card.front,
            card.back,
            card.front_image,
            card.back_image,
            card.repetitions,
            card.interval_days,
            card.ease_factor,
            card.next_review_at.map(format_ts),
            card.last_review_at.map(format_ts),
            card.total_successes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a card keeping its id (snapshot restore)
pub fn insert_card_with_id(conn: &Connection, card: &Card) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO cards (id, deck_id, front, back, front_image, back_image, repetitions, interval_days,
                       ease_factor, next_review_at, last_review_at, total_successes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
    "#,
        params![
            card.id,
            card.deck_id,
            card.front,
            card.back,
            card.front_image,
            card.back_image,
            card.repetitions,
            card.interval_days,
            card.ease_factor,
            card.next_review_at.map(format_ts),
            card.last_review_at.map(format_ts),
            card.total_successes,
        ],
    )?;
    Ok(())
}

pub fn get_card_by_id(conn: &Connection, id: i64) -> Result<Option<Card>> {
    let query = format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS);
    let mut stmt = conn.prepare(&query)?;

    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_card(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_all_cards(conn: &Connection) -> Result<Vec<Card>> {
    let query = format!("SELECT {} FROM cards ORDER BY id", CARD_COLUMNS);
    let mut stmt = conn.prepare(&query)?;

    let cards = stmt
        .query_map([], |row| row_to_card(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

pub fn get_cards_by_deck(conn: &Connection, deck_id: i64) -> Result<Vec<Card>> {
    let query = format!("SELECT {} FROM cards WHERE deck_id = ?1 ORDER BY id", CARD_COLUMNS);
    let mut stmt = conn.prepare(&query)?;

    let cards = stmt
        .query_map(params![deck_id], |row| row_to_card(row))?
        .collect::<Result<Vec<_>>>()?;
    Ok(cards)
}

/// Overwrite a stored card in place. Returns false if the card no longer exists.
pub fn update_card(conn: &Connection, card: &Card) -> Result<bool> {
    let updated = conn.execute(
        r#"
    UPDATE cards
    SET deck_id = ?1, front = ?2, back = ?3, front_image = ?4, back_image = ?5,
        repetitions = ?6, interval_days = ?7, ease_factor = ?8,
        next_review_at = ?9, last_review_at = ?10, total_successes = ?11
    WHERE id = ?12
    "#,
        params![
            card.deck_id,
            card.front,
            card.back,
            card.front_image,
            card.back_image,
            card.repetitions,
            card.interval_days,
            card.ease_factor,
            card.next_review_at.map(format_ts),
            card.last_review_at.map(format_ts),
            card.total_successes,
            card.id,
        ],
    )?;
    Ok(updated > 0)
}

pub fn delete_card(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

fn row_to_card(row: &rusqlite::Row) -> Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        front: row.get(2)?,
        back: row.get(3)?,
        front_image: row.get(4)?,
        back_image: row.get(5)?,
        repetitions: row.get(6)?,
        interval_days: row.get(7)?,
        ease_factor: row.get(8)?,
        next_review_at: parse_opt_ts(row.get(9)?),
        last_review_at: parse_opt_ts(row.get(10)?),
        total_successes: row.get(11)?,
    })
}
