use rusqlite::{params, Connection, Result};

use super::{format_ts, parse_ts};
use crate::domain::Deck;

pub fn insert_deck(conn: &Connection, deck: &Deck) -> Result<i64> {
    conn.execute(
        "INSERT INTO decks (name, created_at) VALUES (?1, ?2)",
        params![deck.name, format_ts(deck.created_at)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_deck_with_id(conn: &Connection, deck: &Deck) -> Result<()> {
    conn.execute(
        "INSERT INTO decks (id, name, created_at) VALUES (?1, ?2, ?3)",
        params![deck.id, deck.name, format_ts(deck.created_at)],
    )?;
    Ok(())
}

pub fn get_deck_by_id(conn: &Connection, id: i64) -> Result<Option<Deck>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM decks WHERE id = ?1")?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_deck(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_all_decks(conn: &Connection) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM decks ORDER BY id")?;
    let decks = stmt
        .query_map([], row_to_deck)?
        .collect::<Result<Vec<_>>>()?;
    Ok(decks)
}

/// Delete a deck and its cards. Review logs are kept.
pub fn delete_deck(conn: &Connection, id: i64) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM cards WHERE deck_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM decks WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(deleted > 0)
}

fn row_to_deck(row: &rusqlite::Row) -> Result<Deck> {
    let created_at: String = row.get(2)?;
    Ok(Deck {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_ts(&created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::cards::{get_all_cards, insert_card};
    use crate::db::reviews::{get_all_review_logs, insert_review_log};
    use crate::db::schema::run_migrations;
    use crate::domain::{Card, Quality, ReviewLogEntry};
    use chrono::Utc;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_list_decks() {
        let conn = setup();
        insert_deck(&conn, &Deck::new("Spanish".into())).unwrap();
        insert_deck(&conn, &Deck::new("Kanji".into())).unwrap();

        let names: Vec<String> = get_all_decks(&conn).unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Spanish", "Kanji"]);
    }

    #[test]
    fn test_delete_deck_removes_cards_keeps_logs() {
        let conn = setup();
        let deck_id = insert_deck(&conn, &Deck::new("Spanish".into())).unwrap();
        let card_id = insert_card(&conn, &Card::new(deck_id, "perro".into(), "dog".into())).unwrap();
        insert_review_log(
            &conn,
            &ReviewLogEntry {
                id: 0,
                card_id,
                reviewed_at: Utc::now(),
                quality: Quality::new(4).unwrap(),
                interval_before: 0,
                interval_after: 1,
                ease_before: 2.5,
                ease_after: 2.5,
            },
        )
        .unwrap();

        assert!(delete_deck(&conn, deck_id).unwrap());
        assert!(get_deck_by_id(&conn, deck_id).unwrap().is_none());
        assert!(get_all_cards(&conn).unwrap().is_empty());
        assert_eq!(get_all_review_logs(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_missing_deck() {
        let conn = setup();
        assert!(!delete_deck(&conn, 12).unwrap());
    }
}
