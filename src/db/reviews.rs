//! Review log persistence

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use super::{format_ts, parse_ts};
use crate::domain::{Quality, ReviewLogEntry};

const LOG_COLUMNS: &str = "id, card_id, reviewed_at, quality, interval_before, interval_after, \
     ease_before, ease_after";

pub fn insert_review_log(conn: &Connection, log: &ReviewLogEntry) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO review_logs (card_id, reviewed_at, quality, interval_before, interval_after,
                             ease_before, ease_after)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
        params![
            log.card_id,
            format_ts(log.reviewed_at),
            log.quality.value(),
            log.interval_before,
            log.interval_after,
            log.ease_before,
            log.ease_after,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_review_log_with_id(conn: &Connection, log: &ReviewLogEntry) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO review_logs (id, card_id, reviewed_at, quality, interval_before, interval_after,
                             ease_before, ease_after)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#,
        params![
            log.id,
            log.card_id,
            format_ts(log.reviewed_at),
            log.quality.value(),
            log.interval_before,
            log.interval_after,
            log.ease_before,
            log.ease_after,
        ],
    )?;
    Ok(())
}

pub fn get_all_review_logs(conn: &Connection) -> Result<Vec<ReviewLogEntry>> {
    let query = format!("SELECT {} FROM review_logs ORDER BY reviewed_at, id", LOG_COLUMNS);
    let mut stmt = conn.prepare(&query)?;
    let logs = stmt
        .query_map([], row_to_log)?
        .collect::<Result<Vec<_>>>()?;
    Ok(logs)
}

/// Logs reviewed at or after `cutoff`, served by the reviewed_at index
pub fn get_review_logs_since(conn: &Connection, cutoff: DateTime<Utc>) -> Result<Vec<ReviewLogEntry>> {
    let query = format!(
        "SELECT {} FROM review_logs WHERE reviewed_at >= ?1 ORDER BY reviewed_at, id",
        LOG_COLUMNS
    );
    let mut stmt = conn.prepare(&query)?;
    let logs = stmt
        .query_map(params![format_ts(cutoff)], row_to_log)?
        .collect::<Result<Vec<_>>>()?;
    Ok(logs)
}

fn row_to_log(row: &rusqlite::Row) -> Result<ReviewLogEntry> {
    let reviewed_at: String = row.get(2)?;
    let quality: u8 = row.get(3)?;
    let quality = Quality::new(quality).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    Ok(ReviewLogEntry {
        id: row.get(0)?,
        card_id: row.get(1)?,
        reviewed_at: parse_ts(&reviewed_at),
        quality,
        interval_before: row.get(4)?,
        interval_after: row.get(5)?,
        ease_before: row.get(6)?,
        ease_after: row.get(7)?,
    })
}
