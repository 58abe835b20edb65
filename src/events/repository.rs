//! Database access for event records. Timestamps are stored as RFC 3339
//! text so they round-trip through chrono unchanged.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::models::{Event, EventStatus};
use crate::error::{AppError, AppResult};
use crate::state::DbPool;

/// Field set for an insert or full-replace update.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title_en: String,
    pub title_zh: String,
    pub description_en: String,
    pub description_zh: String,
    pub location_en: String,
    pub location_zh: String,
    pub image_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub featured: bool,
    pub link: Option<String>,
}

pub fn insert(pool: &DbPool, ev: &NewEvent) -> AppResult<Event> {
    let conn = pool.get()?;
    let now = Utc::now();

    conn.execute(
        "INSERT INTO events (title_en, title_zh, description_en, description_zh,
         location_en, location_zh, image_url, start_date, end_date, status,
         featured, link, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            ev.title_en,
            ev.title_zh,
            ev.description_en,
            ev.description_zh,
            ev.location_en,
            ev.location_zh,
            ev.image_url,
            ev.start_date.to_rfc3339(),
            ev.end_date.map(|d| d.to_rfc3339()),
            ev.status.as_str(),
            ev.featured,
            ev.link,
            now.to_rfc3339(),
            now.to_rfc3339(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    drop(conn);
    find(pool, id)?.ok_or(AppError::NotFound)
}

pub fn update(pool: &DbPool, id: i64, ev: &NewEvent) -> AppResult<Event> {
    let conn = pool.get()?;
    let now = Utc::now();

    let rows = conn.execute(
        "UPDATE events SET title_en = ?1, title_zh = ?2, description_en = ?3,
         description_zh = ?4, location_en = ?5, location_zh = ?6, image_url = ?7,
         start_date = ?8, end_date = ?9, status = ?10, featured = ?11, link = ?12,
         updated_at = ?13
         WHERE id = ?14",
        params![
            ev.title_en,
            ev.title_zh,
            ev.description_en,
            ev.description_zh,
            ev.location_en,
            ev.location_zh,
            ev.image_url,
            ev.start_date.to_rfc3339(),
            ev.end_date.map(|d| d.to_rfc3339()),
            ev.status.as_str(),
            ev.featured,
            ev.link,
            now.to_rfc3339(),
            id,
        ],
    )?;

    if rows == 0 {
        return Err(AppError::NotFound);
    }
    drop(conn);
    find(pool, id)?.ok_or(AppError::NotFound)
}

pub fn find(pool: &DbPool, id: i64) -> AppResult<Option<Event>> {
    let conn = pool.get()?;

    let result = conn.query_row(
        "SELECT id, title_en, title_zh, description_en, description_zh,
         location_en, location_zh, image_url, start_date, end_date, status,
         featured, link, created_at, updated_at
         FROM events WHERE id = ?1",
        params![id],
        row_to_event,
    );

    match result {
        Ok(event) => Ok(Some(event)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List events, optionally filtered by status. Featured events sort first,
/// then newest start date.
pub fn list(pool: &DbPool, status: Option<EventStatus>) -> AppResult<Vec<Event>> {
    let conn = pool.get()?;

    let mut events = Vec::new();
    match status {
        Some(status) => {
            let mut stmt = conn.prepare(
                "SELECT id, title_en, title_zh, description_en, description_zh,
                 location_en, location_zh, image_url, start_date, end_date, status,
                 featured, link, created_at, updated_at
                 FROM events WHERE status = ?1
                 ORDER BY featured DESC, start_date DESC",
            )?;
            let rows = stmt.query_map(params![status.as_str()], row_to_event)?;
            for row in rows {
                events.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, title_en, title_zh, description_en, description_zh,
                 location_en, location_zh, image_url, start_date, end_date, status,
                 featured, link, created_at, updated_at
                 FROM events
                 ORDER BY featured DESC, start_date DESC",
            )?;
            let rows = stmt.query_map([], row_to_event)?;
            for row in rows {
                events.push(row?);
            }
        }
    }

    Ok(events)
}

pub fn delete(pool: &DbPool, id: i64) -> AppResult<()> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    let status_raw: String = row.get(10)?;
    let status = status_raw.parse::<EventStatus>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            10,
            rusqlite::types::Type::Text,
            format!("unknown event status: {status_raw}").into(),
        )
    })?;

    Ok(Event {
        id: row.get(0)?,
        title_en: row.get(1)?,
        title_zh: row.get(2)?,
        description_en: row.get(3)?,
        description_zh: row.get(4)?,
        location_en: row.get(5)?,
        location_zh: row.get(6)?,
        image_url: row.get(7)?,
        start_date: parse_ts(8, row.get(8)?)?,
        end_date: match row.get::<_, Option<String>>(9)? {
            Some(s) => Some(parse_ts(9, s)?),
            None => None,
        },
        status,
        featured: row.get(11)?,
        link: row.get(12)?,
        created_at: parse_ts(13, row.get(13)?)?,
        updated_at: parse_ts(14, row.get(14)?)?,
    })
}

fn parse_ts(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
