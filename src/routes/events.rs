use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::db::models::EventStatus;
use crate::error::{AppError, AppResult};
use crate::events::domain::{derive_status, parse_timestamp, project, EventView, Language};
use crate::events::repository::{self, NewEvent};
use crate::extractors::AdminToken;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub language: Option<String>,
}

#[derive(Deserialize)]
pub struct ReadQuery {
    pub language: Option<String>,
}

/// Full field set for create and full-replace update. Everything is
/// optional at the serde level so missing required fields surface as 400s
/// from [`validate`] rather than extractor rejections.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPayload {
    pub title_en: Option<String>,
    pub title_zh: Option<String>,
    pub description_en: Option<String>,
    pub description_zh: Option<String>,
    pub location_en: Option<String>,
    pub location_zh: Option<String>,
    pub image_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<EventStatus>,
    pub featured: Option<bool>,
    pub link: Option<String>,
}

/// A validated payload: record fields with the status derived from the
/// date range, plus the caller's explicit override if one was supplied.
struct ValidEvent {
    fields: NewEvent,
    status_override: Option<EventStatus>,
}

fn require(value: Option<String>, name: &str) -> AppResult<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

fn validate(payload: EventPayload, now: DateTime<Utc>) -> AppResult<ValidEvent> {
    let start_raw = require(payload.start_date, "startDate")?;
    let start_date = parse_timestamp(&start_raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid startDate: {start_raw}")))?;

    let end_date = match payload.end_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            parse_timestamp(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid endDate: {raw}")))?,
        ),
    };

    let fields = NewEvent {
        title_en: require(payload.title_en, "titleEn")?,
        title_zh: require(payload.title_zh, "titleZh")?,
        description_en: require(payload.description_en, "descriptionEn")?,
        description_zh: require(payload.description_zh, "descriptionZh")?,
        location_en: require(payload.location_en, "locationEn")?,
        location_zh: require(payload.location_zh, "locationZh")?,
        image_url: payload.image_url.filter(|s| !s.is_empty()),
        start_date,
        end_date,
        status: derive_status(start_date, end_date, now),
        featured: payload.featured.unwrap_or(false),
        link: payload.link.filter(|s| !s.is_empty()),
    };

    Ok(ValidEvent {
        fields,
        status_override: payload.status,
    })
}

fn parse_status_filter(raw: Option<&str>) -> AppResult<Option<EventStatus>> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s
            .parse::<EventStatus>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown status filter: {s}"))),
    }
}

/// GET /api/events — public listing, optionally filtered by status,
/// projected to the requested language.
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<EventView>>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let language = Language::parse(query.language.as_deref());

    let events = repository::list(&state.db, status)?;
    let views = events.iter().map(|e| project(e, language)).collect();
    Ok(Json(views))
}

/// GET /api/events/{id} — public single-event read.
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ReadQuery>,
) -> AppResult<Json<EventView>> {
    let language = Language::parse(query.language.as_deref());
    let event = repository::find(&state.db, id)?.ok_or(AppError::NotFound)?;
    Ok(Json(project(&event, language)))
}

/// POST /api/events — admin create. Status is always derived from the
/// date range; any status in the payload is ignored here.
async fn create_event(
    State(state): State<AppState>,
    AdminToken(_claims): AdminToken,
    Json(payload): Json<EventPayload>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    let valid = validate(payload, Utc::now())?;
    let event = repository::insert(&state.db, &valid.fields)?;
    Ok((StatusCode::CREATED, Json(project(&event, Language::En))))
}

/// PUT /api/events/{id} — admin full replace. An explicit status in the
/// payload is trusted as-is; otherwise the status is re-derived. When the
/// image URL changes, the previously stored file is pruned before the
/// record is written.
async fn update_event(
    State(state): State<AppState>,
    AdminToken(_claims): AdminToken,
    Path(id): Path<i64>,
    Json(payload): Json<EventPayload>,
) -> AppResult<Json<EventView>> {
    let existing = repository::find(&state.db, id)?.ok_or(AppError::NotFound)?;

    let mut valid = validate(payload, Utc::now())?;
    if let Some(status) = valid.status_override {
        valid.fields.status = status;
    }

    // Prune the replaced image file. Unconditional on this one record:
    // nothing prevents two records from sharing an image URL, and the
    // shared file would be deleted out from under the other record.
    if let Some(old_url) = existing.image_url.as_deref() {
        if valid.fields.image_url.as_deref() != Some(old_url) {
            state.images.remove_by_url(old_url).await;
        }
    }

    let event = repository::update(&state.db, id, &valid.fields)?;
    Ok(Json(project(&event, Language::En)))
}

/// DELETE /api/events/{id} — admin delete. The image file is removed
/// first so a crash between the two steps cannot leak a file; a failed
/// unlink is logged and the record deletion proceeds regardless.
async fn delete_event(
    State(state): State<AppState>,
    AdminToken(_claims): AdminToken,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let existing = repository::find(&state.db, id)?.ok_or(AppError::NotFound)?;

    if let Some(url) = existing.image_url.as_deref() {
        state.images.remove_by_url(url).await;
    }

    repository::delete(&state.db, id)?;
    Ok(Json(json!({ "message": "Event deleted" })))
}
