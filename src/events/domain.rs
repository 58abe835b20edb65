//! Event lifecycle and bilingual projection rules.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::db::models::{Event, EventStatus};

/// Derive the lifecycle status of an event from its date range.
///
/// An event past its end date is `past`; one that has not started yet is
/// `upcoming`; everything else is `ongoing`. The boundary instant
/// `now == end` still counts as active. An event with no end date never
/// becomes `past` once started.
pub fn derive_status(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> EventStatus {
    match end {
        Some(end) if now > end => EventStatus::Past,
        _ if start > now => EventStatus::Upcoming,
        _ => EventStatus::Ongoing,
    }
}

/// Display language requested by the client. Anything other than `zh`
/// falls back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("zh") => Language::Zh,
            _ => Language::En,
        }
    }
}

/// An event as returned to clients: the bilingual field pairs projected to
/// flat fields for the requested language, with the source pairs kept
/// alongside for admin re-editing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project an event for display in the requested language. Empty strings
/// are passed through as-is; there is no cross-language fallback.
pub fn project(event: &Event, language: Language) -> EventView {
    let (title, description, location) = match language {
        Language::Zh => (
            event.title_zh.clone(),
            event.description_zh.clone(),
            event.location_zh.clone(),
        ),
        Language::En => (
            event.title_en.clone(),
            event.description_en.clone(),
            event.location_en.clone(),
        ),
    };

    EventView {
        id: event.id,
        title,
        description,
        location,
        title_en: event.title_en.clone(),
        title_zh: event.title_zh.clone(),
        description_en: event.description_en.clone(),
        description_zh: event.description_zh.clone(),
        location_en: event.location_en.clone(),
        location_zh: event.location_zh.clone(),
        image_url: event.image_url.clone(),
        start_date: event.start_date,
        end_date: event.end_date,
        status: event.status,
        featured: event.featured,
        link: event.link.clone(),
        created_at: event.created_at,
        updated_at: event.updated_at,
    }
}

/// Parse a timestamp supplied by a client: full RFC 3339, or a bare
/// `YYYY-MM-DD` date which is taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    fn sample_event() -> Event {
        Event {
            id: 1,
            title_en: "Open House".into(),
            title_zh: "开放日".into(),
            description_en: "Annual open house".into(),
            description_zh: "年度开放日".into(),
            location_en: "Main Hall".into(),
            location_zh: "大礼堂".into(),
            image_url: None,
            start_date: ts("2025-09-01"),
            end_date: None,
            status: EventStatus::Upcoming,
            featured: false,
            link: None,
            created_at: ts("2025-08-01"),
            updated_at: ts("2025-08-01"),
        }
    }

    #[test]
    fn future_start_is_upcoming() {
        let now = ts("2025-01-01");
        let status = derive_status(ts("2025-06-01"), None, now);
        assert_eq!(status, EventStatus::Upcoming);
    }

    #[test]
    fn past_end_is_past() {
        let now = ts("2025-03-01");
        let status = derive_status(ts("2025-01-01"), Some(ts("2025-02-01")), now);
        assert_eq!(status, EventStatus::Past);
    }

    #[test]
    fn started_without_end_is_ongoing() {
        let now = ts("2025-03-01");
        let status = derive_status(ts("2025-01-01"), None, now);
        assert_eq!(status, EventStatus::Ongoing);
    }

    #[test]
    fn in_range_is_ongoing() {
        let now = ts("2025-01-15");
        let status = derive_status(ts("2025-01-01"), Some(ts("2025-02-01")), now);
        assert_eq!(status, EventStatus::Ongoing);
    }

    #[test]
    fn boundary_instant_is_not_past() {
        // now == end counts as still active
        let end = ts("2025-02-01");
        let status = derive_status(ts("2025-01-01"), Some(end), end);
        assert_eq!(status, EventStatus::Ongoing);

        let status = derive_status(ts("2025-01-01"), Some(end), end + Duration::seconds(1));
        assert_eq!(status, EventStatus::Past);
    }

    #[test]
    fn start_equal_to_now_is_ongoing() {
        let start = ts("2025-01-01");
        let status = derive_status(start, None, start);
        assert_eq!(status, EventStatus::Ongoing);
    }

    #[test]
    fn projection_selects_chinese_fields() {
        let event = sample_event();
        let view = project(&event, Language::Zh);
        assert_eq!(view.title, "开放日");
        assert_eq!(view.description, "年度开放日");
        assert_eq!(view.location, "大礼堂");
        // Source pairs are still present
        assert_eq!(view.title_en, "Open House");
        assert_eq!(view.title_zh, "开放日");
    }

    #[test]
    fn projection_defaults_to_english() {
        let event = sample_event();
        let view = project(&event, Language::En);
        assert_eq!(view.title, "Open House");
        assert_eq!(view.location, "Main Hall");
    }

    #[test]
    fn unrecognized_language_tag_falls_back_to_english() {
        assert_eq!(Language::parse(Some("fr")), Language::En);
        assert_eq!(Language::parse(None), Language::En);
        assert_eq!(Language::parse(Some("zh")), Language::Zh);
    }

    #[test]
    fn empty_translation_is_returned_as_is() {
        let mut event = sample_event();
        event.title_zh = String::new();
        let view = project(&event, Language::Zh);
        assert_eq!(view.title, "");
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339_and_bare_dates() {
        assert!(parse_timestamp("2025-01-01T10:30:00Z").is_some());
        assert!(parse_timestamp("2025-01-01T10:30:00+08:00").is_some());
        assert_eq!(
            parse_timestamp("2025-01-01").unwrap(),
            parse_timestamp("2025-01-01T00:00:00Z").unwrap()
        );
        assert!(parse_timestamp("January 1st").is_none());
    }
}
