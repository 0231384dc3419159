use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Event as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "page interaction")]
    pub category: String,

    #[validate(length(min = 1, max = 255))]
    #[schema(example = "pageview")]
    pub name: String,

    /// Free-form payload; required keys depend on `(category, name)`
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,

    /// RFC 3339; a timestamp without offset is read as UTC
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,

    #[validate(length(min = 1, max = 255))]
    #[schema(example = "e7a1c0de-session")]
    pub session_id: String,
}

/// A persisted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i64,
    pub category: String,
    pub name: String,
    #[schema(value_type = Object)]
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

/// A validated event ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub category: String,
    pub name: String,
    pub data: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

impl From<CreateEvent> for NewEvent {
    fn from(event: CreateEvent) -> Self {
        Self {
            category: event.category,
            name: event.name,
            data: event.data,
            timestamp: event.timestamp,
            session_id: event.session_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub id: String,
}

/// Outcome of making sure a session row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpsert {
    Created,
    AlreadyExists,
}

/// Offset/limit window over insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: u64,
    limit: u64,
}

impl Page {
    pub const MAX_LIMIT: u64 = 100;

    /// Limits above [`Page::MAX_LIMIT`] are clamped.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: limit.min(Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::MAX_LIMIT)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Rows to skip
    #[serde(default)]
    #[param(default = 0)]
    pub offset: u64,

    /// Rows to return, at most 100
    #[serde(default = "default_limit")]
    #[param(default = 100, maximum = 100)]
    pub limit: u64,
}

fn default_limit() -> u64 {
    Page::MAX_LIMIT
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page::new(query.offset, query.limit)
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            serde::de::Error::custom(format!(
                "invalid timestamp '{}', expected RFC 3339 such as 2024-05-01T12:00:00Z",
                raw
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_page_clamps_limit() {
        assert_eq!(Page::new(0, 500).limit(), 100);
        assert_eq!(Page::new(7, 10), Page::new(7, 10));
        assert_eq!(Page::default().limit(), Page::MAX_LIMIT);
    }

    #[test]
    fn test_page_query_defaults() {
        let query: PageQuery = serde_json::from_value(json!({})).unwrap();
        let page = Page::from(query);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 100);
    }

    #[test]
    fn test_timestamp_accepts_offset_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        for raw in [
            "2024-05-01T12:00:00Z",
            "2024-05-01T14:00:00+02:00",
            "2024-05-01T12:00:00",
        ] {
            let event: CreateEvent = serde_json::from_value(json!({
                "category": "page interaction",
                "name": "pageview",
                "data": {},
                "timestamp": raw,
                "session_id": "s1",
            }))
            .unwrap();
            assert_eq!(event.timestamp, expected, "parsing {raw}");
        }
    }

    #[test]
    fn test_non_object_data_is_rejected() {
        let result: Result<CreateEvent, _> = serde_json::from_value(json!({
            "category": "page interaction",
            "name": "pageview",
            "data": ["host", "path"],
            "timestamp": "2024-05-01T12:00:00Z",
            "session_id": "s1",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_length_rules() {
        let event = CreateEvent {
            category: String::new(),
            name: "pageview".to_string(),
            data: Map::new(),
            timestamp: Utc::now(),
            session_id: "x".repeat(256),
        };
        let errors = event.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("category"));
        assert!(fields.contains_key("session_id"));
        assert!(!fields.contains_key("name"));
    }
}
