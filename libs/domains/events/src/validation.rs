//! Semantic validation of incoming events.
//!
//! Two rules, checked in order:
//!
//! 1. the event timestamp must not be later than `now`;
//! 2. the payload must carry the keys required for its `(category, name)`
//!    pair, see [`required_fields`]. Unknown pairs accept any payload.

use crate::error::ValidationError;
use crate::models::CreateEvent;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Accepted JSON shape of a payload value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Any,
    Object,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Any => true,
            FieldKind::Object => value.is_object(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldKind::Any => "value",
            FieldKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
}

const fn any(key: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        kind: FieldKind::Any,
    }
}

const fn object(key: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        kind: FieldKind::Object,
    }
}

struct PayloadSchema {
    category: &'static str,
    name: &'static str,
    fields: &'static [FieldSpec],
}

const PAYLOAD_SCHEMAS: &[PayloadSchema] = &[
    PayloadSchema {
        category: "page interaction",
        name: "pageview",
        fields: &[any("host"), any("path")],
    },
    PayloadSchema {
        category: "page interaction",
        name: "cta click",
        fields: &[any("host"), any("path"), any("element")],
    },
    PayloadSchema {
        category: "form interaction",
        name: "submit",
        fields: &[any("host"), any("path"), object("form")],
    },
];

/// Payload keys required for an exact `(category, name)` match, in check order.
pub fn required_fields(category: &str, name: &str) -> &'static [FieldSpec] {
    PAYLOAD_SCHEMAS
        .iter()
        .find(|schema| schema.category == category && schema.name == name)
        .map(|schema| schema.fields)
        .unwrap_or(&[])
}

/// Returns the event unchanged, or the first rule it violates.
///
/// `now` is passed in so callers (and tests) control the clock.
pub fn validate_event(
    event: &CreateEvent,
    now: DateTime<Utc>,
) -> Result<&CreateEvent, ValidationError> {
    if event.timestamp > now {
        return Err(ValidationError::FutureTimestamp {
            timestamp: event.timestamp,
            now,
        });
    }

    check_payload(&event.category, &event.name, &event.data)?;
    Ok(event)
}

fn check_payload(
    category: &str,
    name: &str,
    data: &Map<String, Value>,
) -> Result<(), ValidationError> {
    for spec in required_fields(category, name) {
        let Some(value) = data.get(spec.key) else {
            return Err(ValidationError::MissingPayloadField {
                category: category.to_string(),
                name: name.to_string(),
                field: spec.key,
            });
        };

        if !spec.kind.accepts(value) {
            return Err(ValidationError::InvalidFieldType {
                field: spec.key,
                expected: spec.kind.describe(),
            });
        }
    }

    Ok(())
}
