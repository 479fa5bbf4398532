//! Presence predicates deciding whether a field "has a value".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// How a resolved field value is judged present.
///
/// The catalog scores data models and data products with two slightly
/// different rules; both are kept and callers pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStrategy {
    /// Present unless missing, `null`, or exactly the empty string.
    Simple,
    /// Type-aware: strings must be non-blank after trimming, numbers must be
    /// non-negative, arrays and objects must be non-empty, anything else
    /// non-null is present.
    Typed,
}

impl PresenceStrategy {
    /// Whether `value` counts as filled under this strategy.
    pub fn has_value(self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Self::Simple => !value.is_null() && value.as_str() != Some(""),
            Self::Typed => match value {
                Value::Null => false,
                Value::String(text) => !text.trim().is_empty(),
                Value::Number(number) => number.as_f64().is_some_and(|n| n >= 0.0),
                Value::Array(items) => !items.is_empty(),
                Value::Object(map) => !map.is_empty(),
                Value::Bool(_) => true,
            },
        }
    }
}
