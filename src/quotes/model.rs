// Quote record and the validated inputs that create or modify one

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// A persisted quote
///
/// Field names follow the on-disk JSON document (`createdAt`, `updatedAt`).
/// Unknown fields found in the data file are carried through `extra` so a
/// load/save cycle does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Any JSON number; ids written by hand may be negative or fractional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(serde_json::Number);

impl QuoteId {
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    /// Numeric equality, so `3.0` in the file matches a lookup for 3
    #[allow(clippy::float_cmp)]
    pub fn matches(&self, wanted: f64) -> bool {
        self.0.as_f64() == Some(wanted)
    }

    /// Largest integer not above this id; `None` outside the `i64` range
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn floor(&self) -> Option<i64> {
        if let Some(id) = self.as_i64() {
            return Some(id);
        }
        if self.0.is_u64() {
            return None;
        }
        let value = self.0.as_f64()?.floor();
        (value >= i64::MIN as f64 && value < i64::MAX as f64).then_some(value as i64)
    }
}

impl From<i64> for QuoteId {
    fn from(id: i64) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Fields required to create a quote (both present and non-empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub text: String,
    pub author: String,
}

/// Partial update; at least one field is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePatch {
    pub text: Option<String>,
    pub author: Option<String>,
}

impl Quote {
    pub fn create(id: QuoteId, new: NewQuote, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: new.text,
            author: new.author,
            created_at: Some(now.into()),
            updated_at: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Overwrite the fields present in `patch` and stamp `updatedAt`
    pub fn apply(&mut self, patch: QuotePatch, now: DateTime<Utc>) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        self.updated_at = Some(now.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_serialize_camel_case_without_updated_at() {
        let quote = Quote::create(
            QuoteId::from(7),
            NewQuote {
                text: "Stay hungry".to_string(),
                author: "Jobs".to_string(),
            },
            fixed_time(),
        );
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["createdAt"], "2024-05-01T10:30:00.000Z");
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_apply_partial_patch() {
        let mut quote = Quote::create(
            QuoteId::from(1),
            NewQuote {
                text: "old".to_string(),
                author: "Someone".to_string(),
            },
            fixed_time(),
        );
        let later = fixed_time() + chrono::Duration::hours(1);
        quote.apply(
            QuotePatch {
                text: Some("new".to_string()),
                author: None,
            },
            later,
        );
        assert_eq!(quote.text, "new");
        assert_eq!(quote.author, "Someone");
        assert_eq!(quote.updated_at, Some(Timestamp::from(later)));
        assert_eq!(quote.created_at, Some(Timestamp::from(fixed_time())));
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let raw = r#"{"id":3,"text":"t","author":"a","category":"life"}"#;
        let quote: Quote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.created_at, None);
        assert_eq!(quote.extra["category"], "life");

        let back = serde_json::to_value(&quote).unwrap();
        assert_eq!(back["category"], "life");
    }

    #[test]
    fn test_deserialize_hand_written_record() {
        let raw = r#"{"id":-2.5,"text":"t","author":"a","createdAt":"2024-01-15"}"#;
        let quote: Quote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.id.floor(), Some(-3));
        assert_eq!(quote.created_at.as_ref().map(ToString::to_string).as_deref(), Some("2024-01-15"));
        assert_eq!(serde_json::to_string(&quote).unwrap(), raw);
    }

    #[test]
    fn test_quote_id_matching() {
        let id: QuoteId = serde_json::from_str("3.0").unwrap();
        assert!(id.matches(3.0));
        assert_eq!(id.floor(), Some(3));
        assert!(QuoteId::from(3).matches(3.0));
        assert!(!QuoteId::from(3).matches(4.0));

        let huge: QuoteId = serde_json::from_str(&u64::MAX.to_string()).unwrap();
        assert_eq!(huge.floor(), None);
        assert_eq!(QuoteId::from(i64::MAX).floor(), Some(i64::MAX));
    }
}
