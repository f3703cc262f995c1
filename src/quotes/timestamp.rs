// Timestamps on persisted quotes
// Stored text is kept as-is; new values look like 2024-01-01T12:00:00.000Z

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// `createdAt` / `updatedAt` value
///
/// Whatever string the data file holds is carried through unchanged, so a
/// load/save cycle never rewrites precision or offsets. Only timestamps the
/// server creates itself are formatted, as RFC 3339 UTC with milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self(time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
