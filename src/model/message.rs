//! Transcript message records as served by the log backend.
//!
//! Records are immutable once fetched. The timestamp is kept verbatim and
//! split on demand into the date and time-of-day shown by the viewer.

use crate::model::{Anchor, DateId};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// Naive timestamp layouts accepted besides RFC 3339.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Group label for records whose timestamp carries no usable date.
pub const UNDATED: &str = "undated";

// ===== MessageRecord =====

/// One line of a transcript.
///
/// Accepts both the canonical field names (`timestamp`, `anchor`) and the
/// legacy server names (`time`, `offset`). Unknown fields such as the
/// database `id` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageRecord {
    #[serde(alias = "time")]
    timestamp: String,
    author: String,
    body: String,
    #[serde(alias = "offset")]
    anchor: Anchor,
}

impl MessageRecord {
    /// Build a record from its parts.
    pub fn new(
        timestamp: impl Into<String>,
        author: impl Into<String>,
        body: impl Into<String>,
        anchor: Anchor,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            author: author.into(),
            body: body.into(),
            anchor,
        }
    }

    /// Raw ISO-8601 timestamp as served.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Nickname of the author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Raw body text, possibly containing inline formatting codes.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deep-link anchor of this message.
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Split the timestamp into its date and time-of-day components.
    pub fn timestamp_parts(&self) -> TimestampParts {
        TimestampParts::parse(&self.timestamp)
    }

    /// Date this message belongs to, if the timestamp has one.
    pub fn date(&self) -> Option<DateId> {
        DateId::new(self.timestamp_parts().date).ok()
    }
}

// ===== TimestampParts =====

/// Date (`YYYY-MM-DD`) and time-of-day (`HH:MM:SS`) halves of a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParts {
    /// Calendar date component.
    pub date: String,
    /// Time-of-day component.
    pub time: String,
}

impl TimestampParts {
    /// Parse a timestamp, falling back to a textual split on `T` or space.
    ///
    /// Fractional seconds and zone offsets are dropped from the time part;
    /// the date is the one written in the timestamp, not converted to UTC.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Self::from_naive(dt.naive_local());
        }
        for layout in NAIVE_LAYOUTS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
                return Self::from_naive(dt);
            }
        }

        match raw.split_once(['T', ' ']) {
            Some((date, time)) => Self {
                date: date.to_string(),
                time: time.to_string(),
            },
            None => Self {
                date: raw.to_string(),
                time: String::new(),
            },
        }
    }

    fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            date: dt.format("%Y-%m-%d").to_string(),
            time: dt.format("%H:%M:%S").to_string(),
        }
    }
}

// ===== Tests =====
