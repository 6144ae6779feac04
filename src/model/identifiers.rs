//! Core identifier newtypes with smart constructors.
//!
//! Identifiers validate at construction time. Raw constructors are never
//! exported - use smart constructors only.

use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;

/// Identifier for one day's transcript (e.g., "2023-10-20").
///
/// Opaque to the viewer: ordering comes from the backend's date list,
/// never from parsing the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct DateId(String);

impl DateId {
    /// Smart constructor: validates a non-empty identifier without path separators.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidDateId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InvalidDateId::Empty);
        }
        if raw.contains(['/', '#', '?']) {
            return Err(InvalidDateId::Reserved(raw));
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DateId {
    type Error = InvalidDateId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable per-message identifier.
///
/// Any non-empty text is accepted. Where the anchor becomes an element id or
/// URL fragment it is written through [`Anchor::fragment`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawAnchor")]
pub struct Anchor(String);

impl Anchor {
    /// Smart constructor: validates a non-empty anchor.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidAnchor> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidAnchor::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the anchor text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form, safe as an element id and URL fragment.
    pub fn fragment(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backends send anchors either as strings or as numeric line offsets.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnchor {
    Number(serde_json::Number),
    Text(String),
}

impl TryFrom<RawAnchor> for Anchor {
    type Error = InvalidAnchor;

    fn try_from(value: RawAnchor) -> Result<Self, Self::Error> {
        match value {
            RawAnchor::Number(n) => Anchor::new(n.to_string()),
            RawAnchor::Text(s) => Anchor::new(s),
        }
    }
}

// ===== Error Types =====

/// Rejected [`DateId`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDateId {
    /// Empty or whitespace-only identifier.
    #[error("Date identifier cannot be empty")]
    Empty,
    /// Identifier contains a URL-reserved character.
    #[error("Date identifier contains a reserved character: {0:?}")]
    Reserved(String),
}

/// Rejected [`Anchor`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAnchor {
    /// Empty anchor.
    #[error("Anchor cannot be empty")]
    Empty,
}

// ===== Tests =====
