//! Transient notices.
//!
//! Each notice has its own id and expiry, so dismissing or expiring one never
//! touches another. Removal happens at most once per notice.

use std::time::{Duration, Instant};

/// Default lifetime of a notice.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(3000);

/// What a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A backend request failed.
    NetworkFailure,
    /// Navigation hit the first/last date or an unknown date.
    NavigationBoundary,
    /// A search was submitted with a blank query.
    EmptySearch,
}

/// Identity of a raised notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(u64);

impl NoticeId {
    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Identity.
    pub id: NoticeId,
    /// Category.
    pub kind: NoticeKind,
    /// Text shown to the reader.
    pub message: String,
    /// When it disappears on its own.
    pub expires_at: Instant,
}

/// Active notices in raise order.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    next_id: u64,
    active: Vec<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeBoard {
    /// Board whose notices live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 0,
            active: Vec::new(),
        }
    }

    /// Lifetime of new notices.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Add a notice expiring `ttl` after `now`.
    pub fn raise(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) -> Notice {
        self.next_id += 1;
        let notice = Notice {
            id: NoticeId(self.next_id),
            kind,
            message: message.into(),
            expires_at: now + self.ttl,
        };
        self.active.push(notice.clone());
        notice
    }

    /// Remove and return every notice due at `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<Notice> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|n| n.expires_at <= now);
        self.active = kept;
        expired
    }

    /// Remove one notice early. `None` if it is already gone.
    pub fn dismiss(&mut self, id: NoticeId) -> Option<Notice> {
        let position = self.active.iter().position(|n| n.id == id)?;
        Some(self.active.remove(position))
    }

    /// Notices currently shown.
    pub fn active(&self) -> &[Notice] {
        &self.active
    }

    /// Earliest pending expiry.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.active.iter().map(|n| n.expires_at).min()
    }
}
