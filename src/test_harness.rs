//! Test doubles for controller tests.
//!
//! `FakeBackend` serves canned responses and records every request path;
//! `RecordingTarget` records every call the controller makes, in order, so
//! tests can assert on atomicity and sequencing.

use crate::model::{Anchor, BackendError, DateId, MessageRecord};
use crate::render::{RenderedView, ScrollIntent};
use crate::source::LogBackend;
use crate::state::{DateSelection, DateSync, DayTarget, Notice, NoticeId};
use crate::view::RenderTarget;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Build a record; panics on an invalid anchor (tests only).
pub fn record(timestamp: &str, author: &str, body: &str, anchor: &str) -> MessageRecord {
    MessageRecord::new(
        timestamp,
        author,
        body,
        Anchor::new(anchor).expect("valid anchor"),
    )
}

/// Build a date id; panics when invalid (tests only).
pub fn date(raw: &str) -> DateId {
    DateId::new(raw).expect("valid date")
}

// ===== FakeBackend =====

/// In-memory backend keyed by request path.
#[derive(Debug, Default)]
pub struct FakeBackend {
    dates: Vec<DateId>,
    days: HashMap<String, Vec<MessageRecord>>,
    searches: HashMap<String, Vec<MessageRecord>>,
    failing: RefCell<HashSet<String>>,
    calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    /// Backend with no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `dates` from `/dates`.
    pub fn with_dates(mut self, dates: &[&str]) -> Self {
        self.dates = dates.iter().map(|d| date(d)).collect();
        self
    }

    /// Serve `records` from `/logs/{day}` (`day` may be `latest`).
    pub fn with_day(mut self, day: &str, records: Vec<MessageRecord>) -> Self {
        self.days.insert(day.to_string(), records);
        self
    }

    /// Serve `records` from `/search?q={query}`.
    pub fn with_search(mut self, query: &str, records: Vec<MessageRecord>) -> Self {
        self.searches.insert(query.to_string(), records);
        self
    }

    /// Make requests to `path` fail with a transport error.
    pub fn fail(&self, path: &str) {
        self.failing.borrow_mut().insert(path.to_string());
    }

    /// Undo [`FakeBackend::fail`].
    pub fn heal(&self, path: &str) {
        self.failing.borrow_mut().remove(path);
    }

    /// Paths requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn request(&self, path: String) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(path.clone());
        if self.failing.borrow().contains(&path) {
            return Err(BackendError::Request {
                endpoint: path,
                reason: "connection refused".into(),
            });
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl LogBackend for FakeBackend {
    async fn dates(&self) -> Result<Vec<DateId>, BackendError> {
        self.request("/dates".into())?;
        Ok(self.dates.clone())
    }

    async fn logs(&self, day: &DayTarget) -> Result<Vec<MessageRecord>, BackendError> {
        let path = format!("/logs/{day}");
        self.request(path.clone())?;
        self.days
            .get(day.as_segment())
            .cloned()
            .ok_or(BackendError::Status {
                endpoint: path,
                status: 404,
            })
    }

    async fn search(&self, query: &str) -> Result<Vec<MessageRecord>, BackendError> {
        self.request(format!("/search?q={query}"))?;
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }
}

// ===== RecordingTarget =====

/// One call made on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `begin_loading`
    BeginLoading,
    /// `finish_loading`
    FinishLoading(RenderedView, ScrollIntent),
    /// `sync_date`
    SyncDate(DateSelection),
    /// `set_navigation_enabled`
    NavigationEnabled(bool),
    /// `set_search_input`
    SearchInput(String),
    /// `set_collapsed`
    Collapsed(bool),
    /// `set_location`
    Location(String),
    /// `show_notice`
    ShowNotice(Notice),
    /// `dismiss_notice`
    DismissNotice(NoticeId),
    /// `play_alert`
    Alert,
}

/// Target that only records.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    events: Vec<Event>,
}

impl RecordingTarget {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Forget what was recorded.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Most recently painted view.
    pub fn last_view(&self) -> Option<&RenderedView> {
        self.events.iter().rev().find_map(|e| match e {
            Event::FinishLoading(view, _) => Some(view),
            _ => None,
        })
    }

    /// Most recent scroll intent.
    pub fn last_scroll(&self) -> Option<&ScrollIntent> {
        self.events.iter().rev().find_map(|e| match e {
            Event::FinishLoading(_, scroll) => Some(scroll),
            _ => None,
        })
    }

    /// Most recent location.
    pub fn last_location(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Location(l) => Some(l.as_str()),
            _ => None,
        })
    }

    /// Most recent picker selection.
    pub fn last_selection(&self) -> Option<&DateSelection> {
        self.events.iter().rev().find_map(|e| match e {
            Event::SyncDate(s) => Some(s),
            _ => None,
        })
    }

    /// Notices shown so far.
    pub fn notices(&self) -> Vec<&Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::ShowNotice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Number of events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl DateSync for RecordingTarget {
    fn sync_date(&mut self, selection: &DateSelection) {
        self.events.push(Event::SyncDate(selection.clone()));
    }
}

impl RenderTarget for RecordingTarget {
    fn begin_loading(&mut self) {
        self.events.push(Event::BeginLoading);
    }

    fn finish_loading(&mut self, view: &RenderedView, scroll: &ScrollIntent) {
        self.events
            .push(Event::FinishLoading(view.clone(), scroll.clone()));
    }

    fn set_navigation_enabled(&mut self, enabled: bool) {
        self.events.push(Event::NavigationEnabled(enabled));
    }

    fn set_search_input(&mut self, query: &str) {
        self.events.push(Event::SearchInput(query.to_string()));
    }

    fn set_collapsed(&mut self, collapsed: bool) {
        self.events.push(Event::Collapsed(collapsed));
    }

    fn set_location(&mut self, location: &str) {
        self.events.push(Event::Location(location.to_string()));
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.events.push(Event::ShowNotice(notice.clone()));
    }

    fn dismiss_notice(&mut self, id: NoticeId) {
        self.events.push(Event::DismissNotice(id));
    }

    fn play_alert(&mut self) {
        self.events.push(Event::Alert);
    }
}
