//! View controller: route dispatch, fetch sequencing and recovery.
//!
//! Every user action that needs the backend goes through three steps:
//!
//! 1. `begin_*` validates the action, shows the loading indicator and returns a
//!    [`PendingLoad`] stamped with a fresh [`LoadEpoch`].
//! 2. [`ViewController::fetch`] talks to the backend. It only reads controller
//!    state, so several fetches may be in flight.
//! 3. [`ViewController::complete`] paints the result, unless a newer load was
//!    begun in the meantime, in which case the result is dropped as stale.
//!
//! The async convenience methods (`load`, `next`, ...) run the three steps in
//! order. Navigation state only changes in `complete`, so a failed fetch
//! leaves the previous date selected and the previous view on screen.

use crate::model::{Anchor, BackendError, DateId, LogView, MessageRecord};
use crate::render::renderer::{EMPTY_QUERY, MISSING_QUERY};
use crate::render::{LogRenderer, Palette, RenderedView, ScrollIntent};
use crate::source::LogBackend;
use crate::state::{
    DayTarget, NavigationState, NoticeBoard, NoticeId, NoticeKind, ResponsiveLayout, RouteTarget,
    Step, DEFAULT_COLLAPSE_WIDTH, DEFAULT_NOTICE_TTL,
};
use crate::view::RenderTarget;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Placeholder painted when the very first load fails.
pub const LOAD_FAILED: &str = "Could not load logs";

// ===== Types =====

/// Lifecycle of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Uninitialized,
    /// A day view is being fetched.
    Loading,
    /// A day view is on screen.
    Ready,
    /// Search results are being fetched.
    SearchLoading,
    /// Search results are on screen.
    SearchReady,
}

impl Phase {
    /// True while a fetch is outstanding.
    pub fn is_loading(self) -> bool {
        matches!(self, Phase::Loading | Phase::SearchLoading)
    }
}

/// Monotonic load counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadEpoch(u64);

impl LoadEpoch {
    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What a pending load fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// First load of a day view: dates and logs together.
    Initial {
        /// Requested day.
        day: DayTarget,
        /// Message to scroll to.
        anchor: Option<Anchor>,
    },
    /// A known date from the list (paging, jump).
    Day {
        /// Target date.
        date: DateId,
    },
    /// The newest day.
    Latest,
    /// Search results.
    Search {
        /// Non-blank query.
        query: String,
    },
}

/// A begun load awaiting its fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    epoch: LoadEpoch,
    request: LoadRequest,
}

impl PendingLoad {
    /// Epoch this load was begun in.
    pub fn epoch(&self) -> LoadEpoch {
        self.epoch
    }

    /// What is fetched.
    pub fn request(&self) -> &LoadRequest {
        &self.request
    }
}

/// Data returned by a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// A day's records.
    Day {
        /// Fresh date list (initial loads only).
        dates: Option<Vec<DateId>>,
        /// Date the records belong to, when known.
        date: Option<DateId>,
        /// Records in backend order.
        records: Vec<MessageRecord>,
    },
    /// Search hits.
    Search {
        /// Query as submitted.
        query: String,
        /// Records in backend order.
        records: Vec<MessageRecord>,
    },
}

/// Result of a fetch, handed back to [`ViewController::complete`].
pub type LoadOutcome = Result<Loaded, BackendError>;

/// How an action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// New content painted.
    Painted,
    /// The fetch failed; the previous view is back on screen.
    Failed(BackendError),
    /// A newer load superseded this one; nothing was touched.
    Stale,
    /// No fetch was needed (boundary, invalid input).
    NotStarted,
}

/// Tunables taken from configuration.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Author colors.
    pub palette: Palette,
    /// Width below which the control cluster collapses.
    pub collapse_width: u32,
    /// Lifetime of notices.
    pub notice_ttl: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            collapse_width: DEFAULT_COLLAPSE_WIDTH,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

/// What is currently painted, so a failed load can put it back.
#[derive(Debug, Clone)]
struct Painted {
    view: RenderedView,
    scroll: ScrollIntent,
    phase: Phase,
}

// ===== ViewController =====

/// Owns all viewer state and drives a [`RenderTarget`] from a [`LogBackend`].
pub struct ViewController<B, T> {
    backend: B,
    target: T,
    renderer: LogRenderer,
    navigation: NavigationState,
    layout: ResponsiveLayout,
    notices: NoticeBoard,
    phase: Phase,
    epoch: LoadEpoch,
    /// Position of the date the current load is fetching, if any.
    in_flight: Option<usize>,
    painted: Option<Painted>,
    log_view: Option<LogView>,
}

impl<B: LogBackend, T: RenderTarget> ViewController<B, T> {
    /// Controller in the `Uninitialized` phase.
    pub fn new(backend: B, target: T, options: ControllerOptions) -> Self {
        Self {
            backend,
            target,
            renderer: LogRenderer::new(options.palette),
            navigation: NavigationState::new(),
            layout: ResponsiveLayout::new(options.collapse_width),
            notices: NoticeBoard::new(options.notice_ttl),
            phase: Phase::Uninitialized,
            epoch: LoadEpoch::default(),
            in_flight: None,
            painted: None,
            log_view: None,
        }
    }

    // ----- Accessors -----

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Date list and selection.
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Layout state.
    pub fn layout(&self) -> &ResponsiveLayout {
        &self.layout
    }

    /// Active notices.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Render target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Epoch of the most recently begun load.
    pub fn epoch(&self) -> LoadEpoch {
        self.epoch
    }

    /// What is on screen.
    pub fn rendered(&self) -> Option<&RenderedView> {
        self.painted.as_ref().map(|p| &p.view)
    }

    /// Records behind the last successful load.
    pub fn log_view(&self) -> Option<&LogView> {
        self.log_view.as_ref()
    }

    // ----- Begin -----

    /// Resolve `location` and begin the matching load.
    ///
    /// A search location without a usable query paints its placeholder
    /// immediately and returns `None`.
    pub fn begin_load(&mut self, location: &str) -> Option<PendingLoad> {
        let route = RouteTarget::parse(location);
        info!(location, ?route, "Loading location");

        match route {
            RouteTarget::DefaultView { date, anchor } => Some(self.begin(LoadRequest::Initial {
                day: date.unwrap_or(DayTarget::Latest),
                anchor,
            })),
            RouteTarget::SearchView { query: None } => {
                self.paint_search_placeholder("", MISSING_QUERY);
                None
            }
            RouteTarget::SearchView { query: Some(query) } => {
                self.target.set_search_input(&query);
                if query.trim().is_empty() {
                    self.paint_search_placeholder(&query, EMPTY_QUERY);
                    return None;
                }
                Some(self.begin(LoadRequest::Search { query }))
            }
        }
    }

    /// Begin loading the next newer date.
    pub fn begin_next(&mut self) -> Option<PendingLoad> {
        self.begin_step(Step::Newer)
    }

    /// Begin loading the next older date.
    pub fn begin_previous(&mut self) -> Option<PendingLoad> {
        self.begin_step(Step::Older)
    }

    /// Begin loading `date`; unknown dates raise a notice instead.
    pub fn begin_jump(&mut self, date: &DateId) -> Option<PendingLoad> {
        match self.navigation.locate(date) {
            Ok(_) => Some(self.begin(LoadRequest::Day { date: date.clone() })),
            Err(boundary) => {
                self.raise_notice(NoticeKind::NavigationBoundary, boundary.to_string());
                None
            }
        }
    }

    /// Begin loading the newest day.
    pub fn begin_show_latest(&mut self) -> Option<PendingLoad> {
        Some(self.begin(LoadRequest::Latest))
    }

    /// Begin a search; blank queries raise a notice instead.
    pub fn begin_search(&mut self, query: &str) -> Option<PendingLoad> {
        self.target.set_search_input(query);
        if query.trim().is_empty() {
            self.raise_notice(NoticeKind::EmptySearch, EMPTY_QUERY);
            return None;
        }
        Some(self.begin(LoadRequest::Search {
            query: query.to_string(),
        }))
    }

    /// Steps from the date still loading, so repeated actions accumulate.
    fn begin_step(&mut self, step: Step) -> Option<PendingLoad> {
        let peeked = match self.in_flight {
            Some(index) => self.navigation.peek_from(index, step),
            None => self.navigation.peek(step),
        };
        let target = match peeked {
            Ok(index) => self.navigation.date_at(index).cloned(),
            Err(boundary) => {
                debug!(?step, %boundary, "Navigation boundary");
                self.raise_notice(NoticeKind::NavigationBoundary, boundary.to_string());
                return None;
            }
        };
        target.map(|date| self.begin(LoadRequest::Day { date }))
    }

    fn begin(&mut self, request: LoadRequest) -> PendingLoad {
        self.epoch = LoadEpoch(self.epoch.0 + 1);
        self.in_flight = match &request {
            LoadRequest::Day { date } => self.navigation.position_of(date),
            _ => None,
        };
        self.phase = match request {
            LoadRequest::Search { .. } => Phase::SearchLoading,
            _ => Phase::Loading,
        };
        self.target.begin_loading();
        debug!(epoch = self.epoch.0, ?request, "Load begun");

        PendingLoad {
            epoch: self.epoch,
            request,
        }
    }

    // ----- Fetch -----

    /// Fetch what `pending` needs from the backend.
    ///
    /// Initial loads request dates and logs concurrently, then fall back to
    /// the newest listed date when the requested one is unknown, or when
    /// `latest` has no records.
    pub async fn fetch(&self, pending: &PendingLoad) -> LoadOutcome {
        match &pending.request {
            LoadRequest::Initial { day, .. } => {
                let (dates, logs) = tokio::join!(self.backend.dates(), self.backend.logs(day));
                let dates = dates?;
                let newest = dates.first().cloned();

                let (date, records) = match (day, newest) {
                    (DayTarget::Date(requested), Some(newest)) if !dates.contains(requested) => {
                        warn!(date = %requested, fallback = %newest, "Requested date not listed");
                        let records = self.backend.logs(&DayTarget::Date(newest.clone())).await?;
                        (Some(newest), records)
                    }
                    (DayTarget::Date(requested), _) => (Some(requested.clone()), logs?),
                    (DayTarget::Latest, newest) => self.latest_or_newest(logs?, newest).await?,
                };

                Ok(Loaded::Day {
                    dates: Some(dates),
                    date,
                    records,
                })
            }
            LoadRequest::Day { date } => {
                let records = self.backend.logs(&DayTarget::Date(date.clone())).await?;
                Ok(Loaded::Day {
                    dates: None,
                    date: Some(date.clone()),
                    records,
                })
            }
            LoadRequest::Latest => {
                let logs = self.backend.logs(&DayTarget::Latest).await?;
                let newest = self.navigation.newest().cloned();
                let (date, records) = self.latest_or_newest(logs, newest).await?;
                Ok(Loaded::Day {
                    dates: None,
                    date,
                    records,
                })
            }
            LoadRequest::Search { query } => {
                let records = self.backend.search(query).await?;
                Ok(Loaded::Search {
                    query: query.clone(),
                    records,
                })
            }
        }
    }

    async fn latest_or_newest(
        &self,
        records: Vec<MessageRecord>,
        newest: Option<DateId>,
    ) -> Result<(Option<DateId>, Vec<MessageRecord>), BackendError> {
        match newest {
            Some(newest) if records.is_empty() => {
                debug!(fallback = %newest, "Latest is empty");
                let records = self.backend.logs(&DayTarget::Date(newest.clone())).await?;
                Ok((Some(newest), records))
            }
            newest => {
                let date = records.first().and_then(MessageRecord::date).or(newest);
                Ok((date, records))
            }
        }
    }

    // ----- Complete -----

    /// Apply a fetch result, unless a newer load has begun since.
    pub fn complete(&mut self, pending: PendingLoad, outcome: LoadOutcome) -> Applied {
        if pending.epoch != self.epoch {
            debug!(
                stale = pending.epoch.0,
                current = self.epoch.0,
                "Dropping stale result"
            );
            return Applied::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(loaded) => {
                self.apply(pending.request, loaded);
                Applied::Painted
            }
            Err(error) => {
                self.recover(&error);
                Applied::Failed(error)
            }
        }
    }

    fn apply(&mut self, request: LoadRequest, loaded: Loaded) {
        match loaded {
            Loaded::Day {
                dates,
                date,
                records,
            } => {
                match dates {
                    Some(dates) => {
                        self.navigation
                            .initialize(dates, date.as_ref(), &mut self.target);
                    }
                    None => {
                        if let Some(index) = self.navigation.resolve(date.as_ref()) {
                            // Resolved above, so this cannot hit Unresolved.
                            let _ = self.navigation.set_current_date(index, &mut self.target);
                        }
                    }
                }

                let anchor = match &request {
                    LoadRequest::Initial { anchor, .. } => anchor.clone(),
                    _ => None,
                };
                let latest = matches!(
                    request,
                    LoadRequest::Latest
                        | LoadRequest::Initial {
                            day: DayTarget::Latest,
                            ..
                        }
                );

                let scroll = match &anchor {
                    Some(a) if records.iter().any(|r| r.anchor() == a) => {
                        ScrollIntent::Anchor(a.clone())
                    }
                    _ if records.is_empty() => ScrollIntent::Top,
                    _ => ScrollIntent::Bottom,
                };
                let route = RouteTarget::DefaultView {
                    date: if latest {
                        None
                    } else {
                        date.clone().map(DayTarget::Date)
                    },
                    anchor,
                };

                info!(date = ?date, records = records.len(), "Day loaded");
                let view = LogView::Day { date, records };
                self.paint(view, scroll, Phase::Ready);
                self.target.set_location(&route.to_location());
            }
            Loaded::Search { query, records } => {
                info!(%query, hits = records.len(), "Search loaded");
                let route = RouteTarget::SearchView {
                    query: Some(query.clone()),
                };
                self.paint(LogView::search(query, records), ScrollIntent::Top, Phase::SearchReady);
                self.target.set_location(&route.to_location());
            }
        }
    }

    fn paint(&mut self, view: LogView, scroll: ScrollIntent, phase: Phase) {
        let rendered = self.renderer.render_view(&view);
        self.target.finish_loading(&rendered, &scroll);
        self.target
            .set_navigation_enabled(self.navigation.is_resolved());
        self.phase = phase;
        self.painted = Some(Painted {
            view: rendered,
            scroll,
            phase,
        });
        self.log_view = Some(view);
        self.apply_layout();
    }

    fn paint_search_placeholder(&mut self, query: &str, message: &str) {
        self.epoch = LoadEpoch(self.epoch.0 + 1);
        self.in_flight = None;
        self.target.begin_loading();
        let rendered = RenderedView::placeholder(message);
        self.target.finish_loading(&rendered, &ScrollIntent::Top);
        self.target
            .set_navigation_enabled(self.navigation.is_resolved());
        self.phase = Phase::SearchReady;
        self.painted = Some(Painted {
            view: rendered,
            scroll: ScrollIntent::Top,
            phase: Phase::SearchReady,
        });
        self.log_view = Some(LogView::search(query, Vec::new()));
        self.apply_layout();
    }

    fn recover(&mut self, error: &BackendError) {
        warn!(%error, "Load failed");
        self.raise_notice(NoticeKind::NetworkFailure, error.to_string());
        self.target.play_alert();

        let painted = self.painted.clone().unwrap_or_else(|| Painted {
            view: RenderedView::placeholder(LOAD_FAILED),
            scroll: ScrollIntent::Top,
            phase: match self.phase {
                Phase::SearchLoading => Phase::SearchReady,
                _ => Phase::Ready,
            },
        });
        self.target.finish_loading(&painted.view, &painted.scroll);
        self.target
            .set_navigation_enabled(self.navigation.is_resolved());
        self.phase = painted.phase;
        self.painted = Some(painted);
        self.apply_layout();
    }

    // ----- Async conveniences -----

    /// Load `location` (initial page load).
    pub async fn load(&mut self, location: &str) -> Applied {
        let pending = self.begin_load(location);
        self.run(pending).await
    }

    /// Show the next newer date.
    pub async fn next(&mut self) -> Applied {
        let pending = self.begin_next();
        self.run(pending).await
    }

    /// Show the next older date.
    pub async fn previous(&mut self) -> Applied {
        let pending = self.begin_previous();
        self.run(pending).await
    }

    /// Show `date`.
    pub async fn jump(&mut self, date: &DateId) -> Applied {
        let pending = self.begin_jump(date);
        self.run(pending).await
    }

    /// Show the newest day.
    pub async fn show_latest(&mut self) -> Applied {
        let pending = self.begin_show_latest();
        self.run(pending).await
    }

    /// Show search results for `query`.
    pub async fn search(&mut self, query: &str) -> Applied {
        let pending = self.begin_search(query);
        self.run(pending).await
    }

    async fn run(&mut self, pending: Option<PendingLoad>) -> Applied {
        match pending {
            Some(pending) => {
                let outcome = self.fetch(&pending).await;
                self.complete(pending, outcome)
            }
            None => Applied::NotStarted,
        }
    }

    // ----- Layout -----

    /// Record a new viewport width.
    pub fn resize(&mut self, width: u32) {
        self.layout.resize(width);
        self.apply_layout();
    }

    /// Flip the control cluster. Returns `false` in the wide regime.
    pub fn toggle_collapse(&mut self) -> bool {
        let toggled = self.layout.toggle();
        self.apply_layout();
        toggled
    }

    /// Push a layout change unless content is being replaced.
    fn apply_layout(&mut self) {
        if self.phase.is_loading() {
            return;
        }
        if let Some(collapsed) = self.layout.take_change() {
            debug!(collapsed, "Layout changed");
            self.target.set_collapsed(collapsed);
        }
    }

    // ----- Notices -----

    fn raise_notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let notice = self.notices.raise(kind, message, Instant::now());
        self.target.show_notice(&notice);
    }

    /// Remove notices due at `now`. Returns how many were removed.
    pub fn tick(&mut self, now: Instant) -> usize {
        let expired = self.notices.expire(now);
        for notice in &expired {
            self.target.dismiss_notice(notice.id);
        }
        expired.len()
    }

    /// Dismiss a notice early. `false` if it is already gone.
    pub fn dismiss_notice(&mut self, id: NoticeId) -> bool {
        match self.notices.dismiss(id) {
            Some(notice) => {
                self.target.dismiss_notice(notice.id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
