//! In-memory HTML page.
//!
//! Implements [`RenderTarget`] by keeping the page state in fields and
//! serializing it on demand. Used by the binary to print what a browser would
//! show, and by tests to inspect a painted page.

use crate::render::{Markup, RenderedView, ScrollIntent};
use crate::state::{DateSelection, DateSync, Notice, NoticeId};
use crate::view::RenderTarget;

/// Markup of the loading indicator.
pub const LOADING_INDICATOR: &str = "<div class=\"loading\"><h1>LOADING</h1></div>";

/// Page state as a browser would hold it.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    content: Markup,
    loading: bool,
    chrome_hidden: bool,
    navigation_enabled: bool,
    collapsed: bool,
    search_input: String,
    location: String,
    date: Option<DateSelection>,
    notices: Vec<Notice>,
    scroll: Option<ScrollIntent>,
    alerts: usize,
}

impl HtmlDocument {
    /// Empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Content area markup.
    pub fn content(&self) -> &Markup {
        &self.content
    }

    /// True between `begin_loading` and `finish_loading`.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the control cluster is hidden.
    pub fn chrome_hidden(&self) -> bool {
        self.chrome_hidden
    }

    /// Whether previous/next/picker are usable.
    pub fn navigation_enabled(&self) -> bool {
        self.navigation_enabled
    }

    /// Whether the control cluster is collapsed.
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// Search box value.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Current address.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Picker and label state.
    pub fn date(&self) -> Option<&DateSelection> {
        self.date.as_ref()
    }

    /// Notices on screen.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Viewport position requested by the last paint.
    pub fn scroll(&self) -> Option<&ScrollIntent> {
        self.scroll.as_ref()
    }

    /// Number of alerts played.
    pub fn alerts(&self) -> usize {
        self.alerts
    }

    /// Serialize the whole page.
    pub fn to_html(&self) -> String {
        let mut page = Markup::new();
        page.push_trusted("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>");
        match &self.date {
            Some(date) => page.push_text(&date.label),
            None => page.push_trusted("chanlog"),
        }
        page.push_trusted("</title></head>\n<body>\n");

        page.push_trusted("<div class=\"head");
        if self.collapsed {
            page.push_trusted(" collapsed");
        }
        page.push_trusted("\"");
        if self.chrome_hidden {
            page.push_trusted(" style=\"display: none\"");
        }
        page.push_trusted(">\n");
        self.push_controls(&mut page);
        page.push_trusted("</div>\n");

        if !self.notices.is_empty() {
            page.push_trusted("<div class=\"notices\">\n");
            for notice in &self.notices {
                page.push_trusted(&format!(
                    "<div class=\"notice\" data-id=\"{}\">",
                    notice.id.get()
                ));
                page.push_text(&notice.message);
                page.push_trusted("</div>\n");
            }
            page.push_trusted("</div>\n");
        }

        page.push_trusted("<div class=\"contents\"");
        if let Some(scroll) = &self.scroll {
            page.push_trusted(" data-scroll=\"");
            match scroll {
                ScrollIntent::Bottom => page.push_trusted("bottom"),
                ScrollIntent::Top => page.push_trusted("top"),
                ScrollIntent::Anchor(anchor) => page.push_text(&anchor.fragment()),
            }
            page.push_trusted("\"");
        }
        page.push_trusted(">\n");
        page.push_markup(&self.content);
        page.push_trusted("</div>\n</body>\n</html>\n");

        page.into_string()
    }

    fn push_controls(&self, page: &mut Markup) {
        let disabled = if self.navigation_enabled { "" } else { " disabled" };

        page.push_trusted(&format!("<button id=\"previous\"{disabled}>&lt;</button>\n"));
        page.push_trusted("<input type=\"date\" id=\"input-date\"");
        if let Some(date) = &self.date {
            page.push_trusted(" value=\"");
            page.push_text(date.value.as_str());
            page.push_trusted("\" min=\"");
            page.push_text(date.min.as_str());
            page.push_trusted("\" max=\"");
            page.push_text(date.max.as_str());
            page.push_trusted("\"");
        }
        page.push_trusted(&format!("{disabled}>\n"));
        page.push_trusted(&format!("<button id=\"next\"{disabled}>&gt;</button>\n"));

        page.push_trusted("<span class=\"current-date\">");
        if let Some(date) = &self.date {
            page.push_text(&date.label);
        }
        page.push_trusted("</span>\n");

        page.push_trusted("<input type=\"search\" id=\"input-search\" value=\"");
        page.push_text(&self.search_input);
        page.push_trusted("\">\n");
    }
}

impl DateSync for HtmlDocument {
    fn sync_date(&mut self, selection: &DateSelection) {
        self.date = Some(selection.clone());
    }
}

impl RenderTarget for HtmlDocument {
    fn begin_loading(&mut self) {
        self.loading = true;
        self.chrome_hidden = true;
        self.content = Markup::new();
        self.content.push_trusted(LOADING_INDICATOR);
    }

    fn finish_loading(&mut self, view: &RenderedView, scroll: &ScrollIntent) {
        self.content = view.to_markup();
        self.scroll = Some(scroll.clone());
        self.chrome_hidden = false;
        self.loading = false;
    }

    fn set_navigation_enabled(&mut self, enabled: bool) {
        self.navigation_enabled = enabled;
    }

    fn set_search_input(&mut self, query: &str) {
        self.search_input = query.to_string();
    }

    fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    fn set_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn dismiss_notice(&mut self, id: NoticeId) {
        self.notices.retain(|n| n.id != id);
    }

    fn play_alert(&mut self) {
        self.alerts += 1;
    }
}
