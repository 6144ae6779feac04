//! Rendering of records into message fragments and whole views.
//!
//! The renderer is stateless apart from its palette: the same records always
//! produce the same markup. Painting and scrolling belong to the render target.

use crate::model::{Anchor, DateGroup, DateId, LogView, MessageRecord};
use crate::render::color::Palette;
use crate::render::format;
use crate::render::markup::Markup;

/// Placeholder for a search view without a `q` parameter.
pub const MISSING_QUERY: &str = "Search parameter is missing in URL";
/// Placeholder for a blank search query.
pub const EMPTY_QUERY: &str = "Empty expression string";
/// Placeholder for a search without hits.
pub const NO_RESULTS: &str = "No results";

/// Where a fragment is shown, which decides its element id and link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkContext {
    /// Inside a single day's transcript: `#anchor`.
    Day,
    /// Inside search results: `/{date}#anchor`, since anchors repeat across days.
    Search,
}

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFragment {
    /// Time of day shown in brackets.
    pub time: String,
    /// Author nickname.
    pub author: String,
    /// CSS color assigned to the author.
    pub author_color: String,
    /// Formatted body.
    pub body: Markup,
    /// Anchor of the underlying record.
    pub anchor: Anchor,
    /// Element id of the time link.
    pub element_id: String,
    /// Deep-link target of the time link.
    pub href: String,
}

impl MessageFragment {
    /// Serialize the fragment.
    pub fn to_markup(&self) -> Markup {
        let mut out = Markup::new();
        out.push_trusted("<div class=\"message\"><a id=\"");
        out.push_text(&self.element_id);
        out.push_trusted("\" class=\"time\" href=\"");
        out.push_text(&self.href);
        out.push_trusted("\">[");
        out.push_text(&self.time);
        out.push_trusted("]</a> <span class=\"from\" style=\"color: ");
        out.push_text(&self.author_color);
        out.push_trusted("\">&lt;");
        out.push_text(&self.author);
        out.push_trusted("&gt;</span> <span class=\"text\">");
        out.push_markup(&self.body);
        out.push_trusted("</span></div>");
        out
    }
}

/// A date header followed by that date's search hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    /// Date of the section.
    pub date: DateId,
    /// Rendered header.
    pub header: Markup,
    /// Rendered messages.
    pub messages: Vec<MessageFragment>,
}

/// Content ready to be painted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    /// One day's transcript.
    Day {
        /// Displayed date, if known.
        date: Option<DateId>,
        /// Messages in backend order.
        messages: Vec<MessageFragment>,
    },
    /// Search results.
    Search {
        /// Query that produced the results.
        query: String,
        /// Sections in first-seen date order.
        sections: Vec<RenderedSection>,
    },
    /// Informational text in place of content.
    Placeholder {
        /// Message shown to the reader.
        message: String,
    },
}

impl RenderedView {
    /// Placeholder view with `message`.
    pub fn placeholder(message: impl Into<String>) -> Self {
        RenderedView::Placeholder {
            message: message.into(),
        }
    }

    /// Number of message fragments in the view.
    pub fn message_count(&self) -> usize {
        match self {
            RenderedView::Day { messages, .. } => messages.len(),
            RenderedView::Search { sections, .. } => {
                sections.iter().map(|s| s.messages.len()).sum()
            }
            RenderedView::Placeholder { .. } => 0,
        }
    }

    /// All fragments in paint order.
    pub fn fragments(&self) -> Vec<&MessageFragment> {
        match self {
            RenderedView::Day { messages, .. } => messages.iter().collect(),
            RenderedView::Search { sections, .. } => {
                sections.iter().flat_map(|s| s.messages.iter()).collect()
            }
            RenderedView::Placeholder { .. } => Vec::new(),
        }
    }

    /// Serialize the whole content area.
    pub fn to_markup(&self) -> Markup {
        let mut out = Markup::new();
        match self {
            RenderedView::Day { messages, .. } => {
                for message in messages {
                    out.push_markup(&message.to_markup());
                    out.push_trusted("\n");
                }
            }
            RenderedView::Search { sections, .. } => {
                for section in sections {
                    out.push_markup(&section.header);
                    out.push_trusted("\n");
                    for message in &section.messages {
                        out.push_markup(&message.to_markup());
                        out.push_trusted("\n");
                    }
                }
            }
            RenderedView::Placeholder { message } => {
                out.push_trusted("<div class=\"placeholder\">");
                out.push_text(message);
                out.push_trusted("</div>\n");
            }
        }
        out
    }
}

/// How the viewport is positioned after painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollIntent {
    /// Newest message (end of a day view).
    Bottom,
    /// A deep-linked message.
    Anchor(Anchor),
    /// Start of the content (search results, placeholders).
    Top,
}

/// Turns records into markup.
#[derive(Debug, Clone, Default)]
pub struct LogRenderer {
    palette: Palette,
}

impl LogRenderer {
    /// Renderer using `palette` for author colors.
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Palette in use.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render one record.
    pub fn render_message(&self, record: &MessageRecord, context: LinkContext) -> MessageFragment {
        let parts = record.timestamp_parts();
        let anchor = record.anchor().clone();
        let fragment = anchor.fragment();
        let (element_id, href) = match (context, record.date()) {
            (LinkContext::Search, Some(date)) => (
                format!("{date}-{fragment}"),
                format!("/{date}#{fragment}"),
            ),
            _ => (fragment.to_string(), format!("#{fragment}")),
        };

        MessageFragment {
            time: parts.time,
            author: record.author().to_string(),
            author_color: self.palette.color_for(record.author()).to_string(),
            body: format::format(record.body()),
            anchor,
            element_id,
            href,
        }
    }

    /// Render records in order. A malformed body only affects its own fragment.
    pub fn render_messages(
        &self,
        records: &[MessageRecord],
        context: LinkContext,
    ) -> Vec<MessageFragment> {
        records
            .iter()
            .map(|record| self.render_message(record, context))
            .collect()
    }

    /// Header introducing one date's search hits.
    pub fn render_date_header(&self, date: &DateId) -> Markup {
        let mut out = Markup::new();
        out.push_trusted("<p class=\"date-header\">from <a href=\"/");
        out.push_text(date.as_str());
        out.push_trusted("\">");
        out.push_text(date.as_str());
        out.push_trusted("</a></p>");
        out
    }

    /// Render a log view, substituting placeholders for empty results.
    pub fn render_view(&self, view: &LogView) -> RenderedView {
        match view {
            LogView::Day { date, records } if records.is_empty() => match date {
                Some(date) => RenderedView::placeholder(format!("No results for date: {date}")),
                None => RenderedView::placeholder(NO_RESULTS),
            },
            LogView::Day { date, records } => RenderedView::Day {
                date: date.clone(),
                messages: self.render_messages(records, LinkContext::Day),
            },
            LogView::Search { groups, .. } if groups.is_empty() => {
                RenderedView::placeholder(NO_RESULTS)
            }
            LogView::Search { query, groups } => RenderedView::Search {
                query: query.clone(),
                sections: groups.iter().map(|g| self.render_section(g)).collect(),
            },
        }
    }

    fn render_section(&self, group: &DateGroup) -> RenderedSection {
        RenderedSection {
            date: group.date.clone(),
            header: self.render_date_header(&group.date),
            messages: self.render_messages(&group.records, LinkContext::Search),
        }
    }
}

/// Plaintext transcript: `[time] <author> body` per line, codes stripped.
///
/// Search views put a `-- date --` line before each group.
pub fn render_plaintext(view: &LogView) -> String {
    let mut out = String::new();

    match view {
        LogView::Day { records, .. } => write_plain_records(records, &mut out),
        LogView::Search { groups, .. } => {
            for group in groups {
                out.push_str(&format!("-- {} --\n", group.date));
                write_plain_records(&group.records, &mut out);
            }
        }
    }

    out
}

fn write_plain_records(records: &[MessageRecord], out: &mut String) {
    for record in records {
        let parts = record.timestamp_parts();
        out.push_str(&format!(
            "[{}] <{}> {}\n",
            parts.time,
            record.author(),
            format::strip(record.body())
        ));
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
