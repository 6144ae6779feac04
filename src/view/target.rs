//! Render target capability.
//!
//! The controller never builds a page itself. Everything visible goes through
//! this trait, one call per atomic change: a load is `begin_loading` followed
//! by exactly one `finish_loading`, and the picker/label pair is updated by a
//! single [`DateSync::sync_date`].

use crate::render::{RenderedView, ScrollIntent};
use crate::state::{DateSync, Notice, NoticeId};

/// Surface the viewer paints on.
pub trait RenderTarget: DateSync {
    /// Hide the control cluster and show the loading indicator.
    fn begin_loading(&mut self);

    /// Replace the content with `view`, position the viewport, restore the
    /// control cluster.
    fn finish_loading(&mut self, view: &RenderedView, scroll: &ScrollIntent);

    /// Enable or disable the previous/next/picker controls.
    fn set_navigation_enabled(&mut self, enabled: bool);

    /// Put `query` into the search box.
    fn set_search_input(&mut self, query: &str);

    /// Collapse or expand the control cluster.
    fn set_collapsed(&mut self, collapsed: bool);

    /// Replace the address shown for the current view.
    fn set_location(&mut self, location: &str);

    /// Show a transient notice.
    fn show_notice(&mut self, notice: &Notice);

    /// Remove a notice shown earlier.
    fn dismiss_notice(&mut self, id: NoticeId);

    /// Audible cue for failures.
    fn play_alert(&mut self);
}
