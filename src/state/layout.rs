//! Collapsible control cluster.
//!
//! Below the collapse width the cluster starts collapsed and the reader may
//! toggle it. Growing past the threshold expands it and forgets the toggle.

/// Viewport width under which the cluster collapses.
pub const DEFAULT_COLLAPSE_WIDTH: u32 = 800;

/// Responsive layout state.
///
/// `applied` is what the render target currently shows; the controller asks
/// for [`ResponsiveLayout::take_change`] only when it may touch the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsiveLayout {
    threshold: u32,
    width: Option<u32>,
    toggled: Option<bool>,
    applied: bool,
}

impl Default for ResponsiveLayout {
    fn default() -> Self {
        Self::new(DEFAULT_COLLAPSE_WIDTH)
    }
}

impl ResponsiveLayout {
    /// Layout collapsing below `threshold` pixels.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            width: None,
            toggled: None,
            applied: false,
        }
    }

    /// Collapse threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Last known viewport width.
    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// True when the viewport is below the threshold.
    pub fn is_narrow(&self) -> bool {
        self.width.is_some_and(|w| w < self.threshold)
    }

    /// Whether the cluster should be collapsed right now.
    pub fn desired(&self) -> bool {
        self.is_narrow() && self.toggled.unwrap_or(true)
    }

    /// Record a new viewport width.
    pub fn resize(&mut self, width: u32) {
        self.width = Some(width);
        if !self.is_narrow() {
            self.toggled = None;
        }
    }

    /// Flip the cluster. Ignored (returns `false`) in the wide regime.
    pub fn toggle(&mut self) -> bool {
        if !self.is_narrow() {
            return false;
        }
        self.toggled = Some(!self.desired());
        true
    }

    /// The collapsed state to paint, if it differs from what is painted.
    pub fn take_change(&mut self) -> Option<bool> {
        let desired = self.desired();
        if desired == self.applied {
            return None;
        }
        self.applied = desired;
        Some(desired)
    }

    /// What the target currently shows.
    pub fn applied(&self) -> bool {
        self.applied
    }
}
