//! Viewer state (pure).
//!
//! All state transitions are plain functions testable without a backend or a
//! render target.

pub mod layout;
pub mod navigation;
pub mod notice;
pub mod route;

// Re-export for convenience
pub use layout::{ResponsiveLayout, DEFAULT_COLLAPSE_WIDTH};
pub use navigation::{date_label, Boundary, DateSelection, DateSync, NavigationState, Step};
pub use notice::{Notice, NoticeBoard, NoticeId, NoticeKind, DEFAULT_NOTICE_TTL};
pub use route::{DayTarget, RouteTarget};
