//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod log_view;
pub mod message;

// Re-export for convenience
pub use error::{AppError, BackendError};
pub use identifiers::{Anchor, DateId, InvalidAnchor, InvalidDateId};
pub use log_view::{group_by_date, DateGroup, LogView};
pub use message::{MessageRecord, TimestampParts};
