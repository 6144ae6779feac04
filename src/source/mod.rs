//! Log backend access.
//!
//! The viewer core talks to the backend only through [`LogBackend`]:
//! - `dates()`: `GET /dates`, newest first
//! - `logs(day)`: `GET /logs/{date|latest}`, backend order
//! - `search(query)`: `GET /search?q=`, any date
//!
//! [`HttpBackend`] is the production implementation. Tests substitute an
//! in-memory backend.

use crate::model::{BackendError, DateId, MessageRecord};
use crate::state::DayTarget;
use async_trait::async_trait;

pub mod http;

pub use http::HttpBackend;

/// Read access to archived logs.
///
/// Futures are not required to be `Send`: the viewer runs on a single-threaded
/// runtime and every call is awaited by the controller that issued it.
#[async_trait(?Send)]
pub trait LogBackend {
    /// Dates with logs, newest first.
    async fn dates(&self) -> Result<Vec<DateId>, BackendError>;

    /// Records of one day in backend order.
    async fn logs(&self, day: &DayTarget) -> Result<Vec<MessageRecord>, BackendError>;

    /// Records matching `query`, in backend order.
    async fn search(&self, query: &str) -> Result<Vec<MessageRecord>, BackendError>;
}
