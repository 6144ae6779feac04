//! Date navigation state.
//!
//! Holds the backend's date list (newest first) and the index of the displayed
//! date. The index only changes through [`NavigationState::set_current_date`],
//! which pushes the picker value, the label and the picker bounds to a
//! [`DateSync`] in one call, so no observer ever sees them disagree.
//!
//! Direction: `next` moves toward newer dates (index - 1), `previous` toward
//! older dates (index + 1).

use crate::model::DateId;
use chrono::NaiveDate;
use thiserror::Error;

// ===== DateSync =====

/// Receiver of the picker/label pair.
pub trait DateSync {
    /// Show `selection` in the date picker and the current-date label together.
    fn sync_date(&mut self, selection: &DateSelection);
}

/// Everything the picker and label need for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSelection {
    /// Index into the date list.
    pub index: usize,
    /// Picker value.
    pub value: DateId,
    /// Human-readable label.
    pub label: String,
    /// Picker lower bound (oldest date).
    pub min: DateId,
    /// Picker upper bound (newest date).
    pub max: DateId,
}

// ===== Step / Boundary =====

/// Direction of a paging step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Toward index 0.
    Newer,
    /// Toward the last index.
    Older,
}

/// Why a navigation request cannot move.
///
/// Not an error in the failure sense: the controller reports these as
/// transient notices and leaves the view untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Boundary {
    /// No dates have been loaded.
    #[error("Dates are not loaded yet")]
    Unresolved,
    /// Already showing the newest date.
    #[error("Already at the beginning")]
    AtNewest,
    /// Already showing the oldest date.
    #[error("Already at the end")]
    AtOldest,
    /// The requested date is not in the list.
    #[error("No logs for {0}")]
    UnknownDate(DateId),
}

// ===== NavigationState =====

/// Ordered dates plus the current position.
///
/// `current` is `None` until a non-empty date list is loaded; while
/// unresolved every movement fails with [`Boundary::Unresolved`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    dates: Vec<DateId>,
    current: Option<usize>,
}

impl NavigationState {
    /// Unresolved state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the date list and select `requested`, or the newest date when it
    /// is absent from the list.
    ///
    /// Returns the selected index, or `None` for an empty list.
    pub fn initialize<S: DateSync + ?Sized>(
        &mut self,
        dates: Vec<DateId>,
        requested: Option<&DateId>,
        sink: &mut S,
    ) -> Option<usize> {
        self.dates = dates;
        self.current = None;
        let index = self.resolve(requested)?;
        self.set_current_date(index, sink).ok()
    }

    /// Index `requested` would resolve to: its position, else 0.
    pub fn resolve(&self, requested: Option<&DateId>) -> Option<usize> {
        if self.dates.is_empty() {
            return None;
        }
        Some(
            requested
                .and_then(|date| self.position_of(date))
                .unwrap_or(0),
        )
    }

    /// True once a non-empty date list is loaded.
    pub fn is_resolved(&self) -> bool {
        self.current.is_some()
    }

    /// Known dates, newest first.
    pub fn dates(&self) -> &[DateId] {
        &self.dates
    }

    /// Current index.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Current date.
    pub fn current_date(&self) -> Option<&DateId> {
        self.current.and_then(|i| self.dates.get(i))
    }

    /// Newest known date.
    pub fn newest(&self) -> Option<&DateId> {
        self.dates.first()
    }

    /// Oldest known date.
    pub fn oldest(&self) -> Option<&DateId> {
        self.dates.last()
    }

    /// Date at `index`.
    pub fn date_at(&self, index: usize) -> Option<&DateId> {
        self.dates.get(index)
    }

    /// Position of `date` in the list.
    pub fn position_of(&self, date: &DateId) -> Option<usize> {
        self.dates.iter().position(|d| d == date)
    }

    /// Target of one step without moving.
    pub fn peek(&self, step: Step) -> Result<usize, Boundary> {
        let current = self.current.ok_or(Boundary::Unresolved)?;
        self.peek_from(current, step)
    }

    /// Target of one step from `index` (e.g. a date still being loaded).
    pub fn peek_from(&self, index: usize, step: Step) -> Result<usize, Boundary> {
        if !self.is_resolved() {
            return Err(Boundary::Unresolved);
        }
        let index = index.min(self.dates.len().saturating_sub(1));
        match step {
            Step::Newer if index == 0 => Err(Boundary::AtNewest),
            Step::Newer => Ok(index - 1),
            Step::Older if index + 1 >= self.dates.len() => Err(Boundary::AtOldest),
            Step::Older => Ok(index + 1),
        }
    }

    /// Target of a jump without moving.
    pub fn locate(&self, date: &DateId) -> Result<usize, Boundary> {
        if !self.is_resolved() {
            return Err(Boundary::Unresolved);
        }
        self.position_of(date)
            .ok_or_else(|| Boundary::UnknownDate(date.clone()))
    }

    /// Move one date toward the newest.
    pub fn next<S: DateSync + ?Sized>(&mut self, sink: &mut S) -> Result<usize, Boundary> {
        let target = self.peek(Step::Newer)?;
        self.set_current_date(target, sink)
    }

    /// Move one date toward the oldest.
    pub fn previous<S: DateSync + ?Sized>(&mut self, sink: &mut S) -> Result<usize, Boundary> {
        let target = self.peek(Step::Older)?;
        self.set_current_date(target, sink)
    }

    /// Move to `date`.
    pub fn jump<S: DateSync + ?Sized>(
        &mut self,
        date: &DateId,
        sink: &mut S,
    ) -> Result<usize, Boundary> {
        let target = self.locate(date)?;
        self.set_current_date(target, sink)
    }

    /// Set the current index (clamped into range) and sync picker and label.
    ///
    /// Postcondition: on `Ok(i)`, `current_index() == Some(i)` and `sink` has
    /// received the selection for `i` exactly once.
    pub fn set_current_date<S: DateSync + ?Sized>(
        &mut self,
        index: usize,
        sink: &mut S,
    ) -> Result<usize, Boundary> {
        if self.dates.is_empty() {
            return Err(Boundary::Unresolved);
        }
        let index = index.min(self.dates.len() - 1);
        self.current = Some(index);
        if let Some(selection) = self.selection() {
            sink.sync_date(&selection);
        }
        Ok(index)
    }

    /// Picker/label state for the current index.
    pub fn selection(&self) -> Option<DateSelection> {
        let index = self.current?;
        let value = self.dates.get(index)?.clone();
        Some(DateSelection {
            index,
            label: date_label(&value),
            value,
            min: self.oldest()?.clone(),
            max: self.newest()?.clone(),
        })
    }
}

/// Long form of an ISO date ("Friday, 20 October 2023"); other ids verbatim.
pub fn date_label(date: &DateId) -> String {
    match NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d") {
        Ok(day) => day.format("%A, %-d %B %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
