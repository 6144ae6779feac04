//! Views over fetched records: a single day, or search hits grouped by day.

use crate::model::message::UNDATED;
use crate::model::{DateId, MessageRecord};
use std::collections::HashMap;

/// Records that share one calendar date, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    /// Date shared by every record in the group.
    pub date: DateId,
    /// Records in the order the backend returned them.
    pub records: Vec<MessageRecord>,
}

/// What the content area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogView {
    /// Transcript of one day. `date` is `None` when the day could not be
    /// resolved (e.g., an empty "latest" log).
    Day {
        /// Displayed date.
        date: Option<DateId>,
        /// Records of that day.
        records: Vec<MessageRecord>,
    },
    /// Search results grouped by date.
    Search {
        /// Query that produced the results.
        query: String,
        /// Groups in first-seen order.
        groups: Vec<DateGroup>,
    },
}

impl LogView {
    /// Build a search view by grouping `records` by date.
    pub fn search(query: impl Into<String>, records: Vec<MessageRecord>) -> Self {
        Self::Search {
            query: query.into(),
            groups: group_by_date(records),
        }
    }

    /// Total number of records in the view.
    pub fn record_count(&self) -> usize {
        match self {
            LogView::Day { records, .. } => records.len(),
            LogView::Search { groups, .. } => groups.iter().map(|g| g.records.len()).sum(),
        }
    }
}

/// Stable grouping by date.
///
/// Groups appear in the order their date is first seen, and records keep
/// their relative order inside each group. Records without a usable date
/// land in an [`UNDATED`] group.
pub fn group_by_date(records: Vec<MessageRecord>) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    let mut positions: HashMap<DateId, usize> = HashMap::new();

    for record in records {
        let date = match record.date() {
            Some(date) => date,
            None => match DateId::new(UNDATED) {
                Ok(date) => date,
                Err(_) => continue,
            },
        };

        match positions.get(&date) {
            Some(&index) => groups[index].records.push(record),
            None => {
                positions.insert(date.clone(), groups.len());
                groups.push(DateGroup {
                    date,
                    records: vec![record],
                });
            }
        }
    }

    groups
}
