//! Pagination state
//!
//! Cursors for the two multi-request reads: offset paging for `find_all`
//! and label-by-label history traversal for `find_with_history`.

use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;

/// Records requested per page by `find_all`
pub const PAGE_SIZE: u32 = 500;

/// Label meaning "the live record, no history parameter"
pub const NOW_LABEL: &str = "now";

// ============================================================================
// Offset Paging
// ============================================================================

/// Result of processing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch the page starting at this offset
    Continue { offset: u32 },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Offset cursor for `find_all`
#[derive(Debug, Clone, Default)]
pub struct PageCursor {
    /// Offset of the next page
    pub offset: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PageCursor {
    /// Start at offset zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `limit` and `offset` on a copy of the caller's params
    pub fn apply(&self, params: &mut JsonObject) {
        params.insert("limit".to_string(), json!(PAGE_SIZE));
        params.insert("offset".to_string(), json!(self.offset));
    }

    /// Record a page and decide whether another one is needed
    ///
    /// Only a full page continues. A result that is an exact multiple of
    /// the page size therefore costs one extra, empty request.
    pub fn process_page(&mut self, records_count: usize) -> NextPage {
        self.total_fetched += records_count as u64;

        if records_count != PAGE_SIZE as usize {
            self.done = true;
            return NextPage::Done;
        }

        self.offset += PAGE_SIZE;
        NextPage::Continue {
            offset: self.offset,
        }
    }
}

// ============================================================================
// History Traversal
// ============================================================================

/// A point in a record's history
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryLabel {
    /// The current state
    Now,
    /// The state at a date-like token understood by the API
    At(String),
}

impl HistoryLabel {
    /// The label as used for keys and query values
    pub fn as_str(&self) -> &str {
        match self {
            Self::Now => NOW_LABEL,
            Self::At(token) => token,
        }
    }

    /// Value of the `history` query key; `None` for the live state
    pub fn history_param(&self) -> Option<&str> {
        match self {
            Self::Now => None,
            Self::At(token) => Some(token),
        }
    }
}

impl fmt::Display for HistoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HistoryLabel {
    fn from(label: &str) -> Self {
        if label == NOW_LABEL {
            Self::Now
        } else {
            Self::At(label.to_string())
        }
    }
}

impl From<String> for HistoryLabel {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<NaiveDate> for HistoryLabel {
    fn from(date: NaiveDate) -> Self {
        Self::At(date.format("%Y-%m-%d").to_string())
    }
}

impl From<DateTime<Utc>> for HistoryLabel {
    fn from(at: DateTime<Utc>) -> Self {
        Self::At(at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Collected ids and per-label snapshots for `find_with_history`
#[derive(Debug, Clone, Default)]
pub struct HistoryCursor {
    /// Ids of the base records, in base order
    ids: Vec<JsonValue>,
    /// Id → label → snapshot
    snapshots: HashMap<String, JsonObject>,
}

impl HistoryCursor {
    /// Collect the ids of the base records
    pub fn new(records: &[JsonValue]) -> Self {
        let mut cursor = Self::default();
        for record in records {
            if let Some((key, id)) = record_id(record) {
                if cursor.snapshots.insert(key, JsonObject::new()).is_none() {
                    cursor.ids.push(id.clone());
                }
            }
        }
        cursor
    }

    /// Ids to filter each history read on
    pub fn ids(&self) -> &[JsonValue] {
        &self.ids
    }

    /// Check if there is nothing to look up
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Attach the records returned for a label to their base records
    pub fn attach(&mut self, label: &HistoryLabel, records: Vec<JsonValue>) {
        for record in records {
            if let Some((key, _)) = record_id(&record) {
                if let Some(history) = self.snapshots.get_mut(&key) {
                    history.insert(label.as_str().to_string(), record);
                }
            }
        }
    }

    /// Give every base record a `history` object keyed by label
    pub fn annotate(self, records: Vec<JsonValue>) -> Vec<JsonValue> {
        records
            .into_iter()
            .map(|mut record| {
                let history = record_id(&record)
                    .and_then(|(key, _)| self.snapshots.get(&key).cloned())
                    .unwrap_or_default();
                if let JsonValue::Object(map) = &mut record {
                    map.insert("history".to_string(), JsonValue::Object(history));
                }
                record
            })
            .collect()
    }
}

/// Lookup key and raw value of a record's id
fn record_id(record: &JsonValue) -> Option<(String, &JsonValue)> {
    let id = record.get("id")?;
    let key = crate::request::id_segment(id)?;
    Some((key, id))
}
