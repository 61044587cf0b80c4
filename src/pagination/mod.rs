//! Pagination module
//!
//! Multi-request reads driven by explicit cursors:
//!
//! - `find_all` pages through a list with `limit`/`offset` until a page
//!   comes back short.
//! - `find_with_history` reads a record set, then its state at each
//!   history label.

mod pager;
mod types;

pub use pager::{find_all, find_with_history};
pub use types::{HistoryCursor, HistoryLabel, NextPage, PageCursor, NOW_LABEL, PAGE_SIZE};

#[cfg(test)]
mod tests;
