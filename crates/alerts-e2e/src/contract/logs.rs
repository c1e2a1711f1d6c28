//! "Load More" pagination of an alert's event log.

use serde::{Deserialize, Serialize};
use std::iter::Peekable;

/// Page sizes of the log view.
///
/// Defaults mirror the deployed UI: 35 entries after load, 149 per
/// "Load More".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogPageSize {
    /// First page
    pub initial: usize,
    /// Each further page
    pub subsequent: usize,
}

impl Default for LogPageSize {
    fn default() -> Self {
        Self {
            initial: 35,
            subsequent: 149,
        }
    }
}

impl LogPageSize {
    /// Entries displayed after `loads` activations of "Load More", given
    /// `total` entries available
    #[must_use]
    pub fn displayed_after(&self, loads: usize, total: usize) -> usize {
        self.initial
            .saturating_add(self.subsequent.saturating_mul(loads))
            .min(total)
    }
}

/// Lazy, finite, forward-only view over a log source
pub struct LogPager<I: Iterator> {
    source: Peekable<I>,
    displayed: Vec<I::Item>,
    page_size: LogPageSize,
    loads: usize,
}

impl<I: Iterator> std::fmt::Debug for LogPager<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogPager")
            .field("displayed", &self.displayed.len())
            .field("page_size", &self.page_size)
            .field("loads", &self.loads)
            .finish()
    }
}

impl<I: Iterator> LogPager<I> {
    /// Start paging; the first page is loaded immediately
    pub fn new(source: impl IntoIterator<IntoIter = I>, page_size: LogPageSize) -> Self {
        let mut source = source.into_iter().peekable();
        let displayed = source.by_ref().take(page_size.initial).collect();
        Self {
            source,
            displayed,
            page_size,
            loads: 0,
        }
    }

    /// Whether "Load More" is offered
    pub fn has_more(&mut self) -> bool {
        self.source.peek().is_some()
    }

    /// Append the next page; returns how many entries were appended
    pub fn load_more(&mut self) -> usize {
        let before = self.displayed.len();
        self.displayed
            .extend(self.source.by_ref().take(self.page_size.subsequent));
        let appended = self.displayed.len() - before;
        if appended > 0 {
            self.loads += 1;
        }
        appended
    }

    /// Entries displayed so far, in order
    pub fn displayed(&self) -> &[I::Item] {
        &self.displayed
    }

    /// Number of successful "Load More" activations
    pub const fn loads(&self) -> usize {
        self.loads
    }
}
