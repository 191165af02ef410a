//! Crawl observer hooks.
//!
//! The engine calls these at fixed points of every crawl. All hooks default
//! to no-ops so implementations only override what they record.

use crate::engine::CompletionStatus;
use precatorio_core::CanonicalField;
use precatorio_dsr::{FieldFallback, RowIssue};
use std::time::Duration;

/// How a single page request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failure,
}

impl RequestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Success => "success",
            RequestOutcome::Failure => "failure",
        }
    }
}

/// Totals reported once a crawl stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub entity: String,
    pub status: CompletionStatus,
    pub total_records: usize,
    /// Pages received; a page whose retries ran out is not counted.
    pub total_pages: u32,
}

/// A row the decoder could not expand as sent. The affected cells hold an
/// inherited or default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeFallback<'a> {
    /// Row index within the page.
    pub row: usize,
    /// Wire column name; `None` when the whole row is affected.
    pub column: Option<&'a str>,
    /// Canonical field fed by `column`, if any.
    pub field: Option<CanonicalField>,
    pub issue: &'a RowIssue,
}

impl DecodeFallback<'_> {
    /// Metric label: canonical field, else wire column, else `row`.
    pub fn label(&self) -> &str {
        match (self.field, self.column) {
            (Some(field), _) => field.as_str(),
            (None, Some(column)) => column,
            (None, None) => "row",
        }
    }
}

pub trait CrawlObserver: Send + Sync {
    fn on_request_start(&self, _entity: &str, _page: u32) {}

    fn on_request_finished(
        &self,
        _entity: &str,
        _page: u32,
        _outcome: RequestOutcome,
        _elapsed: Duration,
    ) {
    }

    fn on_page_decoded(&self, _entity: &str, _page: u32, _records: usize) {}

    /// A field value failed coercion and took its default.
    fn on_row_fallback(&self, _entity: &str, _page: u32, _fallback: &FieldFallback) {}

    /// A cell or row fell back while decoding the page.
    fn on_decode_fallback(&self, _entity: &str, _page: u32, _fallback: &DecodeFallback<'_>) {}

    fn on_crawl_finished(&self, _summary: &CrawlSummary) {}
}

/// Observer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fallback_label() {
        let issue = RowIssue::SparseExhausted {
            expected: 2,
            supplied: 1,
        };
        let mut fallback = DecodeFallback {
            row: 3,
            column: None,
            field: None,
            issue: &issue,
        };
        assert_eq!(fallback.label(), "row");

        fallback.column = Some("Sum(t.extra)");
        assert_eq!(fallback.label(), "Sum(t.extra)");

        fallback.field = Some(CanonicalField::Comarca);
        assert_eq!(fallback.label(), "comarca");
    }
}
