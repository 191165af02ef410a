//! Pagination engine.
//!
//! One crawl is a strictly sequential walk over the source's windows:
//!
//! ```text
//! Init -> FetchingPage -> Decoding -> AwaitingNextToken -> FetchingPage | Done
//!              |
//!              +-> Failed (retry budget spent)
//! ```
//!
//! Every failure below the transport is absorbed (field, row, page) and
//! reported as a `CrawlIssue`; the caller always gets the records recovered
//! so far plus a completion status.

use crate::cancel::CancellationFlag;
use crate::observe::{CrawlObserver, CrawlSummary, DecodeFallback, NoopObserver, RequestOutcome};
use crate::query::{PageRequest, QueryBuilder};
use crate::transport::{HttpTransport, PageTransport};
use precatorio_core::{
    config::MAX_PAGE_SIZE,
    field::{base_name, spec_for_base_name},
    CanonicalRecord, ConfigError, CrawlerConfig, EntityMapping, EntityResolver, PaginationConfig,
    PrecatorioResult, TransportError,
};
use precatorio_dsr::{
    extract_continuation, ContinuationToken, DecodedPage, OrdemSequence, PageDecoder,
    RecordAssembler,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

// ============================================================================
// REQUEST / OUTCOME
// ============================================================================

/// What to crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Entity slug or official name.
    pub entity: String,
    pub year: Option<i32>,
    /// Overrides the configured page size.
    pub page_size: Option<u32>,
}

impl CrawlRequest {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            year: None,
            page_size: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    /// The source ran out of windows, or the page ceiling was reached.
    Complete,
    /// A page request failed after every retry.
    Partial,
    Cancelled,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Complete => "complete",
            CompletionStatus::Partial => "partial",
            CompletionStatus::Cancelled => "cancelled",
        }
    }
}

/// Why the crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoToken,
    /// The page echoed the token it was requested with.
    RepeatedToken,
    PageLimit,
    TransportFailed,
    Cancelled,
}

impl StopReason {
    pub fn status(&self) -> CompletionStatus {
        match self {
            StopReason::NoToken | StopReason::RepeatedToken | StopReason::PageLimit => {
                CompletionStatus::Complete
            }
            StopReason::TransportFailed => CompletionStatus::Partial,
            StopReason::Cancelled => CompletionStatus::Cancelled,
        }
    }
}

/// A recovered problem, located as precisely as possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlIssue {
    /// 1-based page number.
    pub page: u32,
    /// Row index within the page; `None` for page-level issues.
    pub row: Option<usize>,
    /// Wire column or canonical field name.
    pub column: Option<String>,
    pub detail: String,
}

/// Result of one crawl.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub entity: EntityMapping,
    pub year: Option<i32>,
    pub records: Vec<CanonicalRecord>,
    pub status: CompletionStatus,
    pub stop_reason: StopReason,
    /// Pages the transport returned, undecodable ones included. A page whose
    /// retries ran out is not counted.
    pub pages_fetched: u32,
    pub last_token: Option<ContinuationToken>,
    pub issues: Vec<CrawlIssue>,
    /// Set when `status` is `Partial`.
    pub transport_error: Option<TransportError>,
}

impl CrawlOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == CompletionStatus::Complete
    }
}

// ============================================================================
// ENGINE
// ============================================================================

enum CrawlState {
    Init,
    FetchingPage,
    Decoding(Value),
    AwaitingNextToken(Option<ContinuationToken>),
    Done(StopReason),
    Failed(TransportError),
}

/// Mutable state of one crawl.
struct CrawlProgress {
    page_request: PageRequest,
    sent_token: Option<ContinuationToken>,
    /// Pages received so far.
    pages: u32,
    ordem: OrdemSequence,
    records: Vec<CanonicalRecord>,
    issues: Vec<CrawlIssue>,
}

/// Drives crawls over a transport. Holds no per-crawl state, so one engine
/// can run many crawls concurrently.
pub struct PaginationEngine {
    builder: QueryBuilder,
    transport: Arc<dyn PageTransport>,
    resolver: Arc<EntityResolver>,
    observer: Arc<dyn CrawlObserver>,
    page_size: u32,
    max_pages: u32,
    decoder: PageDecoder,
    assembler: RecordAssembler,
}

impl PaginationEngine {
    pub fn new(
        builder: QueryBuilder,
        transport: Arc<dyn PageTransport>,
        resolver: Arc<EntityResolver>,
        observer: Arc<dyn CrawlObserver>,
        pagination: &PaginationConfig,
    ) -> Self {
        Self {
            builder,
            transport,
            resolver,
            observer,
            page_size: pagination.page_size,
            max_pages: pagination.max_pages,
            decoder: PageDecoder,
            assembler: RecordAssembler::new(),
        }
    }

    /// Engine over HTTP with the built-in entity table and no observer.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            QueryBuilder::new(&config.source)?,
            Arc::new(HttpTransport::new(config)?),
            Arc::new(EntityResolver::new()),
            Arc::new(NoopObserver),
            &config.pagination,
        ))
    }

    pub fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    /// Crawl every window for one entity.
    ///
    /// # Errors
    /// Only an unknown entity or an out-of-range page size. Transport
    /// exhaustion and cancellation are reported through the outcome's status.
    pub async fn run(
        &self,
        request: &CrawlRequest,
        cancel: &CancellationFlag,
    ) -> PrecatorioResult<CrawlOutcome> {
        let entity = self.resolver.resolve(&request.entity)?;
        let page_size = request.page_size.unwrap_or(self.page_size);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: format!("must be between 1 and {}", MAX_PAGE_SIZE),
            }
            .into());
        }

        tracing::info!(
            entity = %entity.slug,
            year = ?request.year,
            page_size,
            "Starting crawl"
        );

        let mut progress = CrawlProgress {
            page_request: PageRequest::first(entity.official_name.clone(), request.year, page_size),
            sent_token: None,
            pages: 0,
            ordem: OrdemSequence::new(),
            records: Vec::new(),
            issues: Vec::new(),
        };

        let mut state = CrawlState::Init;
        let (stop_reason, transport_error) = loop {
            state = match state {
                CrawlState::Init => CrawlState::FetchingPage,
                CrawlState::FetchingPage => {
                    if cancel.is_cancelled() {
                        CrawlState::Done(StopReason::Cancelled)
                    } else {
                        self.fetch(&entity, &mut progress).await
                    }
                }
                CrawlState::Decoding(body) => self.decode(&entity, &body, &mut progress),
                CrawlState::AwaitingNextToken(token) => self.advance(token, &mut progress),
                CrawlState::Done(reason) => break (reason, None),
                CrawlState::Failed(error) => break (StopReason::TransportFailed, Some(error)),
            };
        };

        let status = stop_reason.status();
        let summary = CrawlSummary {
            entity: entity.slug.clone(),
            status,
            total_records: progress.records.len(),
            total_pages: progress.pages,
        };
        self.observer.on_crawl_finished(&summary);
        match &transport_error {
            Some(error) => tracing::warn!(
                entity = %entity.slug,
                pages = progress.pages,
                records = summary.total_records,
                %error,
                "Crawl ended early"
            ),
            None => tracing::info!(
                entity = %entity.slug,
                pages = progress.pages,
                records = summary.total_records,
                status = status.as_str(),
                reason = ?stop_reason,
                "Crawl finished"
            ),
        }

        Ok(CrawlOutcome {
            entity,
            year: request.year,
            records: progress.records,
            status,
            stop_reason,
            pages_fetched: progress.pages,
            last_token: progress.sent_token,
            issues: progress.issues,
            transport_error,
        })
    }

    async fn fetch(&self, entity: &EntityMapping, progress: &mut CrawlProgress) -> CrawlState {
        let page = progress.pages + 1;
        let query = self.builder.build(&progress.page_request);

        self.observer.on_request_start(&entity.slug, page);
        let started = Instant::now();
        let result = self.transport.fetch(&query, page).await;
        let elapsed = started.elapsed();

        match result {
            Ok(body) => {
                progress.pages = page;
                self.observer
                    .on_request_finished(&entity.slug, page, RequestOutcome::Success, elapsed);
                CrawlState::Decoding(body)
            }
            Err(error) => {
                self.observer
                    .on_request_finished(&entity.slug, page, RequestOutcome::Failure, elapsed);
                CrawlState::Failed(error)
            }
        }
    }

    fn decode(&self, entity: &EntityMapping, body: &Value, progress: &mut CrawlProgress) -> CrawlState {
        let page = progress.pages;
        let decoded = match self.decoder.decode_json(body) {
            Ok(decoded) => decoded,
            Err(error) => {
                tracing::warn!(entity = %entity.slug, page, %error, "Skipping undecodable page");
                progress.issues.push(CrawlIssue {
                    page,
                    row: None,
                    column: None,
                    detail: error.to_string(),
                });
                return CrawlState::AwaitingNextToken(extract_continuation(body));
            }
        };

        self.collect_row_issues(entity, page, &decoded, progress);
        let assembled = self.assembler.assemble(&decoded, &mut progress.ordem);
        for fallback in &assembled.fallbacks {
            self.observer.on_row_fallback(&entity.slug, page, fallback);
            progress.issues.push(CrawlIssue {
                page,
                row: Some(fallback.row),
                column: Some(fallback.field.as_str().to_string()),
                detail: fallback.reason.clone(),
            });
        }

        let count = assembled.records.len();
        self.observer.on_page_decoded(&entity.slug, page, count);
        tracing::debug!(entity = %entity.slug, page, records = count, "Page decoded");
        progress.records.extend(assembled.records);

        CrawlState::AwaitingNextToken(decoded.continuation)
    }

    fn collect_row_issues(
        &self,
        entity: &EntityMapping,
        page: u32,
        decoded: &DecodedPage,
        progress: &mut CrawlProgress,
    ) {
        for issue in &decoded.issues {
            let wire_name = issue
                .column
                .and_then(|c| decoded.columns.get(c))
                .map(|c| c.wire_name.as_str());
            if issue.issue.is_fallback() {
                self.observer.on_decode_fallback(
                    &entity.slug,
                    page,
                    &DecodeFallback {
                        row: issue.row,
                        column: wire_name,
                        field: wire_name
                            .and_then(|w| spec_for_base_name(base_name(w)))
                            .map(|spec| spec.field),
                        issue: &issue.issue,
                    },
                );
            }
            let column = wire_name.map(str::to_string);
            tracing::warn!(
                entity = %entity.slug,
                page,
                row = issue.row,
                column = ?column,
                issue = %issue.issue,
                "Recovered row decode issue"
            );
            progress.issues.push(CrawlIssue {
                page,
                row: Some(issue.row),
                column,
                detail: issue.issue.to_string(),
            });
        }
    }

    fn advance(&self, token: Option<ContinuationToken>, progress: &mut CrawlProgress) -> CrawlState {
        let Some(token) = token else {
            return CrawlState::Done(StopReason::NoToken);
        };
        if progress.sent_token.as_ref() == Some(&token) {
            return CrawlState::Done(StopReason::RepeatedToken);
        }
        if progress.pages >= self.max_pages {
            tracing::warn!(max_pages = self.max_pages, "Page ceiling reached");
            return CrawlState::Done(StopReason::PageLimit);
        }
        progress.page_request = progress.page_request.continue_from(token.clone());
        progress.sent_token = Some(token);
        CrawlState::FetchingPage
    }
}

impl std::fmt::Debug for PaginationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("entities", &self.resolver.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_status() {
        assert_eq!(StopReason::NoToken.status(), CompletionStatus::Complete);
        assert_eq!(StopReason::RepeatedToken.status(), CompletionStatus::Complete);
        assert_eq!(StopReason::PageLimit.status(), CompletionStatus::Complete);
        assert_eq!(StopReason::TransportFailed.status(), CompletionStatus::Partial);
        assert_eq!(StopReason::Cancelled.status(), CompletionStatus::Cancelled);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(CompletionStatus::Partial).unwrap(),
            serde_json::json!("partial")
        );
    }

    #[test]
    fn test_crawl_request_builder() {
        let request = CrawlRequest::new("municipio-de-fortaleza")
            .with_year(2024)
            .with_page_size(100);
        assert_eq!(request.year, Some(2024));
        assert_eq!(request.page_size, Some(100));
    }

    #[test]
    fn test_from_config_builds() {
        let engine = PaginationEngine::from_config(&CrawlerConfig::default_settings()).unwrap();
        assert!(engine.resolver().len() > 100);
        assert!(format!("{:?}", engine).contains("max_pages: 100"));
    }

    #[test]
    fn test_from_config_rejects_inverted_timeouts() {
        let mut config = CrawlerConfig::default_settings();
        config.transport.min_timeout_secs = 200;
        config.transport.max_timeout_secs = 100;
        assert!(matches!(
            PaginationEngine::from_config(&config),
            Err(ConfigError::InvalidValue {
                field: "transport.max_timeout_secs",
                ..
            })
        ));
    }
}
