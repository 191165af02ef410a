//! Precatório Crawler - Query, Transport and Pagination
//!
//! Walks the court's payment schedule report one window at a time:
//! - `QueryBuilder` turns an entity, year filter and restart token into a
//!   typed semantic query request
//! - `PageTransport` posts it with bounded retry (`HttpTransport` over reqwest)
//! - `PaginationEngine` decodes each page, assigns `ordem` and follows restart
//!   tokens until the source runs dry
//! - `crawl_many` runs independent crawls under a bounded worker pool
//!
//! Observers, Prometheus metrics, record sinks and entity discovery sit
//! around the engine.

pub mod cancel;
pub mod discovery;
pub mod engine;
pub mod metrics;
pub mod observe;
pub mod pool;
pub mod query;
pub mod sink;
pub mod telemetry;
pub mod transport;

pub use cancel::CancellationFlag;
pub use discovery::{entity_names, EntityDiscovery, ENTITY_PLACEHOLDER};
pub use engine::{
    CompletionStatus, CrawlIssue, CrawlOutcome, CrawlRequest, PaginationEngine, StopReason,
};
pub use metrics::{gather_text, CrawlerMetrics, PrometheusObserver, METRICS};
pub use observe::{CrawlObserver, CrawlSummary, DecodeFallback, NoopObserver, RequestOutcome};
pub use pool::crawl_many;
pub use query::{
    PageRequest, QueryBuilder, QueryRequest, QueryTemplate, SortDirection, TemplateColumn,
    PRECATORIO_COLUMNS,
};
pub use sink::{CsvSink, MemorySink, RecordSink};
pub use telemetry::init_tracing;
pub use transport::{HttpTransport, PageTransport, RetryPolicy};

// Re-export the lower crates for convenience
pub use precatorio_core;
pub use precatorio_dsr;
