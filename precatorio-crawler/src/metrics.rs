//! Prometheus Metrics
//!
//! Crawler counters and histograms, plus an observer that feeds them.

use crate::observe::{CrawlObserver, CrawlSummary, DecodeFallback, RequestOutcome};
use once_cell::sync::Lazy;
use precatorio_core::{PrecatorioError, PrecatorioResult};
use precatorio_dsr::FieldFallback;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Page request latency buckets (seconds)
const REQUEST_LATENCY_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Global metrics instance, registered with the default registry on first use.
pub static METRICS: Lazy<PrecatorioResult<CrawlerMetrics>> =
    Lazy::new(|| CrawlerMetrics::with_registry(prometheus::default_registry()));

fn telemetry_error(metric: &str, e: prometheus::Error) -> PrecatorioError {
    PrecatorioError::Telemetry {
        reason: format!("Failed to register {}: {}", metric, e),
    }
}

/// Container for all crawler metrics.
#[derive(Clone)]
pub struct CrawlerMetrics {
    /// Page request counter - labels: entity, outcome
    pub requests_total: CounterVec,

    /// Page request duration histogram - labels: entity
    pub request_duration_seconds: HistogramVec,

    /// Page requests currently in flight
    pub active_requests: Gauge,

    /// Records produced - labels: entity
    pub records_processed_total: CounterVec,

    /// Coercion and decode fallbacks - labels: field
    pub row_fallbacks_total: CounterVec,

    /// Finished crawls - labels: status
    pub crawls_total: CounterVec,
}

impl CrawlerMetrics {
    /// Create all metrics and register them with `registry`.
    pub fn with_registry(registry: &Registry) -> PrecatorioResult<Self> {
        let requests_total = CounterVec::new(
            Opts::new("precatorio_requests_total", "Total page requests"),
            &["entity", "outcome"],
        )
        .map_err(|e| telemetry_error("requests_total", e))?;
        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "precatorio_request_duration_seconds",
                "Page request duration in seconds",
            )
            .buckets(REQUEST_LATENCY_BUCKETS.to_vec()),
            &["entity"],
        )
        .map_err(|e| telemetry_error("request_duration_seconds", e))?;
        let active_requests = Gauge::new(
            "precatorio_active_requests",
            "Page requests currently in flight",
        )
        .map_err(|e| telemetry_error("active_requests", e))?;
        let records_processed_total = CounterVec::new(
            Opts::new("precatorio_records_processed_total", "Records produced"),
            &["entity"],
        )
        .map_err(|e| telemetry_error("records_processed_total", e))?;
        let row_fallbacks_total = CounterVec::new(
            Opts::new(
                "precatorio_row_fallbacks_total",
                "Cells that fell back to an inherited or default value",
            ),
            &["field"],
        )
        .map_err(|e| telemetry_error("row_fallbacks_total", e))?;
        let crawls_total = CounterVec::new(
            Opts::new("precatorio_crawls_total", "Finished crawls"),
            &["status"],
        )
        .map_err(|e| telemetry_error("crawls_total", e))?;

        registry
            .register(Box::new(requests_total.clone()))
            .map_err(|e| telemetry_error("requests_total", e))?;
        registry
            .register(Box::new(request_duration_seconds.clone()))
            .map_err(|e| telemetry_error("request_duration_seconds", e))?;
        registry
            .register(Box::new(active_requests.clone()))
            .map_err(|e| telemetry_error("active_requests", e))?;
        registry
            .register(Box::new(records_processed_total.clone()))
            .map_err(|e| telemetry_error("records_processed_total", e))?;
        registry
            .register(Box::new(row_fallbacks_total.clone()))
            .map_err(|e| telemetry_error("row_fallbacks_total", e))?;
        registry
            .register(Box::new(crawls_total.clone()))
            .map_err(|e| telemetry_error("crawls_total", e))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            active_requests,
            records_processed_total,
            row_fallbacks_total,
            crawls_total,
        })
    }

    /// Record a finished page request.
    pub fn record_request(&self, entity: &str, outcome: RequestOutcome, duration_secs: f64) {
        self.requests_total
            .with_label_values(&[entity, outcome.as_str()])
            .inc();
        self.request_duration_seconds
            .with_label_values(&[entity])
            .observe(duration_secs);
    }

    pub fn record_records(&self, entity: &str, count: usize) {
        self.records_processed_total
            .with_label_values(&[entity])
            .inc_by(count as f64);
    }

    pub fn record_fallback(&self, field: &str) {
        self.row_fallbacks_total.with_label_values(&[field]).inc();
    }

    pub fn record_crawl(&self, status: &str) {
        self.crawls_total.with_label_values(&[status]).inc();
    }
}

/// Render every metric in the default registry as Prometheus text.
pub fn gather_text() -> PrecatorioResult<String> {
    encode(&prometheus::gather())
}

fn encode(families: &[prometheus::proto::MetricFamily]) -> PrecatorioResult<String> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(families, &mut buffer)
        .map_err(|e| PrecatorioError::Telemetry {
            reason: format!("Failed to encode metrics: {}", e),
        })?;
    String::from_utf8(buffer).map_err(|e| PrecatorioError::Telemetry {
        reason: format!("Metrics output is not UTF-8: {}", e),
    })
}

/// Observer feeding a `CrawlerMetrics` instance.
#[derive(Clone)]
pub struct PrometheusObserver {
    metrics: CrawlerMetrics,
}

impl PrometheusObserver {
    pub fn new(metrics: CrawlerMetrics) -> Self {
        Self { metrics }
    }

    /// Observer over the global metrics.
    pub fn global() -> PrecatorioResult<Self> {
        match &*METRICS {
            Ok(metrics) => Ok(Self::new(metrics.clone())),
            Err(e) => Err(PrecatorioError::Telemetry {
                reason: e.to_string(),
            }),
        }
    }

    pub fn metrics(&self) -> &CrawlerMetrics {
        &self.metrics
    }
}

impl CrawlObserver for PrometheusObserver {
    fn on_request_start(&self, _entity: &str, _page: u32) {
        self.metrics.active_requests.inc();
    }

    fn on_request_finished(
        &self,
        entity: &str,
        _page: u32,
        outcome: RequestOutcome,
        elapsed: Duration,
    ) {
        self.metrics.active_requests.dec();
        self.metrics
            .record_request(entity, outcome, elapsed.as_secs_f64());
    }

    fn on_page_decoded(&self, entity: &str, _page: u32, records: usize) {
        self.metrics.record_records(entity, records);
    }

    fn on_row_fallback(&self, _entity: &str, _page: u32, fallback: &FieldFallback) {
        self.metrics.record_fallback(fallback.field.as_str());
    }

    fn on_decode_fallback(&self, _entity: &str, _page: u32, fallback: &DecodeFallback<'_>) {
        self.metrics.record_fallback(fallback.label());
    }

    fn on_crawl_finished(&self, summary: &CrawlSummary) {
        self.metrics.record_crawl(summary.status.as_str());
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CompletionStatus;
    use precatorio_core::CanonicalField;
    use precatorio_dsr::RowIssue;

    fn observer() -> (Registry, PrometheusObserver) {
        let registry = Registry::new();
        let metrics = CrawlerMetrics::with_registry(&registry).unwrap();
        (registry, PrometheusObserver::new(metrics))
    }

    #[test]
    fn test_request_hooks_balance_active_gauge() {
        let (_registry, observer) = observer();
        observer.on_request_start("fortaleza", 1);
        assert_eq!(observer.metrics().active_requests.get(), 1.0);
        observer.on_request_finished("fortaleza", 1, RequestOutcome::Success, Duration::from_millis(300));
        assert_eq!(observer.metrics().active_requests.get(), 0.0);
        assert_eq!(
            observer
                .metrics()
                .requests_total
                .with_label_values(&["fortaleza", "success"])
                .get(),
            1.0
        );
        assert_eq!(
            observer
                .metrics()
                .request_duration_seconds
                .with_label_values(&["fortaleza"])
                .get_sample_count(),
            1
        );
    }

    #[test]
    fn test_counters_and_text_output() {
        let (registry, observer) = observer();
        observer.on_page_decoded("fortaleza", 1, 25);
        observer.on_row_fallback(
            "fortaleza",
            1,
            &FieldFallback {
                row: 0,
                field: CanonicalField::ValorAtual,
                reason: "bad".to_string(),
            },
        );
        observer.on_crawl_finished(&CrawlSummary {
            entity: "fortaleza".to_string(),
            status: CompletionStatus::Partial,
            total_records: 25,
            total_pages: 1,
        });

        let text = encode(&registry.gather()).unwrap();
        assert!(text.contains("precatorio_records_processed_total{entity=\"fortaleza\"} 25"));
        assert!(text.contains("precatorio_row_fallbacks_total{field=\"valor_atual\"} 1"));
        assert!(text.contains("precatorio_crawls_total{status=\"partial\"} 1"));
    }

    #[test]
    fn test_decode_fallbacks_share_field_counter() {
        let (registry, observer) = observer();
        let issue = RowIssue::IndexOutOfRange {
            dict: "D0".to_string(),
            index: "42".to_string(),
            len: 1,
        };
        observer.on_decode_fallback(
            "fortaleza",
            1,
            &DecodeFallback {
                row: 0,
                column: Some("t.comarca"),
                field: Some(CanonicalField::Comarca),
                issue: &issue,
            },
        );
        let short = RowIssue::ShortBaseRow {
            columns: 10,
            supplied: 4,
        };
        observer.on_decode_fallback(
            "fortaleza",
            1,
            &DecodeFallback {
                row: 0,
                column: None,
                field: None,
                issue: &short,
            },
        );

        let text = encode(&registry.gather()).unwrap();
        assert!(text.contains("precatorio_row_fallbacks_total{field=\"comarca\"} 1"));
        assert!(text.contains("precatorio_row_fallbacks_total{field=\"row\"} 1"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = Registry::new();
        assert!(CrawlerMetrics::with_registry(&registry).is_ok());
        assert!(matches!(
            CrawlerMetrics::with_registry(&registry),
            Err(PrecatorioError::Telemetry { .. })
        ));
    }
}
