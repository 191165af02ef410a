//! Precatório Test Utilities
//!
//! Shared test infrastructure for the crawler workspace:
//! - Scripted transport replaying canned pages and failures
//! - Recording observer capturing every hook call
//! - Page fixtures producing DSR JSON with dictionaries and delta rows
//! - Proptest generators and assertions

pub use precatorio_core::{
    CanonicalField, CanonicalRecord, EntityResolver, PaginationConfig, SourceConfig,
    TransportCause, TransportError,
};
pub use precatorio_crawler::{
    CancellationFlag, CrawlObserver, CrawlSummary, DecodeFallback, PageTransport, PaginationEngine, QueryBuilder,
    QueryRequest, RequestOutcome, RetryPolicy,
};

use async_trait::async_trait;
use precatorio_dsr::FieldFallback;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// SCRIPTED TRANSPORT
// ============================================================================

/// Transport replaying a fixed script of responses.
///
/// Each attempt consumes one script entry, so a retryable failure followed by
/// a page exercises the retry path. Every `fetch` call records the serialized
/// request.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<Value, TransportCause>>>,
    requests: Mutex<Vec<Value>>,
    retry: RetryPolicy,
    cancel_after: Option<(usize, CancellationFlag)>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            retry: RetryPolicy::immediate(1),
            cancel_after: None,
        }
    }

    /// Transport that serves `pages` in order.
    pub fn with_pages(pages: impl IntoIterator<Item = Value>) -> Self {
        let transport = Self::new();
        for page in pages {
            transport.push_page(page);
        }
        transport
    }

    pub fn push_page(&self, body: Value) {
        lock(&self.script).push_back(Ok(body));
    }

    pub fn push_failure(&self, cause: TransportCause) {
        lock(&self.script).push_back(Err(cause));
    }

    /// Retry attempts per page, without backoff.
    pub fn with_attempts(mut self, max_attempts: u32) -> Self {
        self.retry = RetryPolicy::immediate(max_attempts);
        self
    }

    /// Set `flag` once `fetches` requests have been served.
    pub fn cancel_after(mut self, fetches: usize, flag: CancellationFlag) -> Self {
        self.cancel_after = Some((fetches, flag));
        self
    }

    /// Serialized requests, in fetch order.
    pub fn requests(&self) -> Vec<Value> {
        lock(&self.requests).clone()
    }

    /// Script entries not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }

    fn next_entry(&self) -> Result<Value, TransportCause> {
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportCause::Network {
                    reason: "script exhausted".to_string(),
                })
            })
    }
}

#[async_trait]
impl PageTransport for ScriptedTransport {
    async fn fetch(&self, request: &QueryRequest, page: u32) -> Result<Value, TransportError> {
        let served = {
            let mut requests = lock(&self.requests);
            requests.push(serde_json::to_value(request).unwrap_or(Value::Null));
            requests.len()
        };
        let result = self
            .retry
            .run(page, |_attempt| std::future::ready(self.next_entry()))
            .await;
        if let Some((fetches, flag)) = &self.cancel_after {
            if served >= *fetches {
                flag.cancel();
            }
        }
        result
    }
}

// ============================================================================
// RECORDING OBSERVER
// ============================================================================

/// One observer hook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    RequestStart {
        entity: String,
        page: u32,
    },
    RequestFinished {
        entity: String,
        page: u32,
        outcome: RequestOutcome,
    },
    PageDecoded {
        entity: String,
        page: u32,
        records: usize,
    },
    RowFallback {
        entity: String,
        page: u32,
        field: CanonicalField,
    },
    DecodeFallback {
        entity: String,
        page: u32,
        row: usize,
        field: Option<CanonicalField>,
    },
    CrawlFinished(CrawlSummary),
}

/// Observer keeping every event in call order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        lock(&self.events).clone()
    }

    /// The summary passed to `on_crawl_finished`, if it was called.
    pub fn summary(&self) -> Option<CrawlSummary> {
        lock(&self.events).iter().rev().find_map(|e| match e {
            ObservedEvent::CrawlFinished(summary) => Some(summary.clone()),
            _ => None,
        })
    }

    fn push(&self, event: ObservedEvent) {
        lock(&self.events).push(event);
    }
}

impl CrawlObserver for RecordingObserver {
    fn on_request_start(&self, entity: &str, page: u32) {
        self.push(ObservedEvent::RequestStart {
            entity: entity.to_string(),
            page,
        });
    }

    fn on_request_finished(&self, entity: &str, page: u32, outcome: RequestOutcome, _elapsed: Duration) {
        self.push(ObservedEvent::RequestFinished {
            entity: entity.to_string(),
            page,
            outcome,
        });
    }

    fn on_page_decoded(&self, entity: &str, page: u32, records: usize) {
        self.push(ObservedEvent::PageDecoded {
            entity: entity.to_string(),
            page,
            records,
        });
    }

    fn on_row_fallback(&self, entity: &str, page: u32, fallback: &FieldFallback) {
        self.push(ObservedEvent::RowFallback {
            entity: entity.to_string(),
            page,
            field: fallback.field,
        });
    }

    fn on_decode_fallback(&self, entity: &str, page: u32, fallback: &DecodeFallback<'_>) {
        self.push(ObservedEvent::DecodeFallback {
            entity: entity.to_string(),
            page,
            row: fallback.row,
            field: fallback.field,
        });
    }

    fn on_crawl_finished(&self, summary: &CrawlSummary) {
        self.push(ObservedEvent::CrawlFinished(summary.clone()));
    }
}

/// Engine over a scripted transport and recording observer with the
/// built-in entity table.
pub fn scripted_engine(
    transport: Arc<ScriptedTransport>,
    observer: Arc<RecordingObserver>,
    pagination: &PaginationConfig,
) -> PaginationEngine {
    let builder = QueryBuilder::new(&SourceConfig::default())
        .expect("default query template is valid");
    PaginationEngine::new(
        builder,
        transport,
        Arc::new(EntityResolver::new()),
        observer,
        pagination,
    )
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! DSR page builders.

    use super::*;
    use serde_json::{json, Map};

    /// Column of the comarca, dictionary-encoded in fixtures.
    pub const COMARCA_COLUMN: usize = 8;

    /// Column of the natureza.
    pub const NATUREZA_COLUMN: usize = 2;

    /// Column of the updated value.
    pub const VALOR_ATUAL_COLUMN: usize = 9;

    const COMARCA_DICT: &str = "D0";

    /// One row's wire values, in the default template's column order.
    #[derive(Debug, Clone, PartialEq)]
    pub struct FixtureRow {
        pub values: Vec<Value>,
    }

    impl FixtureRow {
        /// A typical row with the given process number, comarca and value.
        pub fn precatorio(processo: &str, comarca: &str, valor_atual: &str) -> Self {
            Self {
                values: vec![
                    json!(processo),
                    json!(2024),
                    json!("ALIMENTAR"),
                    json!("datetime(2022,1,15,0,0,0)"),
                    json!("PRIORIDADE IDADE"),
                    json!("1.000,00"),
                    json!(1),
                    json!("PENDENTE"),
                    json!(comarca),
                    json!(valor_atual),
                ],
            }
        }

        /// Replace one column's value.
        pub fn with(mut self, column: usize, value: Value) -> Self {
            self.values[column] = value;
            self
        }
    }

    /// Builder for a query response page.
    ///
    /// The first row carries the schema and every value; later rows are
    /// delta-encoded against the previous row. Comarca values go through a
    /// value dictionary.
    #[derive(Debug, Clone)]
    pub struct PageFixture {
        wire_names: Vec<String>,
        rows: Vec<FixtureRow>,
        restart_token: Option<Value>,
    }

    impl Default for PageFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PageFixture {
        pub fn new() -> Self {
            let wire_names = QueryBuilder::new(&SourceConfig::default())
                .expect("default query template is valid")
                .wire_names();
            Self {
                wire_names,
                rows: Vec::new(),
                restart_token: None,
            }
        }

        pub fn row(mut self, row: FixtureRow) -> Self {
            self.rows.push(row);
            self
        }

        pub fn rows(mut self, rows: impl IntoIterator<Item = FixtureRow>) -> Self {
            self.rows.extend(rows);
            self
        }

        /// `count` rows numbered from `first`, sharing one comarca.
        pub fn numbered(self, first: u64, count: u64) -> Self {
            self.rows((first..first + count).map(|n| {
                FixtureRow::precatorio(&format!("PROC-{:05}", n), "FORTALEZA", "R$ 100,00")
            }))
        }

        /// Restart token the page hands back.
        pub fn token(mut self, token: Value) -> Self {
            self.restart_token = Some(token);
            self
        }

        pub fn build(&self) -> Value {
            let width = self.wire_names.len();
            let select: Vec<Value> = self
                .wire_names
                .iter()
                .enumerate()
                .map(|(i, name)| json!({"Kind": 1, "Value": format!("G{}", i), "Name": name}))
                .collect();
            let schema: Vec<Value> = (0..width)
                .map(|i| {
                    if i == COMARCA_COLUMN {
                        json!({"N": format!("G{}", i), "T": 1, "DN": COMARCA_DICT})
                    } else {
                        json!({"N": format!("G{}", i), "T": 1})
                    }
                })
                .collect();

            let mut dictionary: Vec<Value> = Vec::new();
            let mut rows = Vec::with_capacity(self.rows.len());
            let mut previous: Option<&FixtureRow> = None;
            for row in &self.rows {
                let encoded: Vec<Value> = row
                    .values
                    .iter()
                    .enumerate()
                    .map(|(column, value)| {
                        if column == COMARCA_COLUMN {
                            json!(intern(&mut dictionary, value))
                        } else {
                            value.clone()
                        }
                    })
                    .collect();

                let wire_row = match previous {
                    None => json!({"S": schema, "C": encoded}),
                    Some(prev) => {
                        let mut mask = 0u64;
                        let mut changed = Vec::new();
                        for column in 0..width {
                            if row.values[column] == prev.values[column] {
                                mask |= 1 << column;
                            } else {
                                changed.push(encoded[column].clone());
                            }
                        }
                        let mut object = Map::new();
                        object.insert("C".to_string(), Value::Array(changed));
                        if mask != 0 {
                            object.insert("R".to_string(), json!(mask));
                        }
                        Value::Object(object)
                    }
                };
                rows.push(wire_row);
                previous = Some(row);
            }

            let mut data_set = json!({
                "N": "DS0",
                "PH": [{"DM0": rows}],
                "ValueDicts": {COMARCA_DICT: dictionary}
            });
            if let Some(token) = &self.restart_token {
                data_set["RT"] = token.clone();
            }
            envelope(json!({"Select": select}), data_set)
        }

        /// A page without a column descriptor that still carries a token.
        pub fn undecodable(token: Option<Value>) -> Value {
            let mut data_set = json!({"PH": [{"DM0": [{"C": [1]}]}]});
            if let Some(token) = token {
                data_set["RT"] = token;
            }
            json!({"results": [{"result": {"data": {"dsr": {"DS": [data_set]}}}}]})
        }
    }

    fn intern(dictionary: &mut Vec<Value>, value: &Value) -> usize {
        match dictionary.iter().position(|v| v == value) {
            Some(index) => index,
            None => {
                dictionary.push(value.clone());
                dictionary.len() - 1
            }
        }
    }

    fn envelope(descriptor: Value, data_set: Value) -> Value {
        json!({"jobIds": [], "results": [{"jobId": "0", "result": {"data": {
            "descriptor": descriptor,
            "dsr": {"Version": 2, "MinorVersion": 1, "DS": [data_set]}
        }}}]})
    }

    /// Entity listing response with names under `G0`, placeholder first.
    pub fn entity_listing(names: &[&str]) -> Value {
        let mut rows = vec![json!({"S": [{"N": "G0", "T": 1}], "G0": precatorio_crawler::ENTITY_PLACEHOLDER})];
        rows.extend(names.iter().map(|name| json!({"G0": name})));
        envelope(
            json!({"Select": [{"Kind": 1, "Value": "G0", "Name": "t.dfslcp_dsc_entidade"}]}),
            json!({"PH": [{"DM0": rows}]}),
        )
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for crawler inputs.

    use super::fixtures::FixtureRow;
    use proptest::prelude::*;

    pub fn arb_processo() -> impl Strategy<Value = String> {
        "[0-9]{7}-[0-9]{2}\\.20[0-9]{2}\\.8\\.06\\.[0-9]{4}"
    }

    pub fn arb_comarca() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["FORTALEZA", "SOBRAL", "CRATO", "JUAZEIRO DO NORTE", "IGUATU"])
            .prop_map(str::to_string)
    }

    /// Brazilian-formatted money, `"1.234,56"` style.
    pub fn arb_valor() -> impl Strategy<Value = String> {
        (0u64..10_000_000, 0u32..100).prop_map(|(units, cents)| {
            let digits = units.to_string();
            let mut grouped = String::new();
            for (i, c) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push('.');
                }
                grouped.push(c);
            }
            format!("{},{:02}", grouped, cents)
        })
    }

    pub fn arb_fixture_row() -> impl Strategy<Value = FixtureRow> {
        (arb_processo(), arb_comarca(), arb_valor())
            .prop_map(|(processo, comarca, valor)| FixtureRow::precatorio(&processo, &comarca, &valor))
    }

    /// Rows split into `1..=max_pages` non-empty pages.
    pub fn arb_paged_rows(
        max_pages: usize,
        max_rows: usize,
    ) -> impl Strategy<Value = Vec<Vec<FixtureRow>>> {
        prop::collection::vec(
            prop::collection::vec(arb_fixture_row(), 1..=max_rows.max(1)),
            1..=max_pages.max(1),
        )
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Checks shared by integration tests.

    use super::*;

    /// `ordem` runs exactly `1..=n` in record order.
    pub fn assert_ordem_contiguous(records: &[CanonicalRecord]) {
        for (i, record) in records.iter().enumerate() {
            assert_eq!(
                record.ordem,
                i as u64 + 1,
                "ordem gap or repeat at position {}",
                i
            );
        }
    }

    fn command(request: &Value) -> &Value {
        &request["queries"][0]["Query"]["Commands"][0]["SemanticQueryDataShapeCommand"]
    }

    /// `1` ascending, `2` descending.
    pub fn sort_direction(request: &Value) -> Option<u64> {
        command(request)["Query"]["OrderBy"][0]["Direction"].as_u64()
    }

    pub fn restart_tokens(request: &Value) -> Option<&Value> {
        command(request)["Binding"]["DataReduction"]["Primary"]["Window"].get("RestartTokens")
    }

    pub fn window_count(request: &Value) -> Option<u64> {
        command(request)["Binding"]["DataReduction"]["Primary"]["Window"]["Count"].as_u64()
    }

    /// Literal values of every `In` filter, in order.
    pub fn filter_literals(request: &Value) -> Vec<String> {
        command(request)["Query"]["Where"]
            .as_array()
            .map(|clauses| {
                clauses
                    .iter()
                    .filter_map(|c| c["Condition"]["In"]["Values"][0][0]["Literal"]["Value"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
