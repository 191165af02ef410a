//! Pagination engine behaviour over scripted pages.

use precatorio_core::{CanonicalField, PrecatorioError};
use precatorio_crawler::{
    crawl_many, CancellationFlag, CompletionStatus, CrawlRequest, RequestOutcome, StopReason,
};
use precatorio_test_utils::assertions::{
    assert_ordem_contiguous, filter_literals, restart_tokens, sort_direction, window_count,
};
use precatorio_test_utils::fixtures::{FixtureRow, PageFixture, COMARCA_COLUMN, VALOR_ATUAL_COLUMN};
use precatorio_test_utils::{
    scripted_engine, ObservedEvent, PaginationConfig, RecordingObserver, ScriptedTransport,
    TransportCause,
};
use serde_json::{json, Value};
use std::sync::Arc;

const FORTALEZA: &str = "municipio-de-fortaleza";

fn pagination(max_pages: u32) -> PaginationConfig {
    PaginationConfig {
        page_size: 500,
        max_pages,
    }
}

fn token(n: u32) -> Value {
    json!([[format!("'PROC-{:05}'", n), format!("{}L", n)]])
}

fn setup(
    transport: ScriptedTransport,
    max_pages: u32,
) -> (
    Arc<ScriptedTransport>,
    Arc<RecordingObserver>,
    precatorio_crawler::PaginationEngine,
) {
    let transport = Arc::new(transport);
    let observer = Arc::new(RecordingObserver::new());
    let engine = scripted_engine(transport.clone(), observer.clone(), &pagination(max_pages));
    (transport, observer, engine)
}

#[tokio::test]
async fn test_repeated_token_completes_after_second_page() {
    let (transport, observer, engine) = setup(
        ScriptedTransport::with_pages([
            PageFixture::new().numbered(1, 3).token(token(3)).build(),
            PageFixture::new().numbered(4, 2).token(token(3)).build(),
        ]),
        100,
    );

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, CompletionStatus::Complete);
    assert_eq!(outcome.stop_reason, StopReason::RepeatedToken);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 5);
    assert_ordem_contiguous(&outcome.records);
    assert_eq!(outcome.records[3].processo, "PROC-00004");
    assert_eq!(outcome.entity.official_name, "MUNICÍPIO DE FORTALEZA");
    assert!(outcome.issues.is_empty());

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(sort_direction(&requests[0]), Some(1));
    assert_eq!(restart_tokens(&requests[0]), None);
    assert_eq!(sort_direction(&requests[1]), Some(2));
    assert_eq!(restart_tokens(&requests[1]), Some(&token(3)));

    let summary = observer.summary().unwrap();
    assert_eq!(summary.status, CompletionStatus::Complete);
    assert_eq!(summary.total_pages, 2);
    assert_eq!(summary.total_records, 5);
}

#[tokio::test]
async fn test_missing_token_ends_after_one_page() {
    let (transport, observer, engine) = setup(
        ScriptedTransport::with_pages([PageFixture::new().numbered(1, 4).build()]),
        100,
    );

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.stop_reason, StopReason::NoToken);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.last_token, None);
    assert_eq!(transport.remaining(), 0);
    assert_eq!(
        observer.events(),
        vec![
            ObservedEvent::RequestStart {
                entity: FORTALEZA.to_string(),
                page: 1
            },
            ObservedEvent::RequestFinished {
                entity: FORTALEZA.to_string(),
                page: 1,
                outcome: RequestOutcome::Success
            },
            ObservedEvent::PageDecoded {
                entity: FORTALEZA.to_string(),
                page: 1,
                records: 4
            },
            ObservedEvent::CrawlFinished(observer.summary().unwrap()),
        ]
    );
}

#[tokio::test]
async fn test_transport_exhaustion_returns_partial() {
    let transport = ScriptedTransport::new().with_attempts(3);
    transport.push_page(PageFixture::new().numbered(1, 2).token(token(2)).build());
    for _ in 0..3 {
        transport.push_failure(TransportCause::Status {
            status: 503,
            body: "unavailable".to_string(),
        });
    }
    let (_transport, observer, engine) = setup(transport, 100);

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, CompletionStatus::Partial);
    assert_eq!(outcome.stop_reason, StopReason::TransportFailed);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.pages_fetched, 1);
    let error = outcome.transport_error.unwrap();
    assert_eq!(error.page, 2);
    assert_eq!(error.attempts, 3);
    assert!(observer.events().contains(&ObservedEvent::RequestFinished {
        entity: FORTALEZA.to_string(),
        page: 2,
        outcome: RequestOutcome::Failure,
    }));
    let summary = observer.summary().unwrap();
    assert_eq!(summary.status, CompletionStatus::Partial);
    assert_eq!(summary.total_pages, 1);
}

#[tokio::test]
async fn test_retry_recovers_page() {
    let transport = ScriptedTransport::new().with_attempts(3);
    transport.push_page(PageFixture::new().numbered(1, 2).token(token(2)).build());
    transport.push_failure(TransportCause::Timeout { after_ms: 60_000 });
    transport.push_page(PageFixture::new().numbered(3, 1).build());
    let (transport, _observer, engine) = setup(transport, 100);

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(transport.requests().len(), 2);
    assert_eq!(transport.remaining(), 0);
}

#[tokio::test]
async fn test_page_ceiling_stops_crawl() {
    let pages = (1..=5).map(|n| PageFixture::new().numbered(n, 1).token(token(n as u32)).build());
    let (transport, _observer, engine) = setup(ScriptedTransport::with_pages(pages), 3);

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.status, CompletionStatus::Complete);
    assert_eq!(outcome.stop_reason, StopReason::PageLimit);
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(transport.remaining(), 2);
}

#[tokio::test]
async fn test_cancellation_checked_before_each_page() {
    let cancel = CancellationFlag::new();
    let transport = ScriptedTransport::with_pages([
        PageFixture::new().numbered(1, 2).token(token(2)).build(),
        PageFixture::new().numbered(3, 2).build(),
    ])
    .cancel_after(1, cancel.clone());
    let (transport, observer, engine) = setup(transport, 100);

    let outcome = engine.run(&CrawlRequest::new(FORTALEZA), &cancel).await.unwrap();

    assert_eq!(outcome.status, CompletionStatus::Cancelled);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(observer.summary().unwrap().status, CompletionStatus::Cancelled);
}

#[tokio::test]
async fn test_cancelled_before_start_sends_nothing() {
    let cancel = CancellationFlag::new();
    cancel.cancel();
    let (transport, _observer, engine) = setup(
        ScriptedTransport::with_pages([PageFixture::new().numbered(1, 1).build()]),
        100,
    );

    let outcome = engine.run(&CrawlRequest::new(FORTALEZA), &cancel).await.unwrap();

    assert_eq!(outcome.status, CompletionStatus::Cancelled);
    assert_eq!(outcome.pages_fetched, 0);
    assert!(outcome.records.is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_undecodable_page_is_skipped() {
    let (_transport, _observer, engine) = setup(
        ScriptedTransport::with_pages([
            PageFixture::new().numbered(1, 2).token(token(2)).build(),
            PageFixture::undecodable(Some(token(9))),
            PageFixture::new().numbered(10, 2).build(),
        ]),
        100,
    );

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.records.len(), 4);
    assert_ordem_contiguous(&outcome.records);
    assert_eq!(outcome.records[2].processo, "PROC-00010");
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].page, 2);
    assert_eq!(outcome.issues[0].row, None);
}

#[tokio::test]
async fn test_year_filter_and_page_size_reach_request() {
    let (transport, _observer, engine) = setup(
        ScriptedTransport::with_pages([PageFixture::new().build()]),
        100,
    );

    let outcome = engine
        .run(
            &CrawlRequest::new("Município de Fortaleza")
                .with_year(2024)
                .with_page_size(50),
            &CancellationFlag::new(),
        )
        .await
        .unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.year, Some(2024));
    let requests = transport.requests();
    assert_eq!(
        filter_literals(&requests[0]),
        vec!["'MUNICÍPIO DE FORTALEZA'".to_string(), "2024L".to_string()]
    );
    assert_eq!(window_count(&requests[0]), Some(50));
}

#[tokio::test]
async fn test_unknown_entity_is_rejected() {
    let (transport, observer, engine) = setup(ScriptedTransport::new(), 100);

    let result = engine
        .run(&CrawlRequest::new("atlantida"), &CancellationFlag::new())
        .await;

    assert!(matches!(result, Err(PrecatorioError::Entity(_))));
    assert!(transport.requests().is_empty());
    assert!(observer.events().is_empty());
}

#[tokio::test]
async fn test_out_of_range_page_size_is_rejected() {
    let (_transport, _observer, engine) = setup(ScriptedTransport::new(), 100);
    let result = engine
        .run(
            &CrawlRequest::new(FORTALEZA).with_page_size(0),
            &CancellationFlag::new(),
        )
        .await;
    assert!(matches!(result, Err(PrecatorioError::Config(_))));
}

#[tokio::test]
async fn test_field_fallback_is_reported() {
    let (_transport, observer, engine) = setup(
        ScriptedTransport::with_pages([PageFixture::new()
            .row(FixtureRow::precatorio("P-1", "FORTALEZA", "R$ 10,00"))
            .row(FixtureRow::precatorio("P-2", "FORTALEZA", "R$ 10,00").with(VALOR_ATUAL_COLUMN, json!("n/d")))
            .build()]),
        100,
    );

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records[1].valor_atual.is_zero());
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].row, Some(1));
    assert_eq!(outcome.issues[0].column.as_deref(), Some("valor_atual"));
    assert!(observer.events().contains(&ObservedEvent::RowFallback {
        entity: FORTALEZA.to_string(),
        page: 1,
        field: CanonicalField::ValorAtual,
    }));
}

#[tokio::test]
async fn test_bad_dictionary_index_is_reported_to_observer() {
    let mut page = PageFixture::new()
        .row(FixtureRow::precatorio("P-1", "FORTALEZA", "R$ 10,00"))
        .build();
    page["results"][0]["result"]["data"]["dsr"]["DS"][0]["PH"][0]["DM0"][0]["C"][COMARCA_COLUMN] =
        json!(42);
    let (_transport, observer, engine) = setup(ScriptedTransport::with_pages([page]), 100);

    let outcome = engine
        .run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new())
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].comarca, "-");
    assert_eq!(outcome.issues.len(), 1);
    assert!(outcome.issues[0].detail.contains("index 42 is out of range"));
    assert!(observer.events().contains(&ObservedEvent::DecodeFallback {
        entity: FORTALEZA.to_string(),
        page: 1,
        row: 0,
        field: Some(CanonicalField::Comarca),
    }));
}

#[tokio::test]
async fn test_crawl_many_keeps_input_order() {
    let pages = (0..3).map(|_| PageFixture::new().numbered(1, 2).build());
    let (transport, _observer, engine) = setup(ScriptedTransport::with_pages(pages), 100);
    let requests = vec![
        CrawlRequest::new("municipio-de-sobral"),
        CrawlRequest::new("nowhere"),
        CrawlRequest::new(FORTALEZA),
        CrawlRequest::new("estado-do-ceara"),
    ];

    let results = crawl_many(Arc::new(engine), requests, 2, &CancellationFlag::new()).await;

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().entity.slug, "municipio-de-sobral");
    assert!(matches!(results[1], Err(PrecatorioError::Entity(_))));
    assert_eq!(results[2].as_ref().unwrap().entity.slug, FORTALEZA);
    assert_eq!(results[3].as_ref().unwrap().entity.slug, "estado-do-ceara");
    for result in [&results[0], &results[2], &results[3]] {
        let outcome = result.as_ref().unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_ordem_contiguous(&outcome.records);
    }
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_crawl_many_honours_cancellation() {
    let (transport, _observer, engine) = setup(ScriptedTransport::new(), 100);
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let results = crawl_many(
        Arc::new(engine),
        vec![CrawlRequest::new(FORTALEZA), CrawlRequest::new("municipio-de-sobral")],
        4,
        &cancel,
    )
    .await;

    for result in results {
        assert_eq!(result.unwrap().status, CompletionStatus::Cancelled);
    }
    assert!(transport.requests().is_empty());
}

mod prop_tests {
    use super::*;
    use precatorio_test_utils::generators::arb_paged_rows;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_ordem_is_contiguous_across_pages(pages in arb_paged_rows(4, 6)) {
            let total: usize = pages.iter().map(Vec::len).sum();
            let last = pages.len() - 1;
            let bodies: Vec<Value> = pages
                .into_iter()
                .enumerate()
                .map(|(i, rows)| {
                    let fixture = PageFixture::new().rows(rows);
                    let fixture = if i < last { fixture.token(token(i as u32 + 1)) } else { fixture };
                    fixture.build()
                })
                .collect();
            let page_count = bodies.len() as u32;
            let (_transport, _observer, engine) = setup(ScriptedTransport::with_pages(bodies), 100);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let outcome = runtime
                .block_on(engine.run(&CrawlRequest::new(FORTALEZA), &CancellationFlag::new()))
                .unwrap();

            prop_assert_eq!(outcome.status, CompletionStatus::Complete);
            prop_assert_eq!(outcome.pages_fetched, page_count);
            prop_assert_eq!(outcome.records.len(), total);
            for (i, record) in outcome.records.iter().enumerate() {
                prop_assert_eq!(record.ordem, i as u64 + 1);
            }
            prop_assert!(outcome.issues.is_empty());
        }
    }
}
