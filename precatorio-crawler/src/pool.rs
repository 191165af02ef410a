//! Bounded concurrent crawls.

use crate::cancel::CancellationFlag;
use crate::engine::{CrawlOutcome, CrawlRequest, PaginationEngine};
use precatorio_core::{PrecatorioError, PrecatorioResult};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Run independent crawls with at most `concurrency` in flight.
///
/// Each crawl is its own tokio task and stays sequential internally. Results
/// come back in the order of `requests`, one per request.
pub async fn crawl_many(
    engine: Arc<PaginationEngine>,
    requests: Vec<CrawlRequest>,
    concurrency: usize,
    cancel: &CancellationFlag,
) -> Vec<PrecatorioResult<CrawlOutcome>> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(requests.len());

    for request in requests {
        let engine = Arc::clone(&engine);
        let permits = Arc::clone(&permits);
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| PrecatorioError::Worker {
                    reason: format!("worker pool closed: {}", e),
                })?;
            engine.run(&request, &cancel).await
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Crawl task failed");
                Err(PrecatorioError::Worker {
                    reason: e.to_string(),
                })
            }
        };
        results.push(result);
    }
    results
}
