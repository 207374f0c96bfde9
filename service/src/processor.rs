//! Per-request quote processing.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use cambio_common::{Budget, Quote, Result};

use crate::config::BudgetConfig;
use crate::provider::QuoteProvider;
use crate::store::QuoteStore;

/// Stages of handling one inbound quote request. A request either walks
/// them in order or exits to an error terminal from whichever stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    /// Calling the upstream provider.
    Fetching,
    /// Writing the fetched quote to the store.
    Persisting,
    /// Emitting the quote to the caller.
    Responding,
}

impl RequestStage {
    /// Stage name for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStage::Fetching => "fetching",
            RequestStage::Persisting => "persisting",
            RequestStage::Responding => "responding",
        }
    }
}

/// Processes inbound quote requests: fetch under the inbound budget, persist
/// under its own budget, respond only if both succeeded.
pub struct QuoteProcessor {
    provider: Arc<dyn QuoteProvider>,
    store: QuoteStore,
    budgets: BudgetConfig,
}

impl QuoteProcessor {
    /// Create a new processor over process-root-owned collaborators.
    pub fn new(provider: Arc<dyn QuoteProvider>, store: QuoteStore, budgets: BudgetConfig) -> Self {
        Self {
            provider,
            store,
            budgets,
        }
    }

    /// Handle one inbound request.
    ///
    /// The inbound budget starts when the request arrives; the upstream
    /// fetch shares it in full. The persist budget is a fixed slice rooted
    /// at the inbound request, not at the fetch's remaining time. The
    /// fetched quote is discarded on persist failure: a response is only
    /// emitted when both stages succeeded.
    #[instrument(skip(self), fields(request_id = %request_id))]
    pub async fn handle(&self, request_id: Uuid) -> Result<Quote> {
        let inbound = Budget::new(self.budgets.request_budget);

        let quote = match self.provider.latest(&inbound).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(
                    stage = RequestStage::Fetching.as_str(),
                    provider = self.provider.name(),
                    error = %e,
                    deadline_exceeded = e.is_deadline_exceeded(),
                    "Quote request failed"
                );
                return Err(e);
            }
        };

        let persist = Budget::new(self.budgets.persist_budget);
        if let Err(e) = self.store.insert(&persist, &quote).await {
            warn!(
                stage = RequestStage::Persisting.as_str(),
                bid = %quote.bid,
                error = %e,
                deadline_exceeded = e.is_deadline_exceeded(),
                "Quote request failed"
            );
            return Err(e);
        }

        info!(
            stage = RequestStage::Responding.as_str(),
            bid = %quote.bid,
            "Quote fetched and persisted"
        );
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use sqlx::sqlite::SqlitePoolOptions;

    use crate::provider::MockQuoteProvider;

    async fn memory_store() -> QuoteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = QuoteStore::from_pool(pool);
        store.init_schema().await.unwrap();
        store
    }

    fn budgets() -> BudgetConfig {
        BudgetConfig {
            request_budget: Duration::from_millis(200),
            persist_budget: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn test_handle_fetches_and_persists() {
        let store = memory_store().await;
        let processor = QuoteProcessor::new(
            Arc::new(MockQuoteProvider::returning("5.43")),
            store.clone(),
            budgets(),
        );

        let quote = processor.handle(Uuid::new_v4()).await.unwrap();

        assert_eq!(quote.bid, "5.43");
        let row = store.latest().await.unwrap().unwrap();
        assert_eq!(row.bid, quote.bid);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_persistence() {
        let store = memory_store().await;
        let processor = QuoteProcessor::new(
            Arc::new(MockQuoteProvider::failing()),
            store.clone(),
            budgets(),
        );

        assert!(processor.handle(Uuid::new_v4()).await.is_err());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persist_failure_discards_quote() {
        let store = memory_store().await;
        store.close().await;
        let processor = QuoteProcessor::new(
            Arc::new(MockQuoteProvider::returning("5.43")),
            store,
            budgets(),
        );

        let err = processor.handle(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, cambio_common::QuoteError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_slow_fetch_fails_within_budget() {
        let store = memory_store().await;
        let processor = QuoteProcessor::new(
            Arc::new(MockQuoteProvider::returning("5.43").with_delay(Duration::from_secs(10))),
            store.clone(),
            budgets(),
        );
        let started = tokio::time::Instant::now();

        let err = processor.handle(Uuid::new_v4()).await.unwrap_err();

        assert!(err.is_deadline_exceeded());
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
