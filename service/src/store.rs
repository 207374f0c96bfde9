//! SQLite persistence for observed quotes.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use cambio_common::{Budget, Quote, QuoteError, Result, Timestamp};

/// A persisted quote row. Append-only: rows are never updated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct PersistedQuote {
    /// Auto-increment row id.
    pub id: i64,
    /// Quoted exchange rate, decimal-as-string.
    pub bid: String,
    /// When the quote was observed.
    pub timestamp: Timestamp,
}

/// Store for observed quotes, owned by the process root and shared by
/// handle into request tasks.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    pool: SqlitePool,
}

impl QuoteStore {
    /// Connect to the store. Connection setup happens once at startup and
    /// is not subject to any per-request budget.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| QuoteError::Persistence(format!("connect {}: {}", database_url, e)))?;

        info!(database_url = %database_url, "Connected to quote store");
        Ok(Self { pool })
    }

    /// Wrap an already-connected pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the schema if it does not exist. Idempotent; runs once at
    /// startup, outside any per-request budget.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cotacoes (\
                 id INTEGER PRIMARY KEY, \
                 bid TEXT, \
                 timestamp DATETIME\
             )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| QuoteError::Persistence(format!("schema creation: {}", e)))?;

        Ok(())
    }

    /// Insert one quote row under the given budget. The statement is
    /// aborted, not merely logged, once the deadline passes.
    pub async fn insert(&self, budget: &Budget, quote: &Quote) -> Result<()> {
        budget
            .enforce("persistence write", async {
                sqlx::query("INSERT INTO cotacoes (bid, timestamp) VALUES (?, ?)")
                    .bind(&quote.bid)
                    .bind(quote.observed_at)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| QuoteError::Persistence(format!("insert: {}", e)))?;
                Ok(())
            })
            .await?;

        debug!(bid = %quote.bid, "Quote persisted");
        Ok(())
    }

    /// The most recently inserted quote, if any.
    pub async fn latest(&self) -> Result<Option<PersistedQuote>> {
        sqlx::query_as::<_, PersistedQuote>(
            "SELECT id, bid, timestamp FROM cotacoes ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| QuoteError::Persistence(format!("latest: {}", e)))
    }

    /// Number of persisted quotes.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cotacoes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| QuoteError::Persistence(format!("count: {}", e)))?;
        Ok(count)
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
