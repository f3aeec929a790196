use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use quote_model::Quote;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::error::StoreError;

/// Upper bound for one insert. Storage is best effort and must stay off the
/// response's critical path.
pub const STORE_DEADLINE: Duration = Duration::from_millis(10);

// primary sqlite result codes for lock waits
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS currency_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT,
        codein TEXT,
        name TEXT,
        high TEXT,
        low TEXT,
        var_bid TEXT,
        pct_change TEXT,
        bid TEXT,
        ask TEXT,
        timestamp TEXT,
        create_date TEXT,
        stored_at DATETIME
    )";

const INSERT_SQL: &str = "
    INSERT INTO currency_data
        (code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date, stored_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Append-only sink for fetched quotes.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Persists one quote and returns the id assigned to its row.
    async fn save(&self, quote: &Quote) -> Result<i64, StoreError>;
}

#[derive(Clone)]
pub struct SqliteQuoteStore {
    pool: SqlitePool,
    deadline: Duration,
}

impl SqliteQuoteStore {
    /// Opens (or creates) the database at `url` and makes sure the table exists.
    ///
    /// Lock waits inside sqlite give up after [`STORE_DEADLINE`].
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Connect)?
            .create_if_missing(true)
            .busy_timeout(STORE_DEADLINE);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        SqliteQuoteStore::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&pool)
            .await
            .map_err(StoreError::Connect)?;

        info!("database ready");

        Ok(SqliteQuoteStore {
            pool,
            deadline: STORE_DEADLINE,
        })
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    // The row only becomes visible on commit. A transaction dropped by an
    // expired deadline is rolled back by the pool.
    async fn insert(&self, quote: &Quote) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(INSERT_SQL)
            .bind(quote.code.as_str())
            .bind(quote.codein.as_str())
            .bind(quote.name.as_str())
            .bind(quote.high.as_str())
            .bind(quote.low.as_str())
            .bind(quote.var_bid.as_str())
            .bind(quote.pct_change.as_str())
            .bind(quote.bid.as_str())
            .bind(quote.ask.as_str())
            .bind(quote.timestamp.as_str())
            .bind(quote.create_date.as_str())
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn save(&self, quote: &Quote) -> Result<i64, StoreError> {
        let id = within(self.deadline, self.insert(quote))
            .await?
            .map_err(|e| write_error(e, self.deadline))?;

        debug!("save | stored {}{} | id: {}", quote.code, quote.codein, id);
        Ok(id)
    }
}

/// A lock wait that sqlite gave up on is a missed deadline, not a broken write.
fn write_error(err: sqlx::Error, deadline: Duration) -> StoreError {
    let lock_wait = err
        .as_database_error()
        .and_then(|db| db.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED));

    if lock_wait {
        StoreError::Timeout(deadline)
    } else {
        StoreError::Write(err)
    }
}

/// Runs `fut` under `deadline`, reporting expiry as [`StoreError::Timeout`].
async fn within<F: Future>(deadline: Duration, fut: F) -> Result<F::Output, StoreError> {
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| StoreError::Timeout(deadline))
}
