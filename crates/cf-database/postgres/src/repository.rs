/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Pooled PostgreSQL store for wallets and per-coin statistics.
//!
//! Diesel connections are blocking, so every store call runs on the blocking
//! thread pool with a connection checked out of an r2d2 pool.

use async_trait::async_trait;
use cf_core::{CoinType, StatsRecord, WalletRecord, WalletStore};
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use log::{debug, error, info};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::connection::run_migrations;
use crate::models::{to_big_decimal, NewWallet, StatsRow, WalletRow};
use crate::schema::{wallet_stats, wallets};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

const MAX_POOL_SIZE: u32 = 10;
const MIN_POOL_IDLE: u32 = 1;
/// Connection timeout in seconds - pool will fail instead of retrying forever
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Single-statement upsert; `created_at` is only written by the insert branch.
const FOLD_STATS_SQL: &str = "INSERT INTO wallet_stats AS s
   (coin_type, total_wallets, total_balance, max_balance, min_balance, created_at, updated_at)
   VALUES ($1, 1, $2, $2, $2, $3, $3)
   ON CONFLICT (coin_type) DO UPDATE SET
     total_wallets = s.total_wallets + 1,
     total_balance = s.total_balance + EXCLUDED.total_balance,
     max_balance = GREATEST(s.max_balance, EXCLUDED.max_balance),
     min_balance = LEAST(s.min_balance, EXCLUDED.min_balance),
     updated_at = EXCLUDED.updated_at
   RETURNING coin_type, total_wallets, total_balance, max_balance, min_balance, created_at, updated_at";

/// Database repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
  #[error("Connection pool error: {0}")]
  PoolError(String),

  #[error("Database query error: {0}")]
  QueryError(String),

  #[error("Serialization error: {0}")]
  SerializationError(String),

  #[error("Constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("Migration error: {0}")]
  MigrationError(String),
}

impl From<DieselError> for RepositoryError {
  fn from(err: DieselError) -> Self {
    match err {
      DieselError::DatabaseError(kind, info) => match kind {
        diesel::result::DatabaseErrorKind::UniqueViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        _ => RepositoryError::QueryError(info.message().to_string()),
      },
      _ => RepositoryError::QueryError(err.to_string()),
    }
  }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
  fn from(err: diesel::r2d2::PoolError) -> Self {
    RepositoryError::PoolError(err.to_string())
  }
}

impl From<RepositoryError> for cf_core::Error {
  fn from(err: RepositoryError) -> Self {
    cf_core::Error::Store(err.to_string())
  }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Database context that owns the connection pool
#[derive(Clone)]
pub struct DatabaseContext {
  pool: Arc<DbPool>,
}

impl DatabaseContext {
  /// Create a new database context with connection pooling
  ///
  /// Fails fast if the database is unavailable by testing the connection at startup.
  pub fn new(database_url: &str) -> RepositoryResult<Self> {
    Self::with_pool_config(database_url, MAX_POOL_SIZE, MIN_POOL_IDLE)
  }

  pub fn with_pool_config(database_url: &str, max_size: u32, min_idle: u32) -> RepositoryResult<Self> {
    PgConnection::establish(database_url).map_err(|e| {
      RepositoryError::PoolError(format!("Failed to connect to database: {}", e))
    })?;

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
      .max_size(max_size)
      .min_idle(Some(min_idle))
      .connection_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
      .build(manager)
      .map_err(|e| RepositoryError::PoolError(e.to_string()))?;

    Ok(Self { pool: Arc::new(pool) })
  }

  /// Apply pending migrations on a pooled connection
  pub async fn migrate(&self) -> RepositoryResult<usize> {
    self
      .run(|conn| {
        let applied = run_migrations(conn).map_err(|e| RepositoryError::MigrationError(e.to_string()))?;
        info!("Database schema up to date ({} migrations applied)", applied);
        Ok(applied)
      })
      .await
  }

  /// Execute a blocking database operation asynchronously
  pub async fn run<F, R>(&self, f: F) -> RepositoryResult<R>
  where
    F: FnOnce(&mut DbConnection) -> RepositoryResult<R> + Send + 'static,
    R: Send + 'static,
  {
    let pool = Arc::clone(&self.pool);
    tokio::task::spawn_blocking(move || {
      let mut conn = pool.get().map_err(|e| RepositoryError::PoolError(e.to_string()))?;
      f(&mut conn)
    })
    .await
    .map_err(|e| RepositoryError::QueryError(format!("Task join error: {}", e)))?
  }

  /// Wallet store backed by this context
  pub fn wallet_store(&self) -> PgWalletStore {
    PgWalletStore { context: self.clone() }
  }
}

/// [`WalletStore`] over the `wallets` and `wallet_stats` tables.
#[derive(Clone)]
pub struct PgWalletStore {
  context: DatabaseContext,
}

#[async_trait]
impl WalletStore for PgWalletStore {
  async fn append_wallet(&self, record: &WalletRecord) -> cf_core::Result<()> {
    let record = record.clone();
    let address = record.address.clone();

    let result = self
      .context
      .run(move |conn| {
        let row = NewWallet::from_record(&record)?;
        diesel::insert_into(wallets::table).values(&row).execute(conn)?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => {
        debug!("Stored wallet {}", address);
        Ok(())
      }
      Err(RepositoryError::ConstraintViolation(msg)) => {
        debug!("Rejected wallet {}: {}", address, msg);
        Err(cf_core::Error::DuplicateWallet(address))
      }
      Err(e) => {
        error!("Failed to store wallet {}: {}", address, e);
        Err(e.into())
      }
    }
  }

  async fn list_wallets(&self, limit: usize) -> cf_core::Result<Vec<WalletRecord>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let rows = self
      .context
      .run(move |conn| {
        Ok(
          wallets::table
            .order((wallets::created_at.desc(), wallets::id.desc()))
            .limit(limit)
            .select(WalletRow::as_select())
            .load::<WalletRow>(conn)?,
        )
      })
      .await?;

    rows.into_iter().map(|row| WalletRecord::try_from(row).map_err(Into::into)).collect()
  }

  async fn fold_stats(&self, coin_type: CoinType, balance: Decimal) -> cf_core::Result<StatsRecord> {
    let amount = to_big_decimal(&balance)?;
    let now = Utc::now();

    let row = self
      .context
      .run(move |conn| {
        use diesel::sql_query;
        use diesel::sql_types::{Numeric, Timestamptz, Varchar};

        Ok(
          sql_query(FOLD_STATS_SQL)
            .bind::<Varchar, _>(coin_type.symbol())
            .bind::<Numeric, _>(&amount)
            .bind::<Timestamptz, _>(now)
            .get_result::<StatsRow>(conn)?,
        )
      })
      .await?;

    Ok(StatsRecord::try_from(row)?)
  }

  async fn latest_stats(&self, coin_type: CoinType) -> cf_core::Result<StatsRecord> {
    let row = self
      .context
      .run(move |conn| {
        Ok(
          wallet_stats::table
            .find(coin_type.symbol())
            .select(StatsRow::as_select())
            .first::<StatsRow>(conn)
            .optional()?,
        )
      })
      .await?;

    match row {
      Some(row) => Ok(StatsRecord::try_from(row)?),
      None => Ok(StatsRecord::empty(coin_type, Utc::now())),
    }
  }
}
