//! Persistent store abstraction.
//!
//! The pipeline only needs four operations from storage. Keeping them behind a
//! trait lets the scheduler run against PostgreSQL in production and against
//! [`MemoryStore`] in tests or when no database is configured.

use crate::error::{Error, Result};
use crate::records::{StatsRecord, WalletRecord};
use crate::types::CoinType;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};

#[async_trait]
pub trait WalletStore: Send + Sync {
  /// Append a wallet record. Records are never updated afterwards.
  async fn append_wallet(&self, record: &WalletRecord) -> Result<()>;

  /// Most recent wallets first.
  async fn list_wallets(&self, limit: usize) -> Result<Vec<WalletRecord>>;

  /// Atomically fold one balance into the coin's aggregate and return the
  /// updated record. `created_at` is only set when the aggregate is created.
  async fn fold_stats(&self, coin_type: CoinType, balance: Decimal) -> Result<StatsRecord>;

  /// Current aggregate, or a zero record if nothing was folded yet.
  async fn latest_stats(&self, coin_type: CoinType) -> Result<StatsRecord>;
}

/// In-process store.
///
/// Each coin owns its own stats lock, so folds for different coins never
/// contend while folds for the same coin serialise.
pub struct MemoryStore {
  wallets: RwLock<WalletLog>,
  stats: HashMap<CoinType, Mutex<Option<StatsRecord>>>,
}

#[derive(Default)]
struct WalletLog {
  records: Vec<WalletRecord>,
  addresses: HashSet<String>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self {
      wallets: RwLock::new(WalletLog::default()),
      stats: CoinType::ALL.iter().map(|coin| (*coin, Mutex::new(None))).collect(),
    }
  }

  pub async fn wallet_count(&self) -> usize {
    self.wallets.read().await.records.len()
  }

  fn stats_slot(&self, coin_type: CoinType) -> Result<&Mutex<Option<StatsRecord>>> {
    self
      .stats
      .get(&coin_type)
      .ok_or_else(|| Error::Store(format!("no stats slot for {}", coin_type)))
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl WalletStore for MemoryStore {
  async fn append_wallet(&self, record: &WalletRecord) -> Result<()> {
    let mut log = self.wallets.write().await;
    if !log.addresses.insert(record.address.clone()) {
      return Err(Error::DuplicateWallet(record.address.clone()));
    }
    log.records.push(record.clone());
    Ok(())
  }

  async fn list_wallets(&self, limit: usize) -> Result<Vec<WalletRecord>> {
    let log = self.wallets.read().await;
    Ok(log.records.iter().rev().take(limit).cloned().collect())
  }

  async fn fold_stats(&self, coin_type: CoinType, balance: Decimal) -> Result<StatsRecord> {
    let mut slot = self.stats_slot(coin_type)?.lock().await;
    let now = Utc::now();
    let updated = match slot.as_mut() {
      Some(stats) => {
        stats.fold(balance, now);
        stats.clone()
      }
      None => {
        let stats = StatsRecord::first(coin_type, balance, now);
        *slot = Some(stats.clone());
        stats
      }
    };
    Ok(updated)
  }

  async fn latest_stats(&self, coin_type: CoinType) -> Result<StatsRecord> {
    let slot = self.stats_slot(coin_type)?.lock().await;
    Ok(slot.clone().unwrap_or_else(|| StatsRecord::empty(coin_type, Utc::now())))
  }
}
