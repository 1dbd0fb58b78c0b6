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

use cf_core::{CoinType, StatsRecord, WalletRecord, WalletStore};
use std::sync::Arc;
use tracing::debug;

use crate::error::FinderResult;

/// Folds persisted wallets into the per-coin running statistics.
///
/// The read-modify-write happens inside the store as one atomic operation, so
/// any number of aggregators may fold the same coin concurrently.
#[derive(Clone)]
pub struct StatsAggregator {
  store: Arc<dyn WalletStore>,
}

impl StatsAggregator {
  pub fn new(store: Arc<dyn WalletStore>) -> Self {
    Self { store }
  }

  pub async fn fold(&self, record: &WalletRecord) -> FinderResult<StatsRecord> {
    let stats = self.store.fold_stats(record.coin_type, record.balance).await?;
    debug!(
      "{} stats: {} wallets, total {}",
      stats.coin_type, stats.total_wallets, stats.total_balance
    );
    Ok(stats)
  }

  pub async fn current(&self, coin: CoinType) -> FinderResult<StatsRecord> {
    Ok(self.store.latest_stats(coin).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cf_core::MemoryStore;
  use chrono::Utc;
  use rust_decimal::Decimal;
  use rust_decimal_macros::dec;

  fn record(coin: CoinType, balance: Decimal) -> WalletRecord {
    let now = Utc::now();
    WalletRecord {
      address: format!("addr-{}", balance),
      private_key_hex: "00".repeat(32),
      wif_key: None,
      balance,
      strategy: "random".to_string(),
      provider: "B".to_string(),
      coin_type: coin,
      created_at: now,
      updated_at: now,
    }
  }

  #[tokio::test]
  async fn test_fold_two_wallets() {
    let aggregator = StatsAggregator::new(Arc::new(MemoryStore::new()));

    let first = aggregator.fold(&record(CoinType::Btc, dec!(1.5))).await.unwrap();
    assert_eq!(first.total_wallets, 1);
    assert_eq!(first.total_balance, dec!(1.5));
    assert_eq!(first.max_balance, dec!(1.5));
    assert_eq!(first.min_balance, dec!(1.5));

    let second = aggregator.fold(&record(CoinType::Btc, dec!(0.5))).await.unwrap();
    assert_eq!(second.total_wallets, 2);
    assert_eq!(second.total_balance, dec!(2.0));
    assert_eq!(second.max_balance, dec!(1.5));
    assert_eq!(second.min_balance, dec!(0.5));
    assert_eq!(second.created_at, first.created_at);
  }

  #[tokio::test]
  async fn test_coins_are_independent() {
    let aggregator = StatsAggregator::new(Arc::new(MemoryStore::new()));
    aggregator.fold(&record(CoinType::Eth, dec!(2))).await.unwrap();

    assert_eq!(aggregator.current(CoinType::Eth).await.unwrap().total_wallets, 1);
    assert_eq!(aggregator.current(CoinType::Doge).await.unwrap().total_wallets, 0);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_folds_match_sum() {
    let aggregator = StatsAggregator::new(Arc::new(MemoryStore::new()));

    let mut handles = Vec::new();
    for i in 1..=50u32 {
      let aggregator = aggregator.clone();
      handles.push(tokio::spawn(async move {
        aggregator.fold(&record(CoinType::Doge, Decimal::from(i))).await
      }));
    }
    for handle in handles {
      handle.await.unwrap().unwrap();
    }

    let stats = aggregator.current(CoinType::Doge).await.unwrap();
    assert_eq!(stats.total_wallets, 50);
    assert_eq!(stats.total_balance, Decimal::from(1275));
    assert_eq!(stats.max_balance, Decimal::from(50));
    assert_eq!(stats.min_balance, Decimal::from(1));
  }
}
