//! Persisted wallet and statistics records.

use crate::types::CoinType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A generated wallet together with the balance that was resolved for it.
///
/// Records are append-only: a store never mutates one after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
  pub address: String,
  pub private_key_hex: String,
  pub wif_key: Option<String>,
  #[serde(with = "rust_decimal::serde::float")]
  pub balance: Decimal,
  /// Strategy that produced the key
  pub strategy: String,
  /// Provider that answered the balance lookup
  pub provider: String,
  pub coin_type: CoinType,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl WalletRecord {
  /// Key-free view of the record, safe to hand to subscribers.
  pub fn summary(&self) -> WalletSummary {
    WalletSummary {
      address: self.address.clone(),
      balance: self.balance,
      strategy: self.strategy.clone(),
      provider: self.provider.clone(),
      coin_type: self.coin_type,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
  pub address: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub balance: Decimal,
  pub strategy: String,
  pub provider: String,
  pub coin_type: CoinType,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Running aggregate over every wallet folded in for one coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
  pub coin_type: CoinType,
  pub total_wallets: u64,
  #[serde(with = "rust_decimal::serde::float")]
  pub total_balance: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub max_balance: Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub min_balance: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl StatsRecord {
  /// Zero record returned for a coin nothing has been folded into yet.
  pub fn empty(coin_type: CoinType, now: DateTime<Utc>) -> Self {
    Self {
      coin_type,
      total_wallets: 0,
      total_balance: Decimal::ZERO,
      max_balance: Decimal::ZERO,
      min_balance: Decimal::ZERO,
      created_at: now,
      updated_at: now,
    }
  }

  /// Record created by the first fold for a coin.
  pub fn first(coin_type: CoinType, balance: Decimal, now: DateTime<Utc>) -> Self {
    Self {
      coin_type,
      total_wallets: 1,
      total_balance: balance,
      max_balance: balance,
      min_balance: balance,
      created_at: now,
      updated_at: now,
    }
  }

  /// Folds one more balance in. `created_at` is left untouched.
  pub fn fold(&mut self, balance: Decimal, now: DateTime<Utc>) {
    if self.total_wallets == 0 {
      self.max_balance = balance;
      self.min_balance = balance;
    } else {
      self.max_balance = self.max_balance.max(balance);
      self.min_balance = self.min_balance.min(balance);
    }
    self.total_wallets += 1;
    self.total_balance += balance;
    self.updated_at = now;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_fold_sequence() {
    let t0 = Utc::now();
    let mut stats = StatsRecord::first(CoinType::Btc, dec!(1.5), t0);
    assert_eq!(stats.total_wallets, 1);
    assert_eq!(stats.min_balance, dec!(1.5));

    let t1 = t0 + chrono::Duration::seconds(5);
    stats.fold(dec!(0.5), t1);
    assert_eq!(stats.total_wallets, 2);
    assert_eq!(stats.total_balance, dec!(2.0));
    assert_eq!(stats.max_balance, dec!(1.5));
    assert_eq!(stats.min_balance, dec!(0.5));
    assert_eq!(stats.created_at, t0);
    assert_eq!(stats.updated_at, t1);
  }

  #[test]
  fn test_fold_into_empty_sets_extremes() {
    let mut stats = StatsRecord::empty(CoinType::Doge, Utc::now());
    stats.fold(dec!(3), Utc::now());
    assert_eq!(stats.max_balance, dec!(3));
    assert_eq!(stats.min_balance, dec!(3));
  }

  #[test]
  fn test_summary_drops_key_material() {
    let now = Utc::now();
    let record = WalletRecord {
      address: "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH".to_string(),
      private_key_hex: "00".repeat(31) + "01",
      wif_key: Some("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn".to_string()),
      balance: dec!(0),
      strategy: "random".to_string(),
      provider: "mempool".to_string(),
      coin_type: CoinType::Btc,
      created_at: now,
      updated_at: now,
    };
    let json = serde_json::to_value(record.summary()).unwrap();
    assert!(json.get("private_key_hex").is_none());
    assert!(json.get("wif_key").is_none());
    assert_eq!(json["coin_type"], "BTC");
    assert_eq!(json["balance"], 0.0);
  }
}
