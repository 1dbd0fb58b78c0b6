//! Events delivered to live subscribers.

use crate::records::{StatsRecord, WalletRecord, WalletSummary};
use serde::{Deserialize, Serialize};

/// Serialises as `{"type": "wallet_found", "wallet": {..}}` or
/// `{"type": "stats_update", "stats": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FinderEvent {
  WalletFound { wallet: WalletSummary },
  StatsUpdate { stats: StatsRecord },
}

impl FinderEvent {
  pub fn wallet_found(record: &WalletRecord) -> Self {
    FinderEvent::WalletFound { wallet: record.summary() }
  }

  pub fn stats_update(stats: StatsRecord) -> Self {
    FinderEvent::StatsUpdate { stats }
  }

  pub fn event_type(&self) -> &'static str {
    match self {
      FinderEvent::WalletFound { .. } => "wallet_found",
      FinderEvent::StatsUpdate { .. } => "stats_update",
    }
  }
}
