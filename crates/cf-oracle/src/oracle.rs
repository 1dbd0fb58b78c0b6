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

//! The per-coin balance oracle.
//!
//! Providers are tried in order, primary first. Each provider carries its own
//! [`Throttle`] and [`ProviderState`]: calls closer together than the
//! provider's minimum interval are delayed, a provider that used up its
//! per-minute quota is skipped for the current lookup, and a provider that
//! keeps failing triggers a cooldown pause before the lookup moves on. A lookup never fails; when no
//! provider answers the result is a zero balance from [`UNKNOWN_PROVIDER`].

use cf_core::{CoinType, FinderConfig, UNKNOWN_PROVIDER};
use reqwest::Client;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{OracleError, OracleResult};
use crate::providers::{default_providers, ProviderOptions};
use crate::state::{ProviderState, Throttle};
use crate::traits::BalanceProvider;

/// Oracle tunables.
#[derive(Debug, Clone)]
pub struct OracleConfig {
  pub request_timeout: Duration,
  /// Consecutive failures of one provider before the cooldown pause
  pub error_threshold: u32,
  pub cooldown: Duration,
  /// Rotate the order of the fallback providers between lookups
  pub rotate_fallbacks: bool,
}

impl Default for OracleConfig {
  fn default() -> Self {
    Self {
      request_timeout: Duration::from_secs(10),
      error_threshold: 5,
      cooldown: Duration::from_secs(30),
      rotate_fallbacks: false,
    }
  }
}

impl From<&FinderConfig> for OracleConfig {
  fn from(config: &FinderConfig) -> Self {
    Self {
      request_timeout: config.request_timeout(),
      error_threshold: config.error_threshold,
      cooldown: config.cooldown(),
      rotate_fallbacks: config.rotate_fallbacks,
    }
  }
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  /// Balance in the chain's display unit
  pub balance: Decimal,
  pub provider: String,
}

impl Resolution {
  pub fn unknown() -> Self {
    Self { balance: Decimal::ZERO, provider: UNKNOWN_PROVIDER.to_string() }
  }

  pub fn is_unknown(&self) -> bool {
    self.provider == UNKNOWN_PROVIDER
  }
}

struct ProviderSlot {
  provider: Arc<dyn BalanceProvider>,
  throttle: Throttle,
  state: Mutex<ProviderState>,
}

pub struct BalanceOracle {
  coin: CoinType,
  client: Client,
  config: OracleConfig,
  slots: Vec<ProviderSlot>,
  cursor: AtomicUsize,
}

impl BalanceOracle {
  /// Builds an oracle over `providers`. The first provider flagged primary is
  /// moved to the front; without a flag the first entry is primary.
  pub fn new(
    coin: CoinType,
    mut providers: Vec<Arc<dyn BalanceProvider>>,
    config: OracleConfig,
  ) -> OracleResult<Self> {
    let client = Client::builder()
      .timeout(config.request_timeout)
      .user_agent(concat!("cf-oracle/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| OracleError::Client(e.to_string()))?;

    if let Some(pos) = providers.iter().position(|p| p.is_primary()) {
      let primary = providers.remove(pos);
      providers.insert(0, primary);
    }

    let slots = providers
      .into_iter()
      .map(|provider| ProviderSlot {
        throttle: Throttle::new(&provider.limits()),
        provider,
        state: Mutex::new(ProviderState::default()),
      })
      .collect::<Vec<_>>();

    info!(
      "{} oracle ready with providers [{}]",
      coin,
      slots.iter().map(|s| s.provider.id()).collect::<Vec<_>>().join(", ")
    );

    Ok(Self { coin, client, config, slots, cursor: AtomicUsize::new(0) })
  }

  /// Oracle over the built-in public providers for `coin`.
  pub fn with_defaults(
    coin: CoinType,
    config: OracleConfig,
    options: &ProviderOptions,
  ) -> OracleResult<Self> {
    Self::new(coin, default_providers(coin, options), config)
  }

  pub fn coin(&self) -> CoinType {
    self.coin
  }

  pub fn provider_ids(&self) -> Vec<String> {
    self.slots.iter().map(|s| s.provider.id().to_string()).collect()
  }

  /// Balance of `address` from the first provider that answers.
  #[instrument(skip(self), fields(coin = %self.coin))]
  pub async fn resolve(&self, address: &str) -> Resolution {
    for index in self.attempt_order() {
      let slot = &self.slots[index];
      if let Some(resolution) = self.try_provider(slot, address).await {
        return resolution;
      }
    }

    debug!("No provider answered for {}", address);
    Resolution::unknown()
  }

  fn attempt_order(&self) -> Vec<usize> {
    let count = self.slots.len();
    if count == 0 {
      return Vec::new();
    }
    let mut order = Vec::with_capacity(count);
    order.push(0);
    let fallbacks = count - 1;
    if fallbacks > 0 {
      let shift = if self.config.rotate_fallbacks {
        self.cursor.fetch_add(1, Ordering::Relaxed) % fallbacks
      } else {
        0
      };
      order.extend((0..fallbacks).map(|i| 1 + (i + shift) % fallbacks));
    }
    order
  }

  async fn try_provider(&self, slot: &ProviderSlot, address: &str) -> Option<Resolution> {
    let provider = &slot.provider;
    let mut state = slot.state.lock().await;

    if !slot.throttle.admit() {
      debug!("{} reached its per-minute cap, skipping", provider.id());
      return None;
    }
    slot.throttle.pace().await;

    let outcome = provider
      .fetch_balance(&self.client, address)
      .await
      .and_then(|raw| to_display_unit(raw, self.coin));

    match outcome {
      Ok(balance) => {
        state.record_success();
        Some(Resolution { balance, provider: provider.id().to_string() })
      }
      Err(e) => {
        if state.record_failure(self.config.error_threshold) {
          warn!(
            "{} failed {} times in a row ({}), cooling down for {:?}",
            provider.id(),
            self.config.error_threshold,
            e,
            self.config.cooldown
          );
          tokio::time::sleep(self.config.cooldown).await;
        } else {
          debug!(
            "{} failed ({} consecutive): {}",
            provider.id(),
            state.consecutive_errors(),
            e
          );
        }
        None
      }
    }
  }
}

/// Smallest-unit amount to the coin's display unit.
pub fn to_display_unit(raw: u128, coin: CoinType) -> OracleResult<Decimal> {
  let mantissa = i128::try_from(raw).map_err(|_| OracleError::UnitOverflow(raw))?;
  Decimal::try_from_i128_with_scale(mantissa, coin.decimals())
    .map(|d| d.normalize())
    .map_err(|_| OracleError::UnitOverflow(raw))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::providers::{HttpProvider, ResponseFormat};
  use rust_decimal_macros::dec;

  fn provider(id: &str) -> Arc<dyn BalanceProvider> {
    Arc::new(HttpProvider::new(id, "http://127.0.0.1:9/{address}", ResponseFormat::PlainInteger))
  }

  #[test]
  fn test_display_unit_conversion() {
    assert_eq!(to_display_unit(150_000_000, CoinType::Btc).unwrap(), dec!(1.5));
    assert_eq!(to_display_unit(1_000_000_000_000_000_000, CoinType::Eth).unwrap(), dec!(1));
    assert_eq!(to_display_unit(0, CoinType::Doge).unwrap(), Decimal::ZERO);
    assert!(to_display_unit(u128::MAX, CoinType::Btc).is_err());
  }

  #[test]
  fn test_primary_moved_first() {
    let primary: Arc<dyn BalanceProvider> = Arc::new(
      HttpProvider::new("p", "http://127.0.0.1:9/{address}", ResponseFormat::PlainInteger).primary(),
    );
    let oracle =
      BalanceOracle::new(CoinType::Btc, vec![provider("a"), primary, provider("b")], OracleConfig::default())
        .unwrap();
    assert_eq!(oracle.provider_ids(), vec!["p", "a", "b"]);
  }

  #[test]
  fn test_rotation_keeps_primary_first() {
    let config = OracleConfig { rotate_fallbacks: true, ..OracleConfig::default() };
    let oracle =
      BalanceOracle::new(CoinType::Btc, vec![provider("p"), provider("a"), provider("b")], config).unwrap();
    assert_eq!(oracle.attempt_order(), vec![0, 1, 2]);
    assert_eq!(oracle.attempt_order(), vec![0, 2, 1]);
    assert_eq!(oracle.attempt_order(), vec![0, 1, 2]);
  }

  #[test]
  fn test_finder_config_carries_rotation() {
    let finder = FinderConfig { rotate_fallbacks: true, error_threshold: 7, ..FinderConfig::default() };
    let config = OracleConfig::from(&finder);
    assert!(config.rotate_fallbacks);
    assert_eq!(config.error_threshold, 7);
    assert!(!OracleConfig::from(&FinderConfig::default()).rotate_fallbacks);
  }

  #[test]
  fn test_fixed_order_without_rotation() {
    let oracle = BalanceOracle::new(
      CoinType::Eth,
      vec![provider("p"), provider("a"), provider("b")],
      OracleConfig::default(),
    )
    .unwrap();
    assert_eq!(oracle.attempt_order(), vec![0, 1, 2]);
    assert_eq!(oracle.attempt_order(), vec![0, 1, 2]);
  }

  #[tokio::test]
  async fn test_no_providers_yields_unknown() {
    let oracle = BalanceOracle::new(CoinType::Doge, Vec::new(), OracleConfig::default()).unwrap();
    let resolution = oracle.resolve("DAnything").await;
    assert!(resolution.is_unknown());
    assert_eq!(resolution.balance, Decimal::ZERO);
  }
}
