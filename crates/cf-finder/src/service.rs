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

//! Control surface over one scheduler per coin.

use cf_core::{CoinType, FinderConfig, StatsRecord, WalletStore, WalletSummary};
use cf_keys::{parse_selection, StrategyConfig, StrategyKind};
use cf_oracle::{BalanceOracle, OracleConfig, ProviderOptions};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::aggregator::StatsAggregator;
use crate::error::{FinderError, FinderResult};
use crate::fanout::{EventFanout, SubscriberId, Subscription};
use crate::scheduler::{SearchContext, SearchScheduler};

pub struct FinderService {
  schedulers: HashMap<CoinType, SearchScheduler>,
  store: Arc<dyn WalletStore>,
  aggregator: StatsAggregator,
  fanout: Arc<EventFanout>,
  dispatcher: JoinHandle<()>,
  wallet_limit_max: usize,
}

impl FinderService {
  /// Service with the built-in provider tables for every supported coin.
  pub fn new(config: &FinderConfig, store: Arc<dyn WalletStore>) -> FinderResult<Self> {
    let options = ProviderOptions { etherscan_api_key: config.etherscan_api_key.clone() };
    let oracles = CoinType::ALL
      .iter()
      .map(|coin| BalanceOracle::with_defaults(*coin, OracleConfig::from(config), &options))
      .collect::<Result<Vec<_>, _>>()?;
    Self::with_oracles(config, store, oracles)
  }

  /// Service over caller-supplied oracles, one scheduler per oracle coin.
  pub fn with_oracles(
    config: &FinderConfig,
    store: Arc<dyn WalletStore>,
    oracles: Vec<BalanceOracle>,
  ) -> FinderResult<Self> {
    config.validate()?;

    let fanout = Arc::new(EventFanout::new(config.event_buffer));
    let (events, dispatcher) = fanout.spawn_dispatcher(config.event_buffer);

    let strategy_config = StrategyConfig {
      brain_words: config.brain_words.clone(),
      max_attempts: config.pattern_max_attempts,
      ..StrategyConfig::default()
    };
    let context =
      SearchContext::new(Arc::clone(&store), events, strategy_config, config.iteration_delay());

    let schedulers = oracles
      .into_iter()
      .map(|oracle| {
        let coin = oracle.coin();
        (coin, SearchScheduler::new(coin, Arc::new(oracle), context.clone()))
      })
      .collect();

    Ok(Self {
      schedulers,
      aggregator: context.aggregator.clone(),
      store,
      fanout,
      dispatcher,
      wallet_limit_max: config.wallet_limit_max,
    })
  }

  /// Starts `coin` with a comma separated strategy selection. Returns `false`
  /// when the coin was already running.
  pub async fn start(&self, coin: CoinType, selection: &str) -> FinderResult<bool> {
    self.start_with(coin, &parse_selection(selection)).await
  }

  pub async fn start_with(&self, coin: CoinType, kinds: &[StrategyKind]) -> FinderResult<bool> {
    Ok(self.scheduler(coin)?.start(kinds).await)
  }

  /// Stops `coin` and waits for its loop to exit.
  pub async fn stop(&self, coin: CoinType) -> FinderResult<bool> {
    self.scheduler(coin)?.stop().await
  }

  pub fn is_running(&self, coin: CoinType) -> bool {
    self.schedulers.get(&coin).is_some_and(|s| s.is_running())
  }

  pub fn running_coins(&self) -> Vec<CoinType> {
    let mut coins: Vec<_> =
      self.schedulers.iter().filter(|(_, s)| s.is_running()).map(|(coin, _)| *coin).collect();
    coins.sort();
    coins
  }

  pub async fn get_stats(&self, coin: CoinType) -> FinderResult<StatsRecord> {
    self.aggregator.current(coin).await
  }

  /// One record per supported coin, zeroed for coins without wallets.
  pub async fn all_stats(&self) -> FinderResult<Vec<StatsRecord>> {
    let mut all = Vec::with_capacity(CoinType::ALL.len());
    for coin in CoinType::ALL {
      all.push(self.aggregator.current(coin).await?);
    }
    Ok(all)
  }

  /// Most recent wallets first; `limit` is clamped to `[1, wallet_limit_max]`.
  pub async fn get_wallets(&self, limit: usize) -> FinderResult<Vec<WalletSummary>> {
    let limit = limit.clamp(1, self.wallet_limit_max);
    let wallets = self.store.list_wallets(limit).await?;
    Ok(wallets.iter().map(|w| w.summary()).collect())
  }

  pub fn subscribe(&self) -> Subscription {
    self.fanout.subscribe()
  }

  pub fn unsubscribe(&self, id: SubscriberId) -> bool {
    self.fanout.unsubscribe(id)
  }

  /// Stops every running loop, then the event dispatcher.
  pub async fn shutdown(self) -> FinderResult<()> {
    let running = self.running_coins();
    if !running.is_empty() {
      info!("Stopping finders for {:?}", running);
    }

    let results = join_all(self.schedulers.values().map(|s| s.stop())).await;
    for result in &results {
      if let Err(e) = result {
        warn!("Finder did not stop cleanly: {}", e);
      }
    }

    // Dropping the schedulers drops the last event senders.
    let Self { schedulers, dispatcher, .. } = self;
    drop(schedulers);
    dispatcher.await?;

    results.into_iter().collect::<FinderResult<Vec<_>>>()?;
    Ok(())
  }

  fn scheduler(&self, coin: CoinType) -> FinderResult<&SearchScheduler> {
    self.schedulers.get(&coin).ok_or(FinderError::NotConfigured(coin))
  }
}
