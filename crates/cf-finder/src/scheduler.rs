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

//! Per-coin search loop.
//!
//! Each [`SearchScheduler`] owns one background task. The task draws a
//! candidate key from the strategy rotation, derives its address, asks the
//! oracle for the balance, persists the record, folds it into the statistics
//! and hands both events to the fan-out dispatcher. Stop is cooperative: the
//! task checks the shutdown signal at the top of every iteration and during
//! the inter-iteration delay.

use cf_core::{CoinType, FinderEvent, WalletRecord, WalletStore};
use cf_keys::{AddressDeriver, StrategyConfig, StrategyKind, StrategyRotation};
use cf_oracle::BalanceOracle;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::aggregator::StatsAggregator;
use crate::error::FinderResult;

/// Iterations between two throughput log lines.
const PROGRESS_INTERVAL: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
  Idle,
  Running,
  Stopping,
}

/// Collaborators shared by every scheduler of one service.
#[derive(Clone)]
pub struct SearchContext {
  pub deriver: Arc<AddressDeriver>,
  pub store: Arc<dyn WalletStore>,
  pub aggregator: StatsAggregator,
  pub events: mpsc::Sender<FinderEvent>,
  pub strategy_config: StrategyConfig,
  pub iteration_delay: Duration,
}

impl SearchContext {
  pub fn new(
    store: Arc<dyn WalletStore>,
    events: mpsc::Sender<FinderEvent>,
    strategy_config: StrategyConfig,
    iteration_delay: Duration,
  ) -> Self {
    Self {
      deriver: Arc::new(AddressDeriver::new()),
      aggregator: StatsAggregator::new(Arc::clone(&store)),
      store,
      events,
      strategy_config,
      iteration_delay,
    }
  }
}

struct Worker {
  shutdown: watch::Sender<bool>,
  handle: JoinHandle<()>,
  kinds: Vec<StrategyKind>,
}

pub struct SearchScheduler {
  coin: CoinType,
  oracle: Arc<BalanceOracle>,
  context: SearchContext,
  state: Arc<StdMutex<SearchState>>,
  worker: Mutex<Option<Worker>>,
}

impl SearchScheduler {
  pub fn new(coin: CoinType, oracle: Arc<BalanceOracle>, context: SearchContext) -> Self {
    Self {
      coin,
      oracle,
      context,
      state: Arc::new(StdMutex::new(SearchState::Idle)),
      worker: Mutex::new(None),
    }
  }

  pub fn coin(&self) -> CoinType {
    self.coin
  }

  pub fn state(&self) -> SearchState {
    *self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn is_running(&self) -> bool {
    self.state() == SearchState::Running
  }

  /// Strategies of the current run, empty when idle.
  pub async fn strategies(&self) -> Vec<StrategyKind> {
    self.worker.lock().await.as_ref().map(|w| w.kinds.clone()).unwrap_or_default()
  }

  /// Starts the search loop. Returns `false` when a loop is already running;
  /// a call made while a stop is in progress waits for that stop first.
  pub async fn start(&self, kinds: &[StrategyKind]) -> bool {
    let mut worker = self.worker.lock().await;
    if worker.as_ref().is_some_and(|w| !w.handle.is_finished()) {
      debug!("{} finder already running", self.coin);
      return false;
    }

    let rotation = StrategyRotation::new(
      kinds,
      self.coin,
      Arc::clone(&self.context.deriver),
      &self.context.strategy_config,
    );
    let kinds = rotation.kinds();
    let (shutdown, shutdown_rx) = watch::channel(false);

    self.set_state(SearchState::Running);
    let search = SearchLoop {
      coin: self.coin,
      oracle: Arc::clone(&self.oracle),
      context: self.context.clone(),
      rotation: Arc::new(StdMutex::new(rotation)),
    };
    let handle = tokio::spawn(search.run(shutdown_rx));

    info!(
      "Started {} finder with strategies [{}]",
      self.coin,
      kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
    );
    *worker = Some(Worker { shutdown, handle, kinds });
    true
  }

  /// Signals the loop and waits for it to exit. Returns `Ok(false)` when
  /// nothing was running. The worker slot stays locked until the loop is
  /// gone, so a concurrent `start` waits for the old loop to finish.
  pub async fn stop(&self) -> FinderResult<bool> {
    let mut slot = self.worker.lock().await;
    let Some(worker) = slot.take() else {
      return Ok(false);
    };

    self.set_state(SearchState::Stopping);
    // The loop may already have exited, in which case nobody is listening.
    let _ = worker.shutdown.send(true);
    let joined = worker.handle.await;
    self.set_state(SearchState::Idle);
    drop(slot);
    info!("Stopped {} finder", self.coin);

    joined?;
    Ok(true)
  }

  fn set_state(&self, state: SearchState) {
    *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
  }
}

struct SearchLoop {
  coin: CoinType,
  oracle: Arc<BalanceOracle>,
  context: SearchContext,
  rotation: Arc<StdMutex<StrategyRotation>>,
}

impl SearchLoop {
  async fn run(self, mut shutdown: watch::Receiver<bool>) {
    let mut checked: u64 = 0;
    let mut window_start = Instant::now();

    loop {
      if *shutdown.borrow() {
        break;
      }

      match self.iterate().await {
        Ok(kind) => {
          checked += 1;
          if checked % PROGRESS_INTERVAL == 0 {
            let elapsed = window_start.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 { PROGRESS_INTERVAL as f64 / elapsed } else { 0.0 };
            info!(
              "{} finder: checked {} addresses at {:.2} addresses/second using {}",
              self.coin, checked, rate, kind
            );
            window_start = Instant::now();
          }
        }
        Err(e) => error!("{} finder iteration failed: {}", self.coin, e),
      }

      tokio::select! {
        _ = tokio::time::sleep(self.context.iteration_delay) => {}
        changed = shutdown.changed() => {
          if changed.is_err() || *shutdown.borrow() {
            break;
          }
        }
      }
    }

    debug!("{} search loop exited after {} addresses", self.coin, checked);
  }

  /// One draw-derive-resolve-persist-fold cycle.
  async fn iterate(&self) -> FinderResult<StrategyKind> {
    let rotation = Arc::clone(&self.rotation);
    // Matching strategies derive addresses in a loop, keep that off the reactor.
    let (kind, key) = tokio::task::spawn_blocking(move || {
      rotation.lock().unwrap_or_else(PoisonError::into_inner).next_candidate()
    })
    .await?;

    let address = self.context.deriver.derive(&key, self.coin)?;
    let wif_key = self.context.deriver.wif(&key, self.coin)?;
    let resolution = self.oracle.resolve(&address).await;

    let now = Utc::now();
    let record = WalletRecord {
      address,
      private_key_hex: key.to_hex(),
      wif_key,
      balance: resolution.balance,
      strategy: kind.to_string(),
      provider: resolution.provider,
      coin_type: self.coin,
      created_at: now,
      updated_at: now,
    };

    self.context.store.append_wallet(&record).await?;

    if record.balance > Decimal::ZERO {
      info!(
        "Found {} wallet {} holding {} via {} ({})",
        self.coin, record.address, record.balance, record.provider, kind
      );
    }

    let stats = self.context.aggregator.fold(&record).await?;
    self.emit(FinderEvent::wallet_found(&record));
    self.emit(FinderEvent::stats_update(stats));

    Ok(kind)
  }

  fn emit(&self, event: FinderEvent) {
    match self.context.events.try_send(event) {
      Ok(()) => {}
      Err(TrySendError::Full(event)) => {
        warn!("{} event channel full, dropped {}", self.coin, event.event_type())
      }
      Err(TrySendError::Closed(_)) => debug!("{} event dispatcher is gone", self.coin),
    }
  }
}
