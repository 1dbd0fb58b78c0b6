use async_trait::async_trait;
use cf_core::{CoinType, FinderConfig, FinderEvent, MemoryStore, StatsRecord, WalletRecord, WalletStore};
use cf_finder::{
  EventFanout, FinderError, FinderService, SearchContext, SearchScheduler, SearchState, Subscription,
};
use cf_keys::{StrategyConfig, StrategyKind};
use cf_oracle::{BalanceOracle, BalanceProvider, HttpProvider, OracleConfig, ProviderLimits, ResponseFormat};
use chrono::Utc;
use mockall::mock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DELAY: Duration = Duration::from_millis(20);

mock! {
  pub Store {}

  #[async_trait]
  impl WalletStore for Store {
    async fn append_wallet(&self, record: &WalletRecord) -> cf_core::Result<()>;
    async fn list_wallets(&self, limit: usize) -> cf_core::Result<Vec<WalletRecord>>;
    async fn fold_stats(&self, coin_type: CoinType, balance: Decimal) -> cf_core::Result<StatsRecord>;
    async fn latest_stats(&self, coin_type: CoinType) -> cf_core::Result<StatsRecord>;
  }
}

fn quick_oracle_config() -> OracleConfig {
  OracleConfig {
    request_timeout: Duration::from_secs(2),
    error_threshold: 100,
    cooldown: Duration::from_millis(10),
    rotate_fallbacks: false,
  }
}

/// Oracle with no providers: every lookup answers the unknown sentinel at once.
fn offline_oracle(coin: CoinType) -> BalanceOracle {
  BalanceOracle::new(coin, Vec::new(), quick_oracle_config()).unwrap()
}

fn scheduler(
  coin: CoinType,
  oracle: BalanceOracle,
  store: Arc<dyn WalletStore>,
) -> (SearchScheduler, Subscription, Arc<EventFanout>) {
  let fanout = Arc::new(EventFanout::new(64));
  let subscription = fanout.subscribe();
  let (events, _dispatcher) = fanout.spawn_dispatcher(64);
  let context = SearchContext::new(store, events, StrategyConfig::default(), DELAY);
  (SearchScheduler::new(coin, Arc::new(oracle), context), subscription, fanout)
}

async fn next_event(subscription: &mut Subscription) -> FinderEvent {
  tokio::time::timeout(Duration::from_secs(5), subscription.recv()).await.unwrap().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_iteration_persists_and_emits_in_order() {
  let store = Arc::new(MemoryStore::new());
  let (scheduler, mut events, _fanout) =
    scheduler(CoinType::Btc, offline_oracle(CoinType::Btc), store.clone());

  assert!(scheduler.start(&[StrategyKind::Random]).await);

  let found = next_event(&mut events).await;
  let stats = next_event(&mut events).await;
  scheduler.stop().await.unwrap();

  match found {
    FinderEvent::WalletFound { wallet } => {
      assert_eq!(wallet.coin_type, CoinType::Btc);
      assert_eq!(wallet.balance, Decimal::ZERO);
      assert_eq!(wallet.provider, cf_core::UNKNOWN_PROVIDER);
      assert_eq!(wallet.strategy, "random");
      assert!(wallet.address.starts_with('1'));
    }
    other => panic!("expected wallet_found, got {}", other.event_type()),
  }
  match stats {
    FinderEvent::StatsUpdate { stats } => {
      assert_eq!(stats.coin_type, CoinType::Btc);
      assert!(stats.total_wallets >= 1);
    }
    other => panic!("expected stats_update, got {}", other.event_type()),
  }

  let persisted = store.list_wallets(10).await.unwrap();
  assert!(!persisted.is_empty());
  assert_eq!(persisted.last().unwrap().private_key_hex.len(), 64);
  assert!(persisted.iter().all(|w| w.wif_key.is_some()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_is_prompt_and_idempotent() {
  let (scheduler, _events, _fanout) =
    scheduler(CoinType::Doge, offline_oracle(CoinType::Doge), Arc::new(MemoryStore::new()));

  assert_eq!(scheduler.coin(), CoinType::Doge);
  assert_eq!(scheduler.state(), SearchState::Idle);
  assert!(scheduler.start(&[StrategyKind::Range, StrategyKind::Brain]).await);
  assert!(scheduler.is_running());
  assert_eq!(scheduler.strategies().await, vec![StrategyKind::Range, StrategyKind::Brain]);
  tokio::time::sleep(DELAY * 3).await;

  let begun = Instant::now();
  assert!(scheduler.stop().await.unwrap());
  // One iteration delay plus one request timeout.
  assert!(begun.elapsed() < DELAY + Duration::from_secs(2));
  assert!(!scheduler.is_running());
  assert_eq!(scheduler.state(), SearchState::Idle);
  assert!(scheduler.strategies().await.is_empty());

  assert!(!scheduler.stop().await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_start_twice_is_noop() {
  let (scheduler, _events, _fanout) =
    scheduler(CoinType::Eth, offline_oracle(CoinType::Eth), Arc::new(MemoryStore::new()));

  assert!(scheduler.start(&[StrategyKind::Random]).await);
  assert!(!scheduler.start(&[StrategyKind::Brain]).await);
  assert_eq!(scheduler.strategies().await, vec![StrategyKind::Random]);

  scheduler.stop().await.unwrap();
  assert!(scheduler.start(&[StrategyKind::Brain]).await);
  assert_eq!(scheduler.strategies().await, vec![StrategyKind::Brain]);
  scheduler.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_append_skips_fold_and_events() {
  let appends = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&appends);

  let mut store = MockStore::new();
  store.expect_append_wallet().returning(move |_| {
    counter.fetch_add(1, Ordering::SeqCst);
    Err(cf_core::Error::Store("connection refused".to_string()))
  });
  store.expect_fold_stats().never();

  let (scheduler, mut events, _fanout) =
    scheduler(CoinType::Btc, offline_oracle(CoinType::Btc), Arc::new(store));

  scheduler.start(&[StrategyKind::Random]).await;
  tokio::time::sleep(DELAY * 10).await;
  assert!(scheduler.is_running());
  scheduler.stop().await.unwrap();

  // The loop keeps going after every failure.
  assert!(appends.load(Ordering::SeqCst) >= 2);
  assert!(events.try_recv().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_fold_emits_nothing() {
  let mut store = MockStore::new();
  store.expect_append_wallet().returning(|_| Ok(()));
  store
    .expect_fold_stats()
    .returning(|_, _| Err(cf_core::Error::Store("serialization failure".to_string())));

  let (scheduler, mut events, _fanout) =
    scheduler(CoinType::Doge, offline_oracle(CoinType::Doge), Arc::new(store));

  scheduler.start(&[StrategyKind::Range]).await;
  tokio::time::sleep(DELAY * 5).await;
  scheduler.stop().await.unwrap();

  assert!(events.try_recv().is_none());
}

/// Oracle whose only provider answers after `delay`.
async fn slow_oracle(server: &MockServer, delay: Duration) -> BalanceOracle {
  Mock::given(method("GET"))
    .and(path_regex(r"^/slow/.+$"))
    .respond_with(ResponseTemplate::new(200).set_body_string("0").set_delay(delay))
    .mount(server)
    .await;

  let provider =
    HttpProvider::new("slow", format!("{}/slow/{{address}}", server.uri()), ResponseFormat::PlainInteger)
      .with_limits(ProviderLimits::unlimited());
  let providers: Vec<Arc<dyn BalanceProvider>> = vec![Arc::new(provider)];
  BalanceOracle::new(CoinType::Btc, providers, quick_oracle_config()).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_start_during_stop_waits_and_keeps_running() {
  let server = MockServer::start().await;
  let oracle = slow_oracle(&server, Duration::from_millis(500)).await;
  let (scheduler, _events, _fanout) = scheduler(CoinType::Btc, oracle, Arc::new(MemoryStore::new()));
  let scheduler = Arc::new(scheduler);

  assert!(scheduler.start(&[StrategyKind::Random]).await);
  // First lookup is now in flight.
  tokio::time::sleep(Duration::from_millis(100)).await;

  let stopping = {
    let scheduler = Arc::clone(&scheduler);
    tokio::spawn(async move { scheduler.stop().await })
  };
  tokio::time::sleep(Duration::from_millis(50)).await;
  assert_eq!(scheduler.state(), SearchState::Stopping);

  let restarted = scheduler.start(&[StrategyKind::Brain]).await;
  assert!(stopping.await.unwrap().unwrap());

  assert!(restarted);
  assert!(scheduler.is_running());
  assert_eq!(scheduler.state(), SearchState::Running);
  assert_eq!(scheduler.strategies().await, vec![StrategyKind::Brain]);
  assert!(!scheduler.start(&[StrategyKind::Random]).await);

  assert!(scheduler.stop().await.unwrap());
  assert!(!scheduler.is_running());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_balance_flows_from_provider_to_record() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path_regex(r"^/balance/1[1-9A-HJ-NP-Za-km-z]+$"))
    .respond_with(ResponseTemplate::new(200).set_body_string("150000000"))
    .mount(&server)
    .await;

  let provider = HttpProvider::new(
    "mock",
    format!("{}/balance/{{address}}", server.uri()),
    ResponseFormat::PlainInteger,
  )
  .with_limits(ProviderLimits::unlimited());
  let providers: Vec<Arc<dyn BalanceProvider>> = vec![Arc::new(provider)];
  let oracle = BalanceOracle::new(CoinType::Btc, providers, quick_oracle_config()).unwrap();

  let store = Arc::new(MemoryStore::new());
  let (scheduler, mut events, _fanout) = scheduler(CoinType::Btc, oracle, store.clone());
  scheduler.start(&[StrategyKind::Random]).await;

  let found = next_event(&mut events).await;
  let stats = next_event(&mut events).await;
  scheduler.stop().await.unwrap();

  assert!(matches!(found, FinderEvent::WalletFound { ref wallet } if wallet.balance == dec!(1.5) && wallet.provider == "mock"));
  match stats {
    FinderEvent::StatsUpdate { stats } => {
      assert_eq!(stats.max_balance, dec!(1.5));
      assert_eq!(stats.min_balance, dec!(1.5));
    }
    other => panic!("expected stats_update, got {}", other.event_type()),
  }
}

fn service_config() -> FinderConfig {
  FinderConfig { iteration_delay_ms: 20, wallet_limit_max: 5, ..FinderConfig::default() }
}

fn stored_wallet(n: usize) -> WalletRecord {
  let now = Utc::now();
  WalletRecord {
    address: format!("stored-{}", n),
    private_key_hex: "02".repeat(32),
    wif_key: None,
    balance: Decimal::ZERO,
    strategy: "range".to_string(),
    provider: cf_core::UNKNOWN_PROVIDER.to_string(),
    coin_type: CoinType::Doge,
    created_at: now,
    updated_at: now,
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_service_clamps_wallet_listing() {
  let store = Arc::new(MemoryStore::new());
  for n in 0..8 {
    store.append_wallet(&stored_wallet(n)).await.unwrap();
  }

  let service =
    FinderService::with_oracles(&service_config(), store, vec![offline_oracle(CoinType::Btc)]).unwrap();

  assert_eq!(service.get_wallets(0).await.unwrap().len(), 1);
  assert_eq!(service.get_wallets(3).await.unwrap().len(), 3);
  assert_eq!(service.get_wallets(1000).await.unwrap().len(), 5);
  assert_eq!(service.get_wallets(1).await.unwrap()[0].address, "stored-7");

  service.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_service_control_surface() {
  let service = FinderService::with_oracles(
    &service_config(),
    Arc::new(MemoryStore::new()),
    vec![offline_oracle(CoinType::Btc), offline_oracle(CoinType::Eth)],
  )
  .unwrap();
  let mut subscription = service.subscribe();

  // A selection with nothing usable falls back to the random strategy.
  assert!(service.start(CoinType::Btc, "nonsense").await.unwrap());
  assert!(!service.start(CoinType::Btc, "all").await.unwrap());
  assert!(service.is_running(CoinType::Btc));
  assert!(!service.is_running(CoinType::Eth));
  assert_eq!(service.running_coins(), vec![CoinType::Btc]);

  assert!(matches!(
    service.start(CoinType::Doge, "random").await,
    Err(FinderError::NotConfigured(CoinType::Doge))
  ));
  assert!(!service.is_running(CoinType::Doge));

  match next_event(&mut subscription).await {
    FinderEvent::WalletFound { wallet } => assert_eq!(wallet.strategy, "random"),
    other => panic!("expected wallet_found, got {}", other.event_type()),
  }

  assert!(service.stop(CoinType::Btc).await.unwrap());
  assert!(!service.stop(CoinType::Btc).await.unwrap());
  assert!(!service.is_running(CoinType::Btc));

  let btc = service.get_stats(CoinType::Btc).await.unwrap();
  assert!(btc.total_wallets >= 1);

  let all = service.all_stats().await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all.iter().find(|s| s.coin_type == CoinType::Doge).unwrap().total_wallets, 0);

  assert!(service.unsubscribe(subscription.id()));
  service.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_stops_running_loops() {
  let service = FinderService::with_oracles(
    &service_config(),
    Arc::new(MemoryStore::new()),
    vec![offline_oracle(CoinType::Btc), offline_oracle(CoinType::Doge)],
  )
  .unwrap();

  service.start(CoinType::Btc, "random,range").await.unwrap();
  service.start(CoinType::Doge, "brain").await.unwrap();
  tokio::time::sleep(DELAY * 2).await;

  tokio::time::timeout(Duration::from_secs(5), service.shutdown()).await.unwrap().unwrap();
}
