//! Configuration management for the finder pipeline

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Vocabulary used by the passphrase strategy when `CF_BRAIN_WORDS` is not set.
pub const DEFAULT_BRAIN_WORDS: [&str; 10] = [
  "satoshi",
  "bitcoin",
  "blockchain",
  "crypto",
  "wallet",
  "private",
  "key",
  "address",
  "mining",
  "block",
];

/// Main configuration struct for the finder
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FinderConfig {
  /// PostgreSQL connection URL; `None` keeps everything in memory
  pub database_url: Option<String>,

  /// Pause between two search iterations of one coin, in milliseconds
  pub iteration_delay_ms: u64,

  /// Per-provider request timeout in seconds
  pub request_timeout_secs: u64,

  /// Consecutive provider errors before the oracle cools down
  pub error_threshold: u32,

  /// Rotate the fallback providers between lookups; the primary stays first
  pub rotate_fallbacks: bool,

  /// Cooldown length in seconds
  pub cooldown_secs: u64,

  /// Capacity of subscriber and dispatcher channels
  pub event_buffer: usize,

  /// Bounded retries for the matching strategies
  pub pattern_max_attempts: usize,

  /// Passphrase vocabulary
  pub brain_words: Vec<String>,

  /// Upper bound for wallet listings
  pub wallet_limit_max: usize,

  /// Optional Etherscan API key
  pub etherscan_api_key: Option<String>,
}

impl Default for FinderConfig {
  fn default() -> Self {
    Self {
      database_url: None,
      iteration_delay_ms: 1000,
      request_timeout_secs: 10,
      error_threshold: 5,
      rotate_fallbacks: false,
      cooldown_secs: 30,
      event_buffer: 256,
      pattern_max_attempts: 5000,
      brain_words: DEFAULT_BRAIN_WORDS.iter().map(|w| w.to_string()).collect(),
      wallet_limit_max: 50,
      etherscan_api_key: None,
    }
  }
}

impl FinderConfig {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let defaults = Self::default();

    let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

    let brain_words = match env::var("CF_BRAIN_WORDS") {
      Ok(raw) => {
        let words: Vec<String> = raw
          .split(',')
          .map(|w| w.trim().to_lowercase())
          .filter(|w| !w.is_empty())
          .collect();
        if words.is_empty() {
          return Err(Error::Config("CF_BRAIN_WORDS contains no words".to_string()));
        }
        words
      }
      Err(_) => defaults.brain_words,
    };

    let config = Self {
      database_url,
      iteration_delay_ms: parse_var("CF_ITERATION_DELAY_MS", defaults.iteration_delay_ms)?,
      request_timeout_secs: parse_var("CF_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
      error_threshold: parse_var("CF_ERROR_THRESHOLD", defaults.error_threshold)?,
      rotate_fallbacks: parse_var("CF_ROTATE_FALLBACKS", defaults.rotate_fallbacks)?,
      cooldown_secs: parse_var("CF_COOLDOWN_SECS", defaults.cooldown_secs)?,
      event_buffer: parse_var("CF_EVENT_BUFFER", defaults.event_buffer)?,
      pattern_max_attempts: parse_var("CF_PATTERN_MAX_ATTEMPTS", defaults.pattern_max_attempts)?,
      brain_words,
      wallet_limit_max: parse_var("CF_WALLET_LIMIT_MAX", defaults.wallet_limit_max)?,
      etherscan_api_key: env::var("ETHERSCAN_API_KEY").ok().filter(|k| !k.is_empty()),
    };

    config.validate()?;
    Ok(config)
  }

  /// Reject values the pipeline cannot run with
  pub fn validate(&self) -> Result<()> {
    if self.request_timeout_secs == 0 {
      return Err(Error::Config("CF_REQUEST_TIMEOUT_SECS must be positive".to_string()));
    }
    if self.error_threshold == 0 {
      return Err(Error::Config("CF_ERROR_THRESHOLD must be positive".to_string()));
    }
    if self.event_buffer == 0 {
      return Err(Error::Config("CF_EVENT_BUFFER must be positive".to_string()));
    }
    if self.pattern_max_attempts == 0 {
      return Err(Error::Config("CF_PATTERN_MAX_ATTEMPTS must be positive".to_string()));
    }
    if self.wallet_limit_max == 0 {
      return Err(Error::Config("CF_WALLET_LIMIT_MAX must be positive".to_string()));
    }
    Ok(())
  }

  pub fn iteration_delay(&self) -> Duration {
    Duration::from_millis(self.iteration_delay_ms)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }

  pub fn cooldown(&self) -> Duration {
    Duration::from_secs(self.cooldown_secs)
  }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
  match env::var(name) {
    Ok(raw) => raw.trim().parse().map_err(|_| Error::Config(format!("Invalid {}", name))),
    Err(_) => Ok(default),
  }
}
