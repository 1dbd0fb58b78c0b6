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

//! Candidate key strategies.
//!
//! Every strategy hands out one [`CandidateKey`] per call. Strategies that
//! search for a property of the derived address give up after a bounded number
//! of draws and return their last random key, so a caller never stalls.

mod brain;
mod matching;
mod random;
mod range;

pub use brain::BrainWalletStrategy;
pub use matching::{
  MatchRule, MatchingStrategy, EARLY_ERA_PATTERNS, KNOWN_HISTORICAL_ADDRESSES, VANITY_PATTERNS,
};
pub use random::RandomStrategy;
pub use range::RangeStrategy;

use crate::derive::AddressDeriver;
use cf_core::{CandidateKey, CoinType, DEFAULT_BRAIN_WORDS};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// A source of candidate private keys.
pub trait KeyStrategy: Send {
  fn kind(&self) -> StrategyKind;

  fn next_key(&mut self) -> CandidateKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
  Random,
  Brain,
  Pattern,
  Range,
  Lost,
}

impl StrategyKind {
  pub const ALL: [StrategyKind; 5] = [
    StrategyKind::Random,
    StrategyKind::Brain,
    StrategyKind::Pattern,
    StrategyKind::Range,
    StrategyKind::Lost,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      StrategyKind::Random => "random",
      StrategyKind::Brain => "brain",
      StrategyKind::Pattern => "pattern",
      StrategyKind::Range => "range",
      StrategyKind::Lost => "lost",
    }
  }
}

impl fmt::Display for StrategyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StrategyKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "random" => Ok(StrategyKind::Random),
      "brain" | "brainwallet" | "brain_wallet" | "passphrase" => Ok(StrategyKind::Brain),
      "pattern" => Ok(StrategyKind::Pattern),
      "range" | "sequential" => Ok(StrategyKind::Range),
      "lost" | "lostwallet" | "lost_wallet" | "lostbitcoin" => Ok(StrategyKind::Lost),
      other => Err(other.to_string()),
    }
  }
}

/// Parses a comma separated strategy selection.
///
/// `all` selects every strategy. Unknown names are dropped with a warning and a
/// selection with nothing usable left falls back to `[random]`.
pub fn parse_selection(selection: &str) -> Vec<StrategyKind> {
  if selection.trim().eq_ignore_ascii_case("all") {
    return StrategyKind::ALL.to_vec();
  }

  let mut kinds = Vec::new();
  for name in selection.split(',').filter(|name| !name.trim().is_empty()) {
    match name.parse::<StrategyKind>() {
      Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
      Ok(_) => {}
      Err(unknown) => warn!("Ignoring unknown strategy '{}'", unknown),
    }
  }

  if kinds.is_empty() {
    warn!("Strategy selection '{}' has no usable entries, using random", selection);
    kinds.push(StrategyKind::Random);
  }
  kinds
}

/// Tunables shared by strategy construction.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
  pub brain_words: Vec<String>,
  pub brain_separator: String,
  pub max_attempts: usize,
}

impl Default for StrategyConfig {
  fn default() -> Self {
    Self {
      brain_words: DEFAULT_BRAIN_WORDS.iter().map(|w| w.to_string()).collect(),
      brain_separator: " ".to_string(),
      max_attempts: 5000,
    }
  }
}

pub fn build_strategy(
  kind: StrategyKind,
  coin: CoinType,
  deriver: Arc<AddressDeriver>,
  config: &StrategyConfig,
) -> Box<dyn KeyStrategy> {
  match kind {
    StrategyKind::Random => Box::new(RandomStrategy::new()),
    StrategyKind::Brain => {
      Box::new(BrainWalletStrategy::new(config.brain_words.clone(), &config.brain_separator))
    }
    StrategyKind::Pattern => {
      Box::new(MatchingStrategy::pattern(coin, deriver, config.max_attempts))
    }
    StrategyKind::Range => Box::new(RangeStrategy::new()),
    StrategyKind::Lost => Box::new(MatchingStrategy::lost(coin, deriver, config.max_attempts)),
  }
}

/// Round-robin over a fixed set of strategy instances.
pub struct StrategyRotation {
  strategies: Vec<Box<dyn KeyStrategy>>,
  cursor: usize,
}

impl StrategyRotation {
  /// An empty `kinds` list yields a rotation holding just the random strategy.
  pub fn new(
    kinds: &[StrategyKind],
    coin: CoinType,
    deriver: Arc<AddressDeriver>,
    config: &StrategyConfig,
  ) -> Self {
    let kinds = if kinds.is_empty() { &[StrategyKind::Random][..] } else { kinds };
    let strategies =
      kinds.iter().map(|kind| build_strategy(*kind, coin, Arc::clone(&deriver), config)).collect();
    Self { strategies, cursor: 0 }
  }

  pub fn from_strategies(strategies: Vec<Box<dyn KeyStrategy>>) -> Self {
    if strategies.is_empty() {
      let random: Box<dyn KeyStrategy> = Box::new(RandomStrategy::new());
      return Self { strategies: vec![random], cursor: 0 };
    }
    Self { strategies, cursor: 0 }
  }

  /// Draws from the current strategy and advances, wrapping at the end.
  pub fn next_candidate(&mut self) -> (StrategyKind, CandidateKey) {
    let strategy = &mut self.strategies[self.cursor];
    let kind = strategy.kind();
    let key = strategy.next_key();
    self.cursor = (self.cursor + 1) % self.strategies.len();
    (kind, key)
  }

  pub fn kinds(&self) -> Vec<StrategyKind> {
    self.strategies.iter().map(|s| s.kind()).collect()
  }
}
