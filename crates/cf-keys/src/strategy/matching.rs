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

use super::random::random_key;
use super::{KeyStrategy, StrategyKind};
use crate::derive::AddressDeriver;
use cf_core::{CandidateKey, CoinType};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Substrings the pattern strategy looks for in the lowercase address.
pub const VANITY_PATTERNS: [&str; 4] = ["000", "777", "123", "aaa"];

/// Case-sensitive fragments typical of early-era addresses.
pub const EARLY_ERA_PATTERNS: [&str; 5] = ["1111", "1234", "abcd", "1A1z", "1H6Q"];

/// Genesis coinbase output.
pub const KNOWN_HISTORICAL_ADDRESSES: [&str; 1] = ["1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"];

/// Acceptance rule applied to a derived address.
#[derive(Debug, Clone)]
pub struct MatchRule {
  substrings: Vec<String>,
  case_insensitive: bool,
  known_addresses: HashSet<String>,
}

impl MatchRule {
  pub fn new<I, S>(substrings: I, case_insensitive: bool) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let substrings = substrings
      .into_iter()
      .map(Into::into)
      .map(|s: String| if case_insensitive { s.to_lowercase() } else { s })
      .collect();
    Self { substrings, case_insensitive, known_addresses: HashSet::new() }
  }

  pub fn with_known_addresses<I, S>(mut self, addresses: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.known_addresses.extend(addresses.into_iter().map(Into::into));
    self
  }

  pub fn vanity() -> Self {
    Self::new(VANITY_PATTERNS, true)
  }

  pub fn early_era() -> Self {
    Self::new(EARLY_ERA_PATTERNS, false).with_known_addresses(KNOWN_HISTORICAL_ADDRESSES)
  }

  pub fn matches(&self, address: &str) -> bool {
    if self.known_addresses.contains(address) {
      return true;
    }
    if self.case_insensitive {
      let lower = address.to_lowercase();
      self.substrings.iter().any(|s| lower.contains(s.as_str()))
    } else {
      self.substrings.iter().any(|s| address.contains(s.as_str()))
    }
  }
}

/// Draws random keys until the derived address satisfies a [`MatchRule`].
///
/// After `max_attempts` draws without a match the last drawn key is returned.
pub struct MatchingStrategy {
  kind: StrategyKind,
  coin: CoinType,
  deriver: Arc<AddressDeriver>,
  rule: MatchRule,
  max_attempts: usize,
}

impl MatchingStrategy {
  pub fn pattern(coin: CoinType, deriver: Arc<AddressDeriver>, max_attempts: usize) -> Self {
    Self::with_rule(StrategyKind::Pattern, coin, deriver, MatchRule::vanity(), max_attempts)
  }

  pub fn lost(coin: CoinType, deriver: Arc<AddressDeriver>, max_attempts: usize) -> Self {
    Self::with_rule(StrategyKind::Lost, coin, deriver, MatchRule::early_era(), max_attempts)
  }

  pub fn with_rule(
    kind: StrategyKind,
    coin: CoinType,
    deriver: Arc<AddressDeriver>,
    rule: MatchRule,
    max_attempts: usize,
  ) -> Self {
    Self { kind, coin, deriver, rule, max_attempts: max_attempts.max(1) }
  }
}

impl KeyStrategy for MatchingStrategy {
  fn kind(&self) -> StrategyKind {
    self.kind
  }

  fn next_key(&mut self) -> CandidateKey {
    let mut last = random_key();
    for attempt in 0..self.max_attempts {
      if attempt > 0 {
        last = random_key();
      }
      match self.deriver.derive(&last, self.coin) {
        Ok(address) if self.rule.matches(&address) => {
          trace!("{} strategy matched {} after {} draws", self.kind, address, attempt + 1);
          return last;
        }
        Ok(_) => {}
        Err(e) => debug!("Skipping underivable key: {}", e),
      }
    }
    debug!("{} strategy exhausted {} attempts, using last draw", self.kind, self.max_attempts);
    last
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::derive::is_valid_key;

  #[test]
  fn test_vanity_rule_ignores_case() {
    let rule = MatchRule::vanity();
    assert!(rule.matches("1BoatAAAxyz"));
    assert!(rule.matches("0x7E5F777"));
    assert!(!rule.matches("1Bxyz"));
  }

  #[test]
  fn test_early_era_rule_is_case_sensitive() {
    let rule = MatchRule::early_era();
    assert!(rule.matches("1A1zsomething"));
    assert!(!rule.matches("1a1zsomething"));
    assert!(rule.matches("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"));
  }

  #[test]
  fn test_known_address_matches_exactly() {
    let rule = MatchRule::new(Vec::<String>::new(), false).with_known_addresses(["1Known"]);
    assert!(rule.matches("1Known"));
    assert!(!rule.matches("1Knownx"));
  }

  #[test]
  fn test_always_matching_rule_returns_first_draw() {
    let deriver = Arc::new(AddressDeriver::new());
    let rule = MatchRule::new(["1"], false);
    let mut strategy =
      MatchingStrategy::with_rule(StrategyKind::Pattern, CoinType::Btc, deriver, rule, 10);
    assert!(is_valid_key(&strategy.next_key()));
  }

  #[test]
  fn test_unmatchable_rule_falls_back_after_bound() {
    let deriver = Arc::new(AddressDeriver::new());
    let rule = MatchRule::new(["not-base58-!"], false);
    let mut strategy =
      MatchingStrategy::with_rule(StrategyKind::Lost, CoinType::Doge, deriver, rule, 3);
    assert_eq!(strategy.kind(), StrategyKind::Lost);
    assert!(is_valid_key(&strategy.next_key()));
  }
}
