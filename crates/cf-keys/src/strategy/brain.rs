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
use crate::derive::is_valid_key;
use cf_core::{CandidateKey, DEFAULT_BRAIN_WORDS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::debug;

const MIN_WORDS: usize = 3;
const MAX_WORDS: usize = 5;

/// Passphrase ("brain wallet") keys: SHA-256 over a phrase of 3-5 words drawn
/// with replacement from a vocabulary.
pub struct BrainWalletStrategy {
  words: Vec<String>,
  separator: String,
  rng: StdRng,
}

impl BrainWalletStrategy {
  pub fn new(words: Vec<String>, separator: &str) -> Self {
    Self::with_rng(words, separator, StdRng::from_entropy())
  }

  /// Seeded phrase sampling, for reproducible runs.
  pub fn with_seed(words: Vec<String>, separator: &str, seed: u64) -> Self {
    Self::with_rng(words, separator, StdRng::seed_from_u64(seed))
  }

  fn with_rng(words: Vec<String>, separator: &str, rng: StdRng) -> Self {
    let words = if words.is_empty() {
      DEFAULT_BRAIN_WORDS.iter().map(|w| w.to_string()).collect()
    } else {
      words
    };
    Self { words, separator: separator.to_string(), rng }
  }

  pub fn next_phrase(&mut self) -> String {
    let count = self.rng.gen_range(MIN_WORDS..=MAX_WORDS);
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
      if let Some(word) = self.words.choose(&mut self.rng) {
        picked.push(word.as_str());
      }
    }
    picked.join(&self.separator)
  }

  pub fn key_for_phrase(phrase: &str) -> CandidateKey {
    CandidateKey::from_bytes(Sha256::digest(phrase.as_bytes()).into())
  }
}

impl KeyStrategy for BrainWalletStrategy {
  fn kind(&self) -> StrategyKind {
    StrategyKind::Brain
  }

  fn next_key(&mut self) -> CandidateKey {
    let phrase = self.next_phrase();
    let key = Self::key_for_phrase(&phrase);
    if is_valid_key(&key) {
      key
    } else {
      debug!("Passphrase hash is not a valid secret, drawing a random key");
      random_key()
    }
  }
}
