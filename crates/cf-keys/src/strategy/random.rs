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

use super::{KeyStrategy, StrategyKind};
use cf_core::CandidateKey;
use rand::rngs::OsRng;
use secp256k1::SecretKey;

/// Uniformly random key from the operating system CSPRNG.
pub fn random_key() -> CandidateKey {
  CandidateKey::from_bytes(SecretKey::new(&mut OsRng).secret_bytes())
}

#[derive(Debug, Default)]
pub struct RandomStrategy;

impl RandomStrategy {
  pub fn new() -> Self {
    Self
  }
}

impl KeyStrategy for RandomStrategy {
  fn kind(&self) -> StrategyKind {
    StrategyKind::Random
  }

  fn next_key(&mut self) -> CandidateKey {
    random_key()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::derive::is_valid_key;

  #[test]
  fn test_random_keys_are_valid_and_distinct() {
    let mut strategy = RandomStrategy::new();
    let a = strategy.next_key();
    let b = strategy.next_key();
    assert!(is_valid_key(&a));
    assert!(is_valid_key(&b));
    assert_ne!(a, b);
  }
}
