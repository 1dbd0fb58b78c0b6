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
use rand::RngCore;

/// Walks upward from a random starting point, one key per call.
///
/// The leading byte of the start is kept in `1..=0xFE` so the walk starts
/// well below the curve order and never produces a zero key.
#[derive(Debug, Clone)]
pub struct RangeStrategy {
  start: [u8; CandidateKey::WIDTH],
  offset: u128,
}

impl RangeStrategy {
  pub fn new() -> Self {
    let mut start = [0u8; CandidateKey::WIDTH];
    OsRng.fill_bytes(&mut start);
    start[0] = 1 + (start[0] % 0xFE);
    Self::with_start(start)
  }

  pub fn with_start(start: [u8; CandidateKey::WIDTH]) -> Self {
    Self { start, offset: 0 }
  }

  pub fn offset(&self) -> u128 {
    self.offset
  }

  fn current(&self) -> [u8; CandidateKey::WIDTH] {
    let mut out = self.start;
    let offset = self.offset.to_be_bytes();
    let mut carry = 0u16;
    for i in (0..CandidateKey::WIDTH).rev() {
      let add = if i >= CandidateKey::WIDTH - offset.len() {
        offset[i - (CandidateKey::WIDTH - offset.len())] as u16
      } else {
        0
      };
      let sum = out[i] as u16 + add + carry;
      out[i] = (sum & 0xff) as u8;
      carry = sum >> 8;
    }
    out
  }
}

impl Default for RangeStrategy {
  fn default() -> Self {
    Self::new()
  }
}

impl KeyStrategy for RangeStrategy {
  fn kind(&self) -> StrategyKind {
    StrategyKind::Range
  }

  fn next_key(&mut self) -> CandidateKey {
    let key = CandidateKey::from_bytes(self.current());
    self.offset += 1;
    key
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::derive::is_valid_key;
  use std::collections::HashSet;

  #[test]
  fn test_never_repeats() {
    let mut strategy = RangeStrategy::new();
    let mut seen = HashSet::new();
    for _ in 0..1000 {
      let key = strategy.next_key();
      assert!(is_valid_key(&key));
      assert!(seen.insert(key));
    }
    assert_eq!(strategy.offset(), 1000);
  }

  #[test]
  fn test_carry_propagates() {
    let mut start = [0u8; CandidateKey::WIDTH];
    start[0] = 1;
    start[30] = 0xff;
    start[31] = 0xff;
    let mut strategy = RangeStrategy::with_start(start);
    strategy.next_key();
    let key = strategy.next_key();
    let bytes = key.as_bytes();
    assert_eq!(bytes[29], 1);
    assert_eq!(bytes[30], 0);
    assert_eq!(bytes[31], 0);
  }

  #[test]
  fn test_start_leading_byte_in_bounds() {
    for _ in 0..64 {
      let strategy = RangeStrategy::new();
      assert!((1..=0xFE).contains(&strategy.start[0]));
    }
  }
}
