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

//! Per-provider call bookkeeping owned by one oracle.

use governor::{
  clock::DefaultClock,
  middleware::NoOpMiddleware,
  state::{InMemoryState, NotKeyed},
  Quota, RateLimiter,
};
use std::num::NonZeroU32;

use crate::traits::ProviderLimits;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Call budget of one provider: a pacing limiter for the minimum interval and
/// a per-minute quota that is checked without waiting.
pub(crate) struct Throttle {
  pacing: Option<DirectLimiter>,
  per_minute: Option<DirectLimiter>,
}

impl Throttle {
  pub(crate) fn new(limits: &ProviderLimits) -> Self {
    let pacing = Quota::with_period(limits.min_interval).map(RateLimiter::direct);
    let per_minute =
      NonZeroU32::new(limits.per_minute_cap).map(|cap| RateLimiter::direct(Quota::per_minute(cap)));
    Self { pacing, per_minute }
  }

  /// Takes one call from the per-minute quota. `false` means the provider is
  /// over its cap and must be skipped.
  pub(crate) fn admit(&self) -> bool {
    self.per_minute.as_ref().map_or(true, |limiter| limiter.check().is_ok())
  }

  /// Waits until the minimum interval since the previous call has passed.
  pub(crate) async fn pace(&self) {
    if let Some(limiter) = &self.pacing {
      limiter.until_ready().await;
    }
  }
}

#[derive(Debug, Default)]
pub(crate) struct ProviderState {
  consecutive_errors: u32,
}

impl ProviderState {
  pub(crate) fn record_success(&mut self) {
    self.consecutive_errors = 0;
  }

  /// Counts a failure. Returns true when `threshold` is reached, after which
  /// the counter starts over.
  pub(crate) fn record_failure(&mut self, threshold: u32) -> bool {
    self.consecutive_errors += 1;
    if threshold > 0 && self.consecutive_errors >= threshold {
      self.consecutive_errors = 0;
      true
    } else {
      false
    }
  }

  pub(crate) fn consecutive_errors(&self) -> u32 {
    self.consecutive_errors
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::{Duration, Instant};

  fn limits(interval_ms: u64, cap: u32) -> ProviderLimits {
    ProviderLimits::new(Duration::from_millis(interval_ms), cap)
  }

  #[tokio::test]
  async fn test_pacing_spaces_calls() {
    let throttle = Throttle::new(&limits(200, 0));
    let started = Instant::now();
    throttle.pace().await;
    assert!(started.elapsed() < Duration::from_millis(200));

    throttle.pace().await;
    assert!(started.elapsed() >= Duration::from_millis(190));
  }

  #[test]
  fn test_cap_denies_after_budget() {
    let throttle = Throttle::new(&limits(0, 2));
    assert!(throttle.admit());
    assert!(throttle.admit());
    assert!(!throttle.admit());
  }

  #[tokio::test]
  async fn test_unlimited_never_waits_or_denies() {
    let throttle = Throttle::new(&ProviderLimits::unlimited());
    let started = Instant::now();
    for _ in 0..1000 {
      assert!(throttle.admit());
      throttle.pace().await;
    }
    assert!(started.elapsed() < Duration::from_secs(1));
  }

  #[test]
  fn test_failure_threshold_trips_and_resets() {
    let mut state = ProviderState::default();
    assert!(!state.record_failure(3));
    assert!(!state.record_failure(3));
    assert!(state.record_failure(3));
    assert_eq!(state.consecutive_errors(), 0);

    state.record_failure(3);
    state.record_success();
    assert_eq!(state.consecutive_errors(), 0);
  }
}
