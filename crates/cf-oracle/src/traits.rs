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

//! Traits for balance providers.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::OracleResult;

/// Call budget of a single provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLimits {
  /// Minimum spacing between two calls
  pub min_interval: Duration,
  /// Calls allowed per one-minute window, `0` for no cap
  pub per_minute_cap: u32,
}

impl ProviderLimits {
  pub const fn new(min_interval: Duration, per_minute_cap: u32) -> Self {
    Self { min_interval, per_minute_cap }
  }

  pub const fn unlimited() -> Self {
    Self { min_interval: Duration::ZERO, per_minute_cap: 0 }
  }
}

impl Default for ProviderLimits {
  fn default() -> Self {
    Self::new(Duration::from_secs(1), 60)
  }
}

/// An external address-balance lookup service.
///
/// Implementations perform exactly one request per call and report the amount
/// in the chain's smallest unit. Rate limiting is the oracle's job.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
  /// Identifier reported alongside the balance it answered.
  fn id(&self) -> &str;

  fn limits(&self) -> ProviderLimits;

  /// Primary providers are always asked first.
  fn is_primary(&self) -> bool {
    false
  }

  async fn fetch_balance(&self, client: &Client, address: &str) -> OracleResult<u128>;
}
