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

//! Error types for the finder pipeline.

use cf_core::CoinType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
  #[error(transparent)]
  Core(#[from] cf_core::Error),

  #[error("Key derivation failed: {0}")]
  Key(#[from] cf_keys::KeyError),

  #[error("Oracle setup failed: {0}")]
  Oracle(#[from] cf_oracle::OracleError),

  #[error("Background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  #[error("No search loop configured for {0}")]
  NotConfigured(CoinType),
}

pub type FinderResult<T> = Result<T, FinderError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_core_error_is_transparent() {
    let err: FinderError = cf_core::Error::Store("disk full".to_string()).into();
    assert_eq!(err.to_string(), "Store error: disk full");
  }

  #[test]
  fn test_not_configured_names_coin() {
    assert!(FinderError::NotConfigured(CoinType::Doge).to_string().contains("DOGE"));
  }
}
