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

//! Error types for balance lookups.

use thiserror::Error;

/// Errors a single provider call can produce.
///
/// None of these leave the oracle: a failing provider only moves the lookup on
/// to the next one in line.
#[derive(Error, Debug)]
pub enum OracleError {
  #[error("HTTP request failed: {0}")]
  RequestFailed(#[from] reqwest::Error),

  #[error("JSON parsing failed: {0}")]
  JsonParseFailed(#[from] serde_json::Error),

  #[error("Rate limit exceeded for provider: {0}")]
  RateLimitExceeded(String),

  #[error("HTTP {status} from {provider}")]
  Status { provider: String, status: u16 },

  #[error("Invalid response format from {api_source}: {message}")]
  InvalidResponse { api_source: String, message: String },

  #[error("Parse error: {0}")]
  ParseError(String),

  #[error("Amount {0} does not fit a decimal balance")]
  UnitOverflow(u128),

  #[error("Failed to build HTTP client: {0}")]
  Client(String),
}

pub type OracleResult<T> = Result<T, OracleError>;

impl From<OracleError> for cf_core::Error {
  fn from(err: OracleError) -> Self {
    cf_core::Error::Unexpected(err.to_string())
  }
}
