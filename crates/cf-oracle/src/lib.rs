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

//! # cf-oracle
//!
//! Balance lookups against public block explorers. One [`BalanceOracle`] per
//! coin holds an ordered list of [`BalanceProvider`]s together with their rate
//! limit and error bookkeeping.
//!
//! ## Example
//!
//! ```ignore
//! use cf_core::CoinType;
//! use cf_oracle::{BalanceOracle, OracleConfig, ProviderOptions};
//!
//! let oracle = BalanceOracle::with_defaults(CoinType::Btc, OracleConfig::default(), &ProviderOptions::default())?;
//! let resolution = oracle.resolve("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa").await;
//! println!("{} via {}", resolution.balance, resolution.provider);
//! ```

pub mod error;
pub mod oracle;
pub mod providers;
mod state;
pub mod traits;

pub use error::{OracleError, OracleResult};
pub use oracle::{to_display_unit, BalanceOracle, OracleConfig, Resolution};
pub use providers::{default_providers, HttpProvider, ProviderOptions, ResponseFormat};
pub use traits::{BalanceProvider, ProviderLimits};
