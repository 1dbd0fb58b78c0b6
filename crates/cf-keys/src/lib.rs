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

//! # cf-keys
//!
//! Private key to address derivation for BTC, ETH and DOGE, and the candidate
//! key strategies the search loops draw from.
//!
//! ```ignore
//! use cf_keys::{AddressDeriver, RandomStrategy, KeyStrategy};
//! use cf_core::CoinType;
//!
//! let deriver = AddressDeriver::new();
//! let key = RandomStrategy::new().next_key();
//! let address = deriver.derive(&key, CoinType::Btc)?;
//! ```

pub mod derive;
pub mod error;
pub mod strategy;

pub use derive::{base58check, eip55_address, hash160, is_valid_key, wif_version, AddressDeriver, AddressScheme};
pub use error::{KeyError, KeyResult};
pub use strategy::{
  build_strategy, parse_selection, BrainWalletStrategy, KeyStrategy, MatchRule, MatchingStrategy,
  RandomStrategy, RangeStrategy, StrategyConfig, StrategyKind, StrategyRotation,
  EARLY_ERA_PATTERNS, KNOWN_HISTORICAL_ADDRESSES,
};
