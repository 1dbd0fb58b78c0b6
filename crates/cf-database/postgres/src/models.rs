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

//! Row types for the `wallets` and `wallet_stats` tables.

use bigdecimal::{BigDecimal, ToPrimitive};
use cf_core::{CoinType, StatsRecord, WalletRecord};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::repository::{RepositoryError, RepositoryResult};
use crate::schema::{wallet_stats, wallets};

#[derive(Insertable, Debug)]
#[diesel(table_name = wallets)]
pub struct NewWallet<'a> {
  pub address: &'a str,
  pub private_key_hex: &'a str,
  pub wif_key: Option<&'a str>,
  pub balance: BigDecimal,
  pub strategy: &'a str,
  pub provider: &'a str,
  pub coin_type: &'a str,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl<'a> NewWallet<'a> {
  pub fn from_record(record: &'a WalletRecord) -> RepositoryResult<Self> {
    Ok(Self {
      address: &record.address,
      private_key_hex: &record.private_key_hex,
      wif_key: record.wif_key.as_deref(),
      balance: to_big_decimal(&record.balance)?,
      strategy: &record.strategy,
      provider: &record.provider,
      coin_type: record.coin_type.symbol(),
      created_at: record.created_at,
      updated_at: record.updated_at,
    })
  }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = wallets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WalletRow {
  pub id: i64,
  pub address: String,
  pub private_key_hex: String,
  pub wif_key: Option<String>,
  pub balance: BigDecimal,
  pub strategy: String,
  pub provider: String,
  pub coin_type: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<WalletRow> for WalletRecord {
  type Error = RepositoryError;

  fn try_from(row: WalletRow) -> Result<Self, Self::Error> {
    Ok(WalletRecord {
      coin_type: parse_coin(&row.coin_type)?,
      balance: to_decimal(&row.balance)?,
      address: row.address,
      private_key_hex: row.private_key_hex,
      wif_key: row.wif_key,
      strategy: row.strategy,
      provider: row.provider,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

/// Readable both through the query builder and from raw `RETURNING` rows.
#[derive(Queryable, QueryableByName, Selectable, Debug, Clone)]
#[diesel(table_name = wallet_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatsRow {
  pub coin_type: String,
  pub total_wallets: i64,
  pub total_balance: BigDecimal,
  pub max_balance: BigDecimal,
  pub min_balance: BigDecimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<StatsRow> for StatsRecord {
  type Error = RepositoryError;

  fn try_from(row: StatsRow) -> Result<Self, Self::Error> {
    Ok(StatsRecord {
      coin_type: parse_coin(&row.coin_type)?,
      total_wallets: u64::try_from(row.total_wallets).map_err(|_| {
        RepositoryError::SerializationError(format!("negative wallet count {}", row.total_wallets))
      })?,
      total_balance: to_decimal(&row.total_balance)?,
      max_balance: to_decimal(&row.max_balance)?,
      min_balance: to_decimal(&row.min_balance)?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

fn parse_coin(symbol: &str) -> RepositoryResult<CoinType> {
  CoinType::from_str(symbol).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub fn to_big_decimal(value: &Decimal) -> RepositoryResult<BigDecimal> {
  BigDecimal::from_str(&value.to_string())
    .map_err(|e| RepositoryError::SerializationError(format!("decimal {}: {}", value, e)))
}

/// NUMERIC to Decimal through the digit/exponent pair, rejecting values that
/// need more than 28 fractional digits or 96 bits of mantissa.
pub fn to_decimal(value: &BigDecimal) -> RepositoryResult<Decimal> {
  let out_of_range =
    || RepositoryError::SerializationError(format!("numeric {} out of decimal range", value));
  let (digits, scale) = value.normalized().as_bigint_and_exponent();
  let mantissa = digits.to_i128().ok_or_else(out_of_range)?;

  if scale >= 0 {
    let scale = u32::try_from(scale).map_err(|_| out_of_range())?;
    Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|_| out_of_range())
  } else {
    let exponent = u32::try_from(-scale).map_err(|_| out_of_range())?;
    let factor = 10i128.checked_pow(exponent).ok_or_else(out_of_range)?;
    let whole = mantissa.checked_mul(factor).ok_or_else(out_of_range)?;
    Decimal::try_from_i128_with_scale(whole, 0).map_err(|_| out_of_range())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_decimal_conversion_keeps_value() {
    for value in [dec!(0), dec!(1.5), dec!(0.000000000000000001), dec!(21000000), dec!(12.34567891)] {
      let big = to_big_decimal(&value).unwrap();
      assert_eq!(to_decimal(&big).unwrap(), value);
    }
  }

  #[test]
  fn test_stats_row_conversion() {
    let now = Utc::now();
    let row = StatsRow {
      coin_type: "ETH".to_string(),
      total_wallets: 2,
      total_balance: BigDecimal::from_str("2.0").unwrap(),
      max_balance: BigDecimal::from_str("1.5").unwrap(),
      min_balance: BigDecimal::from_str("0.5").unwrap(),
      created_at: now,
      updated_at: now,
    };
    let stats = StatsRecord::try_from(row).unwrap();
    assert_eq!(stats.coin_type, CoinType::Eth);
    assert_eq!(stats.total_wallets, 2);
    assert_eq!(stats.total_balance, dec!(2));
    assert_eq!(stats.min_balance, dec!(0.5));
  }

  #[test]
  fn test_unknown_coin_rejected() {
    assert!(parse_coin("XYZ").is_err());
  }
}
