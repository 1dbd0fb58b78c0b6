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

//! Response body parsers, one per provider API shape.
//!
//! Every parser yields the balance in the chain's smallest unit. Missing or
//! `null` amount fields count as zero; only a body that is not the expected
//! document at all (bad JSON, an explicit failure flag, no `data` section) is
//! an error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::{OracleError, OracleResult};

/// Units per DOGE, for dogechain which reports whole coins.
const KOINU_PER_DOGE: u64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
  /// mempool.space: `chain_stats.funded_txo_sum - chain_stats.spent_txo_sum`
  Mempool,
  /// blockchain.info `balance?active=`: `{address}.final_balance`
  BlockchainInfo,
  /// Blockchair dashboards: `data.{address}.address.balance`
  Blockchair,
  /// Etherscan account balance: `status == "1"`, `result` in wei
  Etherscan,
  /// dogechain.info: `success == 1`, `balance` in DOGE
  Dogechain,
  /// Bare integer body, e.g. blockchain.info `q/addressbalance`
  PlainInteger,
}

impl ResponseFormat {
  pub fn name(&self) -> &'static str {
    match self {
      ResponseFormat::Mempool => "mempool",
      ResponseFormat::BlockchainInfo => "blockchain.info",
      ResponseFormat::Blockchair => "blockchair",
      ResponseFormat::Etherscan => "etherscan",
      ResponseFormat::Dogechain => "dogechain",
      ResponseFormat::PlainInteger => "plain",
    }
  }

  pub fn parse(&self, address: &str, body: &str) -> OracleResult<u128> {
    if let ResponseFormat::PlainInteger = self {
      let trimmed = body.trim();
      if trimmed.is_empty() {
        return Ok(0);
      }
      return trimmed
        .parse::<u128>()
        .map_err(|e| OracleError::ParseError(format!("plain balance '{}': {}", trimmed, e)));
    }

    let doc: Value = serde_json::from_str(body)?;
    match self {
      ResponseFormat::Mempool => {
        let stats = &doc["chain_stats"];
        let funded = amount(&stats["funded_txo_sum"])?;
        let spent = amount(&stats["spent_txo_sum"])?;
        Ok(funded.saturating_sub(spent))
      }
      ResponseFormat::BlockchainInfo => amount(&doc[address]["final_balance"]),
      ResponseFormat::Blockchair => {
        let data = match doc.get("data") {
          Some(Value::Object(map)) => map,
          _ => return Err(self.invalid("missing data section")),
        };
        // Blockchair may normalise the key (e.g. lowercase ETH addresses).
        let entry = data.get(address).or_else(|| data.values().next());
        match entry {
          Some(entry) => amount(&entry["address"]["balance"]),
          None => Ok(0),
        }
      }
      ResponseFormat::Etherscan => {
        if !flag_is_one(&doc["status"]) {
          let message = doc["message"].as_str().unwrap_or("status is not 1").to_string();
          return Err(self.invalid(&message));
        }
        amount(&doc["result"])
      }
      ResponseFormat::Dogechain => {
        if !flag_is_one(&doc["success"]) {
          return Err(self.invalid("success flag not set"));
        }
        whole_coins_to_units(&doc["balance"], KOINU_PER_DOGE)
      }
      ResponseFormat::PlainInteger => Ok(0),
    }
  }

  fn invalid(&self, message: &str) -> OracleError {
    OracleError::InvalidResponse { api_source: self.name().to_string(), message: message.to_string() }
  }
}

/// Integer amount from a JSON number or numeric string; absent means zero.
fn amount(value: &Value) -> OracleResult<u128> {
  match value {
    Value::Null => Ok(0),
    Value::Number(n) => {
      if let Some(v) = n.as_u64() {
        Ok(v as u128)
      } else {
        n.to_string()
          .parse::<u128>()
          .map_err(|_| OracleError::ParseError(format!("amount {} is not a whole unit count", n)))
      }
    }
    Value::String(s) if s.trim().is_empty() => Ok(0),
    Value::String(s) => s
      .trim()
      .parse::<u128>()
      .map_err(|e| OracleError::ParseError(format!("amount '{}': {}", s, e))),
    other => Err(OracleError::ParseError(format!("unexpected amount value {}", other))),
  }
}

fn whole_coins_to_units(value: &Value, units_per_coin: u64) -> OracleResult<u128> {
  let text = match value {
    Value::Null => return Ok(0),
    Value::Number(n) => n.to_string(),
    Value::String(s) if s.trim().is_empty() => return Ok(0),
    Value::String(s) => s.trim().to_string(),
    other => return Err(OracleError::ParseError(format!("unexpected balance value {}", other))),
  };
  let coins = Decimal::from_str(&text)
    .or_else(|_| Decimal::from_scientific(&text))
    .map_err(|e| OracleError::ParseError(format!("balance '{}': {}", text, e)))?;
  if coins.is_sign_negative() {
    return Err(OracleError::ParseError(format!("negative balance {}", coins)));
  }
  (coins * Decimal::from(units_per_coin))
    .trunc()
    .to_u128()
    .ok_or_else(|| OracleError::ParseError(format!("balance {} out of range", coins)))
}

fn flag_is_one(value: &Value) -> bool {
  match value {
    Value::Number(n) => n.as_u64() == Some(1),
    Value::String(s) => s.trim() == "1",
    Value::Bool(b) => *b,
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ADDR: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";

  #[test]
  fn test_mempool_subtracts_spent() {
    let body = r#"{"chain_stats":{"funded_txo_sum":5000,"spent_txo_sum":1200}}"#;
    assert_eq!(ResponseFormat::Mempool.parse(ADDR, body).unwrap(), 3800);
  }

  #[test]
  fn test_mempool_missing_stats_is_zero() {
    assert_eq!(ResponseFormat::Mempool.parse(ADDR, "{}").unwrap(), 0);
  }

  #[test]
  fn test_blockchain_info_keyed_by_address() {
    let body = format!(r#"{{"{}":{{"final_balance":42,"n_tx":1}}}}"#, ADDR);
    assert_eq!(ResponseFormat::BlockchainInfo.parse(ADDR, &body).unwrap(), 42);
  }

  #[test]
  fn test_blockchair_requires_data() {
    let err = ResponseFormat::Blockchair.parse(ADDR, r#"{"data":null}"#).unwrap_err();
    assert!(matches!(err, OracleError::InvalidResponse { .. }));

    let body = r#"{"data":{"0xabc":{"address":{"balance":"1000000000000000000"}}}}"#;
    assert_eq!(ResponseFormat::Blockchair.parse("0xABC", body).unwrap(), 1_000_000_000_000_000_000);
  }

  #[test]
  fn test_etherscan_status_flag() {
    let ok = r#"{"status":"1","message":"OK","result":"250"}"#;
    assert_eq!(ResponseFormat::Etherscan.parse(ADDR, ok).unwrap(), 250);

    let failed = r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#;
    assert!(ResponseFormat::Etherscan.parse(ADDR, failed).is_err());
  }

  #[test]
  fn test_dogechain_converts_whole_coins() {
    let body = r#"{"balance":"12.5","success":1}"#;
    assert_eq!(ResponseFormat::Dogechain.parse(ADDR, body).unwrap(), 1_250_000_000);

    let numeric = r#"{"balance":0.5,"success":1}"#;
    assert_eq!(ResponseFormat::Dogechain.parse(ADDR, numeric).unwrap(), 50_000_000);

    assert!(ResponseFormat::Dogechain.parse(ADDR, r#"{"success":0}"#).is_err());
  }

  #[test]
  fn test_plain_integer() {
    assert_eq!(ResponseFormat::PlainInteger.parse(ADDR, "150000000\n").unwrap(), 150_000_000);
    assert!(ResponseFormat::PlainInteger.parse(ADDR, "Checksum does not validate").is_err());
  }

  #[test]
  fn test_invalid_json_is_an_error() {
    assert!(matches!(
      ResponseFormat::Mempool.parse(ADDR, "<html>").unwrap_err(),
      OracleError::JsonParseFailed(_)
    ));
  }
}
