//! Chain identifiers and transient key material.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoinType {
  Btc,
  Eth,
  Doge,
}

impl CoinType {
  pub const ALL: [CoinType; 3] = [CoinType::Btc, CoinType::Eth, CoinType::Doge];

  pub fn symbol(&self) -> &'static str {
    match self {
      CoinType::Btc => "BTC",
      CoinType::Eth => "ETH",
      CoinType::Doge => "DOGE",
    }
  }

  /// Number of decimal places between the smallest unit and the display unit.
  pub fn decimals(&self) -> u32 {
    match self {
      CoinType::Btc | CoinType::Doge => 8,
      CoinType::Eth => 18,
    }
  }
}

impl fmt::Display for CoinType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.symbol())
  }
}

impl FromStr for CoinType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "btc" | "bitcoin" => Ok(CoinType::Btc),
      "eth" | "ethereum" => Ok(CoinType::Eth),
      "doge" | "dogecoin" => Ok(CoinType::Doge),
      other => Err(Error::UnknownCoin(other.to_string())),
    }
  }
}

/// Raw private key produced by a strategy, not yet checked against any chain.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CandidateKey([u8; CandidateKey::WIDTH]);

impl CandidateKey {
  pub const WIDTH: usize = 32;

  pub fn from_bytes(bytes: [u8; Self::WIDTH]) -> Self {
    Self(bytes)
  }

  pub fn from_slice(bytes: &[u8]) -> Result<Self> {
    let fixed: [u8; Self::WIDTH] = bytes.try_into().map_err(|_| {
      Error::InvalidKey(format!("expected {} bytes, got {}", Self::WIDTH, bytes.len()))
    })?;
    Ok(Self(fixed))
  }

  pub fn as_bytes(&self) -> &[u8; Self::WIDTH] {
    &self.0
  }

  pub fn to_hex(&self) -> String {
    self.0.iter().map(|b| format!("{:02x}", b)).collect()
  }
}

// Key bytes never end up in logs.
impl fmt::Debug for CandidateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("CandidateKey(..)")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_coin_type_parse() {
    assert_eq!("btc".parse::<CoinType>().unwrap(), CoinType::Btc);
    assert_eq!("Ethereum".parse::<CoinType>().unwrap(), CoinType::Eth);
    assert_eq!(" DOGE ".parse::<CoinType>().unwrap(), CoinType::Doge);
    assert!(matches!("ltc".parse::<CoinType>(), Err(Error::UnknownCoin(_))));
  }

  #[test]
  fn test_coin_type_serde_uses_symbol() {
    assert_eq!(serde_json::to_string(&CoinType::Doge).unwrap(), "\"DOGE\"");
    let parsed: CoinType = serde_json::from_str("\"ETH\"").unwrap();
    assert_eq!(parsed, CoinType::Eth);
  }

  #[test]
  fn test_decimals() {
    assert_eq!(CoinType::Btc.decimals(), 8);
    assert_eq!(CoinType::Eth.decimals(), 18);
    assert_eq!(CoinType::Doge.decimals(), 8);
  }

  #[test]
  fn test_candidate_key_width_is_enforced() {
    assert!(CandidateKey::from_slice(&[1u8; 31]).is_err());
    let key = CandidateKey::from_slice(&[0xab; 32]).unwrap();
    assert_eq!(key.to_hex(), "ab".repeat(32));
    assert_eq!(format!("{:?}", key), "CandidateKey(..)");
  }
}
