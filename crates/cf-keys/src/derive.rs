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

//! Deterministic private key → address derivation.
//!
//! Base58 chains follow the P2PKH recipe:
//!
//! 1. compressed secp256k1 public key
//! 2. `RIPEMD160(SHA256(pubkey))`
//! 3. one-byte network version prefix
//! 4. first four bytes of `SHA256(SHA256(versioned))` as checksum
//! 5. base58 over `versioned || checksum`
//!
//! Ethereum takes Keccak-256 of the uncompressed key (without its `0x04` tag),
//! keeps the last 20 bytes and renders them with the EIP-55 mixed-case checksum.

use crate::error::KeyResult;
use cf_core::{CandidateKey, CoinType};
use ripemd::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey, SignOnly};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// How a chain turns a public key into an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScheme {
  Base58Check { version: u8 },
  Eip55,
}

impl AddressScheme {
  pub fn for_coin(coin: CoinType) -> Self {
    match coin {
      CoinType::Btc => AddressScheme::Base58Check { version: 0x00 },
      CoinType::Doge => AddressScheme::Base58Check { version: 0x1e },
      CoinType::Eth => AddressScheme::Eip55,
    }
  }
}

/// WIF version byte, for chains that have a WIF form.
pub fn wif_version(coin: CoinType) -> Option<u8> {
  match coin {
    CoinType::Btc => Some(0x80),
    CoinType::Doge => Some(0x9e),
    CoinType::Eth => None,
  }
}

/// Pure derivation collaborator shared by strategies and schedulers.
pub struct AddressDeriver {
  secp: Secp256k1<SignOnly>,
}

impl AddressDeriver {
  pub fn new() -> Self {
    Self { secp: Secp256k1::signing_only() }
  }

  pub fn secret_key(&self, key: &CandidateKey) -> KeyResult<SecretKey> {
    Ok(SecretKey::from_slice(key.as_bytes())?)
  }

  pub fn public_key(&self, key: &CandidateKey) -> KeyResult<PublicKey> {
    let secret = self.secret_key(key)?;
    Ok(PublicKey::from_secret_key(&self.secp, &secret))
  }

  /// Address of `key` on `coin`. Fails only for keys outside the curve order.
  pub fn derive(&self, key: &CandidateKey, coin: CoinType) -> KeyResult<String> {
    let public = self.public_key(key)?;
    let address = match AddressScheme::for_coin(coin) {
      AddressScheme::Base58Check { version } => {
        base58check(version, &hash160(&public.serialize()), &[])
      }
      AddressScheme::Eip55 => eip55_address(&public.serialize_uncompressed()),
    };
    Ok(address)
  }

  /// Compressed-key WIF encoding, `None` for chains without one.
  pub fn wif(&self, key: &CandidateKey, coin: CoinType) -> KeyResult<Option<String>> {
    // Validates the key even when no WIF form exists.
    self.secret_key(key)?;
    Ok(wif_version(coin).map(|version| base58check(version, key.as_bytes(), &[0x01])))
  }
}

impl Default for AddressDeriver {
  fn default() -> Self {
    Self::new()
  }
}

/// True when the bytes form a usable secp256k1 secret (non-zero, below the order).
pub fn is_valid_key(key: &CandidateKey) -> bool {
  SecretKey::from_slice(key.as_bytes()).is_ok()
}

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
  let sha = Sha256::digest(data);
  let ripemd = Ripemd160::digest(sha);
  let mut result = [0u8; 20];
  result.copy_from_slice(&ripemd);
  result
}

fn checksum(data: &[u8]) -> [u8; 4] {
  let digest = Sha256::digest(Sha256::digest(data));
  let mut result = [0u8; 4];
  result.copy_from_slice(&digest[..4]);
  result
}

/// Base58 of `version || payload || suffix || checksum`.
pub fn base58check(version: u8, payload: &[u8], suffix: &[u8]) -> String {
  let mut data = Vec::with_capacity(1 + payload.len() + suffix.len() + 4);
  data.push(version);
  data.extend_from_slice(payload);
  data.extend_from_slice(suffix);
  let check = checksum(&data);
  data.extend_from_slice(&check);
  bs58::encode(data).into_string()
}

/// EIP-55 address from a 65-byte uncompressed public key.
pub fn eip55_address(uncompressed: &[u8; 65]) -> String {
  let digest = Keccak256::digest(&uncompressed[1..]);
  let lower = hex::encode(&digest[12..]);
  let checksum = Keccak256::digest(lower.as_bytes());

  let mut address = String::with_capacity(42);
  address.push_str("0x");
  for (i, c) in lower.chars().enumerate() {
    let nibble = if i % 2 == 0 { checksum[i / 2] >> 4 } else { checksum[i / 2] & 0x0f };
    if c.is_ascii_alphabetic() && nibble >= 8 {
      address.push(c.to_ascii_uppercase());
    } else {
      address.push(c);
    }
  }
  address
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key_one() -> CandidateKey {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    CandidateKey::from_bytes(bytes)
  }

  #[test]
  fn test_checksum_is_four_bytes_of_double_sha() {
    let data = b"hello";
    let expected = Sha256::digest(Sha256::digest(data));
    assert_eq!(checksum(data), expected[..4]);
  }

  #[test]
  fn test_zero_key_rejected() {
    let deriver = AddressDeriver::new();
    let zero = CandidateKey::from_bytes([0u8; 32]);
    assert!(!is_valid_key(&zero));
    assert!(deriver.derive(&zero, CoinType::Btc).is_err());
  }

  #[test]
  fn test_key_above_curve_order_rejected() {
    let key = CandidateKey::from_bytes([0xff; 32]);
    assert!(!is_valid_key(&key));
  }

  #[test]
  fn test_eth_has_no_wif() {
    let deriver = AddressDeriver::new();
    assert_eq!(deriver.wif(&key_one(), CoinType::Eth).unwrap(), None);
  }

  #[test]
  fn test_doge_version_prefix() {
    let deriver = AddressDeriver::new();
    let address = deriver.derive(&key_one(), CoinType::Doge).unwrap();
    assert!(address.starts_with('D'));
    assert_eq!(address.len(), 34);
  }
}
