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

use anyhow::{Context, Result};
use cf_core::{CandidateKey, CoinType};
use cf_keys::AddressDeriver;
use clap::Args;

#[derive(Args, Debug)]
pub struct DeriveCommand {
  /// Target chain (btc, eth or doge)
  #[arg(short, long)]
  coin: CoinType,

  /// Private key as 64 hex characters
  #[arg(short, long)]
  key: String,
}

pub fn execute(cmd: DeriveCommand) -> Result<()> {
  let (address, wif) = derive(cmd.coin, &cmd.key)?;
  println!("Address: {}", address);
  if let Some(wif) = wif {
    println!("WIF:     {}", wif);
  }
  Ok(())
}

fn derive(coin: CoinType, key_hex: &str) -> Result<(String, Option<String>)> {
  let trimmed = key_hex.trim().trim_start_matches("0x");
  let bytes = hex::decode(trimmed).context("Private key is not valid hex")?;
  let key = CandidateKey::from_slice(&bytes)?;

  let deriver = AddressDeriver::new();
  Ok((deriver.derive(&key, coin)?, deriver.wif(&key, coin)?))
}

#[cfg(test)]
mod tests {
  use super::*;

  const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

  #[test]
  fn test_derive_btc_key_one() {
    let (address, wif) = derive(CoinType::Btc, KEY_ONE).unwrap();
    assert_eq!(address, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    assert_eq!(wif.as_deref(), Some("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"));
  }

  #[test]
  fn test_derive_eth_has_no_wif() {
    let (address, wif) = derive(CoinType::Eth, &format!("0x{}", KEY_ONE)).unwrap();
    assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    assert!(wif.is_none());
  }

  #[test]
  fn test_rejects_bad_input() {
    assert!(derive(CoinType::Btc, "zz").is_err());
    assert!(derive(CoinType::Btc, "abcd").is_err());
    assert!(derive(CoinType::Btc, &"0".repeat(64)).is_err());
  }
}
