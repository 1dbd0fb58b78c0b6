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

use anyhow::Result;
use cf_core::FinderConfig;
use cf_finder::FinderService;
use clap::Args;

use super::open_store;

#[derive(Args, Debug)]
pub struct WalletsCommand {
  /// Number of wallets to show, capped by CF_WALLET_LIMIT_MAX
  #[arg(short, long, default_value = "20")]
  limit: usize,
}

pub async fn execute(cmd: WalletsCommand) -> Result<()> {
  let config = FinderConfig::from_env()?;
  let service = FinderService::new(&config, open_store(&config).await?)?;

  let wallets = service.get_wallets(cmd.limit).await?;
  if wallets.is_empty() {
    println!("No wallets recorded yet");
  } else {
    println!("{:<5} {:<44} {:>24} {:<8} {:<10} {}", "COIN", "ADDRESS", "BALANCE", "STRATEGY", "PROVIDER", "FOUND");
    for wallet in &wallets {
      println!(
        "{:<5} {:<44} {:>24} {:<8} {:<10} {}",
        wallet.coin_type,
        wallet.address,
        wallet.balance,
        wallet.strategy,
        wallet.provider,
        wallet.created_at.format("%Y-%m-%d %H:%M:%S")
      );
    }
  }

  service.shutdown().await?;
  Ok(())
}
