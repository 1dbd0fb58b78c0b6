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
use cf_core::{CoinType, FinderConfig, StatsRecord};
use cf_finder::FinderService;
use clap::Args;

use super::open_store;

#[derive(Args, Debug)]
pub struct StatsCommand {
  /// Only this coin (btc, eth or doge)
  #[arg(short, long)]
  coin: Option<CoinType>,
}

pub async fn execute(cmd: StatsCommand) -> Result<()> {
  let config = FinderConfig::from_env()?;
  let service = FinderService::new(&config, open_store(&config).await?)?;

  let stats = match cmd.coin {
    Some(coin) => vec![service.get_stats(coin).await?],
    None => service.all_stats().await?,
  };

  println!("📊 Wallet Statistics");
  println!("====================");
  for record in &stats {
    print_stats(record);
  }

  service.shutdown().await?;
  Ok(())
}

fn print_stats(stats: &StatsRecord) {
  println!("{}", stats.coin_type);
  println!("  Wallets checked: {}", stats.total_wallets);
  println!("  Total balance:   {}", stats.total_balance);
  if stats.total_wallets > 0 {
    println!("  Max balance:     {}", stats.max_balance);
    println!("  Min balance:     {}", stats.min_balance);
    println!("  Since:           {}", stats.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Last update:     {}", stats.updated_at.format("%Y-%m-%d %H:%M:%S"));
  }
}
