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
use cf_core::{CoinType, FinderConfig, FinderEvent};
use cf_finder::FinderService;
use clap::Args;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::open_store;

#[derive(Args, Debug)]
pub struct RunCommand {
  /// Coins to search, comma separated
  #[arg(short, long, default_value = "btc,eth,doge")]
  coins: String,

  /// Strategy selection: a comma separated list of random, brain, pattern, range, lost or `all`
  #[arg(short, long, default_value = "all")]
  strategies: String,
}

pub async fn execute(cmd: RunCommand) -> Result<()> {
  let config = FinderConfig::from_env()?;
  let coins = parse_coins(&cmd.coins)?;

  let store = open_store(&config).await?;
  let service = FinderService::new(&config, store)?;
  let mut events = service.subscribe();

  for coin in &coins {
    service.start(*coin, &cmd.strategies).await?;
  }
  info!("Searching {:?}, press Ctrl-C to stop", coins);

  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);

  loop {
    tokio::select! {
      result = &mut ctrl_c => {
        result?;
        info!("Interrupted, shutting down");
        break;
      }
      event = events.recv() => match event {
        Some(FinderEvent::WalletFound { wallet }) if wallet.balance > Decimal::ZERO => {
          info!("💰 {} {} holds {} ({} via {})", wallet.coin_type, wallet.address, wallet.balance, wallet.strategy, wallet.provider);
        }
        Some(FinderEvent::WalletFound { wallet }) => debug!("{} {} is empty", wallet.coin_type, wallet.address),
        Some(FinderEvent::StatsUpdate { stats }) => {
          debug!("{} totals: {} wallets, {} balance", stats.coin_type, stats.total_wallets, stats.total_balance)
        }
        None => break,
      },
    }
  }

  service.unsubscribe(events.id());
  service.shutdown().await?;
  Ok(())
}

fn parse_coins(raw: &str) -> Result<Vec<CoinType>> {
  let mut coins = Vec::new();
  for name in raw.split(',').filter(|name| !name.trim().is_empty()) {
    let coin: CoinType = name.parse()?;
    if !coins.contains(&coin) {
      coins.push(coin);
    }
  }
  anyhow::ensure!(!coins.is_empty(), "No coins selected");
  Ok(coins)
}
