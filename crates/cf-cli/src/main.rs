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
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

mod commands;
use commands::{derive::DeriveCommand, run::RunCommand, stats::StatsCommand, wallets::WalletsCommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "cf")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Run the search loops until Ctrl-C
  Run(RunCommand),
  /// List the most recent wallets
  Wallets(WalletsCommand),
  /// Show per-coin statistics
  Stats(StatsCommand),
  /// Print the address and WIF for a private key
  Derive(DeriveCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
  // Load environment variables
  dotenv().ok();

  let cli = Cli::parse();

  // RUST_LOG wins over --verbose
  let log_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  match cli.command {
    Commands::Run(cmd) => commands::run::execute(cmd).await?,
    Commands::Wallets(cmd) => commands::wallets::execute(cmd).await?,
    Commands::Stats(cmd) => commands::stats::execute(cmd).await?,
    Commands::Derive(cmd) => commands::derive::execute(cmd)?,
  }

  Ok(())
}
