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

pub mod derive;
pub mod run;
pub mod stats;
pub mod wallets;

use anyhow::{Context, Result};
use cf_core::{FinderConfig, MemoryStore, WalletStore};
use cf_database_postgres::DatabaseContext;
use std::sync::Arc;
use tracing::{info, warn};

/// PostgreSQL when `DATABASE_URL` is set, otherwise a process-local store.
pub async fn open_store(config: &FinderConfig) -> Result<Arc<dyn WalletStore>> {
  match &config.database_url {
    Some(url) => {
      let context = DatabaseContext::new(url).context("Failed to open the wallet database")?;
      context.migrate().await.context("Failed to migrate the wallet database")?;
      info!("Using PostgreSQL wallet store");
      Ok(Arc::new(context.wallet_store()))
    }
    None => {
      warn!("DATABASE_URL not set, wallets are kept in memory and lost on exit");
      Ok(Arc::new(MemoryStore::new()))
    }
  }
}
