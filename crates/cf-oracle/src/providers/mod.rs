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

//! Balance provider implementations and the default provider table per coin.

mod format;

pub use format::ResponseFormat;

use async_trait::async_trait;
use cf_core::CoinType;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::{OracleError, OracleResult};
use crate::traits::{BalanceProvider, ProviderLimits};

/// Placeholder substituted with the address in URL templates.
pub const ADDRESS_PLACEHOLDER: &str = "{address}";

/// A provider reached with one HTTP GET per lookup.
#[derive(Debug, Clone)]
pub struct HttpProvider {
  id: String,
  url_template: String,
  format: ResponseFormat,
  limits: ProviderLimits,
  primary: bool,
}

impl HttpProvider {
  pub fn new(id: impl Into<String>, url_template: impl Into<String>, format: ResponseFormat) -> Self {
    Self {
      id: id.into(),
      url_template: url_template.into(),
      format,
      limits: ProviderLimits::default(),
      primary: false,
    }
  }

  pub fn with_limits(mut self, limits: ProviderLimits) -> Self {
    self.limits = limits;
    self
  }

  pub fn primary(mut self) -> Self {
    self.primary = true;
    self
  }

  pub fn url_for(&self, address: &str) -> String {
    self.url_template.replace(ADDRESS_PLACEHOLDER, address)
  }
}

#[async_trait]
impl BalanceProvider for HttpProvider {
  fn id(&self) -> &str {
    &self.id
  }

  fn limits(&self) -> ProviderLimits {
    self.limits
  }

  fn is_primary(&self) -> bool {
    self.primary
  }

  async fn fetch_balance(&self, client: &Client, address: &str) -> OracleResult<u128> {
    let url = self.url_for(address);
    debug!("Querying {} for {}", self.id, address);

    let response = client.get(&url).send().await?;

    if response.status().as_u16() == 429 {
      return Err(OracleError::RateLimitExceeded(self.id.clone()));
    }

    if !response.status().is_success() {
      return Err(OracleError::Status { provider: self.id.clone(), status: response.status().as_u16() });
    }

    let body = response.text().await?;
    self.format.parse(address, &body)
  }
}

/// Settings that shape the default provider tables.
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
  pub etherscan_api_key: Option<String>,
}

fn limits(interval_ms: u64, per_minute: u32) -> ProviderLimits {
  ProviderLimits::new(Duration::from_millis(interval_ms), per_minute)
}

fn etherscan_url(options: &ProviderOptions) -> String {
  let mut url =
    "https://api.etherscan.io/api?module=account&action=balance&address={address}&tag=latest".to_string();
  if let Some(key) = &options.etherscan_api_key {
    url.push_str("&apikey=");
    url.push_str(key);
  }
  url
}

/// Public endpoints queried for `coin`, primary first.
pub fn default_providers(coin: CoinType, options: &ProviderOptions) -> Vec<Arc<dyn BalanceProvider>> {
  let providers = match coin {
    CoinType::Btc => vec![
      HttpProvider::new("mempool", "https://mempool.space/api/address/{address}", ResponseFormat::Mempool)
        .with_limits(limits(1_000, 60))
        .primary(),
      HttpProvider::new(
        "blockchain",
        "https://blockchain.info/balance?active={address}",
        ResponseFormat::BlockchainInfo,
      )
      .with_limits(limits(10_000, 6)),
      HttpProvider::new(
        "blockchair",
        "https://api.blockchair.com/bitcoin/dashboards/address/{address}",
        ResponseFormat::Blockchair,
      )
      .with_limits(limits(2_000, 30)),
      HttpProvider::new(
        "blockchain-plain",
        "https://blockchain.info/q/addressbalance/{address}",
        ResponseFormat::PlainInteger,
      )
      .with_limits(limits(10_000, 6)),
    ],
    CoinType::Eth => vec![
      HttpProvider::new("etherscan", etherscan_url(options), ResponseFormat::Etherscan)
        .with_limits(limits(250, 100))
        .primary(),
      HttpProvider::new(
        "blockchair",
        "https://api.blockchair.com/ethereum/dashboards/address/{address}",
        ResponseFormat::Blockchair,
      )
      .with_limits(limits(2_000, 30)),
    ],
    CoinType::Doge => vec![
      HttpProvider::new(
        "dogechain",
        "https://dogechain.info/api/v1/address/balance/{address}",
        ResponseFormat::Dogechain,
      )
      .with_limits(limits(1_000, 60))
      .primary(),
      HttpProvider::new(
        "blockchair",
        "https://api.blockchair.com/dogecoin/dashboards/address/{address}",
        ResponseFormat::Blockchair,
      )
      .with_limits(limits(2_000, 30)),
    ],
  };

  providers.into_iter().map(|p| Arc::new(p) as Arc<dyn BalanceProvider>).collect()
}
