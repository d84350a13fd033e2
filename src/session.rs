use std::time::Duration;

use tendermint_rpc::{Client, HttpClient};
use tracing::{debug, info, warn};

use crate::chain::ChainDescriptor;
use crate::gas::GasPrice;
use crate::keys::Wallet;
use crate::{Error, Result};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How a session binds to its chain. The caller picks one explicitly.
#[derive(Debug, Clone)]
pub enum SessionStrategy {
    /// Bound to a registry entry: prefix and fallback gas price come from it.
    ChainAware(ChainDescriptor),
    /// Only an address prefix, no registry lookup.
    Generic { prefix: String },
}

impl SessionStrategy {
    pub fn prefix(&self) -> &str {
        match self {
            Self::ChainAware(chain) => &chain.bech32_prefix,
            Self::Generic { prefix } => prefix,
        }
    }

    fn gas_price(&self, configured: Option<&str>) -> Result<Option<GasPrice>> {
        let fallback = match self {
            Self::ChainAware(chain) => chain.gas_price.as_deref(),
            Self::Generic { .. } => None,
        };
        configured.or(fallback).map(str::parse::<GasPrice>).transpose()
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub gas_price: Option<String>,
    pub timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            gas_price: None,
            timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Live, authenticated connection to one node.
///
/// Dropping the session releases the connection; [`Session::close`] does the same explicitly.
#[derive(Debug)]
pub struct Session {
    endpoint: String,
    chain_id: String,
    prefix: String,
    wallet: Wallet,
    gas_price: Option<GasPrice>,
    client: Option<HttpClient>,
}

impl Session {
    pub async fn connect(
        strategy: SessionStrategy,
        endpoint: &str,
        wallet: Wallet,
        options: SessionOptions,
    ) -> Result<Self> {
        let gas_price = strategy.gas_price(options.gas_price.as_deref())?;

        let prefix = strategy.prefix().to_owned();
        if wallet.prefix() != prefix {
            return Err(Error::PrefixMismatch {
                wallet: wallet.prefix().into(),
                session: prefix,
            });
        }

        let client = HttpClient::new(endpoint)
            .map_err(|e| Error::Connection(format!("{endpoint}: {e}")))?;

        let status = tokio::time::timeout(options.timeout, client.status())
            .await
            .map_err(|_| {
                Error::Connection(format!("{endpoint}: no answer within {:?}", options.timeout))
            })?
            .map_err(|e| Error::Connection(format!("{endpoint}: {e}")))?;

        let chain_id = status.node_info.network.to_string();

        if let SessionStrategy::ChainAware(chain) = &strategy {
            if chain.chain_id != chain_id {
                warn!(
                    "[Session] {} registered as `{}` but node reports `{chain_id}`",
                    chain.name, chain.chain_id
                );
            }
        }

        info!(
            "[Session] connected to {endpoint} ({chain_id}) as {}",
            wallet.address()
        );

        Ok(Self {
            endpoint: endpoint.into(),
            chain_id,
            prefix,
            wallet,
            gas_price,
            client: Some(client),
        })
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn address(&self) -> &str {
        self.wallet.address()
    }

    pub fn gas_price(&self) -> Option<&GasPrice> {
        self.gas_price.as_ref()
    }

    pub(crate) fn rpc(&self) -> Result<&HttpClient> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::Connection(format!("{}: session closed", self.endpoint)))
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.client.take().is_some() {
            debug!("[Session] closed {}", self.endpoint);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
