use std::time::Duration;

use crate::keys::SecretPhrase;

pub const DEFAULT_CHAIN_NAME: &str = "osmosis";
pub const DEFAULT_CHAIN_PREFIX: &str = "osmo";
pub const DEFAULT_GAS_PRICE: &str = "0.025uosmo";
pub const DEFAULT_RPC_ENDPOINT: &str = "https://rpc-test.osmosis.zone";

/// Run configuration, built once at startup and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub chain_name: String,
    pub chain_prefix: String,
    /// Unset means: registry price in chain mode, none in generic mode.
    pub default_gas_price: Option<String>,
    pub rpc_endpoint: String,
    pub mnemonic: SecretPhrase,
    pub connect_timeout: Duration,
}

/// Phrase and prefix an identity is derived from.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub phrase: SecretPhrase,
    pub prefix: String,
}

impl Config {
    pub fn new(mnemonic: SecretPhrase) -> Self {
        Self {
            chain_name: DEFAULT_CHAIN_NAME.into(),
            chain_prefix: DEFAULT_CHAIN_PREFIX.into(),
            default_gas_price: Some(DEFAULT_GAS_PRICE.into()),
            rpc_endpoint: DEFAULT_RPC_ENDPOINT.into(),
            mnemonic,
            connect_timeout: crate::session::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            phrase: self.mnemonic.clone(),
            prefix: self.chain_prefix.clone(),
        }
    }
}
