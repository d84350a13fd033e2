use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub name: String,
    pub chain_id: String,
    pub bech32_prefix: String,
    pub denom: String,

    /// BIP-44 coin type, `m/44'/{slip44}'/0'/0/0`.
    #[serde(default = "default_slip44")]
    pub slip44: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpc_endpoints: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rest_endpoints: Vec<String>,
}

fn default_slip44() -> u64 {
    crate::keys::COSMOS_COIN_TYPE
}

/// Static, read-only table of known chains.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<ChainDescriptor>,
}

impl ChainRegistry {
    pub fn embedded() -> Result<Self> {
        Self::from_yaml_str(crate::CHAIN_DATA)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let chains: Vec<ChainDescriptor> =
            serde_yaml::from_str(data).map_err(|e| Error::Registry(e.to_string()))?;
        Ok(Self { chains })
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let chains = crate::utils::read_data_from_yaml(path)?;
        debug!("loaded chain registry from {path}");
        Ok(Self { chains })
    }

    pub fn resolve(&self, name: &str) -> Result<&ChainDescriptor> {
        self.chains
            .iter()
            .find(|chain| chain.name == name)
            .ok_or_else(|| Error::ChainNotFound(name.into()))
    }

    pub fn chains(&self) -> &[ChainDescriptor] {
        &self.chains
    }
}
