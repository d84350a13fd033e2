use bech32::Hrp;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

pub fn parse_hrp(prefix: &str) -> Result<Hrp> {
    if prefix.is_empty() {
        return Err(Error::InvalidPrefix(prefix.into()));
    }
    Hrp::parse(prefix).map_err(|_| Error::InvalidPrefix(prefix.into()))
}

/// Checks that `address` is a bech32 account address carrying `prefix`.
pub fn validate_address(address: &str, prefix: &str) -> Result<()> {
    let (hrp, bytes) = bech32::decode(address)
        .map_err(|e| Error::Query(format!("malformed address `{address}`: {e}")))?;
    if hrp.as_str() != prefix {
        return Err(Error::Query(format!(
            "address `{address}` has prefix `{hrp}`, expected `{prefix}`"
        )));
    }
    // 20 bytes for secp256k1 accounts, 32 for contracts and module accounts
    if bytes.is_empty() || bytes.len() > 32 {
        return Err(Error::Query(format!(
            "address `{address}` has invalid length {}",
            bytes.len()
        )));
    }
    Ok(())
}

pub fn read_data_from_yaml<T>(path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let file = std::fs::File::open(path).map_err(|e| Error::Registry(format!("{path}: {e}")))?;
    let reader = std::io::BufReader::new(file);
    serde_yaml::from_reader(reader).map_err(|e| Error::Registry(format!("{path}: {e}")))
}
