use std::fmt;
use std::str::FromStr;

use bip32::secp256k1::ecdsa::{signature::Signer, Signature, SigningKey, VerifyingKey};
use bip32::{DerivationPath, PublicKey, XPrv};
use bech32::Bech32;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::chain::ChainDescriptor;
use crate::{Error, Result};

// https://iancoleman.io/bip39

pub const COSMOS_COIN_TYPE: u64 = 118;

/// A BIP-39 recovery phrase. Formatting never reveals the words.
#[derive(Clone)]
pub struct SecretPhrase(String);

impl SecretPhrase {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretPhrase(<redacted>)")
    }
}

pub fn derivation_path(coin: u64) -> Result<DerivationPath> {
    DerivationPath::from_str(&format!("m/44'/{coin}'/0'/0/0"))
        .map_err(|e| Error::Derivation(e.to_string()))
}

pub fn key_from_mnemonic(phrase: &SecretPhrase, coin: u64) -> Result<XPrv> {
    let normalized = phrase.expose().split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(Error::InvalidSecretPhrase("phrase is empty".into()));
    }
    let mnemonic = bip39::Mnemonic::parse_in_normalized(bip39::Language::English, &normalized)
        .map_err(|e| Error::InvalidSecretPhrase(e.to_string()))?;
    let seed = mnemonic.to_seed("");

    XPrv::derive_from_path(seed, &derivation_path(coin)?)
        .map_err(|e| Error::Derivation(e.to_string()))
}

pub fn from_pk_to_bech32_address<K>(pub_key: &K, prefix: &str) -> Result<String>
where
    K: PublicKey,
{
    let pk_hash = {
        let mut hasher = Sha256::new();
        hasher.update(pub_key.to_bytes());
        hasher.finalize()
    };

    let rip_result = {
        let mut rip_hasher = Ripemd160::new();
        rip_hasher.update(pk_hash);
        rip_hasher.finalize()
    };

    bech32::encode::<Bech32>(crate::utils::parse_hrp(prefix)?, &rip_result)
        .map_err(|e| Error::Derivation(e.to_string()))
}

/// Signing identity derived from a recovery phrase.
pub struct Wallet {
    signing_key: SigningKey,
    address: String,
    prefix: String,
    coin_type: u64,
}

impl Wallet {
    /// Generic derivation: only the prefix is known, the Cosmos coin type is used.
    pub fn from_mnemonic(phrase: &SecretPhrase, prefix: &str) -> Result<Self> {
        Self::derive(phrase, prefix, COSMOS_COIN_TYPE)
    }

    /// Chain-aware derivation: prefix and coin type come from the descriptor.
    pub fn for_chain(phrase: &SecretPhrase, chain: &ChainDescriptor) -> Result<Self> {
        Self::derive(phrase, &chain.bech32_prefix, chain.slip44)
    }

    fn derive(phrase: &SecretPhrase, prefix: &str, coin_type: u64) -> Result<Self> {
        // validate the prefix before touching key material
        crate::utils::parse_hrp(prefix)?;
        let xprv = key_from_mnemonic(phrase, coin_type)?;
        let signing_key = xprv.private_key().clone();
        let address = from_pk_to_bech32_address(signing_key.verifying_key(), prefix)?;
        Ok(Self {
            signing_key,
            address,
            prefix: prefix.into(),
            coin_type,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn coin_type(&self) -> u64 {
        self.coin_type
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Compressed SEC1 public key.
    pub fn public_key(&self) -> [u8; 33] {
        PublicKey::to_bytes(self.verifying_key())
    }

    /// ECDSA over SHA-256 of `data`, as 64-byte `r || s`.
    pub fn sign(&self, data: &[u8]) -> Result<[u8; 64]> {
        let signature: Signature = self
            .signing_key
            .try_sign(data)
            .map_err(|e| Error::Derivation(e.to_string()))?;
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&signature.to_bytes());
        Ok(bytes)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("coin_type", &self.coin_type)
            .finish_non_exhaustive()
    }
}
