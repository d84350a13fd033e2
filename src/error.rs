use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("chain `{0}` not found in registry")]
    ChainNotFound(String),

    /// Never carries the phrase itself, only what was wrong with it.
    #[error("invalid secret phrase: {0}")]
    InvalidSecretPhrase(String),

    #[error("invalid address prefix `{0}`")]
    InvalidPrefix(String),

    #[error("wallet prefix `{wallet}` does not match session prefix `{session}`")]
    PrefixMismatch { wallet: String, session: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid gas policy `{input}`: {reason}")]
    InvalidGasPolicy { input: String, reason: String },

    #[error("query error: {0}")]
    Query(String),

    #[error("broadcast error: {0}")]
    Broadcast(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("key derivation error: {0}")]
    Derivation(String),
}

impl Error {
    pub(crate) fn gas(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidGasPolicy {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
