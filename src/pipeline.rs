use std::fmt;

use prost_types::Any;
use tracing::debug;

use crate::broadcast::TxOutcome;
use crate::chain::ChainRegistry;
use crate::config::Config;
use crate::keys::Wallet;
use crate::query::{QueryResult, Request};
use crate::session::{Session, SessionOptions, SessionStrategy};
use crate::{Error, Result};

/// Which construction path to take: through the chain registry or from the prefix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    Chain,
    #[default]
    Generic,
}

/// Per-run progress. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unresolved,
    IdentityReady,
    SessionOpen,
    QueryIssued,
    Completed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

fn enter(stage: Stage) {
    debug!("[Pipeline] -> {stage}");
}

/// Resolves the chain (chain mode only) and derives the wallet.
pub fn derive_identity(
    config: &Config,
    registry: &ChainRegistry,
    mode: Mode,
) -> Result<(SessionStrategy, Wallet)> {
    enter(Stage::Unresolved);
    let credentials = config.credentials();
    let (strategy, wallet) = match mode {
        Mode::Chain => {
            let chain = registry.resolve(&config.chain_name)?.clone();
            if credentials.prefix != chain.bech32_prefix {
                return Err(Error::PrefixMismatch {
                    wallet: credentials.prefix,
                    session: chain.bech32_prefix,
                });
            }
            let wallet = Wallet::for_chain(&credentials.phrase, &chain)?;
            (SessionStrategy::ChainAware(chain), wallet)
        }
        Mode::Generic => {
            let wallet = Wallet::from_mnemonic(&credentials.phrase, &credentials.prefix)?;
            (
                SessionStrategy::Generic {
                    prefix: credentials.prefix,
                },
                wallet,
            )
        }
    };
    enter(Stage::IdentityReady);
    Ok((strategy, wallet))
}

pub async fn open_session(config: &Config, strategy: SessionStrategy, wallet: Wallet) -> Result<Session> {
    let options = SessionOptions {
        gas_price: config.default_gas_price.clone(),
        timeout: config.connect_timeout,
    };
    let session = Session::connect(strategy, &config.rpc_endpoint, wallet, options).await?;
    enter(Stage::SessionOpen);
    Ok(session)
}

fn finish<T>(outcome: Result<T>) -> Result<T> {
    enter(if outcome.is_ok() { Stage::Completed } else { Stage::Failed });
    outcome
}

/// Full run: identity, session, one request. The session is closed on every path.
pub async fn run(config: &Config, registry: &ChainRegistry, mode: Mode, request: Request) -> Result<QueryResult> {
    run_with(config, registry, mode, |_| request).await
}

/// Like [`run`], with the request built from the derived wallet.
pub async fn run_with<F>(config: &Config, registry: &ChainRegistry, mode: Mode, request: F) -> Result<QueryResult>
where
    F: FnOnce(&Wallet) -> Request,
{
    let outcome = async {
        let (strategy, wallet) = derive_identity(config, registry, mode)?;
        let request = request(&wallet);
        let session = open_session(config, strategy, wallet).await?;
        enter(Stage::QueryIssued);
        let result = crate::query::execute(&session, &request).await;
        session.close();
        result
    }
    .await;
    finish(outcome)
}

/// Signs and broadcasts messages built from the derived wallet.
pub async fn submit<F>(
    config: &Config,
    registry: &ChainRegistry,
    mode: Mode,
    gas_limit: u64,
    memo: &str,
    msgs: F,
) -> Result<TxOutcome>
where
    F: FnOnce(&Wallet) -> Result<Vec<Any>>,
{
    let outcome = async {
        let (strategy, wallet) = derive_identity(config, registry, mode)?;
        let msgs = msgs(&wallet)?;
        let session = open_session(config, strategy, wallet).await?;
        enter(Stage::QueryIssued);
        let result = crate::broadcast::sign_and_broadcast(&session, msgs, gas_limit, memo).await;
        session.close();
        result
    }
    .await;
    finish(outcome)
}
