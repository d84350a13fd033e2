use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use serde::Serialize;

use crate::{
    broadcast::DEFAULT_GAS_LIMIT,
    chain::ChainRegistry,
    config::{Config, DEFAULT_CHAIN_NAME, DEFAULT_CHAIN_PREFIX, DEFAULT_RPC_ENDPOINT},
    keys::SecretPhrase,
    pipeline::{self, Mode},
    query::Request,
    utils::validate_address,
};

/// The phrase is only read from the environment (or `.env`), never from argv.
pub const MNEMONIC_VAR: &str = "MNEMONIC";

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, global = true, env = "CHAIN_NAME", default_value = DEFAULT_CHAIN_NAME)]
    pub chain_name: String,
    #[arg(long, global = true, env = "CHAIN_PREFIX", default_value = DEFAULT_CHAIN_PREFIX)]
    pub chain_prefix: String,
    /// Falls back to the registry price in chain mode.
    #[arg(long, global = true, env = "DEFAULT_GAS_PRICE")]
    pub gas_price: Option<String>,
    #[arg(long, global = true, env = "RPC_ENDPOINT", default_value = DEFAULT_RPC_ENDPOINT)]
    pub rpc_endpoint: String,
    /// Seconds to wait for the node handshake.
    #[arg(long, global = true, env = "CONNECT_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,
    /// YAML chain registry replacing the built-in one.
    #[arg(long, global = true, env = "CHAIN_REGISTRY")]
    pub registry: Option<String>,
}

impl ConfigArgs {
    pub fn to_config(&self) -> anyhow::Result<Config> {
        let mnemonic = dotenvy::var(MNEMONIC_VAR)
            .ok()
            .filter(|phrase| !phrase.trim().is_empty())
            .with_context(|| format!("{MNEMONIC_VAR} is not set in the environment or .env"))?;
        Ok(self.config_with(SecretPhrase::new(mnemonic)))
    }

    fn config_with(&self, mnemonic: SecretPhrase) -> Config {
        Config {
            chain_name: self.chain_name.clone(),
            chain_prefix: self.chain_prefix.clone(),
            default_gas_price: self.gas_price.clone(),
            rpc_endpoint: self.rpc_endpoint.clone(),
            mnemonic,
            connect_timeout: Duration::from_secs(self.timeout),
        }
    }

    fn registry(&self) -> crate::Result<ChainRegistry> {
        match &self.registry {
            Some(path) => ChainRegistry::from_file(path),
            None => ChainRegistry::embedded(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// All balances of an address, the wallet's own by default.
    Balances {
        address: Option<String>,
        #[arg(long, value_enum, default_value_t = Mode::Generic)]
        mode: Mode,
    },
    /// Smart query against a CosmWasm contract.
    Contract {
        contract: String,
        #[arg(value_parser = parse_json)]
        query: serde_json::Value,
        #[arg(long, value_enum, default_value_t = Mode::Generic)]
        mode: Mode,
    },
    /// Execute a CosmWasm contract message.
    Execute {
        contract: String,
        #[arg(value_parser = parse_json)]
        msg: serde_json::Value,
        #[arg(long, value_parser = parse_coin)]
        funds: Vec<Coin>,
        #[arg(long, default_value_t = DEFAULT_GAS_LIMIT)]
        gas: u64,
        #[arg(long, default_value = "")]
        memo: String,
        #[arg(long, value_enum, default_value_t = Mode::Generic)]
        mode: Mode,
    },
    /// Send tokens from the wallet with a bank transfer.
    Send {
        to: String,
        /// One or more `<amount><denom>` coins.
        #[arg(required = true, value_parser = parse_coin)]
        amount: Vec<Coin>,
        #[arg(long, default_value_t = DEFAULT_GAS_LIMIT)]
        gas: u64,
        #[arg(long, default_value = "")]
        memo: String,
        #[arg(long, value_enum, default_value_t = Mode::Generic)]
        mode: Mode,
    },
    /// Print the wallet address.
    Address {
        #[arg(long, value_enum, default_value_t = Mode::Generic)]
        mode: Mode,
    },
    /// List the chains in the registry.
    Chains,
}

fn parse_json(s: &str) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(s)?)
}

/// `<amount><denom>`, e.g. `100uosmo`.
pub fn parse_coin(coin_str: &str) -> anyhow::Result<Coin> {
    let amount = coin_str
        .chars()
        .take_while(|x| x.is_ascii_digit())
        .collect::<String>();
    let denom = coin_str
        .chars()
        .skip_while(|x| x.is_ascii_digit())
        .collect::<String>();
    anyhow::ensure!(!amount.is_empty(), "coin `{coin_str}` has no amount");
    anyhow::ensure!(!denom.is_empty(), "coin `{coin_str}` has no denom");
    Ok(Coin { denom, amount })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

impl Args {
    pub async fn run(&self) -> anyhow::Result<()> {
        let registry = self.config.registry()?;

        match &self.command {
            Command::Chains => {
                print_json(&registry.chains())?;
            }
            Command::Address { mode } => {
                let config = self.config.to_config()?;
                let (_, wallet) = pipeline::derive_identity(&config, &registry, *mode)?;
                println!("{}", wallet.address());
            }
            Command::Balances { address, mode } => {
                let config = self.config.to_config()?;
                let result = pipeline::run_with(&config, &registry, *mode, |wallet| {
                    Request::AllBalances {
                        address: address.clone().unwrap_or_else(|| wallet.address().into()),
                    }
                })
                .await?;
                print_json(&result)?;
            }
            Command::Contract {
                contract,
                query,
                mode,
            } => {
                let config = self.config.to_config()?;
                let request = Request::ContractSmart {
                    contract: contract.clone(),
                    msg: query.clone(),
                };
                let result = pipeline::run(&config, &registry, *mode, request).await?;
                print_json(&result)?;
            }
            Command::Execute {
                contract,
                msg,
                funds,
                gas,
                memo,
                mode,
            } => {
                let config = self.config.to_config()?;
                let outcome = pipeline::submit(&config, &registry, *mode, *gas, memo, |wallet| {
                    Ok(vec![crate::msg::execute_contract(
                        wallet.address(),
                        contract,
                        msg,
                        funds.clone(),
                    )?])
                })
                .await?;
                print_json(&outcome)?;
            }
            Command::Send {
                to,
                amount,
                gas,
                memo,
                mode,
            } => {
                let config = self.config.to_config()?;
                let outcome = pipeline::submit(&config, &registry, *mode, *gas, memo, |wallet| {
                    validate_address(to, wallet.prefix())?;
                    Ok(vec![crate::msg::bank_send(wallet.address(), to, amount.clone())])
                })
                .await?;
                print_json(&outcome)?;
            }
        }
        Ok(())
    }
}
