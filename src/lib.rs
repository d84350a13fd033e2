// https://github.com/cosmos/chain-registry

pub mod broadcast;
pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod gas;
pub mod keys;
pub mod msg;
pub mod pipeline;
pub mod query;
pub mod session;
pub mod txs;
pub mod utils;

pub use error::Error;

pub type Result<O> = std::result::Result<O, Error>;

pub const CHAIN_DATA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/chains.yaml"));
