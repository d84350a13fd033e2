use prost::Message;
use prost_types::Any;
use serde::Serialize;
use tendermint_rpc::Client;
use tracing::info;

use crate::session::Session;
use crate::txs::{generate_auth_info, generate_sign_doc, generate_tx_body, sign_transaction};
use crate::{Error, Result};

pub const DEFAULT_GAS_LIMIT: u64 = 400_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutcome {
    pub hash: String,
    pub code: u32,
    pub log: String,
}

/// Signs `msgs` with the session wallet and submits them with `broadcast_tx_sync`.
pub async fn sign_and_broadcast(
    session: &Session,
    msgs: Vec<Any>,
    gas_limit: u64,
    memo: &str,
) -> Result<TxOutcome> {
    let gas_price = session.gas_price().ok_or_else(|| Error::InvalidGasPolicy {
        input: String::new(),
        reason: "no gas price configured for this session".into(),
    })?;
    let fee = gas_price.fee_for(gas_limit)?;

    let account = crate::query::get_account(session, session.address()).await?;

    let body = generate_tx_body(msgs, memo);
    let auth_info = generate_auth_info(
        session.wallet().public_key(),
        account.sequence,
        gas_limit,
        fee,
    );
    let sign_doc = generate_sign_doc(&body, &auth_info, session.chain_id(), account.account_number);
    let tx = sign_transaction(sign_doc, session.wallet())?;

    let resp = session
        .rpc()?
        .broadcast_tx_sync(tx.encode_to_vec())
        .await
        .map_err(|e| Error::Broadcast(e.to_string()))?;

    let outcome = TxOutcome {
        hash: resp.hash.to_string(),
        code: resp.code.value(),
        log: resp.log,
    };

    if resp.code.is_err() {
        return Err(Error::Broadcast(format!(
            "tx {} rejected with code {}: {}",
            outcome.hash, outcome.code, outcome.log
        )));
    }

    info!("[Broadcast] {} accepted into mempool", outcome.hash);

    Ok(outcome)
}
