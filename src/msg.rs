use cosmos_sdk_proto::cosmos::bank::v1beta1::MsgSend;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use cosmos_sdk_proto::cosmwasm::wasm::v1::MsgExecuteContract;
use prost_types::Any;
use serde_json::Value;

use crate::txs::to_any;
use crate::{Error, Result};

pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const MSG_EXECUTE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";

pub fn bank_send(from: &str, to: &str, amount: Vec<Coin>) -> Any {
    to_any(
        MSG_SEND_TYPE_URL,
        &MsgSend {
            from_address: from.into(),
            to_address: to.into(),
            amount,
        },
    )
}

pub fn execute_contract(sender: &str, contract: &str, msg: &Value, funds: Vec<Coin>) -> Result<Any> {
    Ok(to_any(
        MSG_EXECUTE_CONTRACT_TYPE_URL,
        &MsgExecuteContract {
            sender: sender.into(),
            contract: contract.into(),
            msg: serde_json::to_vec(msg).map_err(|e| Error::Broadcast(e.to_string()))?,
            funds,
        },
    ))
}
