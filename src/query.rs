use cosmos_sdk_proto::cosmos::auth::v1beta1::{BaseAccount, QueryAccountRequest, QueryAccountResponse};
use cosmos_sdk_proto::cosmos::bank::v1beta1::{QueryAllBalancesRequest, QueryAllBalancesResponse};
use cosmos_sdk_proto::cosmos::base::query::v1beta1::PageRequest;
use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    QuerySmartContractStateRequest, QuerySmartContractStateResponse,
};
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tendermint_rpc::{Client, HttpClient};
use tracing::{debug, info};

use crate::session::Session;
use crate::utils::validate_address;
use crate::{Error, Result};

pub const ALL_BALANCES_PATH: &str = "/cosmos.bank.v1beta1.Query/AllBalances";
pub const SMART_CONTRACT_STATE_PATH: &str = "/cosmwasm.wasm.v1.Query/SmartContractState";
pub const ACCOUNT_PATH: &str = "/cosmos.auth.v1beta1.Query/Account";

const BASE_ACCOUNT_TYPE_URL: &str = "/cosmos.auth.v1beta1.BaseAccount";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub denom: String,
    pub amount: String,
}

/// One read operation against a session.
#[derive(Debug, Clone)]
pub enum Request {
    AllBalances { address: String },
    ContractSmart { contract: String, msg: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Balances(Vec<Balance>),
    Contract(Value),
}

/// Runs `request` once. No retry, nothing kept between calls.
pub async fn execute(session: &Session, request: &Request) -> Result<QueryResult> {
    match request {
        Request::AllBalances { address } => {
            get_balances(session, address).await.map(QueryResult::Balances)
        }
        Request::ContractSmart { contract, msg } => query_contract_smart(session, contract, msg)
            .await
            .map(QueryResult::Contract),
    }
}

pub async fn perform_rpc_query<Q, R>(client: &HttpClient, path: &str, query: Q) -> Result<R>
where
    Q: Message,
    R: Message + Default,
{
    let resp = client
        .abci_query(Some(path.to_owned()), query.encode_to_vec(), None, false)
        .await
        .map_err(|e| Error::Query(format!("{path}: {e}")))?;

    if resp.code.is_err() {
        return Err(Error::Query(format!(
            "{path}: code {}: {}",
            resp.code.value(),
            resp.log
        )));
    }

    R::decode(resp.value.as_slice()).map_err(|e| Error::Query(format!("{path}: {e}")))
}

/// All balances of `address`, following pagination. An unknown account has none.
pub async fn get_balances(session: &Session, address: &str) -> Result<Vec<Balance>> {
    validate_address(address, session.prefix())?;
    let client = session.rpc()?;

    let mut balances = vec![];
    let mut next_key = vec![];
    loop {
        let q = QueryAllBalancesRequest {
            address: address.into(),
            pagination: (!next_key.is_empty()).then(|| PageRequest {
                key: next_key.clone(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let resp: QueryAllBalancesResponse = perform_rpc_query(client, ALL_BALANCES_PATH, q).await?;

        debug!("[Balance] page of {} for {address}", resp.balances.len());

        balances.extend(resp.balances.into_iter().map(|c| Balance {
            denom: c.denom,
            amount: c.amount,
        }));

        match resp.pagination {
            None => break,
            Some(page) if page.next_key.is_empty() => break,
            Some(page) if page.next_key == next_key => {
                return Err(Error::Query(format!(
                    "{ALL_BALANCES_PATH}: node repeated pagination key for {address}"
                )));
            }
            Some(page) => next_key = page.next_key,
        }
    }

    info!("[Balance] {address}: {} denoms", balances.len());

    Ok(balances)
}

pub async fn query_contract_smart(session: &Session, contract: &str, msg: &Value) -> Result<Value> {
    validate_address(contract, session.prefix())?;

    let q = QuerySmartContractStateRequest {
        address: contract.into(),
        query_data: serde_json::to_vec(msg).map_err(|e| Error::Query(e.to_string()))?,
    };

    let resp: QuerySmartContractStateResponse =
        perform_rpc_query(session.rpc()?, SMART_CONTRACT_STATE_PATH, q).await?;

    info!("[Contract] {contract}: {} bytes", resp.data.len());

    serde_json::from_slice(&resp.data)
        .map_err(|e| Error::Query(format!("{contract}: response is not JSON: {e}")))
}

pub async fn get_account(session: &Session, address: &str) -> Result<BaseAccount> {
    validate_address(address, session.prefix())?;

    let q = QueryAccountRequest {
        address: address.into(),
    };

    let resp: QueryAccountResponse = perform_rpc_query(session.rpc()?, ACCOUNT_PATH, q).await?;

    let account = resp
        .account
        .ok_or_else(|| Error::Query(format!("{address}: account not found")))?;

    decode_base_account(&account)
}

pub fn decode_base_account(account: &prost_types::Any) -> Result<BaseAccount> {
    if account.type_url != BASE_ACCOUNT_TYPE_URL {
        return Err(Error::Query(format!(
            "unsupported account type `{}`",
            account.type_url
        )));
    }
    BaseAccount::decode(account.value.as_slice()).map_err(|e| Error::Query(e.to_string()))
}
