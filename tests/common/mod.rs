//! In-process Tendermint JSON-RPC node serving canned ABCI and broadcast answers.

use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD, Engine};
use prost::Message;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const CHAIN_ID: &str = "osmo-test-5";

const NODE_ID: &str = "545ea538461003efdc8c81c244531b003f6f26cf";
const BLOCK_HASH: &str = "9F3B111F4BB2E4F19171CBE4F20E6FA5B387EC84650DD6E7628EFD6EE2ACF1B3";
const APP_HASH: &str = "A172CEDCAE47474B615C54D510A5D84A8DEA3032E958587430B413538BE3F333";
const VALIDATOR_ADDRESS: &str = "56475AA75463474C0285DF5DBF2BCAB73DA65135";
const VALIDATOR_KEY: &str = "A6EHv/POEL4dcN0Y50vAmWfk1jCbpQ1fHdyGZBJVMbg=";

/// One JSON-RPC request as the node saw it.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub params: Value,
}

impl Call {
    pub fn path(&self) -> &str {
        self.params["path"].as_str().unwrap_or_default()
    }

    /// Protobuf request carried hex-encoded in an `abci_query`.
    pub fn query<M: Message + Default>(&self) -> M {
        let data = self.params["data"].as_str().unwrap_or_default();
        M::decode(hex::decode(data).unwrap().as_slice()).unwrap()
    }

    /// Raw transaction bytes of a `broadcast_tx_sync`.
    pub fn tx(&self) -> Vec<u8> {
        STANDARD.decode(self.params["tx"].as_str().unwrap()).unwrap()
    }
}

type Handler = dyn Fn(&Call) -> Value + Send + Sync;

pub struct FakeNode {
    pub url: String,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeNode {
    /// Answers `status` itself and hands every other method to `handler`,
    /// which returns the JSON-RPC `result`.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Call) -> Value + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let calls = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let log = calls.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let log = log.clone();
                let handler = handler.clone();
                tokio::spawn(async move {
                    serve(socket, log, handler).await;
                });
            }
        });

        Self { url, calls }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.method).collect()
    }
}

async fn serve(mut socket: TcpStream, log: Arc<Mutex<Vec<Call>>>, handler: Arc<Handler>) {
    let Some(body) = read_request(&mut socket).await else {
        return;
    };
    let request: Value = serde_json::from_slice(&body).unwrap();
    let call = Call {
        method: request["method"].as_str().unwrap_or_default().to_owned(),
        params: request["params"].clone(),
    };
    log.lock().unwrap().push(call.clone());

    let result = match call.method.as_str() {
        "status" => status(),
        _ => (*handler)(&call),
    };
    let body = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }).to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let start = end + 4;
            while buf.len() < start + len {
                let n = socket.read(&mut chunk).await.ok()?;
                if n == 0 {
                    return None;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            return Some(buf[start..start + len].to_vec());
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn status() -> Value {
    json!({
        "node_info": {
            "protocol_version": { "p2p": "8", "block": "11", "app": "0" },
            "id": NODE_ID,
            "listen_addr": "tcp://0.0.0.0:26656",
            "network": CHAIN_ID,
            "version": "0.37.4",
            "channels": "40202122233038606100",
            "moniker": "fake-node",
            "other": { "tx_index": "on", "rpc_address": "tcp://0.0.0.0:26657" }
        },
        "sync_info": {
            "latest_block_hash": BLOCK_HASH,
            "latest_app_hash": APP_HASH,
            "latest_block_height": "1000",
            "latest_block_time": "2024-05-01T12:00:00.000000000Z",
            "earliest_block_hash": BLOCK_HASH,
            "earliest_app_hash": APP_HASH,
            "earliest_block_height": "1",
            "earliest_block_time": "2024-01-01T00:00:00.000000000Z",
            "catching_up": false
        },
        "validator_info": {
            "address": VALIDATOR_ADDRESS,
            "pub_key": { "type": "tendermint/PubKeyEd25519", "value": VALIDATOR_KEY },
            "voting_power": "0"
        }
    })
}

fn abci_response(code: u32, log: &str, value: &[u8], codespace: &str) -> Value {
    json!({
        "response": {
            "code": code,
            "log": log,
            "info": "",
            "index": "0",
            "key": "",
            "value": STANDARD.encode(value),
            "proofOps": null,
            "height": "1000",
            "codespace": codespace
        }
    })
}

/// Successful `abci_query` answering with `msg`.
pub fn abci_ok<M: Message>(msg: &M) -> Value {
    abci_response(0, "", &msg.encode_to_vec(), "")
}

/// Successful `abci_query` with arbitrary payload bytes.
pub fn abci_raw(value: &[u8]) -> Value {
    abci_response(0, "", value, "")
}

pub fn abci_failure(code: u32, log: &str) -> Value {
    abci_response(code, log, &[], "sdk")
}

/// `broadcast_tx_sync` result for the transaction in `call`.
pub fn tx_sync(call: &Call, code: u32, log: &str) -> Value {
    let codespace = if code == 0 { "" } else { "sdk" };
    json!({
        "code": code,
        "data": "",
        "log": log,
        "codespace": codespace,
        "hash": tx_hash(&call.tx())
    })
}

pub fn tx_hash(tx: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx))
}
