//! In-process transports for exercising the client without a daemon.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use bitcoin::hashes::Hash;
use bitcoin::{Address, Network, PubkeyHash};
use client::Client;
use serde_json::{json, Value};
use transport::codes;
use transport::{
    DynTransport, JsonRpcRequest, JsonRpcResponse, RequestIds, Result, Transport, TransportError,
};

pub const BASE: &str = "http://127.0.0.1:18443";

/// Parses JSON text with exact numbers. `json!` would go through `f64`.
pub fn parse(text: &str) -> Value { serde_json::from_str(text).expect("valid JSON") }

/// A deterministic regtest address.
pub fn address(n: u8) -> String {
    Address::p2pkh(PubkeyHash::from_byte_array([n; 20]), Network::Regtest).to_string()
}

/// One request as it reached the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub endpoint: String,
    pub method: String,
    pub params: Vec<Value>,
}

/// A scripted answer.
pub enum Reply {
    Result(Value),
    Error(i64, &'static str),
    Timeout,
}

#[derive(Default)]
struct Script {
    calls: Vec<Recorded>,
    replies: VecDeque<Reply>,
}

/// Answers requests from a queue and records every request.
///
/// Wallet transports derived from it share the queue and the record.
#[derive(Clone)]
pub struct ScriptedTransport {
    endpoint: String,
    script: Arc<Mutex<Script>>,
    ids: RequestIds,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            endpoint: BASE.to_string(),
            script: Arc::new(Mutex::new(Script::default())),
            ids: RequestIds::default(),
        }
    }

    pub fn reply(&self, reply: Reply) -> &Self {
        self.script.lock().expect("script lock").replies.push_back(reply);
        self
    }

    pub fn reply_json(&self, text: &str) -> &Self { self.reply(Reply::Result(parse(text))) }

    pub fn calls(&self) -> Vec<Recorded> { self.script.lock().expect("script lock").calls.clone() }

    pub fn last(&self) -> Recorded { self.calls().pop().expect("at least one request") }

    pub fn client(&self) -> Client { Client::new(Arc::new(self.clone())) }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let mut script = self.script.lock().expect("script lock");
        script.calls.push(Recorded {
            endpoint: self.endpoint.clone(),
            method: request.method().to_string(),
            params: request.params().to_vec(),
        });
        match script.replies.pop_front() {
            Some(Reply::Result(value)) => Ok(JsonRpcResponse::success(request.id(), value)),
            Some(Reply::Error(code, message)) => {
                Ok(JsonRpcResponse::failure(request.id(), code, message))
            }
            Some(Reply::Timeout) => Err(TransportError::Timeout("scripted".to_string())),
            None => {
                Err(TransportError::Other(format!("no reply scripted for {}", request.method())))
            }
        }
    }

    fn endpoint(&self) -> &str { &self.endpoint }

    fn next_id(&self) -> u64 { self.ids.next() }

    fn for_wallet(&self, wallet: &str) -> DynTransport {
        Arc::new(Self {
            endpoint: format!("{}/wallet/{}", BASE, wallet),
            script: Arc::clone(&self.script),
            ids: self.ids.clone(),
        })
    }
}

#[derive(Default)]
struct WalletState {
    /// Address to label.
    labels: BTreeMap<String, String>,
}

#[derive(Default)]
struct Node {
    on_disk: BTreeMap<String, WalletState>,
    loaded: BTreeSet<String>,
    next_address: u8,
}

type Answer = std::result::Result<Value, (i64, String)>;

/// A small stand-in for a regtest node with several wallets.
///
/// Wallet calls resolve their wallet the way the daemon does: from the
/// `/wallet/<name>` path, or from the only loaded wallet on the base path.
#[derive(Clone)]
pub struct SimulatedDaemon {
    endpoint: String,
    wallet: Option<String>,
    node: Arc<Mutex<Node>>,
    ids: RequestIds,
}

impl SimulatedDaemon {
    pub fn new() -> Self {
        Self {
            endpoint: BASE.to_string(),
            wallet: None,
            node: Arc::new(Mutex::new(Node::default())),
            ids: RequestIds::default(),
        }
    }

    pub fn client(&self) -> Client { Client::new(Arc::new(self.clone())) }

    fn answer(&self, node: &mut Node, method: &str, params: &[Value]) -> Answer {
        let name = || params.first().and_then(Value::as_str).map(str::to_string);
        match method {
            "createwallet" => {
                let name = name().ok_or_else(|| invalid_params("wallet name"))?;
                if node.on_disk.contains_key(&name) {
                    return Err((
                        codes::RPC_WALLET_ERROR,
                        format!(
                            "Failed to create database path '{}'. Database already exists.",
                            name
                        ),
                    ));
                }
                node.on_disk.insert(name.clone(), WalletState::default());
                node.loaded.insert(name.clone());
                Ok(json!({ "name": name, "warning": "" }))
            }
            "loadwallet" => {
                let name = name().ok_or_else(|| invalid_params("wallet name"))?;
                if !node.on_disk.contains_key(&name) {
                    let message = format!("Wallet file not found: {}", name);
                    return Err((codes::RPC_WALLET_NOT_FOUND, message));
                }
                if !node.loaded.insert(name.clone()) {
                    return Err((
                        codes::RPC_WALLET_ALREADY_LOADED,
                        format!("Wallet \"{}\" is already loaded.", name),
                    ));
                }
                Ok(json!({ "name": name, "warning": "" }))
            }
            "unloadwallet" => {
                let name = match name() {
                    Some(name) => name,
                    None => self.resolve(node)?,
                };
                if !node.loaded.remove(&name) {
                    return Err(not_loaded());
                }
                Ok(Value::Null)
            }
            "listwallets" => Ok(json!(node.loaded)),
            "listwalletdir" => {
                let wallets: Vec<Value> =
                    node.on_disk.keys().map(|name| json!({ "name": name })).collect();
                Ok(json!({ "wallets": wallets }))
            }
            "getbalance" => {
                self.resolve(node)?;
                Ok(parse("0.00000000"))
            }
            "listunspent" => {
                self.resolve(node)?;
                Ok(json!([]))
            }
            "getwalletinfo" => {
                let name = self.resolve(node)?;
                Ok(parse(&format!(
                    r#"{{"walletname": "{}", "walletversion": 169900, "format": "sqlite",
                        "balance": 0.00000000, "txcount": 0, "keypoolsize": 4000,
                        "private_keys_enabled": true, "scanning": false, "descriptors": true}}"#,
                    name
                )))
            }
            "getnewaddress" => {
                let name = self.resolve(node)?;
                let label = name_or_empty(params.first());
                node.next_address = node.next_address.wrapping_add(1);
                let address = address(node.next_address);
                wallet_mut(node, &name).labels.insert(address.clone(), label);
                Ok(json!(address))
            }
            "setlabel" => {
                let name = self.resolve(node)?;
                let address = params
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid_params("address"))?
                    .to_string();
                let label = name_or_empty(params.get(1));
                let wallet = wallet_mut(node, &name);
                if !wallet.labels.contains_key(&address) {
                    let message = "Only addresses in the wallet can be labeled".to_string();
                    return Err((codes::RPC_WALLET_ERROR, message));
                }
                wallet.labels.insert(address, label);
                Ok(Value::Null)
            }
            "getaddressesbylabel" => {
                let name = self.resolve(node)?;
                let label = name_or_empty(params.first());
                let matching: serde_json::Map<String, Value> = wallet_mut(node, &name)
                    .labels
                    .iter()
                    .filter(|(_, l)| **l == label)
                    .map(|(address, _)| (address.clone(), json!({ "purpose": "receive" })))
                    .collect();
                if matching.is_empty() {
                    return Err((
                        codes::RPC_WALLET_INVALID_LABEL_NAME,
                        format!("No addresses with label {}", label),
                    ));
                }
                Ok(Value::Object(matching))
            }
            "listlabels" => {
                let name = self.resolve(node)?;
                let labels: BTreeSet<&String> = wallet_mut(node, &name).labels.values().collect();
                Ok(json!(labels))
            }
            other => Err((codes::RPC_METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        }
    }

    /// The wallet a wallet call applies to.
    fn resolve(&self, node: &Node) -> std::result::Result<String, (i64, String)> {
        match &self.wallet {
            Some(wallet) if node.loaded.contains(wallet) => Ok(wallet.clone()),
            Some(_) => Err(not_loaded()),
            None => match node.loaded.len() {
                0 => Err((
                    codes::RPC_WALLET_NOT_FOUND,
                    concat!(
                        "No wallet is loaded. Load a wallet using loadwallet ",
                        "or create a new one with createwallet."
                    )
                    .to_string(),
                )),
                1 => Ok(node.loaded.iter().next().cloned().unwrap_or_default()),
                _ => Err((
                    codes::RPC_WALLET_NOT_SPECIFIED,
                    concat!(
                        "Wallet file not specified ",
                        "(must request wallet RPC through /wallet/<filename> uri-path)."
                    )
                    .to_string(),
                )),
            },
        }
    }
}

impl Transport for SimulatedDaemon {
    fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let mut node = self.node.lock().expect("node lock");
        Ok(match self.answer(&mut node, request.method(), request.params()) {
            Ok(value) => JsonRpcResponse::success(request.id(), value),
            Err((code, message)) => JsonRpcResponse::failure(request.id(), code, message),
        })
    }

    fn endpoint(&self) -> &str { &self.endpoint }

    fn next_id(&self) -> u64 { self.ids.next() }

    fn for_wallet(&self, wallet: &str) -> DynTransport {
        Arc::new(Self {
            endpoint: format!("{}/wallet/{}", BASE, wallet),
            wallet: Some(wallet.to_string()),
            node: Arc::clone(&self.node),
            ids: self.ids.clone(),
        })
    }
}

fn wallet_mut<'a>(node: &'a mut Node, name: &str) -> &'a mut WalletState {
    node.on_disk.entry(name.to_string()).or_default()
}

fn name_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn not_loaded() -> (i64, String) {
    (codes::RPC_WALLET_NOT_FOUND, "Requested wallet does not exist or is not loaded".to_string())
}

fn invalid_params(what: &str) -> (i64, String) {
    (codes::RPC_INVALID_PARAMS, format!("missing {}", what))
}
