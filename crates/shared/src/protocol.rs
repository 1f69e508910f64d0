use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{AccountId, Balance, Gas},
    error::RpcErrorBody,
};

pub const JSON_RPC_VERSION: &str = "2.0";
/// NEAR nodes echo whatever id is sent; the reference tooling always sends this one.
pub const JSON_RPC_ID: &str = "dontcare";

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'static str,
    pub params: P,
}

impl<P: Serialize> RpcRequest<P> {
    pub fn new(method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION,
            id: JSON_RPC_ID,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finality {
    #[default]
    Optimistic,
    Final,
}

/// `query` params for a read-only `call_function` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallFunctionQuery {
    pub request_type: String,
    pub finality: Finality,
    pub account_id: AccountId,
    pub method_name: String,
    pub args_base64: String,
}

impl CallFunctionQuery {
    pub fn new(
        account_id: AccountId,
        method_name: impl Into<String>,
        args: &serde_json::Value,
    ) -> Self {
        Self {
            request_type: "call_function".to_string(),
            finality: Finality::Optimistic,
            account_id,
            method_name: method_name.into(),
            args_base64: STANDARD.encode(args.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CallFunctionResult {
    #[serde(default)]
    pub result: Vec<u8>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub block_height: u64,
    #[serde(default)]
    pub block_hash: String,
    /// Older nodes report contract panics here instead of a JSON-RPC error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallFunctionResult {
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExecutionStatus {
    Unknown,
    NotStarted,
    Started,
    Failure(serde_json::Value),
    SuccessValue(String),
    SuccessReceiptId(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionView {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalExecutionOutcome {
    pub status: ExecutionStatus,
    pub transaction: TransactionView,
    #[serde(default)]
    pub receipts_outcome: Vec<serde_json::Value>,
}

impl FinalExecutionOutcome {
    /// Value returned by the last receipt of a finished transaction.
    ///
    /// Success bytes that are not JSON come back as a JSON string; any
    /// status other than `SuccessValue` yields `null`.
    pub fn last_result(&self) -> Result<serde_json::Value, base64::DecodeError> {
        let ExecutionStatus::SuccessValue(encoded) = &self.status else {
            return Ok(serde_json::Value::Null);
        };
        let bytes = STANDARD.decode(encoded)?;
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }))
    }

    pub fn failure(&self) -> Option<&serde_json::Value> {
        match &self.status {
            ExecutionStatus::Failure(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self.status,
            ExecutionStatus::Failure(_)
                | ExecutionStatus::SuccessValue(_)
                | ExecutionStatus::SuccessReceiptId(_)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: serde_json::Value,
    pub gas: Gas,
    pub deposit: Balance,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "params")]
pub enum Action {
    FunctionCall(FunctionCallAction),
}

/// Unsigned transaction handed to the wallet for signing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub signer_id: AccountId,
    pub receiver_id: AccountId,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSubmission {
    pub transaction: TransactionView,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountState {
    pub account_id: AccountId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<AccountState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub contract_id: AccountId,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignOutRequest {
    pub account_id: AccountId,
}
