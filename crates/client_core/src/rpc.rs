use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::AccountId,
    protocol::{CallFunctionQuery, CallFunctionResult, FinalExecutionOutcome, RpcRequest, RpcResponse},
};
use tracing::debug;
use url::Url;

use crate::error::RpcError;

#[async_trait]
pub trait RpcProvider: Send + Sync {
    async fn query(&self, request: CallFunctionQuery) -> Result<CallFunctionResult, RpcError>;
    async fn tx_status(
        &self,
        tx_hash: &str,
        sender_id: &AccountId,
    ) -> Result<FinalExecutionOutcome, RpcError>;
}

/// JSON-RPC client for a NEAR node.
pub struct JsonRpcProvider {
    http: Client,
    node_url: Url,
}

impl JsonRpcProvider {
    pub fn new(node_url: Url) -> Self {
        Self::with_client(Client::new(), node_url)
    }

    pub fn with_client(http: Client, node_url: Url) -> Self {
        Self { http, node_url }
    }

    pub fn node_url(&self) -> &Url {
        &self.node_url
    }

    async fn call<P, R>(&self, method: &'static str, params: P) -> Result<R, RpcError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        debug!(method, node = %self.node_url, "rpc: sending request");
        let response: RpcResponse<R> = self
            .http
            .post(self.node_url.clone())
            .json(&RpcRequest::new(method, params))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(RpcError::Server(error));
        }
        response
            .result
            .ok_or_else(|| RpcError::Decode(format!("{method} response carried neither result nor error")))
    }
}

#[async_trait]
impl RpcProvider for JsonRpcProvider {
    async fn query(&self, request: CallFunctionQuery) -> Result<CallFunctionResult, RpcError> {
        let result: CallFunctionResult = self.call("query", request).await?;
        if let Some(error) = result.error.clone() {
            return Err(RpcError::Contract(error));
        }
        Ok(result)
    }

    async fn tx_status(
        &self,
        tx_hash: &str,
        sender_id: &AccountId,
    ) -> Result<FinalExecutionOutcome, RpcError> {
        self.call("tx", (tx_hash, sender_id)).await
    }
}

#[cfg(test)]
#[path = "tests/rpc_tests.rs"]
mod tests;
