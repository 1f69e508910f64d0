use serde::Deserialize;
use serde_json::json;
use shared::domain::{Balance, Gas, OperationRequest, OperationResult};
use tracing::{error, info, warn};

use crate::{
    error::ContractError,
    session::{CallOutcome, CallRequest, ViewRequest, WalletSession},
};

pub const QUERY_LAST_OPERATION_RESULT: &str = "query_last_operation_result";
pub const PERFORM_OPERATION: &str = "perform_operation";

/// How `query_last_operation_result` reaches the contract.
///
/// The deployed cross-contract calculator resolves this method through a
/// promise chain, which only runs inside a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    View,
    Transaction,
}

#[derive(Debug, Clone)]
pub struct ContractSettings {
    pub deposit: Balance,
    pub gas: Gas,
    pub query_mode: QueryMode,
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self {
            deposit: Balance::from_near(1),
            gas: Gas::default(),
            query_mode: QueryMode::View,
        }
    }
}

/// Typed adapter over the calculator contract's two methods.
#[derive(Debug, Clone, Default)]
pub struct CalculatorContract {
    settings: ContractSettings,
}

impl CalculatorContract {
    pub fn new(settings: ContractSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ContractSettings {
        &self.settings
    }

    pub async fn query_last_operation_result(
        &self,
        wallet: &WalletSession,
    ) -> Result<OperationResult, ContractError> {
        let value = match self.settings.query_mode {
            QueryMode::View => {
                wallet
                    .view_method(ViewRequest::new(QUERY_LAST_OPERATION_RESULT))
                    .await
            }
            QueryMode::Transaction => self.query_through_transaction(wallet).await,
        }
        .inspect_err(|err| error!("contract: {QUERY_LAST_OPERATION_RESULT} failed: {err}"))?;

        serde_json::from_value(value).map_err(|err| {
            let err = ContractError::Decode(format!("last operation result: {err}"));
            error!("contract: {err}");
            err
        })
    }

    pub async fn perform_operation(
        &self,
        wallet: &WalletSession,
        request: &OperationRequest,
    ) -> Result<CallOutcome, ContractError> {
        let call = CallRequest::new(
            PERFORM_OPERATION,
            json!({
                "op_1": request.op_1,
                "op_2": request.op_2,
                "operator": request.operator,
            }),
        )
        .with_deposit(self.settings.deposit)
        .with_gas(self.settings.gas);

        let outcome = wallet
            .call_method(call)
            .await
            .inspect_err(|err| error!("contract: {PERFORM_OPERATION} failed: {err}"))?;

        match &outcome {
            CallOutcome::Confirmed { tx_hash, value } if value == &json!(false) => {
                warn!("contract: {PERFORM_OPERATION} reported failure tx={tx_hash}");
                Err(ContractError::Rejected {
                    tx_hash: tx_hash.clone(),
                })
            }
            CallOutcome::Confirmed { tx_hash, .. } => {
                info!(
                    "contract: {PERFORM_OPERATION} confirmed tx={tx_hash} op={} {} {}",
                    request.op_1, request.operator, request.op_2
                );
                Ok(outcome)
            }
            CallOutcome::SubmittedUnconfirmed { tx_hash, reason } => {
                warn!("contract: {PERFORM_OPERATION} unconfirmed tx={tx_hash} reason={reason}");
                Ok(outcome)
            }
        }
    }

    async fn query_through_transaction(
        &self,
        wallet: &WalletSession,
    ) -> Result<serde_json::Value, ContractError> {
        let call = CallRequest::new(QUERY_LAST_OPERATION_RESULT, json!({})).with_gas(self.settings.gas);
        match wallet.call_method(call).await? {
            CallOutcome::Confirmed { value, .. } => Ok(value),
            CallOutcome::SubmittedUnconfirmed { tx_hash, reason } => {
                Err(ContractError::Unconfirmed { tx_hash, reason })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/contract_tests.rs"]
mod tests;
