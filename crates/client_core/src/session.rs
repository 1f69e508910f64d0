use std::sync::Arc;

use shared::{
    domain::{AccountId, Balance, Gas},
    protocol::{Action, CallFunctionQuery, FunctionCallAction, SignInRequest, TransactionRequest},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::ContractError,
    rpc::RpcProvider,
    wallet::{Wallet, WalletSelector},
};

const SIGN_IN_DESCRIPTION: &str = "Please select a wallet to sign in.";

/// Sign-in state visible to the rest of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub account_id: Option<AccountId>,
    pub contract_id: Option<AccountId>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.account_id.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub contract_id: Option<AccountId>,
    pub method: String,
    pub args: serde_json::Value,
}

impl ViewRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            contract_id: None,
            method: method.into(),
            args: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallRequest {
    pub contract_id: Option<AccountId>,
    pub method: String,
    pub args: serde_json::Value,
    pub gas: Gas,
    pub deposit: Balance,
}

impl CallRequest {
    pub fn new(method: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            contract_id: None,
            method: method.into(),
            args,
            gas: Gas::default(),
            deposit: Balance::ZERO,
        }
    }

    pub fn with_deposit(mut self, deposit: Balance) -> Self {
        self.deposit = deposit;
        self
    }

    pub fn with_gas(mut self, gas: Gas) -> Self {
        self.gas = gas;
        self
    }
}

/// Result of a state-changing call.
///
/// Submission and confirmation are two separate round-trips; when the second
/// one fails the transaction may still have executed.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Confirmed {
        tx_hash: String,
        value: serde_json::Value,
    },
    SubmittedUnconfirmed {
        tx_hash: String,
        reason: String,
    },
}

impl CallOutcome {
    pub fn tx_hash(&self) -> &str {
        match self {
            CallOutcome::Confirmed { tx_hash, .. } | CallOutcome::SubmittedUnconfirmed { tx_hash, .. } => {
                tx_hash
            }
        }
    }
}

/// Owns the wallet handle and the signed-in account for one run of the app.
pub struct WalletSession {
    selector: Arc<dyn WalletSelector>,
    provider: Arc<dyn RpcProvider>,
    wallet: Option<Arc<dyn Wallet>>,
    session: Session,
}

impl WalletSession {
    /// Probes the selector for an existing sign-in and resolves the active
    /// account and wallet when there is one.
    pub async fn start_up(
        selector: Arc<dyn WalletSelector>,
        provider: Arc<dyn RpcProvider>,
        contract_id: AccountId,
    ) -> Result<Self, ContractError> {
        let mut session = Session {
            account_id: None,
            contract_id: Some(contract_id),
        };
        let mut wallet = None;

        if selector.is_signed_in() {
            let account = selector
                .accounts()
                .into_iter()
                .next()
                .ok_or(ContractError::NotSignedIn)?;
            wallet = Some(selector.wallet().await?);
            info!("session: signed in account={}", account.account_id);
            session.account_id = Some(account.account_id);
        } else {
            info!("session: signed out");
        }

        Ok(Self {
            selector,
            provider,
            wallet,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    /// Opens the selector's sign-in flow. Completion is only visible after the
    /// next [`WalletSession::start_up`].
    pub async fn sign_in(&self) -> Result<Option<Url>, ContractError> {
        let contract_id = self
            .session
            .contract_id
            .clone()
            .ok_or(ContractError::NoContract)?;
        let url = self
            .selector
            .show_modal(SignInRequest {
                contract_id,
                description: SIGN_IN_DESCRIPTION.to_string(),
            })
            .await?;
        Ok(url)
    }

    /// Signs out of the wallet and drops every session field. The caller is
    /// expected to start a fresh session afterwards.
    pub async fn sign_out(&mut self) -> Result<(), ContractError> {
        let wallet = self.wallet.take();
        let account = self.session.account_id.take();
        self.session.contract_id = None;

        if let Some(wallet) = wallet {
            wallet.sign_out().await?;
        }
        if let Some(account) = account {
            info!("session: signed out account={account}");
        }
        Ok(())
    }

    /// Read-only contract query.
    pub async fn view_method(&self, request: ViewRequest) -> Result<serde_json::Value, ContractError> {
        let contract_id = self.resolve_contract(request.contract_id)?;
        debug!(
            "session: view contract={} method={}",
            contract_id, request.method
        );
        let result = self
            .provider
            .query(CallFunctionQuery::new(contract_id, request.method, &request.args))
            .await?;
        result
            .json()
            .map_err(|err| ContractError::Decode(format!("view result is not JSON: {err}")))
    }

    /// Signs and submits a function call, then fetches its outcome.
    pub async fn call_method(&self, request: CallRequest) -> Result<CallOutcome, ContractError> {
        let contract_id = self.resolve_contract(request.contract_id)?;
        let (Some(signer_id), Some(wallet)) = (self.session.account_id.clone(), self.wallet.as_ref())
        else {
            return Err(ContractError::NotSignedIn);
        };

        info!(
            "session: call contract={} method={} deposit={} gas={}",
            contract_id, request.method, request.deposit, request.gas.0
        );
        let submission = wallet
            .sign_and_send_transaction(TransactionRequest {
                signer_id,
                receiver_id: contract_id,
                actions: vec![Action::FunctionCall(FunctionCallAction {
                    method_name: request.method,
                    args: request.args,
                    gas: request.gas,
                    deposit: request.deposit,
                })],
            })
            .await?;
        let tx_hash = submission.transaction.hash;
        debug!("session: submitted tx={tx_hash}");

        match self.get_transaction_result(&tx_hash).await {
            Ok(Some(value)) => Ok(CallOutcome::Confirmed { tx_hash, value }),
            Ok(None) => Ok(CallOutcome::SubmittedUnconfirmed {
                tx_hash,
                reason: "transaction has not finished executing".to_string(),
            }),
            Err(ContractError::Network(err)) => {
                warn!("session: confirmation failed tx={tx_hash} error={err}");
                Ok(CallOutcome::SubmittedUnconfirmed {
                    tx_hash,
                    reason: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Fetches a transaction's outcome. `None` while it is still executing.
    pub async fn get_transaction_result(
        &self,
        tx_hash: &str,
    ) -> Result<Option<serde_json::Value>, ContractError> {
        let sender_id = self
            .session
            .account_id
            .as_ref()
            .ok_or(ContractError::NotSignedIn)?;
        let outcome = self.provider.tx_status(tx_hash, sender_id).await?;

        if let Some(failure) = outcome.failure() {
            return Err(ContractError::ExecutionFailed {
                tx_hash: tx_hash.to_string(),
                detail: failure.to_string(),
            });
        }
        if !outcome.is_final() {
            return Ok(None);
        }
        outcome
            .last_result()
            .map(Some)
            .map_err(|err| ContractError::Decode(format!("undecodable success value: {err}")))
    }

    fn resolve_contract(&self, requested: Option<AccountId>) -> Result<AccountId, ContractError> {
        requested
            .or_else(|| self.session.contract_id.clone())
            .ok_or(ContractError::NoContract)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
