//! In-memory stand-ins for the wallet selector and the RPC node.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use shared::{
    domain::{AccountId, NetworkId},
    error::RpcErrorBody,
    protocol::{
        AccountState, CallFunctionQuery, CallFunctionResult, ExecutionStatus,
        FinalExecutionOutcome, SignInRequest, TransactionRequest, TransactionSubmission,
        TransactionView,
    },
};
use tokio::sync::Mutex;
use url::Url;

use crate::{
    error::{RpcError, WalletError},
    rpc::RpcProvider,
    session::WalletSession,
    wallet::{Wallet, WalletSelector, WalletSelectorConfig},
};

pub(crate) const TX_HASH: &str = "8hJm7x";

pub(crate) fn account(raw: &str) -> AccountId {
    raw.parse().expect("account id")
}

pub(crate) struct TestWallet {
    pub(crate) submissions: Mutex<Vec<TransactionRequest>>,
    pub(crate) sign_outs: Mutex<u32>,
    pub(crate) fail_with: Option<String>,
}

impl TestWallet {
    pub(crate) fn ok() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            sign_outs: Mutex::new(0),
            fail_with: None,
        }
    }

    pub(crate) fn failing(err: impl Into<String>) -> Self {
        Self {
            fail_with: Some(err.into()),
            ..Self::ok()
        }
    }
}

#[async_trait]
impl Wallet for TestWallet {
    async fn sign_and_send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionSubmission, WalletError> {
        if let Some(err) = &self.fail_with {
            return Err(WalletError::Rejected(err.clone()));
        }
        self.submissions.lock().await.push(request);
        Ok(TransactionSubmission {
            transaction: TransactionView {
                hash: TX_HASH.to_string(),
                signer_id: None,
                receiver_id: None,
            },
        })
    }

    async fn sign_out(&self) -> Result<(), WalletError> {
        *self.sign_outs.lock().await += 1;
        Ok(())
    }
}

pub(crate) struct TestSelector {
    config: WalletSelectorConfig,
    accounts: Vec<AccountState>,
    pub(crate) wallet: Arc<TestWallet>,
    pub(crate) modal_requests: Mutex<Vec<SignInRequest>>,
}

impl TestSelector {
    pub(crate) fn signed_in(wallet: TestWallet) -> Self {
        Self::with_accounts(
            vec![AccountState {
                account_id: account("alice.testnet"),
            }],
            wallet,
        )
    }

    pub(crate) fn signed_out() -> Self {
        Self::with_accounts(Vec::new(), TestWallet::ok())
    }

    fn with_accounts(accounts: Vec<AccountState>, wallet: TestWallet) -> Self {
        Self {
            config: WalletSelectorConfig::for_network(NetworkId::Testnet).expect("config"),
            accounts,
            wallet: Arc::new(wallet),
            modal_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WalletSelector for TestSelector {
    fn options(&self) -> &WalletSelectorConfig {
        &self.config
    }

    fn is_signed_in(&self) -> bool {
        !self.accounts.is_empty()
    }

    fn accounts(&self) -> Vec<AccountState> {
        self.accounts.clone()
    }

    async fn wallet(&self) -> Result<Arc<dyn Wallet>, WalletError> {
        if self.accounts.is_empty() {
            return Err(WalletError::NoAccount);
        }
        Ok(self.wallet.clone())
    }

    async fn show_modal(&self, request: SignInRequest) -> Result<Option<Url>, WalletError> {
        self.modal_requests.lock().await.push(request);
        Ok(Some(Url::parse("https://wallet.testnet.near.org/login")?))
    }
}

pub(crate) enum TxReply {
    Status(ExecutionStatus),
    Unreachable,
}

pub(crate) struct TestProvider {
    pub(crate) view_reply: Mutex<Result<Value, String>>,
    pub(crate) tx_reply: Mutex<TxReply>,
    pub(crate) queries: Mutex<Vec<CallFunctionQuery>>,
    pub(crate) tx_lookups: Mutex<Vec<(String, AccountId)>>,
}

impl TestProvider {
    pub(crate) fn new(view_reply: Value) -> Self {
        Self {
            view_reply: Mutex::new(Ok(view_reply)),
            tx_reply: Mutex::new(TxReply::Status(success(&json!(true)))),
            queries: Mutex::new(Vec::new()),
            tx_lookups: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_tx_reply(self, reply: TxReply) -> Self {
        Self {
            tx_reply: Mutex::new(reply),
            ..self
        }
    }

    pub(crate) fn with_view_error(self, message: impl Into<String>) -> Self {
        Self {
            view_reply: Mutex::new(Err(message.into())),
            ..self
        }
    }
}

pub(crate) fn success(value: &Value) -> ExecutionStatus {
    ExecutionStatus::SuccessValue(STANDARD.encode(value.to_string()))
}

#[async_trait]
impl RpcProvider for TestProvider {
    async fn query(&self, request: CallFunctionQuery) -> Result<CallFunctionResult, RpcError> {
        self.queries.lock().await.push(request);
        match &*self.view_reply.lock().await {
            Ok(value) => Ok(CallFunctionResult {
                result: value.to_string().into_bytes(),
                ..CallFunctionResult::default()
            }),
            Err(message) => Err(RpcError::Server(RpcErrorBody {
                name: Some("HANDLER_ERROR".into()),
                cause: None,
                code: Some(-32000),
                message: message.clone(),
                data: None,
            })),
        }
    }

    async fn tx_status(
        &self,
        tx_hash: &str,
        sender_id: &AccountId,
    ) -> Result<FinalExecutionOutcome, RpcError> {
        self.tx_lookups
            .lock()
            .await
            .push((tx_hash.to_string(), sender_id.clone()));
        match &*self.tx_reply.lock().await {
            TxReply::Status(status) => Ok(FinalExecutionOutcome {
                status: status.clone(),
                transaction: TransactionView {
                    hash: tx_hash.to_string(),
                    signer_id: Some(sender_id.to_string()),
                    receiver_id: None,
                },
                receipts_outcome: Vec::new(),
            }),
            TxReply::Unreachable => Err(RpcError::Decode("connection reset".into())),
        }
    }
}

pub(crate) async fn start_session(
    selector: Arc<TestSelector>,
    provider: Arc<TestProvider>,
) -> WalletSession {
    WalletSession::start_up(selector, provider, account("calc.testnet"))
        .await
        .expect("start up")
}
