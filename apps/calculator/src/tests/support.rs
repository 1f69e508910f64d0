//! In-memory chain, wallet selector and prompter for controller tests.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use client_core::{
    CalculatorContract, RpcError, RpcProvider, Wallet, WalletError, WalletSelector,
    WalletSelectorConfig, WalletSession,
};
use shared::{
    domain::{AccountId, NetworkId, OperationRequest, OperationResult, Operator},
    error::RpcErrorBody,
    protocol::{
        AccountState, Action, CallFunctionQuery, CallFunctionResult, ExecutionStatus,
        FinalExecutionOutcome, SignInRequest, TransactionRequest, TransactionSubmission,
        TransactionView,
    },
};
use tokio::sync::Mutex;
use url::Url;

use crate::controller::orchestration::{CalculatorController, Prompter};

pub(crate) const SIGNER: &str = "alice.testnet";
pub(crate) const CONTRACT: &str = "calc.testnet";

pub(crate) fn account(raw: &str) -> AccountId {
    raw.parse().expect("account id")
}

#[derive(Default)]
pub(crate) struct ChainState {
    pub(crate) last: OperationResult,
    pub(crate) submissions: Vec<TransactionRequest>,
    pub(crate) view_failure: Option<String>,
    pub(crate) unconfirmed: bool,
    pub(crate) sign_outs: u32,
}

/// Plays the calculator contract: submitted operations are evaluated and
/// stored, view calls return the stored result.
#[derive(Default)]
pub(crate) struct FakeChain {
    pub(crate) state: Mutex<ChainState>,
}

impl FakeChain {
    pub(crate) fn with_last(last: OperationResult) -> Arc<Self> {
        let chain = Self::default();
        chain.state.try_lock().expect("fresh chain").last = last;
        Arc::new(chain)
    }
}

fn evaluate(request: &OperationRequest) -> i32 {
    match request.operator {
        Operator::Add => request.op_1.wrapping_add(request.op_2),
        Operator::Sub => request.op_1.wrapping_sub(request.op_2),
        Operator::Mul => request.op_1.wrapping_mul(request.op_2),
        Operator::Div => request.op_1 / request.op_2,
        Operator::None => 0,
    }
}

#[async_trait]
impl Wallet for FakeChain {
    async fn sign_and_send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionSubmission, WalletError> {
        let mut state = self.state.lock().await;
        let Action::FunctionCall(call) = &request.actions[0];
        let operation: OperationRequest = serde_json::from_value(call.args.clone())
            .map_err(|err| WalletError::Rejected(err.to_string()))?;
        state.last = OperationResult {
            op_1: operation.op_1,
            op_2: operation.op_2,
            result: evaluate(&operation),
            operator: operation.operator,
        };
        state.submissions.push(request);
        Ok(TransactionSubmission {
            transaction: TransactionView {
                hash: format!("tx{}", state.submissions.len()),
                signer_id: None,
                receiver_id: None,
            },
        })
    }

    async fn sign_out(&self) -> Result<(), WalletError> {
        self.state.lock().await.sign_outs += 1;
        Ok(())
    }
}

#[async_trait]
impl RpcProvider for FakeChain {
    async fn query(&self, _request: CallFunctionQuery) -> Result<CallFunctionResult, RpcError> {
        let state = self.state.lock().await;
        if let Some(message) = &state.view_failure {
            return Err(RpcError::Server(RpcErrorBody {
                name: Some("HANDLER_ERROR".into()),
                cause: None,
                code: Some(-32000),
                message: message.clone(),
                data: None,
            }));
        }
        Ok(CallFunctionResult {
            result: serde_json::to_vec(&state.last).expect("encode result"),
            ..CallFunctionResult::default()
        })
    }

    async fn tx_status(
        &self,
        tx_hash: &str,
        _sender_id: &AccountId,
    ) -> Result<FinalExecutionOutcome, RpcError> {
        if self.state.lock().await.unconfirmed {
            return Err(RpcError::Decode("connection reset".into()));
        }
        Ok(FinalExecutionOutcome {
            status: ExecutionStatus::SuccessValue(STANDARD.encode("true")),
            transaction: TransactionView {
                hash: tx_hash.to_string(),
                signer_id: None,
                receiver_id: None,
            },
            receipts_outcome: Vec::new(),
        })
    }
}

pub(crate) struct FakeSelector {
    config: WalletSelectorConfig,
    accounts: Vec<AccountState>,
    chain: Arc<FakeChain>,
}

impl FakeSelector {
    pub(crate) fn new(chain: Arc<FakeChain>, signed_in: bool) -> Self {
        let accounts = if signed_in {
            vec![AccountState {
                account_id: account(SIGNER),
            }]
        } else {
            Vec::new()
        };
        Self {
            config: WalletSelectorConfig::for_network(NetworkId::Testnet).expect("config"),
            accounts,
            chain,
        }
    }
}

#[async_trait]
impl WalletSelector for FakeSelector {
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
        Ok(self.chain.clone())
    }

    async fn show_modal(&self, _request: SignInRequest) -> Result<Option<Url>, WalletError> {
        Ok(Some(Url::parse("https://wallet.testnet.near.org/login")?))
    }
}

/// Answers every confirmation with a fixed reply and records dialogs.
pub(crate) struct ScriptedPrompter {
    pub(crate) answer: bool,
    pub(crate) questions: Mutex<Vec<String>>,
    pub(crate) alerts: Mutex<Vec<String>>,
    pub(crate) progress: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub(crate) fn answering(answer: bool) -> Self {
        Self {
            answer,
            questions: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
            progress: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, question: &str) -> bool {
        self.questions.lock().await.push(question.to_string());
        self.answer
    }

    async fn alert(&self, message: &str) {
        self.alerts.lock().await.push(message.to_string());
    }

    async fn progress(&self, message: &str) {
        self.progress.lock().await.push(message.to_string());
    }
}

pub(crate) async fn start_session(chain: &Arc<FakeChain>, signed_in: bool) -> WalletSession {
    WalletSession::start_up(
        Arc::new(FakeSelector::new(chain.clone(), signed_in)),
        chain.clone(),
        account(CONTRACT),
    )
    .await
    .expect("start up")
}

pub(crate) async fn controller(
    chain: &Arc<FakeChain>,
    signed_in: bool,
    answer: bool,
) -> CalculatorController<ScriptedPrompter> {
    CalculatorController::new(
        start_session(chain, signed_in).await,
        CalculatorContract::default(),
        ScriptedPrompter::answering(answer),
    )
}
