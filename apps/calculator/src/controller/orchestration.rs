//! Orchestration from user commands to the wallet session and the contract.

use async_trait::async_trait;
use client_core::{CalculatorContract, CallOutcome, WalletSession};
use shared::domain::{AccountId, OperationResult};
use tracing::{debug, info, warn};

use super::{
    events::{UiCommand, UiError, UiErrorContext, HELP_TEXT},
    form::FormState,
};

const CONFIRM_QUESTION: &str = "Are you sure?";
const SIGN_IN_FIRST: &str = "Sign in with NEAR Wallet first.";

/// Blocking dialogs shown to the user.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
    async fn alert(&self, message: &str);
    /// Called around a contract call so the UI can show a waiting indicator.
    async fn progress(&self, _message: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Cancelled,
    Invalid(String),
    Confirmed,
    Unconfirmed { tx_hash: String },
    Failed(String),
}

/// What the main loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    /// Restart the wallet session from configuration.
    Reload,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub account_id: AccountId,
    pub contract_id: Option<AccountId>,
    pub form: FormState,
    pub last_result: OperationResult,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    SignInPrompt,
    Dashboard(Dashboard),
}

pub struct CalculatorController<P> {
    wallet: WalletSession,
    contract: CalculatorContract,
    prompter: P,
    form: FormState,
    last_result: OperationResult,
    busy: bool,
}

impl<P: Prompter> CalculatorController<P> {
    pub fn new(wallet: WalletSession, contract: CalculatorContract, prompter: P) -> Self {
        Self {
            wallet,
            contract,
            prompter,
            form: FormState::default(),
            last_result: OperationResult::default(),
            busy: false,
        }
    }

    pub fn wallet(&self) -> &WalletSession {
        &self.wallet
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn last_result(&self) -> OperationResult {
        self.last_result
    }

    /// Loads the last operation once the dashboard is shown. On failure the
    /// user is alerted and the previous result stays.
    pub async fn mount(&mut self) {
        if !self.wallet.is_signed_in() {
            return;
        }
        self.busy = true;
        let loaded = self.refresh().await;
        self.busy = false;
        if let Err(err) = loaded {
            warn!(
                category = ?err.category(),
                context = ?err.context(),
                "controller: initial load failed: {}",
                err.message()
            );
            self.prompter.alert(&err.alert_text()).await;
        }
    }

    /// Re-reads the last operation. On failure the previous result stays.
    pub async fn refresh(&mut self) -> Result<OperationResult, UiError> {
        match self.contract.query_last_operation_result(&self.wallet).await {
            Ok(result) => {
                debug!("controller: last result={result}");
                self.last_result = result;
                Ok(result)
            }
            Err(err) => Err(UiError::from_contract(UiErrorContext::LoadResult, &err)),
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.wallet.is_signed_in() || self.busy {
            debug!(
                "controller: submit ignored signed_in={} busy={}",
                self.wallet.is_signed_in(),
                self.busy
            );
            return SubmitOutcome::Ignored;
        }
        if !self.prompter.confirm(CONFIRM_QUESTION).await {
            info!("controller: action cancelled");
            return SubmitOutcome::Cancelled;
        }

        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(err) => {
                let err = UiError::validation(UiErrorContext::Submit, &err);
                self.prompter.alert(&err.alert_text()).await;
                return SubmitOutcome::Invalid(err.message().to_string());
            }
        };

        self.busy = true;
        self.prompter.progress("Please wait...").await;
        let result = self.contract.perform_operation(&self.wallet, &request).await;

        let outcome = match result {
            Ok(CallOutcome::Confirmed { .. }) => {
                self.form.reset();
                self.refresh_after_submit().await;
                SubmitOutcome::Confirmed
            }
            Ok(CallOutcome::SubmittedUnconfirmed { tx_hash, reason }) => {
                self.form.reset();
                self.prompter
                    .alert(&format!(
                        "Transaction {tx_hash} was submitted but its result could not be confirmed: {reason}"
                    ))
                    .await;
                self.refresh_after_submit().await;
                SubmitOutcome::Unconfirmed { tx_hash }
            }
            Err(err) => {
                let err = UiError::from_contract(UiErrorContext::Submit, &err);
                self.prompter.alert(&err.alert_text()).await;
                SubmitOutcome::Failed(err.message().to_string())
            }
        };
        self.busy = false;
        outcome
    }

    /// Starts the wallet sign-in. The new account is picked up after reload.
    pub async fn sign_in(&mut self) -> ControlFlow {
        match self.wallet.sign_in().await {
            Ok(Some(url)) => {
                self.prompter
                    .alert(&format!("Open {url} to finish signing in."))
                    .await;
                ControlFlow::Reload
            }
            Ok(None) => ControlFlow::Reload,
            Err(err) => {
                let err = UiError::from_contract(UiErrorContext::SignIn, &err);
                self.prompter.alert(&err.alert_text()).await;
                ControlFlow::Continue
            }
        }
    }

    pub async fn sign_out(&mut self) -> ControlFlow {
        if let Err(err) = self.wallet.sign_out().await {
            let err = UiError::from_contract(UiErrorContext::SignOut, &err);
            self.prompter.alert(&err.alert_text()).await;
        }
        self.form.reset();
        self.last_result = OperationResult::default();
        ControlFlow::Reload
    }

    pub fn view(&self) -> View {
        let session = self.wallet.session();
        match &session.account_id {
            None => View::SignInPrompt,
            Some(account_id) => View::Dashboard(Dashboard {
                account_id: account_id.clone(),
                contract_id: session.contract_id.clone(),
                form: self.form.clone(),
                last_result: self.last_result,
                busy: self.busy,
            }),
        }
    }

    pub async fn dispatch(&mut self, command: UiCommand) -> ControlFlow {
        debug!(command = command.name(), "dispatching ui command");
        match command {
            UiCommand::Help => {
                self.prompter.alert(HELP_TEXT).await;
                ControlFlow::Continue
            }
            UiCommand::Quit => ControlFlow::Quit,
            UiCommand::SignIn => self.sign_in().await,
            _ if !self.wallet.is_signed_in() => {
                self.prompter.alert(SIGN_IN_FIRST).await;
                ControlFlow::Continue
            }
            UiCommand::SignOut => self.sign_out().await,
            UiCommand::SetOperand1(value) => {
                self.form.operand_1 = value;
                ControlFlow::Continue
            }
            UiCommand::SetOperand2(value) => {
                self.form.operand_2 = value;
                ControlFlow::Continue
            }
            UiCommand::SetOperator(operator) => {
                self.form.operator = operator;
                ControlFlow::Continue
            }
            UiCommand::Calculate {
                op_1,
                operator,
                op_2,
            } => {
                self.form = FormState {
                    operand_1: op_1,
                    operand_2: op_2,
                    operator,
                };
                self.submit().await;
                ControlFlow::Continue
            }
            UiCommand::Submit => {
                self.submit().await;
                ControlFlow::Continue
            }
            UiCommand::Refresh => {
                if let Err(err) = self.refresh().await {
                    self.prompter.alert(&err.alert_text()).await;
                }
                ControlFlow::Continue
            }
        }
    }

    async fn refresh_after_submit(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!(
                category = ?err.category(),
                "controller: refresh after submit failed: {}",
                err.message()
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
