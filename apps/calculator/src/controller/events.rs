//! User commands and error modeling for the calculator controller.

use client_core::{ContractError, RpcError, WalletError};
use shared::{domain::Operator, error::ValidationError};

/// One action requested from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    SetOperand1(String),
    SetOperand2(String),
    SetOperator(Operator),
    Calculate {
        op_1: String,
        operator: Operator,
        op_2: String,
    },
    Submit,
    Refresh,
    SignIn,
    SignOut,
    Help,
    Quit,
}

impl UiCommand {
    pub fn name(&self) -> &'static str {
        match self {
            UiCommand::SetOperand1(_) => "set_operand_1",
            UiCommand::SetOperand2(_) => "set_operand_2",
            UiCommand::SetOperator(_) => "set_operator",
            UiCommand::Calculate { .. } => "calculate",
            UiCommand::Submit => "submit",
            UiCommand::Refresh => "refresh",
            UiCommand::SignIn => "sign_in",
            UiCommand::SignOut => "sign_out",
            UiCommand::Help => "help",
            UiCommand::Quit => "quit",
        }
    }
}

/// Parses one line of terminal input. Blank lines yield `Ok(None)`.
///
/// Accepted forms: `a <n>`, `b <n>`, `op <operator>`, `<n> <operator> <n>`,
/// `submit` (or `=`), `refresh`, `sign-in`, `sign-out`, `help`, `quit`.
pub fn parse_command(line: &str) -> Result<Option<UiCommand>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let command = match tokens.as_slice() {
        [] => return Ok(None),
        ["a" | "op1" | "operand1", value] => UiCommand::SetOperand1(value.to_string()),
        ["b" | "op2" | "operand2", value] => UiCommand::SetOperand2(value.to_string()),
        ["op" | "operator", value] => UiCommand::SetOperator(parse_operator(value)?),
        ["submit" | "=" | "calculate"] => UiCommand::Submit,
        ["refresh" | "r"] => UiCommand::Refresh,
        ["sign-in" | "signin" | "login"] => UiCommand::SignIn,
        ["sign-out" | "signout" | "logout"] => UiCommand::SignOut,
        ["help" | "?"] => UiCommand::Help,
        ["quit" | "exit" | "q"] => UiCommand::Quit,
        [op_1, operator, op_2] => UiCommand::Calculate {
            op_1: op_1.to_string(),
            operator: parse_operator(operator)?,
            op_2: op_2.to_string(),
        },
        _ => return Err(format!("unknown command '{}'; type 'help'", line.trim())),
    };
    Ok(Some(command))
}

fn parse_operator(raw: &str) -> Result<Operator, String> {
    raw.parse().map_err(|err: ValidationError| err.to_string())
}

pub const HELP_TEXT: &str = "\
commands:
  a <n>             set Operand1
  b <n>             set Operand2
  op <operator>     set Operation (none, add, sub, mul, div or + - * /)
  <n> <op> <n>      fill the form and submit, e.g. `3 + 4`
  submit | =        submit the form
  refresh           reload the last operation
  sign-in           sign in with NEAR Wallet
  sign-out          sign out
  quit              leave

If the last operation cannot be loaded with a view call, set
query_mode = \"transaction\" in calculator.toml (or APP__QUERY_MODE).";

const QUERY_MODE_HINT: &str =
    "If the contract resolves this value through a promise, set query_mode = \"transaction\".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Network,
    Wallet,
    Contract,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Startup,
    LoadResult,
    Submit,
    SignIn,
    SignOut,
}

pub fn classify_startup_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("wallet transport failure")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        format!("Wallet bridge unreachable; check wallet_url and retry. ({message})")
    } else if lower.contains("invalid") {
        format!("Configuration error: {message}")
    } else {
        format!("Wallet start-up error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn validation(context: UiErrorContext, err: &ValidationError) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_contract(context: UiErrorContext, err: &ContractError) -> Self {
        let category = match err {
            ContractError::Network(RpcError::Contract(_)) => UiErrorCategory::Contract,
            ContractError::Network(_) | ContractError::Unconfirmed { .. } => {
                UiErrorCategory::Network
            }
            ContractError::Wallet(WalletError::Rejected(_))
            | ContractError::Wallet(WalletError::NoAccount)
            | ContractError::NotSignedIn => UiErrorCategory::Wallet,
            ContractError::Wallet(_) => UiErrorCategory::Network,
            ContractError::ExecutionFailed { .. } | ContractError::Rejected { .. } => {
                UiErrorCategory::Contract
            }
            ContractError::NoContract | ContractError::Decode(_) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn requires_sign_in(&self) -> bool {
        self.category == UiErrorCategory::Wallet
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text shown in the blocking alert.
    pub fn alert_text(&self) -> String {
        match self.category {
            UiErrorCategory::Validation => self.message.clone(),
            _ if self.requires_sign_in() => format!(
                "{}: {}. Sign in again.",
                self.context.label(),
                self.message
            ),
            UiErrorCategory::Contract if self.context == UiErrorContext::LoadResult => format!(
                "{}: {}. {QUERY_MODE_HINT}",
                self.context.label(),
                self.message
            ),
            _ => format!("{}: {}", self.context.label(), self.message),
        }
    }
}

/// Wraps a start-up failure in its user-facing summary, keeping the
/// original error as the source.
pub fn startup_error<E>(err: E) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    let summary = classify_startup_failure(&err.to_string());
    anyhow::Error::new(err).context(summary)
}

impl UiErrorContext {
    fn label(self) -> &'static str {
        match self {
            UiErrorContext::Startup => "Start-up failed",
            UiErrorContext::LoadResult => "Could not load the last operation",
            UiErrorContext::Submit => "Operation failed",
            UiErrorContext::SignIn => "Sign-in failed",
            UiErrorContext::SignOut => "Sign-out failed",
        }
    }
}

#[cfg(test)]
#[path = "../tests/events_tests.rs"]
mod tests;
