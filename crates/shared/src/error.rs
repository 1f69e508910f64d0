use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an operator.")]
    OperatorNotSelected,
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("invalid {field}: '{value}' is not a 32-bit integer")]
    InvalidOperand { field: &'static str, value: String },
    #[error("op_2 must be greater than 0 for division")]
    DivisionByZero,
    #[error("invalid account id '{0}'")]
    InvalidAccountId(String),
    #[error("invalid NEAR amount '{0}'")]
    InvalidAmount(String),
    #[error("gas allowance of {0} TGas does not fit in 64 bits")]
    GasOverflow(u64),
}

/// Error object returned by a NEAR JSON-RPC node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cause: Option<serde_json::Value>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl RpcErrorBody {
    pub fn summary(&self) -> String {
        let cause = self
            .cause
            .as_ref()
            .and_then(|cause| cause.get("name"))
            .and_then(|name| name.as_str());
        match (&self.name, cause) {
            (Some(name), Some(cause)) => format!("{name}/{cause}: {}", self.detail()),
            (Some(name), None) => format!("{name}: {}", self.detail()),
            _ => self.detail(),
        }
    }

    fn detail(&self) -> String {
        match &self.data {
            Some(serde_json::Value::String(data)) => data.clone(),
            Some(other) if !other.is_null() => other.to_string(),
            _ => self.message.clone(),
        }
    }
}
