use shared::error::RpcErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("rpc transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rpc server error {}", .0.summary())]
    Server(RpcErrorBody),
    #[error("contract execution error: {0}")]
    Contract(String),
    #[error("malformed rpc response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("wallet rejected the request: {0}")]
    Rejected(String),
    #[error("wallet has no signed-in account")]
    NoAccount,
    #[error("invalid wallet url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("network error: {0}")]
    Network(#[from] RpcError),
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("not signed in")]
    NotSignedIn,
    #[error("no contract bound to the session")]
    NoContract,
    #[error("transaction {tx_hash} failed: {detail}")]
    ExecutionFailed { tx_hash: String, detail: String },
    #[error("transaction {tx_hash} was submitted but not confirmed: {reason}")]
    Unconfirmed { tx_hash: String, reason: String },
    #[error("contract rejected the operation in transaction {tx_hash}")]
    Rejected { tx_hash: String },
    #[error("unexpected contract response: {0}")]
    Decode(String),
}
