//! Client for the XCC calculator contract: wallet session, JSON-RPC access
//! and the typed contract proxy.

pub mod contract;
pub mod error;
pub mod rpc;
pub mod session;
pub mod wallet;

pub use contract::{CalculatorContract, ContractSettings, QueryMode};
pub use error::{ContractError, RpcError, WalletError};
pub use rpc::{JsonRpcProvider, RpcProvider};
pub use session::{CallOutcome, CallRequest, Session, ViewRequest, WalletSession};
pub use wallet::{HttpWalletSelector, Wallet, WalletSelector, WalletSelectorConfig};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
