//! Wallet selection seam.
//!
//! Key custody and signing live outside this crate: a [`WalletSelector`]
//! knows which accounts are signed in and hands out a [`Wallet`] that signs
//! and submits transactions. [`HttpWalletSelector`] talks to a wallet bridge
//! over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AccountId, NetworkId},
    protocol::{
        AccountState, AccountsResponse, SignInRequest, SignInResponse, SignOutRequest,
        TransactionRequest, TransactionSubmission,
    },
};
use tracing::{info, warn};
use url::Url;

use crate::error::WalletError;

#[async_trait]
pub trait Wallet: Send + Sync {
    async fn sign_and_send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionSubmission, WalletError>;
    async fn sign_out(&self) -> Result<(), WalletError>;
}

#[async_trait]
pub trait WalletSelector: Send + Sync {
    fn options(&self) -> &WalletSelectorConfig;
    fn is_signed_in(&self) -> bool;
    fn accounts(&self) -> Vec<AccountState>;
    async fn wallet(&self) -> Result<Arc<dyn Wallet>, WalletError>;
    /// Starts an interactive sign-in. Returns the URL the user has to visit,
    /// if the wallet needs one.
    async fn show_modal(&self, request: SignInRequest) -> Result<Option<Url>, WalletError>;
}

#[derive(Debug, Clone)]
pub struct WalletSelectorConfig {
    pub network_id: NetworkId,
    pub node_url: Url,
    pub wallet_url: Url,
}

impl WalletSelectorConfig {
    pub fn for_network(network_id: NetworkId) -> Result<Self, WalletError> {
        Ok(Self {
            network_id,
            node_url: Url::parse(network_id.default_node_url())?,
            wallet_url: Url::parse(network_id.default_wallet_url())?,
        })
    }
}

pub struct HttpWalletSelector {
    http: Client,
    config: WalletSelectorConfig,
    accounts: Vec<AccountState>,
}

impl HttpWalletSelector {
    /// Loads the bridge's current sign-in state.
    ///
    /// A `wallet_url` that answers 404 or with something other than an
    /// accounts list (a wallet web page, say) starts signed out. Unreachable
    /// hosts and server errors still fail.
    pub async fn setup(config: WalletSelectorConfig) -> Result<Self, WalletError> {
        let http = Client::new();
        let mut url = endpoint(&config.wallet_url, "accounts")?;
        url.query_pairs_mut()
            .append_pair("network", config.network_id.as_str());
        let response = http.get(url).send().await?;
        let accounts = if response.status() == StatusCode::NOT_FOUND {
            warn!(
                "wallet: no bridge accounts endpoint at {}; starting signed out",
                config.wallet_url
            );
            Vec::new()
        } else {
            let text = reject_client_errors(response).await?.text().await?;
            match serde_json::from_str::<AccountsResponse>(&text) {
                Ok(body) => body.accounts,
                Err(err) => {
                    warn!(
                        "wallet: {} did not answer as a wallet bridge ({err}); starting signed out",
                        config.wallet_url
                    );
                    Vec::new()
                }
            }
        };
        info!(
            "wallet: selector ready network={} accounts={}",
            config.network_id.as_str(),
            accounts.len()
        );
        Ok(Self {
            http,
            config,
            accounts,
        })
    }
}

#[async_trait]
impl WalletSelector for HttpWalletSelector {
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
        let account = self.accounts.first().ok_or(WalletError::NoAccount)?;
        Ok(Arc::new(HttpWallet {
            http: self.http.clone(),
            wallet_url: self.config.wallet_url.clone(),
            account_id: account.account_id.clone(),
        }))
    }

    async fn show_modal(&self, request: SignInRequest) -> Result<Option<Url>, WalletError> {
        let response = self
            .http
            .post(endpoint(&self.config.wallet_url, "sign-in")?)
            .json(&request)
            .send()
            .await?;
        let body: SignInResponse = decode(response).await?;
        Ok(Some(Url::parse(&body.url)?))
    }
}

struct HttpWallet {
    http: Client,
    wallet_url: Url,
    account_id: AccountId,
}

#[async_trait]
impl Wallet for HttpWallet {
    async fn sign_and_send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionSubmission, WalletError> {
        if request.signer_id != self.account_id {
            warn!(
                "wallet: signer mismatch requested={} active={}",
                request.signer_id, self.account_id
            );
        }
        let response = self
            .http
            .post(endpoint(&self.wallet_url, "transactions")?)
            .json(&request)
            .send()
            .await?;
        decode(response).await
    }

    async fn sign_out(&self) -> Result<(), WalletError> {
        let response = self
            .http
            .post(endpoint(&self.wallet_url, "sign-out")?)
            .json(&SignOutRequest {
                account_id: self.account_id.clone(),
            })
            .send()
            .await?;
        reject_client_errors(response).await?;
        Ok(())
    }
}

fn endpoint(base: &Url, path: &str) -> Result<Url, WalletError> {
    Ok(Url::parse(&format!(
        "{}/{path}",
        base.as_str().trim_end_matches('/')
    ))?)
}

async fn reject_client_errors(response: Response) -> Result<Response, WalletError> {
    if response.status().is_client_error() {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        return Err(WalletError::Rejected(format!("{status}: {message}")));
    }
    Ok(response.error_for_status()?)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, WalletError> {
    Ok(reject_client_errors(response).await?.json().await?)
}

#[cfg(test)]
#[path = "tests/wallet_tests.rs"]
mod tests;
