use std::path::Path;

use anyhow::Context;
use client_core::{ContractSettings, QueryMode, WalletSelectorConfig};
use ::config::{Config, Environment, File};
use serde::Deserialize;
use shared::domain::{parse_near_amount, AccountId, Gas, NetworkId};
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "calculator";
const DEFAULT_CONTRACT_ID: &str = "xcc-calculator.testnet";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub network: NetworkId,
    pub contract_id: AccountId,
    pub node_url: Option<String>,
    pub wallet_url: Option<String>,
    pub deposit_near: String,
    pub gas_tgas: u64,
    pub query_mode: QueryMode,
    pub log_filter: String,
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub contract_id: Option<String>,
    pub network: Option<NetworkId>,
}

impl Settings {
    pub fn wallet_selector_config(&self) -> anyhow::Result<WalletSelectorConfig> {
        let node_url = self
            .node_url
            .as_deref()
            .unwrap_or(self.network.default_node_url());
        let wallet_url = self
            .wallet_url
            .as_deref()
            .unwrap_or(self.network.default_wallet_url());
        Ok(WalletSelectorConfig {
            network_id: self.network,
            node_url: Url::parse(node_url)
                .with_context(|| format!("invalid node_url '{node_url}'"))?,
            wallet_url: Url::parse(wallet_url)
                .with_context(|| format!("invalid wallet_url '{wallet_url}'"))?,
        })
    }

    pub fn contract_settings(&self) -> anyhow::Result<ContractSettings> {
        let deposit = parse_near_amount(&self.deposit_near)
            .with_context(|| format!("invalid deposit_near '{}'", self.deposit_near))?;
        let gas = Gas::checked_from_tgas(self.gas_tgas)
            .with_context(|| format!("invalid gas_tgas {}", self.gas_tgas))?;
        Ok(ContractSettings {
            deposit,
            gas,
            query_mode: self.query_mode,
        })
    }
}

/// Layers defaults, the optional settings file, `APP__*` environment
/// variables and command-line overrides, in that order.
pub fn load_settings(
    path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> anyhow::Result<Settings> {
    load_settings_from(
        path,
        overrides,
        Environment::with_prefix("APP").separator("__"),
    )
}

fn load_settings_from(
    path: Option<&Path>,
    overrides: &SettingsOverrides,
    environment: Environment,
) -> anyhow::Result<Settings> {
    let mut builder = Config::builder()
        .set_default("network", NetworkId::Testnet.as_str())?
        .set_default("contract_id", DEFAULT_CONTRACT_ID)?
        .set_default("deposit_near", "1")?
        .set_default("gas_tgas", 300_i64)?
        .set_default("query_mode", "view")?
        .set_default("log_filter", "info")?;

    builder = match path {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
    };
    builder = builder.add_source(environment);

    if let Some(contract_id) = &overrides.contract_id {
        builder = builder.set_override("contract_id", contract_id.as_str())?;
    }
    if let Some(network) = overrides.network {
        builder = builder.set_override("network", network.as_str())?;
    }

    builder
        .build()
        .context("failed to read calculator settings")?
        .try_deserialize()
        .context("invalid calculator settings")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
