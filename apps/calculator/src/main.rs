use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use client_core::{CalculatorContract, HttpWalletSelector, JsonRpcProvider, WalletSelector, WalletSession};
use shared::domain::{NetworkId, Operator};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod ui;

use crate::config::{load_settings, Settings, SettingsOverrides};
use crate::controller::{
    events::startup_error,
    form::FormState,
    orchestration::{CalculatorController, SubmitOutcome},
};
use crate::ui::{render::render, LoopExit, TerminalPrompter};

#[derive(Parser, Debug)]
#[command(name = "xcc-calculator", about = "Client for the NEAR cross-contract calculator")]
struct Cli {
    /// Settings file; defaults to `calculator.toml` in the working directory when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    contract_id: Option<String>,
    #[arg(long)]
    network: Option<NetworkId>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive dashboard (default).
    Interactive,
    /// Print the signed-in account and the last operation.
    Status,
    SignIn,
    SignOut,
    /// Submit one operation, e.g. `calc 3 4 add`.
    Calc {
        #[arg(allow_hyphen_values = true)]
        op_1: String,
        #[arg(allow_hyphen_values = true)]
        op_2: String,
        operator: Operator,
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(
        cli.config.as_deref(),
        &SettingsOverrides {
            contract_id: cli.contract_id.clone(),
            network: cli.network,
        },
    )?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log_filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => interactive(&settings).await,
        Command::Status => {
            let mut controller = build_controller(&settings, false).await?;
            controller.mount().await;
            println!("{}", render(&controller.view()));
            Ok(())
        }
        Command::SignIn => {
            let mut controller = build_controller(&settings, false).await?;
            controller.sign_in().await;
            Ok(())
        }
        Command::SignOut => {
            let mut controller = build_controller(&settings, false).await?;
            if !controller.wallet().is_signed_in() {
                println!("No account is signed in.");
                return Ok(());
            }
            controller.sign_out().await;
            Ok(())
        }
        Command::Calc {
            op_1,
            op_2,
            operator,
            yes,
        } => {
            let mut controller = build_controller(&settings, yes).await?;
            if !controller.wallet().is_signed_in() {
                bail!("not signed in; run `xcc-calculator sign-in` first");
            }
            *controller.form_mut() = FormState {
                operand_1: op_1,
                operand_2: op_2,
                operator,
            };
            match controller.submit().await {
                SubmitOutcome::Confirmed | SubmitOutcome::Unconfirmed { .. } => {
                    println!("Last operation: {}", controller.last_result());
                    Ok(())
                }
                SubmitOutcome::Cancelled => Ok(()),
                SubmitOutcome::Ignored => bail!("operation not submitted"),
                SubmitOutcome::Invalid(message) | SubmitOutcome::Failed(message) => {
                    Err(anyhow!(message))
                }
            }
        }
    }
}

/// Runs the dashboard, rebuilding the session from configuration after
/// every sign-in or sign-out.
async fn interactive(settings: &Settings) -> anyhow::Result<()> {
    let console = ui::stdin_console();
    loop {
        let session = start_session(settings).await?;
        let mut controller = CalculatorController::new(
            session,
            CalculatorContract::new(settings.contract_settings()?),
            TerminalPrompter::new(console.clone(), false),
        );
        controller.mount().await;

        match ui::run(&mut controller, &console).await {
            LoopExit::Quit => return Ok(()),
            LoopExit::Reload => info!("calculator: reloading session"),
        }
    }
}

async fn build_controller(
    settings: &Settings,
    assume_yes: bool,
) -> anyhow::Result<CalculatorController<TerminalPrompter<tokio::io::BufReader<tokio::io::Stdin>>>> {
    Ok(CalculatorController::new(
        start_session(settings).await?,
        CalculatorContract::new(settings.contract_settings()?),
        TerminalPrompter::new(ui::stdin_console(), assume_yes),
    ))
}

async fn start_session(settings: &Settings) -> anyhow::Result<WalletSession> {
    let selector = HttpWalletSelector::setup(settings.wallet_selector_config()?)
        .await
        .map_err(startup_error)?;
    let provider = JsonRpcProvider::new(selector.options().node_url.clone());
    info!(
        "calculator: session starting contract={} node={}",
        settings.contract_id,
        provider.node_url()
    );

    WalletSession::start_up(
        Arc::new(selector),
        Arc::new(provider),
        settings.contract_id.clone(),
    )
    .await
    .map_err(startup_error)
    .context("failed to start wallet session")
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
