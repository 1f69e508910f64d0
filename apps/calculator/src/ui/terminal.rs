//! Line-oriented terminal front end.

use std::{io::Write as _, sync::Arc};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};
use tracing::warn;

use crate::{
    controller::{
        events::{parse_command, UiCommand},
        orchestration::{CalculatorController, ControlFlow, Prompter},
    },
    ui::render::render,
};

/// Shared line reader; the main loop and confirmation prompts both read from it.
pub struct Console<R> {
    lines: Mutex<Lines<R>>,
}

impl<R: AsyncBufRead + Unpin + Send> Console<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }

    /// Next input line, or `None` at end of input.
    pub async fn read_line(&self) -> Option<String> {
        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(err) => {
                warn!("terminal: failed to read input: {err}");
                None
            }
        }
    }
}

pub fn stdin_console() -> Arc<Console<BufReader<Stdin>>> {
    Arc::new(Console::new(BufReader::new(tokio::io::stdin())))
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

pub struct TerminalPrompter<R> {
    console: Arc<Console<R>>,
    assume_yes: bool,
}

impl<R> TerminalPrompter<R> {
    pub fn new(console: Arc<Console<R>>, assume_yes: bool) -> Self {
        Self {
            console,
            assume_yes,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Prompter for TerminalPrompter<R> {
    async fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            println!("{question} yes");
            return true;
        }
        prompt(&format!("{question} [y/N] "));
        matches!(
            self.console.read_line().await.as_deref().map(str::trim),
            Some("y" | "Y" | "yes" | "YES")
        )
    }

    async fn alert(&self, message: &str) {
        println!("\n{message}\n");
    }

    async fn progress(&self, message: &str) {
        println!("{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    Reload,
}

/// Renders, reads one command, dispatches it. Returns when the user quits,
/// input ends, or the session has to be rebuilt.
pub async fn run<P, R>(controller: &mut CalculatorController<P>, console: &Console<R>) -> LoopExit
where
    P: Prompter,
    R: AsyncBufRead + Unpin + Send,
{
    loop {
        println!("{}", render(&controller.view()));
        prompt("> ");
        let Some(line) = console.read_line().await else {
            return LoopExit::Quit;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        let waits_for_wallet = command == UiCommand::SignIn;

        match controller.dispatch(command).await {
            ControlFlow::Continue => {}
            ControlFlow::Quit => return LoopExit::Quit,
            ControlFlow::Reload => {
                if waits_for_wallet {
                    prompt("Press Enter once the wallet has finished signing in.");
                    let _ = console.read_line().await;
                }
                return LoopExit::Reload;
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/terminal_tests.rs"]
mod tests;
