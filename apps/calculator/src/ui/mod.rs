//! UI layer for the terminal: screen rendering and the interactive loop.

pub mod render;
pub mod terminal;

pub use terminal::{run, stdin_console, Console, LoopExit, TerminalPrompter};
