mod commands;
pub mod context;
pub mod io;
pub mod output;
mod shell;

pub use context::{CliError, CliMode};
pub use shell::run_cli;
