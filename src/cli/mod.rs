pub mod args;
pub mod commands;

pub use args::{Cli, Commands, LogLevel};
pub use commands::{init_logging, run};
