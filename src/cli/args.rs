use crate::utils::constants::{DEFAULT_OFFSET, DEFAULT_SETTINGS_FILE};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "groundtemp-processor")]
#[command(about = "Ground temperature logger plots, maps and clock corrections")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_enum, default_value = "INFO", ignore_case = true)]
    pub log_level: LogLevel,

    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE, help = "Settings file (optional)")]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Disable progress bars")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge each logger's files and write one combined plot per logger
    Plot {
        #[arg(long, default_value = ".", help = "Directory searched recursively for logger CSV files")]
        data_root: PathBuf,

        #[arg(long, default_value = "plots", help = "Directory for {logger_id}_combined.png files")]
        output_dir: PathBuf,

        #[arg(long, help = "Single metadata CSV used instead of the data root tables")]
        metadata: Option<PathBuf>,
    },

    /// Build the interactive logger map, regenerating plots first
    Map {
        #[arg(long, default_value = "data")]
        data_root: PathBuf,

        #[arg(long, default_value = "plots")]
        plots_dir: PathBuf,

        #[arg(long, default_value = "logger_map.html")]
        output: PathBuf,

        #[arg(long, help = "Single metadata CSV used instead of the data root tables")]
        metadata: Option<PathBuf>,

        #[arg(long, help = "Use the existing plots directory as is")]
        skip_plots: bool,
    },

    /// Shift timestamps of sangvor exports with a drifted clock
    Offset {
        #[arg(long, help = "Directory whose *.csv files are rewritten")]
        input_dir: PathBuf,

        #[arg(long, default_value = DEFAULT_OFFSET, help = "Offset such as '438d 3h 29min 29sec'")]
        offset: String,

        #[arg(long, help = "Header lines copied verbatim [default: from settings]")]
        skip_lines: Option<usize>,
    },
}
