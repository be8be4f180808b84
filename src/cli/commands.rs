use crate::cli::args::{Cli, Commands, LogLevel};
use crate::error::Result;
use crate::processors::{parse_offset, LoggerPipeline, OffsetRewriter};
use crate::settings::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG`, when set, overrides the level.
pub fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    // A second install (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli, settings: Settings) -> Result<()> {
    let pipeline = LoggerPipeline::new(settings.clone()).with_quiet(cli.quiet);

    match cli.command {
        Commands::Plot {
            data_root,
            output_dir,
            metadata,
        } => {
            info!("Scanning {} for logger files", data_root.display());
            let report = pipeline.run_plots(&data_root, &output_dir, metadata.as_deref())?;

            if report.groups > 0 {
                println!(
                    "Processed {} loggers: {} plots written to {}",
                    report.groups,
                    report.plots_written,
                    output_dir.display()
                );
            }
        }

        Commands::Map {
            data_root,
            plots_dir,
            output,
            metadata,
            skip_plots,
        } => {
            let report =
                pipeline.run_map(&data_root, &plots_dir, &output, metadata.as_deref(), skip_plots)?;

            if report.map_written {
                println!(
                    "Interactive map with {} loggers saved to {}",
                    report.markers,
                    output.display()
                );
            }
        }

        Commands::Offset {
            input_dir,
            offset,
            skip_lines,
        } => {
            let delta = parse_offset(&offset)?;
            let rewriter = OffsetRewriter::new(delta)
                .with_skip_lines(skip_lines.unwrap_or(settings.offset_skip_lines));

            let written = rewriter.rewrite_dir(&input_dir)?;
            println!("Wrote {} offset files", written.len());
        }
    }

    Ok(())
}
