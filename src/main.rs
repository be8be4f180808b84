use anyhow::Context;
use clap::Parser;
use groundtemp_processor::cli::{init_logging, run, Cli};
use groundtemp_processor::settings::Settings;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let settings = Settings::load(Some(&cli.config))
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;

    run(cli, settings)?;
    Ok(())
}
