use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pd_cli::commands::{distribute, report, split};
use pd_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    match &cli.command {
        Some(Commands::Split { gross, json }) => {
            split::run(&mut writer, &config, *gross, *json)?;
        }
        Some(Commands::Distribute {
            pool,
            candidates,
            cap,
            exclude_flagged,
            json,
        }) => {
            distribute::run(
                &mut writer,
                &config,
                *pool,
                candidates,
                *cap,
                *exclude_flagged,
                *json,
            )?;
        }
        Some(Commands::Report {
            gross,
            candidates,
            json,
        }) => {
            report::run(&mut writer, &config, *gross, candidates, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
