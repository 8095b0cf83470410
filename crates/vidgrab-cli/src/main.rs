mod args;
mod commands;

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vidgrab_core::{deps, Config};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "vidgrab=warn,vidgrab_core=warn",
        1 => "vidgrab=debug,vidgrab_core=debug",
        2 => "vidgrab=trace,vidgrab_core=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\nError: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config.as_deref();
    let config = Config::load(config_path)?;
    debug!("Loaded config: {:?}", config);

    match cli.command {
        Commands::Download { url, options } => {
            warn_missing_ffmpeg(&config);
            commands::download::run(&url, &options, &config).await
        }
        Commands::List { url } => {
            warn_missing_ffmpeg(&config);
            commands::list::run(&url, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Doctor => commands::doctor::run(&config).await,
        Commands::Config => {
            commands::config::run(&config, config_path)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn warn_missing_ffmpeg(config: &Config) {
    if deps::check_ffmpeg(config).is_none() {
        println!("Warning: FFmpeg is not installed");
        println!("   Some features (audio extraction, format merging) may not work");
        println!("   Install: sudo apt install ffmpeg  (or brew install ffmpeg on macOS)");
        println!();
    }
}
