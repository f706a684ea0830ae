use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use installer_watch::check::{CheckStatus, run_check};
use installer_watch::config::WatchConfig;
use installer_watch::logging::init_logging;
use installer_watch::report;
use installer_watch::version::error::CheckError;
use installer_watch::version::sources::HttpSource;

#[derive(Parser)]
#[command(name = "installer-watch")]
#[command(
    version,
    about = "Check the Claude Desktop installers for upstream changes",
    long_about = "Check the Claude Desktop installers for upstream changes.\n\n\
                  Exit status: 0 = no change, 1 = change detected, 2 = error."
)]
struct Cli {
    /// Snapshot file to compare against and overwrite
    #[arg(long, value_name = "PATH")]
    metadata_file: Option<PathBuf>,

    /// JSON config file overriding installers, timeouts or the snapshot path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(status) => status.into(),
        Err(e) => {
            println!("Error checking for updates: {:#}", e);
            CheckStatus::Failed.into()
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<CheckStatus> {
    let _guard = init_logging(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => WatchConfig::load(path)?,
        None => WatchConfig::default(),
    };
    if let Some(path) = cli.metadata_file {
        config.metadata_file = path;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let source = HttpSource::new(&config.timeouts).map_err(CheckError::Client)?;
        run_check(&source, &config).await
    })?;

    print!("{}", report::render(&outcome));
    Ok(outcome.status())
}
