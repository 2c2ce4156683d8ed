use clap::Parser;
use proxybench::cli::Cli;
use proxybench::dev_tracing::init_tracing;
use proxybench::prelude::HttpTransport;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mode = cli.mode()?;
    let options = cli.load_options()?;
    let transport = Arc::new(HttpTransport::new(&options)?);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupted, stopping");
                    cancel.cancel();
                }
                Err(e) => warn!("cannot listen for Ctrl-C: {e}"),
            }
        }
    });

    info!(%mode, "proxybench starting");
    let report = proxybench::run(mode, options, transport, cancel).await?;
    info!(%report, "done");
    Ok(())
}
