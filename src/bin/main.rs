//! traffic-receiver: print FLARM traffic from a device or a recording.

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use traffic_receiver::{build_transport, logging, shutdown_on, Args, LogSink, Runner, Settings};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init().context("failed to initialize logging")?;
    let settings = Settings::try_from(args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the runtime")?;
    runtime.block_on(run(settings));
    Ok(())
}

async fn run(settings: Settings) {
    let (tx, rx) = mpsc::unbounded_channel();
    let transport = build_transport(&settings.source, tx);
    let runner = Runner::new(transport, rx, LogSink, settings.core, settings.runner);

    let source = runner.run(shutdown_on(tokio::signal::ctrl_c())).await;

    tracing::info!(
        source = source.source_name(),
        stats = %source.stats(),
        "traffic receiver stopped"
    );
}
