//! # pawfeed — pet feeder console
//!
//! Composition root that wires the feeder backend, the console view and the
//! controller together, then runs the poll loop next to an interactive shell.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber (stderr, so logs never mix with the console)
//! - Construct the HTTP backend and the console view (adapters)
//! - Build the controller, run the initial poll and start the poller
//! - Read commands from stdin until `quit`, end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod commands;
mod config;
mod shell;

use std::sync::Arc;
use std::time::Duration;

use pawfeed_adapter_console::ConsoleView;
use pawfeed_adapter_http_reqwest::RestBackend;
use pawfeed_app::controller::Controller;
use pawfeed_app::poller::Poller;
use pawfeed_app::ports::{FeederView, SystemClock};
use tokio::io::BufReader;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::shell::Shell;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run());
    // A pending stdin read holds a blocking thread until the next line.
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .with_writer(std::io::stderr)
        .init();

    // Adapters
    let backend = RestBackend::new(&config.backend)?;
    let view = Arc::new(ConsoleView::new(
        std::io::stdout(),
        BufReader::new(tokio::io::stdin()),
    ));

    // Controller
    let settings = config.settings();
    let controller = Controller::builder()
        .backend(backend)
        .view(Arc::clone(&view))
        .clock(SystemClock)
        .policy(config.policy())
        .settings(settings)
        .build()?;
    let controller = Arc::new(controller);

    tracing::info!(backend = %config.backend.base_url, "pawfeed starting");
    view.set_feed_amount(settings.default_feed_amount_grams);
    if let Err(err) = controller.poll_once().await {
        tracing::warn!(error = %err, "initial poll failed, will keep retrying");
    }

    // Poller
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let poller = Poller::new(Arc::clone(&controller)).spawn(async move {
        let _ = stop_rx.await;
    });

    // Shell
    view.print("type `help` for the list of commands");
    let shell = Shell::new(Arc::clone(&controller), Arc::clone(&view));
    tokio::select! {
        result = shell.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("interrupted");
        }
    }

    let _ = stop_tx.send(());
    poller.await?;
    tracing::info!("pawfeed stopped");
    Ok(())
}
