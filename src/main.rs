//! Terminal IRC Client - Entry Point
//!
//! Loads the configuration, dials the server and runs the IrcClient actor
//! with the console front end until the session ends.

use std::env;
use std::path::Path;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use irc_client::connection::{self, EVENT_BUFFER};
use irc_client::{console, transport, Config, ConsoleUi, LocalClock, ViewRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // Logs go to stderr so they never mix with pane output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("irc_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Config file from the command line, or the built-in defaults
    let config = match env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    let color = env::var_os("NO_COLOR").is_none();

    info!("Connecting to {}", config.addr());
    let stream = transport::dial(&config.host, config.port)
        .await
        .inspect_err(|e| error!("{}", e))?;

    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    console::spawn_input(events_tx.clone());

    let views = ViewRegistry::new(ConsoleUi::new(color), LocalClock);
    let outcome = connection::run(stream, config, views, events_tx, events_rx).await;

    info!("Session ended: {:?}", outcome);
    let code = outcome.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
