//! CLI for eventsub
//!
//! Subcommands:
//! - `server`: run the WebSocket server

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use eventsub::broker::Broker;
use eventsub::config::{Settings, load_config};
use eventsub::handlers::Handlers;
use eventsub::store::Store;
use eventsub::transport::websocket::start_websocket_server;
use eventsub::utils::logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "eventsub", version)]
enum Command {
    /// Start the WebSocket server
    Server {
        /// Override the configured log level (error, warn, info, debug, trace)
        #[arg(long)]
        log_level: Option<String>,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let Command::Server { log_level, port } = Command::parse();

    let mut settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = port {
        settings.server.port = port;
    }
    logging::init(log_level.as_deref().unwrap_or(&settings.log.level));

    match run_server(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(settings: Settings) -> eventsub::Result<()> {
    let addr = settings.server_addr();
    let handlers = Handlers::from_settings(
        Arc::new(Store::seeded()),
        Broker::new(),
        &settings.broker,
    );

    tokio::select! {
        result = start_websocket_server(&addr, handlers) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
            Ok(())
        }
    }
}
