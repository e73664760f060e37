//! # Inventory Console
//!
//! A terminal front end for a product inventory.
//!
//! ## Quick Start
//!
//! ```bash
//! inventory                                  # talk to http://localhost:3000
//! inventory --api-url http://host:8080       # or INVENTORY_API_URL=...
//! inventory --memory --seed                  # no server: in-process store with sample data
//! ```
//!
//! The table is loaded once at startup; after that every line on stdin is a command
//! (see [`HELP`]). The loop ends on `quit` or end of input.

use clap::Parser;
use inventory_api::store::ProductStore;
use inventory_api::{HttpProductApi, ProductApi};
use inventory_console::app::InventoryApp;
use inventory_console::command::{execute, Command, Flow, HELP};
use inventory_console::config::{sample_products, Backend, Cli, Config};
use inventory_console::logging::setup_tracing;
use inventory_console::surface::{ConsolePrompt, SharedLines, TerminalSurface};
use std::io::Stdout;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tracing::{info, warn, Instrument};

type Input = SharedLines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    setup_tracing();

    let config = Config::try_from(cli).map_err(|e| e.to_string())?;
    info!(backend = ?config.backend, "Starting inventory console");

    let input: Input = Arc::new(tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let surface = Arc::new(TerminalSurface::new(std::io::stdout()));

    match config.backend {
        Backend::Http(url) => run(HttpProductApi::new(url), surface, input).await,
        Backend::Memory { seed } => {
            let (mut store, client) = ProductStore::new(32);
            if seed {
                for draft in sample_products() {
                    store.seed(draft).map_err(|e| e.to_string())?;
                }
            }
            let handle = tokio::spawn(store.run());

            let result = run(client, surface, input).await;

            // The app owned the last client; the store stops once it is dropped
            handle.await.map_err(|e| e.to_string())?;
            result
        }
    }
}

async fn run<A: ProductApi>(api: A, surface: Arc<TerminalSurface<Stdout>>, input: Input) -> Result<(), String> {
    let prompt = Arc::new(ConsolePrompt::new(input.clone()));
    let app = InventoryApp::new(api, surface.clone(), prompt);

    surface.notice("Type 'help' for commands.");
    app.initial_load()
        .instrument(tracing::info_span!("initial_load"))
        .await;

    loop {
        let line = input.lock().await.next_line().await.map_err(|e| e.to_string())?;
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                surface.notice(&e.to_string());
                continue;
            }
        };

        let span = tracing::info_span!("command", ?command);
        match execute(&app, command).instrument(span).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::ShowHelp) => surface.notice(HELP),
            Ok(Flow::Quit) => break,
            Err(e) => {
                warn!(error = %e, "Command rejected");
                surface.notice(&e.to_string());
            }
        }
    }

    info!("Console closed");
    Ok(())
}
