// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # LedgerLab Node
//!
//! Entry point for the `ledgerlab-node` binary. Parses CLI arguments,
//! initializes logging and metrics, builds the simulated network and either
//! serves it over HTTP/WS or runs a scripted terminal walk-through.
//!
//! - `serve`   — expose the simulation to a browser view
//! - `demo`    — submit, tamper, verify and vote, printing each step
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;

use ledgerlab_protocol::config::NetworkConfig;
use ledgerlab_protocol::transaction::TxField;
use ledgerlab_protocol::LedgerSimulator;

use cli::{Commands, LedgerLabCli};
use metrics::SimMetrics;

/// Broadcast channel capacity for live event streaming.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Transactions submitted by the `demo` walk-through.
const DEMO_TRANSACTIONS: [(&str, &str, &str); 3] = [
    ("Alice", "Bob", "10"),
    ("Bob", "Carol", "$4.25"),
    ("Carol", "Alice", "1.5"),
];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = LedgerLabCli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Demo(args) => demo(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Serves the simulation API and the metrics endpoint until shutdown.
async fn serve(args: cli::ServeArgs) -> Result<()> {
    logging::init_logging(
        "ledgerlab_node=info,ledgerlab_protocol=info,tower_http=debug",
        args.simulation.log_format.into(),
    );

    let config = NetworkConfig::with_participants(args.simulation.participants);
    let simulator = LedgerSimulator::new(&config).context("failed to build participant network")?;

    tracing::info!(
        port = args.port,
        metrics_port = args.metrics_port,
        participants = config.participant_count,
        "starting ledgerlab-node"
    );

    let sim_metrics = Arc::new(SimMetrics::new().context("failed to register metrics")?);
    let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

    let app_state = api::AppState {
        version: format!(
            "{} (protocol {})",
            env!("CARGO_PKG_VERSION"),
            ledgerlab_protocol::config::PROTOCOL_VERSION,
        ),
        simulator: Arc::new(RwLock::new(simulator)),
        event_tx,
        metrics: Arc::clone(&sim_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&sim_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
        }
    }

    tracing::info!("ledgerlab-node stopped");
    Ok(())
}

/// Runs the scripted walk-through: broadcast, verify, tamper, verify, vote.
fn demo(args: cli::DemoArgs) -> Result<()> {
    logging::init_logging(
        "ledgerlab_node=warn,ledgerlab_protocol=info",
        args.simulation.log_format.into(),
    );

    let config = NetworkConfig::with_participants(args.simulation.participants);
    let mut sim = LedgerSimulator::new(&config).context("failed to build participant network")?;

    println!("== Broadcasting {} transactions ==", DEMO_TRANSACTIONS.len());
    for (sender, receiver, amount) in DEMO_TRANSACTIONS {
        sim.submit_transaction(sender, receiver, amount)
            .with_context(|| format!("failed to submit {} -> {}", sender, receiver))?;
    }
    println!("{}", render::render_chain(sim.active_chain()));

    println!("== Verifying {} ==", sim.active_participant().display_name);
    print!("{}", render::render_verification(sim.request_verify()));

    println!();
    println!("== Tampering with {} ==", args.tamper);
    sim.switch_active_participant(&args.tamper)
        .with_context(|| format!("cannot switch to {}", args.tamper))?;
    sim.edit_field(0, 0, TxField::Amount, "1000")
        .context("failed to edit first transaction")?;
    println!("{}", render::render_chain(sim.active_chain()));

    println!("== Verifying {} ==", sim.active_participant().display_name);
    print!("{}", render::render_verification(sim.request_verify()));

    println!();
    println!("== Consensus ==");
    print!("{}", render::render_consensus(sim.request_consensus_check()));
    println!();
    print!("{}", render::render_participants(&sim.participants()));

    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("ledgerlab-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol       {}", ledgerlab_protocol::config::PROTOCOL_VERSION);
    println!("block hash     {}", ledgerlab_protocol::config::PRIMARY_HASH_FUNCTION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
