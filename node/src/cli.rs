//! # CLI Interface
//!
//! Defines the command-line argument structure for `ledgerlab-node` using
//! `clap` derive. Supports three subcommands: `serve`, `demo`, and
//! `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};

use ledgerlab_protocol::config::DEFAULT_PARTICIPANT_COUNT;

/// LedgerLab view adapter.
///
/// Hosts a simulated ledger network and exposes it either as a JSON and
/// WebSocket API for a browser page, or as a scripted terminal
/// walk-through.
#[derive(Parser, Debug)]
#[command(
    name = "ledgerlab-node",
    about = "LedgerLab blockchain simulation",
    version,
    propagate_version = true
)]
pub struct LedgerLabCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the simulation over HTTP for a browser view.
    Serve(ServeArgs),
    /// Run a scripted walk-through in the terminal.
    Demo(DemoArgs),
    /// Print version information and exit.
    Version,
}

/// Options shared by every subcommand that builds a network.
#[derive(Args, Debug, Clone)]
pub struct SimulationArgs {
    /// Number of simulated participants, fixed for the session.
    #[arg(
        long,
        short = 'n',
        env = "LEDGERLAB_PARTICIPANTS",
        default_value_t = DEFAULT_PARTICIPANT_COUNT,
        value_parser = clap::value_parser!(usize)
    )]
    pub participants: usize,

    /// Log output format.
    #[arg(long, env = "LEDGERLAB_LOG_FORMAT", value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Port for the JSON/WebSocket API.
    #[arg(long, env = "LEDGERLAB_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "LEDGERLAB_METRICS_PORT", default_value_t = 9090)]
    pub metrics_port: u16,
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Participant whose chain gets tampered with during the walk-through.
    #[arg(long, default_value = "node-2")]
    pub tamper: String,
}

/// Log format as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable output.
    Pretty,
    /// JSON lines.
    Json,
}
