//! # Text Rendering
//!
//! Plain-text views of simulator state for the `demo` subcommand. Everything
//! here reads from [`LedgerSimulator`] accessors and never mutates.
//!
//! ```text
//! Block #0 (genesis)
//!   Timestamp:     1/1/2026, 12:00:00 AM
//!   Previous Hash: 0
//!   Hash:          2097...42a9
//!   Transactions (1):
//!     From: Alice  To: Bob  Amount: $10.00  Time: 1/1/2026, 12:00:00 AM
//! ```

use std::fmt::Write;

use ledgerlab_protocol::network::{ConsensusReport, ParticipantStatus, ParticipantSummary};
use ledgerlab_protocol::storage::{Block, Chain, ChainVerification};
use ledgerlab_protocol::transaction::format_amount;

/// Shown when the active chain has no blocks.
pub const EMPTY_CHAIN_MESSAGE: &str = "No transactions yet. Add your first transaction above!";

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Renders a single block with its transactions.
pub fn render_block(block: &Block) -> String {
    let mut out = String::new();
    if block.is_genesis() {
        let _ = writeln!(out, "Block #{} (genesis)", block.index);
    } else {
        let _ = writeln!(out, "Block #{}", block.index);
    }
    let _ = writeln!(out, "  Timestamp:     {}", block.timestamp);
    let _ = writeln!(out, "  Previous Hash: {}", block.previous_hash);
    let _ = writeln!(out, "  Hash:          {}", block.hash);
    let _ = writeln!(out, "  Transactions ({}):", block.tx_count());
    for tx in &block.transactions {
        let _ = writeln!(
            out,
            "    From: {}  To: {}  Amount: {}  Time: {}",
            tx.sender,
            tx.receiver,
            format_amount(tx.amount),
            tx.timestamp
        );
    }
    out
}

/// Renders every block of `chain`, or the empty-chain message.
pub fn render_chain(chain: &Chain) -> String {
    if chain.is_empty() {
        return format!("{}\n", EMPTY_CHAIN_MESSAGE);
    }
    chain
        .blocks()
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Renders the overall verdict followed by one line per block.
pub fn render_verification(report: &ChainVerification) -> String {
    let mut out = String::new();
    if report.overall_valid {
        let _ = writeln!(out, "✓ Blockchain is valid!");
    } else {
        let _ = writeln!(out, "✗ Blockchain has been tampered with!");
    }
    for verdict in &report.blocks {
        let _ = writeln!(
            out,
            "  Block #{}: hash {}  link {}",
            verdict.index,
            mark(verdict.hash_matches),
            mark(verdict.chain_intact)
        );
    }
    out
}

/// Renders the participant list, marking the active one.
pub fn render_participants(participants: &[ParticipantSummary]) -> String {
    let mut out = String::new();
    for p in participants {
        let cursor = if p.active { ">" } else { " " };
        let status = match p.status {
            ParticipantStatus::InSync => "in sync",
            ParticipantStatus::Rejected => "REJECTED",
        };
        let _ = writeln!(
            out,
            "{} {} ({})  blocks: {}  status: {}",
            cursor, p.display_name, p.id, p.block_count, status
        );
    }
    out
}

/// Renders the grouping found by a consensus check.
pub fn render_consensus(report: &ConsensusReport) -> String {
    let mut out = String::new();
    if report.unanimous {
        let _ = writeln!(
            out,
            "All {} participants agree.",
            report.participant_count
        );
    } else {
        let _ = writeln!(
            out,
            "Consensus split into {} groups; rejected: {}",
            report.groups.len(),
            report.dissenting_ids.join(", ")
        );
    }
    if let Some(majority) = report.group(&report.majority_digest) {
        let _ = writeln!(
            out,
            "Majority: {} of {} at {}",
            majority.len(),
            report.participant_count,
            short_digest(&majority.digest)
        );
    }
    for group in &report.groups {
        let _ = writeln!(
            out,
            "  {}  {}",
            short_digest(&group.digest),
            group.members.join(", ")
        );
    }
    out
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
