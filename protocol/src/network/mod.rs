//! # Network Module
//!
//! A fixed set of simulated participants, each holding an independent
//! chain. There is no transport: "broadcasting" appends the same
//! transaction to every participant's chain in one synchronous pass, and
//! consensus compares chain summaries side by side.
//!
//! ## Architecture
//!
//! ```text
//! participant.rs — Participant identity, chain ownership, consensus status
//! node.rs        — Network: participant set, broadcast, active view
//! consensus.rs   — Chain digests, grouping, majority and dissenters
//! ```
//!
//! ## Design Decisions
//!
//! - Participants are stored in a `Vec` in creation order. Broadcast and
//!   consensus iterate in that order, which makes tie-breaking between
//!   equal-sized consensus groups deterministic.
//! - The active view is an index into that `Vec`, not a cached copy of a
//!   chain, so it can never go stale after a broadcast.

pub mod consensus;
pub mod node;
pub mod participant;

pub use consensus::{chain_digest, evaluate_consensus, tally, ConsensusGroup, ConsensusReport};
pub use node::Network;
pub use participant::{Participant, ParticipantStatus, ParticipantSummary};
