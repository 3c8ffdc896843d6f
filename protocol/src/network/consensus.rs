//! # Majority Consensus
//!
//! Every participant's chain is reduced to one digest, participants with
//! equal digests are grouped, and the largest group is the majority.
//! Participants outside it are dissenters and get marked `Rejected`.
//!
//! ## Chain digest
//!
//! The digest covers only linkage metadata: the ordered list of
//! `{index, hash, previousHash}` per block, as compact JSON, hashed with
//! SHA-256. Transaction payloads are not hashed again; they already feed
//! each block's hash. Two chains whose hash sequences coincide are
//! therefore equal for consensus purposes even if their stored payloads
//! differ (e.g. after an edit that was never rehashed).
//!
//! ## Majority selection
//!
//! ```text
//! participants (creation order) ─► digest ─► groups (discovery order)
//!                                              │ stable sort, size desc
//!                                              ▼
//!                                   groups[0] = majority
//! ```
//!
//! Equal-sized groups keep their discovery order, so the group containing
//! the earliest-created participant wins a tie.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::node::Network;
use super::participant::ParticipantStatus;
use crate::crypto::hash::hash_canonical;
use crate::storage::Chain;

// ---------------------------------------------------------------------------
// Chain digest
// ---------------------------------------------------------------------------

/// Per-block entry of the chain digest projection. Key order is fixed.
#[derive(Serialize)]
struct LinkProjection<'a> {
    index: u64,
    hash: &'a str,
    #[serde(rename = "previousHash")]
    previous_hash: &'a str,
}

/// SHA-256 hex digest summarising a chain's linkage for consensus.
pub fn chain_digest(chain: &Chain) -> String {
    let links: Vec<LinkProjection<'_>> = chain
        .blocks()
        .iter()
        .map(|b| LinkProjection {
            index: b.index,
            hash: &b.hash,
            previous_hash: &b.previous_hash,
        })
        .collect();
    hash_canonical(&links)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Participants sharing one chain digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusGroup {
    /// The shared chain digest.
    pub digest: String,
    /// Member participant ids, in creation order.
    pub members: Vec<String>,
}

impl ConsensusGroup {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Groups always have at least one member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Outcome of a consensus evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusReport {
    /// Every distinct digest with its members, largest first; equal sizes
    /// keep discovery order.
    pub groups: Vec<ConsensusGroup>,
    /// Digest of the majority group.
    pub majority_digest: String,
    /// Members of the majority group.
    pub majority_group: Vec<String>,
    /// Every participant not in the majority group, in creation order.
    pub dissenting_ids: Vec<String>,
    /// Exactly one group exists.
    pub unanimous: bool,
    /// Number of participants evaluated.
    pub participant_count: usize,
}

impl ConsensusReport {
    /// Whether the majority group holds more than half of all participants.
    pub fn has_strict_majority(&self) -> bool {
        self.majority_group.len() * 2 > self.participant_count
    }

    /// Whether `id` is in the majority group.
    pub fn is_in_majority(&self, id: &str) -> bool {
        self.majority_group.iter().any(|m| m == id)
    }

    /// The group whose digest is `digest`, if any.
    pub fn group(&self, digest: &str) -> Option<&ConsensusGroup> {
        self.groups.iter().find(|g| g.digest == digest)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Computes the consensus report without touching participant statuses.
pub fn tally(network: &Network) -> ConsensusReport {
    let mut groups: Vec<ConsensusGroup> = Vec::new();

    for participant in network.participants() {
        let digest = chain_digest(&participant.chain);
        match groups.iter_mut().find(|g| g.digest == digest) {
            Some(group) => group.members.push(participant.id.clone()),
            None => groups.push(ConsensusGroup {
                digest,
                members: vec![participant.id.clone()],
            }),
        }
    }

    // `sort_by` is stable: equal-sized groups keep discovery order.
    groups.sort_by(|a, b| b.len().cmp(&a.len()));

    let (majority_digest, majority_group) = groups
        .first()
        .map(|g| (g.digest.clone(), g.members.clone()))
        .unwrap_or_default();

    let dissenting_ids: Vec<String> = network
        .participants()
        .iter()
        .filter(|p| !majority_group.contains(&p.id))
        .map(|p| p.id.clone())
        .collect();

    ConsensusReport {
        unanimous: groups.len() == 1,
        groups,
        majority_digest,
        majority_group,
        dissenting_ids,
        participant_count: network.len(),
    }
}

/// Evaluates consensus and marks every participant `InSync` or `Rejected`.
pub fn evaluate_consensus(network: &mut Network) -> ConsensusReport {
    let report = tally(network);

    for participant in network.participants_mut() {
        participant.status = if report.is_in_majority(&participant.id) {
            ParticipantStatus::InSync
        } else {
            ParticipantStatus::Rejected
        };
    }

    if report.unanimous {
        info!(
            participants = report.participant_count,
            digest = %report.majority_digest,
            "consensus unanimous"
        );
    } else {
        warn!(
            groups = report.groups.len(),
            majority = report.majority_group.len(),
            dissenting = ?report.dissenting_ids,
            "consensus split"
        );
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
