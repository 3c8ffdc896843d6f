//! Simulated network participants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::Chain;

/// Consensus standing of a participant after the last consensus check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParticipantStatus {
    /// Chain agrees with the majority (the initial state).
    #[default]
    InSync,
    /// Chain disagrees with the majority.
    Rejected,
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InSync => write!(f, "InSync"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// One participant and the chain it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier, e.g. `node-1`.
    pub id: String,
    /// Label for display, e.g. `Node 1`.
    pub display_name: String,
    /// This participant's independent copy of the ledger.
    pub chain: Chain,
    /// Result of the most recent consensus check.
    pub status: ParticipantStatus,
}

impl Participant {
    /// Creates a participant with an empty chain.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            chain: Chain::new(),
            status: ParticipantStatus::InSync,
        }
    }

    /// Index the next block on this participant's chain will receive.
    pub fn block_counter(&self) -> u64 {
        self.chain.block_counter()
    }

    /// Read-only summary for views.
    pub fn summary(&self, active: bool) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            block_count: self.chain.len(),
            block_counter: self.block_counter(),
            status: self.status,
            active,
        }
    }
}

/// Flat description of a participant for the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    /// Participant id.
    pub id: String,
    /// Display label.
    pub display_name: String,
    /// Blocks currently on the participant's chain.
    pub block_count: usize,
    /// Index of the next block.
    pub block_counter: u64,
    /// Status from the last consensus check.
    pub status: ParticipantStatus,
    /// Whether this participant's chain is the current view.
    pub active: bool,
}
