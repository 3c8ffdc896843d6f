//! # Simulation Configuration & Constants
//!
//! Every fixed value the ledger simulation depends on lives here. The hash
//! projections in `storage` and `network::consensus` reference these
//! constants rather than repeating literals, so the canonical encodings
//! cannot drift between call sites.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Version of the canonical block/chain projections. Bump whenever the field
/// set or ordering of a hashed projection changes.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Chain Linkage
// ---------------------------------------------------------------------------

/// `previousHash` stored in the genesis block of every chain.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Name of the hash function used for block and chain digests.
pub const PRIMARY_HASH_FUNCTION: &str = "SHA-256";

/// Length of a hex-encoded digest, in characters.
pub const HASH_HEX_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Amount Formatting
// ---------------------------------------------------------------------------

/// Currency symbol shown in front of amounts and stripped when parsing edits.
pub const CURRENCY_SYMBOL: char = '$';

/// Decimal places used when rendering an amount.
pub const AMOUNT_DISPLAY_DECIMALS: usize = 2;

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// `chrono` format string matching the en-US locale rendering used for block
/// and transaction timestamps, e.g. `3/14/2026, 9:05:07 PM`.
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

// ---------------------------------------------------------------------------
// Network Parameters
// ---------------------------------------------------------------------------

/// Number of simulated participants when nothing else is configured.
pub const DEFAULT_PARTICIPANT_COUNT: usize = 5;

/// Prefix for participant ids (`node-1`, `node-2`, ...).
pub const PARTICIPANT_ID_PREFIX: &str = "node";

/// Prefix for participant display names (`Node 1`, `Node 2`, ...).
pub const PARTICIPANT_DISPLAY_PREFIX: &str = "Node";

/// Builds the id of the participant at zero-based `position`.
pub fn participant_id(position: usize) -> String {
    format!("{}-{}", PARTICIPANT_ID_PREFIX, position + 1)
}

/// Builds the display name of the participant at zero-based `position`.
pub fn participant_display_name(position: usize) -> String {
    format!("{} {}", PARTICIPANT_DISPLAY_PREFIX, position + 1)
}

/// Startup parameters for a simulated network.
///
/// The participant set is fixed once the network is built, so this is the
/// only knob the simulation exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of participants, each owning an independent chain.
    pub participant_count: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            participant_count: DEFAULT_PARTICIPANT_COUNT,
        }
    }
}

impl NetworkConfig {
    /// Creates a configuration for `participant_count` participants.
    pub fn with_participants(participant_count: usize) -> Self {
        Self { participant_count }
    }

    /// Rejects configurations that cannot produce a network.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.participant_count == 0 {
            return Err(LedgerError::InvalidParticipantCount(self.participant_count));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_network_has_five_participants() {
        assert_eq!(NetworkConfig::default().participant_count, 5);
        assert!(NetworkConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_participants_rejected() {
        let err = NetworkConfig::with_participants(0).validate().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParticipantCount(0)));
    }

    #[test]
    fn participant_naming_is_one_based() {
        assert_eq!(participant_id(0), "node-1");
        assert_eq!(participant_id(9), "node-10");
        assert_eq!(participant_display_name(2), "Node 3");
    }

    #[test]
    fn genesis_link_is_single_zero() {
        assert_eq!(GENESIS_PREVIOUS_HASH, "0");
    }
}
