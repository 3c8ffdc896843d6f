//! Error types for the ledger simulation.
//!
//! Every fallible operation in the crate returns a [`LedgerError`]. Tampering
//! is deliberately absent: a broken hash or link is a verification result,
//! not an error.

use thiserror::Error;

/// Errors raised by chain, network, and controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A required transaction field was empty after trimming.
    #[error("please fill in all fields: {0} is empty")]
    MissingField(&'static str),

    /// The named transaction field does not exist or is not editable.
    #[error("unknown transaction field: {0}")]
    UnknownField(String),

    /// No participant with this id exists in the network.
    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    /// The block index is past the end of the chain.
    #[error("block {index} out of range (chain length {len})")]
    BlockOutOfRange {
        /// The requested block index.
        index: usize,
        /// Number of blocks in the chain.
        len: usize,
    },

    /// The transaction index is past the end of the block's transaction list.
    #[error("transaction {tx_index} out of range in block {block_index} ({len} transactions)")]
    TransactionOutOfRange {
        /// Block the transaction was looked up in.
        block_index: usize,
        /// The requested transaction index.
        tx_index: usize,
        /// Number of transactions in the block.
        len: usize,
    },

    /// A network needs at least one participant.
    #[error("invalid participant count: {0} (must be at least 1)")]
    InvalidParticipantCount(usize),
}

impl LedgerError {
    /// Returns `true` for errors caused by bad user input rather than a
    /// lookup of something that does not exist.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::UnknownField(_) | Self::InvalidParticipantCount(_)
        )
    }
}
