//! # Block Structure
//!
//! A block is the unit of the ledger: an ordered transaction list plus the
//! linkage metadata that chains it to its predecessor.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  index: u64            (0 = genesis)        │
//! │  timestamp: String                          │
//! │  previous_hash: String ("0" for genesis)    │
//! │  transactions: Vec<Transaction>             │
//! │  hash: String          (SHA-256 hex)        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Hash Computation
//!
//! The hash covers the canonical projection
//! `{blockNumber, timestamp, previousHash, transactions}` serialised as
//! compact JSON in exactly that key order. The `hash` field is not part of
//! its own input.

use serde::{Deserialize, Serialize};

use crate::config::GENESIS_PREVIOUS_HASH;
use crate::crypto::hash::hash_canonical;
use crate::transaction::Transaction;

// ---------------------------------------------------------------------------
// BlockProjection
// ---------------------------------------------------------------------------

/// The hashed view of a block. Key names and order are fixed.
#[derive(Debug, Serialize)]
pub struct BlockProjection<'a> {
    #[serde(rename = "blockNumber")]
    block_number: u64,
    timestamp: &'a str,
    #[serde(rename = "previousHash")]
    previous_hash: &'a str,
    transactions: &'a [Transaction],
}

impl<'a> BlockProjection<'a> {
    /// Builds the projection from individual fields.
    pub fn new(
        block_number: u64,
        timestamp: &'a str,
        previous_hash: &'a str,
        transactions: &'a [Transaction],
    ) -> Self {
        Self {
            block_number,
            timestamp,
            previous_hash,
            transactions,
        }
    }

    /// SHA-256 hex digest of the canonical JSON encoding.
    pub fn digest(&self) -> String {
        hash_canonical(self)
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A ledger block.
///
/// Fields are public because tampering with them is part of the simulation;
/// [`Block::compute_hash`] always reflects the current content while `hash`
/// holds whatever was last sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the owning chain.
    pub index: u64,
    /// Human-readable creation time.
    pub timestamp: String,
    /// Stored hash of the preceding block at append time, `"0"` for genesis.
    pub previous_hash: String,
    /// Ordered transactions carried by this block.
    pub transactions: Vec<Transaction>,
    /// Last sealed digest of the canonical projection.
    pub hash: String,
}

impl Block {
    /// Builds and seals a block.
    pub fn new(
        index: u64,
        timestamp: impl Into<String>,
        previous_hash: impl Into<String>,
        transactions: Vec<Transaction>,
    ) -> Self {
        let mut block = Block {
            index,
            timestamp: timestamp.into(),
            previous_hash: previous_hash.into(),
            transactions,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Returns the canonical projection of the current content.
    pub fn projection(&self) -> BlockProjection<'_> {
        BlockProjection::new(
            self.index,
            &self.timestamp,
            &self.previous_hash,
            &self.transactions,
        )
    }

    /// Recomputes the digest from the current content without storing it.
    pub fn compute_hash(&self) -> String {
        self.projection().digest()
    }

    /// Recomputes the digest and stores it in `hash`. Returns the new hash.
    pub fn reseal(&mut self) -> &str {
        self.hash = self.compute_hash();
        &self.hash
    }

    /// Returns `true` if the stored hash matches the current content.
    pub fn hash_matches(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Returns `true` if this block claims to be the first in its chain.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    /// Return the number of transactions in this block.
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
