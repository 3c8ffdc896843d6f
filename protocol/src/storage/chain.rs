//! Ordered block storage for one participant, with tamper detection.
//!
//! Links are checked lazily: nothing stops an edit from breaking the chain,
//! and [`Chain::verify`] is how the break is found.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::block::Block;
use crate::config::GENESIS_PREVIOUS_HASH;
use crate::error::LedgerError;
use crate::transaction::{Transaction, TxField};

// ---------------------------------------------------------------------------
// Verification report
// ---------------------------------------------------------------------------

/// Verification outcome for a single block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockVerdict {
    /// Block position.
    pub index: u64,
    /// Hash stored on the block.
    pub stored_hash: String,
    /// Hash recomputed from the block's current content.
    pub computed_hash: String,
    /// Stored hash equals the recomputed hash.
    pub hash_matches: bool,
    /// The next block's `previous_hash` equals this block's stored hash.
    /// Always true for the last block.
    pub chain_intact: bool,
    /// Both checks passed.
    pub valid: bool,
}

/// Verification outcome for a whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainVerification {
    /// One verdict per block, in chain order.
    pub blocks: Vec<BlockVerdict>,
    /// Logical AND of every block's `valid`. True for an empty chain.
    pub overall_valid: bool,
}

impl ChainVerification {
    /// Indices of blocks that failed either check.
    pub fn invalid_indices(&self) -> Vec<u64> {
        self.blocks
            .iter()
            .filter(|v| !v.valid)
            .map(|v| v.index)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Ordered chain of blocks owned by a single participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    blocks: Vec<Block>,
    block_counter: u64,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seals a new block holding `transaction` and appends it to the tip.
    ///
    /// The block links to the current tip's stored hash (or `"0"` when the
    /// chain is empty) and takes the next sequential index. Both the block
    /// and its transaction are stamped with `now`.
    pub fn append(&mut self, transaction: Transaction, now: &str) -> &Block {
        let previous_hash = self
            .blocks
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string());

        let block = Block::new(self.block_counter, now, previous_hash, vec![transaction]);
        self.block_counter += 1;

        debug!(index = block.index, hash = %block.hash, "block appended");
        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    /// Overwrites one transaction field in place without touching any hash.
    ///
    /// The block's stored hash goes stale until [`Chain::update_block_hash`]
    /// or [`Chain::recalculate_all_hashes`] runs.
    pub fn edit_transaction_field(
        &mut self,
        block_index: usize,
        tx_index: usize,
        field: TxField,
        raw_value: &str,
    ) -> Result<(), LedgerError> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(block_index)
            .ok_or(LedgerError::BlockOutOfRange {
                index: block_index,
                len,
            })?;
        let tx_len = block.transactions.len();
        let tx = block
            .transactions
            .get_mut(tx_index)
            .ok_or(LedgerError::TransactionOutOfRange {
                block_index,
                tx_index,
                len: tx_len,
            })?;

        tx.set_field(field, raw_value);
        debug!(block_index, tx_index, %field, "transaction field edited");
        Ok(())
    }

    /// Recomputes and stores the hash of one block. Returns the new hash.
    pub fn update_block_hash(&mut self, block_index: usize) -> Result<&str, LedgerError> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(block_index)
            .ok_or(LedgerError::BlockOutOfRange {
                index: block_index,
                len,
            })?;
        Ok(block.reseal())
    }

    /// Recomputes every block's stored hash in index order.
    ///
    /// `previous_hash` links are left untouched, so after an edit the
    /// rehashed block no longer matches its successor's link.
    pub fn recalculate_all_hashes(&mut self) {
        for block in &mut self.blocks {
            block.reseal();
        }
        debug!(blocks = self.blocks.len(), "all block hashes recalculated");
    }

    /// Checks every block's hash and forward link. Read-only.
    pub fn verify(&self) -> ChainVerification {
        let blocks: Vec<BlockVerdict> = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let computed_hash = block.compute_hash();
                let hash_matches = block.hash == computed_hash;
                let chain_intact = self
                    .blocks
                    .get(i + 1)
                    .map_or(true, |next| next.previous_hash == block.hash);
                BlockVerdict {
                    index: block.index,
                    stored_hash: block.hash.clone(),
                    computed_hash,
                    hash_matches,
                    chain_intact,
                    valid: hash_matches && chain_intact,
                }
            })
            .collect();

        let overall_valid = blocks.iter().all(|v| v.valid);
        if !overall_valid {
            let invalid = blocks.iter().filter(|v| !v.valid).count();
            warn!(invalid, blocks = blocks.len(), "chain verification failed");
        }

        ChainVerification {
            blocks,
            overall_valid,
        }
    }

    /// Returns every block in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the block at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Mutable access to a block, for simulating tampering beyond field edits.
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Returns the latest block, if any.
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` when no block has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index the next appended block will receive.
    pub fn block_counter(&self) -> u64 {
        self.block_counter
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "1/1/2026, 12:00:00 AM";

    fn tx(sender: &str, amount: f64) -> Transaction {
        Transaction::new(sender, "B", amount, TS)
    }

    fn chain_of(n: usize) -> Chain {
        let mut chain = Chain::new();
        for i in 0..n {
            chain.append(tx("A", i as f64 + 1.0), TS);
        }
        chain
    }

    #[test]
    fn append_links_and_indexes_sequentially() {
        let chain = chain_of(3);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.block_counter(), 3);
        assert_eq!(chain.blocks()[0].previous_hash, "0");
        for (i, block) in chain.blocks().iter().enumerate() {
            assert_eq!(block.index, i as u64);
            if i > 0 {
                assert_eq!(block.previous_hash, chain.blocks()[i - 1].hash);
            }
        }
        assert_eq!(chain.tip().unwrap().index, 2);
    }

    #[test]
    fn untouched_chain_verifies() {
        let report = chain_of(4).verify();
        assert!(report.overall_valid);
        assert_eq!(report.blocks.len(), 4);
        assert!(report.blocks.iter().all(|v| v.valid));
    }

    #[test]
    fn empty_chain_is_valid() {
        let report = Chain::new().verify();
        assert!(report.overall_valid);
        assert!(report.blocks.is_empty());
    }

    #[test]
    fn edit_without_rehash_breaks_hash_match() {
        let mut chain = chain_of(3);
        chain
            .edit_transaction_field(1, 0, TxField::Amount, "$500")
            .unwrap();

        let report = chain.verify();
        assert!(!report.overall_valid);
        assert!(!report.blocks[1].hash_matches);
        assert!(report.blocks[1].chain_intact);
        assert!(report.blocks[0].valid);
        assert!(report.blocks[2].valid);
        assert_eq!(report.invalid_indices(), vec![1]);
    }

    #[test]
    fn rehash_moves_break_to_link() {
        let mut chain = chain_of(3);
        chain
            .edit_transaction_field(1, 0, TxField::Sender, "Mallory")
            .unwrap();
        chain.recalculate_all_hashes();

        let report = chain.verify();
        assert!(report.blocks[1].hash_matches);
        assert!(!report.blocks[1].chain_intact);
        assert!(!report.blocks[1].valid);
        assert!(!report.overall_valid);
    }

    #[test]
    fn relinking_successor_repairs_chain() {
        let mut chain = chain_of(3);
        chain
            .edit_transaction_field(1, 0, TxField::Receiver, "Eve")
            .unwrap();
        chain.recalculate_all_hashes();

        let new_hash = chain.blocks()[1].hash.clone();
        let next = chain.block_mut(2).unwrap();
        next.previous_hash = new_hash;
        next.reseal();

        assert!(chain.verify().overall_valid);
    }

    #[test]
    fn edit_on_last_block_only_breaks_hash() {
        let mut chain = chain_of(2);
        chain.edit_transaction_field(1, 0, TxField::Amount, "7").unwrap();
        chain.recalculate_all_hashes();
        assert!(chain.verify().overall_valid);
    }

    #[test]
    fn recalculate_is_idempotent() {
        let mut chain = chain_of(3);
        chain.edit_transaction_field(0, 0, TxField::Amount, "9").unwrap();
        chain.recalculate_all_hashes();
        let first: Vec<String> = chain.blocks().iter().map(|b| b.hash.clone()).collect();
        chain.recalculate_all_hashes();
        let second: Vec<String> = chain.blocks().iter().map(|b| b.hash.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn verify_does_not_mutate() {
        let mut chain = chain_of(2);
        chain.edit_transaction_field(0, 0, TxField::Amount, "99").unwrap();
        let before = chain.clone();
        let _ = chain.verify();
        assert_eq!(chain, before);
    }

    #[test]
    fn update_single_block_hash() {
        let mut chain = chain_of(2);
        chain.edit_transaction_field(0, 0, TxField::Amount, "42").unwrap();
        let new_hash = chain.update_block_hash(0).unwrap().to_string();
        assert_eq!(chain.blocks()[0].hash, new_hash);
        assert!(chain.verify().blocks[0].hash_matches);
    }

    #[test]
    fn out_of_range_edits_are_errors() {
        let mut chain = chain_of(1);
        assert_eq!(
            chain.edit_transaction_field(5, 0, TxField::Sender, "x"),
            Err(LedgerError::BlockOutOfRange { index: 5, len: 1 })
        );
        assert_eq!(
            chain.edit_transaction_field(0, 3, TxField::Sender, "x"),
            Err(LedgerError::TransactionOutOfRange {
                block_index: 0,
                tx_index: 3,
                len: 1
            })
        );
        assert!(chain.update_block_hash(1).is_err());
    }
}
