//! # Ledger Controller
//!
//! [`LedgerSimulator`] is the single owner of simulation state and the only
//! surface a view needs. Views translate user actions into the mutators
//! below and repaint from the accessors; they never hash or validate
//! anything themselves.
//!
//! | User action              | Mutator                          |
//! |--------------------------|----------------------------------|
//! | submit the form          | [`LedgerSimulator::submit_transaction`] |
//! | edit a transaction field | [`LedgerSimulator::edit_field`]  |
//! | press "verify"           | [`LedgerSimulator::request_verify`] |
//! | press "check consensus"  | [`LedgerSimulator::request_consensus_check`] |
//! | pick a participant       | [`LedgerSimulator::switch_active_participant`] |
//!
//! Timestamps come from a [`Clock`] so tests and demos can pin them.

use tracing::{debug, info};

use crate::config::{NetworkConfig, TIMESTAMP_FORMAT};
use crate::error::LedgerError;
use crate::network::{evaluate_consensus, ConsensusReport, Network, Participant, ParticipantSummary};
use crate::storage::{Block, Chain, ChainVerification};
use crate::transaction::{parse_amount, Transaction, TxField};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of human-readable timestamps.
pub trait Clock {
    /// Current time, formatted for display and hashing.
    fn now(&self) -> String;
}

/// Local wall-clock time in en-US locale form (`3/14/2026, 9:05:07 PM`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// A clock that always reports the same timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl FixedClock {
    /// Creates a clock pinned to `timestamp`.
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// LedgerSimulator
// ---------------------------------------------------------------------------

/// Controller owning the network and the latest check results.
#[derive(Debug)]
pub struct LedgerSimulator<C: Clock = SystemClock> {
    network: Network,
    clock: C,
    last_verification: Option<ChainVerification>,
    last_consensus: Option<ConsensusReport>,
}

impl LedgerSimulator<SystemClock> {
    /// Creates a simulator stamped with local wall-clock time.
    pub fn new(config: &NetworkConfig) -> Result<Self, LedgerError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> LedgerSimulator<C> {
    /// Creates a simulator using `clock` for timestamps.
    pub fn with_clock(config: &NetworkConfig, clock: C) -> Result<Self, LedgerError> {
        Ok(Self {
            network: Network::new(config)?,
            clock,
            last_verification: None,
            last_consensus: None,
        })
    }

    // -- Mutators -----------------------------------------------------------

    /// Validates the form fields and broadcasts the transaction.
    ///
    /// All three inputs are trimmed and must be non-empty; otherwise nothing
    /// is created. A non-numeric amount is accepted as `0`. Returns the block
    /// appended to the active participant's chain.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: &str,
    ) -> Result<&Block, LedgerError> {
        let sender = sender.trim();
        let receiver = receiver.trim();
        let amount = amount.trim();

        if sender.is_empty() {
            return Err(LedgerError::MissingField("sender"));
        }
        if receiver.is_empty() {
            return Err(LedgerError::MissingField("receiver"));
        }
        if amount.is_empty() {
            return Err(LedgerError::MissingField("amount"));
        }

        let now = self.clock.now();
        // Non-numeric input is stored as 0, never NaN, same as an edit.
        let transaction = Transaction::new(sender, receiver, parse_amount(amount), now.as_str());
        self.network.broadcast(&transaction, &now);
        self.last_verification = None;

        let chain = self.network.active_chain();
        chain
            .tip()
            .ok_or(LedgerError::BlockOutOfRange { index: 0, len: 0 })
    }

    /// Edits a transaction on the active chain, then rehashes that chain.
    ///
    /// Only the active participant's chain changes, which is how a single
    /// participant is made to diverge from the rest.
    pub fn edit_field(
        &mut self,
        block_index: usize,
        tx_index: usize,
        field: TxField,
        raw_value: &str,
    ) -> Result<(), LedgerError> {
        let participant = self.network.active_mut();
        participant
            .chain
            .edit_transaction_field(block_index, tx_index, field, raw_value)?;
        participant.chain.recalculate_all_hashes();
        self.last_verification = None;

        info!(
            participant = %participant.id,
            block_index,
            tx_index,
            %field,
            "transaction edited and chain rehashed"
        );
        Ok(())
    }

    /// Verifies the active chain and keeps the report for the view.
    pub fn request_verify(&mut self) -> &ChainVerification {
        let report = self.network.active_chain().verify();
        info!(
            participant = %self.network.active_id(),
            valid = report.overall_valid,
            blocks = report.blocks.len(),
            "chain verified"
        );
        self.last_verification.insert(report)
    }

    /// Evaluates consensus across all participants, updating statuses.
    pub fn request_consensus_check(&mut self) -> &ConsensusReport {
        let report = evaluate_consensus(&mut self.network);
        self.last_consensus.insert(report)
    }

    /// Changes which participant's chain is on display.
    pub fn switch_active_participant(&mut self, id: &str) -> Result<(), LedgerError> {
        self.network.switch_active(id)?;
        self.last_verification = None;
        debug!(participant = id, "view switched");
        Ok(())
    }

    // -- Accessors ----------------------------------------------------------

    /// The chain currently on display.
    pub fn active_chain(&self) -> &Chain {
        self.network.active_chain()
    }

    /// The participant currently on display.
    pub fn active_participant(&self) -> &Participant {
        self.network.active()
    }

    /// Summaries of every participant, in creation order.
    pub fn participants(&self) -> Vec<ParticipantSummary> {
        self.network.summaries()
    }

    /// Verification report for the active chain, if one is still current.
    pub fn last_verification(&self) -> Option<&ChainVerification> {
        self.last_verification.as_ref()
    }

    /// Report from the most recent consensus check.
    pub fn last_consensus(&self) -> Option<&ConsensusReport> {
        self.last_consensus.as_ref()
    }

    /// The underlying network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutable access to the network, for scripted tampering outside the
    /// active view.
    pub fn network_mut(&mut self) -> &mut Network {
        self.last_verification = None;
        &mut self.network
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
