//! # Simulated Network
//!
//! The `Network` owns every participant and decides which one is currently
//! on display. It is created once with a fixed participant count; there is
//! no join or leave.
//!
//! ```text
//! broadcast(tx) ──► node-1.chain.append(tx)
//!               ├─► node-2.chain.append(tx)
//!               └─► ...              (creation order, same tx + timestamp)
//! ```
//!
//! Each participant extends its own chain from its own tip, so a chain that
//! was tampered with keeps diverging from the others on every later block.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::participant::{Participant, ParticipantSummary};
use crate::config::{participant_display_name, participant_id, NetworkConfig};
use crate::error::LedgerError;
use crate::storage::Chain;
use crate::transaction::Transaction;

/// A fixed set of participants with one active view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Participants in creation order.
    participants: Vec<Participant>,
    /// Position of the active participant in `participants`.
    active: usize,
}

impl Network {
    /// Builds a network of empty chains. The first participant is active.
    pub fn new(config: &NetworkConfig) -> Result<Self, LedgerError> {
        config.validate()?;

        let participants: Vec<Participant> = (0..config.participant_count)
            .map(|i| Participant::new(participant_id(i), participant_display_name(i)))
            .collect();

        info!(participants = participants.len(), "network initialized");

        Ok(Self {
            participants,
            active: 0,
        })
    }

    /// Appends `transaction` to every participant's chain, stamped with `now`.
    ///
    /// Every participant links the new block to its own tip. Returns the
    /// number of chains extended.
    pub fn broadcast(&mut self, transaction: &Transaction, now: &str) -> usize {
        for participant in &mut self.participants {
            let block = participant.chain.append(transaction.clone(), now);
            debug!(participant = %participant.id, index = block.index, "broadcast delivered");
        }

        info!(
            participants = self.participants.len(),
            sender = %transaction.sender,
            receiver = %transaction.receiver,
            amount = transaction.amount,
            "transaction broadcast"
        );
        self.participants.len()
    }

    /// Makes the participant with `id` the current view.
    pub fn switch_active(&mut self, id: &str) -> Result<(), LedgerError> {
        let position = self
            .position(id)
            .ok_or_else(|| LedgerError::UnknownParticipant(id.to_string()))?;
        self.active = position;
        debug!(participant = id, "active participant switched");
        Ok(())
    }

    /// The participant currently on display.
    pub fn active(&self) -> &Participant {
        &self.participants[self.active]
    }

    /// Mutable access to the participant currently on display.
    pub fn active_mut(&mut self) -> &mut Participant {
        &mut self.participants[self.active]
    }

    /// Id of the participant currently on display.
    pub fn active_id(&self) -> &str {
        &self.active().id
    }

    /// Chain of the participant currently on display.
    pub fn active_chain(&self) -> &Chain {
        &self.active().chain
    }

    /// Looks up a participant by id.
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Looks up a participant by id for mutation.
    pub fn participant_mut(&mut self, id: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// All participants in creation order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// All participants in creation order, mutable.
    pub fn participants_mut(&mut self) -> &mut [Participant] {
        &mut self.participants
    }

    /// View summaries for every participant, in creation order.
    pub fn summaries(&self) -> Vec<ParticipantSummary> {
        self.participants
            .iter()
            .enumerate()
            .map(|(i, p)| p.summary(i == self.active))
            .collect()
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Always `false`: a network is never built without participants.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "1/1/2026, 12:00:00 AM";

    fn network(n: usize) -> Network {
        Network::new(&NetworkConfig::with_participants(n)).unwrap()
    }

    #[test]
    fn creates_named_participants_in_order() {
        let net = network(3);
        let ids: Vec<&str> = net.participants().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["node-1", "node-2", "node-3"]);
        assert_eq!(net.active_id(), "node-1");
        assert!(!net.is_empty());
    }

    #[test]
    fn zero_participants_is_an_error() {
        assert_eq!(
            Network::new(&NetworkConfig::with_participants(0)),
            Err(LedgerError::InvalidParticipantCount(0))
        );
    }

    #[test]
    fn broadcast_extends_every_chain_identically() {
        let mut net = network(4);
        let tx = Transaction::new("A", "B", 10.0, TS);
        assert_eq!(net.broadcast(&tx, TS), 4);
        net.broadcast(&tx, TS);

        let reference = net.participants()[0].chain.clone();
        assert_eq!(reference.len(), 2);
        for p in net.participants() {
            assert_eq!(p.chain, reference);
            assert_eq!(p.block_counter(), 2);
        }
    }

    #[test]
    fn broadcast_uses_each_participants_own_tip() {
        let mut net = network(2);
        let tx = Transaction::new("A", "B", 10.0, TS);
        net.broadcast(&tx, TS);

        let tampered = net.participant_mut("node-2").unwrap();
        tampered
            .chain
            .edit_transaction_field(0, 0, crate::transaction::TxField::Amount, "1")
            .unwrap();
        tampered.chain.recalculate_all_hashes();

        net.broadcast(&tx, TS);
        let honest = &net.participants()[0].chain;
        let forked = &net.participants()[1].chain;
        assert_eq!(forked.blocks()[1].previous_hash, forked.blocks()[0].hash);
        assert_ne!(honest.blocks()[1].previous_hash, forked.blocks()[1].previous_hash);
    }

    #[test]
    fn switch_active_changes_view_only() {
        let mut net = network(3);
        net.broadcast(&Transaction::new("A", "B", 1.0, TS), TS);
        let before = net.participants().to_vec();

        net.switch_active("node-3").unwrap();
        assert_eq!(net.active_id(), "node-3");
        assert_eq!(net.active_chain().len(), 1);
        assert_eq!(net.participants(), before.as_slice());

        let summaries = net.summaries();
        assert!(summaries[2].active);
        assert!(!summaries[0].active);
    }

    #[test]
    fn switch_to_unknown_participant_fails() {
        let mut net = network(2);
        assert_eq!(
            net.switch_active("node-9"),
            Err(LedgerError::UnknownParticipant("node-9".into()))
        );
        assert_eq!(net.active_id(), "node-1");
    }

    #[test]
    fn active_view_tracks_broadcasts() {
        let mut net = network(2);
        net.switch_active("node-2").unwrap();
        net.broadcast(&Transaction::new("A", "B", 1.0, TS), TS);
        assert_eq!(net.active_chain().len(), 1);
    }
}
