// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # LedgerLab Protocol — Core Library
//!
//! A teaching ledger: blocks chained by SHA-256, a handful of simulated
//! participants each holding their own copy, and a majority vote over
//! those copies. Nothing is networked or persisted. The point is to make
//! tampering visible, first as a hash mismatch and then as a broken link,
//! and finally as a participant the rest of the network outvotes.
//!
//! ## Architecture
//!
//! - **crypto** — SHA-256 over canonical JSON projections.
//! - **transaction** — The transfer payload and lenient amount parsing.
//! - **storage** — Blocks and per-participant chains: append, edit, rehash, verify.
//! - **network** — The fixed participant set, broadcast, and majority consensus.
//! - **controller** — `LedgerSimulator`, the surface a view drives.
//! - **config** — Constants and `NetworkConfig`.
//! - **error** — `LedgerError`.
//!
//! ## Example
//!
//! ```
//! use ledgerlab_protocol::config::NetworkConfig;
//! use ledgerlab_protocol::controller::{FixedClock, LedgerSimulator};
//!
//! let mut sim = LedgerSimulator::with_clock(
//!     &NetworkConfig::default(),
//!     FixedClock::new("1/1/2026, 12:00:00 AM"),
//! )
//! .unwrap();
//! sim.submit_transaction("A", "B", "10").unwrap();
//!
//! let report = sim.request_consensus_check();
//! assert!(report.unanimous);
//! assert_eq!(report.majority_group.len(), 5);
//! ```

pub mod config;
pub mod controller;
pub mod crypto;
pub mod error;
pub mod network;
pub mod storage;
pub mod transaction;

pub use controller::{Clock, FixedClock, LedgerSimulator, SystemClock};
pub use error::LedgerError;
