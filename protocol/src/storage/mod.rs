//! # Storage Module
//!
//! In-memory ledger structures. Nothing here is persisted: a chain lives as
//! long as the process that built it.
//!
//! ## Architecture
//!
//! ```text
//! block.rs  — Block structure, canonical projection, block hash
//! chain.rs  — Ordered blocks: append, tamper, rehash, verify
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! Transaction → Block (sealed) → Chain
//!                    ↑              │
//!          edit + rehash ───────────┘
//! ```
//!
//! A block's hash is sealed at append time but can be recomputed in place
//! after its transactions are edited. `previousHash` links are copied once
//! at append time and never recomputed, which is exactly what makes an edit
//! visible to verification.

pub mod block;
pub mod chain;

pub use block::{Block, BlockProjection};
pub use chain::{BlockVerdict, Chain, ChainVerification};
