//! # Transaction Module
//!
//! The payload carried by every block: who paid whom, how much, and when.
//! Transactions are plain data. They carry no signature or id, and the
//! only validation is the controller's "all fields present" check at submit
//! time.
//!
//! ## Editing
//!
//! Transactions stay mutable after they are sealed into a block. Editing a
//! field through [`TxField`] is how tampering is simulated; amounts are parsed
//! leniently with [`parse_amount`] so a half-typed edit never fails.

pub mod types;

pub use types::{format_amount, parse_amount, Transaction, TxField};
