//! # Hashing Primitives
//!
//! The only cryptography in the simulation is a one-way digest: blocks are
//! sealed with it and chains are summarised with it for consensus. There
//! are no keys, no signatures, and no identity. Tampering is made visible
//! purely through digest mismatches.

pub mod hash;

pub use hash::{canonical_json, hash_canonical, js_number_string, sha256, sha256_hex};
