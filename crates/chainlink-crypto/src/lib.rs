//! Hashing primitives for the Chainlink order ledger.
//!
//! Provides domain-separated BLAKE3 hashing, the canonical block encoding used
//! as digest input, and a lazy hash chain verifier.

pub mod canonical;
pub mod chain;
pub mod hasher;

pub use canonical::{block_digest, canonical_bytes, canonical_timestamp};
pub use chain::{BlockCheck, ChainLink, ChainVerifier, FailureReason, VerificationReport};
pub use hasher::{ContentHasher, HasherError};
