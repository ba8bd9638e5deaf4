//! Append-only order event ledger for Chainlink.
//!
//! This crate provides:
//! - [`Block`] records sealed with a BLAKE3 digest of their canonical encoding
//! - [`Chain`]: initialize, append, lazy verification, lookup
//! - Demonstration tampering through [`BlockField`]
//! - Order journeys and chain summaries
//! - JSON snapshot files

pub mod block;
pub mod chain;
pub mod error;
pub mod journey;
pub mod snapshot;
pub mod tamper;

pub use block::{Block, GENESIS_ORDER_ID};
pub use chain::Chain;
pub use chainlink_crypto::{BlockCheck, ChainVerifier, FailureReason, VerificationReport};
pub use error::LedgerError;
pub use journey::{ChainSummary, Journey, JourneyStop};
pub use tamper::BlockField;
