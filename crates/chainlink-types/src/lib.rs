//! Foundation types for the Chainlink order ledger.
//!
//! # Key Types
//!
//! - [`BlockHash`] — 32-byte block digest, hex on the wire, all-zero genesis sentinel
//! - [`OrderEvent`] — payload of one block: an order, a location, an actor, an action
//! - [`Action`] — well-known fulfilment steps plus free text

pub mod digest;
pub mod error;
pub mod event;

pub use digest::{BlockHash, DIGEST_LEN};
pub use error::TypeError;
pub use event::{Action, OrderEvent};
