use chainlink_crypto::{block_digest, ChainLink, HasherError};
use chainlink_types::{Action, BlockHash, OrderEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Order id carried by the genesis block.
pub const GENESIS_ORDER_ID: &str = "GENESIS";

/// One record in the chain.
///
/// Fields serialize in canonical order (payload flattened), followed by the
/// stored `hash`. The hash is computed once in [`Block::new`] and never
/// refreshed; anything that edits a field afterwards leaves it stale on
/// purpose.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: OrderEvent,
    pub previous_hash: BlockHash,
    pub hash: BlockHash,
}

impl Block {
    /// Build a block and seal it with its digest.
    ///
    /// The payload's own `timestamp` override is dropped; `timestamp` is the
    /// authoritative event time.
    pub fn new(
        index: u64,
        timestamp: DateTime<Utc>,
        mut payload: OrderEvent,
        previous_hash: BlockHash,
    ) -> Result<Self, LedgerError> {
        payload.timestamp = None;
        let hash = block_digest(index, &timestamp, &payload, &previous_hash)?;
        Ok(Self {
            index,
            timestamp,
            payload,
            previous_hash,
            hash,
        })
    }

    /// The genesis block: sentinel previous hash and a marker payload.
    pub fn genesis(timestamp: DateTime<Utc>) -> Result<Self, LedgerError> {
        let payload = OrderEvent::new(
            GENESIS_ORDER_ID,
            "System",
            "system",
            Action::Other("Chain Initialized".into()),
        );
        Self::new(0, timestamp, payload, BlockHash::ZERO)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.payload.order_id == GENESIS_ORDER_ID
    }

    /// Digest of the block's current fields. Does not touch `hash`.
    pub fn recompute_hash(&self) -> Result<BlockHash, LedgerError> {
        Ok(self.digest_over(&self.previous_hash)?)
    }
}

impl ChainLink for Block {
    fn stored_hash(&self) -> BlockHash {
        self.hash
    }

    fn previous_hash(&self) -> BlockHash {
        self.previous_hash
    }

    fn digest_over(&self, previous_hash: &BlockHash) -> Result<BlockHash, HasherError> {
        block_digest(self.index, &self.timestamp, &self.payload, previous_hash)
    }
}
