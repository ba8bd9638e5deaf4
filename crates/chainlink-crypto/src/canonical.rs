//! Canonical block encoding.
//!
//! The digest input for a block is compact JSON with keys in this fixed order:
//!
//! | key             | encoding                                              |
//! |-----------------|-------------------------------------------------------|
//! | `index`         | number                                                |
//! | `timestamp`     | RFC 3339, UTC, nanosecond precision, `Z` suffix       |
//! | `order_id`      | string                                                |
//! | `location`      | string                                                |
//! | `actor`         | string                                                |
//! | `action`        | display string of the action                          |
//! | `details`       | object, keys in byte order                            |
//! | `previous_hash` | 64 lowercase hex characters                           |
//!
//! The bytes are hashed with [`ContentHasher::BLOCK`], i.e. prefixed with
//! `chainlink-block-v1:`.

use std::collections::BTreeMap;

use chainlink_types::{BlockHash, OrderEvent};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::hasher::{ContentHasher, HasherError};

#[derive(Serialize)]
struct CanonicalBlock<'a> {
    index: u64,
    timestamp: String,
    order_id: &'a str,
    location: &'a str,
    actor: &'a str,
    action: &'a str,
    details: &'a BTreeMap<String, String>,
    previous_hash: BlockHash,
}

/// Format a timestamp the way the canonical encoding does.
pub fn canonical_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Encode block fields into canonical bytes.
///
/// `payload.timestamp` is ignored; the block-level `timestamp` is authoritative.
pub fn canonical_bytes(
    index: u64,
    timestamp: &DateTime<Utc>,
    payload: &OrderEvent,
    previous_hash: &BlockHash,
) -> Result<Vec<u8>, HasherError> {
    let canonical = CanonicalBlock {
        index,
        timestamp: canonical_timestamp(timestamp),
        order_id: &payload.order_id,
        location: &payload.location,
        actor: &payload.actor,
        action: payload.action.as_str(),
        details: &payload.details,
        previous_hash: *previous_hash,
    };
    serde_json::to_vec(&canonical).map_err(|e| HasherError::Serialization(e.to_string()))
}

/// Digest of a block's canonical encoding.
pub fn block_digest(
    index: u64,
    timestamp: &DateTime<Utc>,
    payload: &OrderEvent,
    previous_hash: &BlockHash,
) -> Result<BlockHash, HasherError> {
    let bytes = canonical_bytes(index, timestamp, payload, previous_hash)?;
    Ok(ContentHasher::BLOCK.hash(&bytes))
}
