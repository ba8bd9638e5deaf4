//! Demonstration-only field overwrites.
//!
//! Nothing here recomputes `Block::hash`.

use std::fmt;
use std::str::FromStr;

use chainlink_crypto::canonical_timestamp;
use chainlink_types::{Action, BlockHash};
use chrono::{DateTime, Utc};

use crate::block::Block;
use crate::error::LedgerError;

/// A writable field of a stored block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockField {
    OrderId,
    Location,
    Actor,
    Action,
    Timestamp,
    PreviousHash,
    /// One entry of `details`, by key.
    Detail(String),
}

impl fmt::Display for BlockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderId => f.write_str("order_id"),
            Self::Location => f.write_str("location"),
            Self::Actor => f.write_str("actor"),
            Self::Action => f.write_str("action"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::PreviousHash => f.write_str("previous_hash"),
            Self::Detail(key) => write!(f, "details.{key}"),
        }
    }
}

impl FromStr for BlockField {
    type Err = LedgerError;

    /// Accepts the canonical field names and `details.<key>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(key) = s.strip_prefix("details.") {
            if key.is_empty() {
                return Err(LedgerError::UnknownField(s.to_string()));
            }
            return Ok(Self::Detail(key.to_string()));
        }
        match s {
            "order_id" => Ok(Self::OrderId),
            "location" => Ok(Self::Location),
            "actor" => Ok(Self::Actor),
            "action" => Ok(Self::Action),
            "timestamp" => Ok(Self::Timestamp),
            "previous_hash" => Ok(Self::PreviousHash),
            other => Err(LedgerError::UnknownField(other.to_string())),
        }
    }
}

impl BlockField {
    /// Current value of this field on `block`, in the same textual form
    /// [`BlockField::overwrite`] accepts. A missing detail reads as `""`.
    pub fn read(&self, block: &Block) -> String {
        match self {
            Self::OrderId => block.payload.order_id.clone(),
            Self::Location => block.payload.location.clone(),
            Self::Actor => block.payload.actor.clone(),
            Self::Action => block.payload.action.to_string(),
            Self::Timestamp => canonical_timestamp(&block.timestamp),
            Self::PreviousHash => block.previous_hash.to_hex(),
            Self::Detail(key) => block.payload.details.get(key).cloned().unwrap_or_default(),
        }
    }

    /// Overwrite this field on `block` from its textual form.
    ///
    /// An empty value for a detail removes the key. On a parse error the block
    /// is left untouched.
    pub fn overwrite(&self, block: &mut Block, value: &str) -> Result<(), LedgerError> {
        match self {
            Self::OrderId => block.payload.order_id = value.to_string(),
            Self::Location => block.payload.location = value.to_string(),
            Self::Actor => block.payload.actor = value.to_string(),
            Self::Action => block.payload.action = Action::from(value),
            Self::Timestamp => {
                let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|e| {
                    LedgerError::InvalidTamperValue {
                        field: self.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                block.timestamp = parsed.with_timezone(&Utc);
            }
            Self::PreviousHash => {
                block.previous_hash =
                    BlockHash::from_hex(value).map_err(|e| LedgerError::InvalidTamperValue {
                        field: self.to_string(),
                        reason: e.to_string(),
                    })?;
            }
            Self::Detail(key) => {
                if value.is_empty() {
                    block.payload.details.remove(key);
                } else {
                    block.payload.details.insert(key.clone(), value.to_string());
                }
            }
        }
        Ok(())
    }
}
