use std::fmt;
use std::iter::FusedIterator;

use chainlink_types::BlockHash;
use serde::{Deserialize, Serialize};

use crate::hasher::HasherError;

/// Trait for records that participate in a hash chain.
pub trait ChainLink {
    /// The digest stored on the record at creation time.
    fn stored_hash(&self) -> BlockHash;
    /// The predecessor digest stored on the record.
    fn previous_hash(&self) -> BlockHash;
    /// Recompute this record's digest as if its predecessor digest were
    /// `previous_hash`, using every other stored field as-is.
    fn digest_over(&self, previous_hash: &BlockHash) -> Result<BlockHash, HasherError>;
}

/// Why a block failed verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The stored hash does not match the block's own recomputed digest.
    HashMismatch,
    /// The stored previous hash does not match the predecessor's recomputed digest.
    LinkMismatch,
    /// The genesis block's previous hash is not the all-zero sentinel.
    SentinelMismatch,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HashMismatch => "hash_mismatch",
            Self::LinkMismatch => "link_mismatch",
            Self::SentinelMismatch => "sentinel_mismatch",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking a single block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCheck {
    pub index: u64,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl BlockCheck {
    pub fn passed(index: u64) -> Self {
        Self {
            index,
            ok: true,
            reason: None,
        }
    }

    pub fn failed(index: u64, reason: FailureReason) -> Self {
        Self {
            index,
            ok: false,
            reason: Some(reason),
        }
    }
}

/// Full verification outcome for a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub valid: bool,
    /// Index of the first failing block, `None` when the chain is valid.
    pub first_failure: Option<u64>,
    pub checks: Vec<BlockCheck>,
}

impl VerificationReport {
    pub fn from_checks(checks: impl IntoIterator<Item = BlockCheck>) -> Self {
        let checks: Vec<BlockCheck> = checks.into_iter().collect();
        let first_failure = checks.iter().find(|c| !c.ok).map(|c| c.index);
        Self {
            valid: first_failure.is_none(),
            first_failure,
            checks,
        }
    }

    /// Returns `true` if every block passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn failures(&self) -> impl Iterator<Item = &BlockCheck> {
        self.checks.iter().filter(|c| !c.ok)
    }
}

/// Lazy hash chain verifier.
///
/// Yields one [`BlockCheck`] per record, in order. Each record is checked
/// twice: its stored hash against its own recomputed digest, and its stored
/// previous hash against the predecessor's *recomputed* digest (the all-zero
/// sentinel for the first record). The recomputed digest carried forward uses
/// the expected predecessor digest, so a single altered record makes every
/// later record report [`FailureReason::LinkMismatch`].
///
/// Never writes to the records. Clone the verifier or create a new one to
/// restart.
pub struct ChainVerifier<'a, L> {
    links: &'a [L],
    position: usize,
    expected_prev: BlockHash,
}

impl<L> Clone for ChainVerifier<'_, L> {
    fn clone(&self) -> Self {
        Self {
            links: self.links,
            position: self.position,
            expected_prev: self.expected_prev,
        }
    }
}

impl<'a, L: ChainLink> ChainVerifier<'a, L> {
    pub fn new(links: &'a [L]) -> Self {
        Self {
            links,
            position: 0,
            expected_prev: BlockHash::ZERO,
        }
    }

    /// Consume the remaining checks into a report.
    pub fn report(self) -> VerificationReport {
        VerificationReport::from_checks(self)
    }
}

impl<L: ChainLink> Iterator for ChainVerifier<'_, L> {
    type Item = BlockCheck;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.links.get(self.position)?;
        let index = self.position as u64;
        let stored = link.stored_hash();
        let previous = link.previous_hash();

        let own = link.digest_over(&previous);
        let hash_ok = matches!(&own, Ok(h) if *h == stored);
        let link_ok = previous == self.expected_prev;

        let recomputed = if link_ok {
            own
        } else {
            link.digest_over(&self.expected_prev)
        };
        self.expected_prev = recomputed.unwrap_or(stored);
        self.position += 1;

        let check = if !hash_ok {
            BlockCheck::failed(index, FailureReason::HashMismatch)
        } else if !link_ok && index == 0 {
            BlockCheck::failed(index, FailureReason::SentinelMismatch)
        } else if !link_ok {
            BlockCheck::failed(index, FailureReason::LinkMismatch)
        } else {
            BlockCheck::passed(index)
        };
        Some(check)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.links.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl<L: ChainLink> ExactSizeIterator for ChainVerifier<'_, L> {}

impl<L: ChainLink> FusedIterator for ChainVerifier<'_, L> {}
