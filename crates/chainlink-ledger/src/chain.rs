use chainlink_crypto::{ChainVerifier, VerificationReport};
use chainlink_types::OrderEvent;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::error::LedgerError;
use crate::tamper::BlockField;

/// Append-only, hash-linked sequence of order event blocks.
///
/// Always holds at least the genesis block. Writers need `&mut Chain`, so a
/// single owner serializes appends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a chain whose genesis block is stamped with the current time.
    pub fn initialize() -> Self {
        Self::initialize_at(Utc::now())
    }

    /// Start a chain with a fixed genesis timestamp.
    pub fn initialize_at(timestamp: DateTime<Utc>) -> Self {
        // Canonical encoding of string fields and a string map cannot fail.
        let genesis = match Block::genesis(timestamp) {
            Ok(block) => block,
            Err(err) => unreachable!("genesis block encoding failed: {err}"),
        };
        info!(hash = %genesis.hash.short_hex(), "chain initialized");
        Self {
            blocks: vec![genesis],
        }
    }

    /// Rebuild a chain from stored blocks without recomputing anything.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, LedgerError> {
        if blocks.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        Ok(Self { blocks })
    }

    /// Append an order event and return the sealed block.
    ///
    /// The event must name an order, an actor and an action. Its timestamp
    /// defaults to now. The new block's index is its position, whatever the
    /// stored tail claims. On error the chain is unchanged.
    pub fn append(&mut self, event: OrderEvent) -> Result<Block, LedgerError> {
        if let Some(field) = event.missing_field() {
            return Err(LedgerError::InvalidPayload { field });
        }

        let index = self.len();
        let previous_hash = self.head().hash;
        let timestamp = event.timestamp.unwrap_or_else(Utc::now);

        let block = Block::new(index, timestamp, event, previous_hash)?;
        debug!(
            index,
            order_id = %block.payload.order_id,
            action = %block.payload.action,
            hash = %block.hash.short_hex(),
            "block appended"
        );
        self.blocks.push(block.clone());
        Ok(block)
    }

    /// Lazily check every block. Restart by calling again.
    pub fn verify(&self) -> ChainVerifier<'_, Block> {
        ChainVerifier::new(&self.blocks)
    }

    /// Run [`Chain::verify`] to completion.
    pub fn report(&self) -> VerificationReport {
        let report = self.verify().report();
        if let Some(index) = report.first_failure {
            warn!(
                first_failure = index,
                failures = report.failures().count(),
                "chain integrity check failed"
            );
        }
        report
    }

    /// Returns `true` when every block verifies.
    pub fn is_valid(&self) -> bool {
        self.verify().all(|check| check.ok)
    }

    /// Overwrite one field of a stored block without touching its hash.
    ///
    /// Demonstration only. Returns the previous value in textual form, so
    /// writing it back restores the block exactly.
    pub fn tamper(
        &mut self,
        index: u64,
        field: BlockField,
        value: &str,
    ) -> Result<String, LedgerError> {
        let len = self.len();
        let block = usize::try_from(index)
            .ok()
            .and_then(|i| self.blocks.get_mut(i))
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;

        let previous = field.read(block);
        field.overwrite(block, value)?;
        warn!(index, field = %field, "block tampered without rehashing");
        Ok(previous)
    }

    pub fn get(&self, index: u64) -> Result<&Block, LedgerError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.blocks.get(i))
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// The most recent block.
    pub fn head(&self) -> &Block {
        // Construction guarantees at least the genesis block.
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn len(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// Never true: a chain always has a genesis block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::initialize()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use chainlink_crypto::FailureReason;
    use chainlink_types::BlockHash;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn sample_chain() -> Chain {
        let mut chain = Chain::initialize_at(t0());
        chain
            .append(
                OrderEvent::new("12345", "Warehouse A", "alice", "received")
                    .at(t0() + Duration::hours(1)),
            )
            .unwrap();
        chain
            .append(
                OrderEvent::new("12345", "Warehouse B", "bob", "shipped")
                    .at(t0() + Duration::hours(5)),
            )
            .unwrap();
        chain
    }

    fn build(events: &[OrderEvent]) -> Chain {
        let mut chain = Chain::initialize_at(t0());
        for event in events {
            chain.append(event.clone()).unwrap();
        }
        chain
    }

    fn hashes(chain: &Chain) -> Vec<BlockHash> {
        chain.iter().map(|b| b.hash).collect()
    }

    #[test]
    fn initialize_creates_genesis() {
        let chain = Chain::initialize();
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
        assert!(chain.head().is_genesis());
        assert!(chain.genesis().previous_hash.is_zero());
        assert!(chain.is_valid());
    }

    #[test]
    fn append_links_to_tail() {
        let chain = sample_chain();
        assert_eq!(chain.len(), 3);
        for pair in chain.blocks().windows(2) {
            assert_eq!(pair[1].previous_hash, pair[0].hash);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
    }

    #[test]
    fn append_returns_the_stored_block() {
        let mut chain = Chain::initialize_at(t0());
        let block = chain
            .append(OrderEvent::new("1", "Dock", "carol", "packed").at(t0()))
            .unwrap();
        assert_eq!(&block, chain.head());
    }

    #[test]
    fn append_defaults_timestamp_to_now() {
        let mut chain = Chain::initialize_at(t0());
        let before = Utc::now();
        let block = chain
            .append(OrderEvent::new("1", "Dock", "carol", "packed"))
            .unwrap();
        assert!(block.timestamp >= before);
    }

    #[test]
    fn append_rejects_empty_payload() {
        let mut chain = sample_chain();
        let before = chain.clone();
        let err = chain.append(OrderEvent::default()).unwrap_err();
        assert_eq!(err, LedgerError::InvalidPayload { field: "order_id" });
        assert_eq!(chain, before);
    }

    #[test]
    fn append_rejects_missing_actor_and_action() {
        let mut chain = sample_chain();
        let err = chain
            .append(OrderEvent::new("1", "Dock", "", "packed"))
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidPayload { field: "actor" });
        let err = chain
            .append(OrderEvent::new("1", "Dock", "carol", " "))
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidPayload { field: "action" });
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn untampered_chain_is_valid() {
        let report = sample_chain().report();
        assert!(report.is_valid());
        assert_eq!(report.first_failure, None);
        assert_eq!(report.checks.len(), 3);
        assert!(report.checks.iter().all(|c| c.ok && c.reason.is_none()));
    }

    #[test]
    fn end_to_end_tamper_detection() {
        let mut chain = sample_chain();
        assert!(chain.report().is_valid());

        let old = chain
            .tamper(1, BlockField::Location, "Warehouse X")
            .unwrap();
        assert_eq!(old, "Warehouse A");

        let report = chain.report();
        assert!(!report.valid);
        assert_eq!(report.first_failure, Some(1));
        assert_eq!(report.checks[0].reason, None);
        assert_eq!(report.checks[1].reason, Some(FailureReason::HashMismatch));
        assert_eq!(report.checks[2].reason, Some(FailureReason::LinkMismatch));
    }

    #[test]
    fn tamper_cascades_to_every_later_block() {
        let events: Vec<OrderEvent> = (0..6)
            .map(|i| {
                OrderEvent::new("67890", format!("Stop {i}"), "linda", "picked")
                    .at(t0() + Duration::hours(i))
            })
            .collect();
        let mut chain = build(&events);
        chain.tamper(3, BlockField::Actor, "mallory").unwrap();

        let checks: Vec<_> = chain.verify().collect();
        assert!(checks[..3].iter().all(|c| c.ok));
        assert_eq!(checks[3].reason, Some(FailureReason::HashMismatch));
        assert!(checks[4..]
            .iter()
            .all(|c| c.reason == Some(FailureReason::LinkMismatch)));
    }

    #[test]
    fn restoring_the_original_value_restores_validity() {
        let mut chain = sample_chain();
        let old = chain.tamper(2, BlockField::Action, "PACKAGE LOST").unwrap();
        assert!(!chain.is_valid());
        chain.tamper(2, BlockField::Action, &old).unwrap();
        assert!(chain.is_valid());
    }

    #[test]
    fn tampering_genesis_is_detected() {
        let mut chain = sample_chain();
        chain
            .tamper(0, BlockField::PreviousHash, &"11".repeat(32))
            .unwrap();
        let report = chain.report();
        assert_eq!(report.first_failure, Some(0));
        assert_eq!(report.checks[0].reason, Some(FailureReason::HashMismatch));
    }

    #[test]
    fn tamper_out_of_range() {
        let mut chain = sample_chain();
        let len = chain.len();
        let err = chain.tamper(len, BlockField::Location, "x").unwrap_err();
        assert_eq!(err, LedgerError::IndexOutOfRange { index: len, len });
        let err = chain
            .tamper(u64::MAX, BlockField::Location, "x")
            .unwrap_err();
        assert!(matches!(err, LedgerError::IndexOutOfRange { .. }));
        assert!(chain.is_valid());
    }

    #[test]
    fn get_checks_bounds() {
        let chain = sample_chain();
        assert_eq!(chain.get(1).unwrap().payload.actor, "alice");
        assert_eq!(
            chain.get(3).unwrap_err(),
            LedgerError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn verify_is_lazy_and_restartable() {
        let chain = sample_chain();
        let mut first = chain.verify();
        assert_eq!(first.next().map(|c| c.index), Some(0));
        let all: Vec<_> = chain.verify().collect();
        assert_eq!(all.len(), 3);
        assert_eq!(first.count(), 2);
    }

    #[test]
    fn from_blocks_rejects_empty() {
        assert_eq!(Chain::from_blocks(vec![]).unwrap_err(), LedgerError::EmptyChain);
        let chain = sample_chain();
        let rebuilt = Chain::from_blocks(chain.blocks().to_vec()).unwrap();
        assert_eq!(rebuilt, chain);
    }

    #[test]
    fn append_numbers_by_position_after_stored_index_edit() {
        for bogus in [7, u64::MAX] {
            let mut blocks = sample_chain().blocks().to_vec();
            blocks[2].index = bogus;
            let mut chain = Chain::from_blocks(blocks).unwrap();

            let block = chain
                .append(OrderEvent::new("12345", "Dock", "carol", "delivered").at(t0()))
                .unwrap();
            assert_eq!(block.index, 3);
            assert_eq!(chain.head().index, 3);

            let checks: Vec<_> = chain.verify().collect();
            assert_eq!(checks[2].reason, Some(FailureReason::HashMismatch));
            assert_eq!(checks[3].reason, Some(FailureReason::LinkMismatch));
        }
    }

    fn arb_event() -> impl Strategy<Value = OrderEvent> {
        (
            "[0-9]{3,6}",
            "[A-Za-z ]{1,16}",
            "[a-z]{1,8}",
            prop_oneof![
                Just("received".to_string()),
                Just("packed".to_string()),
                "[A-Za-z ]{1,12}[A-Za-z]",
            ],
            0i64..10_000,
        )
            .prop_map(|(order, location, actor, action, minutes)| {
                OrderEvent::new(order, location, actor, action)
                    .at(t0() + Duration::minutes(minutes))
            })
    }

    proptest! {
        #[test]
        fn same_events_give_same_hashes(events in prop::collection::vec(arb_event(), 1..8)) {
            prop_assert_eq!(hashes(&build(&events)), hashes(&build(&events)));
        }

        #[test]
        fn changing_one_event_changes_it_and_all_downstream(
            events in prop::collection::vec(arb_event(), 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let at = pick.index(events.len());
            let mut changed = events.clone();
            changed[at].location.push('!');

            let original = hashes(&build(&events));
            let altered = hashes(&build(&changed));
            let block = at + 1;
            prop_assert_eq!(&original[..block], &altered[..block]);
            for i in block..original.len() {
                prop_assert_ne!(original[i], altered[i]);
            }
        }

        #[test]
        fn any_single_payload_tamper_is_caught_at_its_index(
            events in prop::collection::vec(arb_event(), 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut chain = build(&events);
            let at = pick.index(events.len()) as u64 + 1;
            chain.tamper(at, BlockField::OrderId, "forged").unwrap();
            let report = chain.report();
            prop_assert_eq!(report.first_failure, Some(at));
            prop_assert_eq!(report.failures().count() as u64, chain.len() - at);
        }
    }
}
