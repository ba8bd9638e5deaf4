use std::collections::HashSet;

use chrono::Duration;
use serde::{Serialize, Serializer};

use crate::block::Block;
use crate::chain::Chain;

/// One stop on an order's journey.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JourneyStop {
    pub block: Block,
    /// Time since the order's first event.
    #[serde(rename = "elapsed_seconds", serialize_with = "as_seconds")]
    pub elapsed: Duration,
}

/// Every block of a single order, in chain order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Journey {
    pub order_id: String,
    pub stops: Vec<JourneyStop>,
}

impl Journey {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Time between the first and last event; zero for fewer than two stops.
    pub fn total_elapsed(&self) -> Duration {
        self.stops
            .last()
            .map(|stop| stop.elapsed)
            .unwrap_or_else(Duration::zero)
    }
}

/// Headline numbers for a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    pub blocks: u64,
    pub orders: usize,
    pub locations: usize,
    pub valid: bool,
}

fn as_seconds<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(elapsed.num_seconds())
}

fn is_order_block(block: &Block) -> bool {
    !block.is_genesis()
}

impl Chain {
    /// Collect the journey of `order_id`. Unknown ids yield an empty journey.
    pub fn journey(&self, order_id: &str) -> Journey {
        let blocks: Vec<&Block> = self
            .iter()
            .filter(|b| is_order_block(b) && b.payload.order_id == order_id)
            .collect();
        let start = blocks.first().map(|b| b.timestamp);

        let stops = blocks
            .into_iter()
            .map(|block| JourneyStop {
                elapsed: start.map_or_else(Duration::zero, |s| block.timestamp - s),
                block: block.clone(),
            })
            .collect();

        Journey {
            order_id: order_id.to_string(),
            stops,
        }
    }

    /// Distinct order ids in order of first appearance.
    pub fn order_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.iter()
            .filter(|b| is_order_block(b))
            .filter(|b| seen.insert(b.payload.order_id.as_str()))
            .map(|b| b.payload.order_id.clone())
            .collect()
    }

    pub fn summary(&self) -> ChainSummary {
        let locations: HashSet<&str> = self
            .iter()
            .filter(|b| is_order_block(b))
            .map(|b| b.payload.location.as_str())
            .collect();
        ChainSummary {
            blocks: self.len(),
            orders: self.order_ids().len(),
            locations: locations.len(),
            valid: self.is_valid(),
        }
    }
}
