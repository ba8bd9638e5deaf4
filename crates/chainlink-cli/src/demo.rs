//! The two-order tracking simulation.

use chainlink_ledger::{Chain, LedgerError};
use chainlink_types::{Action, OrderEvent};
use chrono::{DateTime, Duration, Utc};

/// Block tampered with during the demonstration (order 12345's dispatch).
pub const TAMPERED_BLOCK: u64 = 4;

/// One simulated event, `minutes` after the order's first event.
struct Step {
    order_id: &'static str,
    minutes: i64,
    location: &'static str,
    actor: &'static str,
    action: Action,
    details: &'static [(&'static str, &'static str)],
}

impl Step {
    fn event(&self, start: DateTime<Utc>) -> OrderEvent {
        self.details.iter().fold(
            OrderEvent::new(self.order_id, self.location, self.actor, self.action.clone())
                .at(start + Duration::minutes(self.minutes)),
            |event, (k, v)| event.with_detail(*k, *v),
        )
    }
}

const RETAIL: [Step; 5] = [
    Step {
        order_id: "12345",
        minutes: 0,
        location: "Brisbane Office",
        actor: "Sarah J",
        action: Action::Received,
        details: &[("customer", "Ana"), ("product", "Laptop")],
    },
    Step {
        order_id: "12345",
        minutes: 120,
        location: "Sydney Warehouse",
        actor: "John D",
        action: Action::Picked,
        details: &[("quantity", "1 unit")],
    },
    Step {
        order_id: "12345",
        minutes: 210,
        location: "Sydney Warehouse",
        actor: "Maria K",
        action: Action::Packed,
        details: &[("box_id", "BOX-7821")],
    },
    Step {
        order_id: "12345",
        minutes: 32 * 60,
        location: "Logistics Partner (AusPost)",
        actor: "Mike T",
        action: Action::Dispatched,
        details: &[("tracking", "AP123456789AU")],
    },
    Step {
        order_id: "12345",
        minutes: 59 * 60,
        location: "Customer Location (Brisbane)",
        actor: "Ana",
        action: Action::Delivered,
        details: &[("signature", "Confirmed")],
    },
];

const B2B: [Step; 5] = [
    Step {
        order_id: "67890",
        minutes: 0,
        location: "Melbourne Office",
        actor: "Erick Corp Desk",
        action: Action::Received,
        details: &[
            ("customer", "Erick Corp"),
            ("value", "$15,000"),
            ("priority", "HIGH"),
        ],
    },
    Step {
        order_id: "67890",
        minutes: 60,
        location: "Melbourne Warehouse",
        actor: "Bulk Team",
        action: Action::Picked,
        details: &[("items", "Office supplies x500"), ("pallets", "4")],
    },
    Step {
        order_id: "67890",
        minutes: 24 * 60,
        location: "Melbourne Warehouse",
        actor: "Linda P",
        action: Action::QualityChecked,
        details: &[("status", "PASSED")],
    },
    Step {
        order_id: "67890",
        minutes: 28 * 60,
        location: "Logistics Partner (StarTrack)",
        actor: "Tom R",
        action: Action::Dispatched,
        details: &[("vehicle", "TRUCK-45")],
    },
    Step {
        order_id: "67890",
        minutes: 81 * 60,
        location: "Erick Corp Warehouse (Sydney)",
        actor: "Erick",
        action: Action::Delivered,
        details: &[("invoice", "INV-67890")],
    },
];

/// Retail order 12345 starting three days before `now`, then B2B order 67890
/// starting five days before `now`.
pub fn simulated_events(now: DateTime<Utc>) -> Vec<OrderEvent> {
    let retail = now - Duration::days(3);
    let b2b = now - Duration::days(5);
    RETAIL
        .iter()
        .map(|step| step.event(retail))
        .chain(B2B.iter().map(|step| step.event(b2b)))
        .collect()
}

/// Build the demonstration chain with its genesis block at `now`.
pub fn build_chain(now: DateTime<Utc>) -> Result<Chain, LedgerError> {
    let mut chain = Chain::initialize_at(now);
    for event in simulated_events(now) {
        chain.append(event)?;
    }
    Ok(chain)
}
