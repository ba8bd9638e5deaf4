use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to an order at a given stop.
///
/// Well-known fulfilment steps parse case-insensitively; anything else is kept
/// verbatim as [`Action::Other`]. The display string is what gets hashed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Received,
    Picked,
    Packed,
    QualityChecked,
    Dispatched,
    Delivered,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Received => "received",
            Self::Picked => "picked",
            Self::Packed => "packed",
            Self::QualityChecked => "quality_checked",
            Self::Dispatched => "dispatched",
            Self::Delivered => "delivered",
            Self::Other(s) => s,
        }
    }

    /// Returns `true` for a free-text action with no content.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Other(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Ok(match normalized.as_str() {
            "received" => Self::Received,
            "picked" => Self::Picked,
            "packed" => Self::Packed,
            "quality_checked" => Self::QualityChecked,
            "dispatched" => Self::Dispatched,
            "delivered" => Self::Delivered,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(action) => action,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_string()
    }
}

/// Payload of one block: a single order event at one location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: String,
    /// Office, warehouse, or logistics partner handling the order.
    #[serde(default)]
    pub location: String,
    /// Employee or system that performed the action.
    pub actor: String,
    pub action: Action,
    /// Free-form extra data (tracking numbers, box ids, notes).
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    /// Event time. When absent the ledger stamps the append time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl OrderEvent {
    pub fn new(
        order_id: impl Into<String>,
        location: impl Into<String>,
        actor: impl Into<String>,
        action: impl Into<Action>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            location: location.into(),
            actor: actor.into(),
            action: action.into(),
            details: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Pin the event to an explicit time.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Name of the first required field that is blank, if any.
    ///
    /// Checked in order: `order_id`, `actor`, `action`.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.order_id.trim().is_empty() {
            Some("order_id")
        } else if self.actor.trim().is_empty() {
            Some("actor")
        } else if self.action.is_blank() {
            Some("action")
        } else {
            None
        }
    }
}

impl Default for OrderEvent {
    fn default() -> Self {
        Self::new("", "", "", Action::Other(String::new()))
    }
}
