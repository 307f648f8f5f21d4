use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::location::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Start,
    Via,
    Destination,
}

/// The two fixed ends of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Endpoint {
    Start,
    Destination,
}

impl From<Endpoint> for Role {
    fn from(value: Endpoint) -> Self {
        match value {
            Endpoint::Start => Role::Start,
            Endpoint::Destination => Role::Destination,
        }
    }
}

/// Stable identity of a via slot. Survives reordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct SlotKey(pub String);

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotKey {
    fn from(value: &str) -> Self {
        SlotKey(value.to_owned())
    }
}

/// Addresses one slot of the waypoint list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SlotRef {
    Start,
    Via(SlotKey),
    Destination,
}

impl From<Endpoint> for SlotRef {
    fn from(value: Endpoint) -> Self {
        match value {
            Endpoint::Start => SlotRef::Start,
            Endpoint::Destination => SlotRef::Destination,
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaypointSlot {
    pub role: Role,
    pub key: Option<SlotKey>,
    pub display_text: String,
    pub resolved: Option<Point>,
}

impl WaypointSlot {
    pub fn endpoint(endpoint: Endpoint) -> Self {
        Self {
            role: endpoint.into(),
            key: None,
            display_text: String::new(),
            resolved: None,
        }
    }

    pub fn via(key: SlotKey, display_text: String) -> Self {
        Self {
            role: Role::Via,
            key: Some(key),
            display_text,
            resolved: None,
        }
    }

    pub fn slot_ref(&self) -> SlotRef {
        match (&self.role, &self.key) {
            (Role::Start, _) => SlotRef::Start,
            (Role::Destination, _) => SlotRef::Destination,
            (Role::Via, Some(key)) => SlotRef::Via(key.clone()),
            (Role::Via, None) => unreachable!("via slots are always keyed"),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Text still waiting for geocoding, if any.
    pub fn pending_query(&self) -> Option<&str> {
        let text = self.display_text.trim();
        (self.resolved.is_none() && !text.is_empty()).then_some(text)
    }
}

/// What a user can put into a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum WaypointInput {
    /// Free text, resolved when the route is drawn.
    Text(String),
    /// A known coordinate, shown as its numeric text.
    Point(Point),
    /// A known coordinate with a display label, e.g. a stop name.
    Labeled { text: String, point: Point },
}
