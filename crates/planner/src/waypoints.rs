use indexmap::IndexMap;
use model::{
    location::Point,
    waypoint::{Endpoint, SlotKey, SlotRef, WaypointInput, WaypointSlot},
};

/// The ordered `start, via..., destination` list. Single source of truth for
/// route endpoints; performs no I/O.
#[derive(Debug, Clone)]
pub struct WaypointStore {
    start: WaypointSlot,
    destination: WaypointSlot,
    vias: IndexMap<SlotKey, WaypointSlot>,
    next_key: u64,
}

impl Default for WaypointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointStore {
    pub fn new() -> Self {
        Self {
            start: WaypointSlot::endpoint(Endpoint::Start),
            destination: WaypointSlot::endpoint(Endpoint::Destination),
            vias: IndexMap::new(),
            next_key: 1,
        }
    }

    pub fn start(&self) -> &WaypointSlot {
        &self.start
    }

    pub fn destination(&self) -> &WaypointSlot {
        &self.destination
    }

    fn endpoint_mut(&mut self, endpoint: Endpoint) -> &mut WaypointSlot {
        match endpoint {
            Endpoint::Start => &mut self.start,
            Endpoint::Destination => &mut self.destination,
        }
    }

    /// Sets start or destination. Text input drops any resolved point; it is
    /// resolved when the route is drawn.
    pub fn set_role(&mut self, endpoint: Endpoint, input: WaypointInput) {
        let slot = self.endpoint_mut(endpoint);
        match input {
            WaypointInput::Text(text) => {
                slot.display_text = text;
                slot.resolved = None;
            }
            WaypointInput::Point(point) => {
                slot.display_text = point.to_string();
                slot.resolved = Some(point);
            }
            WaypointInput::Labeled { text, point } => {
                slot.display_text = text;
                slot.resolved = Some(point);
            }
        }
    }

    /// Appends a via slot after the existing ones.
    pub fn add_via<S: Into<String>>(&mut self, text: S) -> SlotKey {
        let key = SlotKey(format!("v{}", self.next_key));
        self.next_key += 1;
        self.vias
            .insert(key.clone(), WaypointSlot::via(key.clone(), text.into()));
        key
    }

    /// Returns whether a slot was removed. Unknown keys are not an error.
    pub fn remove_via(&mut self, key: &SlotKey) -> bool {
        self.vias.shift_remove(key).is_some()
    }

    /// Puts the via slots into `new_order`. Unknown and repeated keys are
    /// skipped; slots missing from `new_order` follow the listed ones in
    /// their previous order.
    pub fn reorder_via(&mut self, new_order: &[SlotKey]) {
        let mut remaining = std::mem::take(&mut self.vias);
        let mut reordered = IndexMap::with_capacity(remaining.len());
        for key in new_order {
            match remaining.shift_remove(key) {
                Some(slot) => {
                    reordered.insert(key.clone(), slot);
                }
                None if !reordered.contains_key(key) => {
                    log::debug!("ignoring unknown via key {key} in new order");
                }
                None => {}
            }
        }
        reordered.extend(remaining);
        self.vias = reordered;
    }

    /// Replaces the text of a via slot and drops its resolved point.
    pub fn set_via_text<S: Into<String>>(&mut self, key: &SlotKey, text: S) -> bool {
        match self.vias.get_mut(key) {
            Some(slot) => {
                slot.display_text = text.into();
                slot.resolved = None;
                true
            }
            None => false,
        }
    }

    pub fn slot(&self, slot: &SlotRef) -> Option<&WaypointSlot> {
        match slot {
            SlotRef::Start => Some(&self.start),
            SlotRef::Via(key) => self.vias.get(key),
            SlotRef::Destination => Some(&self.destination),
        }
    }

    fn slot_mut(&mut self, slot: &SlotRef) -> Option<&mut WaypointSlot> {
        match slot {
            SlotRef::Start => Some(&mut self.start),
            SlotRef::Via(key) => self.vias.get_mut(key),
            SlotRef::Destination => Some(&mut self.destination),
        }
    }

    /// Replaces the resolved point of a slot, keeping its text. Returns false
    /// if the slot no longer exists.
    pub fn resolve(&mut self, slot: &SlotRef, point: Option<Point>) -> bool {
        match self.slot_mut(slot) {
            Some(slot) => {
                slot.resolved = point;
                true
            }
            None => false,
        }
    }

    /// Via slots in order, for positional write-back.
    pub(crate) fn vias_mut(&mut self) -> impl Iterator<Item = &mut WaypointSlot> {
        self.vias.values_mut()
    }

    pub fn via_keys(&self) -> Vec<SlotKey> {
        self.vias.keys().cloned().collect()
    }

    pub fn via_count(&self) -> usize {
        self.vias.len()
    }

    /// Every slot in route order.
    pub fn slots(&self) -> impl Iterator<Item = &WaypointSlot> {
        std::iter::once(&self.start)
            .chain(self.vias.values())
            .chain(std::iter::once(&self.destination))
    }

    /// Start, resolved vias and destination, skipping unresolved slots.
    pub fn to_ordered_points(&self) -> Vec<Point> {
        self.slots().filter_map(|slot| slot.resolved).collect()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.slots().all(WaypointSlot::is_resolved)
    }

    /// Slots that have text but no point yet, in route order.
    pub fn unresolved_queries(&self) -> Vec<(SlotRef, String)> {
        self.slots()
            .filter_map(|slot| {
                slot.pending_query()
                    .map(|query| (slot.slot_ref(), query.to_owned()))
            })
            .collect()
    }

    /// Clear-all: drops the vias and empties both endpoints.
    pub fn clear(&mut self) {
        self.start = WaypointSlot::endpoint(Endpoint::Start);
        self.destination = WaypointSlot::endpoint(Endpoint::Destination);
        self.vias.clear();
    }
}
