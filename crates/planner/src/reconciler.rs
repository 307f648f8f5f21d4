use model::{location::Point, route::RouteSummary, waypoint::SlotRef};

use crate::waypoints::WaypointStore;

pub const ROUTE_NOT_FOUND: &str = "Route not found.";

/// Keeps the waypoint store and the routing control in step, and holds the
/// summary of the last route found.
#[derive(Debug, Clone, Default)]
pub struct RouteReconciler {
    summary: Option<RouteSummary>,
}

impl RouteReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The points to submit to the routing engine, or `None` when fewer than
    /// two are known.
    pub fn request_route(&self, points: Vec<Point>) -> Option<Vec<Point>> {
        if points.len() < 2 {
            log::debug!("not routing, only {} point(s) resolved", points.len());
            return None;
        }
        Some(points)
    }

    /// Stores `summary` and returns its rendered text.
    pub fn on_route_found(&mut self, summary: RouteSummary) -> String {
        let text = summary.to_string();
        self.summary = Some(summary);
        text
    }

    /// The notification to raise. Waypoints and the last summary stay.
    pub fn on_route_error(&self) -> &'static str {
        ROUTE_NOT_FOUND
    }

    /// Writes the routing control's raw waypoint list back into the store.
    /// Only points change; the text of each slot stays as the user left it.
    ///
    /// The first entry is the start and the last the destination; interior
    /// entries map onto the vias by position. An empty interior entry leaves
    /// its via alone, vias without a matching entry become unresolved, and
    /// surplus entries are dropped.
    pub fn on_waypoints_changed(&self, store: &mut WaypointStore, raw: &[Option<Point>]) {
        let Some((first, rest)) = raw.split_first() else {
            return;
        };
        if let Some(point) = first {
            store.resolve(&SlotRef::Start, Some(*point));
        }
        let Some((last, interior)) = rest.split_last() else {
            return;
        };
        if let Some(point) = last {
            store.resolve(&SlotRef::Destination, Some(*point));
        }

        if interior.len() > store.via_count() {
            log::debug!(
                "ignoring {} surplus interior waypoint(s)",
                interior.len() - store.via_count()
            );
        }
        let mut entries = interior.iter();
        for via in store.vias_mut() {
            match entries.next() {
                Some(Some(point)) => via.resolved = Some(*point),
                Some(None) => {}
                None => via.resolved = None,
            }
        }
    }

    pub fn summary(&self) -> Option<&RouteSummary> {
        self.summary.as_ref()
    }

    pub fn clear(&mut self) {
        self.summary = None;
    }
}
