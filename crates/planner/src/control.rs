use model::location::Point;

/// In-process model of the map's routing widget: the raw waypoint array it
/// displays and the path it last drew. Entries may be empty while the user
/// is still placing them.
#[derive(Debug, Clone, Default)]
pub struct RoutingControl {
    waypoints: Vec<Option<Point>>,
    path: Vec<Point>,
}

impl RoutingControl {
    pub fn waypoints(&self) -> &[Option<Point>] {
        &self.waypoints
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Placed waypoints in order.
    pub fn resolved_points(&self) -> Vec<Point> {
        self.waypoints.iter().flatten().copied().collect()
    }

    pub fn set_waypoints(&mut self, points: &[Point]) {
        self.waypoints = points.iter().copied().map(Some).collect();
    }

    /// Replaces the waypoint array with the routing engine's own list.
    pub fn set_engine_waypoints(&mut self, waypoints: Vec<Option<Point>>) {
        self.waypoints = waypoints;
    }

    pub fn set_path(&mut self, path: Vec<Point>) {
        self.path = path;
    }

    /// Drag of an existing waypoint. `None` if there is no such waypoint.
    pub fn move_waypoint(&mut self, index: usize, point: Point) -> Option<&[Option<Point>]> {
        *self.waypoints.get_mut(index)? = Some(point);
        Some(&self.waypoints)
    }

    /// New waypoint dropped onto the route at `index` (clamped to the end).
    pub fn insert_waypoint(&mut self, index: usize, point: Point) -> &[Option<Point>] {
        let index = index.min(self.waypoints.len());
        self.waypoints.insert(index, Some(point));
        &self.waypoints
    }

    pub fn remove_waypoint(&mut self, index: usize) -> Option<&[Option<Point>]> {
        if index >= self.waypoints.len() {
            return None;
        }
        self.waypoints.remove(index);
        Some(&self.waypoints)
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.path.clear();
    }
}
