use model::location::Point;
use utility::geo::BoundingBox;

pub const DEFAULT_CENTER: Point = Point {
    latitude: 41.01,
    longitude: 28.97,
};
pub const DEFAULT_ZOOM: u8 = 12;
/// Zoom used when centring on the user's position.
pub const LOCATE_ZOOM: u8 = 15;
pub const MAX_ZOOM: u8 = 19;

/// The visible part of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Point,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

// a 512 px wide map shows 720 / 2^zoom degrees of longitude
fn half_span_deg(zoom: u8) -> f64 {
    360.0 / 2f64.powi(i32::from(zoom))
}

impl Viewport {
    pub fn new(center: Point, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.center.bbox(half_span_deg(self.zoom))
    }

    /// The closest view that still shows all of `bounds`.
    pub fn fit(bounds: &BoundingBox) -> Self {
        let (latitude, longitude) = bounds.center();
        let half = f64::max(
            (bounds.max_lon - bounds.min_lon) / 2.0,
            (bounds.max_lat - bounds.min_lat) / 2.0,
        );
        let zoom = (0..=MAX_ZOOM)
            .rev()
            .find(|zoom| half_span_deg(*zoom) >= half)
            .unwrap_or(0);
        Self::new(Point::new(latitude, longitude), zoom)
    }
}
