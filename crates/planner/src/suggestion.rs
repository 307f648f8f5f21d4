use std::sync::Arc;

use model::{
    line::{LineGeometry, LineOverlay, OverlayKind},
    stop::StopFeature,
};
use transit_api::{wire::RouteSearch, ApiResult, TransitBackend};
use utility::{geo::BoundingBox, id::Id};

pub const LINE_CODE_REQUIRED: &str = "Enter a line code.";
pub const LINE_NOT_FOUND: &str = "Line not found.";
pub const NO_ROUTE_DATA: &str = "No route data for this line.";
pub const LINE_SEARCH_FAILED: &str = "Line search failed.";
pub const NO_CONNECTING_LINE: &str = "No line connects these stops.";
pub const SUGGESTION_FAILED: &str = "Transit suggestion unavailable.";

/// What a line lookup produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Drawn(LineGeometry),
    NotFound,
    /// The line exists but has no shape to draw.
    NoPathData(String),
}

impl LineOutcome {
    fn from_candidate(candidate: Option<&LineGeometry>) -> Self {
        match candidate {
            None => LineOutcome::NotFound,
            Some(line) if line.path.is_empty() => LineOutcome::NoPathData(line.code.clone()),
            Some(line) => LineOutcome::Drawn(line.clone()),
        }
    }

    /// The notification to show for this outcome.
    pub fn notification(&self, kind: OverlayKind) -> String {
        match (self, kind) {
            (LineOutcome::Drawn(line), OverlayKind::Search) => format!("Drawn: {}", line.code),
            (LineOutcome::Drawn(line), OverlayKind::Suggestion) => {
                format!("Transit suggestion: {}", line.code)
            }
            (LineOutcome::NotFound, OverlayKind::Search) => LINE_NOT_FOUND.to_owned(),
            (LineOutcome::NotFound, OverlayKind::Suggestion) => NO_CONNECTING_LINE.to_owned(),
            (LineOutcome::NoPathData(_), _) => NO_ROUTE_DATA.to_owned(),
        }
    }
}

/// Looks up line shapes on the backend.
#[derive(Clone)]
pub struct TransitSuggestion {
    backend: Arc<dyn TransitBackend>,
}

impl TransitSuggestion {
    pub fn new(backend: Arc<dyn TransitBackend>) -> Self {
        Self { backend }
    }

    /// A line connecting two stops. The first result is taken as is.
    pub async fn suggest_between(
        &self,
        from: &Id<StopFeature>,
        to: &Id<StopFeature>,
    ) -> ApiResult<LineOutcome> {
        let search = self.backend.routes_between(from, to).await?;
        log::debug!("{} line(s) between {from} and {to}", search.lines.len());
        Ok(LineOutcome::from_candidate(search.lines.first()))
    }

    /// A line by its code. A search the backend marks as failed counts as
    /// not found.
    pub async fn search_line(&self, code: &str) -> ApiResult<LineOutcome> {
        let search: RouteSearch = self.backend.search_routes(code).await?;
        Ok(LineOutcome::from_candidate(search.best()))
    }
}

/// The single line overlay on the map.
#[derive(Debug, Clone, Default)]
pub struct LineOverlayState {
    current: Option<LineOverlay>,
}

impl LineOverlayState {
    pub fn current(&self) -> Option<&LineOverlay> {
        self.current.as_ref()
    }

    /// Replaces the overlay and returns the bounds to fit the map to.
    pub fn show(&mut self, kind: OverlayKind, geometry: LineGeometry) -> Option<BoundingBox> {
        let bounds = geometry.bounds();
        self.current = Some(LineOverlay { kind, geometry });
        bounds
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use model::{location::Point, ExampleData};

    use super::*;

    #[test]
    fn outcome_of_a_candidate() {
        assert_eq!(LineOutcome::from_candidate(None), LineOutcome::NotFound);

        let mut line = LineGeometry::example_data();
        assert_eq!(
            LineOutcome::from_candidate(Some(&line)),
            LineOutcome::Drawn(line.clone())
        );
        line.path.clear();
        assert_eq!(
            LineOutcome::from_candidate(Some(&line)),
            LineOutcome::NoPathData("500T".to_owned())
        );
    }

    #[test]
    fn notifications() {
        let drawn = LineOutcome::Drawn(LineGeometry::example_data());
        assert_eq!(drawn.notification(OverlayKind::Search), "Drawn: 500T");
        assert_eq!(
            drawn.notification(OverlayKind::Suggestion),
            "Transit suggestion: 500T"
        );
        assert_eq!(LineOutcome::NotFound.notification(OverlayKind::Search), LINE_NOT_FOUND);
        assert_eq!(
            LineOutcome::NotFound.notification(OverlayKind::Suggestion),
            NO_CONNECTING_LINE
        );
    }

    #[test]
    fn overlay_is_replaced() {
        let mut overlay = LineOverlayState::default();
        let bounds = overlay.show(OverlayKind::Search, LineGeometry::example_data());
        assert_eq!(bounds, Some(BoundingBox::new(28.90, 28.95, 41.00, 41.02)));

        let other = LineGeometry {
            code: "34".to_owned(),
            name: None,
            path: vec![Point::new(41.1, 29.1)],
        };
        overlay.show(OverlayKind::Suggestion, other.clone());
        let current = overlay.current().unwrap();
        assert_eq!(current.kind, OverlayKind::Suggestion);
        assert_eq!(current.geometry, other);

        overlay.clear();
        assert!(overlay.current().is_none());
    }
}
