use std::sync::Arc;

use model::{location::Point, stop::StopFeature, WithDistance};
use transit_api::{ApiResult, TransitBackend};
use utility::geo::BoundingBox;

/// Half the side of the box searched around a point, in degrees.
pub const NEAREST_STOP_DELTA_DEG: f64 = 0.02;
pub const NEAREST_STOP_LIMIT: usize = 1000;

/// The stop closest to `point` by great-circle distance. The first of
/// equally distant stops wins.
pub fn find_nearest<'a>(point: &Point, candidates: &'a [StopFeature]) -> Option<&'a StopFeature> {
    let mut best: Option<(&StopFeature, f64)> = None;
    for candidate in candidates {
        let distance = point.distance_to(&candidate.point);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(stop, _)| stop)
}

#[derive(Clone)]
pub struct StopLocator {
    backend: Arc<dyn TransitBackend>,
}

impl StopLocator {
    pub fn new(backend: Arc<dyn TransitBackend>) -> Self {
        Self { backend }
    }

    pub async fn query_stops_in_bounds(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> ApiResult<Vec<StopFeature>> {
        self.backend.stops_in_bounds(bbox, limit).await
    }

    /// Nearest stop within `NEAREST_STOP_DELTA_DEG` of `point`.
    pub async fn nearest_stop(
        &self,
        point: Point,
    ) -> ApiResult<Option<WithDistance<StopFeature>>> {
        let stops = self
            .query_stops_in_bounds(point.bbox(NEAREST_STOP_DELTA_DEG), NEAREST_STOP_LIMIT)
            .await?;
        log::debug!("{} stop(s) around {point}", stops.len());
        Ok(find_nearest(&point, &stops)
            .cloned()
            .map(|stop| stop.with_distance_to(&point)))
    }
}

#[cfg(test)]
mod tests {
    use utility::id::Id;

    use super::*;

    fn stop(id: &str, latitude: f64, longitude: f64) -> StopFeature {
        StopFeature {
            id: Id::from(id),
            name: id.to_owned(),
            point: Point::new(latitude, longitude),
            code: None,
            direction: None,
        }
    }

    #[test]
    fn nothing_to_choose_from() {
        assert!(find_nearest(&Point::new(41.0, 29.0), &[]).is_none());
    }

    #[test]
    fn single_candidate_wins() {
        let stops = [stop("far", 40.0, 30.0)];
        assert_eq!(find_nearest(&Point::new(41.0, 29.0), &stops), Some(&stops[0]));
    }

    #[test]
    fn picks_the_closest() {
        let stops = [
            stop("A", 41.00, 28.90),
            stop("B", 41.02, 28.95),
            stop("C", 41.01, 28.97),
        ];
        let nearest = find_nearest(&Point::new(41.011, 28.965), &stops).unwrap();
        assert_eq!(nearest.id, Id::from("C"));
    }

    #[test]
    fn ties_go_to_the_first() {
        let stops = [stop("first", 41.0, 29.0), stop("second", 41.0, 29.0)];
        let nearest = find_nearest(&Point::new(41.001, 29.0), &stops).unwrap();
        assert_eq!(nearest.id, Id::from("first"));
    }
}
