use std::time::Duration;

use async_trait::async_trait;
use model::{
    location::Point,
    stop::{StopFeature, StopLine},
};
use utility::{geo::BoundingBox, id::Id};

use crate::{location::LocationError, routing::ComputedRoute, wire::RouteSearch, ApiResult};

#[async_trait]
pub trait StopSource: Send + Sync {
    /// Stops inside `bbox`, at most `limit`. No stops is an empty vector.
    async fn stops_in_bounds(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> ApiResult<Vec<StopFeature>>;
}

#[async_trait]
pub trait TransitBackend: StopSource {
    async fn stop_lines(&self, stop_id: &Id<StopFeature>) -> ApiResult<Vec<StopLine>>;

    async fn search_routes(&self, code: &str) -> ApiResult<RouteSearch>;

    async fn routes_between(
        &self,
        from: &Id<StopFeature>,
        to: &Id<StopFeature>,
    ) -> ApiResult<RouteSearch>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Place search for free text; `None` when nothing matches.
    async fn search(&self, query: &str) -> ApiResult<Option<Point>>;
}

#[async_trait]
pub trait RoutingEngine: Send + Sync {
    /// Driving route through `points` in order.
    async fn route(&self, points: &[Point]) -> ApiResult<ComputedRoute>;
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self, timeout: Duration) -> Result<Point, LocationError>;
}
