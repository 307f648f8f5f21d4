use async_trait::async_trait;
use itertools::Itertools;
use model::{location::Point, route::RouteSummary};

use crate::{get_json, service::RoutingEngine, wire::OsrmResponse, ApiError, ApiResult};

/// A driving route as computed by the routing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRoute {
    pub summary: RouteSummary,
    /// The engine's waypoint list, one entry per requested point. Entries the
    /// engine could not place are `None`.
    pub waypoints: Vec<Option<Point>>,
    pub path: Vec<Point>,
}

/// OSRM v1 route service client.
#[derive(Debug, Clone)]
pub struct OsrmRouter {
    service_url: String,
    profile: String,
    http: reqwest::Client,
}

impl OsrmRouter {
    pub fn new<S: Into<String>>(service_url: S, profile: S) -> Self {
        Self {
            service_url: service_url.into().trim_end_matches('/').to_owned(),
            profile: profile.into(),
            http: reqwest::Client::new(),
        }
    }

    fn route_url(&self, points: &[Point]) -> String {
        let coordinates = points
            .iter()
            .map(|point| format!("{},{}", point.longitude, point.latitude))
            .join(";");
        format!("{}/{}/{}", self.service_url, self.profile, coordinates)
    }
}

impl TryFrom<OsrmResponse> for ComputedRoute {
    type Error = ApiError;

    fn try_from(response: OsrmResponse) -> ApiResult<Self> {
        if response.code != "Ok" {
            return Err(ApiError::NoRoute(
                response.message.unwrap_or(response.code),
            ));
        }
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NoRoute("empty route list".to_owned()))?;
        Ok(ComputedRoute {
            summary: RouteSummary::new(route.distance, route.duration),
            waypoints: response
                .waypoints
                .into_iter()
                .map(|waypoint| waypoint.location.map(|[lon, lat]| Point::new(lat, lon)))
                .collect(),
            path: route
                .geometry
                .map(|geometry| {
                    geometry
                        .coordinates
                        .into_iter()
                        .map(|[lon, lat]| Point::new(lat, lon))
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl RoutingEngine for OsrmRouter {
    async fn route(&self, points: &[Point]) -> ApiResult<ComputedRoute> {
        if points.len() < 2 {
            return Err(ApiError::Other(format!(
                "a route needs at least two points, got {}",
                points.len()
            )));
        }
        let request = self.http.get(self.route_url(points)).query(&[
            ("overview", "full"),
            ("geometries", "geojson"),
            ("steps", "false"),
        ]);
        let response: OsrmResponse = get_json(request).await?;
        ComputedRoute::try_from(response)
    }
}
