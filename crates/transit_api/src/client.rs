use async_trait::async_trait;
use model::stop::{StopFeature, StopLine};
use utility::{geo::BoundingBox, id::Id};

use crate::{
    get_json,
    service::{StopSource, TransitBackend},
    wire::{FeatureCollection, RouteSearch, RouteSearchResponse, StopLinesResponse},
    ApiError, ApiResult,
};

/// Shown for a connecting line the backend returned without a code.
const UNKNOWN_LINE_CODE: &str = "-";

/// Client for the transit backend serving stops, lines and line shapes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client<S: Into<String>>(base_url: S, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Endpoint built from percent-encoded path segments, for ids that may
    /// contain reserved characters.
    fn segments_url(&self, segments: &[&str]) -> ApiResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|why| ApiError::Other(format!("invalid backend url: {why}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Other("backend url can not be a base".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl StopSource for BackendClient {
    async fn stops_in_bounds(
        &self,
        bbox: BoundingBox,
        limit: usize,
    ) -> ApiResult<Vec<StopFeature>> {
        let request = self.http.get(self.endpoint("stops/geojson")).query(&[
            ("minLon", bbox.min_lon.to_string()),
            ("maxLon", bbox.max_lon.to_string()),
            ("minLat", bbox.min_lat.to_string()),
            ("maxLat", bbox.max_lat.to_string()),
            ("limit", limit.to_string()),
        ]);
        let collection: FeatureCollection = get_json(request).await?;
        Ok(collection.into_stops())
    }
}

#[async_trait]
impl TransitBackend for BackendClient {
    async fn stop_lines(&self, stop_id: &Id<StopFeature>) -> ApiResult<Vec<StopLine>> {
        let url = self.segments_url(&["stops", stop_id.raw_ref::<str>(), "lines"])?;
        let response: StopLinesResponse = get_json(self.http.get(url)).await?;
        Ok(response.lines.into_iter().map(StopLine::from).collect())
    }

    async fn search_routes(&self, code: &str) -> ApiResult<RouteSearch> {
        let request = self
            .http
            .get(self.endpoint("routes/search"))
            .query(&[("q", code)]);
        let response: RouteSearchResponse = get_json(request).await?;
        Ok(RouteSearch::from_response(response, code))
    }

    async fn routes_between(
        &self,
        from: &Id<StopFeature>,
        to: &Id<StopFeature>,
    ) -> ApiResult<RouteSearch> {
        let request = self.http.get(self.endpoint("routes/between")).query(&[
            ("from_stop", from.raw_ref::<str>()),
            ("to_stop", to.raw_ref::<str>()),
        ]);
        let response: RouteSearchResponse = get_json(request).await?;
        Ok(RouteSearch::from_response(response, UNKNOWN_LINE_CODE))
    }
}
