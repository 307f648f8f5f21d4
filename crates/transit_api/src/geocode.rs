use async_trait::async_trait;
use model::location::Point;

use crate::{get_json, service::Geocoder, wire::NominatimPlace, ApiResult};

/// Resolves user text to a point. `"lat, lon"` text is taken literally,
/// everything else goes to the place search.
pub async fn geocode(geocoder: &dyn Geocoder, query: &str) -> ApiResult<Option<Point>> {
    if let Some(point) = Point::parse_lat_lon(query) {
        return Ok(Some(point));
    }
    let query = query.trim();
    if query.is_empty() {
        return Ok(None);
    }
    geocoder.search(query).await
}

/// Place search against a Nominatim instance, first match only.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    user_agent: String,
    /// `"minLon,maxLat,maxLon,minLat"`; restricts results when set.
    viewbox: Option<String>,
    http: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new<S: Into<String>>(base_url: S, user_agent: S, viewbox: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            user_agent: user_agent.into(),
            viewbox,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> ApiResult<Option<Point>> {
        let mut params = vec![
            ("format", "json".to_owned()),
            ("limit", "1".to_owned()),
            ("q", query.to_owned()),
        ];
        if let Some(viewbox) = &self.viewbox {
            params.push(("viewbox", viewbox.clone()));
            params.push(("bounded", "1".to_owned()));
        }
        let request = self
            .http
            .get(format!("{}/search", self.base_url))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&params);
        let places: Vec<NominatimPlace> = get_json(request).await?;
        let point = places.first().and_then(NominatimPlace::point);
        if point.is_none() {
            log::info!("no place found for '{query}'");
        }
        Ok(point)
    }
}
