//! Response documents of the backend and the public services, and their
//! conversion into the model.

use model::{
    line::LineGeometry,
    location::Point,
    stop::{StopFeature, StopLine},
};
use serde::Deserialize;
use serde_json::Value;
use utility::id::Id;

/// Ids and line codes arrive as strings or numbers depending on the import.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub stop_id: Value,
    pub name: Option<String>,
    pub code: Option<Value>,
    pub direction: Option<String>,
}

impl Feature {
    /// `None` for anything that is not a point or carries no stop id.
    pub fn into_stop(self) -> Option<StopFeature> {
        let geometry = self.geometry?;
        if geometry.kind != "Point" {
            return None;
        }
        let [longitude, latitude] = match geometry.coordinates.as_array()?.as_slice() {
            [lon, lat] => [lon.as_f64()?, lat.as_f64()?],
            _ => return None,
        };
        let properties = self.properties;
        let id = text_of(&properties.id).or_else(|| text_of(&properties.stop_id))?;
        Some(StopFeature {
            id: Id::new(id),
            name: properties.name.unwrap_or_else(|| "-".to_owned()),
            point: Point::new(latitude, longitude),
            code: properties.code.as_ref().and_then(text_of),
            direction: properties.direction,
        })
    }
}

impl FeatureCollection {
    pub fn into_stops(self) -> Vec<StopFeature> {
        let total = self.features.len();
        let stops = self
            .features
            .into_iter()
            .filter_map(Feature::into_stop)
            .collect::<Vec<_>>();
        if stops.len() < total {
            log::debug!("skipped {} features without point or id", total - stops.len());
        }
        stops
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopLinesResponse {
    #[serde(default)]
    pub lines: Vec<WireStopLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireStopLine {
    #[serde(default)]
    pub route_id: Value,
    #[serde(default)]
    pub code: Value,
    pub name: Option<String>,
    #[serde(default)]
    pub headsigns: Vec<String>,
}

impl From<WireStopLine> for StopLine {
    fn from(line: WireStopLine) -> Self {
        StopLine {
            route_id: text_of(&line.route_id),
            code: text_of(&line.code),
            name: line.name,
            headsigns: line.headsigns,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSearchResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub results: Vec<RouteResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteResult {
    #[serde(default)]
    pub hat_kodu: Value,
    pub hat_adi: Option<String>,
    #[serde(default)]
    pub guzergah: Vec<PathCoordinate>,
}

/// A shape vertex: either a GeoJSON position `[lon, lat, ...]` or
/// `{lat, lon}`. Values past the first two (altitude) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathCoordinate {
    Position(Vec<f64>),
    Object { lat: f64, lon: f64 },
}

impl PathCoordinate {
    pub fn point(&self) -> Option<Point> {
        match self {
            PathCoordinate::Position(position) => match position.as_slice() {
                [lon, lat, ..] => Some(Point::new(*lat, *lon)),
                _ => None,
            },
            PathCoordinate::Object { lat, lon } => Some(Point::new(*lat, *lon)),
        }
    }
}

impl RouteResult {
    pub fn into_geometry(self, fallback_code: &str) -> LineGeometry {
        LineGeometry {
            code: text_of(&self.hat_kodu).unwrap_or_else(|| fallback_code.to_owned()),
            name: self.hat_adi,
            path: self
                .guzergah
                .iter()
                .filter_map(PathCoordinate::point)
                .collect(),
        }
    }
}

/// Outcome of a line lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSearch {
    pub ok: bool,
    pub lines: Vec<LineGeometry>,
}

impl RouteSearch {
    pub fn from_response(response: RouteSearchResponse, fallback_code: &str) -> Self {
        RouteSearch {
            ok: response.ok,
            lines: response
                .results
                .into_iter()
                .map(|result| result.into_geometry(fallback_code))
                .collect(),
        }
    }

    /// The first result, if the backend reported success.
    pub fn best(&self) -> Option<&LineGeometry> {
        self.ok.then(|| self.lines.first()).flatten()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
    #[serde(default)]
    pub waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    pub distance: f64,
    pub duration: f64,
    pub geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmGeometry {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmWaypoint {
    pub location: Option<[f64; 2]>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}

impl NominatimPlace {
    pub fn point(&self) -> Option<Point> {
        Some(Point::new(self.lat.parse().ok()?, self.lon.parse().ok()?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn features_become_stops() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"id": "1042", "name": "Eminönü", "code": 1042},
                    "geometry": {"type": "Point", "coordinates": [28.97, 41.017]}
                },
                {
                    "type": "Feature",
                    "properties": {"stop_id": 77},
                    "geometry": {"type": "Point", "coordinates": [28.9, 41.0]}
                },
                {
                    "type": "Feature",
                    "properties": {"id": "9"},
                    "geometry": {"type": "LineString", "coordinates": [[28.9, 41.0], [28.91, 41.0]]}
                },
                {
                    "type": "Feature",
                    "properties": {"name": "no id"},
                    "geometry": {"type": "Point", "coordinates": [28.9, 41.0]}
                }
            ]
        }))
        .unwrap();

        let stops = collection.into_stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].id.raw_ref::<str>(), "1042");
        assert_eq!(stops[0].point, Point::new(41.017, 28.97));
        assert_eq!(stops[0].code.as_deref(), Some("1042"));
        assert_eq!(stops[1].id.raw_ref::<str>(), "77");
        assert_eq!(stops[1].name, "-");
    }

    #[test]
    fn missing_features_is_empty() {
        let collection: FeatureCollection = serde_json::from_value(json!({})).unwrap();
        assert!(collection.into_stops().is_empty());
    }

    #[test]
    fn path_accepts_both_vertex_shapes() {
        let response: RouteSearchResponse = serde_json::from_value(json!({
            "ok": true,
            "results": [{
                "hat_kodu": "500T",
                "guzergah": [[28.90, 41.00], {"lat": 41.02, "lon": 28.95}]
            }]
        }))
        .unwrap();
        let search = RouteSearch::from_response(response, "500t");
        let best = search.best().unwrap();
        assert_eq!(best.code, "500T");
        assert_eq!(best.path, vec![Point::new(41.00, 28.90), Point::new(41.02, 28.95)]);
    }

    #[test]
    fn altitude_is_ignored_and_short_positions_skipped() {
        let response: RouteSearchResponse = serde_json::from_value(json!({
            "ok": true,
            "results": [{
                "hat_kodu": "15F",
                "guzergah": [[29.0, 41.0, 12.5], [29.05], [29.1, 41.1]]
            }]
        }))
        .unwrap();
        let search = RouteSearch::from_response(response, "15f");
        assert_eq!(
            search.best().unwrap().path,
            vec![Point::new(41.0, 29.0), Point::new(41.1, 29.1)]
        );
    }

    #[test]
    fn unsuccessful_search_has_no_best() {
        let search = RouteSearch::from_response(
            RouteSearchResponse {
                ok: false,
                results: vec![],
            },
            "X",
        );
        assert_eq!(search.best(), None);
    }

    #[test]
    fn stop_lines_from_backend_shape() {
        let response: StopLinesResponse = serde_json::from_value(json!({
            "stop_id": "1042",
            "lines": [{"route_id": "12", "code": "28", "name": "Edirnekapı - Beşiktaş", "headsigns": ["Beşiktaş"]}]
        }))
        .unwrap();
        let line = StopLine::from(response.lines[0].clone());
        assert_eq!(line.route_id.as_deref(), Some("12"));
        assert_eq!(line.label(), "28 – Edirnekapı - Beşiktaş");
    }
}
