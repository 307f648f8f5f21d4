use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{location::Point, ExampleData, WithDistance};

/// A transit stop as reported by the backend. Read-only per query.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopFeature {
    pub id: Id<StopFeature>,
    pub name: String,
    pub point: Point,
    pub code: Option<String>,
    pub direction: Option<String>,
}

impl StopFeature {
    pub fn with_distance_to(self, point: &Point) -> WithDistance<StopFeature> {
        WithDistance::new(self.point.distance_to(point), self)
    }
}

impl HasId for StopFeature {
    type IdType = String;
}

impl ExampleData for StopFeature {
    fn example_data() -> Self {
        StopFeature {
            id: Id::from("110081"),
            name: "Taksim".to_owned(),
            point: Point::new(41.0369, 28.9850),
            code: Some("110081".to_owned()),
            direction: Some("Kabataş".to_owned()),
        }
    }
}

/// A line serving a stop.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopLine {
    pub route_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub headsigns: Vec<String>,
}

impl StopLine {
    /// `"500T – Tuzla - Cevizlibağ"`, or just the code when unnamed.
    pub fn label(&self) -> String {
        let code = self.code.as_deref().unwrap_or("-");
        match &self.name {
            Some(name) if !name.is_empty() => format!("{code} – {name}"),
            _ => code.to_owned(),
        }
    }
}
