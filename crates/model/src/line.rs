use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::BoundingBox;

use crate::{location::Point, ExampleData};

/// The drawn shape of a transit line.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineGeometry {
    pub code: String,
    pub name: Option<String>,
    pub path: Vec<Point>,
}

impl LineGeometry {
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(
            self.path
                .iter()
                .map(|point| (point.latitude, point.longitude)),
        )
    }
}

impl ExampleData for LineGeometry {
    fn example_data() -> Self {
        LineGeometry {
            code: "500T".to_owned(),
            name: Some("Tuzla - Cevizlibağ".to_owned()),
            path: vec![Point::new(41.00, 28.90), Point::new(41.02, 28.95)],
        }
    }
}

/// How a line overlay came to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    /// Looked up by line code.
    Search,
    /// Suggested as a connection between two stops.
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineOverlay {
    pub kind: OverlayKind,
    pub geometry: LineGeometry,
}
