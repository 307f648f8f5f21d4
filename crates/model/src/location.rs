use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{self, BoundingBox};

use crate::ExampleData;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance in meters.
    pub fn distance_to(&self, other: &Point) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    pub fn bbox(&self, delta_deg: f64) -> BoundingBox {
        BoundingBox::around(self.latitude, self.longitude, delta_deg)
    }

    /// Parses free text of the form `"41.01, 28.97"`. Only plain decimal
    /// numbers are accepted, anything else is left to the geocoder.
    pub fn parse_lat_lon(text: &str) -> Option<Point> {
        let captures = LAT_LON.as_ref()?.captures(text)?;
        Some(Point::new(
            captures[1].parse().ok()?,
            captures[2].parse().ok()?,
        ))
    }
}

lazy_static! {
    static ref LAT_LON: Option<Regex> =
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").ok();
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

impl ExampleData for Point {
    fn example_data() -> Self {
        Point::new(41.01, 28.97)
    }
}
