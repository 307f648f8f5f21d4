use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// Totals of the latest successful driving-route query. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub total_distance_meters: f64,
    pub total_time_seconds: f64,
}

impl RouteSummary {
    pub fn new(total_distance_meters: f64, total_time_seconds: f64) -> Self {
        Self {
            total_distance_meters,
            total_time_seconds,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.total_distance_meters / 1000.0
    }

    /// Kilometers rounded to two decimals, halves away from zero.
    fn rounded_km(&self) -> f64 {
        (self.distance_km() * 100.0).round() / 100.0
    }

    pub fn minutes(&self) -> i64 {
        (self.total_time_seconds / 60.0).round() as i64
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km · {} min", self.rounded_km(), self.minutes())
    }
}

impl ExampleData for RouteSummary {
    fn example_data() -> Self {
        RouteSummary::new(12_346.0, 1_110.0)
    }
}
