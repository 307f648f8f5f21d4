use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use serde_with;

pub mod line;
pub mod location;
pub mod route;
pub mod stop;
pub mod waypoint;

pub trait ExampleData {
    fn example_data() -> Self;
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_m: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_m: f64, content: T) -> Self {
        Self {
            distance_m,
            content,
        }
    }
}
