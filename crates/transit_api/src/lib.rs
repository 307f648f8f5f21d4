use std::error;
use std::fmt;
use std::sync::Arc;

pub mod client;
pub mod config;
pub mod geocode;
pub mod location;
pub mod routing;
pub mod service;
pub mod wire;

pub use client::BackendClient;
pub use config::ServiceConfig;
pub use geocode::NominatimGeocoder;
pub use location::{FixedLocation, LocationError};
pub use routing::{ComputedRoute, OsrmRouter};
pub use service::{Geocoder, LocationProvider, RoutingEngine, StopSource, TransitBackend};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    /// The routing engine answered, but without a usable route.
    NoRoute(String),
    Other(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::NoRoute(code) => write!(f, "No route: {}", code),
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

/// Fetch and decode a JSON document, mapping any non-200 status to
/// `ApiError::InvalidResponse`.
pub(crate) async fn get_json<T>(request: reqwest::RequestBuilder) -> ApiResult<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let response = request.send().await?;
    let url = response.url().to_string();
    log::info!("Requested Endpoint '{url}'.");

    match response.status() {
        reqwest::StatusCode::OK => {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        }
        other => match response.text().await {
            Ok(val) => Err(ApiError::InvalidResponse {
                status_code: other,
                url,
                response: Some(val),
            }),
            Err(_) => Err(ApiError::InvalidResponse {
                status_code: other,
                url,
                response: None,
            }),
        },
    }
}
