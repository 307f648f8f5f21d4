use std::env;

use model::location::Point;

use crate::{BackendClient, FixedLocation, NominatimGeocoder, OsrmRouter};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org/route/v1";
pub const DEFAULT_OSRM_PROFILE: &str = "car";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "transit-map-planner/0.1";

/// Where the external services live.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub backend_url: String,
    pub osrm_url: String,
    pub osrm_profile: String,
    pub geocoder_url: String,
    pub geocoder_viewbox: Option<String>,
    pub user_agent: String,
    /// Stand-in for the device location; unset means the permission is denied.
    pub device_location: Option<Point>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            osrm_url: DEFAULT_OSRM_URL.to_owned(),
            osrm_profile: DEFAULT_OSRM_PROFILE.to_owned(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_owned(),
            geocoder_viewbox: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            device_location: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let device_location = var("MAP_LOCATION").and_then(|text| {
            let point = Point::parse_lat_lon(&text);
            if point.is_none() {
                log::warn!("ignoring MAP_LOCATION '{text}', expected 'lat, lon'");
            }
            point
        });

        Self {
            backend_url: var("TRANSIT_API_BASE").unwrap_or(defaults.backend_url),
            osrm_url: var("OSRM_URL").unwrap_or(defaults.osrm_url),
            osrm_profile: var("OSRM_PROFILE").unwrap_or(defaults.osrm_profile),
            geocoder_url: var("GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            geocoder_viewbox: var("GEOCODER_VIEWBOX"),
            user_agent: var("GEOCODER_USER_AGENT").unwrap_or(defaults.user_agent),
            device_location,
        }
    }

    pub fn backend(&self) -> BackendClient {
        BackendClient::new(self.backend_url.clone())
    }

    pub fn geocoder(&self) -> NominatimGeocoder {
        NominatimGeocoder::new(
            self.geocoder_url.clone(),
            self.user_agent.clone(),
            self.geocoder_viewbox.clone(),
        )
    }

    pub fn router(&self) -> OsrmRouter {
        OsrmRouter::new(self.osrm_url.clone(), self.osrm_profile.clone())
    }

    pub fn location(&self) -> FixedLocation {
        FixedLocation(self.device_location)
    }
}
