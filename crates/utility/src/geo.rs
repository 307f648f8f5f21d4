use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in meters between two latitude/longitude pairs.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let dlat = to_radians(latitude_2 - latitude_1);
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + to_radians(latitude_1).cos()
            * to_radians(latitude_2).cos()
            * (dlon / 2.0).sin().powi(2);

    // rounding can push `a` slightly above 1 for antipodal points
    2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
}

/// Rectangular geographic filter in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Box extending `delta_deg` degrees in each direction around a point.
    pub fn around(latitude: f64, longitude: f64, delta_deg: f64) -> Self {
        Self {
            min_lon: longitude - delta_deg,
            max_lon: longitude + delta_deg,
            min_lat: latitude - delta_deg,
            max_lat: latitude + delta_deg,
        }
    }

    /// Smallest box containing every `(latitude, longitude)` pair, if any.
    pub fn enclosing<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        coordinates.into_iter().fold(None, |bbox, (lat, lon)| {
            Some(match bbox {
                None => Self::new(lon, lon, lat, lat),
                Some(b) => Self::new(
                    b.min_lon.min(lon),
                    b.max_lon.max(lon),
                    b.min_lat.min(lat),
                    b.max_lat.max(lat),
                ),
            })
        })
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}
