use std::{fmt, time::Duration};

use async_trait::async_trait;
use model::location::Point;

use crate::service::LocationProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    PermissionDenied,
    Unavailable,
    Timeout,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "location permission denied"),
            Self::Unavailable => write!(f, "location unavailable"),
            Self::Timeout => write!(f, "location request timed out"),
        }
    }
}

impl std::error::Error for LocationError {}

/// A device location known up front. `None` behaves like a user who refused
/// the location permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Point>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self, _timeout: Duration) -> Result<Point, LocationError> {
        self.0.ok_or(LocationError::PermissionDenied)
    }
}

/// Caps any provider's answer at `timeout`.
pub async fn locate(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> Result<Point, LocationError> {
    tokio::time::timeout(timeout, provider.current_position(timeout))
        .await
        .unwrap_or(Err(LocationError::Timeout))
}
