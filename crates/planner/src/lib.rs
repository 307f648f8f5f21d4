use std::time::Duration;

pub mod control;
pub mod flow;
pub mod layer;
pub mod locator;
pub mod notify;
pub mod reconciler;
pub mod session;
pub mod suggestion;
pub mod viewport;
pub mod waypoints;

pub use session::{MapSession, Services, SessionEvent, SessionRef, SessionView, UiCommand};

/// Longest wait for the device position.
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(10);
