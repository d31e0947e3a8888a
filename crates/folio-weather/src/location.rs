//! Geolocation seam.
//!
//! The widget asks a `Geolocator` for the current position; callers bound the
//! wait with `PositionOptions::timeout`.

use std::future::Future;
use std::time::Duration;

use crate::types::Coordinates;

/// Location service errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation not supported.")]
    Unsupported,
    #[error("{0}")]
    Other(String),
}

/// Options for a single position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(8000),
        }
    }
}

/// Source of the device's current position
pub trait Geolocator: Send + Sync {
    /// False when the host has no location service at all
    fn is_supported(&self) -> bool {
        true
    }

    fn current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// Always reports the same position (configured or passed on the command line)
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

impl Geolocator for FixedLocator {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// For hosts without a location service
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

impl Geolocator for UnsupportedLocator {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}
