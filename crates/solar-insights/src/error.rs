//! Errors surfaced by the orchestrator.
//!
//! "No coverage" never appears here: it is recovered by synthesizing a roof.

use solar_core::SolarError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightsError {
    /// Network or provider outage. Callers should offer a retry.
    #[error("building insights provider unavailable: {0}")]
    Transport(String),
    /// Internal geometry invariant violated while building the profile.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl InsightsError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, InsightsError::Transport(_))
    }
}

impl From<SolarError> for InsightsError {
    fn from(err: SolarError) -> Self {
        match err {
            SolarError::InvalidGeometry(reason) => InsightsError::InvalidGeometry(reason),
            // Recovered by the orchestrator before any conversion.
            SolarError::BuildingNotFound => {
                InsightsError::InvalidGeometry("synthesized roof has no coverage".to_string())
            }
        }
    }
}
