//! Error taxonomy shared by the layout engine and its callers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SolarError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolarError {
    /// The imagery provider has no coverage for the queried coordinate.
    #[error("no building found at the requested coordinate")]
    BuildingNotFound,
    /// Internal invariant violation (bad grid counts, degenerate bounds).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl SolarError {
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }
}
