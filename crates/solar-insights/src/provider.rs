//! Provider boundary for building insights lookups.

use crate::payload::BuildingInsightsPayload;
use solar_core::Coordinate;

/// Outcome of one provider lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    Success(Box<BuildingInsightsPayload>),
    /// The provider has no imagery for this location.
    NotFound,
    /// Network or infrastructure failure unrelated to coverage.
    TransportFailure(String),
}

/// Source of building insights for a coordinate.
#[allow(async_fn_in_trait)]
pub trait InsightsProvider {
    async fn building_insights(&self, location: Coordinate) -> ProviderResponse;
}

/// Provider that never has coverage, so every lookup is synthesized.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl InsightsProvider for OfflineProvider {
    async fn building_insights(&self, _location: Coordinate) -> ProviderResponse {
        ProviderResponse::NotFound
    }
}
