//! Public entry point: coordinate in, building profile out.
//!
//! Profiles are tagged with the coordinate they were computed for
//! (`BuildingProfile::query`). When several lookups are in flight, callers
//! keep only the result whose `query` matches their latest request; see
//! `solar_core::RoofSession`.

use crate::error::InsightsError;
use crate::normalize::normalize_payload;
use crate::provider::{InsightsProvider, ProviderResponse};
use solar_core::{synthesize_profile, BuildingProfile, Coordinate, SolarError};

pub use solar_core::default_panel_count;

fn validate_coordinate(coordinate: &Coordinate) -> Result<(), InsightsError> {
    let valid = coordinate.is_finite()
        && (-90.0..=90.0).contains(&coordinate.latitude)
        && (-180.0..=180.0).contains(&coordinate.longitude);
    if valid {
        Ok(())
    } else {
        Err(InsightsError::InvalidCoordinate {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        })
    }
}

/// Look up a coordinate and turn the result into a profile.
///
/// No coverage is recovered with a synthesized roof. Transport failures and
/// geometry errors are returned as-is and never replaced with synthetic data.
pub async fn fetch_and_process<P: InsightsProvider>(
    provider: &P,
    coordinate: Coordinate,
) -> Result<BuildingProfile, InsightsError> {
    validate_coordinate(&coordinate)?;

    let normalized = match provider.building_insights(coordinate).await {
        ProviderResponse::Success(payload) => normalize_payload(coordinate, &payload),
        ProviderResponse::NotFound => Err(SolarError::BuildingNotFound),
        ProviderResponse::TransportFailure(reason) => {
            tracing::warn!(
                lat = coordinate.latitude,
                lng = coordinate.longitude,
                "Building insights unavailable: {}",
                reason
            );
            return Err(InsightsError::Transport(reason));
        }
    };

    match normalized {
        Ok(profile) => {
            tracing::info!(
                building = %profile.building_id,
                segments = profile.segments.len(),
                candidates = profile.candidates.len(),
                max_panels = profile.max_panels,
                "Building profile ready"
            );
            Ok(profile)
        }
        Err(SolarError::BuildingNotFound) => {
            tracing::info!(
                lat = coordinate.latitude,
                lng = coordinate.longitude,
                "No coverage, synthesizing fallback roof"
            );
            Ok(synthesize_profile(coordinate)?)
        }
        Err(err) => {
            tracing::error!(
                lat = coordinate.latitude,
                lng = coordinate.longitude,
                "Failed to build profile: {}",
                err
            );
            Err(err.into())
        }
    }
}
