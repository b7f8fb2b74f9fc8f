//! Synthetic roof used when the imagery provider has no coverage.
//!
//! The synthesized profile goes through the same segment, candidate and
//! selection code as provider data, so downstream consumers never need a
//! "no data" branch. Geometry depends only on the query coordinate; the
//! per-candidate energy jitter is seeded from it as well.

use crate::candidates::{allocate_targets, generate_candidates, jitter_seed};
use crate::error::Result;
use crate::models::{
    BillReference, BuildingProfile, Coordinate, ImageryQuality, PanelDimensions, ProfileSource,
    RoofSegment,
};
use crate::spatial::{bounds_from_meters, offset_position};
use std::f64::consts::PI;

/// Panel ceiling declared for synthesized roofs.
pub const FALLBACK_MAX_PANELS: usize = 25;

/// Every synthesized segment lies within this distance of the query point.
pub const FALLBACK_RADIUS_M: f64 = 25.0;

/// Peak-to-mean swing of the synthetic seasonal sunshine curve.
const SEASONAL_AMPLITUDE: f64 = 0.25;

struct SegmentTemplate {
    north_m: f64,
    east_m: f64,
    half_ns_m: f64,
    half_ew_m: f64,
    pitch_degrees: f64,
    azimuth_degrees: f64,
    mean_sunshine_hours: f64,
}

// One template per quadrant around the anchor, so the boxes never overlap.
const TEMPLATES: [SegmentTemplate; 4] = [
    // South face, excellent exposure.
    SegmentTemplate {
        north_m: -6.5,
        east_m: 7.0,
        half_ns_m: 5.0,
        half_ew_m: 6.0,
        pitch_degrees: 30.0,
        azimuth_degrees: 180.0,
        mean_sunshine_hours: 1350.0,
    },
    // South-west face, good exposure.
    SegmentTemplate {
        north_m: -6.0,
        east_m: -7.0,
        half_ns_m: 4.5,
        half_ew_m: 5.5,
        pitch_degrees: 28.0,
        azimuth_degrees: 225.0,
        mean_sunshine_hours: 1100.0,
    },
    // Steeper west-south-west face, moderate exposure.
    SegmentTemplate {
        north_m: 6.0,
        east_m: -7.0,
        half_ns_m: 4.0,
        half_ew_m: 5.0,
        pitch_degrees: 25.0,
        azimuth_degrees: 240.0,
        mean_sunshine_hours: 900.0,
    },
    // East face, low exposure.
    SegmentTemplate {
        north_m: 6.0,
        east_m: 7.0,
        half_ns_m: 3.0,
        half_ew_m: 5.0,
        pitch_degrees: 20.0,
        azimuth_degrees: 90.0,
        mean_sunshine_hours: 700.0,
    },
];

pub const FALLBACK_SEGMENT_COUNT: usize = TEMPLATES.len();

/// Twelve monthly samples whose mean is exactly `mean_hours`, peaking mid-year.
fn seasonal_samples(mean_hours: f64) -> Vec<f64> {
    (0..12)
        .map(|month| {
            let phase = 2.0 * PI * (month as f64 - 5.5) / 12.0;
            mean_hours * (1.0 + SEASONAL_AMPLITUDE * phase.cos())
        })
        .collect()
}

/// Synthesize a plausible four-segment roof anchored at `query`.
///
/// Any finite coordinate succeeds; the only error is `InvalidGeometry` for a
/// non-finite one.
pub fn synthesize_profile(query: Coordinate) -> Result<BuildingProfile> {
    let panel = PanelDimensions::default();

    let segments = TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, template)| {
            let center = offset_position(query, template.north_m, template.east_m);
            let bounds = bounds_from_meters(center, template.half_ns_m, template.half_ew_m)?;
            RoofSegment::new(
                index,
                bounds,
                template.pitch_degrees,
                template.azimuth_degrees,
                seasonal_samples(template.mean_sunshine_hours),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let areas: Vec<f64> = segments.iter().map(|segment| segment.area_m2).collect();
    let targets = allocate_targets(&areas, FALLBACK_MAX_PANELS);
    let set = generate_candidates(&segments, &targets, &panel, jitter_seed(&query))?;

    Ok(BuildingProfile {
        building_id: format!("synthetic/{:.6},{:.6}", query.latitude, query.longitude),
        query,
        source: ProfileSource::Synthesized,
        center: query,
        total_roof_area_m2: areas.iter().sum(),
        max_panels: FALLBACK_MAX_PANELS,
        imagery_quality: ImageryQuality::Low,
        imagery_date: None,
        segments,
        candidates: set.candidates,
        layouts: set.layouts,
        panel_dimensions: panel,
        monthly_bill_reference: BillReference::default(),
    })
}
