//! Convert a provider payload into a `BuildingProfile`.

use crate::payload::{parse_imagery_quality, BuildingInsightsPayload, RoofSegmentStats};
use solar_core::spatial::bounds_from_meters;
use solar_core::{
    allocate_targets, generate_candidates, jitter_seed, roof_capacity, BillReference, Bounds,
    BuildingProfile, Coordinate, PanelDimensions, ProfileSource, Result, RoofSegment, SolarError,
};

/// Resolve a segment's rectangle: the provider bounding box when it is
/// usable, otherwise a square of the segment's area around its center.
fn segment_bounds(stats: &RoofSegmentStats) -> Result<Option<Bounds>> {
    if let Some(bbox) = stats.bounding_box {
        let bounds = Bounds {
            ne: bbox.ne.into(),
            sw: bbox.sw.into(),
        };
        if bounds.is_well_formed() {
            return Ok(Some(bounds));
        }
    }
    match stats.center {
        Some(center) if stats.stats.area_meters2 > 0.0 => {
            let half_side_m = stats.stats.area_meters2.sqrt() / 2.0;
            bounds_from_meters(center.into(), half_side_m, half_side_m).map(Some)
        }
        _ => Ok(None),
    }
}

fn panel_dimensions(payload: &BuildingInsightsPayload) -> PanelDimensions {
    let defaults = PanelDimensions::default();
    let positive = |value: Option<f64>, fallback: f64| {
        value
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(fallback)
    };
    let potential = &payload.solar_potential;
    PanelDimensions {
        width_m: positive(potential.panel_width_meters, defaults.width_m),
        height_m: positive(potential.panel_height_meters, defaults.height_m),
        capacity_w: positive(potential.panel_capacity_watts, defaults.capacity_w),
    }
}

fn bill_reference(payload: &BuildingInsightsPayload) -> BillReference {
    payload
        .solar_potential
        .financial_analyses
        .iter()
        .filter_map(|analysis| analysis.monthly_bill.as_ref())
        .find_map(|bill| {
            bill.amount().map(|amount| BillReference {
                currency: bill.currency_code.clone(),
                amount,
            })
        })
        .unwrap_or_default()
}

/// Build a profile from provider data.
///
/// Segments with neither a usable bounding box nor a center and area are
/// skipped. When the provider gives no panel ceiling (absent or zero), the
/// number of panels the segments can actually hold is used instead. A
/// payload without usable segments yields a provider profile with no
/// segments; segments that cannot hold a single panel are an
/// `InvalidGeometry` error.
pub fn normalize_payload(
    query: Coordinate,
    payload: &BuildingInsightsPayload,
) -> Result<BuildingProfile> {
    let potential = &payload.solar_potential;
    let whole_roof_samples = potential
        .whole_roof_stats
        .as_ref()
        .map(|stats| stats.sunshine_quantiles.clone())
        .unwrap_or_default();

    let mut segments = Vec::with_capacity(potential.roof_segment_stats.len());
    for (index, stats) in potential.roof_segment_stats.iter().enumerate() {
        let Some(bounds) = segment_bounds(stats)? else {
            continue;
        };
        let samples = if stats.stats.sunshine_quantiles.is_empty() {
            whole_roof_samples.clone()
        } else {
            stats.stats.sunshine_quantiles.clone()
        };
        let mut segment = RoofSegment::new(
            index,
            bounds,
            stats.pitch_degrees,
            stats.azimuth_degrees,
            samples,
        )?;
        // The provider's figure accounts for pitch; the box area does not.
        if stats.stats.area_meters2 > 0.0 {
            segment.area_m2 = stats.stats.area_meters2;
        }
        segments.push(segment);
    }

    let panel = panel_dimensions(payload);
    let capacity = roof_capacity(&segments, &panel);
    let max_panels = match potential.max_array_panels_count {
        Some(count) if count > 0 => count as usize,
        _ => capacity,
    };
    let areas: Vec<f64> = segments.iter().map(|segment| segment.area_m2).collect();
    let targets = allocate_targets(&areas, max_panels);
    let set = generate_candidates(&segments, &targets, &panel, jitter_seed(&query))?;
    if !segments.is_empty() && set.candidates.is_empty() {
        return Err(SolarError::invalid_geometry(format!(
            "{} roof segments hold no {:.3}x{:.3}m panel",
            segments.len(),
            panel.width_m,
            panel.height_m
        )));
    }

    let total_roof_area_m2 = potential
        .whole_roof_stats
        .as_ref()
        .map(|stats| stats.area_meters2)
        .filter(|area| *area > 0.0)
        .unwrap_or_else(|| areas.iter().sum());

    Ok(BuildingProfile {
        building_id: payload
            .name
            .clone()
            .unwrap_or_else(|| format!("buildings/{:.6},{:.6}", query.latitude, query.longitude)),
        query,
        source: ProfileSource::Provider,
        center: payload.center.into(),
        total_roof_area_m2,
        max_panels,
        imagery_quality: parse_imagery_quality(payload.imagery_quality.as_deref()),
        imagery_date: payload.imagery_date.and_then(|date| date.to_naive()),
        segments,
        candidates: set.candidates,
        layouts: set.layouts,
        panel_dimensions: panel,
        monthly_bill_reference: bill_reference(payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{LatLng, LatLngBox, SizeAndSunshineStats, SolarPotential};

    fn stats(bbox: Option<LatLngBox>, center: Option<LatLng>, area: f64) -> RoofSegmentStats {
        RoofSegmentStats {
            pitch_degrees: 25.0,
            azimuth_degrees: 180.0,
            stats: SizeAndSunshineStats {
                area_meters2: area,
                sunshine_quantiles: vec![1300.0; 11],
            },
            center,
            bounding_box: bbox,
        }
    }

    fn payload(segments: Vec<RoofSegmentStats>, max_panels: Option<u32>) -> BuildingInsightsPayload {
        BuildingInsightsPayload {
            name: None,
            center: LatLng {
                latitude: 53.3498,
                longitude: -6.2603,
            },
            imagery_quality: Some("MEDIUM".to_string()),
            imagery_date: None,
            solar_potential: SolarPotential {
                max_array_panels_count: max_panels,
                roof_segment_stats: segments,
                ..SolarPotential::default()
            },
        }
    }

    #[test]
    fn inverted_box_falls_back_to_center_and_area() {
        let inverted = LatLngBox {
            sw: LatLng {
                latitude: 53.3500,
                longitude: -6.2600,
            },
            ne: LatLng {
                latitude: 53.3498,
                longitude: -6.2603,
            },
        };
        let center = LatLng {
            latitude: 53.3498,
            longitude: -6.2603,
        };
        let bounds = segment_bounds(&stats(Some(inverted), Some(center), 100.0))
            .unwrap()
            .unwrap();
        assert!(bounds.is_well_formed());
        assert!(bounds.contains_strictly(&center.into()));
    }

    #[test]
    fn segment_without_geometry_is_skipped() {
        assert_eq!(segment_bounds(&stats(None, None, 50.0)).unwrap(), None);
    }

    fn dublin_center() -> LatLng {
        LatLng {
            latitude: 53.3498,
            longitude: -6.2603,
        }
    }

    #[test]
    fn payload_without_segments_keeps_provider_data() {
        let query = Coordinate::new(53.3498, -6.2603);
        let profile = normalize_payload(query, &payload(vec![], Some(10))).unwrap();
        assert_eq!(profile.source, ProfileSource::Provider);
        assert!(profile.segments.is_empty());
        assert!(profile.candidates.is_empty());
        assert_eq!(profile.max_panels, 10);
    }

    #[test]
    fn missing_panel_ceiling_uses_roof_capacity() {
        let query = Coordinate::new(53.3498, -6.2603);
        for ceiling in [None, Some(0)] {
            let profile = normalize_payload(
                query,
                &payload(vec![stats(None, Some(dublin_center()), 100.0)], ceiling),
            )
            .unwrap();
            let capacity = roof_capacity(&profile.segments, &profile.panel_dimensions);
            assert!(capacity > 0);
            assert_eq!(profile.source, ProfileSource::Provider);
            assert_eq!(profile.max_panels, capacity);
            assert_eq!(profile.candidates.len(), capacity);
        }
    }

    #[test]
    fn segments_too_small_for_a_panel_are_invalid_geometry() {
        let query = Coordinate::new(53.3498, -6.2603);
        let err = normalize_payload(
            query,
            &payload(vec![stats(None, Some(dublin_center()), 2.0)], Some(4)),
        )
        .unwrap_err();
        assert!(matches!(err, SolarError::InvalidGeometry(_)));
    }

    #[test]
    fn defaults_fill_missing_panel_and_bill_data() {
        let query = Coordinate::new(53.3498, -6.2603);
        let profile = normalize_payload(
            query,
            &payload(vec![stats(None, Some(dublin_center()), 100.0)], Some(6)),
        )
        .unwrap();
        assert_eq!(profile.panel_dimensions, PanelDimensions::default());
        assert_eq!(profile.monthly_bill_reference, BillReference::default());
        assert_eq!(profile.candidates.len(), 6);
        assert_eq!(profile.segments[0].area_m2, 100.0);
        assert_eq!(profile.source, ProfileSource::Provider);
    }
}
