//! Candidate panel grid generation.
//!
//! Each segment gets a near-square grid of candidate positions laid out
//! inside its bounds. Grid cells are at least one panel footprint apart and
//! the outermost cells sit one full spacing from the segment edge, so every
//! candidate is inset by more than half a panel on all sides.

use crate::error::{Result, SolarError};
use crate::models::{
    Coordinate, PanelCandidate, PanelDimensions, PanelOrientation, RoofSegment, SegmentLayout,
};
use crate::spatial::{grid_spacing, lat_to_meters, lon_to_meters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-candidate energy varies by at most this fraction of the segment's base yield.
pub const ENERGY_JITTER_RATIO: f64 = 0.05;

/// Candidates and layout summary for one segment.
#[derive(Debug, Clone)]
pub struct SegmentGrid {
    pub layout: SegmentLayout,
    pub candidates: Vec<PanelCandidate>,
}

/// Candidates for a whole roof, ordered by segment then generation order.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub candidates: Vec<PanelCandidate>,
    pub layouts: Vec<SegmentLayout>,
}

/// Columns and rows of the near-square grid holding `target` panels.
pub fn grid_shape(target: usize) -> (usize, usize) {
    if target == 0 {
        return (0, 0);
    }
    let panels_per_row = (target as f64).sqrt().ceil() as usize;
    let rows = target.div_ceil(panels_per_row);
    (panels_per_row, rows)
}

/// Largest cell count along one axis with spacing of at least one footprint.
fn max_cells(span_m: f64, footprint_m: f64) -> usize {
    if !(span_m.is_finite() && footprint_m.is_finite()) || footprint_m <= 0.0 {
        return 0;
    }
    ((span_m / footprint_m).floor() as usize).saturating_sub(1)
}

/// Largest count `<= target` whose grid shape fits in `max_rows` x `max_cols`.
///
/// Both sides of `grid_shape` grow with the count, so the fitting counts
/// form a prefix and a binary search finds the largest one.
fn fitted_count(target: usize, max_rows: usize, max_cols: usize) -> usize {
    let fits = |count: usize| {
        let (cols, rows) = grid_shape(count);
        cols <= max_cols && rows <= max_rows
    };
    let (mut lo, mut hi) = (0, target.min(max_rows.saturating_mul(max_cols)));
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Pick the orientation that fits the most panels, preferring portrait on ties.
fn choose_orientation(
    segment: &RoofSegment,
    target: usize,
    panel: &PanelDimensions,
) -> (PanelOrientation, usize) {
    let ref_lat = segment.center.latitude;
    let ns_span_m = lat_to_meters(segment.bounds.lat_span(), ref_lat);
    let ew_span_m = lon_to_meters(segment.bounds.lng_span(), ref_lat);

    let fit_for = |orientation: PanelOrientation| {
        let (ns_m, ew_m) = panel.footprint_m(orientation);
        fitted_count(target, max_cells(ns_span_m, ns_m), max_cells(ew_span_m, ew_m))
    };

    let portrait = fit_for(PanelOrientation::Portrait);
    let landscape = fit_for(PanelOrientation::Landscape);
    if landscape > portrait {
        (PanelOrientation::Landscape, landscape)
    } else {
        (PanelOrientation::Portrait, portrait)
    }
}

/// Lay out up to `target` candidates on one segment.
///
/// A `target` of zero, or a segment too small for a single panel, yields an
/// empty grid. When fewer than `target` panels fit, the layout records the
/// smaller `placed` count.
pub fn generate_segment_candidates<R: Rng>(
    segment: &RoofSegment,
    target: usize,
    panel: &PanelDimensions,
    rng: &mut R,
) -> Result<SegmentGrid> {
    if !segment.bounds.is_well_formed() {
        return Err(SolarError::invalid_geometry(format!(
            "segment {} has degenerate bounds",
            segment.index
        )));
    }

    let (orientation, placed) = choose_orientation(segment, target, panel);
    let (panels_per_row, rows) = grid_shape(placed);
    let layout = SegmentLayout {
        segment_index: segment.index,
        orientation,
        requested: target,
        placed,
        rows,
        panels_per_row,
    };
    if placed == 0 {
        return Ok(SegmentGrid {
            layout,
            candidates: Vec::new(),
        });
    }

    let sw = segment.bounds.sw;
    let lat_spacing = grid_spacing(segment.bounds.lat_span(), rows)?;
    let lng_spacing = grid_spacing(segment.bounds.lng_span(), panels_per_row)?;
    let base_yield = segment.base_yield_kwh(panel);

    let candidates = (0..placed)
        .map(|i| {
            let (row, col) = (i / panels_per_row, i % panels_per_row);
            let jitter = rng.random_range(-ENERGY_JITTER_RATIO..=ENERGY_JITTER_RATIO);
            PanelCandidate {
                center: Coordinate {
                    latitude: sw.latitude + (row as f64 + 1.0) * lat_spacing,
                    longitude: sw.longitude + (col as f64 + 1.0) * lng_spacing,
                },
                orientation,
                segment_index: segment.index,
                yearly_energy_kwh: base_yield * (1.0 + jitter),
            }
        })
        .collect();

    Ok(SegmentGrid { layout, candidates })
}

/// Most panels one segment can hold in either orientation.
pub fn segment_capacity(segment: &RoofSegment, panel: &PanelDimensions) -> usize {
    choose_orientation(segment, usize::MAX, panel).1
}

/// Most panels the whole roof can hold.
pub fn roof_capacity(segments: &[RoofSegment], panel: &PanelDimensions) -> usize {
    segments
        .iter()
        .map(|segment| segment_capacity(segment, panel))
        .fold(0, usize::saturating_add)
}

/// Clamp each target to its segment's capacity and hand what is left over
/// to segments with room, split by area. Stops once the overflow is placed
/// or every segment is full.
fn redistribute_targets(targets: &[usize], capacities: &[usize], areas: &[f64]) -> Vec<usize> {
    let mut effective: Vec<usize> = targets
        .iter()
        .zip(capacities)
        .map(|(target, capacity)| (*target).min(*capacity))
        .collect();
    let mut overflow = targets
        .iter()
        .sum::<usize>()
        .saturating_sub(effective.iter().sum());

    while overflow > 0 {
        let open: Vec<usize> = (0..effective.len())
            .filter(|&i| effective[i] < capacities[i])
            .collect();
        if open.is_empty() {
            break;
        }
        let open_areas: Vec<f64> = open.iter().map(|&i| areas[i]).collect();
        // Every round either places the whole overflow or fills a segment.
        for (&i, share) in open.iter().zip(allocate_targets(&open_areas, overflow)) {
            let granted = share.min(capacities[i] - effective[i]);
            effective[i] += granted;
            overflow -= granted;
        }
    }
    effective
}

/// Generate candidates for every segment with a jitter stream seeded by `seed`.
///
/// `targets[i]` is the requested panel count for `segments[i]`; missing
/// entries count as zero. Panels a segment cannot fit move to segments with
/// room, so the roof gets `min(sum(targets), roof_capacity)` candidates.
/// Each layout keeps its original target as `requested`.
pub fn generate_candidates(
    segments: &[RoofSegment],
    targets: &[usize],
    panel: &PanelDimensions,
    seed: u64,
) -> Result<CandidateSet> {
    let requested: Vec<usize> = (0..segments.len())
        .map(|position| targets.get(position).copied().unwrap_or(0))
        .collect();
    let capacities: Vec<usize> = segments
        .iter()
        .map(|segment| segment_capacity(segment, panel))
        .collect();
    let areas: Vec<f64> = segments.iter().map(|segment| segment.area_m2).collect();
    let effective = redistribute_targets(&requested, &capacities, &areas);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut set = CandidateSet::default();
    for ((segment, target), requested) in segments.iter().zip(effective).zip(requested) {
        let mut grid = generate_segment_candidates(segment, target, panel, &mut rng)?;
        grid.layout.requested = requested;
        set.layouts.push(grid.layout);
        set.candidates.extend(grid.candidates);
    }
    Ok(set)
}

/// Split a panel budget across segments in proportion to their areas.
///
/// Uses largest-remainder rounding so the shares always sum to `total`.
/// Ties in the remainder go to the earlier segment. Non-finite or negative
/// areas count as zero; if every area is zero the budget is split evenly.
pub fn allocate_targets(areas: &[f64], total: usize) -> Vec<usize> {
    if areas.is_empty() {
        return Vec::new();
    }
    let weights: Vec<f64> = areas
        .iter()
        .map(|area| if area.is_finite() && *area > 0.0 { *area } else { 0.0 })
        .collect();
    let weight_sum: f64 = weights.iter().sum();
    let weights = if weight_sum > 0.0 {
        weights
    } else {
        vec![1.0; areas.len()]
    };
    let weight_sum: f64 = weights.iter().sum();

    let quotas: Vec<f64> = weights
        .iter()
        .map(|weight| total as f64 * weight / weight_sum)
        .collect();
    let mut shares: Vec<usize> = quotas.iter().map(|quota| quota.floor() as usize).collect();
    let assigned: usize = shares.iter().sum();
    let mut leftover = total.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = quotas[a] - quotas[a].floor();
        let frac_b = quotas[b] - quotas[b].floor();
        frac_b.total_cmp(&frac_a).then_with(|| a.cmp(&b))
    });
    for index in order.into_iter().cycle() {
        if leftover == 0 {
            break;
        }
        shares[index] += 1;
        leftover -= 1;
    }
    shares
}

/// Stable 64-bit seed derived from a coordinate.
pub fn jitter_seed(coordinate: &Coordinate) -> u64 {
    let mut z = coordinate
        .latitude
        .to_bits()
        .rotate_left(29)
        ^ coordinate.longitude.to_bits();
    // splitmix64 finalizer
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{bounds_from_meters, meters_to_lat, meters_to_lon};

    fn segment(half_ns_m: f64, half_ew_m: f64, hours: f64) -> RoofSegment {
        let bounds = bounds_from_meters(Coordinate::new(53.3498, -6.2603), half_ns_m, half_ew_m)
            .unwrap();
        RoofSegment::new(0, bounds, 30.0, 180.0, vec![hours; 12]).unwrap()
    }

    fn assert_contained(segment: &RoofSegment, candidates: &[PanelCandidate], panel: &PanelDimensions) {
        let ref_lat = segment.center.latitude;
        for candidate in candidates {
            let (ns_m, ew_m) = panel.footprint_m(candidate.orientation);
            let lat_inset = meters_to_lat(ns_m / 2.0, ref_lat);
            let lng_inset = meters_to_lon(ew_m / 2.0, ref_lat);
            assert!(
                segment
                    .bounds
                    .contains_with_inset(&candidate.center, lat_inset, lng_inset),
                "candidate {:?} escapes segment bounds {:?}",
                candidate.center,
                segment.bounds
            );
        }
    }

    #[test]
    fn grid_shape_is_near_square() {
        assert_eq!(grid_shape(0), (0, 0));
        assert_eq!(grid_shape(1), (1, 1));
        assert_eq!(grid_shape(5), (3, 2));
        assert_eq!(grid_shape(9), (3, 3));
        assert_eq!(grid_shape(10), (4, 3));
    }

    #[test]
    fn zero_target_yields_empty_grid() {
        let seg = segment(5.0, 6.0, 1300.0);
        let mut rng = StdRng::seed_from_u64(1);
        let grid =
            generate_segment_candidates(&seg, 0, &PanelDimensions::default(), &mut rng).unwrap();
        assert!(grid.candidates.is_empty());
        assert_eq!(grid.layout.placed, 0);
        assert!(!grid.layout.capped());
    }

    #[test]
    fn candidates_stay_inside_segment() {
        let seg = segment(5.0, 6.0, 1300.0);
        let panel = PanelDimensions::default();
        let mut rng = StdRng::seed_from_u64(7);
        let grid = generate_segment_candidates(&seg, 8, &panel, &mut rng).unwrap();
        assert_eq!(grid.candidates.len(), 8);
        assert!(!grid.layout.capped());
        assert_contained(&seg, &grid.candidates, &panel);
    }

    #[test]
    fn oversized_target_is_capped_not_overflowed() {
        let seg = segment(3.0, 3.0, 1300.0);
        let panel = PanelDimensions::default();
        let mut rng = StdRng::seed_from_u64(7);
        let grid = generate_segment_candidates(&seg, 10_000, &panel, &mut rng).unwrap();
        assert!(grid.layout.capped());
        assert_eq!(grid.layout.requested, 10_000);
        assert_eq!(grid.layout.placed, grid.candidates.len());
        assert!(!grid.candidates.is_empty());
        assert_contained(&seg, &grid.candidates, &panel);
    }

    #[test]
    fn tiny_segment_fits_nothing() {
        let seg = segment(0.5, 0.5, 1300.0);
        let mut rng = StdRng::seed_from_u64(7);
        let grid =
            generate_segment_candidates(&seg, 4, &PanelDimensions::default(), &mut rng).unwrap();
        assert!(grid.candidates.is_empty());
        assert!(grid.layout.capped());
    }

    #[test]
    fn wide_shallow_segment_prefers_landscape() {
        // 2.4m deep fits no portrait row (needs 2 x 1.879m) but one landscape row (2 x 1.045m).
        let seg = segment(1.2, 8.0, 1300.0);
        let mut rng = StdRng::seed_from_u64(3);
        let grid =
            generate_segment_candidates(&seg, 3, &PanelDimensions::default(), &mut rng).unwrap();
        assert_eq!(grid.layout.orientation, PanelOrientation::Landscape);
        // Three panels need a 2x2 grid, which the single row cannot hold.
        assert_eq!(grid.layout.rows, 1);
        assert_eq!(grid.candidates.len(), 2);
        assert!(grid
            .candidates
            .iter()
            .all(|c| c.orientation == PanelOrientation::Landscape));
    }

    #[test]
    fn energy_jitter_is_bounded() {
        let seg = segment(5.0, 6.0, 1100.0);
        let panel = PanelDimensions::default();
        let base = seg.base_yield_kwh(&panel);
        let mut rng = StdRng::seed_from_u64(99);
        let grid = generate_segment_candidates(&seg, 12, &panel, &mut rng).unwrap();
        for candidate in &grid.candidates {
            let ratio = candidate.yearly_energy_kwh / base;
            assert!(
                (1.0 - ENERGY_JITTER_RATIO - 1e-9..=1.0 + ENERGY_JITTER_RATIO + 1e-9)
                    .contains(&ratio),
                "ratio {ratio} out of range"
            );
        }
    }

    #[test]
    fn same_seed_same_candidates() {
        let segs = vec![segment(5.0, 6.0, 1300.0)];
        let panel = PanelDimensions::default();
        let a = generate_candidates(&segs, &[6], &panel, 42).unwrap();
        let b = generate_candidates(&segs, &[6], &panel, 42).unwrap();
        assert_eq!(a.candidates, b.candidates);
        assert_eq!(a.layouts, b.layouts);
    }

    fn segment_at(index: usize, center: Coordinate, half_m: f64, area_m2: f64) -> RoofSegment {
        let bounds = bounds_from_meters(center, half_m, half_m).unwrap();
        let mut segment = RoofSegment::new(index, bounds, 30.0, 180.0, vec![1300.0; 12]).unwrap();
        segment.area_m2 = area_m2;
        segment
    }

    fn two_faces() -> Vec<RoofSegment> {
        // Equal declared areas, but only the 20m face can hold panels.
        vec![
            segment_at(0, Coordinate::new(53.3498, -6.2603), 10.0, 100.0),
            segment_at(1, Coordinate::new(53.3502, -6.2603), 1.5, 100.0),
        ]
    }

    #[test]
    fn unplaced_panels_move_to_segments_with_room() {
        let segs = two_faces();
        let panel = PanelDimensions::default();
        assert_eq!(segment_capacity(&segs[1], &panel), 0);
        assert!(segment_capacity(&segs[0], &panel) >= 20);

        let targets = allocate_targets(&[100.0, 100.0], 20);
        assert_eq!(targets, vec![10, 10]);
        let set = generate_candidates(&segs, &targets, &panel, 5).unwrap();
        assert_eq!(set.candidates.len(), 20);
        assert!(set.candidates.iter().all(|c| c.segment_index == 0));
        assert_eq!(set.layouts[0].placed, 20);
        assert_eq!(set.layouts[0].requested, 10);
        assert!(set.layouts[1].capped());
        assert_contained(&segs[0], &set.candidates, &panel);
    }

    #[test]
    fn candidate_total_is_budget_or_roof_capacity() {
        let segs = two_faces();
        let panel = PanelDimensions::default();
        let capacity = roof_capacity(&segs, &panel);
        for budget in [0, 7, 20, capacity, capacity + 40, 10_000] {
            let targets = allocate_targets(&[100.0, 100.0], budget);
            let set = generate_candidates(&segs, &targets, &panel, 5).unwrap();
            assert_eq!(set.candidates.len(), budget.min(capacity), "budget {budget}");
        }
    }

    #[test]
    fn capacity_follows_near_square_shape() {
        let panel = PanelDimensions::default();
        // One landscape row of up to seven cells holds a 2x1 grid at most.
        assert_eq!(segment_capacity(&segment(1.2, 8.0, 1300.0), &panel), 2);
        assert_eq!(fitted_count(usize::MAX, 4, 8), 20);
        assert_eq!(fitted_count(10, 4, 8), 10);
        assert_eq!(fitted_count(5, 0, 8), 0);
    }

    #[test]
    fn allocate_targets_sums_to_total() {
        let shares = allocate_targets(&[120.0, 100.0, 80.0, 60.0], 25);
        assert_eq!(shares.iter().sum::<usize>(), 25);
        assert_eq!(shares, vec![8, 7, 6, 4]);
    }

    #[test]
    fn allocate_targets_handles_degenerate_areas() {
        assert!(allocate_targets(&[], 10).is_empty());
        assert_eq!(allocate_targets(&[0.0, f64::NAN], 3), vec![2, 1]);
        assert_eq!(allocate_targets(&[10.0, 10.0], 0), vec![0, 0]);
    }

    #[test]
    fn jitter_seed_depends_on_coordinate() {
        let a = jitter_seed(&Coordinate::new(53.3498, -6.2603));
        let b = jitter_seed(&Coordinate::new(53.3498, -6.2603));
        let c = jitter_seed(&Coordinate::new(53.3499, -6.2603));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
