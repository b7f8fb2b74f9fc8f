//! Core data models for the roof layout engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Axis-aligned lat/lng rectangle. `ne` is strictly north-east of `sw`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub ne: Coordinate,
    pub sw: Coordinate,
}

impl Bounds {
    pub fn lat_span(&self) -> f64 {
        self.ne.latitude - self.sw.latitude
    }

    pub fn lng_span(&self) -> f64 {
        self.ne.longitude - self.sw.longitude
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: (self.ne.latitude + self.sw.latitude) / 2.0,
            longitude: (self.ne.longitude + self.sw.longitude) / 2.0,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.ne.is_finite()
            && self.sw.is_finite()
            && self.ne.latitude > self.sw.latitude
            && self.ne.longitude > self.sw.longitude
    }

    /// True if `point` lies strictly inside the rectangle.
    pub fn contains_strictly(&self, point: &Coordinate) -> bool {
        self.contains_with_inset(point, 0.0, 0.0)
    }

    /// True if `point` lies inside the rectangle shrunk by the given insets on every edge.
    pub fn contains_with_inset(&self, point: &Coordinate, lat_inset: f64, lng_inset: f64) -> bool {
        point.latitude > self.sw.latitude + lat_inset
            && point.latitude < self.ne.latitude - lat_inset
            && point.longitude > self.sw.longitude + lng_inset
            && point.longitude < self.ne.longitude - lng_inset
    }

    /// True if the two rectangles share any interior area.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.sw.latitude < other.ne.latitude
            && other.sw.latitude < self.ne.latitude
            && self.sw.longitude < other.ne.longitude
            && other.sw.longitude < self.ne.longitude
    }
}

/// Coarse bucket summarising a segment's solar exposure.
///
/// Variants are declared worst-first so the derived ordering reads
/// `Low < Moderate < Good < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityClass {
    Low,
    Moderate,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelOrientation {
    Landscape,
    #[default]
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageryQuality {
    Low,
    Medium,
    High,
}

/// Where a profile's roof data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Provider,
    Synthesized,
}

/// One planar face of a roof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSegment {
    pub index: usize,
    pub bounds: Bounds,
    pub center: Coordinate,
    pub area_m2: f64,
    pub pitch_degrees: f64,
    /// Compass azimuth of the roof face, 180 = south.
    pub azimuth_degrees: f64,
    pub quality_class: QualityClass,
    /// Up to twelve sunshine samples on the annual-hours scale.
    pub monthly_sunshine_hours: Vec<f64>,
}

/// A possible panel position, generated before the user picks a count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelCandidate {
    pub center: Coordinate,
    pub orientation: PanelOrientation,
    /// Back-reference into `BuildingProfile::segments`.
    pub segment_index: usize,
    pub yearly_energy_kwh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelDimensions {
    pub width_m: f64,
    pub height_m: f64,
    pub capacity_w: f64,
}

impl Default for PanelDimensions {
    fn default() -> Self {
        Self {
            width_m: 1.045,
            height_m: 1.879,
            capacity_w: 400.0,
        }
    }
}

impl PanelDimensions {
    pub fn capacity_kw(&self) -> f64 {
        self.capacity_w / 1000.0
    }

    /// Footprint as (north-south, east-west) meters for the given orientation.
    pub fn footprint_m(&self, orientation: PanelOrientation) -> (f64, f64) {
        match orientation {
            PanelOrientation::Portrait => (self.height_m, self.width_m),
            PanelOrientation::Landscape => (self.width_m, self.height_m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillReference {
    pub currency: String,
    pub amount: f64,
}

impl Default for BillReference {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            amount: 150.0,
        }
    }
}

/// Outcome of laying out one segment's grid.
///
/// `requested` is the segment's area share of the roof's panel ceiling.
/// Grids are near-square (`panels_per_row = ceil(sqrt(placed))`), so a long
/// shallow face is limited by its row count and may hold fewer panels than
/// a single full-width row would. Panels a segment cannot place are handed
/// to segments with room, which can leave `placed > requested` there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentLayout {
    pub segment_index: usize,
    pub orientation: PanelOrientation,
    pub requested: usize,
    pub placed: usize,
    pub rows: usize,
    pub panels_per_row: usize,
}

impl SegmentLayout {
    /// True when the segment could not fit every requested panel.
    pub fn capped(&self) -> bool {
        self.placed < self.requested
    }
}

/// Everything the map, slider and quote screens need for one coordinate.
///
/// Built once per lookup and never mutated; a new pin position produces a
/// new profile. `query` is the coordinate the profile was computed for so
/// callers can discard responses that arrive after a newer request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingProfile {
    pub building_id: String,
    pub query: Coordinate,
    pub source: ProfileSource,
    pub center: Coordinate,
    pub total_roof_area_m2: f64,
    pub max_panels: usize,
    pub imagery_quality: ImageryQuality,
    #[serde(default)]
    pub imagery_date: Option<NaiveDate>,
    pub segments: Vec<RoofSegment>,
    pub candidates: Vec<PanelCandidate>,
    #[serde(default)]
    pub layouts: Vec<SegmentLayout>,
    pub panel_dimensions: PanelDimensions,
    pub monthly_bill_reference: BillReference,
}

impl BuildingProfile {
    pub fn segment(&self, index: usize) -> Option<&RoofSegment> {
        self.segments.iter().find(|segment| segment.index == index)
    }

    /// True if this profile was computed for a different coordinate than `current`.
    pub fn is_stale_for(&self, current: &Coordinate) -> bool {
        self.query != *current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            ne: Coordinate::new(53.0002, -6.0),
            sw: Coordinate::new(53.0, -6.0003),
        }
    }

    #[test]
    fn quality_class_orders_worst_first() {
        assert!(QualityClass::Excellent > QualityClass::Good);
        assert!(QualityClass::Good > QualityClass::Moderate);
        assert!(QualityClass::Moderate > QualityClass::Low);
    }

    #[test]
    fn bounds_center_is_strictly_inside() {
        let b = bounds();
        assert!(b.is_well_formed());
        assert!(b.contains_strictly(&b.center()));
        assert!(!b.contains_strictly(&b.ne));
    }

    #[test]
    fn bounds_overlap_is_interior_only() {
        let a = bounds();
        let touching = Bounds {
            ne: Coordinate::new(53.0004, -6.0),
            sw: Coordinate::new(53.0002, -6.0003),
        };
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn footprint_swaps_with_orientation() {
        let dims = PanelDimensions::default();
        let (ns, ew) = dims.footprint_m(PanelOrientation::Portrait);
        assert_eq!((ns, ew), (1.879, 1.045));
        let (ns, ew) = dims.footprint_m(PanelOrientation::Landscape);
        assert_eq!((ns, ew), (1.045, 1.879));
    }

    #[test]
    fn enums_serialize_lowercase() {
        let json = serde_json::to_string(&QualityClass::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        let json = serde_json::to_string(&ImageryQuality::Low).unwrap();
        assert_eq!(json, "\"low\"");
    }
}
