//! Solar Core - roof layout engine
//!
//! Turns roof segment data (real or synthesized) into candidate panel
//! positions, selects the best subset for a requested panel count and
//! projects cost, savings and emissions for it. Everything here is pure
//! and synchronous; provider I/O lives in `solar-insights`.

pub mod candidates;
pub mod error;
pub mod fallback;
pub mod models;
pub mod projection;
pub mod segment;
pub mod selection;
pub mod session;
pub mod spatial;

pub use candidates::{
    allocate_targets, generate_candidates, generate_segment_candidates, grid_shape, jitter_seed,
    roof_capacity, segment_capacity, CandidateSet, SegmentGrid, ENERGY_JITTER_RATIO,
};
pub use error::{Result, SolarError};
pub use fallback::{synthesize_profile, FALLBACK_MAX_PANELS, FALLBACK_SEGMENT_COUNT};
pub use models::{
    BillReference, Bounds, BuildingProfile, Coordinate, ImageryQuality, PanelCandidate,
    PanelDimensions, PanelOrientation, ProfileSource, QualityClass, RoofSegment, SegmentLayout,
};
pub use projection::{project, MarketAssumptions, Projection};
pub use segment::{classify, mean_sunshine_hours};
pub use selection::{select, PanelRanking, Selection};
pub use session::{default_panel_count, PlanSnapshot, ProfileUpdate, RoofSession};
pub use spatial::{area_m2, bounds_of, grid_spacing, haversine_distance};
