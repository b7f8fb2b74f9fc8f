//! Single owned state slot tying a profile to the current panel count.

use crate::models::{BuildingProfile, Coordinate};
use crate::projection::{project, MarketAssumptions, Projection};
use crate::selection::{PanelRanking, Selection};
use serde::Serialize;

/// Share of `max_panels` used to seed the panel slider.
pub const DEFAULT_PANEL_SHARE: f64 = 0.25;

/// Initial slider position for a profile: 25% of its panel ceiling, rounded.
pub fn default_panel_count(profile: &BuildingProfile) -> usize {
    (profile.max_panels as f64 * DEFAULT_PANEL_SHARE).round() as usize
}

/// Selection and projection for one panel count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSnapshot {
    pub selection: Selection,
    pub projection: Projection,
}

/// Outcome of offering a freshly computed profile to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileUpdate {
    Accepted,
    /// The profile was computed for a coordinate other than the latest query.
    Stale,
}

/// Owns the current profile, its ranking and the requested panel count.
///
/// Selections and projections are recomputed from this state on demand; the
/// ranking is built once per profile so panel-count changes only copy a
/// prefix.
#[derive(Debug, Clone)]
pub struct RoofSession {
    market: MarketAssumptions,
    latest_query: Option<Coordinate>,
    profile: Option<BuildingProfile>,
    ranking: PanelRanking,
    requested_count: usize,
}

impl RoofSession {
    pub fn new(market: MarketAssumptions) -> Self {
        Self {
            market,
            latest_query: None,
            profile: None,
            ranking: PanelRanking::default(),
            requested_count: 0,
        }
    }

    /// Record the coordinate of the newest lookup. Profiles for any other
    /// coordinate are rejected from now on.
    pub fn begin_lookup(&mut self, query: Coordinate) {
        self.latest_query = Some(query);
    }

    /// Install a profile unless a newer lookup has superseded it.
    ///
    /// Accepting a profile resets the panel count to its default seed.
    pub fn accept(&mut self, profile: BuildingProfile) -> ProfileUpdate {
        if let Some(latest) = self.latest_query {
            if profile.is_stale_for(&latest) {
                return ProfileUpdate::Stale;
            }
        }
        self.requested_count = default_panel_count(&profile);
        self.ranking = PanelRanking::new(&profile.candidates);
        self.latest_query = Some(profile.query);
        self.profile = Some(profile);
        ProfileUpdate::Accepted
    }

    pub fn profile(&self) -> Option<&BuildingProfile> {
        self.profile.as_ref()
    }

    pub fn market(&self) -> &MarketAssumptions {
        &self.market
    }

    pub fn requested_count(&self) -> usize {
        self.requested_count
    }

    /// Move the slider and return the resulting plan.
    pub fn set_panel_count(&mut self, requested_count: usize) -> Option<PlanSnapshot> {
        self.requested_count = requested_count;
        self.snapshot()
    }

    /// Plan for the current panel count, or `None` before any profile is accepted.
    pub fn snapshot(&self) -> Option<PlanSnapshot> {
        let profile = self.profile.as_ref()?;
        let selection =
            self.ranking
                .select(&profile.candidates, self.requested_count, profile.max_panels);
        let projection = project(
            selection.panel_count(),
            selection.total_yearly_energy_kwh,
            &self.market,
        );
        Some(PlanSnapshot {
            selection,
            projection,
        })
    }
}

impl Default for RoofSession {
    fn default() -> Self {
        Self::new(MarketAssumptions::default())
    }
}
