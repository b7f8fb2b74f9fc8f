//! Panel selection: pick the best `N` candidates by yearly energy.

use crate::models::PanelCandidate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The candidates "installed" for one requested panel count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub requested_count: usize,
    pub chosen_candidates: Vec<PanelCandidate>,
    pub total_yearly_energy_kwh: f64,
}

impl Selection {
    pub fn panel_count(&self) -> usize {
        self.chosen_candidates.len()
    }
}

/// Candidate order for selection: energy descending, then segment index
/// ascending, then generation order.
fn rank_order(candidates: &[PanelCandidate], a: usize, b: usize) -> Ordering {
    let (ca, cb) = (&candidates[a], &candidates[b]);
    cb.yearly_energy_kwh
        .total_cmp(&ca.yearly_energy_kwh)
        .then_with(|| ca.segment_index.cmp(&cb.segment_index))
        .then_with(|| a.cmp(&b))
}

/// Clamp a requested count to what the profile allows and actually has.
pub fn clamp_count(requested: usize, available: usize, max_panels: usize) -> usize {
    requested.min(max_panels).min(available)
}

/// Ranked candidate order, computed once per profile.
///
/// Selecting from a ranking is a prefix copy, cheap enough to run on every
/// slider tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelRanking {
    order: Vec<usize>,
}

impl PanelRanking {
    pub fn new(candidates: &[PanelCandidate]) -> Self {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| rank_order(candidates, a, b));
        Self { order }
    }

    /// Select from `candidates`, which must be the slice this ranking was built from.
    pub fn select(
        &self,
        candidates: &[PanelCandidate],
        requested_count: usize,
        max_panels: usize,
    ) -> Selection {
        let count = clamp_count(requested_count, self.order.len(), max_panels);
        let chosen_candidates: Vec<PanelCandidate> = self
            .order
            .iter()
            .take(count)
            .filter_map(|&index| candidates.get(index).copied())
            .collect();
        let total_yearly_energy_kwh = chosen_candidates
            .iter()
            .map(|candidate| candidate.yearly_energy_kwh)
            .sum();
        Selection {
            requested_count,
            chosen_candidates,
            total_yearly_energy_kwh,
        }
    }
}

/// Select the top `requested_count` candidates, clamped to
/// `[0, min(max_panels, candidates.len())]`.
pub fn select(
    candidates: &[PanelCandidate],
    requested_count: usize,
    max_panels: usize,
) -> Selection {
    PanelRanking::new(candidates).select(candidates, requested_count, max_panels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, PanelOrientation};

    fn candidate(segment_index: usize, energy: f64, offset: f64) -> PanelCandidate {
        PanelCandidate {
            center: Coordinate::new(53.0 + offset, -6.0),
            orientation: PanelOrientation::Portrait,
            segment_index,
            yearly_energy_kwh: energy,
        }
    }

    fn twelve() -> Vec<PanelCandidate> {
        (0..12)
            .map(|i| candidate(i / 4, 300.0 + (i * 7 % 11) as f64, i as f64 * 1e-5))
            .collect()
    }

    #[test]
    fn clamps_to_available_candidates() {
        let selection = select(&twelve(), 50, 25);
        assert_eq!(selection.requested_count, 50);
        assert_eq!(selection.chosen_candidates.len(), 12);
    }

    #[test]
    fn clamps_to_max_panels() {
        let selection = select(&twelve(), 10, 4);
        assert_eq!(selection.panel_count(), 4);
    }

    #[test]
    fn zero_request_is_empty() {
        let selection = select(&twelve(), 0, 25);
        assert!(selection.chosen_candidates.is_empty());
        assert_eq!(selection.total_yearly_energy_kwh, 0.0);
    }

    #[test]
    fn picks_highest_energy_first() {
        let selection = select(&twelve(), 3, 25);
        let energies: Vec<f64> = selection
            .chosen_candidates
            .iter()
            .map(|c| c.yearly_energy_kwh)
            .collect();
        assert_eq!(energies, vec![310.0, 309.0, 308.0]);
    }

    #[test]
    fn ties_break_by_segment_then_generation_order() {
        let candidates = vec![
            candidate(2, 400.0, 0.0),
            candidate(1, 400.0, 1e-5),
            candidate(1, 400.0, 2e-5),
            candidate(0, 350.0, 3e-5),
        ];
        let selection = select(&candidates, 3, 10);
        assert_eq!(selection.chosen_candidates[0], candidates[1]);
        assert_eq!(selection.chosen_candidates[1], candidates[2]);
        assert_eq!(selection.chosen_candidates[2], candidates[0]);
    }

    #[test]
    fn selection_grows_monotonically() {
        let candidates = twelve();
        let ranking = PanelRanking::new(&candidates);
        let mut previous = ranking.select(&candidates, 0, 25);
        for n in 1..=12 {
            let current = ranking.select(&candidates, n, 25);
            assert!(previous
                .chosen_candidates
                .iter()
                .all(|c| current.chosen_candidates.contains(c)));
            assert!(current.total_yearly_energy_kwh >= previous.total_yearly_energy_kwh);
            previous = current;
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let candidates = twelve();
        assert_eq!(select(&candidates, 7, 25), select(&candidates, 7, 25));
    }
}
