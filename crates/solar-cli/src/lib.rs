//! Solar CLI - command line tools for the roof layout engine.
//!
//! This crate provides the `roof_report` binary and the report rendering it
//! uses, kept in the library so it can be tested without a terminal.

use serde::Serialize;
use solar_core::{BuildingProfile, PlanSnapshot, ProfileSource, SegmentLayout};
use std::fmt;

/// JSON document printed by `roof_report --json`.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub profile: &'a BuildingProfile,
    pub default_panel_count: usize,
    pub plan: &'a PlanSnapshot,
    pub payback_years: Option<f64>,
}

fn layout_line(layout: &SegmentLayout) -> String {
    let mut line = format!(
        "{}/{} panels, {}x{} {:?}",
        layout.placed, layout.requested, layout.rows, layout.panels_per_row, layout.orientation
    );
    if layout.capped() {
        line.push_str(" (capped)");
    }
    line
}

/// Human readable summary of a profile and one panel plan.
pub struct Report<'a> {
    pub profile: &'a BuildingProfile,
    pub default_panel_count: usize,
    pub plan: &'a PlanSnapshot,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile;
        let source = match profile.source {
            ProfileSource::Provider => "provider imagery",
            ProfileSource::Synthesized => "synthesized roof (no coverage)",
        };

        writeln!(f, "Building {}", profile.building_id)?;
        writeln!(
            f,
            "  Query: ({:.6}, {:.6})  Source: {}",
            profile.query.latitude, profile.query.longitude, source
        )?;
        writeln!(
            f,
            "  Imagery: {:?}  Roof area: {:.1} m2  Max panels: {}  Default: {}",
            profile.imagery_quality,
            profile.total_roof_area_m2,
            profile.max_panels,
            self.default_panel_count
        )?;

        writeln!(f, "\nSegments:")?;
        for segment in &profile.segments {
            let layout = profile
                .layouts
                .iter()
                .find(|layout| layout.segment_index == segment.index)
                .map(layout_line)
                .unwrap_or_else(|| "no layout".to_string());
            writeln!(
                f,
                "  #{} {:>9} {} az {:>5.1} pitch {:>4.1} area {:>6.1} m2  sun {:>6.0} h  {}",
                segment.index,
                segment.quality_class.label(),
                segment.quality_class.color_hex(),
                segment.azimuth_degrees,
                segment.pitch_degrees,
                segment.area_m2,
                segment.mean_sunshine_hours(),
                layout
            )?;
        }

        let selection = &self.plan.selection;
        let projection = &self.plan.projection;
        let currency = &profile.monthly_bill_reference.currency;
        writeln!(
            f,
            "\nPlan: {} panels requested, {} placed, {:.0} kWh/year",
            selection.requested_count,
            selection.panel_count(),
            selection.total_yearly_energy_kwh
        )?;
        writeln!(
            f,
            "  System {:.1} kW  Cost {:.0} {}  Grant {:.0}  Net {:.0}",
            projection.system_size_kw,
            projection.estimated_cost,
            currency,
            projection.grant,
            projection.net_cost
        )?;
        writeln!(
            f,
            "  Savings {:.0}/month  {:.0}/year  {:.0} over lifetime",
            projection.monthly_savings, projection.annual_savings, projection.lifetime_savings
        )?;
        match projection.payback_years() {
            Some(years) => writeln!(f, "  Payback {:.1} years", years)?,
            None => writeln!(f, "  Payback n/a")?,
        }
        writeln!(
            f,
            "  CO2 {:.2} t/year  Trees {:.0}  Cars {:.2}  Home value +{:.0}",
            projection.co2_tonnes_per_year,
            projection.trees_equivalent,
            projection.cars_off_road,
            projection.home_value_increase
        )
    }
}
