//! Financial and environmental projections for a panel selection.
//!
//! Every metric is a pure function of the panel count, the selection's
//! yearly energy and the fixed [`MarketAssumptions`]. Each one is
//! non-decreasing in panel count as long as the energy figure is, which the
//! selection engine guarantees.

use serde::{Deserialize, Serialize};

/// Static market constants the projections are computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAssumptions {
    /// Nameplate capacity of one panel in kW
    pub panel_unit_kw: f64,
    /// Installed cost per panel
    pub unit_cost: f64,
    /// Grant paid per kW of installed capacity
    pub grant_rate_per_kw: f64,
    /// Upper bound on the grant regardless of system size
    pub grant_cap: f64,
    /// Electricity price per kWh
    pub tariff_per_kwh: f64,
    /// Grid emissions avoided per kWh generated
    pub co2_kg_per_kwh: f64,
    /// CO2 absorbed by one mature tree per year
    pub tree_kg_co2_per_year: f64,
    /// CO2 emitted by one average car per year
    pub car_tonnes_co2_per_year: f64,
    /// Home value uplift as a fraction of the installed cost
    pub home_value_ratio: f64,
    /// Lifetime over which savings are accumulated
    pub lifetime_years: u32,
    /// Yearly output loss from panel ageing
    pub annual_degradation: f64,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            panel_unit_kw: 0.4,
            unit_cost: 800.0,
            grant_rate_per_kw: 900.0,
            grant_cap: 1800.0,
            tariff_per_kwh: 0.35,
            co2_kg_per_kwh: 0.2263,
            tree_kg_co2_per_year: 21.77,
            car_tonnes_co2_per_year: 4.6,
            home_value_ratio: 0.5,
            lifetime_years: 25,
            annual_degradation: 0.005,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

impl MarketAssumptions {
    pub fn system_size_kw(&self, panel_count: usize) -> f64 {
        panel_count as f64 * non_negative(self.panel_unit_kw)
    }

    pub fn estimated_cost(&self, panel_count: usize) -> f64 {
        panel_count as f64 * non_negative(self.unit_cost)
    }

    /// Grant for the system, never above `grant_cap`.
    pub fn grant(&self, panel_count: usize) -> f64 {
        let uncapped = self.system_size_kw(panel_count) * non_negative(self.grant_rate_per_kw);
        uncapped.min(non_negative(self.grant_cap))
    }

    /// Cost after grant, clamped at zero.
    pub fn net_cost(&self, panel_count: usize) -> f64 {
        (self.estimated_cost(panel_count) - self.grant(panel_count)).max(0.0)
    }

    pub fn annual_savings(&self, total_yearly_energy_kwh: f64) -> f64 {
        non_negative(total_yearly_energy_kwh) * non_negative(self.tariff_per_kwh)
    }

    pub fn monthly_savings(&self, total_yearly_energy_kwh: f64) -> f64 {
        self.annual_savings(total_yearly_energy_kwh) / 12.0
    }

    /// Savings summed over the system lifetime with yearly degradation applied.
    pub fn lifetime_savings(&self, total_yearly_energy_kwh: f64) -> f64 {
        let retention = 1.0 - non_negative(self.annual_degradation).min(1.0);
        let degraded_years: f64 = (0..self.lifetime_years)
            .map(|year| retention.powi(year as i32))
            .sum();
        self.annual_savings(total_yearly_energy_kwh) * degraded_years
    }

    pub fn co2_tonnes_per_year(&self, total_yearly_energy_kwh: f64) -> f64 {
        non_negative(total_yearly_energy_kwh) * non_negative(self.co2_kg_per_kwh) / 1000.0
    }

    pub fn trees_equivalent(&self, total_yearly_energy_kwh: f64) -> f64 {
        if self.tree_kg_co2_per_year <= 0.0 {
            return 0.0;
        }
        self.co2_tonnes_per_year(total_yearly_energy_kwh) * 1000.0 / self.tree_kg_co2_per_year
    }

    pub fn cars_off_road(&self, total_yearly_energy_kwh: f64) -> f64 {
        if self.car_tonnes_co2_per_year <= 0.0 {
            return 0.0;
        }
        self.co2_tonnes_per_year(total_yearly_energy_kwh) / self.car_tonnes_co2_per_year
    }

    pub fn home_value_increase(&self, panel_count: usize) -> f64 {
        self.estimated_cost(panel_count) * non_negative(self.home_value_ratio)
    }
}

/// Full projection set handed to the quote and report screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub panel_count: usize,
    pub yearly_energy_kwh: f64,
    pub system_size_kw: f64,
    pub estimated_cost: f64,
    pub grant: f64,
    pub net_cost: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub lifetime_savings: f64,
    pub co2_tonnes_per_year: f64,
    pub trees_equivalent: f64,
    pub cars_off_road: f64,
    pub home_value_increase: f64,
}

impl Projection {
    /// Years until savings repay the net cost; `None` when nothing is saved.
    pub fn payback_years(&self) -> Option<f64> {
        if self.annual_savings > 0.0 {
            Some(self.net_cost / self.annual_savings)
        } else {
            None
        }
    }

    /// Every metric that must not shrink as panels are added.
    pub fn metrics(&self) -> [(&'static str, f64); 12] {
        [
            ("yearly_energy_kwh", self.yearly_energy_kwh),
            ("system_size_kw", self.system_size_kw),
            ("estimated_cost", self.estimated_cost),
            ("grant", self.grant),
            ("net_cost", self.net_cost),
            ("monthly_savings", self.monthly_savings),
            ("annual_savings", self.annual_savings),
            ("lifetime_savings", self.lifetime_savings),
            ("co2_tonnes_per_year", self.co2_tonnes_per_year),
            ("trees_equivalent", self.trees_equivalent),
            ("cars_off_road", self.cars_off_road),
            ("home_value_increase", self.home_value_increase),
        ]
    }
}

pub fn project(
    panel_count: usize,
    total_yearly_energy_kwh: f64,
    assumptions: &MarketAssumptions,
) -> Projection {
    Projection {
        panel_count,
        yearly_energy_kwh: non_negative(total_yearly_energy_kwh),
        system_size_kw: assumptions.system_size_kw(panel_count),
        estimated_cost: assumptions.estimated_cost(panel_count),
        grant: assumptions.grant(panel_count),
        net_cost: assumptions.net_cost(panel_count),
        monthly_savings: assumptions.monthly_savings(total_yearly_energy_kwh),
        annual_savings: assumptions.annual_savings(total_yearly_energy_kwh),
        lifetime_savings: assumptions.lifetime_savings(total_yearly_energy_kwh),
        co2_tonnes_per_year: assumptions.co2_tonnes_per_year(total_yearly_energy_kwh),
        trees_equivalent: assumptions.trees_equivalent(total_yearly_energy_kwh),
        cars_off_road: assumptions.cars_off_road(total_yearly_energy_kwh),
        home_value_increase: assumptions.home_value_increase(panel_count),
    }
}
