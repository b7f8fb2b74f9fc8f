//! Roof segment model: construction, quality classification and base yield.

use crate::error::{Result, SolarError};
use crate::models::{Bounds, PanelDimensions, QualityClass, RoofSegment};
use crate::spatial::area_m2;

/// Mean sunshine hours at or above which a segment is rated excellent.
pub const EXCELLENT_MIN_HOURS: f64 = 1200.0;
/// Mean sunshine hours at or above which a segment is rated good.
pub const GOOD_MIN_HOURS: f64 = 1000.0;
/// Mean sunshine hours at or above which a segment is rated moderate.
pub const MODERATE_MIN_HOURS: f64 = 800.0;

/// Fraction of nameplate output a rooftop array actually delivers after
/// inverter, wiring, soiling and temperature losses.
pub const PERFORMANCE_RATIO: f64 = 0.85;

/// At most this many sunshine samples are kept per segment.
pub const MAX_SUNSHINE_SAMPLES: usize = 12;

/// Map a mean sunshine figure to a quality class.
///
/// Total over `f64`: NaN, zero and negative inputs all land in `Low`.
pub fn classify(mean_sunshine_hours: f64) -> QualityClass {
    if mean_sunshine_hours >= EXCELLENT_MIN_HOURS {
        QualityClass::Excellent
    } else if mean_sunshine_hours >= GOOD_MIN_HOURS {
        QualityClass::Good
    } else if mean_sunshine_hours >= MODERATE_MIN_HOURS {
        QualityClass::Moderate
    } else {
        QualityClass::Low
    }
}

/// Mean of the finite samples; zero when there are none.
pub fn mean_sunshine_hours(samples: &[f64]) -> f64 {
    let (sum, count) = samples
        .iter()
        .filter(|value| value.is_finite())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl QualityClass {
    /// Yield multiplier applied on top of the raw sunshine figure.
    pub fn yield_factor(self) -> f64 {
        match self {
            QualityClass::Excellent => 1.0,
            QualityClass::Good => 0.95,
            QualityClass::Moderate => 0.9,
            QualityClass::Low => 0.85,
        }
    }

    /// Fill color the map surface uses for segments of this class.
    pub fn color_hex(self) -> &'static str {
        match self {
            QualityClass::Excellent => "#FFD700",
            QualityClass::Good => "#FFA500",
            QualityClass::Moderate => "#FF8C00",
            QualityClass::Low => "#A0A0A0",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityClass::Excellent => "excellent",
            QualityClass::Good => "good",
            QualityClass::Moderate => "moderate",
            QualityClass::Low => "low",
        }
    }
}

impl RoofSegment {
    /// Build a segment from its bounds, orientation and sunshine samples.
    ///
    /// Center, area and quality class are derived. Samples beyond
    /// [`MAX_SUNSHINE_SAMPLES`] are dropped. Fails on malformed bounds.
    pub fn new(
        index: usize,
        bounds: Bounds,
        pitch_degrees: f64,
        azimuth_degrees: f64,
        mut sunshine_samples: Vec<f64>,
    ) -> Result<Self> {
        if !bounds.is_well_formed() {
            return Err(SolarError::invalid_geometry(format!(
                "segment {index} has degenerate bounds {bounds:?}"
            )));
        }
        sunshine_samples.truncate(MAX_SUNSHINE_SAMPLES);
        let quality_class = classify(mean_sunshine_hours(&sunshine_samples));
        Ok(Self {
            index,
            bounds,
            center: bounds.center(),
            area_m2: area_m2(&bounds),
            pitch_degrees,
            azimuth_degrees: azimuth_degrees.rem_euclid(360.0),
            quality_class,
            monthly_sunshine_hours: sunshine_samples,
        })
    }

    pub fn mean_sunshine_hours(&self) -> f64 {
        mean_sunshine_hours(&self.monthly_sunshine_hours)
    }

    /// Expected yearly energy of one panel on this segment, before jitter.
    pub fn base_yield_kwh(&self, panel: &PanelDimensions) -> f64 {
        let hours = self.mean_sunshine_hours().max(0.0);
        hours * panel.capacity_kw() * PERFORMANCE_RATIO * self.quality_class.yield_factor()
    }
}
