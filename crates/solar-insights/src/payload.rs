//! Wire format of a building insights response.
//!
//! Field names follow the provider's camelCase JSON. Everything except the
//! building center is optional or defaulted because coverage varies a lot
//! between locations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use solar_core::{Coordinate, ImageryQuality};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingInsightsPayload {
    #[serde(default)]
    pub name: Option<String>,
    pub center: LatLng,
    #[serde(default)]
    pub imagery_quality: Option<String>,
    #[serde(default)]
    pub imagery_date: Option<ApiDate>,
    #[serde(default)]
    pub solar_potential: SolarPotential,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Coordinate::new(value.latitude, value.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBox {
    pub sw: LatLng,
    pub ne: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ApiDate {
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarPotential {
    /// Absent or zero when the provider gives no ceiling.
    #[serde(default)]
    pub max_array_panels_count: Option<u32>,
    #[serde(default)]
    pub panel_capacity_watts: Option<f64>,
    #[serde(default)]
    pub panel_height_meters: Option<f64>,
    #[serde(default)]
    pub panel_width_meters: Option<f64>,
    #[serde(default)]
    pub whole_roof_stats: Option<SizeAndSunshineStats>,
    #[serde(default)]
    pub roof_segment_stats: Vec<RoofSegmentStats>,
    #[serde(default)]
    pub financial_analyses: Vec<FinancialAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeAndSunshineStats {
    #[serde(default)]
    pub area_meters2: f64,
    #[serde(default)]
    pub sunshine_quantiles: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoofSegmentStats {
    #[serde(default)]
    pub pitch_degrees: f64,
    #[serde(default)]
    pub azimuth_degrees: f64,
    #[serde(default)]
    pub stats: SizeAndSunshineStats,
    #[serde(default)]
    pub center: Option<LatLng>,
    #[serde(default)]
    pub bounding_box: Option<LatLngBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    #[serde(default)]
    pub monthly_bill: Option<Money>,
}

/// Money amount; `units` arrives as a decimal string in the provider JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    #[serde(default)]
    pub units: Option<MoneyUnits>,
    #[serde(default)]
    pub nanos: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyUnits {
    Number(i64),
    Text(String),
}

impl Money {
    pub fn amount(&self) -> Option<f64> {
        let units = match self.units.as_ref()? {
            MoneyUnits::Number(value) => *value as f64,
            MoneyUnits::Text(text) => text.trim().parse::<i64>().ok()? as f64,
        };
        let nanos = self.nanos.unwrap_or(0) as f64 / 1e9;
        Some(units + nanos)
    }
}

/// Map the provider's imagery quality string; unknown values count as low.
pub fn parse_imagery_quality(raw: Option<&str>) -> ImageryQuality {
    match raw.map(|value| value.trim().to_ascii_uppercase()).as_deref() {
        Some("HIGH") => ImageryQuality::High,
        Some("MEDIUM") => ImageryQuality::Medium,
        _ => ImageryQuality::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_units_accept_string_and_number() {
        let text: Money =
            serde_json::from_str(r#"{"currencyCode":"EUR","units":"150","nanos":500000000}"#)
                .unwrap();
        assert_eq!(text.amount(), Some(150.5));
        let number: Money = serde_json::from_str(r#"{"currencyCode":"USD","units":90}"#).unwrap();
        assert_eq!(number.amount(), Some(90.0));
        let missing: Money = serde_json::from_str(r#"{"currencyCode":"USD"}"#).unwrap();
        assert_eq!(missing.amount(), None);
    }

    #[test]
    fn imagery_quality_defaults_low() {
        assert_eq!(parse_imagery_quality(Some("HIGH")), ImageryQuality::High);
        assert_eq!(parse_imagery_quality(Some("medium")), ImageryQuality::Medium);
        assert_eq!(parse_imagery_quality(Some("BASE")), ImageryQuality::Low);
        assert_eq!(parse_imagery_quality(None), ImageryQuality::Low);
    }

    #[test]
    fn minimal_payload_decodes() {
        let payload: BuildingInsightsPayload =
            serde_json::from_str(r#"{"center":{"latitude":1.0,"longitude":2.0}}"#).unwrap();
        assert_eq!(payload.solar_potential.max_array_panels_count, None);
        assert!(payload.solar_potential.roof_segment_stats.is_empty());
    }

    #[test]
    fn invalid_date_is_dropped() {
        let date = ApiDate {
            year: 2023,
            month: 2,
            day: 30,
        };
        assert_eq!(date.to_naive(), None);
    }
}
