//! Provider and market configuration from environment.

use solar_core::MarketAssumptions;
use std::env;

pub const DEFAULT_API_URL: &str = "https://solar.googleapis.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    /// Lowest imagery quality the provider may return (`LOW`, `MEDIUM`, `HIGH`).
    pub required_quality: String,
    pub request_timeout_s: u64,
    pub market: MarketAssumptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            required_quality: "LOW".to_string(),
            request_timeout_s: 10,
            market: MarketAssumptions::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset or unparsable
    /// values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let parse_f64 = |key: &str, fallback: f64| {
            lookup(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite() && *value >= 0.0)
                .unwrap_or(fallback)
        };

        let market = MarketAssumptions {
            tariff_per_kwh: parse_f64("SOLAR_TARIFF_PER_KWH", defaults.market.tariff_per_kwh),
            unit_cost: parse_f64("SOLAR_UNIT_COST", defaults.market.unit_cost),
            grant_cap: parse_f64("SOLAR_GRANT_CAP", defaults.market.grant_cap),
            ..defaults.market.clone()
        };

        Self {
            api_url: lookup("SOLAR_API_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.api_url),
            api_key: lookup("SOLAR_API_KEY")
                .map(|s| s.trim().to_string())
                .unwrap_or(defaults.api_key),
            required_quality: lookup("SOLAR_REQUIRED_QUALITY")
                .map(|s| s.trim().to_ascii_uppercase())
                .filter(|s| matches!(s.as_str(), "LOW" | "MEDIUM" | "HIGH"))
                .unwrap_or(defaults.required_quality),
            request_timeout_s: lookup("SOLAR_TIMEOUT_S")
                .and_then(|s| s.trim().parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.request_timeout_s),
            market,
        }
    }

    /// True when there is an API key to call the real provider with.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty()
    }
}
