//! Solar Insights - building insights lookup and profile orchestration
//!
//! Talks to the imagery provider, normalizes its payload into a
//! `BuildingProfile`, and falls back to a synthesized roof when the
//! provider has no coverage.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod payload;
pub mod provider;

pub use client::SolarApiClient;
pub use config::Config;
pub use error::InsightsError;
pub use normalize::normalize_payload;
pub use orchestrator::{default_panel_count, fetch_and_process};
pub use payload::BuildingInsightsPayload;
pub use provider::{InsightsProvider, OfflineProvider, ProviderResponse};
