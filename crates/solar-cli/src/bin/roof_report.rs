//! CLI tool to build a roof profile for a coordinate and print a panel plan.
//!
//! Uses the building insights API when `SOLAR_API_KEY` is set and `--offline`
//! is not given; otherwise synthesizes a roof.

use clap::Parser;
use solar_cli::{Report, ReportDocument};
use solar_core::{Coordinate, RoofSession};
use solar_insights::{
    default_panel_count, fetch_and_process, Config, InsightsError, OfflineProvider,
    SolarApiClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Report solar potential and a panel plan for a roof
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Latitude of the building (default: Dublin city centre)
    #[arg(long, default_value_t = 53.3498, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the building
    #[arg(long, default_value_t = -6.2603, allow_negative_numbers = true)]
    lng: f64,

    /// Panels to plan for (default: 25% of the roof's maximum)
    #[arg(long)]
    panels: Option<usize>,

    /// Skip the provider and synthesize a roof
    #[arg(long)]
    offline: bool,

    /// Print the profile and plan as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("solar_insights=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let coordinate = Coordinate::new(args.lat, args.lng);

    let lookup = if args.offline || !config.has_credentials() {
        if !args.offline {
            tracing::info!("SOLAR_API_KEY not set, using synthesized roof");
        }
        fetch_and_process(&OfflineProvider, coordinate).await
    } else {
        let client = SolarApiClient::new(&config)?;
        fetch_and_process(&client, coordinate).await
    };

    let profile = match lookup {
        Ok(profile) => profile,
        Err(err @ InsightsError::Transport(_)) => {
            eprintln!("Provider unavailable, try again later: {}", err);
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    let default_count = default_panel_count(&profile);
    let mut session = RoofSession::new(config.market.clone());
    session.begin_lookup(coordinate);
    session.accept(profile);
    let plan = session
        .set_panel_count(args.panels.unwrap_or(default_count))
        .ok_or_else(|| anyhow::anyhow!("no profile accepted for ({}, {})", args.lat, args.lng))?;
    let profile = session
        .profile()
        .ok_or_else(|| anyhow::anyhow!("profile missing after accept"))?;

    if args.json {
        let doc = ReportDocument {
            profile,
            default_panel_count: default_count,
            plan: &plan,
            payback_years: plan.projection.payback_years(),
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        let report = Report {
            profile,
            default_panel_count: default_count,
            plan: &plan,
        };
        print!("{}", report);
    }

    Ok(())
}
