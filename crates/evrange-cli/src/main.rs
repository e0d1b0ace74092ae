use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use evrange_core::{AppConfig, Backend, Coordinate};
use evrange_engine::{RangeEstimator, ReachabilityResult, SearchParams};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "evrange")]
#[command(about = "Estimate and map the area an electric vehicle can reach on one charge")]
struct Cli {
    /// Starting latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Starting longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Battery range in km
    #[arg(long = "range")]
    range_km: f64,

    /// Safety buffer in km subtracted from the battery range
    #[arg(long = "buffer", default_value_t = 10.0)]
    buffer_km: f64,

    /// Number of evenly spaced bearings to search
    #[arg(long, default_value_t = 16)]
    directions: u32,

    /// Use the Google Directions API instead of OpenRouteService
    #[arg(long)]
    use_google: bool,

    /// Where to write the HTML map
    #[arg(long, default_value = "ev_range_map.html")]
    output: PathBuf,

    /// Oracle probes per bearing
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Acceptance band as a fraction of the usable range (0.05 = 5 %)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Give up on unfinished bearings after this many seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Print the full result as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn backend(&self) -> Backend {
        if self.use_google {
            Backend::Google
        } else {
            Backend::OpenRouteService
        }
    }

    /// Configuration-derived search parameters with command-line overrides applied.
    fn search_params(&self, config: &AppConfig) -> SearchParams {
        let base = SearchParams::from_config(config);
        SearchParams {
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
            tolerance_ratio: self.tolerance.unwrap_or(base.tolerance_ratio),
            deadline: self
                .deadline_secs
                .map(Duration::from_secs)
                .or(base.deadline),
            ..base
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = evrange_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");

    let backend = cli.backend();
    let start = Coordinate::new(cli.lat, cli.lon)?;
    let estimator = RangeEstimator::from_config(
        start,
        cli.range_km,
        cli.buffer_km,
        cli.directions,
        backend,
        &config,
    )?
    .with_params(cli.search_params(&config))?;
    tracing::info!(
        %backend,
        directions = cli.directions,
        output = %cli.output.display(),
        "starting range estimate"
    );

    if !cli.json {
        println!("Generating EV range map...");
    }
    let result = estimator.compute().await?;
    estimator.save_map(&result, &cli.output)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
        println!("Map saved to {}", cli.output.display());
    }
    Ok(())
}

fn print_summary(result: &ReachabilityResult) {
    use evrange_core::SearchStatus;

    println!(
        "Range map generated with {} boundary points ({} converged, {} best effort)",
        result.boundary_points.len(),
        result.count_with_status(SearchStatus::Converged),
        result.count_with_status(SearchStatus::ExhaustedIterations),
    );
    if !result.excluded_bearings.is_empty() {
        let bearings: Vec<String> = result
            .excluded_bearings
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Excluded bearings: {}", bearings.join(", "));
    }
    println!(
        "Routing calls: {} ({} served from cache)",
        result.oracle.upstream_calls, result.oracle.cache_hits
    );
}

#[cfg(test)]
mod tests;
