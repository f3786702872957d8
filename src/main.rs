use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use itinerary_planner::interests::InterestCatalog;
use itinerary_planner::overpass::{OverpassClient, OverpassConfig};
use itinerary_planner::planner::{PlanOptions, check_sufficient, place_limit, plan};
use itinerary_planner::route::{DayRoute, routes};
use itinerary_planner::traits::{PlaceQuery, PointSource, StaticSource};
use itinerary_planner::{Itinerary, PointSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Geojson,
}

/// Plan a multi-day sightseeing itinerary from points of interest.
#[derive(Debug, Parser)]
#[command(name = "itinerary-planner", version)]
struct Cli {
    /// Area to search, e.g. "Shibuya".
    #[arg(long, required_unless_present_any = ["points", "list_interests"])]
    area: Option<String>,

    /// Enclosing region, e.g. "Tokyo".
    #[arg(long)]
    region: Option<String>,

    /// Trip length in days.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..), required_unless_present = "list_interests")]
    days: Option<u64>,

    /// Interest catalog key (see --list-interests).
    #[arg(long, default_value = "1")]
    interest: String,

    /// Maximum visits per day.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u64).range(1..))]
    max_per_day: u64,

    /// Read points from a JSON file of {name, lat, lon} records instead of Overpass.
    #[arg(long)]
    points: Option<PathBuf>,

    /// JSON interest catalog replacing the built-in one.
    #[arg(long)]
    interests: Option<PathBuf>,

    #[arg(long, env = "OVERPASS_URL")]
    overpass_url: Option<String>,

    /// Seed for clustering and the daily cap sample.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the interest catalog and exit.
    #[arg(long)]
    list_interests: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let catalog = match &cli.interests {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read interest catalog {}", path.display()))?;
            InterestCatalog::from_json(&json).context("invalid interest catalog")?
        }
        None => InterestCatalog::default(),
    };

    if cli.list_interests {
        for (key, interest) in catalog.iter() {
            println!("{}. {}", key, interest.label);
        }
        return Ok(());
    }

    let days = cli.days.context("--days is required")? as usize;
    let mut options = PlanOptions {
        max_per_day: cli.max_per_day as usize,
        sample_seed: cli.seed,
        ..PlanOptions::default()
    };
    options.kmeans.seed = cli.seed;

    let mut query = PlaceQuery::new(
        cli.area.clone().unwrap_or_default(),
        cli.interest.clone(),
        place_limit(days, options.max_per_day),
    );
    if let Some(region) = &cli.region {
        query = query.with_region(region.clone());
    }

    let points = load_points(&cli, &query, catalog)?;
    check_sufficient(points.len(), days, options.min_per_day)?;

    let itinerary = plan(&points, days, &options)?;
    print_itinerary(&itinerary, cli.format)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_points(cli: &Cli, query: &PlaceQuery, catalog: InterestCatalog) -> Result<PointSet> {
    if let Some(path) = &cli.points {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read points file {}", path.display()))?;
        let source = StaticSource::from_json(&json).context("invalid points file")?;
        return Ok(source.fetch(query)?);
    }

    let mut config = OverpassConfig::default();
    if let Some(url) = &cli.overpass_url {
        config.base_url = url.clone();
    }
    let client = OverpassClient::new(config, catalog).context("failed to build HTTP client")?;
    client
        .fetch(query)
        .with_context(|| format!("failed to fetch places for {}", query.label()))
}

fn print_itinerary(itinerary: &Itinerary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Itinerary Recommendation:\n");
            print!("{}", itinerary);
            for (day, stops) in itinerary.iter_days() {
                match DayRoute::for_day(itinerary, day) {
                    Some(route) => println!(
                        "Day {} route: {} stops, {:.2} km",
                        day,
                        stops.len(),
                        route.distance_km
                    ),
                    None => println!("No places found for Day {}.", day),
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(itinerary)?);
        }
        OutputFormat::Geojson => {
            let collections: Vec<Value> = routes(itinerary).iter().map(DayRoute::to_geojson).collect();
            println!("{}", serde_json::to_string_pretty(&collections)?);
        }
    }
    Ok(())
}
