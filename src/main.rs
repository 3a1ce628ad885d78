//! CLI entry point for the prioritization census tool.
//!
//! Provides subcommands for censusing a single metric over a dataset run,
//! producing an all-metric summary report, and listing the region catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use prio_census::{
    census::{Metric, data_census, dedup_by_way_id},
    fetch::{BasicClient, fetch_bytes},
    output::{CensusRecord, SummaryReport, append_record, print_json},
    parser::parse_dataset,
    regions::load_regions,
    rt::{advertised_rt_url, apply_speeds, parse_speeds},
    schema::PrioritizationDataset,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "prio_census")]
#[command(about = "A tool to inspect transit prioritization datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Census one metric over a prioritization GeoJSON run
    Census {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Segment metric to census
        #[arg(short, long, value_enum, default_value = "frequency")]
        metric: Metric,

        /// Real-time speeds URL (defaults to the endpoint the dataset advertises)
        #[arg(long)]
        rt_url: Option<String>,

        /// CSV file to append results to
        #[arg(short, long, default_value = "census.csv")]
        output: String,
    },
    /// Report every metric's census plus dataset provenance as JSON
    Summary {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Real-time speeds URL (defaults to the endpoint the dataset advertises)
        #[arg(long)]
        rt_url: Option<String>,
    },
    /// List the configured region catalog
    Regions {
        /// Path to the region catalog JSON file
        #[arg(short, long, default_value = "regions.json")]
        catalog: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/prio_census.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("prio_census.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Census {
            source,
            metric,
            rt_url,
            output,
        } => {
            let dataset = load_dataset(&source, rt_url.as_deref()).await?;

            let unique = dedup_by_way_id(&dataset.features);
            let census = data_census(unique.iter().copied(), metric);

            if census.is_none() {
                warn!(
                    metric = metric.property_name(),
                    "No valid values for metric, recording empty census"
                );
            }

            let record = CensusRecord::new(&dataset, metric, unique.len(), census);
            append_record(&output, &record)?;

            info!(
                region = %dataset.metadata.region,
                metric = metric.property_name(),
                segments = unique.len(),
                output,
                "Census recorded"
            );
        }
        Commands::Summary { source, rt_url } => {
            let dataset = load_dataset(&source, rt_url.as_deref()).await?;
            let report = SummaryReport::from_dataset(&dataset);
            print_json(&report)?;
        }
        Commands::Regions { catalog } => {
            let regions = load_regions(&catalog)?;

            info!(total = regions.len(), "Region catalog loaded");

            for region in &regions {
                let remote = region.geojson.starts_with("http");

                info!(
                    region_id = %region.id,
                    region_name = %region.name,
                    gtfs_date = %region.date,
                    remote,
                    "Region"
                );
            }

            let remote_count = regions
                .iter()
                .filter(|r| r.geojson.starts_with("http"))
                .count();

            info!(
                total = regions.len(),
                remote = remote_count,
                local = regions.len() - remote_count,
                "Region catalog summary"
            );
        }
    }

    Ok(())
}

/// Loads a dataset from a local file path or over HTTP, then merges
/// real-time speeds: from `rt_url` when given, otherwise from the endpoint
/// the dataset metadata advertises. An explicit URL that fails is an error;
/// an unreachable advertised endpoint only logs a warning.
#[tracing::instrument(skip(rt_url))]
async fn load_dataset(source: &str, rt_url: Option<&str>) -> Result<PrioritizationDataset> {
    let bytes = fetcher(source).await?;
    let mut dataset = parse_dataset(&bytes)?;

    info!(
        region = %dataset.metadata.region,
        features = dataset.features.len(),
        "Dataset loaded"
    );

    if let Some(url) = rt_url {
        merge_speeds(&mut dataset, url).await?;
    } else if let Some(url) = advertised_rt_url(&dataset.metadata).map(str::to_string) {
        info!(rt_url = %url, "Using the dataset's advertised real-time endpoint");
        if let Err(e) = merge_speeds(&mut dataset, &url).await {
            warn!(error = %e, "Advertised real-time endpoint unavailable, continuing without speeds");
        }
    }

    Ok(dataset)
}

/// Fetches speed samples from `url` and merges them into the dataset.
async fn merge_speeds(dataset: &mut PrioritizationDataset, url: &str) -> Result<()> {
    let rt_bytes = fetcher(url).await?;
    let samples = parse_speeds(&rt_bytes)?;
    let updated = apply_speeds(dataset, &samples);
    info!(samples = samples.len(), updated, "Real-time speeds merged");

    if !dataset.metadata.rt_data_included && updated == 0 {
        warn!("Dataset was built without real-time data and no sample matched");
    }

    Ok(())
}

/// Loads raw bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new()?;
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url)?
    };
    Ok(bytes)
}
