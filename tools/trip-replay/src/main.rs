use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use futures_util::stream;
use tracing_subscriber::EnvFilter;
use trainlcd_core::driver::track;
use trainlcd_core::navigation::bound_station;
use trainlcd_core::{EngineConfig, GeoFix, LocationError, PositionTracker};
use trainlcd_transit::{Direction, Line, LineIdentifier, TopologyFetcher, TopologyProvider};

mod fixes;
mod output;
mod topology;

use fixes::load_fix_log;
use output::event_line;
use topology::FileTopology;

#[derive(Parser, Debug)]
#[command(
    name = "trip-replay",
    author,
    version,
    about = "Replay a recorded GPS log through the train position engine",
    long_about = "Loads line topology from a JSON file, feeds a recorded fix log through \
                  the position engine one fix at a time, and prints the navigation state \
                  (current station, next station, arrived, approaching) after every fix."
)]
struct Args {
    /// Topology JSON file
    #[arg(short, long)]
    topology: PathBuf,

    /// Recorded fix log (JSON array)
    #[arg(short, long)]
    fixes: PathBuf,

    /// Line to track. Picked from the first fix's nearest station when omitted
    #[arg(short, long)]
    line: Option<String>,

    /// Direction of travel: inbound or outbound
    #[arg(short, long, default_value = "inbound")]
    direction: Direction,

    /// Engine configuration JSON file (thresholds, pass-through policy)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output (show per-fix classification)
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    config.validate().context("Invalid engine configuration")?;
    Ok(config)
}

/// The first line serving the station nearest to the first usable fix
async fn pick_line(
    topology: &FileTopology,
    fixes: &[Result<GeoFix, LocationError>],
) -> Result<Line> {
    let Some(first) = fixes.iter().find_map(|f| f.as_ref().ok()) else {
        bail!("Fix log has no usable fix to pick a line from");
    };
    let Some(station) = topology.provider().nearest_stations(first.location, 1).pop() else {
        bail!("Topology has no stations");
    };
    tracing::info!("Nearest station to first fix: {} ({})", station.name, station.id);

    let mut lines = topology.fetch_lines_at(&station.id).await?;
    Ok(lines.remove(0))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .init();

    let config = load_config(args.config.as_ref())?;
    let topology = FileTopology::load(&args.topology)?;
    let fixes = load_fix_log(&args.fixes)?;

    let line = match &args.line {
        Some(id) => topology
            .fetch_line(&LineIdentifier::new(id))
            .await
            .context("Failed to load the requested line")?,
        None => pick_line(&topology, &fixes).await?,
    };
    tracing::info!(
        "Tracking {} ({} stations, {:?}{})",
        line.name,
        line.len(),
        line.line_type,
        if line.is_loop { ", loop" } else { "" }
    );
    let origin = if args.direction.is_ascending(line.is_loop) {
        line.stations().first()
    } else {
        line.stations().last()
    };
    if let Some(bound) = bound_station(&line, origin.map(|s| &s.id), args.direction) {
        tracing::info!("Bound for {}", bound.name);
    }

    let mut tracker = PositionTracker::new(Arc::new(line), args.direction, config)?;
    let mut seq = 0;
    let processed = track(stream::iter(fixes), &mut tracker, |event| {
        seq += 1;
        println!("{}", event_line(seq, &event));
    })
    .await;

    tracing::info!("Replayed {} fixes ({} log entries)", processed, seq);
    Ok(())
}
