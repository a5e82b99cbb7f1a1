//! Runs a tile/invalidation session across the frontend, resource reader,
//! and render backend threads, then prints what each destination handled.

mod collaborators;
mod render;
mod scenario;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use runloop::BusConfig;
use tracing_subscriber::{fmt, EnvFilter};

use crate::scenario::ScenarioConfig;

/// Exercise the drape message bus with mock collaborators.
#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the drape message bus", long_about = None)]
struct Cli {
    /// Tiles requested by the viewport update.
    #[arg(long, default_value_t = 16)]
    tiles: u32,

    /// Invalidate broadcasts sent while tiles are being read.
    #[arg(long, default_value_t = 2)]
    invalidations: u32,

    /// Back-to-back style switches; pending ones collapse.
    #[arg(long, default_value_t = 3)]
    style_updates: u32,

    /// Prefix for destination thread names.
    #[arg(long, default_value = "drape")]
    thread_prefix: String,

    /// Initial per-tier queue capacity.
    #[arg(long, default_value_t = 64)]
    queue_capacity: usize,

    /// Milliseconds to wait for tiles and query answers.
    #[arg(long, default_value_t = 5_000)]
    timeout_ms: u64,

    /// Print the report as NDJSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn bus_config(&self) -> BusConfig {
        BusConfig {
            thread_name_prefix: self.thread_prefix.clone(),
            queue_capacity: self.queue_capacity,
            ..BusConfig::default()
        }
    }

    fn scenario(&self) -> ScenarioConfig {
        ScenarioConfig {
            tiles: self.tiles,
            invalidations: self.invalidations,
            style_updates: self.style_updates,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let report = scenario::run(cli.bus_config(), cli.scenario())?;
    if cli.json {
        print!(
            "{}",
            render::ndjson(&report).context("failed to encode report")?
        );
    } else {
        print!("{}", render::text(&report));
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Ignore error if already set (e.g., during tests).
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
