//! Drives one tile/invalidation session through the bus.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use commutator::{Commutator, Destination};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use drape_message::{
    GeoPoint, GpsFix, MapStyle, MercatorRect, Message, MessageKind, MessagePriority, Reply,
    TileKey, Viewport,
};
use message_queue::QueueMetricsSnapshot;
use runloop::{BusConfig, BusRuntime, Dispatcher};
use serde::Serialize;
use tracing::{debug, info};

use crate::collaborators::{Frontend, RenderBackend, ResourceReader};

const SCENARIO_ZOOM: u8 = 12;
const TILES_PER_ROW: u32 = 8;

/// Workload pushed through the bus by [`run`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ScenarioConfig {
    pub tiles: u32,
    pub invalidations: u32,
    pub style_updates: u32,
    #[serde(skip)]
    pub timeout: Duration,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            tiles: 16,
            invalidations: 2,
            style_updates: 3,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Per-destination outcome of a run.
#[derive(Clone, Debug, Serialize)]
pub struct DestinationReport {
    pub destination: Destination,
    pub dispatched: u64,
    pub per_kind: BTreeMap<MessageKind, u64>,
    pub queue: QueueMetricsSnapshot,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub scenario: ScenarioConfig,
    pub tiles_flushed: u32,
    pub position_known: bool,
    pub destinations: Vec<DestinationReport>,
}

fn viewport_tiles(count: u32) -> Vec<TileKey> {
    (0..count)
        .map(|idx| {
            TileKey::new(
                (idx % TILES_PER_ROW) as i32,
                (idx / TILES_PER_ROW) as i32,
                SCENARIO_ZOOM,
            )
        })
        .collect()
}

fn style_for(step: u32) -> MapStyle {
    match step % 3 {
        0 => MapStyle::Dark,
        1 => MapStyle::Vehicle,
        _ => MapStyle::Clear,
    }
}

/// Pushes the workload and waits for the tiles and the position answer.
fn drive(
    bus: &Commutator,
    scenario: &ScenarioConfig,
    tiles_ended: &Receiver<TileKey>,
) -> Result<(u32, Option<GeoPoint>)> {
    let tiles = viewport_tiles(scenario.tiles);
    let side = f64::from(TILES_PER_ROW);
    bus.post(
        Message::UpdateReadManager {
            viewport: Viewport {
                rect: MercatorRect::new(0.0, 0.0, side, side),
                zoom: SCENARIO_ZOOM,
            },
            tiles,
        },
        MessagePriority::Normal,
    )?;
    for step in 0..scenario.style_updates {
        bus.post_with(
            || Message::UpdateMapStyle(style_for(step)),
            MessagePriority::UberHighSingleton,
        )?;
    }
    for _ in 0..scenario.invalidations {
        bus.broadcast(|| Message::Invalidate, MessagePriority::High)?;
    }

    let deadline = Instant::now() + scenario.timeout;
    let mut tiles_flushed = 0;
    while tiles_flushed < scenario.tiles {
        match tiles_ended.recv_deadline(deadline) {
            Ok(tile) => {
                tiles_flushed += 1;
                debug!(?tile, tiles_flushed, "tile ready");
            }
            Err(RecvTimeoutError::Disconnected) => bail!(
                "render backend stopped after {tiles_flushed} of {} tiles",
                scenario.tiles
            ),
            Err(RecvTimeoutError::Timeout) => bail!(
                "timed out after {tiles_flushed} of {} tiles",
                scenario.tiles
            ),
        }
    }

    bus.post(
        Message::GpsInfo(GpsFix {
            position: GeoPoint {
                lat: 55.7558,
                lon: 37.6173,
            },
            accuracy_m: 12.0,
            bearing: None,
            timestamp_ms: 0,
        }),
        MessagePriority::UberHighSingleton,
    )?;
    let (reply, answer) = Reply::channel();
    bus.post(Message::GetMyPosition { reply }, MessagePriority::High)?;
    let position = answer
        .recv_timeout(scenario.timeout)
        .context("render backend did not answer the position query")?;
    Ok((tiles_flushed, position))
}

/// Wires mock collaborators to every destination, runs the workload, and
/// shuts the runtime down.
pub fn run(bus_config: BusConfig, scenario: ScenarioConfig) -> Result<RunReport> {
    let mut builder = BusRuntime::builder(bus_config).context("failed to build bus runtime")?;
    let bus = builder.commutator();
    let (tile_done, tiles_ended) = unbounded();

    builder.install(
        Destination::Frontend,
        Dispatcher::new().on_kinds(&Frontend::KINDS, Frontend::default())?,
    )?;
    builder.install(
        Destination::ResourceReader,
        Dispatcher::new().on_kinds(&ResourceReader::KINDS, ResourceReader::new(bus.clone()))?,
    )?;
    builder.install(
        Destination::RenderBackend,
        Dispatcher::new().on_kinds(&RenderBackend::KINDS, RenderBackend::new(tile_done))?,
    )?;
    let runtime = builder.start().context("failed to start destination threads")?;
    info!(?scenario, "scenario started");

    let driven = drive(&bus, &scenario, &tiles_ended);
    // A collaborator failure halts the bus; its cause outranks the symptom
    // the driver ran into.
    let stats = runtime.shutdown().context("bus runtime shut down with an error")?;
    let (tiles_flushed, position) = driven?;

    let metrics = bus.metrics();
    let destinations = stats
        .into_iter()
        .map(|loop_stats| {
            let queue = metrics
                .iter()
                .find(|(dest, _)| *dest == loop_stats.destination)
                .map(|(_, snapshot)| *snapshot)
                .unwrap_or_default();
            DestinationReport {
                destination: loop_stats.destination,
                dispatched: loop_stats.dispatched,
                per_kind: loop_stats.per_kind,
                queue,
            }
        })
        .collect();

    info!(tiles_flushed, "scenario finished");
    Ok(RunReport {
        scenario,
        tiles_flushed,
        position_known: position.is_some(),
        destinations,
    })
}
