//! Mock frontend, resource reader, and render backend.
//!
//! Each collaborator owns its state and runs on its destination thread; they
//! talk to each other only through the commutator.

use std::sync::Arc;

use commutator::Commutator;
use crossbeam_channel::Sender;
use drape_message::{
    GeoPoint, GeometryBuffer, MapStyle, Message, MessageKind, MessagePriority, TileKey,
};
use runloop::MessageHandler;
use message_queue::PushOutcome;
use tracing::{debug, trace};

/// Synthetic vertex bytes produced per tile.
const TILE_GEOMETRY_BYTES: usize = 256;

/// Posts from a handler. A closed queue means shutdown is under way and the
/// message is dropped; any routing error is a wiring bug and panics, which
/// halts the bus and surfaces as a runtime error.
fn post(bus: &Commutator, message: Message, priority: MessagePriority) {
    let kind = message.kind();
    match bus.post(message, priority) {
        Ok(PushOutcome::Closed) => trace!(%kind, "dropped during shutdown"),
        Ok(_) => {}
        Err(err) => panic!("collaborator could not post {kind}: {err}"),
    }
}

/// Receives country status from the reader; otherwise idle.
#[derive(Debug, Default)]
pub struct Frontend {
    current_country: Option<String>,
}

impl Frontend {
    pub const KINDS: [MessageKind; 3] = [
        MessageKind::CountryInfoUpdate,
        MessageKind::Invalidate,
        MessageKind::StopRendering,
    ];
}

impl MessageHandler for Frontend {
    fn handle(&mut self, message: Message) {
        match message {
            Message::CountryInfoUpdate {
                country_id,
                is_current,
            } => {
                if is_current && self.current_country.as_deref() != Some(country_id.as_str()) {
                    debug!(previous = ?self.current_country, %country_id, "current country changed");
                    self.current_country = Some(country_id);
                }
            }
            other => trace!(kind = %other.kind(), "frontend idle message"),
        }
    }
}

/// Turns viewport updates into per-tile read notifications and geometry.
pub struct ResourceReader {
    bus: Arc<Commutator>,
    style: MapStyle,
    passes: u32,
}

impl ResourceReader {
    pub const KINDS: [MessageKind; 6] = [
        MessageKind::UpdateReadManager,
        MessageKind::InvalidateReadManagerRect,
        MessageKind::UpdateMapStyle,
        MessageKind::InvalidateTextures,
        MessageKind::Invalidate,
        MessageKind::StopRendering,
    ];

    pub fn new(bus: Arc<Commutator>) -> Self {
        Self {
            bus,
            style: MapStyle::default(),
            passes: 0,
        }
    }

    fn read(&mut self, tiles: Vec<TileKey>) {
        self.passes += 1;
        debug!(pass = self.passes, tiles = tiles.len(), style = ?self.style, "read pass");
        for tile in tiles {
            post(&self.bus, Message::TileReadStarted(tile), MessagePriority::Normal);
            let geometry = GeometryBuffer::new(vec![tile.zoom; TILE_GEOMETRY_BYTES]);
            post(
                &self.bus,
                Message::FlushTile { tile, geometry },
                MessagePriority::Normal,
            );
            post(&self.bus, Message::TileReadEnded(tile), MessagePriority::Normal);
        }
        post(
            &self.bus,
            Message::CountryInfoUpdate {
                country_id: format!("pass-{}", self.passes),
                is_current: true,
            },
            MessagePriority::Normal,
        );
    }
}

impl MessageHandler for ResourceReader {
    fn handle(&mut self, message: Message) {
        match message {
            Message::UpdateReadManager { tiles, .. }
            | Message::InvalidateReadManagerRect { tiles, .. } => self.read(tiles),
            Message::UpdateMapStyle(style) => self.style = style,
            other => trace!(kind = %other.kind(), "reader idle message"),
        }
    }
}

/// Consumes geometry and answers position queries.
pub struct RenderBackend {
    tile_done: Sender<TileKey>,
    in_flight: usize,
    geometry_bytes: usize,
    last_fix: Option<GeoPoint>,
}

impl RenderBackend {
    pub const KINDS: [MessageKind; 9] = [
        MessageKind::TileReadStarted,
        MessageKind::FlushTile,
        MessageKind::TileReadEnded,
        MessageKind::UpdateMapStyle,
        MessageKind::InvalidateTextures,
        MessageKind::Invalidate,
        MessageKind::StopRendering,
        MessageKind::GpsInfo,
        MessageKind::GetMyPosition,
    ];

    /// `tile_done` receives every tile whose read has ended.
    pub fn new(tile_done: Sender<TileKey>) -> Self {
        Self {
            tile_done,
            in_flight: 0,
            geometry_bytes: 0,
            last_fix: None,
        }
    }
}

impl MessageHandler for RenderBackend {
    fn handle(&mut self, message: Message) {
        match message {
            Message::TileReadStarted(_) => self.in_flight += 1,
            Message::FlushTile { tile, geometry } => {
                self.geometry_bytes += geometry.bytes.len();
                trace!(?tile, total = self.geometry_bytes, "geometry flushed");
            }
            Message::TileReadEnded(tile) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if self.tile_done.send(tile).is_err() {
                    debug!(?tile, "tile observer gone");
                }
            }
            Message::GpsInfo(fix) => self.last_fix = Some(fix.position),
            Message::GetMyPosition { reply } => {
                if !reply.send(self.last_fix) {
                    debug!("position query abandoned");
                }
            }
            other => trace!(kind = %other.kind(), in_flight = self.in_flight, "backend message"),
        }
    }
}
