//! Reader → render backend tile pipeline over the full runtime.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use commutator::{Commutator, Destination};
use crossbeam_channel::{unbounded, Receiver};
use drape_message::{
    GeometryBuffer, MercatorRect, Message, MessageKind, MessagePriority, TileKey, Viewport,
};
use runloop::{BusConfig, BusRuntime, Dispatcher, MessageHandler};

const RECV_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Started,
    Flushed,
    Ended,
}

struct Reader {
    bus: Arc<Commutator>,
}

impl MessageHandler for Reader {
    fn handle(&mut self, message: Message) {
        let tiles = match message {
            Message::UpdateReadManager { tiles, .. }
            | Message::InvalidateReadManagerRect { tiles, .. } => tiles,
            other => panic!("reader got {:?}", other.kind()),
        };
        for tile in tiles {
            for message in [
                Message::TileReadStarted(tile),
                Message::FlushTile {
                    tile,
                    geometry: GeometryBuffer::new(vec![tile.zoom; 32]),
                },
                Message::TileReadEnded(tile),
            ] {
                self.bus.post(message, MessagePriority::Normal).unwrap();
            }
        }
    }
}

fn start_pipeline() -> (BusRuntime, Receiver<(TileKey, Stage)>) {
    crate::init_tracing();
    let mut builder = BusRuntime::builder(BusConfig {
        destinations: vec![Destination::ResourceReader, Destination::RenderBackend],
        ..BusConfig::default()
    })
    .unwrap();
    let reader = Reader {
        bus: builder.commutator(),
    };
    builder
        .install(
            Destination::ResourceReader,
            Dispatcher::new()
                .on_kinds(
                    &[
                        MessageKind::UpdateReadManager,
                        MessageKind::InvalidateReadManagerRect,
                    ],
                    reader,
                )
                .unwrap(),
        )
        .unwrap();

    let (tx, rx) = unbounded();
    builder
        .install(
            Destination::RenderBackend,
            Dispatcher::new()
                .on_kinds(
                    &[
                        MessageKind::TileReadStarted,
                        MessageKind::FlushTile,
                        MessageKind::TileReadEnded,
                    ],
                    move |msg: Message| {
                        let event = match msg {
                            Message::TileReadStarted(tile) => (tile, Stage::Started),
                            Message::FlushTile { tile, geometry } => {
                                assert_eq!(geometry.bytes.len(), 32);
                                (tile, Stage::Flushed)
                            }
                            Message::TileReadEnded(tile) => (tile, Stage::Ended),
                            other => panic!("backend got {:?}", other.kind()),
                        };
                        tx.send(event).unwrap();
                    },
                )
                .unwrap(),
        )
        .unwrap();
    (builder.start().unwrap(), rx)
}

fn collect(rx: &Receiver<(TileKey, Stage)>, events: usize) -> BTreeMap<TileKey, Vec<Stage>> {
    let mut per_tile: BTreeMap<TileKey, Vec<Stage>> = BTreeMap::new();
    for _ in 0..events {
        let (tile, stage) = rx.recv_timeout(RECV_TIMEOUT).expect("pipeline stalled");
        per_tile.entry(tile).or_default().push(stage);
    }
    per_tile
}

#[test]
fn each_tile_is_started_flushed_and_ended_in_order() {
    let (runtime, rx) = start_pipeline();
    let tiles: Vec<TileKey> = (0..6).map(|x| TileKey::new(x, 0, 10)).collect();

    runtime
        .commutator()
        .post(
            Message::UpdateReadManager {
                viewport: Viewport {
                    rect: MercatorRect::new(0.0, 0.0, 6.0, 1.0),
                    zoom: 10,
                },
                tiles: tiles.clone(),
            },
            MessagePriority::Normal,
        )
        .unwrap();

    let per_tile = collect(&rx, tiles.len() * 3);
    assert_eq!(per_tile.len(), tiles.len());
    for stages in per_tile.values() {
        assert_eq!(stages, &[Stage::Started, Stage::Flushed, Stage::Ended]);
    }

    let stats = runtime.shutdown().unwrap();
    let backend = stats
        .iter()
        .find(|s| s.destination == Destination::RenderBackend)
        .unwrap();
    assert_eq!(backend.count(MessageKind::FlushTile), tiles.len() as u64);
}

#[test]
fn invalidated_rect_rereads_only_dirty_tiles() {
    let (runtime, rx) = start_pipeline();
    let bus = runtime.commutator();
    let all: Vec<TileKey> = (0..4).map(|x| TileKey::new(x, 0, 10)).collect();
    bus.post(
        Message::UpdateReadManager {
            viewport: Viewport {
                rect: MercatorRect::new(0.0, 0.0, 4.0, 1.0),
                zoom: 10,
            },
            tiles: all.clone(),
        },
        MessagePriority::Normal,
    )
    .unwrap();
    collect(&rx, all.len() * 3);

    let dirty = vec![all[1], all[2]];
    bus.post(
        Message::InvalidateReadManagerRect {
            rect: MercatorRect::new(1.0, 0.0, 3.0, 1.0),
            tiles: dirty.clone(),
        },
        MessagePriority::High,
    )
    .unwrap();
    let reread = collect(&rx, dirty.len() * 3);
    assert_eq!(reread.keys().copied().collect::<Vec<_>>(), dirty);

    runtime.shutdown().unwrap();
    assert!(rx.try_recv().is_err());
}
