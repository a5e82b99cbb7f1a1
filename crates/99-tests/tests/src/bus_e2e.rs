use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use commutator::Destination;
use crossbeam_channel::unbounded;
use drape_message::{
    CompassHeading, GeoPoint, GpsFix, Message, MessageKind, MessagePriority, Reply, TileKey,
};
use parking_lot::Mutex;
use runloop::{BusConfig, BusRuntime, Dispatcher};

const RECV_TIMEOUT: Duration = Duration::from_secs(10);

fn fix(seq: u64) -> GpsFix {
    GpsFix {
        position: GeoPoint {
            lat: seq as f64 * 1e-3,
            lon: 0.0,
        },
        accuracy_m: 5.0,
        bearing: None,
        timestamp_ms: seq,
    }
}

#[test]
fn producers_on_many_threads_lose_nothing() {
    const PRODUCERS: i32 = 4;
    const PER_PRODUCER: i32 = 1_000;
    crate::init_tracing();

    let mut builder = BusRuntime::builder(BusConfig {
        destinations: vec![Destination::RenderBackend],
        ..BusConfig::default()
    })
    .unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    builder
        .install(
            Destination::RenderBackend,
            Dispatcher::new()
                .on(MessageKind::TileReadEnded, move |msg: Message| {
                    if let Message::TileReadEnded(tile) = msg {
                        sink.lock().push(tile);
                    }
                })
                .unwrap(),
        )
        .unwrap();
    let runtime = builder.start().unwrap();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let bus = runtime.commutator();
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    bus.send(
                        Message::TileReadEnded(TileKey::new(producer, seq, 1)),
                        Destination::RenderBackend,
                        MessagePriority::Normal,
                    )
                    .unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let expected = (PRODUCERS * PER_PRODUCER) as usize;
    let deadline = std::time::Instant::now() + RECV_TIMEOUT;
    while seen.lock().len() < expected && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }
    let stats = runtime.shutdown().unwrap();
    assert_eq!(stats[0].dispatched, expected as u64);

    let seen = seen.lock();
    assert_eq!(seen.len(), expected);
    let mut next: HashMap<i32, i32> = HashMap::new();
    for tile in seen.iter() {
        let expected_seq = next.entry(tile.x).or_insert(0);
        assert_eq!(tile.y, *expected_seq, "producer {} out of order", tile.x);
        *expected_seq += 1;
    }
    assert!(next.values().all(|count| *count == PER_PRODUCER));
}

#[test]
fn latest_fix_wins_under_load() {
    crate::init_tracing();
    let mut builder = BusRuntime::builder(BusConfig {
        destinations: vec![Destination::RenderBackend],
        ..BusConfig::default()
    })
    .unwrap();

    let (started_tx, started_rx) = unbounded();
    let gate = Arc::new(Mutex::new(()));
    let held = gate.lock();
    let backend_gate = Arc::clone(&gate);
    let mut last_fix = None;
    builder
        .install(
            Destination::RenderBackend,
            Dispatcher::new()
                .on_kinds(
                    &[
                        MessageKind::CompassInfo,
                        MessageKind::GpsInfo,
                        MessageKind::GetMyPosition,
                    ],
                    move |msg: Message| match msg {
                        Message::CompassInfo(_) => {
                            // Park the backend so the fixes below pile up.
                            started_tx.send(()).unwrap();
                            drop(backend_gate.lock());
                        }
                        Message::GpsInfo(fix) => last_fix = Some(fix.position),
                        Message::GetMyPosition { reply } => {
                            reply.send(last_fix);
                        }
                        _ => unreachable!(),
                    },
                )
                .unwrap(),
        )
        .unwrap();
    let runtime = builder.start().unwrap();
    let bus = runtime.commutator();

    bus.post(
        Message::CompassInfo(CompassHeading {
            bearing: 0.0,
            timestamp_ms: 0,
        }),
        MessagePriority::Normal,
    )
    .unwrap();
    started_rx.recv_timeout(RECV_TIMEOUT).unwrap();

    for seq in 1..=500 {
        bus.post(Message::GpsInfo(fix(seq)), MessagePriority::UberHighSingleton)
            .unwrap();
    }
    let (reply, answer) = Reply::channel();
    bus.post(Message::GetMyPosition { reply }, MessagePriority::High)
        .unwrap();
    drop(held);

    let position = answer.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(position, Some(fix(500).position));

    let metrics = bus.queue(Destination::RenderBackend).unwrap().metrics();
    assert_eq!(metrics.collapsed, 499);
    let stats = runtime.shutdown().unwrap();
    assert_eq!(stats[0].count(MessageKind::GpsInfo), 1);
}

#[test]
fn stop_rendering_reaches_every_thread_first() {
    crate::init_tracing();
    let mut builder = BusRuntime::builder(BusConfig::default()).unwrap();
    let (tx, rx) = unbounded();

    for destination in Destination::ALL {
        let tx = tx.clone();
        let mut stopped = false;
        builder
            .install(
                destination,
                Dispatcher::new()
                    .on_kinds(
                        &[MessageKind::Invalidate, MessageKind::StopRendering],
                        move |msg: Message| {
                            if msg.kind() == MessageKind::StopRendering {
                                stopped = true;
                            }
                            tx.send((destination, msg.kind(), stopped)).unwrap();
                        },
                    )
                    .unwrap(),
            )
            .unwrap();
    }
    // Queues exist before start, so everything below is pending when threads spawn.
    let bus = builder.commutator();
    bus.broadcast(|| Message::Invalidate, MessagePriority::Normal)
        .unwrap();
    bus.post_with(|| Message::StopRendering, MessagePriority::UberHighSingleton)
        .unwrap();
    let runtime = builder.start().unwrap();

    let mut first_seen = HashMap::new();
    for _ in 0..6 {
        let (destination, kind, stopped) = rx.recv_timeout(RECV_TIMEOUT).unwrap();
        first_seen.entry(destination).or_insert(kind);
        if kind == MessageKind::Invalidate {
            assert!(stopped, "{destination} saw Invalidate before StopRendering");
        }
    }
    assert_eq!(first_seen.len(), 3);
    assert!(first_seen
        .values()
        .all(|kind| *kind == MessageKind::StopRendering));

    runtime.shutdown().unwrap();
}
