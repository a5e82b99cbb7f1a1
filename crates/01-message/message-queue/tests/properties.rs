//! Property checks for tier ordering and singleton last-write-wins.

use drape_message::{Message, MessagePriority, TileKey};
use message_queue::{MessageQueue, PopOutcome};
use proptest::collection;
use proptest::prelude::*;

/// Tags each message with its submission index so order can be checked.
fn tagged(idx: usize) -> Message {
    Message::TileReadStarted(TileKey::new(idx as i32, 0, 0))
}

fn drain_indices(queue: &MessageQueue) -> Vec<usize> {
    let mut out = Vec::new();
    while let Some(PopOutcome::Message(message)) = queue.try_pop() {
        match message {
            Message::TileReadStarted(key) => out.push(key.x as usize),
            Message::GpsInfo(fix) => out.push(fix.timestamp_ms as usize),
            other => panic!("unexpected message {other:?}"),
        }
    }
    out
}

proptest! {
    /// Normal-only pushes pop in submission order.
    #[test]
    fn normal_only_is_fifo(count in 0usize..200) {
        let queue = MessageQueue::new("prop-fifo");
        for idx in 0..count {
            queue.push(tagged(idx), MessagePriority::Normal).unwrap();
        }
        let popped = drain_indices(&queue);
        prop_assert_eq!(popped, (0..count).collect::<Vec<_>>());
    }

    /// Every High pops before every Normal, and each tier keeps submission order.
    #[test]
    fn high_overtakes_normal_and_stays_fifo(
        tiers in collection::vec(any::<bool>(), 1..200)
    ) {
        let queue = MessageQueue::new("prop-tiers");
        let mut highs = Vec::new();
        let mut normals = Vec::new();
        for (idx, is_high) in tiers.iter().enumerate() {
            let priority = if *is_high {
                highs.push(idx);
                MessagePriority::High
            } else {
                normals.push(idx);
                MessagePriority::Normal
            };
            queue.push(tagged(idx), priority).unwrap();
        }

        let mut expected = highs;
        expected.extend(normals);
        prop_assert_eq!(drain_indices(&queue), expected);
    }

    /// Back-to-back singleton pushes of one kind deliver only the newest.
    #[test]
    fn singleton_last_write_wins(
        write_count in 1usize..50,
        normals in 0usize..10,
    ) {
        let queue = MessageQueue::new("prop-singleton");
        for idx in 0..normals {
            queue.push(tagged(1000 + idx), MessagePriority::Normal).unwrap();
        }
        for seq in 0..write_count {
            let fix = drape_message::GpsFix {
                position: drape_message::GeoPoint { lat: 0.0, lon: 0.0 },
                accuracy_m: 5.0,
                bearing: None,
                timestamp_ms: seq as u64,
            };
            queue
                .push(Message::GpsInfo(fix), MessagePriority::UberHighSingleton)
                .unwrap();
        }

        let popped = drain_indices(&queue);
        prop_assert_eq!(popped.len(), normals + 1);
        prop_assert_eq!(popped[0], write_count - 1);
        prop_assert_eq!(queue.metrics().collapsed, (write_count - 1) as u64);
    }
}
