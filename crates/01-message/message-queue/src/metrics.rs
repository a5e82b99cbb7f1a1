use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::PushOutcome;

#[derive(Debug, Default)]
pub(crate) struct QueueMetrics {
    accepted: AtomicU64,
    collapsed: AtomicU64,
    rejected_closed: AtomicU64,
    discarded_on_close: AtomicU64,
    popped: AtomicU64,
}

impl QueueMetrics {
    pub(crate) fn record_push(&self, outcome: PushOutcome) {
        match outcome {
            PushOutcome::Accepted => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
            }
            PushOutcome::Collapsed => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
                self.collapsed.fetch_add(1, Ordering::Relaxed);
            }
            PushOutcome::Closed => {
                self.rejected_closed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub(crate) fn record_pop(&self) {
        self.popped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discard(&self, count: usize) {
        self.discarded_on_close
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> QueueMetricsSnapshot {
        QueueMetricsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            collapsed: self.collapsed.load(Ordering::Relaxed),
            rejected_closed: self.rejected_closed.load(Ordering::Relaxed),
            discarded_on_close: self.discarded_on_close.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a queue's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QueueMetricsSnapshot {
    /// Messages that entered the queue, including ones that later collapsed.
    pub accepted: u64,
    /// Pending singleton messages replaced by a newer one of the same kind.
    pub collapsed: u64,
    /// Pushes that arrived after the queue closed.
    pub rejected_closed: u64,
    /// Pending messages thrown away by `close`.
    pub discarded_on_close: u64,
    /// Messages handed to the consumer.
    pub popped: u64,
}
