use std::time::{Duration, Instant};

use drape_message::{Message, MessagePriority};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::metrics::{QueueMetrics, QueueMetricsSnapshot};
use crate::tiers::TierQueues;
use crate::{QueueError, QueueResult};

const DEFAULT_CAPACITY: usize = 64;

/// Outcome reported when pushing into a queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// Message entered the queue untouched.
    Accepted,
    /// Message entered the queue and replaced a pending singleton of the same kind.
    Collapsed,
    /// Queue is shutting down; the message was dropped.
    Closed,
}

/// Result of waiting for the next message.
#[derive(Debug)]
pub enum PopOutcome {
    /// Next message in priority order.
    Message(Message),
    /// Queue closed; the consumer should exit.
    Closed,
}

impl PopOutcome {
    /// Returns the message, or `None` when the queue closed.
    pub fn into_message(self) -> Option<Message> {
        match self {
            PopOutcome::Message(message) => Some(message),
            PopOutcome::Closed => None,
        }
    }
}

struct State {
    tiers: TierQueues,
    closed: bool,
}

/// Pending messages for a single destination thread.
///
/// Any thread may push; exactly one consumer pops. Pushes hold the lock only
/// for the tier insert, so producers never wait on the consumer's handler.
pub struct MessageQueue {
    label: String,
    state: Mutex<State>,
    ready: Condvar,
    metrics: QueueMetrics,
}

impl MessageQueue {
    /// Creates an open, empty queue. `label` names the queue in logs.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_capacity(label, DEFAULT_CAPACITY)
    }

    /// Creates a queue with an initial capacity per FIFO tier.
    pub fn with_capacity(label: impl Into<String>, capacity: usize) -> Self {
        Self {
            label: label.into(),
            state: Mutex::new(State {
                tiers: TierQueues::with_capacity(capacity),
                closed: false,
            }),
            ready: Condvar::new(),
            metrics: QueueMetrics::default(),
        }
    }

    /// Name used in logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Inserts `message` according to `priority`.
    ///
    /// A singleton push discards any pending message of the same kind before
    /// inserting. After [`MessageQueue::close`] the message is dropped and
    /// [`PushOutcome::Closed`] is returned.
    pub fn push(&self, message: Message, priority: MessagePriority) -> QueueResult<PushOutcome> {
        let kind = message.kind();
        if !kind.is_known() {
            return Err(QueueError::UnknownKind(kind));
        }

        let stale = {
            let mut state = self.state.lock();
            if state.closed {
                drop(state);
                trace!(queue = %self.label, %kind, "push after close dropped");
                self.metrics.record_push(PushOutcome::Closed);
                return Ok(PushOutcome::Closed);
            }
            state.tiers.enqueue(priority, message)
        };
        self.ready.notify_one();

        let outcome = match stale {
            Some(stale) => {
                debug!(queue = %self.label, %kind, "collapsed pending singleton");
                drop(stale);
                PushOutcome::Collapsed
            }
            None => {
                trace!(queue = %self.label, %kind, %priority, "pushed");
                PushOutcome::Accepted
            }
        };
        self.metrics.record_push(outcome);
        Ok(outcome)
    }

    /// Blocks until a message is pending or the queue closes.
    ///
    /// Closing wins over pending messages: once closed, every call returns
    /// [`PopOutcome::Closed`].
    pub fn pop_blocking(&self) -> PopOutcome {
        let mut state = self.state.lock();
        loop {
            if let Some(outcome) = self.take_next(&mut state) {
                return outcome;
            }
            self.ready.wait(&mut state);
        }
    }

    /// Like [`MessageQueue::pop_blocking`] but gives up after `timeout`.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<PopOutcome> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(outcome) = self.take_next(&mut state) {
                return Some(outcome);
            }
            if self.ready.wait_until(&mut state, deadline).timed_out() {
                return self.take_next(&mut state);
            }
        }
    }

    /// Pops without blocking. Returns `None` when the queue is open and empty.
    pub fn try_pop(&self) -> Option<PopOutcome> {
        let mut state = self.state.lock();
        self.take_next(&mut state)
    }

    fn take_next(&self, state: &mut State) -> Option<PopOutcome> {
        if state.closed {
            return Some(PopOutcome::Closed);
        }
        let message = state.tiers.pop_next()?;
        self.metrics.record_pop();
        trace!(queue = %self.label, kind = %message.kind(), "popped");
        Some(PopOutcome::Message(message))
    }

    /// Marks the queue as shutting down.
    ///
    /// Pending messages are discarded without dispatch and every blocked
    /// consumer wakes with [`PopOutcome::Closed`]. Returns the number of
    /// discarded messages; calling it again returns 0.
    pub fn close(&self) -> usize {
        let discarded = {
            let mut state = self.state.lock();
            if state.closed {
                return 0;
            }
            state.closed = true;
            state.tiers.drain_all()
        };
        self.ready.notify_all();

        let count = discarded.len();
        drop(discarded);
        self.metrics.record_discard(count);
        debug!(queue = %self.label, discarded = count, "queue closed");
        count
    }

    /// Returns `true` once [`MessageQueue::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns `true` when nothing is pending. Diagnostics only; the answer
    /// may be stale by the time the caller acts on it.
    pub fn is_empty(&self) -> bool {
        self.state.lock().tiers.is_empty()
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        self.state.lock().tiers.len()
    }

    /// Pending messages per tier ordered as [UberHighSingleton, High, Normal].
    pub fn len_per_priority(&self) -> [usize; 3] {
        self.state.lock().tiers.len_per_priority()
    }

    /// Most urgent tier with pending messages.
    pub fn current_priority(&self) -> Option<MessagePriority> {
        self.state.lock().tiers.current_priority()
    }

    /// Counter snapshot.
    pub fn metrics(&self) -> QueueMetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl std::fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MessageQueue")
            .field("label", &self.label)
            .field("pending", &state.tiers.len_per_priority())
            .field("closed", &state.closed)
            .finish()
    }
}
