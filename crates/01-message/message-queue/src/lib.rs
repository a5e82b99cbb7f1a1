#![deny(missing_docs)]
//! Per-destination message queue with three priority tiers.
//!
//! * [`MessageQueue`] – mutex-protected tiers plus a condition variable the
//!   consumer parks on; many producers, one consumer.
//! * [`PushOutcome`] / [`PopOutcome`] – explicit results for collapsing and
//!   shutdown instead of sentinel values.
//! * [`QueueMetricsSnapshot`] – counters for diagnostics.
//!
//! Within a queue, `UberHighSingleton ≻ High ≻ Normal` is absolute and
//! submission order is preserved inside each tier. The singleton tier holds at
//! most one pending message per kind.

mod error;
mod metrics;
mod queue;
mod tiers;

pub use error::{QueueError, QueueResult};
pub use metrics::QueueMetricsSnapshot;
pub use queue::{MessageQueue, PopOutcome, PushOutcome};
