#![deny(missing_docs)]
//! Per-destination runloops and the runtime that owns their threads.
//!
//! * [`Dispatcher`] – kind → handler table supplied by collaborators.
//! * [`Runloop`] – blocking pop/dispatch loop for one destination.
//! * [`BusRuntime`] – spawns one OS thread per destination and closes every
//!   queue on shutdown and on drop. A runloop that fails or panics halts the
//!   whole bus.

mod config;
mod dispatcher;
mod error;
mod runloop;
mod runtime;

pub use config::BusConfig;
pub use dispatcher::{Dispatcher, MessageHandler};
pub use error::{RunloopError, RunloopResult, RuntimeError, RuntimeResult};
pub use runloop::{Runloop, RunloopStats};
pub use runtime::{BusRuntime, BusRuntimeBuilder};
