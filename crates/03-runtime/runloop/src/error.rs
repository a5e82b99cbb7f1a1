use commutator::{Destination, RouteError};
use drape_message::MessageKind;
use thiserror::Error;

/// Result alias for dispatcher and runloop operations.
pub type RunloopResult<T> = Result<T, RunloopError>;
/// Result alias for runtime lifecycle operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Configuration and dispatch failures of a single destination.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunloopError {
    /// A kind got a second handler.
    #[error("handler for {0} registered twice")]
    DuplicateHandler(MessageKind),

    /// Handlers cannot be registered for the `Unknown` sentinel.
    #[error("cannot register a handler for the {0} sentinel")]
    UnknownKind(MessageKind),

    /// A dequeued message had no handler. Fatal: the bus halts.
    #[error("{destination} received {kind} but has no handler for it")]
    Unhandled {
        /// Destination whose runloop failed.
        destination: Destination,
        /// Kind without a handler.
        kind: MessageKind,
    },
}

/// Lifecycle failures of a [`crate::BusRuntime`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Queue registration or lookup failed.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// A runloop ended with an error.
    #[error(transparent)]
    Runloop(#[from] RunloopError),

    /// `install` was called twice for a destination.
    #[error("{0} already has a dispatcher")]
    DuplicateDispatcher(Destination),

    /// `start` found a registered destination without a dispatcher.
    #[error("{0} has a queue but no dispatcher")]
    MissingDispatcher(Destination),

    /// The OS refused to spawn a destination thread.
    #[error("failed to spawn {destination} thread: {source}")]
    Spawn {
        /// Destination the thread was for.
        destination: Destination,
        /// Spawn error.
        #[source]
        source: std::io::Error,
    },

    /// A handler panicked on the destination thread.
    #[error("{0} thread panicked")]
    Panicked(Destination),
}
