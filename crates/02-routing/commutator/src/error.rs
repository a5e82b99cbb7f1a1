use drape_message::MessageKind;
use message_queue::QueueError;
use thiserror::Error;

use crate::Destination;

/// Result alias for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;

/// Routing and registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// Target destination never registered a queue.
    #[error("destination {0} has no registered queue")]
    Unregistered(Destination),

    /// A destination registered a second queue.
    #[error("destination {0} registered twice")]
    DuplicateDestination(Destination),

    /// The routing table has no destination for the kind.
    #[error("no route for message kind {0}")]
    NoRoute(MessageKind),

    /// `post` was used for a kind that fans out to several destinations.
    #[error("message kind {kind} routes to {destinations} destinations; use post_with")]
    Fanout {
        /// Kind being posted.
        kind: MessageKind,
        /// Number of destinations it routes to.
        destinations: usize,
    },

    /// The bus was torn down after a destination failed; nothing is delivered.
    #[error("bus halted after {0} failed")]
    Halted(Destination),

    /// The target queue rejected the message.
    #[error(transparent)]
    Queue(#[from] QueueError),
}
