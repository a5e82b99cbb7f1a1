use drape_message::MessageKind;
use thiserror::Error;

/// Result alias for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors surfaced by [`crate::MessageQueue::push`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The message carries the `Unknown` sentinel kind.
    #[error("refusing to enqueue a message of kind {0}")]
    UnknownKind(MessageKind),
}
