use crossbeam_channel::{bounded, Receiver, Sender};

/// One-shot answer slot carried by query messages.
///
/// The handler answers by value and never blocks: the channel has room for
/// exactly one reply, and an answer to a requester that already hung up is
/// discarded.
#[derive(Debug)]
pub struct Reply<T> {
    tx: Sender<T>,
}

impl<T> Reply<T> {
    /// Creates a reply slot and the receiver the requester waits on.
    pub fn channel() -> (Self, Receiver<T>) {
        let (tx, rx) = bounded(1);
        (Self { tx }, rx)
    }

    /// Delivers the answer. Returns `false` when the requester is gone.
    pub fn send(self, value: T) -> bool {
        self.tx.try_send(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_reaches_requester() {
        let (reply, rx) = Reply::channel();
        assert!(reply.send(7u32));
        assert_eq!(rx.recv().ok(), Some(7));
    }

    #[test]
    fn answer_after_hangup_is_discarded() {
        let (reply, rx) = Reply::<u32>::channel();
        drop(rx);
        assert!(!reply.send(1));
    }
}
