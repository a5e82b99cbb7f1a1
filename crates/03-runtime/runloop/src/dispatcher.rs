use std::collections::HashMap;

use drape_message::{Message, MessageKind};

use crate::{RunloopError, RunloopResult};

/// Collaborator code invoked for each dequeued message of a registered kind.
///
/// Handlers run on their destination thread, one message at a time and to
/// completion, so `&mut self` state needs no locking.
pub trait MessageHandler: Send {
    /// Consumes one dequeued message.
    fn handle(&mut self, message: Message);
}

impl<F> MessageHandler for F
where
    F: FnMut(Message) + Send,
{
    fn handle(&mut self, message: Message) {
        self(message)
    }
}

/// Kind → handler table for one destination.
///
/// One handler may serve several kinds (see [`Dispatcher::on_kinds`]) so a
/// collaborator keeps its state in a single place.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn MessageHandler>>,
    by_kind: HashMap<MessageKind, usize>,
}

impl Dispatcher {
    /// Dispatcher with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`.
    pub fn on<H>(self, kind: MessageKind, handler: H) -> RunloopResult<Self>
    where
        H: MessageHandler + 'static,
    {
        self.on_kinds(&[kind], handler)
    }

    /// Registers one shared `handler` for every kind in `kinds`.
    ///
    /// Fails without registering anything if a kind is `Unknown` or already
    /// has a handler.
    pub fn on_kinds<H>(mut self, kinds: &[MessageKind], handler: H) -> RunloopResult<Self>
    where
        H: MessageHandler + 'static,
    {
        for (idx, kind) in kinds.iter().enumerate() {
            if !kind.is_known() {
                return Err(RunloopError::UnknownKind(*kind));
            }
            if self.by_kind.contains_key(kind) || kinds[..idx].contains(kind) {
                return Err(RunloopError::DuplicateHandler(*kind));
            }
        }
        let slot = self.handlers.len();
        self.handlers.push(Box::new(handler));
        for kind in kinds {
            self.by_kind.insert(*kind, slot);
        }
        Ok(self)
    }

    /// Returns `true` when `kind` has a handler.
    pub fn handles(&self, kind: MessageKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<MessageKind> {
        let mut kinds: Vec<_> = self.by_kind.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Runs the handler for `message`, handing over ownership.
    ///
    /// Returns the message back when its kind has no handler.
    pub fn dispatch(&mut self, message: Message) -> Result<(), Message> {
        match self.by_kind.get(&message.kind()) {
            Some(&slot) => {
                self.handlers[slot].handle(message);
                Ok(())
            }
            None => Err(message),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("kinds", &self.kinds())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
