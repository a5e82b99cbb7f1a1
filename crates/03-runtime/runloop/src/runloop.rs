use std::collections::BTreeMap;
use std::sync::Arc;

use commutator::{Commutator, Destination, RouteError, RouteResult};
use drape_message::MessageKind;
use message_queue::{MessageQueue, PopOutcome};
use serde::Serialize;
use tracing::{debug, error, trace};

use crate::{Dispatcher, RunloopError, RunloopResult};

/// Counters reported when a runloop exits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunloopStats {
    /// Destination the loop served.
    pub destination: Destination,
    /// Messages handed to handlers.
    pub dispatched: u64,
    /// Dispatched messages per kind.
    pub per_kind: BTreeMap<MessageKind, u64>,
}

impl RunloopStats {
    fn new(destination: Destination) -> Self {
        Self {
            destination,
            dispatched: 0,
            per_kind: BTreeMap::new(),
        }
    }

    fn record(&mut self, kind: MessageKind) {
        self.dispatched += 1;
        *self.per_kind.entry(kind).or_default() += 1;
    }

    /// Dispatched count for `kind`.
    pub fn count(&self, kind: MessageKind) -> u64 {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Closes the queue when the loop exits; halts the whole bus unless the exit
/// was an orderly close.
struct CloseOnExit<'a> {
    bus: &'a Commutator,
    queue: &'a MessageQueue,
    destination: Destination,
    clean: bool,
}

impl Drop for CloseOnExit<'_> {
    fn drop(&mut self) {
        if self.clean {
            self.queue.close();
            return;
        }
        let discarded = self.bus.halt(self.destination);
        if std::thread::panicking() {
            error!(destination = %self.destination, discarded, "handler panicked; bus halted");
        } else {
            error!(destination = %self.destination, discarded, "runloop failed; bus halted");
        }
    }
}

/// Consumer side of one destination: pops and dispatches until the queue closes.
pub struct Runloop {
    destination: Destination,
    bus: Arc<Commutator>,
    queue: Arc<MessageQueue>,
    dispatcher: Dispatcher,
}

impl Runloop {
    /// Binds `dispatcher` to the queue `bus` holds for `destination`.
    pub fn new(
        destination: Destination,
        bus: Arc<Commutator>,
        dispatcher: Dispatcher,
    ) -> RouteResult<Self> {
        let queue = bus
            .queue(destination)
            .cloned()
            .ok_or(RouteError::Unregistered(destination))?;
        Ok(Self {
            destination,
            bus,
            queue,
            dispatcher,
        })
    }

    /// Runs until the queue closes.
    ///
    /// A message whose kind has no handler ends the loop with
    /// [`RunloopError::Unhandled`]. That exit, like a handler panic, halts the
    /// bus: every queue closes and later sends fail.
    pub fn run(mut self) -> RunloopResult<RunloopStats> {
        let mut guard = CloseOnExit {
            bus: &self.bus,
            queue: &self.queue,
            destination: self.destination,
            clean: false,
        };
        let mut stats = RunloopStats::new(self.destination);
        debug!(destination = %self.destination, kinds = ?self.dispatcher.kinds(), "runloop started");

        loop {
            let message = match self.queue.pop_blocking() {
                PopOutcome::Message(message) => message,
                PopOutcome::Closed => break,
            };
            let kind = message.kind();
            trace!(destination = %self.destination, %kind, "dispatch");
            if let Err(message) = self.dispatcher.dispatch(message) {
                error!(destination = %self.destination, %kind, ?message, "no handler registered");
                return Err(RunloopError::Unhandled {
                    destination: self.destination,
                    kind,
                });
            }
            stats.record(kind);
        }

        guard.clean = true;
        debug!(
            destination = %self.destination,
            dispatched = stats.dispatched,
            "runloop finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drape_message::{Message, MessagePriority, TileKey};
    use std::sync::mpsc;
    use std::thread;

    fn bus_with(destinations: &[Destination]) -> Arc<Commutator> {
        let mut bus = Commutator::new();
        for destination in destinations {
            bus.register_destination(*destination, Arc::new(MessageQueue::new(destination.name())))
                .unwrap();
        }
        Arc::new(bus)
    }

    #[test]
    fn handlers_run_in_queue_order_until_close() {
        let bus = bus_with(&[Destination::RenderBackend]);
        let queue = Arc::clone(bus.queue(Destination::RenderBackend).unwrap());
        let (tx, rx) = mpsc::channel();
        let dispatcher = Dispatcher::new()
            .on_kinds(
                &[MessageKind::TileReadEnded, MessageKind::Invalidate],
                move |msg: Message| tx.send(msg.kind()).unwrap(),
            )
            .unwrap();

        queue
            .push(
                Message::TileReadEnded(TileKey::new(0, 0, 3)),
                MessagePriority::Normal,
            )
            .unwrap();
        queue
            .push(Message::Invalidate, MessagePriority::High)
            .unwrap();

        let runloop = Runloop::new(Destination::RenderBackend, Arc::clone(&bus), dispatcher).unwrap();
        let worker = thread::spawn(move || runloop.run());

        assert_eq!(rx.recv().unwrap(), MessageKind::Invalidate);
        assert_eq!(rx.recv().unwrap(), MessageKind::TileReadEnded);
        queue.close();

        let stats = worker.join().unwrap().unwrap();
        assert_eq!(stats.dispatched, 2);
        assert_eq!(stats.count(MessageKind::Invalidate), 1);
        assert_eq!(stats.count(MessageKind::GpsInfo), 0);
        assert_eq!(bus.halted(), None);
    }

    #[test]
    fn unregistered_destination_has_no_runloop() {
        let bus = bus_with(&[Destination::Frontend]);
        let err = Runloop::new(Destination::RenderBackend, bus, Dispatcher::new())
            .err()
            .expect("no queue for render backend");
        assert_eq!(err, RouteError::Unregistered(Destination::RenderBackend));
    }

    #[test]
    fn unhandled_kind_halts_the_bus() {
        let bus = bus_with(&[Destination::Frontend, Destination::RenderBackend]);
        let dispatcher = Dispatcher::new()
            .on(MessageKind::CountryInfoUpdate, |_: Message| {})
            .unwrap();
        bus.send(Message::StopRendering, Destination::Frontend, MessagePriority::Normal)
            .unwrap();

        let err = Runloop::new(Destination::Frontend, Arc::clone(&bus), dispatcher)
            .unwrap()
            .run()
            .unwrap_err();
        assert_eq!(
            err,
            RunloopError::Unhandled {
                destination: Destination::Frontend,
                kind: MessageKind::StopRendering,
            }
        );
        assert_eq!(bus.halted(), Some(Destination::Frontend));
        assert!(bus.queue(Destination::RenderBackend).unwrap().is_closed());
        assert_eq!(
            bus.send(Message::Invalidate, Destination::Frontend, MessagePriority::Normal),
            Err(RouteError::Halted(Destination::Frontend))
        );
    }

    #[test]
    fn panicking_handler_halts_the_bus() {
        let bus = bus_with(&[Destination::ResourceReader, Destination::Frontend]);
        let dispatcher = Dispatcher::new()
            .on(MessageKind::GuiRecache, |_: Message| panic!("recache failed"))
            .unwrap();
        bus.send(
            Message::GuiRecache { widgets: Vec::new() },
            Destination::ResourceReader,
            MessagePriority::Normal,
        )
        .unwrap();

        let runloop = Runloop::new(Destination::ResourceReader, Arc::clone(&bus), dispatcher).unwrap();
        let joined = thread::spawn(move || runloop.run()).join();
        assert!(joined.is_err());
        assert_eq!(bus.halted(), Some(Destination::ResourceReader));
        assert!(bus.queue(Destination::Frontend).unwrap().is_closed());
    }
}
