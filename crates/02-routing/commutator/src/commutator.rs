use std::sync::{Arc, OnceLock};

use drape_message::{Message, MessageKind, MessagePriority};
use message_queue::{MessageQueue, PushOutcome, QueueMetricsSnapshot};
use smallvec::SmallVec;
use tracing::{debug, error, warn};

use crate::{Destination, RouteError, RouteResult, RoutingTable};

/// Per-destination outcomes of a fan-out send.
pub type Delivery = SmallVec<[(Destination, PushOutcome); 3]>;

/// Routes messages into destination queues.
///
/// The destination table is filled during setup and read-only afterwards, so a
/// commutator is shared behind an `Arc` without further locking. Each send
/// takes only the target queue's lock.
///
/// A destination that dies on a fatal error halts the whole bus through
/// [`Commutator::halt`]; from then on every send fails with
/// [`RouteError::Halted`] instead of being dropped by a closed queue.
pub struct Commutator {
    queues: SmallVec<[(Destination, Arc<MessageQueue>); 3]>,
    routes: RoutingTable,
    halted: OnceLock<Destination>,
}

impl Commutator {
    /// Creates a commutator with the standard routing table.
    pub fn new() -> Self {
        Self::with_routes(RoutingTable::default())
    }

    /// Creates a commutator with an explicit routing table.
    pub fn with_routes(routes: RoutingTable) -> Self {
        Self {
            queues: SmallVec::new(),
            routes,
            halted: OnceLock::new(),
        }
    }

    /// Associates `destination` with its queue.
    pub fn register_destination(
        &mut self,
        destination: Destination,
        queue: Arc<MessageQueue>,
    ) -> RouteResult<()> {
        if self.queue(destination).is_some() {
            return Err(RouteError::DuplicateDestination(destination));
        }
        debug!(%destination, queue = queue.label(), "registered destination");
        self.queues.push((destination, queue));
        self.queues.sort_unstable_by_key(|(dest, _)| *dest);
        Ok(())
    }

    /// Queue registered for `destination`.
    pub fn queue(&self, destination: Destination) -> Option<&Arc<MessageQueue>> {
        self.queues
            .iter()
            .find(|(dest, _)| *dest == destination)
            .map(|(_, queue)| queue)
    }

    /// Registered destinations in a stable order.
    pub fn destinations(&self) -> impl Iterator<Item = Destination> + '_ {
        self.queues.iter().map(|(dest, _)| *dest)
    }

    /// Sends `message` to exactly one destination.
    pub fn send(
        &self,
        message: Message,
        destination: Destination,
        priority: MessagePriority,
    ) -> RouteResult<PushOutcome> {
        let Some(queue) = self.queue(destination) else {
            error!(%destination, kind = %message.kind(), "send to unregistered destination");
            return Err(RouteError::Unregistered(destination));
        };
        self.deliver(queue, message, priority)
    }

    fn deliver(
        &self,
        queue: &MessageQueue,
        message: Message,
        priority: MessagePriority,
    ) -> RouteResult<PushOutcome> {
        let kind = message.kind();
        self.ensure_running(kind)?;
        let outcome = queue.push(message, priority)?;
        if outcome == PushOutcome::Closed {
            // The halt flag is set before any queue closes.
            self.ensure_running(kind)?;
        }
        Ok(outcome)
    }

    fn ensure_running(&self, kind: MessageKind) -> RouteResult<()> {
        match self.halted() {
            Some(failed) => {
                error!(%failed, %kind, "send on halted bus");
                Err(RouteError::Halted(failed))
            }
            None => Ok(()),
        }
    }

    /// Sends a fresh message from `factory` to every registered destination.
    pub fn broadcast<F>(&self, mut factory: F, priority: MessagePriority) -> RouteResult<Delivery>
    where
        F: FnMut() -> Message,
    {
        if self.queues.is_empty() {
            warn!("broadcast with no registered destinations");
        }
        let mut delivery = Delivery::new();
        for (destination, queue) in &self.queues {
            let outcome = self.deliver(queue, factory(), priority)?;
            delivery.push((*destination, outcome));
        }
        Ok(delivery)
    }

    /// Sends `message` to the single destination its kind is routed to.
    ///
    /// Kinds routed to several destinations need one instance each; use
    /// [`Commutator::post_with`] for those.
    pub fn post(&self, message: Message, priority: MessagePriority) -> RouteResult<PushOutcome> {
        let kind = message.kind();
        match self.routes.destinations(kind) {
            [] => {
                error!(%kind, "no route for message kind");
                Err(RouteError::NoRoute(kind))
            }
            [destination] => self.send(message, *destination, priority),
            many => Err(RouteError::Fanout {
                kind,
                destinations: many.len(),
            }),
        }
    }

    /// Sends one message from `factory` to each destination routed for its kind.
    ///
    /// The first instance decides the kind; the factory must keep producing the
    /// same kind.
    pub fn post_with<F>(&self, mut factory: F, priority: MessagePriority) -> RouteResult<Delivery>
    where
        F: FnMut() -> Message,
    {
        let first = factory();
        let kind = first.kind();
        let destinations = self.routes.destinations(kind);
        let Some((head, tail)) = destinations.split_first() else {
            error!(%kind, "no route for message kind");
            return Err(RouteError::NoRoute(kind));
        };

        let mut delivery = Delivery::new();
        delivery.push((*head, self.send(first, *head, priority)?));
        for destination in tail {
            let message = factory();
            debug_assert_eq!(message.kind(), kind, "factory changed message kind");
            delivery.push((*destination, self.send(message, *destination, priority)?));
        }
        Ok(delivery)
    }

    /// Closes every registered queue. Returns the number of discarded messages.
    ///
    /// This is the orderly teardown: later sends report
    /// [`PushOutcome::Closed`].
    pub fn close_all(&self) -> usize {
        self.queues.iter().map(|(_, queue)| queue.close()).sum()
    }

    /// Tears the bus down after `failed` hit a fatal error.
    ///
    /// Records the first failed destination, closes every queue, and makes
    /// later sends fail with [`RouteError::Halted`]. Returns the number of
    /// discarded messages.
    pub fn halt(&self, failed: Destination) -> usize {
        if self.halted.set(failed).is_ok() {
            error!(%failed, "destination failed; halting bus");
        }
        self.close_all()
    }

    /// Destination whose failure halted the bus.
    pub fn halted(&self) -> Option<Destination> {
        self.halted.get().copied()
    }

    /// Counter snapshot per destination.
    pub fn metrics(&self) -> SmallVec<[(Destination, QueueMetricsSnapshot); 3]> {
        self.queues
            .iter()
            .map(|(dest, queue)| (*dest, queue.metrics()))
            .collect()
    }
}

impl Default for Commutator {
    fn default() -> Self {
        Self::new()
    }
}
