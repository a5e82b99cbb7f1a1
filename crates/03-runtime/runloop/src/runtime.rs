use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use commutator::{Commutator, Destination, RouteError, RoutingTable};
use message_queue::MessageQueue;
use tracing::{debug, error, info};

use crate::{
    BusConfig, Dispatcher, Runloop, RunloopResult, RunloopStats, RuntimeError, RuntimeResult,
};

/// Assembles queues, the commutator, and per-destination dispatchers.
///
/// Queues exist as soon as the builder does, so collaborators can grab
/// [`BusRuntimeBuilder::commutator`] and capture it in their handlers before
/// the threads start.
pub struct BusRuntimeBuilder {
    config: BusConfig,
    commutator: Arc<Commutator>,
    dispatchers: HashMap<Destination, Dispatcher>,
}

impl BusRuntimeBuilder {
    /// Creates a builder using the standard routing table.
    pub fn new(config: BusConfig) -> RuntimeResult<Self> {
        Self::with_routes(config, RoutingTable::default())
    }

    /// Creates a builder with an explicit routing table.
    pub fn with_routes(config: BusConfig, routes: RoutingTable) -> RuntimeResult<Self> {
        let mut commutator = Commutator::with_routes(routes);
        for destination in &config.destinations {
            let queue = MessageQueue::with_capacity(destination.name(), config.queue_capacity);
            commutator.register_destination(*destination, Arc::new(queue))?;
        }
        Ok(Self {
            config,
            commutator: Arc::new(commutator),
            dispatchers: HashMap::new(),
        })
    }

    /// Shared handle producers send through.
    pub fn commutator(&self) -> Arc<Commutator> {
        Arc::clone(&self.commutator)
    }

    /// Installs the dispatcher that `destination`'s thread will run.
    pub fn install(&mut self, destination: Destination, dispatcher: Dispatcher) -> RuntimeResult<()> {
        if self.commutator.queue(destination).is_none() {
            return Err(RouteError::Unregistered(destination).into());
        }
        if self.dispatchers.contains_key(&destination) {
            return Err(RuntimeError::DuplicateDispatcher(destination));
        }
        self.dispatchers.insert(destination, dispatcher);
        Ok(())
    }

    /// Spawns one named thread per destination.
    ///
    /// Every registered destination needs a dispatcher. If a spawn fails, the
    /// threads already started are closed and joined before returning.
    pub fn start(mut self) -> RuntimeResult<BusRuntime> {
        let destinations: Vec<Destination> = self.commutator.destinations().collect();
        if let Some(missing) = destinations
            .iter()
            .find(|dest| !self.dispatchers.contains_key(*dest))
        {
            return Err(RuntimeError::MissingDispatcher(*missing));
        }

        let mut runtime = BusRuntime {
            commutator: Arc::clone(&self.commutator),
            threads: Vec::with_capacity(destinations.len()),
        };
        for destination in destinations {
            let Some(dispatcher) = self.dispatchers.remove(&destination) else {
                return Err(RuntimeError::MissingDispatcher(destination));
            };
            let runloop = Runloop::new(destination, Arc::clone(&self.commutator), dispatcher)?;
            let handle = thread::Builder::new()
                .name(self.config.thread_name(destination))
                .spawn(move || runloop.run())
                .map_err(|source| RuntimeError::Spawn {
                    destination,
                    source,
                })?;
            debug!(%destination, "destination thread spawned");
            runtime.threads.push((destination, handle));
        }
        info!(threads = runtime.threads.len(), "bus runtime started");
        Ok(runtime)
    }
}

/// Running bus: one thread per destination plus the shared commutator.
///
/// Dropping the runtime closes every queue and joins the threads, so no
/// consumer is left parked on an open queue.
pub struct BusRuntime {
    commutator: Arc<Commutator>,
    threads: Vec<(Destination, JoinHandle<RunloopResult<RunloopStats>>)>,
}

impl BusRuntime {
    /// Shorthand for [`BusRuntimeBuilder::new`].
    pub fn builder(config: BusConfig) -> RuntimeResult<BusRuntimeBuilder> {
        BusRuntimeBuilder::new(config)
    }

    /// Shared handle producers send through.
    pub fn commutator(&self) -> Arc<Commutator> {
        Arc::clone(&self.commutator)
    }

    /// Returns `true` while any destination thread is still running.
    ///
    /// A fatal runloop error halts the bus, after which every thread winds
    /// down and this turns `false`.
    pub fn is_running(&self) -> bool {
        self.threads.iter().any(|(_, handle)| !handle.is_finished())
    }

    /// Destination whose fatal error halted the bus.
    pub fn halted(&self) -> Option<Destination> {
        self.commutator.halted()
    }

    /// Closes every queue, joins every thread, and returns their stats.
    ///
    /// All threads are joined even when one failed; the first failure is
    /// returned.
    pub fn shutdown(mut self) -> RuntimeResult<Vec<RunloopStats>> {
        let discarded = self.commutator.close_all();
        debug!(discarded, "bus runtime shutting down");

        let mut stats = Vec::with_capacity(self.threads.len());
        let mut first_error = None;
        for (destination, handle) in self.threads.drain(..) {
            match handle.join() {
                Ok(Ok(loop_stats)) => stats.push(loop_stats),
                Ok(Err(err)) => {
                    error!(%destination, %err, "runloop failed");
                    first_error.get_or_insert(RuntimeError::Runloop(err));
                }
                Err(_) => {
                    error!(%destination, "runloop panicked");
                    first_error.get_or_insert(RuntimeError::Panicked(destination));
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }
}

impl Drop for BusRuntime {
    fn drop(&mut self) {
        if self.threads.is_empty() {
            return;
        }
        self.commutator.close_all();
        for (destination, handle) in self.threads.drain(..) {
            if handle.join().is_err() {
                error!(%destination, "runloop panicked during teardown");
            }
        }
    }
}
