#![deny(missing_docs)]
//! Routing of messages to destination threads.
//!
//! The [`Commutator`] owns an explicit table from [`Destination`] to its
//! [`message_queue::MessageQueue`]; nothing here is process-global, so tests
//! can build as many independent buses as they like. Kinds are mapped to
//! destinations by a [`RoutingTable`].

mod commutator;
mod destination;
mod error;
mod routing;

pub use commutator::{Commutator, Delivery};
pub use destination::Destination;
pub use error::{RouteError, RouteResult};
pub use routing::{Routes, RoutingTable};
