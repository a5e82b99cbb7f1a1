#![deny(missing_docs)]
//! Message catalog shared by every thread of the map renderer.
//!
//! This crate defines the protocol boundary between the frontend, the
//! resource reader, and the render backend:
//! * [`Message`] – closed sum type with one variant per kind and its payload.
//! * [`MessageKind`] – fieldless tag used for routing, handler lookup, and
//!   singleton collapsing.
//! * [`MessagePriority`] – the three urgency tiers chosen at send time.
//! * [`Reply`] – one-shot answer slot carried by query messages.

mod kind;
mod message;
mod payload;
mod priority;
mod reply;

pub use kind::MessageKind;
pub use message::Message;
pub use payload::{
    CompassHeading, GeoPoint, GeometryBuffer, GpsFix, MapStyle, MarkLayer, MercatorRect,
    MyPositionMode, PoiId, RouteId, ScreenPoint, SelectedObject, SelectionKind, TileKey, UserMark,
    Viewport, Widget, WidgetPlacement,
};
pub use priority::MessagePriority;
pub use reply::Reply;
