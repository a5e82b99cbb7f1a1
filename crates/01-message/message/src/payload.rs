//! Payload shapes carried by [`crate::Message`] variants.
//!
//! The bus never inspects these; they exist so collaborators share one
//! vocabulary for tiles, rectangles, marks, routes, and positions.

/// Address of a map tile in the quad-tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
    /// Zoom level.
    pub zoom: u8,
}

impl TileKey {
    /// Creates a tile key.
    pub const fn new(x: i32, y: i32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }
}

/// Axis-aligned rectangle in mercator coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MercatorRect {
    /// Left edge.
    pub min_x: f64,
    /// Bottom edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Top edge.
    pub max_y: f64,
}

impl MercatorRect {
    /// Creates a rectangle from its corners.
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns `true` when the rectangles overlap.
    pub fn intersects(&self, other: &MercatorRect) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// Visible region and zoom handed to the read manager.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Visible rectangle.
    pub rect: MercatorRect,
    /// Current zoom level.
    pub zoom: u8,
}

/// Geographic position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Position on screen in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

/// Prepared vertex data produced off the render thread.
///
/// Bytes are opaque to the bus; the render backend owns their layout. The
/// buffer is uniquely owned, so handing it to another thread moves the bytes
/// with it.
#[derive(Debug, PartialEq, Eq)]
pub struct GeometryBuffer {
    /// Raw vertex bytes.
    pub bytes: Box<[u8]>,
}

impl GeometryBuffer {
    /// Takes ownership of raw vertex bytes.
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

/// User mark layers drawn above the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkLayer {
    /// Marks placed through the public API.
    Api,
    /// Search results.
    Search,
    /// Bookmarks of the given category.
    Bookmarks(u32),
}

/// A single user mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UserMark {
    /// Stable mark identifier.
    pub id: u64,
    /// Where the mark sits.
    pub position: GeoPoint,
}

/// Screen widgets recached by the GUI layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Widget {
    /// North arrow.
    Compass,
    /// Scale ruler.
    Ruler,
    /// Data attribution label.
    Copyright,
    /// Download prompt for the country under the viewport.
    CountryStatus,
}

/// Where a widget is anchored after layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidgetPlacement {
    /// Widget being placed.
    pub widget: Widget,
    /// Anchor on screen.
    pub anchor: ScreenPoint,
}

/// Follow mode of the position marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MyPositionMode {
    /// Waiting for the first fix.
    #[default]
    PendingPosition,
    /// Marker shown, camera free.
    NotFollow,
    /// Camera follows the marker.
    Follow,
    /// Camera follows and rotates with the heading.
    FollowAndRotate,
}

/// Compass reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompassHeading {
    /// Bearing in radians, clockwise from north.
    pub bearing: f64,
    /// Sample time in milliseconds since the epoch.
    pub timestamp_ms: u64,
}

/// Location fix from the positioning provider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GpsFix {
    /// Reported position.
    pub position: GeoPoint,
    /// Horizontal accuracy in meters.
    pub accuracy_m: f32,
    /// Direction of travel in degrees, when known.
    pub bearing: Option<f32>,
    /// Sample time in milliseconds since the epoch.
    pub timestamp_ms: u64,
}

/// Identifier of a point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoiId(pub u64);

/// Category of a selected object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionKind {
    /// A map feature.
    Poi,
    /// A user mark.
    UserMark,
    /// The position marker.
    MyPosition,
}

/// Object currently highlighted on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectedObject {
    /// What is selected.
    pub kind: SelectionKind,
    /// Where it is.
    pub position: GeoPoint,
}

/// Identifier of a route drawn on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RouteId(pub u32);

/// Map style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapStyle {
    /// Daytime style.
    #[default]
    Clear,
    /// Night style.
    Dark,
    /// Driving style.
    Vehicle,
}
