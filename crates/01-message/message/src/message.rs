use crate::payload::{
    CompassHeading, GeoPoint, GeometryBuffer, GpsFix, MapStyle, MarkLayer, MercatorRect,
    MyPositionMode, PoiId, RouteId, ScreenPoint, SelectedObject, TileKey, UserMark, Viewport,
    Widget, WidgetPlacement,
};
use crate::{MessageKind, Reply};

/// Unit of cross-thread work exchanged by the renderer threads.
///
/// A message is immutable once built. Ownership moves from the producer to the
/// destination queue and then to the handler, so payloads are never shared
/// between threads.
#[derive(Debug, Default)]
pub enum Message {
    /// Uninitialised message. Queues reject it.
    #[default]
    Unknown,
    /// The reader began reading `0`.
    TileReadStarted(TileKey),
    /// The reader finished reading `0`.
    TileReadEnded(TileKey),
    /// The reader drained every requested tile.
    FinishReading {
        /// Tiles read during the pass.
        tiles: Vec<TileKey>,
    },
    /// Prepared geometry for a tile.
    FlushTile {
        /// Tile the geometry belongs to.
        tile: TileKey,
        /// Vertex data.
        geometry: GeometryBuffer,
    },
    /// Decoded shapes of a tile.
    MapShapeReaded {
        /// Tile the shapes belong to.
        tile: TileKey,
        /// Number of decoded shapes.
        shape_count: u32,
    },
    /// Viewport changed; recompute the tile set.
    UpdateReadManager {
        /// New viewport.
        viewport: Viewport,
        /// Tiles the frontend wants visible.
        tiles: Vec<TileKey>,
    },
    /// Redraw a rectangle.
    InvalidateRect(MercatorRect),
    /// Read the tiles under a rectangle again.
    InvalidateReadManagerRect {
        /// Dirty rectangle.
        rect: MercatorRect,
        /// Tiles known to be dirty.
        tiles: Vec<TileKey>,
    },
    /// Remove every mark of a layer.
    ClearUserMarkLayer(MarkLayer),
    /// Show or hide a mark layer.
    ChangeUserMarkLayerVisibility {
        /// Target layer.
        layer: MarkLayer,
        /// New visibility.
        visible: bool,
    },
    /// Replace the marks of a layer.
    UpdateUserMarkLayer {
        /// Target layer.
        layer: MarkLayer,
        /// Marks to draw.
        marks: Vec<UserMark>,
    },
    /// Rebuilt GUI geometry.
    GuiLayerRecached {
        /// Vertex data.
        geometry: GeometryBuffer,
    },
    /// Rebuild GUI geometry for the given widgets.
    GuiRecache {
        /// Widgets to rebuild.
        widgets: Vec<Widget>,
    },
    /// Reposition GUI widgets.
    GuiLayerLayout {
        /// New anchors.
        placements: Vec<WidgetPlacement>,
    },
    /// Position marker geometry.
    MyPositionShape {
        /// Vertex data.
        geometry: GeometryBuffer,
    },
    /// Country under the viewport changed.
    CountryInfoUpdate {
        /// Country identifier.
        country_id: String,
        /// Whether the country contains the current position.
        is_current: bool,
    },
    /// Rebuild the country status widget.
    CountryStatusRecache,
    /// Stop producing frames.
    StopRendering,
    /// Switch the position marker follow mode.
    ChangeMyPositionMode(MyPositionMode),
    /// New compass reading.
    CompassInfo(CompassHeading),
    /// New location fix.
    GpsInfo(GpsFix),
    /// Find the point of interest under a screen point.
    FindVisiblePoi {
        /// Tap location.
        point: ScreenPoint,
        /// Answer slot.
        reply: Reply<Option<PoiId>>,
    },
    /// Highlight an object, or clear the highlight with `None`.
    SelectObject(Option<SelectedObject>),
    /// Ask for the selected object.
    GetSelectedObject {
        /// Answer slot.
        reply: Reply<Option<SelectedObject>>,
    },
    /// Ask for the last known position.
    GetMyPosition {
        /// Answer slot.
        reply: Reply<Option<GeoPoint>>,
    },
    /// Build geometry for a route.
    AddRoute {
        /// Route identifier.
        route: RouteId,
        /// Route polyline.
        polyline: Vec<GeoPoint>,
        /// RGBA color.
        color: u32,
    },
    /// Build a route start or finish sign.
    CacheRouteSign {
        /// Route identifier.
        route: RouteId,
        /// Where the sign stands.
        position: GeoPoint,
        /// `true` for the start sign, `false` for the finish sign.
        is_start: bool,
    },
    /// Drop a route.
    RemoveRoute {
        /// Route identifier.
        route: RouteId,
        /// Stop following as well.
        deactivate_following: bool,
    },
    /// Route geometry ready for upload.
    FlushRoute {
        /// Route identifier.
        route: RouteId,
        /// Vertex data.
        geometry: GeometryBuffer,
    },
    /// Route sign geometry ready for upload.
    FlushRouteSign {
        /// Route identifier.
        route: RouteId,
        /// Vertex data.
        geometry: GeometryBuffer,
    },
    /// Start following the active route.
    FollowRoute {
        /// Zoom to keep while following.
        preferred_zoom: u8,
    },
    /// Stop following the active route.
    DeactivateRouteFollowing,
    /// Switch the map style.
    UpdateMapStyle(MapStyle),
    /// Drop and rebuild textures.
    InvalidateTextures,
    /// Redraw everything.
    Invalidate,
    /// Toggle perspective mode.
    Enable3dMode {
        /// Whether perspective is on.
        enable: bool,
        /// Camera tilt in radians.
        rotation_angle: f64,
        /// Vertical field of view in radians.
        angle_fov: f64,
    },
}

impl Message {
    /// Returns the kind tag of the message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Unknown => MessageKind::Unknown,
            Message::TileReadStarted(_) => MessageKind::TileReadStarted,
            Message::TileReadEnded(_) => MessageKind::TileReadEnded,
            Message::FinishReading { .. } => MessageKind::FinishReading,
            Message::FlushTile { .. } => MessageKind::FlushTile,
            Message::MapShapeReaded { .. } => MessageKind::MapShapeReaded,
            Message::UpdateReadManager { .. } => MessageKind::UpdateReadManager,
            Message::InvalidateRect(_) => MessageKind::InvalidateRect,
            Message::InvalidateReadManagerRect { .. } => MessageKind::InvalidateReadManagerRect,
            Message::ClearUserMarkLayer(_) => MessageKind::ClearUserMarkLayer,
            Message::ChangeUserMarkLayerVisibility { .. } => {
                MessageKind::ChangeUserMarkLayerVisibility
            }
            Message::UpdateUserMarkLayer { .. } => MessageKind::UpdateUserMarkLayer,
            Message::GuiLayerRecached { .. } => MessageKind::GuiLayerRecached,
            Message::GuiRecache { .. } => MessageKind::GuiRecache,
            Message::GuiLayerLayout { .. } => MessageKind::GuiLayerLayout,
            Message::MyPositionShape { .. } => MessageKind::MyPositionShape,
            Message::CountryInfoUpdate { .. } => MessageKind::CountryInfoUpdate,
            Message::CountryStatusRecache => MessageKind::CountryStatusRecache,
            Message::StopRendering => MessageKind::StopRendering,
            Message::ChangeMyPositionMode(_) => MessageKind::ChangeMyPositionMode,
            Message::CompassInfo(_) => MessageKind::CompassInfo,
            Message::GpsInfo(_) => MessageKind::GpsInfo,
            Message::FindVisiblePoi { .. } => MessageKind::FindVisiblePoi,
            Message::SelectObject(_) => MessageKind::SelectObject,
            Message::GetSelectedObject { .. } => MessageKind::GetSelectedObject,
            Message::GetMyPosition { .. } => MessageKind::GetMyPosition,
            Message::AddRoute { .. } => MessageKind::AddRoute,
            Message::CacheRouteSign { .. } => MessageKind::CacheRouteSign,
            Message::RemoveRoute { .. } => MessageKind::RemoveRoute,
            Message::FlushRoute { .. } => MessageKind::FlushRoute,
            Message::FlushRouteSign { .. } => MessageKind::FlushRouteSign,
            Message::FollowRoute { .. } => MessageKind::FollowRoute,
            Message::DeactivateRouteFollowing => MessageKind::DeactivateRouteFollowing,
            Message::UpdateMapStyle(_) => MessageKind::UpdateMapStyle,
            Message::InvalidateTextures => MessageKind::InvalidateTextures,
            Message::Invalidate => MessageKind::Invalidate,
            Message::Enable3dMode { .. } => MessageKind::Enable3dMode,
        }
    }
}
