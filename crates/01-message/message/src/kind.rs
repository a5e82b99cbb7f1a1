use serde::Serialize;

/// Discriminating tag of a [`crate::Message`].
///
/// Kinds drive routing, handler lookup, and singleton collapsing. `Unknown`
/// marks an uninitialised message and is never routed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MessageKind {
    /// Sentinel for uninitialised or malformed messages.
    #[default]
    Unknown,
    /// The reader began reading a tile.
    TileReadStarted,
    /// The reader finished reading a tile.
    TileReadEnded,
    /// The reader drained every requested tile.
    FinishReading,
    /// Prepared tile geometry is ready for upload.
    FlushTile,
    /// Shapes of a tile were decoded.
    MapShapeReaded,
    /// The viewport changed and the read manager must recompute tiles.
    UpdateReadManager,
    /// A mercator rectangle must be redrawn.
    InvalidateRect,
    /// Tiles under a rectangle must be read again.
    InvalidateReadManagerRect,
    /// Remove every mark of a layer.
    ClearUserMarkLayer,
    /// Show or hide a mark layer.
    ChangeUserMarkLayerVisibility,
    /// Replace the marks of a layer.
    UpdateUserMarkLayer,
    /// GUI geometry was rebuilt.
    GuiLayerRecached,
    /// Rebuild GUI geometry.
    GuiRecache,
    /// Reposition GUI widgets.
    GuiLayerLayout,
    /// Position marker geometry was built.
    MyPositionShape,
    /// Country information under the viewport changed.
    CountryInfoUpdate,
    /// Rebuild the country status widget.
    CountryStatusRecache,
    /// Stop producing frames.
    StopRendering,
    /// Switch the position marker follow mode.
    ChangeMyPositionMode,
    /// New compass reading.
    CompassInfo,
    /// New location fix.
    GpsInfo,
    /// Query the point of interest under a screen point.
    FindVisiblePoi,
    /// Highlight or clear the selected object.
    SelectObject,
    /// Query the selected object.
    GetSelectedObject,
    /// Query the last known position.
    GetMyPosition,
    /// Build geometry for a new route.
    AddRoute,
    /// Build a route start or finish sign.
    CacheRouteSign,
    /// Drop a route.
    RemoveRoute,
    /// Route geometry is ready for upload.
    FlushRoute,
    /// Route sign geometry is ready for upload.
    FlushRouteSign,
    /// Start following the active route.
    FollowRoute,
    /// Stop following the active route.
    DeactivateRouteFollowing,
    /// Switch the map style.
    UpdateMapStyle,
    /// Drop and rebuild textures.
    InvalidateTextures,
    /// Redraw everything.
    Invalidate,
    /// Toggle perspective mode.
    Enable3dMode,
}

impl MessageKind {
    /// Every routable kind, in declaration order. `Unknown` is excluded.
    pub const ALL: [MessageKind; 36] = [
        MessageKind::TileReadStarted,
        MessageKind::TileReadEnded,
        MessageKind::FinishReading,
        MessageKind::FlushTile,
        MessageKind::MapShapeReaded,
        MessageKind::UpdateReadManager,
        MessageKind::InvalidateRect,
        MessageKind::InvalidateReadManagerRect,
        MessageKind::ClearUserMarkLayer,
        MessageKind::ChangeUserMarkLayerVisibility,
        MessageKind::UpdateUserMarkLayer,
        MessageKind::GuiLayerRecached,
        MessageKind::GuiRecache,
        MessageKind::GuiLayerLayout,
        MessageKind::MyPositionShape,
        MessageKind::CountryInfoUpdate,
        MessageKind::CountryStatusRecache,
        MessageKind::StopRendering,
        MessageKind::ChangeMyPositionMode,
        MessageKind::CompassInfo,
        MessageKind::GpsInfo,
        MessageKind::FindVisiblePoi,
        MessageKind::SelectObject,
        MessageKind::GetSelectedObject,
        MessageKind::GetMyPosition,
        MessageKind::AddRoute,
        MessageKind::CacheRouteSign,
        MessageKind::RemoveRoute,
        MessageKind::FlushRoute,
        MessageKind::FlushRouteSign,
        MessageKind::FollowRoute,
        MessageKind::DeactivateRouteFollowing,
        MessageKind::UpdateMapStyle,
        MessageKind::InvalidateTextures,
        MessageKind::Invalidate,
        MessageKind::Enable3dMode,
    ];

    /// Returns `true` for every kind except the `Unknown` sentinel.
    pub fn is_known(self) -> bool {
        self != MessageKind::Unknown
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
