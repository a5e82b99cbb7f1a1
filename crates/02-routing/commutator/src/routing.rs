use std::collections::HashMap;

use drape_message::MessageKind;
use smallvec::SmallVec;

use crate::Destination;

/// Destinations a kind is delivered to. Three inline slots cover every thread.
pub type Routes = SmallVec<[Destination; 3]>;

/// Static mapping from message kind to destination threads.
#[derive(Clone, Debug)]
pub struct RoutingTable {
    routes: HashMap<MessageKind, Routes>,
}

impl RoutingTable {
    /// Table without any routes.
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Adds `destination` to the routes of `kind`. Repeated pairs are ignored.
    pub fn route(mut self, kind: MessageKind, destination: Destination) -> Self {
        self.add(kind, destination);
        self
    }

    /// Routes every kind in `kinds` to `destination`.
    pub fn route_all(mut self, kinds: &[MessageKind], destination: Destination) -> Self {
        for kind in kinds {
            self.add(*kind, destination);
        }
        self
    }

    fn add(&mut self, kind: MessageKind, destination: Destination) {
        let entry = self.routes.entry(kind).or_default();
        if !entry.contains(&destination) {
            entry.push(destination);
            entry.sort_unstable();
        }
    }

    /// Destinations for `kind`; empty when the kind is not routed.
    pub fn destinations(&self, kind: MessageKind) -> &[Destination] {
        self.routes.get(&kind).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Kinds routed to `destination`.
    pub fn kinds_for(&self, destination: Destination) -> Vec<MessageKind> {
        let mut kinds: Vec<MessageKind> = self
            .routes
            .iter()
            .filter(|(_, routes)| routes.contains(&destination))
            .map(|(kind, _)| *kind)
            .collect();
        kinds.sort_unstable();
        kinds
    }
}

impl Default for RoutingTable {
    /// Standard wiring of the three renderer threads.
    fn default() -> Self {
        use Destination::*;
        use MessageKind::*;

        RoutingTable::empty()
            .route_all(
                &[
                    UpdateReadManager,
                    InvalidateReadManagerRect,
                    GuiRecache,
                    GuiLayerLayout,
                    CountryStatusRecache,
                    UpdateUserMarkLayer,
                    AddRoute,
                    CacheRouteSign,
                    FinishReading,
                ],
                ResourceReader,
            )
            .route_all(
                &[
                    TileReadStarted,
                    TileReadEnded,
                    FlushTile,
                    MapShapeReaded,
                    InvalidateRect,
                    ClearUserMarkLayer,
                    ChangeUserMarkLayerVisibility,
                    GuiLayerRecached,
                    MyPositionShape,
                    ChangeMyPositionMode,
                    CompassInfo,
                    GpsInfo,
                    FindVisiblePoi,
                    SelectObject,
                    GetSelectedObject,
                    GetMyPosition,
                    RemoveRoute,
                    FlushRoute,
                    FlushRouteSign,
                    FollowRoute,
                    DeactivateRouteFollowing,
                    Enable3dMode,
                ],
                RenderBackend,
            )
            .route(CountryInfoUpdate, Frontend)
            .route_all(&[UpdateMapStyle, InvalidateTextures], ResourceReader)
            .route_all(&[UpdateMapStyle, InvalidateTextures], RenderBackend)
            .route_all(&[Invalidate, StopRendering], Frontend)
            .route_all(&[Invalidate, StopRendering], ResourceReader)
            .route_all(&[Invalidate, StopRendering], RenderBackend)
    }
}
