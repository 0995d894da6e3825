//! Host-map capability boundary.
//!
//! The renderer never talks to a concrete map widget. Everything it needs
//! from the host — viewport size, zoom, the two coordinate transforms, the
//! overlay pane, and event subscriptions — is expressed by the [`HostMap`]
//! trait, so the overlay can be driven by any interactive map and tested
//! against [`stub::StubMap`].
//!
//! Notification flow: the overlay subscribes itself (by [`OverlayId`]) for
//! the [`MapEventKind`]s it cares about during `on_add`. The host delivers
//! a notification by calling `Graticule::handle_event` for each subscribed
//! overlay, synchronously, one at a time.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geo::{LatLng, ScreenPoint, SurfaceSize};

/// Host-map notifications the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    /// The view is panning (fires continuously during a drag).
    Move,
    /// The view was reset: zoom change or viewport resize.
    ViewReset,
    /// A pan or zoom interaction finished.
    MoveEnd,
}

/// All notification kinds, in delivery order.
pub const ALL_MAP_EVENTS: [MapEventKind; 3] = [
    MapEventKind::Move,
    MapEventKind::ViewReset,
    MapEventKind::MoveEnd,
];

/// Identity of one overlay instance, used for pane ordering and event
/// subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// The host map's overlay pane: an ordered stack of attached overlays.
///
/// Later entries draw on top of earlier ones, so appending an id moves it
/// front-most and inserting it first moves it back-most — the same
/// semantics a DOM overlay pane gives `appendChild`/`insertBefore`.
#[derive(Debug, Default)]
pub struct OverlayPane {
    stack: Vec<OverlayId>,
}

impl OverlayPane {
    /// Create an empty pane.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an overlay, making it front-most. An id already in the pane
    /// is moved rather than duplicated.
    pub fn append(&mut self, id: OverlayId) {
        self.remove(id);
        self.stack.push(id);
    }

    /// Insert an overlay at the back of the stack.
    pub fn insert_first(&mut self, id: OverlayId) {
        self.remove(id);
        self.stack.insert(0, id);
    }

    /// Remove an overlay from the pane. Returns whether it was present.
    pub fn remove(&mut self, id: OverlayId) -> bool {
        let before = self.stack.len();
        self.stack.retain(|other| *other != id);
        self.stack.len() != before
    }

    /// Whether an overlay is attached to this pane.
    pub fn contains(&self, id: OverlayId) -> bool {
        self.stack.contains(&id)
    }

    /// The current stacking order, back-most first.
    pub fn stacking_order(&self) -> &[OverlayId] {
        &self.stack
    }

    /// Number of attached overlays.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the pane is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// The capabilities the renderer requires from a host map.
///
/// Implementations must keep the two coordinate transforms mutually
/// consistent for points inside the viewport; the renderer calls them for
/// every traced sample and performs no caching of its own.
pub trait HostMap {
    /// Current viewport size in pixels.
    fn size(&self) -> SurfaceSize;

    /// Current zoom level (may be fractional).
    fn zoom(&self) -> f64;

    /// Convert a container-pixel point to a geographic coordinate.
    fn container_point_to_lat_lng(&self, point: ScreenPoint) -> LatLng;

    /// Convert a geographic coordinate to a container-pixel point.
    fn lat_lng_to_container_point(&self, coord: LatLng) -> ScreenPoint;

    /// Convert a container-pixel point to the layer coordinate space the
    /// overlay pane is positioned in (tracks the accumulated pan offset).
    fn container_point_to_layer_point(&self, point: ScreenPoint) -> ScreenPoint;

    /// The overlay pane overlays attach their surfaces to.
    fn pane_mut(&mut self) -> &mut OverlayPane;

    /// Subscribe an overlay to a set of notifications.
    fn subscribe(&mut self, overlay: OverlayId, events: &[MapEventKind]);

    /// Drop every subscription held by an overlay.
    fn unsubscribe(&mut self, overlay: OverlayId);
}

pub mod stub {
    //! A deterministic host map for tests.
    //!
    //! [`StubMap`] implements [`HostMap`] with an equirectangular
    //! projection: pixels map linearly to degrees at `256 * 2^zoom / 360`
    //! pixels per degree. An optional view rotation makes the projection
    //! non-axis-aligned, which is enough to exercise the curved-mode code
    //! paths that only matter when grid lines are not screen-parallel.

    use std::collections::HashMap;

    use crate::geo::{wrap_longitude, LatLng, ScreenPoint, SurfaceSize};

    use super::{HostMap, MapEventKind, OverlayId, OverlayPane};

    /// Pixels per world tile, the usual web-map convention.
    const TILE_SIZE: f64 = 256.0;

    /// An equirectangular stub map.
    #[derive(Debug)]
    pub struct StubMap {
        size: SurfaceSize,
        center: LatLng,
        zoom: f64,
        rotation_deg: f64,
        layer_offset: ScreenPoint,
        pane: OverlayPane,
        subscriptions: HashMap<OverlayId, Vec<MapEventKind>>,
    }

    impl StubMap {
        /// Create a stub map with the given viewport, center and zoom.
        pub fn new(size: SurfaceSize, center: LatLng, zoom: f64) -> Self {
            Self {
                size,
                center,
                zoom,
                rotation_deg: 0.0,
                layer_offset: ScreenPoint::ZERO,
                pane: OverlayPane::new(),
                subscriptions: HashMap::new(),
            }
        }

        /// Rotate the view by the given angle, making grid lines diagonal
        /// on screen.
        pub fn with_rotation(mut self, degrees: f64) -> Self {
            self.rotation_deg = degrees;
            self
        }

        /// Pixels per degree at the current zoom.
        pub fn scale(&self) -> f64 {
            TILE_SIZE * 2f64.powf(self.zoom) / 360.0
        }

        /// Change the zoom level.
        pub fn set_zoom(&mut self, zoom: f64) {
            self.zoom = zoom;
        }

        /// Re-center the view.
        pub fn set_center(&mut self, center: LatLng) {
            self.center = center;
        }

        /// Resize the viewport.
        pub fn set_size(&mut self, size: SurfaceSize) {
            self.size = size;
        }

        /// Pan by a geographic delta, accumulating the layer offset the
        /// way a real map shifts its overlay pane.
        pub fn pan_by(&mut self, dlat: f64, dlng: f64) {
            let s = self.scale();
            self.center = LatLng::new(self.center.lat + dlat, self.center.lng + dlng);
            self.layer_offset = ScreenPoint::new(
                self.layer_offset.x + dlng * s,
                self.layer_offset.y - dlat * s,
            );
        }

        /// Read-only view of the pane for assertions.
        pub fn pane(&self) -> &OverlayPane {
            &self.pane
        }

        /// Whether an overlay currently subscribes to an event kind.
        pub fn is_subscribed(&self, overlay: OverlayId, event: MapEventKind) -> bool {
            self.subscriptions
                .get(&overlay)
                .is_some_and(|events| events.contains(&event))
        }

        /// Number of overlays holding any subscription.
        pub fn subscriber_count(&self) -> usize {
            self.subscriptions.len()
        }

        fn rotation(&self) -> (f64, f64) {
            let r = self.rotation_deg.to_radians();
            (r.sin(), r.cos())
        }
    }

    impl HostMap for StubMap {
        fn size(&self) -> SurfaceSize {
            self.size
        }

        fn zoom(&self) -> f64 {
            self.zoom
        }

        fn container_point_to_lat_lng(&self, point: ScreenPoint) -> LatLng {
            let s = self.scale();
            let (sin, cos) = self.rotation();
            let dx = point.x - self.size.width_f64() / 2.0;
            let dy = point.y - self.size.height_f64() / 2.0;
            // Inverse rotation back into the axis-aligned frame.
            let rx = dx * cos + dy * sin;
            let ry = -dx * sin + dy * cos;
            LatLng::new(
                self.center.lat - ry / s,
                wrap_longitude(self.center.lng + rx / s),
            )
        }

        fn lat_lng_to_container_point(&self, coord: LatLng) -> ScreenPoint {
            let s = self.scale();
            let (sin, cos) = self.rotation();
            let rx = (coord.lng - self.center.lng) * s;
            let ry = -(coord.lat - self.center.lat) * s;
            let dx = rx * cos - ry * sin;
            let dy = rx * sin + ry * cos;
            ScreenPoint::new(
                self.size.width_f64() / 2.0 + dx,
                self.size.height_f64() / 2.0 + dy,
            )
        }

        fn container_point_to_layer_point(&self, point: ScreenPoint) -> ScreenPoint {
            ScreenPoint::new(
                point.x + self.layer_offset.x,
                point.y + self.layer_offset.y,
            )
        }

        fn pane_mut(&mut self) -> &mut OverlayPane {
            &mut self.pane
        }

        fn subscribe(&mut self, overlay: OverlayId, events: &[MapEventKind]) {
            let entry = self.subscriptions.entry(overlay).or_default();
            for event in events {
                if !entry.contains(event) {
                    entry.push(*event);
                }
            }
        }

        fn unsubscribe(&mut self, overlay: OverlayId) {
            self.subscriptions.remove(&overlay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubMap;
    use super::*;
    use crate::geo::{LatLng, ScreenPoint, SurfaceSize};

    mod overlay_pane {
        use super::*;

        #[test]
        fn test_append_moves_to_front() {
            let mut pane = OverlayPane::new();
            let (a, b) = (OverlayId::next(), OverlayId::next());
            pane.append(a);
            pane.append(b);
            pane.append(a);
            assert_eq!(pane.stacking_order(), &[b, a]);
            assert_eq!(pane.len(), 2);
        }

        #[test]
        fn test_insert_first_moves_to_back() {
            let mut pane = OverlayPane::new();
            let (a, b) = (OverlayId::next(), OverlayId::next());
            pane.append(a);
            pane.append(b);
            pane.insert_first(b);
            assert_eq!(pane.stacking_order(), &[b, a]);
        }

        #[test]
        fn test_remove() {
            let mut pane = OverlayPane::new();
            let a = OverlayId::next();
            pane.append(a);
            assert!(pane.remove(a));
            assert!(!pane.remove(a));
            assert!(pane.is_empty());
        }
    }

    mod overlay_id {
        use super::*;

        #[test]
        fn test_ids_are_unique() {
            let a = OverlayId::next();
            let b = OverlayId::next();
            assert_ne!(a, b);
        }
    }

    mod stub_map {
        use super::*;

        fn map() -> StubMap {
            StubMap::new(SurfaceSize::new(800, 600), LatLng::new(46.0, 2.5), 6.0)
        }

        #[test]
        fn test_center_round_trips() {
            let map = map();
            let center_px = ScreenPoint::new(400.0, 300.0);
            let geo = map.container_point_to_lat_lng(center_px);
            assert!((geo.lat - 46.0).abs() < 1e-9);
            assert!((geo.lng - 2.5).abs() < 1e-9);
            let back = map.lat_lng_to_container_point(geo);
            assert!((back.x - 400.0).abs() < 1e-9);
            assert!((back.y - 300.0).abs() < 1e-9);
        }

        #[test]
        fn test_north_is_up() {
            let map = map();
            let top = map.container_point_to_lat_lng(ScreenPoint::new(400.0, 0.0));
            let bottom = map.container_point_to_lat_lng(ScreenPoint::new(400.0, 600.0));
            assert!(top.lat > bottom.lat);
        }

        #[test]
        fn test_longitude_wraps_across_antimeridian() {
            let map = StubMap::new(SurfaceSize::new(800, 600), LatLng::new(0.0, 179.0), 5.0);
            let left = map.container_point_to_lat_lng(ScreenPoint::new(0.0, 300.0));
            let right = map.container_point_to_lat_lng(ScreenPoint::new(800.0, 300.0));
            assert!(left.lng > 0.0, "west edge should stay east-positive");
            assert!(right.lng < 0.0, "east edge should wrap negative");
        }

        #[test]
        fn test_rotation_round_trips() {
            let map = map().with_rotation(30.0);
            let geo = LatLng::new(47.0, 3.0);
            let px = map.lat_lng_to_container_point(geo);
            let back = map.container_point_to_lat_lng(px);
            assert!((back.lat - geo.lat).abs() < 1e-9);
            assert!((back.lng - geo.lng).abs() < 1e-9);
        }

        #[test]
        fn test_pan_accumulates_layer_offset() {
            let mut map = map();
            map.pan_by(0.0, 1.0);
            let origin = map.container_point_to_layer_point(ScreenPoint::ZERO);
            assert!(origin.x > 0.0);
            assert_eq!(origin.y, 0.0);
        }

        #[test]
        fn test_subscriptions() {
            let mut map = map();
            let id = OverlayId::next();
            map.subscribe(id, &ALL_MAP_EVENTS);
            assert!(map.is_subscribed(id, MapEventKind::Move));
            assert!(map.is_subscribed(id, MapEventKind::MoveEnd));
            map.unsubscribe(id);
            assert!(!map.is_subscribed(id, MapEventKind::Move));
            assert_eq!(map.subscriber_count(), 0);
        }
    }
}
