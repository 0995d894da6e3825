//! The graticule overlay lifecycle.
//!
//! [`Graticule`] is a two-state machine. Detached (the initial and
//! terminal state) holds only configuration; Attached additionally owns
//! the drawing surface and the per-attachment runtime state. `on_add`
//! moves Detached → Attached, `on_remove` moves back and drops every
//! resource the attachment created.
//!
//! Redraw flow: a host notification lands in [`Graticule::handle_event`],
//! which runs a full [`reset`](Graticule::reset) — reposition and resize
//! the surface, recompute the padded bounds, re-resolve the per-axis
//! intervals if the zoom changed, then clear and repaint everything. No
//! incremental state survives between redraws.

use tracing::{debug, info, trace};

use crate::bounds::ViewportBounds;
use crate::error::GraticuleError;
use crate::format::{format_latitude, format_longitude, CoordinateFormatter, DegreeFormatter};
use crate::geo::{Axis, ScreenPoint};
use crate::host::{HostMap, MapEventKind, OverlayId, ALL_MAP_EVENTS};
use crate::labels::{
    place_curved_meridian, place_curved_parallel, place_straight_meridian,
    place_straight_parallel,
};
use crate::surface::Surface;
use crate::tracer::{ticks, trace_meridian, trace_parallel};

use super::config::GraticuleOptions;
use super::frame::{Frame, GridLine};

/// Runtime state owned by one attachment, discarded on `on_remove`.
struct AttachedState {
    /// The overlay's drawing surface, kept at viewport size.
    surface: Surface,
    /// Zoom level the cached intervals were resolved for.
    current_zoom: Option<f64>,
    /// Tick spacing for parallels; `0` skips the axis.
    lat_interval: f64,
    /// Tick spacing for meridians; `0` skips the axis.
    lng_interval: f64,
    /// Last computed padded bounds.
    bounds: Option<ViewportBounds>,
}

/// A latitude/longitude graticule overlay.
pub struct Graticule {
    id: OverlayId,
    options: GraticuleOptions,
    formatter: Box<dyn CoordinateFormatter>,
    state: Option<AttachedState>,
}

impl Graticule {
    /// Create an overlay with the stock degree formatter.
    ///
    /// # Errors
    ///
    /// Returns an error when the options fail validation (see
    /// [`GraticuleOptions::validate`]).
    pub fn new(options: GraticuleOptions) -> Result<Self, GraticuleError> {
        let formatter = Box::new(DegreeFormatter::new(options.pattern));
        Self::with_formatter(options, formatter)
    }

    /// Create an overlay with a custom coordinate formatter.
    ///
    /// # Errors
    ///
    /// Returns an error when the options fail validation.
    pub fn with_formatter(
        options: GraticuleOptions,
        formatter: Box<dyn CoordinateFormatter>,
    ) -> Result<Self, GraticuleError> {
        options.validate()?;
        Ok(Self {
            id: OverlayId::next(),
            options,
            formatter,
            state: None,
        })
    }

    /// This overlay's identity in panes and subscriptions.
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// The immutable configuration.
    pub fn options(&self) -> &GraticuleOptions {
        &self.options
    }

    /// Whether the overlay is currently attached to a host map.
    pub fn is_attached(&self) -> bool {
        self.state.is_some()
    }

    /// The drawing surface, while attached.
    pub fn surface(&self) -> Option<&Surface> {
        self.state.as_ref().map(|state| &state.surface)
    }

    /// The cached `(latitude, longitude)` intervals, while attached.
    pub fn intervals(&self) -> Option<(f64, f64)> {
        self.state
            .as_ref()
            .map(|state| (state.lat_interval, state.lng_interval))
    }

    /// The last computed padded bounds, while attached.
    pub fn bounds(&self) -> Option<ViewportBounds> {
        self.state.as_ref().and_then(|state| state.bounds)
    }

    /// The attribution string reported through the layer interface.
    pub fn attribution(&self) -> Option<&str> {
        self.options.attribution.as_deref()
    }

    /// Attach to a host map: create the surface, join the overlay pane,
    /// subscribe to notifications and perform the first redraw.
    ///
    /// Calling `on_add` while already attached is ignored.
    pub fn on_add<M: HostMap + ?Sized>(&mut self, map: &mut M) {
        if self.state.is_some() {
            debug!("{} already attached, ignoring on_add", self.id);
            return;
        }

        let mut surface = Surface::new(self.id, map.size());
        surface.set_opacity(self.options.opacity);
        self.state = Some(AttachedState {
            surface,
            current_zoom: None,
            lat_interval: 0.0,
            lng_interval: 0.0,
            bounds: None,
        });

        map.pane_mut().append(self.id);
        map.subscribe(self.id, &ALL_MAP_EVENTS);
        info!("{} attached to host map", self.id);

        self.reset(map);
    }

    /// Detach from the host map, releasing every subscription and the
    /// drawing surface. A detached overlay ignores further notifications.
    pub fn on_remove<M: HostMap + ?Sized>(&mut self, map: &mut M) {
        if self.state.is_none() {
            debug!("{} not attached, ignoring on_remove", self.id);
            return;
        }

        map.unsubscribe(self.id);
        map.pane_mut().remove(self.id);
        self.state = None;
        info!("{} detached from host map", self.id);
    }

    /// React to a host-map notification with a full redraw.
    pub fn handle_event<M: HostMap + ?Sized>(&mut self, map: &M, event: MapEventKind) {
        if self.state.is_none() {
            trace!("{} ignoring {:?} while detached", self.id, event);
            return;
        }
        self.reset(map);
    }

    /// Re-sync with the host map and redraw.
    ///
    /// Recomputes the surface position and size, the padded bounds and —
    /// only when the zoom level changed — the per-axis tick intervals,
    /// then runs [`draw`](Self::draw).
    pub fn reset<M: HostMap + ?Sized>(&mut self, map: &M) {
        if self.state.is_none() {
            return;
        }

        let size = map.size();
        let origin = map.container_point_to_layer_point(ScreenPoint::ZERO);
        let zoom = map.zoom();
        let bounds = ViewportBounds::compute(map, self.options.padding_fraction);

        let lat_table = self.options.lat_table();
        let lng_table = self.options.lng_table();
        if let Some(state) = self.state.as_mut() {
            state.surface.set_origin(origin);
            state.surface.resize(size);
            if state.current_zoom != Some(zoom) {
                state.lat_interval = lat_table.resolve(zoom);
                state.lng_interval = lng_table.resolve(zoom);
                state.current_zoom = Some(zoom);
                debug!(
                    "Resolved graticule intervals at zoom {}: lat={}°, lng={}°",
                    zoom, state.lat_interval, state.lng_interval
                );
            }
            state.bounds = Some(bounds);
        }

        self.draw(map);
    }

    /// Clear the surface and repaint the current frame.
    ///
    /// An axis whose interval resolved to `0` is skipped silently; labels
    /// are painted only when `show_label` is set and the font can
    /// rasterize.
    pub fn draw<M: HostMap + ?Sized>(&mut self, map: &M) {
        let Some(frame) = self.frame(map) else {
            return;
        };

        let color = self.options.color;
        let weight = self.options.weight;
        let label_color = self.options.label_color();
        let paint_labels = self.options.show_label && self.options.font.can_rasterize();

        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.surface.clear();
        for line in &frame.lines {
            state.surface.stroke_polyline(&line.points, color, weight);
        }
        if paint_labels {
            for label in &frame.labels {
                state
                    .surface
                    .fill_text(&label.text, label.position, &self.options.font, label_color);
            }
        }
        trace!(
            "{} redrawn: {} lines, {} labels",
            self.id,
            frame.lines.len(),
            frame.labels.len()
        );
    }

    /// Build the geometry of the current redraw without painting it.
    ///
    /// Returns `None` while detached or before the first `reset`.
    pub fn frame<M: HostMap + ?Sized>(&self, map: &M) -> Option<Frame> {
        let state = self.state.as_ref()?;
        let bounds = state.bounds?;
        let size = map.size();
        let mut frame = Frame::default();

        if state.lat_interval > 0.0 {
            for tick in ticks(bounds.south, bounds.north, state.lat_interval) {
                let points = trace_parallel(map, tick, &bounds, self.options.lat_curve);
                if self.options.show_label {
                    let text = format_latitude(self.formatter.as_ref(), tick);
                    let metrics = self.options.font.measure(&text);
                    let labels = if self.options.lat_curve.is_curved() {
                        place_curved_parallel(&points, &text, &metrics, size)
                    } else {
                        place_straight_parallel(&points, &text, &metrics, size)
                    };
                    frame.labels.extend(labels);
                }
                frame.lines.push(GridLine {
                    axis: Axis::Latitude,
                    tick,
                    points,
                });
            }
        }

        if state.lng_interval > 0.0 {
            for tick in ticks(bounds.west, bounds.east, state.lng_interval) {
                let points = trace_meridian(
                    map,
                    tick,
                    &bounds,
                    self.options.lng_curve,
                    self.options.lat_curve,
                );
                if self.options.show_label {
                    let text = format_longitude(self.formatter.as_ref(), tick);
                    let metrics = self.options.font.measure(&text);
                    let labels = if self.options.lng_curve.is_curved() {
                        place_curved_meridian(&points, &text, &metrics, size)
                    } else {
                        place_straight_meridian(&points, &text, &metrics, size)
                    };
                    frame.labels.extend(labels);
                }
                frame.lines.push(GridLine {
                    axis: Axis::Longitude,
                    tick,
                    points,
                });
            }
        }

        Some(frame)
    }

    /// Set the surface's composite opacity. No-op while detached; never
    /// affects traced geometry.
    pub fn set_opacity(&mut self, opacity: f32) {
        if let Some(state) = self.state.as_mut() {
            state.surface.set_opacity(opacity);
        }
    }

    /// The surface's current composite opacity, while attached.
    pub fn opacity(&self) -> Option<f32> {
        self.state.as_ref().map(|state| state.surface.opacity())
    }

    /// Move this overlay front-most in the pane. No-op while detached.
    pub fn bring_to_front<M: HostMap + ?Sized>(&self, map: &mut M) {
        if self.state.is_some() {
            map.pane_mut().append(self.id);
        }
    }

    /// Move this overlay back-most in the pane. No-op while detached.
    pub fn bring_to_back<M: HostMap + ?Sized>(&self, map: &mut M) {
        if self.state.is_some() {
            map.pane_mut().insert_first(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{LatLng, SurfaceSize};
    use crate::host::stub::StubMap;
    use crate::interval::ZoomIntervalTable;
    use crate::tracer::CurveMode;

    fn map_at(zoom: f64) -> StubMap {
        StubMap::new(SurfaceSize::new(400, 300), LatLng::new(46.0, 2.5), zoom)
    }

    fn attached(zoom: f64) -> (Graticule, StubMap) {
        let mut map = map_at(zoom);
        let mut overlay = Graticule::new(GraticuleOptions::default()).unwrap();
        overlay.on_add(&mut map);
        (overlay, map)
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn test_on_add_attaches_and_draws() {
            let (overlay, map) = attached(5.0);
            assert!(overlay.is_attached());
            assert!(map.pane().contains(overlay.id()));
            assert!(map.is_subscribed(overlay.id(), MapEventKind::Move));
            assert!(map.is_subscribed(overlay.id(), MapEventKind::ViewReset));
            assert!(map.is_subscribed(overlay.id(), MapEventKind::MoveEnd));
            assert_eq!(
                overlay.surface().unwrap().size(),
                SurfaceSize::new(400, 300)
            );
            assert!(overlay.frame(&map).is_some());
        }

        #[test]
        fn test_double_on_add_is_ignored() {
            let (mut overlay, mut map) = attached(5.0);
            overlay.on_add(&mut map);
            assert_eq!(map.pane().len(), 1);
            assert_eq!(map.subscriber_count(), 1);
        }

        #[test]
        fn test_on_remove_releases_everything() {
            let (mut overlay, mut map) = attached(5.0);
            overlay.on_remove(&mut map);
            assert!(!overlay.is_attached());
            assert!(map.pane().is_empty());
            assert_eq!(map.subscriber_count(), 0);
            assert!(overlay.surface().is_none());
            assert!(overlay.frame(&map).is_none());
        }

        #[test]
        fn test_notifications_after_remove_do_not_redraw() {
            let (mut overlay, mut map) = attached(5.0);
            overlay.on_remove(&mut map);
            // The host no longer delivers, but even a stray call is inert.
            overlay.handle_event(&map, MapEventKind::Move);
            assert!(overlay.frame(&map).is_none());
        }

        #[test]
        fn test_detached_accessors_are_defensive() {
            let mut overlay = Graticule::new(GraticuleOptions::default()).unwrap();
            let mut map = map_at(5.0);
            overlay.set_opacity(0.5);
            overlay.bring_to_front(&mut map);
            overlay.bring_to_back(&mut map);
            assert!(overlay.opacity().is_none());
            assert!(map.pane().is_empty());
        }
    }

    mod intervals {
        use super::*;

        #[test]
        fn test_default_table_resolves_5_degrees_at_zoom_5() {
            let (overlay, _map) = attached(5.0);
            assert_eq!(overlay.intervals(), Some((5.0, 5.0)));
        }

        #[test]
        fn test_zoom_change_re_resolves_intervals() {
            let (mut overlay, mut map) = attached(5.0);
            map.set_zoom(8.0);
            overlay.handle_event(&map, MapEventKind::ViewReset);
            assert_eq!(overlay.intervals(), Some((1.0, 1.0)));
        }

        #[test]
        fn test_same_zoom_keeps_cached_intervals() {
            let (mut overlay, mut map) = attached(5.0);
            map.pan_by(0.5, 0.5);
            overlay.handle_event(&map, MapEventKind::Move);
            assert_eq!(overlay.intervals(), Some((5.0, 5.0)));
        }

        #[test]
        fn test_unresolved_axis_is_skipped() {
            let empty = ZoomIntervalTable::new(Vec::new());
            let options = GraticuleOptions::default().with_longitude_interval(empty);
            let mut overlay = Graticule::new(options).unwrap();
            let mut map = map_at(5.0);
            overlay.on_add(&mut map);

            let frame = overlay.frame(&map).unwrap();
            assert!(frame.lines_on(Axis::Latitude).count() > 0);
            assert_eq!(frame.lines_on(Axis::Longitude).count(), 0);
        }

        #[test]
        fn test_out_of_table_zoom_draws_nothing() {
            let (overlay, map) = attached(0.0);
            assert_eq!(overlay.intervals(), Some((0.0, 0.0)));
            let frame = overlay.frame(&map).unwrap();
            assert!(frame.is_empty());
        }
    }

    mod drawing {
        use super::*;

        #[test]
        fn test_frame_is_idempotent() {
            let (overlay, map) = attached(5.0);
            let first = overlay.frame(&map).unwrap();
            let second = overlay.frame(&map).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn test_opacity_does_not_affect_geometry() {
            let (mut overlay, map) = attached(5.0);
            let before = overlay.frame(&map).unwrap();
            overlay.set_opacity(0.25);
            overlay.draw(&map);
            let after = overlay.frame(&map).unwrap();
            assert_eq!(before, after);
            assert_eq!(overlay.opacity(), Some(0.25));
        }

        #[test]
        fn test_show_label_false_produces_no_labels() {
            let options = GraticuleOptions::default().with_show_label(false);
            let mut overlay = Graticule::new(options).unwrap();
            let mut map = map_at(5.0);
            overlay.on_add(&mut map);

            let frame = overlay.frame(&map).unwrap();
            assert!(!frame.lines.is_empty());
            assert!(frame.labels.is_empty());
        }

        #[test]
        fn test_straight_lines_are_two_point_chords() {
            let (overlay, map) = attached(5.0);
            let frame = overlay.frame(&map).unwrap();
            assert!(frame.lines.iter().all(|line| line.points.len() == 2));
        }

        #[test]
        fn test_curved_lines_sample_intermediate_points() {
            let options = GraticuleOptions::default()
                .with_lat_curve(CurveMode::Sampled(0.5))
                .with_lng_curve(CurveMode::Sampled(0.5));
            let mut overlay = Graticule::new(options).unwrap();
            let mut map = map_at(5.0);
            overlay.on_add(&mut map);

            let frame = overlay.frame(&map).unwrap();
            assert!(frame.lines.iter().all(|line| line.points.len() > 2));
        }

        #[test]
        fn test_draw_paints_onto_the_surface() {
            let (overlay, _map) = attached(5.0);
            let painted = overlay
                .surface()
                .unwrap()
                .pixmap()
                .pixels()
                .iter()
                .any(|p| p.alpha() != 0);
            assert!(painted);
        }

        #[test]
        fn test_pan_tracks_layer_origin() {
            let (mut overlay, mut map) = attached(5.0);
            map.pan_by(0.0, 2.0);
            overlay.handle_event(&map, MapEventKind::MoveEnd);
            let origin = overlay.surface().unwrap().origin();
            assert!(origin.x > 0.0);
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn test_invalid_curve_step_is_rejected() {
            let options = GraticuleOptions::default().with_lng_curve(CurveMode::Sampled(-1.0));
            assert!(Graticule::new(options).is_err());
        }

        #[test]
        fn test_attribution_passthrough() {
            let options = GraticuleOptions::default().with_attribution("graticule");
            let overlay = Graticule::new(options).unwrap();
            assert_eq!(overlay.attribution(), Some("graticule"));
        }
    }
}
