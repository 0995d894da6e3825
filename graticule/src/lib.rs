//! Graticule - latitude/longitude grid overlay for interactive maps
//!
//! This library renders a graticule — the grid of latitude and longitude
//! lines, with edge labels — on top of a pannable, zoomable host map. The
//! host map stays external: everything the renderer needs from it is
//! expressed by the narrow [`HostMap`] trait (viewport size, zoom, the two
//! pixel↔geographic transforms, an overlay pane and event subscriptions).
//!
//! Line density adapts to the zoom level through a [`ZoomIntervalTable`];
//! lines are traced either as straight chords or, in curved mode, as
//! stepped polylines that follow the host's projection; views straddling
//! the antimeridian (±180° longitude) are handled by unfolding the eastern
//! bound into a plain ascending interval.
//!
//! # Architecture
//!
//! ```text
//! host notification ──► Graticule::handle_event
//!                          └─► reset
//!                               ├─► ViewportBounds::compute   (padded geodetic box)
//!                               ├─► ZoomIntervalTable::resolve (iff zoom changed)
//!                               └─► draw
//!                                    ├─► tracer::ticks / trace_* (per tick)
//!                                    ├─► labels::place_*         (edge crossings)
//!                                    └─► Surface                 (clear + repaint)
//! ```

pub mod bounds;
pub mod error;
pub mod format;
pub mod geo;
pub mod host;
pub mod interval;
pub mod labels;
pub mod overlay;
pub mod surface;
pub mod tracer;

pub use bounds::ViewportBounds;
pub use error::GraticuleError;
pub use format::{
    format_latitude, format_longitude, CoordinateFormatter, DegreeFormatter, LatLonPattern,
};
pub use geo::{wrap_longitude, Axis, LatLng, Rgba, ScreenPoint, SurfaceSize};
pub use host::{HostMap, MapEventKind, OverlayId, OverlayPane, ALL_MAP_EVENTS};
pub use interval::{ZoomInterval, ZoomIntervalTable};
pub use labels::EdgeLabel;
pub use overlay::{Frame, Graticule, GraticuleOptions, GridLine};
pub use surface::{LabelFont, Surface, TextMetrics};
pub use tracer::CurveMode;
