//! The graticule overlay.
//!
//! This module ties the leaf components together: [`GraticuleOptions`]
//! configures the overlay, [`Graticule`] owns the attach/redraw/detach
//! lifecycle, and [`Frame`] is the pure geometry one redraw paints.
//!
//! # Example
//!
//! ```ignore
//! use graticule::{Graticule, GraticuleOptions, MapEventKind};
//!
//! let mut overlay = Graticule::new(GraticuleOptions::default())?;
//! overlay.on_add(&mut map);
//!
//! // Host notifications trigger full redraws.
//! overlay.handle_event(&map, MapEventKind::Move);
//!
//! // Composite `overlay.surface()` over the base map, then detach.
//! overlay.on_remove(&mut map);
//! ```

mod config;
mod frame;
mod layer;

pub use config::{
    GraticuleOptions, DEFAULT_PADDING_FRACTION, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WEIGHT,
};
pub use frame::{Frame, GridLine};
pub use layer::Graticule;
