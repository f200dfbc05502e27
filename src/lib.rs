//! Orientation-aware hotspot overlay for 360° panoramas.
//!
//! The [`projector`] module maps a hotspot's fixed direction to screen
//! coordinates for the current camera direction and viewport. The rest of
//! the crate feeds it: [`orientation`] delivers camera samples, [`tour`]
//! loads scenes and their [`hotspot`]s, [`config`] and [`i18n`] serve the
//! viewer binary.

pub mod config;
pub mod direction;
pub mod error;
pub mod hotspot;
pub mod i18n;
pub mod orientation;
pub mod projector;
pub mod tour;

pub use direction::Direction;
pub use error::{ConfigWarning, ProjectorError, TourError};
pub use hotspot::{Hotspot, HotspotDef, Scene};
pub use orientation::{OrbitController, OrientationFeed, OrientationPublisher};
pub use projector::{
    FrameProjector, ProjectionModel, Projector, ScreenState, ViewportState, Visibility,
};
pub use tour::{Tour, TourManifest};
