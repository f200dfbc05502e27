//! Error and warning types shared by the projector and the tour loader.

use std::fmt;
use thiserror::Error;

/// Faults raised by the projection core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectorError {
    /// Zero-length or non-finite vector offered as a direction.
    #[error("degenerate direction ({x}, {y}, {z}): cannot normalize")]
    DegenerateDirection { x: f64, y: f64, z: f64 },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Non-fatal problems found while deriving a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigWarning {
    /// The empirical FOV fit left the physically valid range and was clamped.
    FovClamped {
        aspect: f64,
        estimated_deg: f64,
        clamped_deg: f64,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::FovClamped {
                aspect,
                estimated_deg,
                clamped_deg,
            } => write!(
                f,
                "aspect ratio {aspect:.3} gives FOV {estimated_deg:.2}°, clamped to {clamped_deg:.2}°"
            ),
        }
    }
}

/// Failures while loading or navigating a tour manifest.
#[derive(Error, Debug)]
pub enum TourError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("manifest contains no scenes")]
    Empty,

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("scene '{0}' is defined more than once")]
    DuplicateScene(String),

    #[error("hotspot in scene '{scene}' targets unknown scene '{target}'")]
    DanglingTarget { scene: String, target: String },

    #[error("hotspot #{index} in scene '{scene}': {source}")]
    Hotspot {
        scene: String,
        index: usize,
        #[source]
        source: ProjectorError,
    },
}
