//! Unit-length 3D directions.

use crate::error::ProjectorError;
use glam::DVec3;

/// A unit vector. Normalized once on construction and never renormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction(DVec3);

impl Direction {
    /// The axis the camera looks down when no rotation is applied.
    pub const REFERENCE: Direction = Direction(DVec3::new(0.0, 0.0, -1.0));

    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, ProjectorError> {
        Self::try_from(DVec3::new(x, y, z))
    }

    pub fn from_array(a: [f64; 3]) -> Result<Self, ProjectorError> {
        Self::new(a[0], a[1], a[2])
    }

    /// Direction for a yaw/pitch pair in radians. Yaw turns from -z towards +x,
    /// pitch lifts towards +y; (0, 0) is [`Direction::REFERENCE`].
    pub fn from_yaw_pitch(yaw: f64, pitch: f64) -> Self {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        // Already unit length.
        Direction(DVec3::new(
            cos_pitch * sin_yaw,
            sin_pitch,
            -cos_pitch * cos_yaw,
        ))
    }

    /// Direction for an azimuth measured from +z towards +x and an elevation
    /// towards +y, both in radians. An azimuth of π is [`Direction::REFERENCE`].
    pub fn from_azimuth_elevation(azimuth: f64, elevation: f64) -> Self {
        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_el, cos_el) = elevation.sin_cos();
        Direction(DVec3::new(sin_az * cos_el, sin_el, cos_az * cos_el))
    }

    #[inline]
    pub fn as_vec(&self) -> DVec3 {
        self.0
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    #[inline]
    pub fn dot(&self, other: Direction) -> f64 {
        self.0.dot(other.0)
    }
}

impl TryFrom<DVec3> for Direction {
    type Error = ProjectorError;

    fn try_from(v: DVec3) -> Result<Self, Self::Error> {
        let len = v.length();
        if !len.is_finite() || len < f64::EPSILON {
            return Err(ProjectorError::DegenerateDirection {
                x: v.x,
                y: v.y,
                z: v.z,
            });
        }
        Ok(Direction(v / len))
    }
}

impl From<Direction> for DVec3 {
    fn from(d: Direction) -> Self {
        d.0
    }
}
