//! Rotation aligning the reference viewing axis with the camera direction.

use crate::direction::Direction;
use glam::{DMat3, DVec3};
use std::f64::consts::PI;

/// Below this axis magnitude the camera is treated as (anti)parallel to the reference.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Rotation taking [`Direction::REFERENCE`] onto `camera`.
pub fn rotation_matrix(camera: Direction) -> DMat3 {
    rotation_matrix_from(camera, Direction::REFERENCE)
}

/// Rodrigues construction of `R` with `R * reference ≈ camera`.
///
/// `R = I + [v]x + [v]x² (1 - c) / s²` where `v = reference × camera`,
/// `s = |v|` and `c = reference · camera`. When the two are parallel the
/// identity is returned; when antiparallel, a half turn about an axis
/// orthogonal to `reference`.
pub fn rotation_matrix_from(camera: Direction, reference: Direction) -> DMat3 {
    let org = reference.as_vec();
    let cam = camera.as_vec();

    let v = org.cross(cam);
    let s = v.length();
    let c = org.dot(cam);

    if s < PARALLEL_EPSILON {
        if c > 0.0 {
            return DMat3::IDENTITY;
        }
        return DMat3::from_axis_angle(org.any_orthonormal_vector(), PI);
    }

    let vx = skew(v);
    DMat3::IDENTITY + vx + (vx * vx) * ((1.0 - c) / (s * s))
}

#[inline]
pub fn rotate_point(point: DVec3, r: &DMat3) -> DVec3 {
    *r * point
}

/// Cross-product matrix: `skew(v) * p == v.cross(p)`.
fn skew(v: DVec3) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(0.0, v.z, -v.y),
        DVec3::new(-v.z, 0.0, v.x),
        DVec3::new(v.y, -v.x, 0.0),
    )
}
