//! Spherical projection: azimuth/elevation offsets from the camera direction.
//!
//! Works on raw unit vectors without building a rotation matrix. Azimuths
//! are folded into `[0, 2π)`, the difference to the camera is wrapped onto
//! the shortest path, and an empirical correction compensates the capture
//! distortion towards the edges of the field of view.

use super::fov::ViewportState;
use crate::direction::Direction;
use glam::DVec2;
use std::f64::consts::{PI, TAU};

// Edge-distortion calibration. Centered coordinates are clamped to these
// half-extents before the correction factor is applied.
const EDGE_LIMIT_X: f64 = 0.4;
const EDGE_LIMIT_Y: f64 = 0.46;
// factor_x = 1 + (EDGE_X_QUADRATIC + EDGE_X_ASPECT * aspect) * cx²
const EDGE_X_QUADRATIC: f64 = 0.43;
const EDGE_X_ASPECT: f64 = -0.098;
// factor_y = 1 + EDGE_Y_QUADRATIC * cy²
const EDGE_Y_QUADRATIC: f64 = 0.27;

const NEWTON_STEPS: usize = 8;

const XZ_EPSILON: f64 = 1e-12;

/// Output of the spherical model before visibility classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalPoint {
    /// Position as a fraction of the viewport, `(0.5, 0.5)` at the center.
    pub normalized: DVec2,
    /// Position in pixels, origin at the top-left.
    pub pixels: DVec2,
    pub in_sight: bool,
}

/// Elevation in `[-π/2, π/2]`.
#[inline]
pub fn elevation(d: Direction) -> f64 {
    d.y().clamp(-1.0, 1.0).asin()
}

/// Azimuth in `[0, 2π)`, or `None` when the direction is vertical and has
/// no horizontal component.
pub fn azimuth(d: Direction) -> Option<f64> {
    let len = d.x().hypot(d.z());
    if len < XZ_EPSILON {
        return None;
    }
    let base = (d.z() / len).clamp(-1.0, 1.0).acos();
    if d.x() > 0.0 {
        Some(base)
    } else {
        Some((TAU - base) % TAU)
    }
}

/// Move `point_az` by whole turns so that its offset from `camera_az` takes
/// the shortest path. Points already inside the field of view are untouched.
pub fn wrap_azimuth(point_az: f64, camera_az: f64, fov: f64) -> f64 {
    let half = fov / 2.0;
    let mut pt = point_az;
    if pt < camera_az - half {
        while pt - camera_az < -PI {
            pt += TAU;
        }
    } else if pt > camera_az + half {
        while pt - camera_az > PI {
            pt -= TAU;
        }
    }
    pt
}

/// Edge-distortion correction for one aspect ratio.
///
/// Each centered axis `c` maps to `c * (1 + coef * c²)` after clamping to
/// `±limit`. The viewer's background shader receives the same numbers so the
/// panorama and the hotspots share one mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCorrection {
    pub coef_x: f64,
    pub coef_y: f64,
    pub limit_x: f64,
    pub limit_y: f64,
}

impl EdgeCorrection {
    pub fn for_aspect(aspect: f64) -> Self {
        Self {
            coef_x: EDGE_X_QUADRATIC + EDGE_X_ASPECT * aspect,
            coef_y: EDGE_Y_QUADRATIC,
            limit_x: EDGE_LIMIT_X,
            limit_y: EDGE_LIMIT_Y,
        }
    }

    pub fn apply(&self, normalized: DVec2) -> DVec2 {
        let cx = (normalized.x - 0.5).clamp(-self.limit_x, self.limit_x);
        let cy = (normalized.y - 0.5).clamp(-self.limit_y, self.limit_y);
        DVec2::new(
            cx * (1.0 + self.coef_x * cx * cx) + 0.5,
            cy * (1.0 + self.coef_y * cy * cy) + 0.5,
        )
    }

    /// Undo [`EdgeCorrection::apply`]. Inside the clamp this is exact; past
    /// the corrected edge the offset continues linearly.
    pub fn invert(&self, corrected: DVec2) -> DVec2 {
        DVec2::new(
            invert_axis(corrected.x - 0.5, self.coef_x, self.limit_x) + 0.5,
            invert_axis(corrected.y - 0.5, self.coef_y, self.limit_y) + 0.5,
        )
    }
}

fn invert_axis(corrected: f64, coef: f64, limit: f64) -> f64 {
    let edge = limit * (1.0 + coef * limit * limit);
    if corrected.abs() >= edge {
        return corrected.signum() * limit + (corrected - corrected.signum() * edge);
    }
    // c + coef·c³ is monotonic on [-limit, limit] for every aspect the FOV fit allows.
    let mut c = corrected;
    for _ in 0..NEWTON_STEPS {
        let f = c + coef * c * c * c - corrected;
        c -= f / (1.0 + 3.0 * coef * c * c);
    }
    c
}

/// Apply the edge-distortion correction to a normalized position.
pub fn correct_edges(normalized: DVec2, aspect: f64) -> DVec2 {
    EdgeCorrection::for_aspect(aspect).apply(normalized)
}

/// Project `point` for a viewer looking along `camera`.
pub fn project(point: Direction, camera: Direction, viewport: &ViewportState) -> SphericalPoint {
    let cam_y = elevation(camera);
    let pt_y = elevation(point);

    // A vertical camera has no heading; a vertical point inherits the camera's.
    let cam_xz = azimuth(camera).unwrap_or(0.0);
    let pt_xz = azimuth(point).unwrap_or(cam_xz);
    let pt_xz = wrap_azimuth(pt_xz, cam_xz, viewport.fov);

    let raw = DVec2::new(
        0.5 - (pt_xz - cam_xz) / viewport.fov,
        0.5 - (pt_y - cam_y) / PI,
    );
    let normalized = correct_edges(raw, viewport.aspect());

    SphericalPoint {
        normalized,
        pixels: DVec2::new(normalized.x * viewport.width, normalized.y * viewport.height),
        in_sight: point.dot(camera) > 0.0,
    }
}

/// Direction drawn at `normalized` for a viewer looking along `camera`.
///
/// Inverse of [`project`] for points inside the field of view; the panorama
/// shader evaluates the same formula per fragment.
pub fn unproject(normalized: DVec2, camera: Direction, viewport: &ViewportState) -> Direction {
    let raw = EdgeCorrection::for_aspect(viewport.aspect()).invert(normalized);
    let cam_xz = azimuth(camera).unwrap_or(0.0);
    Direction::from_azimuth_elevation(
        cam_xz + (0.5 - raw.x) * viewport.fov,
        elevation(camera) + (0.5 - raw.y) * PI,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn dir(x: f64, y: f64, z: f64) -> Direction {
        Direction::new(x, y, z).unwrap()
    }

    #[test]
    fn test_azimuth_folding() {
        assert_relative_eq!(azimuth(dir(0.0, 0.0, -1.0)).unwrap(), PI, epsilon = 1e-12);
        assert_relative_eq!(azimuth(dir(1.0, 0.0, 0.0)).unwrap(), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(
            azimuth(dir(-1.0, 0.0, 0.0)).unwrap(),
            3.0 * PI / 2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(azimuth(dir(0.0, 0.2, 1.0)).unwrap(), 0.0, epsilon = 1e-12);
        assert!(azimuth(dir(0.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_wrap_takes_nearest_edge() {
        let fov = 100f64.to_radians();
        assert_relative_eq!(wrap_azimuth(TAU - 0.05, 0.05, fov), -0.05, epsilon = 1e-12);
        assert_relative_eq!(wrap_azimuth(0.05, TAU - 0.05, fov), TAU + 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_leaves_points_in_view() {
        let fov = 100f64.to_radians();
        assert_eq!(wrap_azimuth(3.3, 3.0, fov), 3.3);
        assert_eq!(wrap_azimuth(2.4, 3.0, fov), 2.4);
        // Outside the window but already on the shortest path.
        assert_eq!(wrap_azimuth(5.5, 3.0, fov), 5.5);
    }

    #[test]
    fn test_wrap_prefers_shortest_path_over_window_edge() {
        // 5 rad left of the camera with a narrow window. Stepping only until
        // the point passes the window's right edge would leave it 5 rad away.
        let fov = 1.35;
        let wrapped = wrap_azimuth(0.5, 5.5, fov);
        assert_relative_eq!(wrapped, 0.5 + TAU, epsilon = 1e-12);
        assert!((wrapped - 5.5).abs() < PI);
        assert!(0.5 + TAU > 5.5 + fov / 2.0);
    }

    #[test]
    fn test_camera_direction_projects_to_center() {
        let vp = ViewportState::new(1280.0, 720.0).unwrap();
        for cam in [dir(0.0, 0.0, -1.0), dir(0.4, -0.3, 0.6), dir(0.0, 1.0, 0.0)] {
            let p = project(cam, cam, &vp);
            assert_abs_diff_eq!(p.normalized.x, 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(p.normalized.y, 0.5, epsilon = 1e-12);
            assert!(p.in_sight);
        }
    }

    #[test]
    fn test_golden_offsets() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let cam = dir(0.0, 0.0, -1.0);

        let p = project(dir(0.3, 0.2, -1.0), cam, &vp);
        assert_relative_eq!(p.pixels.x, 527.3318085293145, epsilon = 1e-6);
        assert_relative_eq!(p.pixels.y, 263.8162401168594, epsilon = 1e-6);

        let p = project(dir(-0.3, -0.1, -1.0), cam, &vp);
        assert_relative_eq!(p.pixels.x, 272.66819147068554, epsilon = 1e-6);
        assert_relative_eq!(p.pixels.y, 318.24204760874846, epsilon = 1e-6);
    }

    #[test]
    fn test_seam_point_stays_on_camera_side() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        // Camera just right of the +z seam, point just left of it.
        let cam = dir(0.05f64.sin(), 0.0, 0.05f64.cos());
        let pt = dir(-(0.05f64.sin()), 0.0, 0.05f64.cos());
        let p = project(pt, cam, &vp);
        // 0.1 rad from the center instead of the far edge.
        assert!(p.normalized.x > 0.5);
        assert!(p.normalized.x < 0.6);
        assert!(p.in_sight);
    }

    #[test]
    fn test_point_behind_is_out_of_sight() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let p = project(dir(0.0, 0.0, 1.0), dir(0.0, 0.0, -1.0), &vp);
        assert!(!p.in_sight);
        assert!(p.pixels.x.is_finite() && p.pixels.y.is_finite());
    }

    #[test]
    fn test_unproject_recovers_projected_direction() {
        let vp = ViewportState::new(1280.0, 720.0).unwrap();
        let cases = [
            (Direction::REFERENCE, Direction::from_yaw_pitch(30f64.to_radians(), 0.0)),
            (Direction::REFERENCE, dir(-0.2, 0.3, -1.0)),
            (
                Direction::from_yaw_pitch(1.0, 0.2),
                Direction::from_yaw_pitch(0.4, -0.1),
            ),
            (
                Direction::from_yaw_pitch(1.0, 0.2),
                Direction::from_yaw_pitch(1.3, 0.45),
            ),
        ];
        for (cam, pt) in cases {
            let p = project(pt, cam, &vp);
            let back = unproject(p.normalized, cam, &vp);
            assert!(
                (back.as_vec() - pt.as_vec()).length() < 1e-9,
                "{pt:?} came back as {back:?}"
            );
        }
    }

    #[test]
    fn test_screen_center_unprojects_to_camera() {
        let vp = ViewportState::new(1920.0, 1080.0).unwrap();
        let cam = Direction::from_yaw_pitch(-2.0, 0.5);
        let back = unproject(DVec2::new(0.5, 0.5), cam, &vp);
        assert!((back.as_vec() - cam.as_vec()).length() < 1e-12);
    }

    #[test]
    fn test_edge_inverse_is_continuous_past_the_clamp() {
        let edge = EdgeCorrection::for_aspect(16.0 / 9.0);
        let corner = edge.apply(DVec2::new(0.9, 0.96));
        let back = edge.invert(corner);
        assert_relative_eq!(back.x, 0.9, epsilon = 1e-12);
        assert_relative_eq!(back.y, 0.96, epsilon = 1e-12);

        let beyond = edge.invert(corner + DVec2::new(0.05, 0.02));
        assert_relative_eq!(beyond.x, 0.95, epsilon = 1e-12);
        assert_relative_eq!(beyond.y, 0.98, epsilon = 1e-12);
    }

    #[test]
    fn test_edge_clamp_bounds_output() {
        let corrected = correct_edges(DVec2::new(-3.0, 4.0), 1.5);
        let fx = 1.0 + (EDGE_X_QUADRATIC + EDGE_X_ASPECT * 1.5) * 0.16;
        let fy = 1.0 + EDGE_Y_QUADRATIC * 0.46 * 0.46;
        assert_relative_eq!(corrected.x, 0.5 - 0.4 * fx, epsilon = 1e-12);
        assert_relative_eq!(corrected.y, 0.5 + 0.46 * fy, epsilon = 1e-12);
    }
}
