// planar.rs: legacy view-plane projection
//
// Rotated points are divided onto the plane at the projection constant `v`
// and then stretched linearly so the circumscribed screen edge lands on the
// viewport border. Superseded by the spherical model but still selectable.

use super::fov::ViewportState;
use glam::{DVec2, DVec3};

/// True when the rotated point lies past the view plane and must not be drawn.
#[inline]
pub fn is_hidden(rotated: DVec3, viewport: &ViewportState) -> bool {
    viewport.v < rotated.z
}

/// Perspective division of a rotated point onto the view plane.
pub fn project_point(rotated: DVec3, viewport: &ViewportState) -> DVec2 {
    let c = viewport.v / rotated.z;
    DVec2::new(rotated.x * c, rotated.y * c)
}

/// Linear remap of plane coordinates to pixels, origin at the bottom-left.
pub fn plane_to_screen(plane: DVec2, viewport: &ViewportState) -> DVec2 {
    DVec2::new(
        (plane.x + viewport.screen_edge_x) / (viewport.screen_edge_x * 2.0) * viewport.width,
        (plane.y + viewport.screen_edge_y) / (viewport.screen_edge_y * 2.0) * viewport.height,
    )
}
