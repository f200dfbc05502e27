//! Draw-circle test and the combined visibility classification.

use super::fov::ViewportState;
use glam::DVec2;

/// How the overlay should present a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// In front of the camera and inside the draw circle.
    Visible,
    /// In front of the camera but outside the draw circle.
    Dimmed,
    Hidden,
}

/// True when `point` (pixels) lies strictly inside the circle inscribed in the viewport.
pub fn is_in_draw_circle(point: DVec2, viewport: &ViewportState) -> bool {
    let dx = point.x - viewport.width / 2.0;
    let dy = point.y - viewport.height / 2.0;
    let r = viewport.width.min(viewport.height) / 2.0;
    dx * dx + dy * dy < r * r
}

pub fn classify(in_sight: bool, in_draw_circle: bool) -> Visibility {
    match (in_sight, in_draw_circle) {
        (true, true) => Visibility::Visible,
        (true, false) => Visibility::Dimmed,
        (false, _) => Visibility::Hidden,
    }
}
