// projector: hotspot direction to screen position under a selectable model

pub mod fov;
pub mod planar;
pub mod rotation;
pub mod spherical;
pub mod visibility;

pub use fov::ViewportState;
pub use visibility::Visibility;

use crate::direction::Direction;
use crate::error::ProjectorError;
use glam::{DMat3, DVec2, DVec3};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionModel {
    /// Azimuth/elevation offsets with wrap-around and edge correction.
    #[default]
    Spherical,
    /// Rotate into the camera frame, divide onto the view plane.
    Planar,
}

impl fmt::Display for ProjectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionModel::Spherical => f.write_str("spherical"),
            ProjectionModel::Planar => f.write_str("planar"),
        }
    }
}

impl FromStr for ProjectionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spherical" => Ok(ProjectionModel::Spherical),
            "planar" => Ok(ProjectionModel::Planar),
            other => Err(format!("unknown projection model '{other}'")),
        }
    }
}

/// Per-frame screen placement of one hotspot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenState {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
    /// In front of the viewer.
    pub in_sight: bool,
    /// In sight and inside the draw circle.
    pub on_screen: bool,
}

impl ScreenState {
    pub fn visibility(&self) -> Visibility {
        if self.on_screen {
            Visibility::Visible
        } else if self.in_sight {
            Visibility::Dimmed
        } else {
            Visibility::Hidden
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Projector {
    pub model: ProjectionModel,
}

impl Projector {
    pub fn new(model: ProjectionModel) -> Self {
        Self { model }
    }

    /// Fix the camera sample and viewport for one frame.
    pub fn frame<'a>(&self, camera: Direction, viewport: &'a ViewportState) -> FrameProjector<'a> {
        let strategy = match self.model {
            ProjectionModel::Spherical => Strategy::Spherical,
            // World to camera frame is the inverse of the reference-to-camera rotation.
            ProjectionModel::Planar => {
                Strategy::Planar(rotation::rotation_matrix(camera).transpose())
            }
        };
        FrameProjector {
            camera,
            viewport,
            strategy,
        }
    }

    pub fn project(
        &self,
        hotspot: Direction,
        camera: Direction,
        viewport: &ViewportState,
    ) -> ScreenState {
        self.frame(camera, viewport).project(hotspot)
    }

    /// Convenience for raw manifest coordinates.
    pub fn project_raw(
        &self,
        hotspot: [f64; 3],
        camera: [f64; 3],
        viewport: &ViewportState,
    ) -> Result<ScreenState, ProjectorError> {
        Ok(self.project(
            Direction::from_array(hotspot)?,
            Direction::from_array(camera)?,
            viewport,
        ))
    }
}

const EYE_PLANE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
enum Strategy {
    Spherical,
    Planar(DMat3),
}

/// Projection with the per-frame work (camera rotation) already done.
#[derive(Debug, Clone, Copy)]
pub struct FrameProjector<'a> {
    camera: Direction,
    viewport: &'a ViewportState,
    strategy: Strategy,
}

impl<'a> FrameProjector<'a> {
    pub fn camera(&self) -> Direction {
        self.camera
    }

    pub fn viewport(&self) -> &'a ViewportState {
        self.viewport
    }

    pub fn project(&self, hotspot: Direction) -> ScreenState {
        let (pixels, in_sight) = match &self.strategy {
            Strategy::Spherical => {
                let p = spherical::project(hotspot, self.camera, self.viewport);
                (p.pixels, p.in_sight)
            }
            Strategy::Planar(world_to_camera) => {
                let rotated = rotation::rotate_point(hotspot.as_vec(), world_to_camera);
                // The camera looks down -z: anything at or behind the eye plane
                // is out of sight even when it passes the view-plane test.
                let in_sight =
                    !planar::is_hidden(rotated, self.viewport) && rotated.z < -EYE_PLANE_EPSILON;
                let on_plane = DVec3::new(rotated.x, rotated.y, rotated.z.min(-EYE_PLANE_EPSILON));
                // Dividing by a negative z mirrors both axes; undo it so +x is
                // right and +y is up, then flip to a top-left origin.
                let bottom_up = planar::plane_to_screen(
                    -planar::project_point(on_plane, self.viewport),
                    self.viewport,
                );
                (
                    DVec2::new(bottom_up.x, self.viewport.height - bottom_up.y),
                    in_sight,
                )
            }
        };

        let in_circle = visibility::is_in_draw_circle(pixels, self.viewport);
        ScreenState {
            x: pixels.x,
            y: pixels.y,
            in_sight,
            on_screen: visibility::classify(in_sight, in_circle) == Visibility::Visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_model_parsing() {
        assert_eq!("Spherical".parse::<ProjectionModel>(), Ok(ProjectionModel::Spherical));
        assert_eq!(" planar ".parse::<ProjectionModel>(), Ok(ProjectionModel::Planar));
        assert!("gnomonic".parse::<ProjectionModel>().is_err());
        assert_eq!(ProjectionModel::default(), ProjectionModel::Spherical);
    }

    #[test]
    fn test_both_models_center_the_camera_direction() {
        let vp = ViewportState::new(1024.0, 768.0).unwrap();
        let cam = Direction::new(0.35, 0.2, -0.6).unwrap();
        for model in [ProjectionModel::Spherical, ProjectionModel::Planar] {
            let s = Projector::new(model).project(cam, cam, &vp);
            assert_abs_diff_eq!(s.x, 512.0, epsilon = 1e-6);
            assert_abs_diff_eq!(s.y, 384.0, epsilon = 1e-6);
            assert!(s.in_sight, "{model}");
            assert!(s.on_screen, "{model}");
            assert_eq!(s.visibility(), Visibility::Visible);
        }
    }

    #[test]
    fn test_point_behind_is_hidden() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let cam = Direction::REFERENCE;
        let back = Direction::new(0.0, 0.0, 1.0).unwrap();
        for model in [ProjectionModel::Spherical, ProjectionModel::Planar] {
            let s = Projector::new(model).project(back, cam, &vp);
            assert!(!s.in_sight);
            assert!(!s.on_screen);
            assert_eq!(s.visibility(), Visibility::Hidden);
        }
    }

    #[test]
    fn test_models_agree_on_quadrant() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let cases = [
            (Direction::REFERENCE, Direction::new(0.2, 0.15, -1.0).unwrap()),
            (Direction::from_yaw_pitch(0.8, 0.0), Direction::from_yaw_pitch(1.0, 0.1)),
            (Direction::from_yaw_pitch(-1.5, 0.3), Direction::from_yaw_pitch(-1.3, 0.4)),
        ];
        for (cam, up_right) in cases {
            for model in [ProjectionModel::Spherical, ProjectionModel::Planar] {
                let s = Projector::new(model).project(up_right, cam, &vp);
                assert!(s.x > 400.0, "{model}: x = {}", s.x);
                assert!(s.y < 300.0, "{model}: y = {}", s.y);
                assert!(s.on_screen, "{model}");
            }
        }
    }

    #[test]
    fn test_planar_point_on_eye_plane_is_hidden_and_finite() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let planar = Projector::new(ProjectionModel::Planar);
        let cam = Direction::from_yaw_pitch(0.6, 0.0);
        for (cam, side) in [
            (Direction::REFERENCE, Direction::new(1.0, 0.0, 0.0).unwrap()),
            (Direction::REFERENCE, Direction::new(0.0, -1.0, 0.0).unwrap()),
            (cam, Direction::from_yaw_pitch(0.6 + std::f64::consts::FRAC_PI_2, 0.0)),
        ] {
            let s = planar.project(side, cam, &vp);
            assert!(!s.in_sight);
            assert!(!s.on_screen);
            assert_eq!(s.visibility(), Visibility::Hidden);
            assert!(s.x.is_finite() && s.y.is_finite(), "{s:?}");
        }
    }

    #[test]
    fn test_far_side_point_is_dimmed() {
        let vp = ViewportState::new(1920.0, 1080.0).unwrap();
        let cam = Direction::REFERENCE;
        // 70° to the side: in front of the viewer, clamped to the screen edge.
        let side = Direction::from_yaw_pitch(70f64.to_radians(), 0.0);
        let s = Projector::default().project(side, cam, &vp);
        assert!(s.in_sight);
        assert!(!s.on_screen);
        assert_eq!(s.visibility(), Visibility::Dimmed);
    }

    #[test]
    fn test_frame_reuses_camera() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let cam = Direction::new(0.1, 0.0, -1.0).unwrap();
        let frame = Projector::new(ProjectionModel::Planar).frame(cam, &vp);
        assert_eq!(frame.camera(), cam);
        let a = frame.project(Direction::REFERENCE);
        let b = Projector::new(ProjectionModel::Planar).project(Direction::REFERENCE, cam, &vp);
        assert_eq!(a, b);
    }

    #[test]
    fn test_project_raw_rejects_zero_vectors() {
        let vp = ViewportState::new(800.0, 600.0).unwrap();
        let p = Projector::default();
        assert!(p.project_raw([0.0, 0.0, 0.0], [0.0, 0.0, -1.0], &vp).is_err());
        assert!(p.project_raw([0.0, 0.0, -1.0], [0.0, 0.0, 0.0], &vp).is_err());
        assert!(p.project_raw([0.0, 0.0, -3.0], [0.0, 0.0, -1.0], &vp).is_ok());
    }
}
