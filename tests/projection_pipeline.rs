//! End-to-end checks: manifest → tour → orientation feed → projector → screen states.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use panorama_hotspots::projector::{rotation, spherical, visibility};
use panorama_hotspots::{
    Direction, OrientationFeed, ProjectionModel, Projector, Tour, TourManifest, ViewportState,
    Visibility,
};
use std::f64::consts::TAU;

const TOUR: &str = r#"{
    "start": "vestibule",
    "scenes": [
        { "name": "vestibule", "source": "vestibule.jpg",
          "hotspots": [
            { "point": [0, 0, -1], "tooltip": "Corridor", "target": "corridor" },
            { "point": [0, 0, 3] },
            { "point": [2.0, 0.5, -1.5], "target": "corridor" }
          ] },
        { "name": "corridor", "source": "corridor.jpg",
          "hotspots": [ { "point": [1, 0, 0], "target": "vestibule" } ] }
    ]
}"#;

fn tour() -> Tour {
    Tour::from_manifest(TourManifest::from_json(TOUR).unwrap()).unwrap()
}

#[test]
fn test_ingested_hotspots_are_unit_length() {
    let tour = tour();
    for scene in tour.scenes() {
        for h in &scene.hotspots {
            assert_abs_diff_eq!(h.direction.as_vec().length(), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_end_to_end_center_hotspot() {
    let vp = ViewportState::new(800.0, 600.0).unwrap();
    let cam = Direction::new(0.0, 0.0, -1.0).unwrap();
    let p = Direction::new(0.0, 0.0, -1.0).unwrap();

    let s = Projector::new(ProjectionModel::Spherical).project(p, cam, &vp);
    assert_abs_diff_eq!(s.x, 400.0, epsilon = 1e-6);
    assert_abs_diff_eq!(s.y, 300.0, epsilon = 1e-6);
    assert!(s.in_sight);
    assert!(s.on_screen);
}

#[test]
fn test_camera_direction_projects_to_center_everywhere() {
    let vp = ViewportState::new(1920.0, 1080.0).unwrap();
    for yaw_deg in (0..360).step_by(30) {
        for pitch_deg in [-80.0, -30.0, 0.0, 45.0, 85.0] {
            let cam = Direction::from_yaw_pitch((yaw_deg as f64).to_radians(), f64::to_radians(pitch_deg));
            let p = spherical::project(cam, cam, &vp);
            assert_abs_diff_eq!(p.normalized.x, 0.5, epsilon = 1e-9);
            assert_abs_diff_eq!(p.normalized.y, 0.5, epsilon = 1e-9);
            assert!(p.in_sight);
        }
    }
}

#[test]
fn test_rotation_maps_reference_to_camera() {
    for yaw_deg in (0..360).step_by(45) {
        for pitch_deg in [-60.0, 0.0, 60.0] {
            let cam = Direction::from_yaw_pitch((yaw_deg as f64).to_radians(), f64::to_radians(pitch_deg));
            let r = rotation::rotation_matrix(cam);
            let mapped = rotation::rotate_point(Direction::REFERENCE.as_vec(), &r);
            assert!((mapped - cam.as_vec()).length() < 1e-6);
        }
    }
}

#[test]
fn test_seam_wrap() {
    let fov = ViewportState::new(1920.0, 1080.0).unwrap().fov;
    assert_relative_eq!(spherical::wrap_azimuth(TAU - 0.05, 0.05, fov), -0.05, epsilon = 1e-12);
}

#[test]
fn test_background_mapping_matches_hotspot_overlay() {
    let vp = ViewportState::new(1280.0, 720.0).unwrap();
    let cam = Direction::REFERENCE;
    let hotspot = Direction::from_yaw_pitch(30f64.to_radians(), 0.0);

    let s = Projector::new(ProjectionModel::Spherical).project(hotspot, cam, &vp);
    // The background shader asks which direction each pixel shows.
    let shown = spherical::unproject(glam::DVec2::new(s.x / vp.width, s.y / vp.height), cam, &vp);
    assert!((shown.as_vec() - hotspot.as_vec()).length() < 1e-9);
}

#[test]
fn test_draw_circle_bounds() {
    let vp = ViewportState::new(800.0, 600.0).unwrap();
    assert!(visibility::is_in_draw_circle(glam::DVec2::new(400.0, 300.0), &vp));
    assert!(!visibility::is_in_draw_circle(glam::DVec2::new(400.0, 300.0 + 300.01), &vp));
    assert!(!visibility::is_in_draw_circle(glam::DVec2::new(0.0, 0.0), &vp));
}

#[test]
fn test_frame_loop_waits_for_camera_then_updates_active_scene() {
    let vp = ViewportState::new(800.0, 600.0).unwrap();
    let projector = Projector::default();
    let mut tour = tour();
    let (publisher, mut feed) = OrientationFeed::new();

    // Before the first sample nothing is projected.
    assert!(feed.poll().is_none());
    assert!(tour.current().hotspots.iter().all(|h| h.screen.is_none()));

    publisher.publish(Direction::REFERENCE).unwrap();
    let cam = feed.poll().unwrap();
    tour.update(&projector.frame(cam, &vp));

    let hs = &tour.current().hotspots;
    assert_eq!(hs[0].visibility(), Visibility::Visible);
    assert_eq!(hs[1].visibility(), Visibility::Hidden);
    assert!(hs[2].screen.unwrap().in_sight);

    let hit = tour.current().hotspot_at(400.0, 300.0, 10.0).unwrap();
    let target = tour.current().hotspots[hit].target.clone().unwrap();
    assert_eq!(tour.go_to(&target).unwrap().name, "corridor");
    assert!(tour.current().hotspots[0].screen.is_none());

    // Look right, towards +x: the corridor hotspot comes into view.
    publisher
        .publish(Direction::from_yaw_pitch(std::f64::consts::FRAC_PI_2, 0.0))
        .unwrap();
    let cam = feed.poll().unwrap();
    tour.update(&projector.frame(cam, &vp));
    let s = tour.current().hotspots[0].screen.unwrap();
    assert_abs_diff_eq!(s.x, 400.0, epsilon = 1e-6);
    assert!(s.on_screen);
}

#[test]
fn test_models_disagree_off_axis_but_agree_at_center() {
    let vp = ViewportState::new(1280.0, 720.0).unwrap();
    let cam = Direction::REFERENCE;
    let off = Direction::new(0.2, 0.1, -1.0).unwrap();

    // Up and to the right of the camera: same quadrant, different distance.
    let sph = Projector::new(ProjectionModel::Spherical).project(off, cam, &vp);
    let pla = Projector::new(ProjectionModel::Planar).project(off, cam, &vp);
    assert!((sph.x - pla.x).abs() > 1.0);
    for s in [sph, pla] {
        assert!(s.x > 640.0, "{s:?}");
        assert!(s.y < 360.0, "{s:?}");
        assert!(s.on_screen, "{s:?}");
    }

    let sph = Projector::new(ProjectionModel::Spherical).project(cam, cam, &vp);
    let pla = Projector::new(ProjectionModel::Planar).project(cam, cam, &vp);
    assert_abs_diff_eq!(sph.x, pla.x, epsilon = 1e-6);
    assert_abs_diff_eq!(sph.y, pla.y, epsilon = 1e-6);
}
