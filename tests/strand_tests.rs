// Host-side tests for strand bookkeeping and the viewport mapping.

use trail_core::*;

fn viewport() -> Viewport {
    Viewport::new(1000.0, 1000.0, &CameraParams::default())
}

#[test]
fn new_strand_parks_every_node_at_the_start_point() {
    let vp = viewport();
    let s = Strand::new(24, vp.center(), &vp);
    assert_eq!(s.len(), 24);
    assert_eq!(s.target_path().len(), 24);
    for node in s.physics_path() {
        assert!(node.position.length() < 1e-6);
        assert_eq!(node.velocity, glam::Vec3::ZERO);
    }
}

#[test]
fn scroll_drops_tail_and_appends_head() {
    let vp = viewport();
    let mut s = Strand::new(5, vp.center(), &vp);
    for i in 0..5 {
        s.scroll(ScreenPoint::new(i as f32, 0.0));
    }
    let before: Vec<ScreenPoint> = s.target_path().iter().copied().collect();
    let p = ScreenPoint::new(42.0, 7.0);
    s.scroll(p);
    let after: Vec<ScreenPoint> = s.target_path().iter().copied().collect();
    assert_eq!(after.len(), before.len());
    assert_eq!(&after[..4], &before[1..]);
    assert_eq!(after[4], p);
    assert_eq!(s.head_target(), Some(p));
}

#[test]
fn collapse_sets_every_slot_to_the_head() {
    let vp = viewport();
    let mut s = Strand::new(6, vp.center(), &vp);
    for i in 0..6 {
        s.scroll(ScreenPoint::new(10.0 * i as f32, 3.0));
    }
    let head = s.head_target();
    s.collapse_to_head();
    assert!(s.target_path().iter().all(|p| Some(*p) == head));
    assert_eq!(s.len(), 6);
}

#[test]
fn snap_overwrites_positions_and_zeroes_velocity() {
    let vp = viewport();
    let mut s = Strand::new(8, ScreenPoint::new(0.0, 0.0), &vp);
    s.snap(ScreenPoint::new(500.0, 500.0), &vp);
    assert!(s
        .target_path()
        .iter()
        .all(|p| *p == ScreenPoint::new(500.0, 500.0)));
    for node in s.physics_path() {
        assert!(node.position.length() < 1e-6);
        assert_eq!(node.velocity, glam::Vec3::ZERO);
    }
}

#[test]
fn screen_to_world_maps_center_and_corners() {
    let vp = viewport();
    assert!(vp.screen_to_world(vp.center()).length() < 1e-6);
    let top_left = vp.screen_to_world(ScreenPoint::new(0.0, 0.0));
    assert!((top_left.x + vp.view_width * 0.5).abs() < 1e-5);
    assert!((top_left.y - vp.view_height * 0.5).abs() < 1e-5);
    assert_eq!(top_left.z, 0.0);
    // visible height at the camera distance
    let expected = 2.0 * CAMERA_Z_DEFAULT * (std::f32::consts::FRAC_PI_8).tan();
    assert!((vp.view_height - expected).abs() < 1e-4);
}

const CAMERA_Z_DEFAULT: f32 = trail_core::constants::CAMERA_Z;

#[test]
fn resize_ignores_zero_and_non_finite_sizes() {
    let cam = CameraParams::default();
    let mut vp = viewport();
    let before = vp;
    assert!(!vp.resize(0.0, 600.0, &cam));
    assert!(!vp.resize(800.0, 0.0, &cam));
    assert!(!vp.resize(f32::NAN, 600.0, &cam));
    assert_eq!(vp, before);
    assert!(vp.resize(2000.0, 1000.0, &cam));
    assert!((vp.aspect() - 2.0).abs() < 1e-6);
    assert!((vp.view_width - vp.view_height * 2.0).abs() < 1e-5);
}
