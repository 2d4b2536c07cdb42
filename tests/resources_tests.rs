// Host-side tests for per-frame resource replacement and teardown.

mod common;

use common::*;
use trail_core::*;

#[test]
fn tubes_are_replaced_without_growth() {
    let mut s = session();
    let mut backend = CountingBackend::default();
    let mut res = FrameResources::new();
    let mut t = 0.0;
    for i in 0..200 {
        s.push_event(InputEvent::Move(circle_point(i)));
        s.frame(t, &mut backend, &mut res);
        assert!(backend.live_tubes.len() <= s.config().strand_count);
        assert_eq!(backend.live_tubes.len(), res.tubes().len());
        assert_eq!(
            backend.tubes_created - backend.tubes_released,
            backend.live_tubes.len()
        );
        t += FRAME_MS;
    }
    assert!(backend.tubes_created > 100);
}

#[test]
fn replace_acquires_before_releasing() {
    let mut backend = CountingBackend::default();
    let mut res: FrameResources<CountingBackend> = FrameResources::new();
    let mesh = build_tube(
        &[glam::Vec3::ZERO, glam::Vec3::X],
        &TubeParams::default(),
        0.05,
    )
    .expect("tube");
    let material = TubeMaterial {
        strand: 0,
        opacity: 1.0,
    };
    let first = backend.create_tube(&mesh, &material);
    res.replace_tubes(&mut backend, vec![first]);
    let second = backend.create_tube(&mesh, &material);
    // both alive until the swap
    assert_eq!(backend.live_tubes.len(), 2);
    res.replace_tubes(&mut backend, vec![second]);
    assert_eq!(res.tubes(), &[second]);
    assert_eq!(backend.live_tubes.len(), 1);
}

#[test]
fn rings_track_live_pulses() {
    let mut s = session();
    let mut backend = CountingBackend::default();
    let mut res = FrameResources::new();
    let mut t = move_in_circle(&mut s, &mut backend, &mut res, 0.0, 10);
    let mut max_rings = 0;
    for _ in 0..400 {
        t += FRAME_MS;
        s.frame(t, &mut backend, &mut res);
        assert_eq!(res.rings().len(), s.pulses().live().len());
        assert_eq!(backend.live_rings.len(), res.rings().len());
        max_rings = max_rings.max(res.rings().len());
    }
    assert!(max_rings >= 1);
    assert!(backend.rings_released > 0);
    let visual = backend.last_ring_visual.expect("rings were updated");
    assert!(visual.scale >= 1.0 && visual.opacity <= 1.0);
}

#[test]
fn teardown_releases_everything() {
    let mut s = session();
    let mut backend = CountingBackend::default();
    let mut res = FrameResources::new();
    let mut t = move_in_circle(&mut s, &mut backend, &mut res, 0.0, 40);
    // idle long enough for a ring to exist
    for _ in 0..80 {
        t += FRAME_MS;
        s.frame(t, &mut backend, &mut res);
    }
    assert!(!res.tubes().is_empty() || !res.rings().is_empty());

    s.push_event(InputEvent::Move(circle_point(3)));
    s.teardown(&mut backend, &mut res);
    assert!(res.tubes().is_empty());
    assert!(res.rings().is_empty());
    assert!(backend.live_tubes.is_empty());
    assert!(backend.live_rings.is_empty());
    assert_eq!(backend.tubes_created, backend.tubes_released);
    assert_eq!(backend.rings_created, backend.rings_released);
    assert!(!s.pointer().idle_timer().is_pending());
    assert!(s.pulses().live().is_empty());

    // the queued move was dropped
    s.step(t + FRAME_MS);
    assert_ne!(s.pointer().current_position(), circle_point(3));
}
