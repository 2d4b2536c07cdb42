// Host-side tests for idle pulses and the idle timer.

use glam::Vec3;
use trail_core::*;

#[test]
fn progress_stays_in_unit_interval_and_retires_at_duration() {
    let dur = PulseParams::default().duration_ms;
    let mut prev_scale = f32::MIN;
    let mut prev_opacity = f32::MAX;
    let mut age = 0.0;
    while age < dur {
        let p = pulse_progress(age, dur).expect("live pulse");
        assert!((0.0..1.0).contains(&p));
        let scale = pulse_scale(p, PulseParams::default().max_radius);
        let opacity = pulse_opacity(p);
        assert!(scale >= prev_scale);
        assert!(opacity <= prev_opacity);
        assert!(scale >= 1.0 && opacity > 0.0);
        prev_scale = scale;
        prev_opacity = opacity;
        age += 7.5;
    }
    assert_eq!(pulse_progress(dur, dur), None);
    assert_eq!(pulse_progress(dur + 1.0, dur), None);
}

#[test]
fn scale_and_opacity_endpoints() {
    assert_eq!(pulse_scale(0.0, 3.0), 1.0);
    assert!((pulse_scale(0.5, 3.0) - 2.5).abs() < 1e-6);
    assert_eq!(pulse_opacity(0.0), 1.0);
    assert!((pulse_opacity(0.75) - 0.25).abs() < 1e-6);
}

#[test]
fn spawns_only_when_idle_and_visible() {
    let mut m = PulseManager::new(PulseParams::default());
    let head = Some(Vec3::new(0.5, 0.5, 0.0));
    assert!(m.update(0.0, false, 1.0, 0.9, head).is_none());
    assert!(m.update(0.0, true, 0.5, 0.9, head).is_none());
    assert!(m.update(0.0, true, 0.9, 0.9, head).is_none());
    assert!(m.live().is_empty());

    let spawned = m.update(10.0, true, 1.0, 0.9, head).expect("first idle frame spawns");
    assert_eq!(spawned.position, Vec3::new(0.5, 0.5, 0.0));
    assert_eq!(m.live().len(), 1);
}

#[test]
fn spawn_interval_and_retirement() {
    let params = PulseParams::default();
    let mut m = PulseManager::new(params);
    let head = Some(Vec3::ZERO);
    let mut spawn_times = Vec::new();
    let mut t = 0.0;
    while t < 5000.0 {
        if let Some(p) = m.update(t, true, 1.0, 0.9, head) {
            spawn_times.push(p.start_ms);
        }
        for p in m.live() {
            assert!(p.age_ms(t) < params.duration_ms);
        }
        t += 16.0;
    }
    assert!(spawn_times.len() >= 4);
    for w in spawn_times.windows(2) {
        assert!(w[1] - w[0] >= params.interval_ms);
    }
    // interval 1000, duration 1500: never more than two alive
    assert!(m.live().len() <= 2);
}

#[test]
fn visuals_follow_age() {
    let mut m = PulseManager::new(PulseParams::default());
    m.update(0.0, true, 1.0, 0.9, Some(Vec3::X));
    let v: Vec<PulseVisual> = m.visuals(750.0).collect();
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].position, Vec3::X);
    assert!((v[0].opacity - 0.5).abs() < 1e-6);
    assert!((v[0].scale - 2.5).abs() < 1e-6);
    m.clear();
    assert_eq!(m.visuals(800.0).count(), 0);
}

#[test]
fn no_head_means_no_pulse() {
    let mut m = PulseManager::new(PulseParams::default());
    assert!(m.update(0.0, true, 1.0, 0.9, None).is_none());
    assert!(m.live().is_empty());
}

#[test]
fn idle_timer_fires_once_and_rearms() {
    let mut timer = IdleTimer::default();
    assert!(!timer.poll(0.0));
    timer.arm(0.0, 1000.0);
    assert!(timer.is_pending());
    assert!(!timer.poll(999.0));
    assert!(timer.poll(1000.0));
    assert!(!timer.poll(2000.0));
    timer.arm(2000.0, 1000.0);
    timer.arm(2500.0, 1000.0);
    assert!(!timer.poll(3200.0));
    assert!(timer.poll(3500.0));
    timer.arm(0.0, 10.0);
    timer.clear();
    assert!(!timer.poll(100.0));
}

#[test]
fn pointer_ignores_non_finite_moves() {
    let mut p = PointerTracker::new(ScreenPoint::new(1.0, 2.0), 1000.0, 0.1);
    assert!(!p.on_move(ScreenPoint::new(f32::NAN, 3.0), 0.0));
    assert_eq!(p.current_position(), ScreenPoint::new(1.0, 2.0));
    assert!(!p.idle_timer().is_pending());
    assert!(p.on_move(ScreenPoint::new(4.0, 6.0), 0.0));
    assert!(p.idle_timer().is_pending());
}

#[test]
fn smoothed_velocity_blends_raw_displacement() {
    let mut p = PointerTracker::new(ScreenPoint::new(0.0, 0.0), 1000.0, 0.1);
    p.on_move(ScreenPoint::new(30.0, 40.0), 0.0);
    p.update_velocity(1.0);
    assert!((p.smoothed_velocity() - 5.0).abs() < 1e-5);
    // no motion: decays toward zero
    p.update_velocity(1.0);
    assert!((p.smoothed_velocity() - 4.5).abs() < 1e-5);
}
