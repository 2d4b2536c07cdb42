// Shared fixtures for the host-side core tests.

#![allow(dead_code)]
use std::collections::BTreeSet;
use trail_core::*;

/// Backend that hands out integer ids and records every call.
#[derive(Default, Debug)]
pub struct CountingBackend {
    next_id: usize,
    pub live_tubes: BTreeSet<usize>,
    pub live_rings: BTreeSet<usize>,
    pub tubes_created: usize,
    pub tubes_released: usize,
    pub rings_created: usize,
    pub rings_released: usize,
    pub ring_updates: usize,
    pub last_materials: Vec<TubeMaterial>,
    pub palettes: Vec<Palette>,
    pub last_ring_visual: Option<PulseVisual>,
}

impl CountingBackend {
    fn id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

impl GeometryBackend for CountingBackend {
    type Tube = usize;
    type Ring = usize;

    fn create_tube(&mut self, mesh: &TubeMesh, material: &TubeMaterial) -> usize {
        assert!(!mesh.vertices.is_empty());
        let id = self.id();
        self.live_tubes.insert(id);
        self.tubes_created += 1;
        self.last_materials.push(*material);
        id
    }

    fn release_tube(&mut self, tube: usize) {
        assert!(self.live_tubes.remove(&tube), "tube {tube} released twice");
        self.tubes_released += 1;
    }

    fn create_ring(&mut self) -> usize {
        let id = self.id();
        self.live_rings.insert(id);
        self.rings_created += 1;
        id
    }

    fn update_ring(&mut self, ring: &mut usize, visual: &PulseVisual) {
        assert!(self.live_rings.contains(ring));
        self.ring_updates += 1;
        self.last_ring_visual = Some(*visual);
    }

    fn release_ring(&mut self, ring: usize) {
        assert!(self.live_rings.remove(&ring), "ring {ring} released twice");
        self.rings_released += 1;
    }

    fn set_palette(&mut self, palette: &Palette) {
        self.palettes.push(*palette);
    }
}

pub const FRAME_MS: f64 = 16.0;
pub const W: f32 = 1000.0;
pub const H: f32 = 1000.0;

pub fn session() -> TrailSession {
    TrailSession::new(TrailConfig::default(), W, H, 0.0).expect("default config is valid")
}

/// Point on a slow circle around the viewport center, one per frame.
pub fn circle_point(frame: usize) -> ScreenPoint {
    let a = frame as f32 * 0.15;
    ScreenPoint::new(W * 0.5 + 200.0 * a.cos(), H * 0.5 + 200.0 * a.sin())
}

/// Drive `frames` frames of circular motion starting at `t0`. Returns the
/// time of the last frame.
pub fn move_in_circle(
    s: &mut TrailSession,
    backend: &mut CountingBackend,
    res: &mut FrameResources<CountingBackend>,
    t0: f64,
    frames: usize,
) -> f64 {
    let mut t = t0;
    for i in 0..frames {
        t = t0 + i as f64 * FRAME_MS;
        s.push_event(InputEvent::Move(circle_point(i)));
        s.frame(t, backend, res);
    }
    t
}
