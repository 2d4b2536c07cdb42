//! Per-frame render resources.
//!
//! The core never talks to a GPU directly. It hands meshes to a
//! [`GeometryBackend`] and keeps the returned handles in [`FrameResources`],
//! which is replaced wholesale every frame: the new tubes are acquired first,
//! then the previous frame's tubes are released. Pulse rings are reconciled
//! one by one so their count always equals the live pulse count.

use crate::geometry::TubeMesh;
use crate::palette::Palette;
use crate::pulse::PulseVisual;

/// Per-tube material parameters. The gradient colors themselves are shared
/// by every material and re-pointed through [`GeometryBackend::set_palette`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TubeMaterial {
    pub strand: usize,
    pub opacity: f32,
}

pub trait GeometryBackend {
    type Tube;
    type Ring;

    fn create_tube(&mut self, mesh: &TubeMesh, material: &TubeMaterial) -> Self::Tube;
    fn release_tube(&mut self, tube: Self::Tube);

    fn create_ring(&mut self) -> Self::Ring;
    fn update_ring(&mut self, ring: &mut Self::Ring, visual: &PulseVisual);
    fn release_ring(&mut self, ring: Self::Ring);

    /// Point every live material at a new gradient.
    fn set_palette(&mut self, palette: &Palette);
}

pub struct FrameResources<B: GeometryBackend> {
    tubes: Vec<B::Tube>,
    rings: Vec<B::Ring>,
}

impl<B: GeometryBackend> Default for FrameResources<B> {
    fn default() -> Self {
        Self {
            tubes: Vec::new(),
            rings: Vec::new(),
        }
    }
}

impl<B: GeometryBackend> FrameResources<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tubes(&self) -> &[B::Tube] {
        &self.tubes
    }

    pub fn rings(&self) -> &[B::Ring] {
        &self.rings
    }

    /// Install this frame's tubes and release the previous frame's.
    pub fn replace_tubes(&mut self, backend: &mut B, next: Vec<B::Tube>) {
        let previous = std::mem::replace(&mut self.tubes, next);
        for tube in previous {
            backend.release_tube(tube);
        }
    }

    /// Create or destroy rings until they match `visuals`, then update each.
    pub fn reconcile_rings(&mut self, backend: &mut B, visuals: &[PulseVisual]) {
        while self.rings.len() < visuals.len() {
            let ring = backend.create_ring();
            self.rings.push(ring);
        }
        while self.rings.len() > visuals.len() {
            if let Some(ring) = self.rings.pop() {
                backend.release_ring(ring);
            }
        }
        for (ring, visual) in self.rings.iter_mut().zip(visuals) {
            backend.update_ring(ring, visual);
        }
    }

    pub fn release_all(&mut self, backend: &mut B) {
        for tube in self.tubes.drain(..) {
            backend.release_tube(tube);
        }
        for ring in self.rings.drain(..) {
            backend.release_ring(ring);
        }
    }
}
