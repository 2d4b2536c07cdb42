//! Mass-spring-damper chain integrator.
//!
//! Every node is pulled toward its target, coupled to its chain neighbors by
//! springs of `rest_length`, and damped. Integration is semi-implicit Euler:
//! velocity first, then position with the new velocity. The step size `h` is
//! 1 in per-frame mode; larger steps are split into sub-steps no longer than
//! [`MAX_SUBSTEP`], the largest step the default chain is stable at.

use crate::config::SpringParams;
use crate::state::Viewport;
use crate::strand::{PhysicsPoint, Strand};
use glam::Vec3;

pub const MAX_SUBSTEP: f32 = 1.0;

/// Number of sub-steps needed so none exceeds [`MAX_SUBSTEP`].
#[inline]
pub fn substep_count(h: f32) -> usize {
    if h.is_finite() && h > MAX_SUBSTEP {
        (h / MAX_SUBSTEP).ceil() as usize
    } else {
        1
    }
}

/// Restoring force on a node at `pos` from a neighbor at `neighbor`.
/// Coincident nodes give zero force.
#[inline]
pub fn neighbor_force(pos: Vec3, neighbor: Vec3, rest_length: f32, internal_stiffness: f32) -> Vec3 {
    let delta = pos - neighbor;
    let len = delta.length();
    delta.normalize_or_zero() * (len - rest_length) * -internal_stiffness
}

/// Net force on `chain[i]` given the world-space target for that node.
/// Neighbor positions are read from `positions`, the chain at step start.
#[inline]
pub fn node_force(
    positions: &[Vec3],
    i: usize,
    node: &PhysicsPoint,
    target: Option<Vec3>,
    params: &SpringParams,
) -> Vec3 {
    let mut force = Vec3::ZERO;
    if let Some(t) = target {
        force += (t - node.position) * params.stiffness;
    }
    let prev = i.checked_sub(1).and_then(|j| positions.get(j));
    let next = positions.get(i + 1);
    for n in prev.into_iter().chain(next) {
        force += neighbor_force(
            node.position,
            *n,
            params.rest_length,
            params.internal_stiffness,
        );
    }
    force - node.velocity * params.damping
}

/// Reusable integrator; holds the start-of-step position snapshot so a step
/// does not allocate once the buffer has grown to the trail length.
#[derive(Debug, Default)]
pub struct SpringIntegrator {
    snapshot: Vec<Vec3>,
}

impl SpringIntegrator {
    pub fn new(trail_length: usize) -> Self {
        Self {
            snapshot: Vec::with_capacity(trail_length),
        }
    }

    /// Advance one strand by a step of size `h`.
    pub fn step(&mut self, strand: &mut Strand, viewport: &Viewport, params: &SpringParams, h: f32) {
        if !(h.is_finite() && h > 0.0) {
            return;
        }
        let n = substep_count(h);
        let sub = h / n as f32;
        for _ in 0..n {
            self.substep(strand, viewport, params, sub);
        }
    }

    fn substep(&mut self, strand: &mut Strand, viewport: &Viewport, params: &SpringParams, h: f32) {
        self.snapshot.clear();
        self.snapshot.extend(strand.positions());

        let (targets, nodes) = strand.parts_mut();
        for (i, node) in nodes.iter_mut().enumerate() {
            let target = targets.get(i).map(|p| viewport.screen_to_world(*p));
            let force = node_force(&self.snapshot, i, node, target, params);
            node.velocity += force * h;
            node.position += node.velocity * h;
        }
    }
}
