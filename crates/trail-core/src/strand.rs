use crate::state::Viewport;
use glam::Vec3;
use std::collections::VecDeque;

/// Pointer-space coordinates in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: ScreenPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// World-space state of one chain node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhysicsPoint {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// One independently simulated trail.
///
/// `target_path` and `physics_path` are index-aligned: index 0 is the tail
/// (oldest) and the last index is the head (newest). Both always hold exactly
/// `trail_length` elements.
#[derive(Clone, Debug)]
pub struct Strand {
    target_path: VecDeque<ScreenPoint>,
    physics_path: Vec<PhysicsPoint>,
}

impl Strand {
    /// Allocate a strand with every node parked at `at`.
    pub fn new(trail_length: usize, at: ScreenPoint, viewport: &Viewport) -> Self {
        let trail_length = trail_length.max(1);
        let mut target_path = VecDeque::with_capacity(trail_length);
        target_path.extend(std::iter::repeat(at).take(trail_length));
        let world = viewport.screen_to_world(at);
        let physics_path = vec![
            PhysicsPoint {
                position: world,
                velocity: Vec3::ZERO,
            };
            trail_length
        ];
        Self {
            target_path,
            physics_path,
        }
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.target_path.len(), self.physics_path.len());
        self.physics_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn target_path(&self) -> &VecDeque<ScreenPoint> {
        &self.target_path
    }

    pub fn physics_path(&self) -> &[PhysicsPoint] {
        &self.physics_path
    }

    pub(crate) fn parts_mut(&mut self) -> (&VecDeque<ScreenPoint>, &mut [PhysicsPoint]) {
        (&self.target_path, &mut self.physics_path)
    }

    pub fn head_target(&self) -> Option<ScreenPoint> {
        self.target_path.back().copied()
    }

    pub fn head_position(&self) -> Option<Vec3> {
        self.physics_path.last().map(|p| p.position)
    }

    /// Idle policy: every slot becomes the current head.
    pub fn collapse_to_head(&mut self) {
        if let Some(head) = self.head_target() {
            for slot in self.target_path.iter_mut() {
                *slot = head;
            }
        }
    }

    /// Active policy: drop the tail and push `p` as the new head.
    pub fn scroll(&mut self, p: ScreenPoint) {
        // capacity never grows: one out, one in
        self.target_path.pop_front();
        self.target_path.push_back(p);
        debug_assert_eq!(self.target_path.len(), self.physics_path.len());
    }

    /// Overwrite both paths with `p`, zeroing every velocity.
    pub fn snap(&mut self, p: ScreenPoint, viewport: &Viewport) {
        let world = viewport.screen_to_world(p);
        for slot in self.target_path.iter_mut() {
            *slot = p;
        }
        for node in self.physics_path.iter_mut() {
            node.position = world;
            node.velocity = Vec3::ZERO;
        }
    }

    /// Chain positions tail to head.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.physics_path.iter().map(|p| p.position)
    }
}
