use crate::config::scaled_blend;

/// Fade scalar in [0, 1]: eases toward 0 while the pointer is outside the
/// viewport and toward 1 otherwise.
#[derive(Clone, Copy, Debug)]
pub struct Visibility {
    value: f32,
    blend: f32,
}

impl Visibility {
    pub fn new(initial: f32, blend: f32) -> Self {
        Self {
            value: initial.clamp(0.0, 1.0),
            blend,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn update(&mut self, outside_viewport: bool, h: f32) -> f32 {
        let target = if outside_viewport { 0.0 } else { 1.0 };
        let alpha = scaled_blend(self.blend, h).clamp(0.0, 1.0);
        self.value += (target - self.value) * alpha;
        self.value
    }
}
