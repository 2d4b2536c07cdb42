use glam::Vec3;

/// Three-stop gradient applied along the tube, tail (`c1`) to head (`c3`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub c1: Vec3,
    pub c2: Vec3,
    pub c3: Vec3,
}

impl Palette {
    pub const fn new(c1: [f32; 3], c2: [f32; 3], c3: [f32; 3]) -> Self {
        Self {
            c1: Vec3::from_array(c1),
            c2: Vec3::from_array(c2),
            c3: Vec3::from_array(c3),
        }
    }
}

pub const DEFAULT_PALETTES: [Palette; 4] = [
    Palette::new([0.1, 0.6, 1.0], [0.6, 0.2, 1.0], [1.0, 0.3, 0.8]), // ice to magenta
    Palette::new([1.0, 0.35, 0.1], [1.0, 0.75, 0.2], [1.0, 1.0, 0.6]), // ember
    Palette::new([0.1, 1.0, 0.5], [0.1, 0.8, 0.9], [0.3, 0.4, 1.0]), // aurora
    Palette::new([1.0, 0.2, 0.3], [1.0, 0.5, 0.6], [1.0, 0.95, 0.95]), // rose
];

/// Color at length parameter `u` in [0, 1]: c1 -> c2 over the first half,
/// c2 -> c3 over the second.
#[inline]
pub fn gradient_color(palette: &Palette, u: f32) -> Vec3 {
    let u = u.clamp(0.0, 1.0);
    if u < 0.5 {
        palette.c1.lerp(palette.c2, u * 2.0)
    } else {
        palette.c2.lerp(palette.c3, (u - 0.5) * 2.0)
    }
}

/// Opacity along the tube: zero at both ends, full at the midpoint.
#[inline]
pub fn taper_alpha(u: f32) -> f32 {
    (std::f32::consts::PI * u.clamp(0.0, 1.0)).sin()
}

/// Externally cycled palette index.
#[derive(Clone, Debug)]
pub struct PaletteCycle {
    palettes: Vec<Palette>,
    index: usize,
}

impl PaletteCycle {
    pub fn new(palettes: Vec<Palette>) -> Self {
        Self { palettes, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn current(&self) -> Palette {
        self.palettes
            .get(self.index)
            .copied()
            .unwrap_or(DEFAULT_PALETTES[0])
    }

    /// Advance modulo the palette count and return the new palette.
    pub fn advance(&mut self) -> Palette {
        if !self.palettes.is_empty() {
            self.index = (self.index + 1) % self.palettes.len();
        }
        self.current()
    }
}
