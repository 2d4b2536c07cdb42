//! Procedural geometry: Catmull-Rom curve through the chain, rotation
//! minimizing frames, the swept tube, and the flat ring used for pulses.

use crate::config::TubeParams;
use glam::{Quat, Vec3};

/// Chains shorter than this cannot form a tube.
pub const MIN_TUBE_POINTS: usize = 2;
const DEGENERATE_LENGTH: f32 = 1e-5;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Length parameter, 0 at the tail and 1 at the head.
    pub u: f32,
}

#[derive(Clone, Debug, Default)]
pub struct TubeMesh {
    pub vertices: Vec<TubeVertex>,
    pub indices: Vec<u32>,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RingVertex {
    pub position: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct RingMesh {
    pub vertices: Vec<RingVertex>,
    pub indices: Vec<u32>,
}

#[inline]
pub fn velocity_factor(smoothed_velocity: f32, max_velocity: f32) -> f32 {
    if max_velocity <= 0.0 {
        return 1.0;
    }
    (smoothed_velocity / max_velocity).clamp(0.0, 1.0)
}

/// Faster pointer, thinner tube; scaled by visibility so the fade also thins.
#[inline]
pub fn tube_radius(params: &TubeParams, velocity_factor: f32, visibility: f32) -> f32 {
    let vf = velocity_factor.clamp(0.0, 1.0);
    (params.radius_max + (params.radius_min - params.radius_max) * vf) * visibility
}

#[derive(Clone, Debug)]
pub struct CatmullRomCurve<'a> {
    pts: &'a [Vec3],
    tension: f32,
}

impl<'a> CatmullRomCurve<'a> {
    /// `None` for fewer than two points.
    pub fn new(pts: &'a [Vec3], tension: f32) -> Option<Self> {
        (pts.len() >= MIN_TUBE_POINTS).then_some(Self { pts, tension })
    }

    pub fn point_at(&self, u: f32) -> Vec3 {
        let n = self.pts.len();
        let u = u.clamp(0.0, 1.0);
        let scaled = u * (n - 1) as f32;
        let i1 = (scaled.floor() as usize).min(n - 2);
        let t = scaled - i1 as f32;

        let i0 = i1.saturating_sub(1);
        let i2 = i1 + 1;
        let i3 = (i1 + 2).min(n - 1);

        catmull_rom(
            self.pts[i0],
            self.pts[i1],
            self.pts[i2],
            self.pts[i3],
            t,
            self.tension,
        )
    }

    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let eps = 1e-3;
        let a = self.point_at((u - eps).max(0.0));
        let b = self.point_at((u + eps).min(1.0));
        let d = b - a;
        // coincident control points leave only rounding noise
        if d.length_squared() < 1e-12 {
            Vec3::ZERO
        } else {
            d.normalize()
        }
    }

    /// Length of the control polygon; zero when all points coincide.
    pub fn polygon_length(&self) -> f32 {
        self.pts.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32, tension: f32) -> Vec3 {
    // Cubic Hermite form.
    let v0 = (p2 - p0) * tension;
    let v1 = (p3 - p1) * tension;

    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p1 * h00 + v0 * h10 + p2 * h01 + v1 * h11
}

#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

/// Coincident nodes give a zero tangent. Carry the nearest earlier tangent
/// forward, then the first valid one back over any leading run.
fn fill_zero_tangents(tangents: &mut [Vec3]) {
    let Some(first) = tangents.iter().copied().find(|t| *t != Vec3::ZERO) else {
        tangents.fill(Vec3::X);
        return;
    };
    let mut last = first;
    for t in tangents.iter_mut() {
        if *t == Vec3::ZERO {
            *t = last;
        } else {
            last = *t;
        }
    }
}

/// Parallel-transport frames at `samples` evenly spaced curve parameters.
pub fn build_frames(curve: &CatmullRomCurve<'_>, samples: usize) -> Vec<Frame> {
    let samples = samples.max(2);
    let mut tangents: Vec<Vec3> = (0..samples)
        .map(|i| curve.tangent_at(i as f32 / (samples - 1) as f32))
        .collect();
    fill_zero_tangents(&mut tangents);

    let mut frames = Vec::with_capacity(samples);
    let t0 = tangents[0];
    // Seed normal: the chain lives in the z = 0 plane, so Z is the natural
    // choice unless the tangent points along it.
    let mut n0 = Vec3::Z;
    if n0.dot(t0).abs() > 0.9 {
        n0 = Vec3::Y;
    }
    n0 = (n0 - t0 * n0.dot(t0)).normalize_or_zero();
    frames.push(Frame {
        tangent: t0,
        normal: n0,
        binormal: t0.cross(n0).normalize_or_zero(),
    });

    for i in 1..samples {
        let t_prev = tangents[i - 1];
        let t_cur = tangents[i];
        let prev = frames[i - 1];

        let mut n = prev.normal;
        let axis = t_prev.cross(t_cur);
        let axis_len = axis.length();
        if axis_len > 1e-8 {
            let angle = t_prev.dot(t_cur).clamp(-1.0, 1.0).acos();
            n = Quat::from_axis_angle(axis / axis_len, angle) * n;
        }
        let mut n_cur = (n - t_cur * n.dot(t_cur)).normalize_or_zero();
        if n_cur.length_squared() < 1e-10 {
            n_cur = prev.normal;
        }
        if n_cur.dot(prev.normal) < 0.0 {
            n_cur = -n_cur;
        }
        frames.push(Frame {
            tangent: t_cur,
            normal: n_cur,
            binormal: t_cur.cross(n_cur).normalize_or_zero(),
        });
    }
    frames
}

/// Sweep a circle of `radius` along a Catmull-Rom curve through `points`.
///
/// Returns `None` when the chain cannot form a tube: fewer than two points,
/// all points coincident, or a non-finite radius.
pub fn build_tube(points: &[Vec3], params: &TubeParams, radius: f32) -> Option<TubeMesh> {
    let curve = CatmullRomCurve::new(points, params.tension)?;
    if !radius.is_finite() || curve.polygon_length() < DEGENERATE_LENGTH {
        return None;
    }
    let tubular = params.tubular_segments.max(1);
    let radial = params.radial_segments.max(3);
    let rings = tubular + 1;
    let ring_verts = radial + 1;
    let frames = build_frames(&curve, rings);

    let mut vertices = Vec::with_capacity(rings * ring_verts);
    for (j, f) in frames.iter().enumerate() {
        let u = j as f32 / tubular as f32;
        let center = curve.point_at(u);
        for i in 0..ring_verts {
            let ang = i as f32 / radial as f32 * std::f32::consts::TAU;
            let dir = f.normal * ang.cos() + f.binormal * ang.sin();
            vertices.push(TubeVertex {
                position: (center + dir * radius).to_array(),
                normal: dir.to_array(),
                u,
            });
        }
    }
    if vertices.iter().any(|v| !v.position.iter().all(|c| c.is_finite())) {
        return None;
    }

    let mut indices = Vec::with_capacity(tubular * radial * 6);
    for j in 0..tubular {
        let ring0 = j * ring_verts;
        let ring1 = (j + 1) * ring_verts;
        for i in 0..radial {
            let a = (ring0 + i) as u32;
            let b = (ring1 + i) as u32;
            let c = (ring1 + i + 1) as u32;
            let d = (ring0 + i + 1) as u32;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    Some(TubeMesh { vertices, indices })
}

/// Flat annulus in the XY plane, unit scale; pulses scale it per instance.
pub fn build_ring(inner: f32, outer: f32, segments: usize) -> RingMesh {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(segments * 2);
    for i in 0..segments {
        let ang = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (s, c) = ang.sin_cos();
        vertices.push(RingVertex {
            position: [c * inner, s * inner],
        });
        vertices.push(RingVertex {
            position: [c * outer, s * outer],
        });
    }
    let mut indices = Vec::with_capacity(segments * 6);
    for i in 0..segments {
        let a = (i * 2) as u32;
        let b = a + 1;
        let c = (((i + 1) % segments) * 2) as u32;
        let d = c + 1;
        indices.extend_from_slice(&[a, b, c, b, d, c]);
    }
    RingMesh { vertices, indices }
}
