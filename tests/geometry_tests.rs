// Host-side tests for tube geometry, radius mapping and palettes.

use glam::Vec3;
use trail_core::*;

fn line(n: usize) -> Vec<Vec3> {
    (0..n).map(|i| Vec3::new(i as f32 * 0.05, 0.0, 0.0)).collect()
}

#[test]
fn radius_endpoints_and_interpolation() {
    let t = TubeParams::default();
    assert!((tube_radius(&t, 0.0, 1.0) - t.radius_max).abs() < 1e-7);
    assert!((tube_radius(&t, 1.0, 1.0) - t.radius_min).abs() < 1e-7);
    let mid = (t.radius_min + t.radius_max) * 0.5;
    assert!((tube_radius(&t, 0.5, 1.0) - mid).abs() < 1e-7);
    assert!((tube_radius(&t, 0.0, 0.5) - t.radius_max * 0.5).abs() < 1e-7);
    // velocity factor clamps
    assert_eq!(velocity_factor(120.0, 60.0), 1.0);
    assert_eq!(velocity_factor(-3.0, 60.0), 0.0);
    assert!((velocity_factor(15.0, 60.0) - 0.25).abs() < 1e-7);
}

#[test]
fn tube_mesh_counts() {
    let params = TubeParams::default();
    let mesh = build_tube(&line(24), &params, 0.04).expect("tube");
    let rings = params.tubular_segments + 1;
    let ring_verts = params.radial_segments + 1;
    assert_eq!(mesh.vertices.len(), rings * ring_verts);
    assert_eq!(
        mesh.indices.len(),
        params.tubular_segments * params.radial_segments * 6
    );
    let max = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < max));
    assert_eq!(mesh.vertices[0].u, 0.0);
    assert_eq!(mesh.vertices[mesh.vertices.len() - 1].u, 1.0);
}

#[test]
fn tube_vertices_sit_at_the_radius() {
    let params = TubeParams::default();
    let pts = line(10);
    let mesh = build_tube(&pts, &params, 0.03).expect("tube");
    for v in &mesh.vertices {
        // straight line along x: distance from the axis is the radius
        let p = Vec3::from_array(v.position);
        let r = (p.y * p.y + p.z * p.z).sqrt();
        assert!((r - 0.03).abs() < 1e-4, "r = {r}");
        assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn degenerate_inputs_yield_no_tube() {
    let params = TubeParams::default();
    assert!(build_tube(&[], &params, 0.04).is_none());
    assert!(build_tube(&[Vec3::ONE], &params, 0.04).is_none());
    assert!(build_tube(&[Vec3::ZERO; 24], &params, 0.04).is_none());
    assert!(build_tube(&line(24), &params, f32::NAN).is_none());
}

#[test]
fn curve_passes_through_its_endpoints() {
    let pts = vec![
        Vec3::ZERO,
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(3.0, -1.0, 0.0),
    ];
    let c = CatmullRomCurve::new(&pts, 0.5).expect("curve");
    assert!(c.point_at(0.0).distance(pts[0]) < 1e-6);
    assert!(c.point_at(1.0).distance(pts[3]) < 1e-6);
    assert!(c.point_at(1.0 / 3.0).distance(pts[1]) < 1e-5);
    assert!(CatmullRomCurve::new(&pts[..1], 0.5).is_none());
}

#[test]
fn frames_stay_orthonormal_around_a_bend() {
    let pts: Vec<Vec3> = (0..16)
        .map(|i| {
            let a = i as f32 * 0.2;
            Vec3::new(a.cos(), a.sin(), 0.0)
        })
        .collect();
    let c = CatmullRomCurve::new(&pts, 0.5).expect("curve");
    for f in build_frames(&c, 33) {
        assert!(f.tangent.dot(f.normal).abs() < 1e-3);
        assert!(f.tangent.dot(f.binormal).abs() < 1e-3);
        assert!((f.normal.length() - 1.0).abs() < 1e-3);
    }
}

#[test]
fn coincident_nodes_keep_unit_normals() {
    // a snapped run at the start and a collapsed run at the end
    let mut pts = vec![Vec3::new(0.3, 0.2, 0.0); 6];
    pts.extend((0..12).map(|i| Vec3::new(0.3 + 0.05 * i as f32, 0.2, 0.0)));
    pts.extend(vec![Vec3::new(0.85, 0.2, 0.0); 6]);

    let c = CatmullRomCurve::new(&pts, 0.5).expect("curve");
    for f in build_frames(&c, 65) {
        assert!((f.tangent.length() - 1.0).abs() < 1e-3, "{f:?}");
        assert!((f.normal.length() - 1.0).abs() < 1e-3, "{f:?}");
        assert!((f.binormal.length() - 1.0).abs() < 1e-3, "{f:?}");
    }

    let mesh = build_tube(&pts, &TubeParams::default(), 0.05).expect("tube");
    for v in &mesh.vertices {
        let n = Vec3::from_array(v.normal);
        assert!((n.length() - 1.0).abs() < 1e-3, "{n}");
    }
}

#[test]
fn ring_mesh_counts() {
    let ring = build_ring(0.08, 0.1, 48);
    assert_eq!(ring.vertices.len(), 96);
    assert_eq!(ring.indices.len(), 48 * 6);
    let inner = Vec3::new(ring.vertices[0].position[0], ring.vertices[0].position[1], 0.0);
    assert!((inner.length() - 0.08).abs() < 1e-6);
}

#[test]
fn taper_alpha_endpoints() {
    assert!(taper_alpha(0.0).abs() < 1e-6);
    assert!(taper_alpha(1.0).abs() < 1e-6);
    assert!((taper_alpha(0.5) - 1.0).abs() < 1e-6);
    assert!(taper_alpha(0.25) > 0.0 && taper_alpha(0.25) < 1.0);
}

#[test]
fn gradient_endpoints() {
    let p = DEFAULT_PALETTES[0];
    assert!(gradient_color(&p, 0.0).distance(p.c1) < 1e-6);
    assert!(gradient_color(&p, 0.5).distance(p.c2) < 1e-6);
    assert!(gradient_color(&p, 1.0).distance(p.c3) < 1e-6);
    let quarter = gradient_color(&p, 0.25);
    assert!(quarter.distance(p.c1.lerp(p.c2, 0.5)) < 1e-6);
}

#[test]
fn palette_cycle_wraps() {
    let mut cycle = PaletteCycle::new(DEFAULT_PALETTES.to_vec());
    assert_eq!(cycle.index(), 0);
    for expected in [1, 2, 3, 0, 1] {
        cycle.advance();
        assert_eq!(cycle.index(), expected);
    }
    assert_eq!(cycle.current(), DEFAULT_PALETTES[1]);
}

#[test]
fn shaders_export_the_entry_points_the_renderer_uses() {
    for entry in ["fn vs_tube", "fn fs_tube"] {
        assert!(TUBE_WGSL.contains(entry), "tube.wgsl missing {entry}");
    }
    for entry in ["fn vs_ring", "fn fs_ring"] {
        assert!(RING_WGSL.contains(entry), "ring.wgsl missing {entry}");
    }
    for entry in [
        "fn vs_fullscreen",
        "fn fs_bright",
        "fn fs_blur",
        "fn fs_composite",
    ] {
        assert!(POST_WGSL.contains(entry), "post.wgsl missing {entry}");
    }
}

#[test]
fn vertex_layouts_match_shader_strides() {
    assert_eq!(std::mem::size_of::<TubeVertex>(), 28);
    assert_eq!(std::mem::size_of::<RingVertex>(), 8);
}
