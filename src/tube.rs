//! Tube extrusion along the band curve.
//!
//! A circle of fixed radius is swept along a [`CatmullRomCurve`], oriented
//! by rotation-minimising frames so the surface does not twist as the band
//! swings. The mesh is rebuilt from scratch every frame; building is a pure
//! function of the curve and [`TubeParams`].

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::config::BandConfig;
use crate::curve::{CatmullRomCurve, CurveKind};

/// GPU vertex layout for meshes (band and card share it).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// Resolution and size of the extruded tube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeParams {
    pub radius: f32,
    /// Segments along the curve.
    pub tubular_segments: u32,
    /// Segments around the circumference.
    pub radial_segments: u32,
    pub curve: CurveKind,
}

impl TubeParams {
    /// Resolution for a chain of `particle_count` particles.
    ///
    /// Depends only on the particle count, so it is the same every frame.
    pub fn for_particle_count(particle_count: usize, band: &BandConfig) -> Self {
        let per_particle = particle_count as u32 * band.tubular_segments_per_particle;
        Self {
            radius: band.radius,
            tubular_segments: per_particle.max(band.min_tubular_segments).max(1),
            radial_segments: band.radial_segments.max(3),
            curve: band.curve,
        }
    }

    /// Vertices produced by [`TubeMesh::build`].
    pub fn vertex_count(&self) -> usize {
        (self.tubular_segments as usize + 1) * (self.radial_segments as usize + 1)
    }

    /// Indices produced by [`TubeMesh::build`].
    pub fn index_count(&self) -> usize {
        6 * self.tubular_segments as usize * self.radial_segments as usize
    }
}

impl Default for TubeParams {
    fn default() -> Self {
        Self::for_particle_count(36, &BandConfig::default())
    }
}

/// Orthonormal frames sampled along a curve.
#[derive(Debug, Clone)]
pub struct Frames {
    pub tangents: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
}

impl Frames {
    /// Parallel-transport frames at `segments + 1` evenly spaced arc lengths.
    pub fn along(curve: &CatmullRomCurve, segments: u32) -> Self {
        let count = segments as usize + 1;
        let tangents: Vec<Vec3> = (0..count)
            .map(|i| curve.tangent_at(i as f32 / segments as f32))
            .collect();

        let mut normals = Vec::with_capacity(count);
        let mut binormals = Vec::with_capacity(count);

        let t0 = if tangents[0] == Vec3::ZERO { Vec3::NEG_Y } else { tangents[0] };
        let n0 = initial_normal(t0);
        normals.push(n0);
        binormals.push(t0.cross(n0));

        for i in 1..count {
            let prev_t = tangents[i - 1];
            let cur_t = tangents[i];
            let mut normal = normals[i - 1];

            let axis = prev_t.cross(cur_t);
            if axis.length() > f32::EPSILON {
                let angle = prev_t.dot(cur_t).clamp(-1.0, 1.0).acos();
                normal = Quat::from_axis_angle(axis.normalize(), angle) * normal;
            }
            // acos loses precision near 1; keep the normal perpendicular.
            let projected = (normal - cur_t * cur_t.dot(normal)).normalize_or_zero();
            if projected != Vec3::ZERO {
                normal = projected;
            }

            let binormal = if cur_t == Vec3::ZERO {
                binormals[i - 1]
            } else {
                cur_t.cross(normal)
            };
            normals.push(normal);
            binormals.push(binormal);
        }

        Self {
            tangents,
            normals,
            binormals,
        }
    }
}

/// A normal perpendicular to `tangent`, built from the world axis the
/// tangent is least aligned with.
fn initial_normal(tangent: Vec3) -> Vec3 {
    let abs = tangent.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let side = tangent.cross(axis).normalize();
    tangent.cross(side)
}

/// Indexed triangle mesh of the band surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl TubeMesh {
    /// Extrude a tube along `curve`.
    pub fn build(curve: &CatmullRomCurve, params: &TubeParams) -> Self {
        let tubular = params.tubular_segments.max(1);
        let radial = params.radial_segments.max(3);
        let frames = Frames::along(curve, tubular);

        let mut vertices = Vec::with_capacity(params.vertex_count());
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32;
            let center = curve.point_at(u);
            let n = frames.normals[i as usize];
            let b = frames.binormals[i as usize];

            for j in 0..=radial {
                let v = j as f32 / radial as f32 * std::f32::consts::TAU;
                let sin = v.sin();
                let cos = -v.cos();
                let normal = (n * cos + b * sin).normalize_or_zero();
                let position = center + normal * params.radius;
                vertices.push(MeshVertex::new(position, normal, [u, j as f32 / radial as f32]));
            }
        }

        let ring = radial + 1;
        let mut indices = Vec::with_capacity(params.index_count());
        for j in 1..=tubular {
            for i in 1..=radial {
                let a = ring * (j - 1) + (i - 1);
                let b = ring * j + (i - 1);
                let c = ring * j + i;
                let d = ring * (j - 1) + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// Spline + extrude in one call: the band surface for a set of particle
/// positions.
pub fn build_band_mesh(positions: &[Vec3], params: &TubeParams) -> TubeMesh {
    let curve = CatmullRomCurve::new(positions.to_vec(), params.curve);
    TubeMesh::build(&curve, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TubeParams {
        TubeParams {
            radius: 0.05,
            tubular_segments: 16,
            radial_segments: 8,
            curve: CurveKind::Centripetal,
        }
    }

    fn arc() -> Vec<Vec3> {
        (0..8)
            .map(|i| {
                let a = i as f32 * 0.3;
                Vec3::new(a.sin(), 2.0 - a.cos(), 0.1 * i as f32)
            })
            .collect()
    }

    #[test]
    fn test_counts() {
        let p = params();
        let mesh = build_band_mesh(&arc(), &p);
        assert_eq!(mesh.vertex_count(), 17 * 9);
        assert_eq!(mesh.index_count(), 6 * 16 * 8);
        assert_eq!(mesh.vertex_count(), p.vertex_count());
        let max = *mesh.indices.iter().max().unwrap() as usize;
        assert!(max < mesh.vertex_count());
    }

    #[test]
    fn test_vertices_lie_on_radius() {
        let pts = arc();
        let curve = CatmullRomCurve::new(pts, CurveKind::Centripetal);
        let p = params();
        let mesh = TubeMesh::build(&curve, &p);
        for i in 0..=p.tubular_segments {
            let center = curve.point_at(i as f32 / p.tubular_segments as f32);
            for j in 0..=p.radial_segments {
                let v = &mesh.vertices[(i * (p.radial_segments + 1) + j) as usize];
                let d = Vec3::from(v.position).distance(center);
                assert!((d - p.radius).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_frames_are_orthonormal() {
        let curve = CatmullRomCurve::new(arc(), CurveKind::Centripetal);
        let frames = Frames::along(&curve, 24);
        for i in 0..frames.tangents.len() {
            let (t, n, b) = (frames.tangents[i], frames.normals[i], frames.binormals[i]);
            assert!(t.dot(n).abs() < 1e-3);
            assert!(t.dot(b).abs() < 1e-3);
            assert!((n.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build_band_mesh(&arc(), &params());
        let b = build_band_mesh(&arc(), &params());
        assert_eq!(a, b);
    }

    #[test]
    fn test_segments_scale_with_particles() {
        let band = BandConfig::default();
        assert_eq!(TubeParams::for_particle_count(36, &band).tubular_segments, 108);
        assert_eq!(TubeParams::for_particle_count(4, &band).tubular_segments, 32);
    }

    #[test]
    fn test_collapsed_chain_builds_finite_mesh() {
        let mesh = build_band_mesh(&[Vec3::ONE; 5], &params());
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.is_finite())));
    }
}
