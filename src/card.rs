//! The ID card: its mesh, placement and ray hit-testing.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::camera::Ray;
use crate::tube::MeshVertex;

const TRIANGLE_EPSILON: f32 = 1e-7;

/// Card geometry in card-local space.
#[derive(Debug, Clone, PartialEq)]
pub struct CardMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// On-disk card mesh: positions, triangle indices and optional uvs.
///
/// Normals are derived from the faces when the mesh is loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardMeshFile {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
}

impl CardMesh {
    /// Axis-aligned box centred on the origin.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        // (normal, u axis, v axis) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0f32, -1.0f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (normal + u * su + v * sv) * h;
                let uv = [(su + 1.0) * 0.5, (1.0 - sv) * 0.5];
                vertices.push(MeshVertex::new(p, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Build a renderable mesh from file data, deriving smooth normals.
    ///
    /// Returns `None` when the file has no triangles or references
    /// vertices that do not exist.
    pub fn from_file(file: &CardMeshFile) -> Option<Self> {
        let n = file.positions.len();
        if file.indices.len() < 3
            || file.indices.len() % 3 != 0
            || file.indices.iter().any(|&i| i as usize >= n)
        {
            return None;
        }

        let mut normals = vec![Vec3::ZERO; n];
        for tri in file.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = (file.positions[b] - file.positions[a]).cross(file.positions[c] - file.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        let vertices = file
            .positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let uv = file.uvs.get(i).copied().unwrap_or([0.0, 0.0]);
                MeshVertex::new(p, normals[i].normalize_or_zero(), uv)
            })
            .collect();

        Some(Self {
            vertices,
            indices: file.indices.clone(),
        })
    }

    /// Local-space bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| {
                let p = Vec3::from(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    /// Uniformly rescale so the largest extent equals `size`, and centre the
    /// bounds on the origin.
    pub fn normalized(mut self, size: f32) -> Self {
        let (min, max) = self.bounds();
        let extent = (max - min).max_element();
        if !extent.is_finite() || extent <= 0.0 {
            return self;
        }
        let scale = size / extent;
        let center = (min + max) * 0.5;
        for v in &mut self.vertices {
            let p = (Vec3::from(v.position) - center) * scale;
            v.position = p.to_array();
        }
        self
    }

    /// Closest intersection of a local-space ray with the mesh, as a ray
    /// parameter. The direction need not be unit length.
    pub fn intersect_local(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        self.indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let a = Vec3::from(self.vertices[tri[0] as usize].position);
                let b = Vec3::from(self.vertices[tri[1] as usize].position);
                let c = Vec3::from(self.vertices[tri[2] as usize].position);
                ray_triangle(origin, direction, a, b, c)
            })
            .min_by(|x, y| x.total_cmp(y))
    }
}

/// Möller–Trumbore ray/triangle test, double sided. Returns the ray
/// parameter of the hit.
fn ray_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < TRIANGLE_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// A hit on the card surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance along the ray.
    pub distance: f32,
}

/// The card as placed in the scene.
#[derive(Debug, Clone)]
pub struct Card {
    pub mesh: CardMesh,
    pub position: Vec3,
    /// Yaw in radians.
    pub rotation_y: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Card {
    pub fn new(mesh: CardMesh, position: Vec3, rotation_y: f32) -> Self {
        Self {
            mesh,
            position,
            rotation_y,
            scale: 1.0,
        }
    }

    /// Local-to-world transform.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            self.position,
        )
    }

    /// Where the band attaches: `offset` above the card origin.
    pub fn attach_point(&self, offset: f32) -> Vec3 {
        self.position + Vec3::new(0.0, offset, 0.0)
    }

    /// Intersect a world-space ray with the card surface.
    pub fn raycast(&self, ray: &Ray) -> Option<CardHit> {
        let inv = self.transform().inverse();
        let origin = inv.transform_point3(ray.origin);
        let direction = inv.transform_vector3(ray.direction);
        // Local and world share the ray parameter because the direction is
        // transformed without renormalising.
        self.mesh
            .intersect_local(origin, direction)
            .map(|t| CardHit {
                point: ray.at(t),
                distance: t,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card::new(CardMesh::cuboid(Vec3::new(1.6, 1.0, 0.04)), Vec3::new(0.6, 0.0, 0.0), 0.0)
    }

    #[test]
    fn test_cuboid_shape() {
        let mesh = CardMesh::cuboid(Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let (min, max) = mesh.bounds();
        assert_eq!(min, Vec3::new(-1.0, -0.5, -0.25));
        assert_eq!(max, Vec3::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_raycast_front_face() {
        let card = card();
        let ray = Ray::new(Vec3::new(0.6, 0.2, 5.0), Vec3::NEG_Z);
        let hit = card.raycast(&ray).expect("should hit");
        assert!((hit.point - Vec3::new(0.6, 0.2, 0.02)).length() < 1e-4);
        assert!((hit.distance - 4.98).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_miss() {
        let card = card();
        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(card.raycast(&ray).is_none());
        let behind = Ray::new(Vec3::new(0.6, 0.0, 5.0), Vec3::Z);
        assert!(card.raycast(&behind).is_none());
    }

    #[test]
    fn test_raycast_respects_rotation() {
        let mut card = card();
        card.rotation_y = std::f32::consts::FRAC_PI_2;
        // Rotated edge-on: the 1.6 wide face now spans z instead of x.
        let ray = Ray::new(Vec3::new(0.605, 0.1, 5.0), Vec3::NEG_Z);
        let hit = card.raycast(&ray).expect("edge-on card still has thickness");
        assert!((hit.point.z - 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_from_file_and_normalize() {
        let file = CardMeshFile {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(4.0, 2.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            uvs: Vec::new(),
        };
        let mesh = CardMesh::from_file(&file).unwrap().normalized(1.6);
        let (min, max) = mesh.bounds();
        assert!((max.x - min.x - 1.6).abs() < 1e-5);
        assert!((max.y - min.y - 0.8).abs() < 1e-5);
        assert!(((min + max) * 0.5).length() < 1e-5);
        assert!((Vec3::from(mesh.vertices[0].normal) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_from_file_rejects_bad_indices() {
        let file = CardMeshFile {
            positions: vec![Vec3::ZERO, Vec3::X],
            indices: vec![0, 1, 2],
            uvs: Vec::new(),
        };
        assert!(CardMesh::from_file(&file).is_none());
        assert!(CardMesh::from_file(&CardMeshFile::default()).is_none());
    }

    #[test]
    fn test_attach_point() {
        assert_eq!(card().attach_point(0.15), Vec3::new(0.6, 0.15, 0.0));
    }
}
