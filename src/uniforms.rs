//! GPU uniform blocks for the mesh shader.
//!
//! Layouts mirror the `Scene` and `Object` structs in `shader.wgsl`. Every
//! field is a `vec4` or `mat4` so there is no implicit WGSL padding.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use crate::camera::Camera;
use crate::config::{CardConfig, LightConfig};
use crate::material::BandMaterial;

/// Per-frame camera and lighting.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
}

impl SceneUniforms {
    pub fn new(camera: &Camera, lights: &LightConfig) -> Self {
        let to_light = lights.directional_position.normalize_or_zero();
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            sky_color: lights.sky_color.extend(lights.hemisphere_intensity).to_array(),
            ground_color: lights.ground_color.extend(1.0).to_array(),
            light_dir: to_light.extend(0.0).to_array(),
            light_color: lights
                .directional_color
                .extend(lights.directional_intensity)
                .to_array(),
        }
    }
}

/// Per-object transform and material.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
    pub extra: [f32; 4],
}

impl ObjectUniforms {
    /// The band with `material`, texture tiled `uv_repeat` times.
    pub fn band(material: &BandMaterial, uv_repeat: Vec2) -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: material.color.extend(material.opacity).to_array(),
            params: [
                material.roughness,
                material.metalness,
                material.transmission,
                material.clearcoat,
            ],
            extra: [material.clearcoat_roughness, uv_repeat.x, uv_repeat.y, 0.0],
        }
    }

    /// The opaque card at `transform`.
    pub fn card(transform: Mat4, card: &CardConfig) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            color: card.color.extend(1.0).to_array(),
            params: [card.roughness, card.metalness, 0.0, 0.0],
            extra: [0.0, 1.0, 1.0, 0.0],
        }
    }

}
