//! Tunable configuration for the lanyard scene.
//!
//! Every constant that only affects the feel of the simulation (damping,
//! relaxation passes, easing factors, material presets) lives here rather
//! than in the code that uses it. Configurations serialize to JSON so a
//! tweaked setup can be saved and passed to the binary:
//!
//! ```ignore
//! let mut config = LanyardConfig::default();
//! config.rope.damping = 0.97;
//! config.save("soft.json")?;
//!
//! // later
//! let config = LanyardConfig::load("soft.json")?;
//! ```
//!
//! Missing fields fall back to their defaults, so partial files are fine.

use std::fs;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::curve::CurveKind;
use crate::error::ConfigError;
use crate::material::BandMaterial;

/// Complete scene configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LanyardConfig {
    pub rope: RopeConfig,
    pub band: BandConfig,
    pub card: CardConfig,
    pub interaction: InteractionConfig,
    pub camera: CameraConfig,
    pub lights: LightConfig,
    pub window: WindowConfig,
}

impl LanyardConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load `path` if it exists, otherwise use the defaults.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            log::warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Chain simulation parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RopeConfig {
    /// Number of particles in the band (at least 2).
    pub particle_count: usize,
    /// Fixed world position of the top of the band.
    pub anchor: Vec3,
    /// Where the free end starts before the card is attached.
    pub initial_end: Vec3,
    /// Velocity retention per step (sub-unity).
    pub damping: f32,
    /// Constraint relaxation passes per frame.
    pub relaxation_iterations: usize,
    /// Constant acceleration applied to free particles.
    pub gravity: Vec3,
    /// Upper bound for the simulated time step in seconds.
    pub max_frame_delta: f32,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            particle_count: 36,
            anchor: Vec3::new(0.0, 2.4, 0.0),
            initial_end: Vec3::new(0.6, 0.2, 0.0),
            damping: 0.985,
            relaxation_iterations: 6,
            // Earth gravity scaled down so the band swings slowly.
            gravity: Vec3::new(0.0, -9.8 * 0.12, 0.0),
            max_frame_delta: 0.033,
        }
    }
}

/// Band geometry and appearance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BandConfig {
    /// Tube cross-section radius.
    pub radius: f32,
    /// Vertices around the tube circumference.
    pub radial_segments: u32,
    /// Longitudinal segments per simulated particle.
    pub tubular_segments_per_particle: u32,
    /// Lower bound on longitudinal segments.
    pub min_tubular_segments: u32,
    /// Parameterisation of the spline through the particles.
    pub curve: CurveKind,
    /// Image tiled along the band. Falls back to a gradient when missing.
    pub texture_path: PathBuf,
    /// Texture tiling along (u, v).
    pub uv_repeat: Vec2,
    /// Appearance while the card is not hovered.
    pub base_material: BandMaterial,
    /// Appearance while the card is hovered.
    pub glass_material: BandMaterial,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            radius: 0.05,
            radial_segments: 12,
            tubular_segments_per_particle: 3,
            min_tubular_segments: 32,
            curve: CurveKind::default(),
            texture_path: PathBuf::from("lanyard.png"),
            uv_repeat: Vec2::new(1.5, 1.0),
            base_material: BandMaterial::base(),
            glass_material: BandMaterial::glass(),
        }
    }
}

/// Card placement and fallback geometry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardConfig {
    /// JSON mesh file for the card. Falls back to a box when missing.
    pub mesh_path: PathBuf,
    /// Largest extent of a loaded mesh after normalisation.
    pub fit_size: f32,
    /// Initial position of a loaded card.
    pub position: Vec3,
    /// Initial yaw of a loaded card, in radians.
    pub rotation_y: f32,
    /// Height of the band attachment point above the card origin.
    pub attach_offset: f32,
    /// Box dimensions used when no mesh is available.
    pub placeholder_size: Vec3,
    /// Initial position of the placeholder box.
    pub placeholder_position: Vec3,
    /// Linear RGB base colour.
    pub color: Vec3,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            mesh_path: PathBuf::from("card.json"),
            fit_size: 1.6,
            position: Vec3::new(0.6, 0.05, 0.0),
            rotation_y: 0.12,
            attach_offset: 0.15,
            placeholder_size: Vec3::new(1.6, 1.0, 0.04),
            placeholder_position: Vec3::new(0.6, 0.0, 0.0),
            color: Vec3::ONE,
            metalness: 0.08,
            roughness: 0.4,
        }
    }
}

/// Easing factors for pointer interaction and card tilt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Blend toward the drag target per pointer move (0..1).
    pub drag_blend: f32,
    /// Yaw per radian of end-segment tilt.
    pub tilt_factor: f32,
    /// Blend toward the target yaw per frame (0..1).
    pub tilt_blend: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_blend: 0.35,
            tilt_factor: 0.14,
            tilt_blend: 0.08,
        }
    }
}

/// Perspective camera setup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 28.0,
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 1.6, 6.0),
            target: Vec3::ZERO,
        }
    }
}

/// Hemisphere + directional lighting.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub hemisphere_intensity: f32,
    pub directional_color: Vec3,
    pub directional_intensity: f32,
    /// Position the directional light shines from (toward the origin).
    pub directional_position: Vec3,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            sky_color: Vec3::ONE,
            ground_color: Vec3::splat(0x44 as f32 / 255.0),
            hemisphere_intensity: 1.0,
            directional_color: Vec3::ONE,
            directional_intensity: 1.1,
            directional_position: Vec3::new(-1.0, 3.0, 4.0),
        }
    }
}

/// Window setup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lanyard".into(),
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_values() {
        let config = LanyardConfig::default();
        assert_eq!(config.rope.particle_count, 36);
        assert_eq!(config.rope.relaxation_iterations, 6);
        assert!((config.rope.damping - 0.985).abs() < 1e-6);
        assert!((config.rope.gravity.y + 1.176).abs() < 1e-4);
        assert!((config.interaction.drag_blend - 0.35).abs() < 1e-6);
        assert_eq!(config.band.radial_segments, 12);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = LanyardConfig::default();
        config.rope.damping = 0.9;
        config.window.title = "Badge".into();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: LanyardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: LanyardConfig =
            serde_json::from_str(r#"{ "rope": { "particle_count": 12 } }"#).unwrap();
        assert_eq!(parsed.rope.particle_count, 12);
        assert_eq!(parsed.rope.relaxation_iterations, 6);
        assert_eq!(parsed.card, CardConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("lanyard_config_test.json");
        let mut config = LanyardConfig::default();
        config.interaction.tilt_factor = 0.2;
        config.save(&path).unwrap();

        let loaded = LanyardConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = LanyardConfig::load_or_default("definitely/not/here.json").unwrap();
        assert_eq!(config, LanyardConfig::default());
    }
}
