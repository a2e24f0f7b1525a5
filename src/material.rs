//! Band material parameters and the hover presets.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which texture the band samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BandTexture {
    /// The lanyard image, if it loaded.
    #[default]
    Lanyard,
    /// The procedural red-to-orange gradient.
    Gradient,
}

/// Material parameter set pushed to the renderer every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandMaterial {
    pub map: BandTexture,
    /// Linear RGB tint multiplied with the texture.
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    /// 0 = opaque surface, 1 = fully see-through glass.
    pub transmission: f32,
    pub opacity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

impl BandMaterial {
    /// Matte fabric look used while idle.
    pub fn base() -> Self {
        Self {
            map: BandTexture::Lanyard,
            color: Vec3::ONE,
            roughness: 0.6,
            metalness: 0.15,
            transmission: 0.0,
            opacity: 0.98,
            clearcoat: 0.4,
            clearcoat_roughness: 0.12,
        }
    }

    /// Glossy glass look used while the card is hovered.
    pub fn glass() -> Self {
        Self {
            map: BandTexture::Gradient,
            roughness: 0.06,
            transmission: 0.6,
            opacity: 0.96,
            ..Self::base()
        }
    }

    /// Replace a lanyard map with the gradient when no lanyard texture is
    /// available.
    pub fn resolved(mut self, lanyard_available: bool) -> Self {
        if self.map == BandTexture::Lanyard && !lanyard_available {
            self.map = BandTexture::Gradient;
        }
        self
    }
}

impl Default for BandMaterial {
    fn default() -> Self {
        Self::base()
    }
}
