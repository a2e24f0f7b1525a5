//! CPU-side textures for the band.
//!
//! Textures are plain RGBA8 pixel buffers plus sampling settings; the
//! renderer uploads them once at startup. The band uses either an image
//! loaded from disk or the procedural gradient from
//! [`TextureConfig::band_gradient`], which is also the hover texture.

use std::path::Path;

use crate::error::AssetError;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering.
    Nearest,
}

/// Address mode for texture wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to edge color (default).
    #[default]
    ClampToEdge,
    /// Repeat/tile the texture.
    Repeat,
    /// Mirror the texture at boundaries.
    MirrorRepeat,
}

/// An RGBA8 image with sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

/// Gradient start colour (#ff3b3b).
pub const GRADIENT_START: [u8; 4] = [0xff, 0x3b, 0x3b, 0xff];
/// Gradient end colour (#ff8a00).
pub const GRADIENT_END: [u8; 4] = [0xff, 0x8a, 0x00, 0xff];

const GRADIENT_WIDTH: u32 = 512;
const GRADIENT_HEIGHT: u32 = 32;
const GRADIENT_SPECKS: u32 = 2000;
const GRADIENT_SPECK_ALPHA: f32 = 0.05;
const GRADIENT_SEED: u32 = 0x1a7a;

impl TextureConfig {
    /// Load an image file (PNG or JPEG) as a repeating texture.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::Repeat,
        })
    }

    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// A 1x1 solid colour.
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            data: vec![r, g, b, a],
            width: 1,
            height: 1,
            filter: FilterMode::Nearest,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    /// Horizontal gradient from `start` to `end`, `height` rows tall.
    pub fn gradient(width: u32, height: u32, start: [u8; 4], end: [u8; 4]) -> Self {
        let mut row = Vec::with_capacity((width * 4) as usize);
        for x in 0..width {
            let t = x as f32 / (width - 1).max(1) as f32;
            for c in 0..4 {
                row.push(lerp_u8(start[c], end[c], t));
            }
        }
        let data = row.repeat(height as usize);
        Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    /// The red-to-orange band texture with faint specks.
    ///
    /// Always produces the same pixels, so it can stand in for a missing
    /// lanyard image without visible differences between runs.
    pub fn band_gradient() -> Self {
        let mut tex = Self::gradient(GRADIENT_WIDTH, GRADIENT_HEIGHT, GRADIENT_START, GRADIENT_END)
            .with_address_mode(AddressMode::Repeat);

        for i in 0..GRADIENT_SPECKS {
            let x = hash_noise(i, 0, GRADIENT_SEED) as u32 * GRADIENT_WIDTH / 256;
            let y = hash_noise(i, 1, GRADIENT_SEED) as u32 * GRADIENT_HEIGHT / 256;
            let shade = hash_noise(i, 2, GRADIENT_SEED);
            let idx = ((y * GRADIENT_WIDTH + x) * 4) as usize;
            for c in 0..3 {
                tex.data[idx + c] = lerp_u8(tex.data[idx + c], shade, GRADIENT_SPECK_ALPHA);
            }
        }
        tex
    }

    /// Read the RGBA value at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Linear interpolation of u8 values.
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round() as u8
}

/// Simple hash-based noise function.
fn hash_noise(x: u32, y: u32, seed: u32) -> u8 {
    let mut n = x.wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1013904223));
    n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    n = n ^ (n >> 16);
    (n & 255) as u8
}
