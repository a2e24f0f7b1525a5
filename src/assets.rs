//! Startup asset loading with procedural fallbacks.
//!
//! Neither asset is required. A missing or broken band image is replaced
//! by the gradient texture, and a missing or broken card mesh by a thin
//! box. Failures are logged and never returned to the caller.

use std::fs;
use std::path::Path;

use glam::Vec3;

use crate::card::{Card, CardMesh, CardMeshFile};
use crate::config::{BandConfig, CardConfig};
use crate::error::AssetError;
use crate::textures::TextureConfig;

/// Everything the scene loads before the first frame.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    /// The lanyard image, if it loaded.
    pub band_texture: Option<TextureConfig>,
    /// Procedural gradient; the hover texture and the fallback band texture.
    pub gradient: TextureConfig,
    pub card: Card,
}

impl SceneAssets {
    /// Load the band texture and card described by the config.
    pub fn load(band: &BandConfig, card: &CardConfig) -> Self {
        let band_texture = match TextureConfig::from_file(&band.texture_path) {
            Ok(tex) => {
                log::info!(
                    "Loaded band texture {} ({}x{})",
                    band.texture_path.display(),
                    tex.width,
                    tex.height
                );
                Some(tex)
            }
            Err(e) => {
                log::warn!(
                    "Band texture {} unavailable ({}), using gradient",
                    band.texture_path.display(),
                    e
                );
                None
            }
        };

        Self {
            band_texture,
            gradient: TextureConfig::band_gradient(),
            card: load_card(card),
        }
    }

    /// Whether the lanyard image is available for the base material.
    pub fn has_band_texture(&self) -> bool {
        self.band_texture.is_some()
    }
}

/// Read and validate a JSON card mesh.
pub fn load_card_mesh(path: impl AsRef<Path>) -> Result<CardMesh, AssetError> {
    let json = fs::read_to_string(path)?;
    let file: CardMeshFile = serde_json::from_str(&json)?;
    CardMesh::from_file(&file).ok_or(AssetError::InvalidMesh)
}

/// The configured card mesh fitted to `fit_size`, or the placeholder box.
pub fn load_card(config: &CardConfig) -> Card {
    match load_card_mesh(&config.mesh_path) {
        Ok(mesh) => {
            log::info!("Loaded card mesh {}", config.mesh_path.display());
            Card::new(mesh.normalized(config.fit_size), config.position, config.rotation_y)
        }
        Err(e) => {
            log::warn!(
                "Card mesh {} unavailable ({}), using placeholder",
                config.mesh_path.display(),
                e
            );
            placeholder_card(config)
        }
    }
}

/// Thin box standing in for the card.
pub fn placeholder_card(config: &CardConfig) -> Card {
    Card::new(
        CardMesh::cuboid(config.placeholder_size),
        config.placeholder_position,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lanyard_assets_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_assets_fall_back() {
        let band = BandConfig {
            texture_path: PathBuf::from("missing/lanyard.png"),
            ..Default::default()
        };
        let card = CardConfig {
            mesh_path: PathBuf::from("missing/card.json"),
            ..Default::default()
        };
        let assets = SceneAssets::load(&band, &card);
        assert!(!assets.has_band_texture());
        assert_eq!(assets.card.position, Vec3::new(0.6, 0.0, 0.0));
        assert_eq!(assets.card.rotation_y, 0.0);
        assert_eq!(assets.card.mesh.vertices.len(), 24);
    }

    #[test]
    fn test_card_mesh_from_json() {
        let path = temp_path("card.json");
        fs::write(
            &path,
            r#"{ "positions": [[0,0,0],[2,0,0],[2,1,0],[0,1,0]], "indices": [0,1,2,0,2,3] }"#,
        )
        .unwrap();

        let config = CardConfig {
            mesh_path: path.clone(),
            ..Default::default()
        };
        let card = load_card(&config);
        let (min, max) = card.mesh.bounds();
        assert!((max.x - min.x - 1.6).abs() < 1e-5);
        assert_eq!(card.position, Vec3::new(0.6, 0.05, 0.0));
        assert!((card.rotation_y - 0.12).abs() < 1e-6);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_mesh_is_an_error() {
        let path = temp_path("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_card_mesh(&path), Err(AssetError::MeshParse(_))));

        fs::write(&path, r#"{ "positions": [[0,0,0]], "indices": [0,0,5] }"#).unwrap();
        assert!(matches!(load_card_mesh(&path), Err(AssetError::InvalidMesh)));
        let _ = fs::remove_file(&path);
    }
}
