//! # Lanyard
//!
//! An ID card hanging from a flexible band that you can grab and drag.
//!
//! The band is a Verlet particle chain pinned at the top to a fixed anchor
//! and at the bottom to the card. Every frame the chain is integrated,
//! re-pinned and relaxed, then a smooth tube is extruded along a
//! Catmull-Rom curve through its particles and handed to the renderer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lanyard::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     env_logger::init();
//!     Simulation::new()
//!         .with_config_file("lanyard.json")
//!         .run()
//! }
//! ```
//!
//! ## Without a window
//!
//! The scene logic does not depend on wgpu. [`FrameDriver`] runs the whole
//! frame against any [`RenderSink`], which makes it easy to drive headless:
//!
//! ```ignore
//! let config = LanyardConfig::default();
//! let card = assets::placeholder_card(&config.card);
//! let mut driver = FrameDriver::new(config, card, false, (1280, 720));
//!
//! driver.handle_pointer(PointerEvent::press(Vec2::new(760.0, 380.0)));
//! driver.tick(1.0 / 60.0, &mut my_sink)?;
//! ```
//!
//! ## Modules
//!
//! | Concern | Modules |
//! |---------|---------|
//! | Band physics | [`rope`] |
//! | Band geometry | [`curve`], [`tube`] |
//! | Card and picking | [`card`], [`camera`], [`interaction`] |
//! | Frame loop | [`frame`], [`time`], [`input`] |
//! | Appearance | [`material`], [`textures`], [`shader`], [`uniforms`] |
//! | Setup | [`config`], [`assets`], [`error`] |
//! | Rendering | [`render`], [`gpu`] |

pub mod assets;
pub mod camera;
pub mod card;
pub mod config;
pub mod curve;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod input;
pub mod interaction;
pub mod material;
pub mod render;
pub mod rope;
pub mod shader;
mod simulation;
pub mod textures;
pub mod time;
pub mod tube;
pub mod uniforms;
mod window;

pub use bytemuck;
pub use glam::{Mat4, Vec2, Vec3};

pub use assets::SceneAssets;
pub use camera::{Camera, Ray};
pub use card::{Card, CardHit, CardMesh};
pub use config::LanyardConfig;
pub use curve::{CatmullRomCurve, CurveKind};
pub use error::{AssetError, ConfigError, GpuError, RunError};
pub use frame::FrameDriver;
pub use gpu::GpuState;
pub use input::{PointerEvent, PointerKind};
pub use interaction::{CursorHint, InteractionController, InteractionState};
pub use material::{BandMaterial, BandTexture};
pub use render::RenderSink;
pub use rope::{Particle, Rope};
pub use simulation::Simulation;
pub use time::FrameClock;
pub use tube::{build_band_mesh, MeshVertex, TubeMesh, TubeParams};

/// Common imports.
pub mod prelude {
    pub use crate::config::LanyardConfig;
    pub use crate::error::RunError;
    pub use crate::frame::FrameDriver;
    pub use crate::input::{PointerEvent, PointerKind};
    pub use crate::interaction::{CursorHint, InteractionState};
    pub use crate::material::BandMaterial;
    pub use crate::render::RenderSink;
    pub use crate::rope::Rope;
    pub use crate::simulation::Simulation;
    pub use crate::tube::TubeMesh;
    pub use crate::{Mat4, Vec2, Vec3};
}
