//! Scene builder and runner

use std::path::PathBuf;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::assets::SceneAssets;
use crate::config::LanyardConfig;
use crate::error::RunError;
use crate::window::App;

/// Builder for the lanyard window.
///
/// ```ignore
/// Simulation::new()
///     .with_config_file("lanyard.json")
///     .run()?;
/// ```
#[derive(Debug, Default)]
pub struct Simulation {
    config: LanyardConfig,
    config_file: Option<PathBuf>,
}

impl Simulation {
    /// A scene with the default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` instead of the defaults.
    pub fn with_config(mut self, config: LanyardConfig) -> Self {
        self.config = config;
        self.config_file = None;
        self
    }

    /// Read the config from a JSON file when [`run`](Self::run) starts.
    /// A missing file means defaults; a malformed one is an error.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// The config that [`run`](Self::run) will use, reading the config
    /// file if one was given.
    pub fn resolve_config(&self) -> Result<LanyardConfig, RunError> {
        match &self.config_file {
            Some(path) => Ok(LanyardConfig::load_or_default(path)?),
            None => Ok(self.config.clone()),
        }
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), RunError> {
        let config = self.resolve_config()?;
        let assets = SceneAssets::load(&config.band, &config.card);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(config, assets);
        event_loop.run_app(&mut app)?;

        match app.take_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_config_is_used() {
        let mut config = LanyardConfig::default();
        config.rope.particle_count = 10;
        let sim = Simulation::new().with_config(config.clone());
        assert_eq!(sim.resolve_config().unwrap(), config);
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let sim = Simulation::new().with_config_file("no/such/lanyard.json");
        assert_eq!(sim.resolve_config().unwrap(), LanyardConfig::default());
    }

    #[test]
    fn test_malformed_config_file_is_error() {
        let path = std::env::temp_dir().join(format!("lanyard_sim_{}.json", std::process::id()));
        std::fs::write(&path, "{ rope: ").unwrap();
        let sim = Simulation::new().with_config_file(&path);
        assert!(matches!(sim.resolve_config(), Err(RunError::Config(_))));
        let _ = std::fs::remove_file(&path);
    }
}
