//! Scene configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `turtle.ron` file (if exists), or an explicit file passed with `--config`
//! 3. Environment variables prefixed with `TURTLE_`
//!
//! Example environment variable: `TURTLE_SCENE__TURTLE_SCALE=8`

use std::path::Path;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub scene: SceneConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub debug: DebugConfig,
}

/// What gets placed in the world on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Spawn position of the turtle's base
    pub turtle_position: [f32; 3],
    /// Uniform turtle scale; every body dimension derives from it
    pub turtle_scale: f32,
    /// Spawn position of the target ball
    pub ball_position: [f32; 3],
    pub ball_radius: f32,
    /// World gravity
    pub gravity: [f32; 3],
    /// Where the kinematic camera proxy sits
    pub camera_position: [f32; 3],
    pub wall: WallConfig,
}

impl SceneConfig {
    pub fn turtle_position(&self) -> Vec3 {
        Vec3::from_array(self.turtle_position)
    }

    pub fn ball_position(&self) -> Vec3 {
        Vec3::from_array(self.ball_position)
    }

    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            turtle_position: [-10.0, 5.0, 10.0],
            turtle_scale: 5.0,
            ball_position: [-20.0, 0.0, 20.0],
            ball_radius: 2.0,
            gravity: [0.0, -9.0, 0.0],
            camera_position: [0.0, 10.0, 20.0],
            wall: WallConfig::default(),
        }
    }
}

/// Block wall next to the turtle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallConfig {
    pub start: [f32; 3],
    /// Blocks per row
    pub width: u32,
    /// Number of rows
    pub height: u32,
    pub block_width: f32,
    pub block_height: f32,
    pub block_depth: f32,
}

impl WallConfig {
    pub fn start(&self) -> Vec3 {
        Vec3::from_array(self.start)
    }
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            start: [20.0, 0.0, 20.0],
            width: 10,
            height: 10,
            block_width: 2.0,
            block_height: 2.0,
            block_depth: 2.0,
        }
    }
}

/// Fixed-step loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds per tick
    pub timestep: f32,
    /// Ticks to run before exiting
    pub ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            ticks: 600,
        }
    }
}

/// Debug/development settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log head-aim values every tick (debug level)
    pub head_aim_diagnostics: bool,
    /// Enable verbose logging
    pub verbose_logging: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            head_aim_diagnostics: true,
            verbose_logging: false,
        }
    }
}

impl GameConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `turtle.ron` file (if exists)
    /// 3. Environment variables prefixed with `TURTLE_` (highest priority)
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("turtle")
                    .format(FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (TURTLE_SCENE__TURTLE_SCALE, etc.)
            .add_source(Self::environment());

        Self::finish(builder)
    }

    /// Same layering as `load`, but with an explicit config file that must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::from(path).format(FileFormat::Ron).required(true))
            .add_source(Self::environment());

        Self::finish(builder)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    // Layer 1: Compiled defaults, taken from the `Default` impls
    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let defaults = Config::try_from(&GameConfig::default())
            .context("Failed to convert default configuration")?;

        Ok(Config::builder().add_source(defaults))
    }

    fn environment() -> Environment {
        Environment::with_prefix("TURTLE")
            .prefix_separator("_")
            .separator("__")
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
