//! Tunable settings, loadable from a TOML file.
//!
//! Every field has a default, so an empty (or missing) file gives the stock
//! behaviour. Values are checked by [`Config::validate`] after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::color::Palette;

/// Errors produced while loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub cube: CubeConfig,
    pub render: RenderConfig,
    pub terminal: TerminalConfig,
}

impl Config {
    /// Read and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cube = &self.cube;
        require_finite("cube.animation_seconds", cube.animation_seconds)?;
        require_finite("cube.camera_sensitivity", cube.camera_sensitivity)?;
        require_finite("cube.zoom_step", cube.zoom_step)?;
        require_finite("cube.min_scale", cube.min_scale)?;
        require_finite("cube.max_scale", cube.max_scale)?;
        require_finite("cube.initial_scale", cube.initial_scale)?;
        if !(cube.animation_seconds > 0.0 && cube.animation_seconds <= MAX_ANIMATION_SECONDS) {
            return Err(invalid(&format!(
                "cube.animation_seconds must lie in (0, {MAX_ANIMATION_SECONDS}]"
            )));
        }
        if cube.min_scale > cube.max_scale {
            return Err(invalid("cube.min_scale must not exceed cube.max_scale"));
        }
        if !(cube.min_scale..=cube.max_scale).contains(&cube.initial_scale) {
            return Err(invalid("cube.initial_scale must lie within [min_scale, max_scale]"));
        }

        let render = &self.render;
        for (name, values) in [
            ("render.cube_position", render.cube_position),
            ("render.camera_position", render.camera_position),
            ("render.lighting.direction", render.lighting.direction),
        ] {
            for value in values {
                require_finite(name, value)?;
            }
        }
        require_finite("render.focal_length", render.focal_length)?;
        require_finite("render.aspect_ratio", render.aspect_ratio)?;
        if !(render.focal_length > 0.0) {
            return Err(invalid("render.focal_length must be positive"));
        }
        if !(render.aspect_ratio > 0.0) {
            return Err(invalid("render.aspect_ratio must be positive"));
        }

        let lighting = &render.lighting;
        require_finite("render.lighting.ambient", lighting.ambient)?;
        require_finite("render.lighting.diffuse", lighting.diffuse)?;
        require_finite("render.lighting.min_brightness", lighting.min_brightness)?;
        require_finite("render.lighting.max_brightness", lighting.max_brightness)?;
        require_finite("render.lighting.highlight_threshold", lighting.highlight_threshold)?;
        require_finite("render.lighting.highlight_bonus", lighting.highlight_bonus)?;
        if lighting.min_brightness > lighting.max_brightness {
            return Err(invalid(
                "render.lighting.min_brightness must not exceed max_brightness",
            ));
        }

        if self.terminal.target_fps == 0 {
            return Err(invalid("terminal.target_fps must be positive"));
        }
        require_finite("terminal.camera_step", self.terminal.camera_step)?;
        Ok(())
    }
}

/// Longest accepted quarter-turn animation
pub const MAX_ANIMATION_SECONDS: f32 = 60.0;

fn require_finite(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be a finite number, got {value}")))
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}

/// Turn animation, camera drag and zoom behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    /// Length of one quarter-turn animation, in seconds
    pub animation_seconds: f32,
    /// Radians of camera rotation per unit of drag
    pub camera_sensitivity: f32,
    /// Scale change per unit of zoom input
    pub zoom_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub initial_scale: f32,
}

impl CubeConfig {
    pub fn animation_duration(&self) -> Duration {
        let seconds = self.animation_seconds.clamp(f32::EPSILON, MAX_ANIMATION_SECONDS);
        Duration::try_from_secs_f32(seconds).unwrap_or(Duration::from_secs_f32(0.3))
    }
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            animation_seconds: 0.3,
            camera_sensitivity: 0.01,
            zoom_step: 0.5,
            min_scale: 15.0,
            max_scale: 50.0,
            initial_scale: 25.0,
        }
    }
}

/// Camera, placement, lighting and colours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub cube_position: [f32; 3],
    pub camera_position: [f32; 3],
    pub focal_length: f32,
    /// Character cell height divided by width
    pub aspect_ratio: f32,
    /// Most distinct colour pairs the output surface can hold
    pub max_color_pairs: u16,
    pub lighting: LightingConfig,
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cube_position: [0.0, 0.0, 10.0],
            camera_position: [0.0, 0.0, 0.0],
            focal_length: 8.0,
            aspect_ratio: 2.0,
            max_color_pairs: 255,
            lighting: LightingConfig::default(),
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Direction toward the light; normalized on use
    pub direction: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub min_brightness: f32,
    pub max_brightness: f32,
    /// Faces lit more directly than this get `highlight_bonus` extra
    pub highlight_threshold: f32,
    pub highlight_bonus: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: [0.3, 0.5, -0.8],
            ambient: 0.7,
            diffuse: 0.7,
            min_brightness: 0.25,
            max_brightness: 1.2,
            highlight_threshold: 0.8,
            highlight_bonus: 0.2,
        }
    }
}

/// Host loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub target_fps: u32,
    pub min_width: u16,
    pub min_height: u16,
    pub scramble_moves: usize,
    /// Drag units sent per arrow key press
    pub camera_step: f32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            min_width: 80,
            min_height: 40,
            scramble_moves: 20,
            camera_step: 10.0,
        }
    }
}
