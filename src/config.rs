use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::flow::FlowParams;
use crate::state::{default_scene, SceneElement};
use crate::vec2::Vec2;

pub const DEFAULT_PATH: &str = "potflow.yaml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub domain: DomainConfig,
    pub flow: FlowConfig,
    pub display: DisplayConfig,
    pub scene: Vec<SceneElement>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub width: usize,
    pub height: usize,
    /// Window pixels per domain cell.
    pub cell_pixels: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub uniform_x: f64,
    pub uniform_y: f64,
    pub dt: f64,
    pub max_items: usize,
    pub refill_interval: u64,
    pub refill_threshold: f64,
    pub sink_radius: f64,
    pub dipole_radius: f64,
    pub seed_grid: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub target_fps: usize,
    pub arrow_cols: usize,
    pub arrow_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            flow: FlowConfig::default(),
            display: DisplayConfig::default(),
            scene: default_scene(),
        }
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            cell_pixels: 20,
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            uniform_x: 1.0,
            uniform_y: 0.0,
            dt: 0.002,
            max_items: 20,
            refill_interval: 20,
            refill_threshold: 0.1,
            sink_radius: 0.025,
            dipole_radius: 0.05,
            seed_grid: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            arrow_cols: 15,
            arrow_rows: 10,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.width == 0 {
            return Err(invalid("domain.width", "must be at least 1"));
        }
        if self.domain.height == 0 {
            return Err(invalid("domain.height", "must be at least 1"));
        }
        if self.domain.cell_pixels == 0 {
            return Err(invalid("domain.cell_pixels", "must be at least 1"));
        }
        let f = &self.flow;
        if !(f.dt.is_finite() && f.dt > 0.0) {
            return Err(invalid("flow.dt", format!("must be positive and finite, got {}", f.dt)));
        }
        if !(f.uniform_x.is_finite() && f.uniform_y.is_finite()) {
            return Err(invalid("flow.uniform_x", "uniform stream must be finite"));
        }
        if f.max_items == 0 {
            return Err(invalid("flow.max_items", "must be at least 1"));
        }
        if f.refill_interval == 0 {
            return Err(invalid("flow.refill_interval", "must be at least 1"));
        }
        if !f.refill_threshold.is_finite() {
            return Err(invalid("flow.refill_threshold", "must be finite"));
        }
        if f.sink_radius.is_nan() || f.sink_radius < 0.0 {
            return Err(invalid("flow.sink_radius", "must not be negative"));
        }
        if f.dipole_radius.is_nan() || f.dipole_radius < 0.0 {
            return Err(invalid("flow.dipole_radius", "must not be negative"));
        }
        if self.display.arrow_cols == 0 || self.display.arrow_rows == 0 {
            return Err(invalid("display.arrow_cols", "arrow grid must not be empty"));
        }
        for e in &self.scene {
            if !e.pos().in_unit_square() {
                return Err(invalid("scene", format!("{} at ({}, {}) lies outside the domain", e.kind.label(), e.x, e.y)));
            }
            if !e.strength.is_finite() {
                return Err(invalid("scene", format!("{} strength must be finite", e.kind.label())));
            }
        }
        Ok(())
    }

    pub fn to_flow_params(&self) -> FlowParams {
        FlowParams {
            width: self.domain.width,
            height: self.domain.height,
            uniform: Vec2::new(self.flow.uniform_x, self.flow.uniform_y),
            dt: self.flow.dt,
            max_items: self.flow.max_items,
            refill_interval: self.flow.refill_interval,
            refill_threshold: self.flow.refill_threshold,
            sink_radius: self.flow.sink_radius,
            dipole_radius: self.flow.dipole_radius,
        }
    }

    /// Window size in pixels: one `cell_pixels` square per domain cell.
    pub fn window_size(&self) -> (usize, usize) {
        (
            self.domain.width * self.domain.cell_pixels,
            self.domain.height * self.domain.cell_pixels,
        )
    }
}

/// Load `path` (or `potflow.yaml`). A missing default file means defaults;
/// any other failure is logged and also falls back to defaults.
pub fn load(path: Option<&str>) -> Config {
    let explicit = path.is_some();
    let path = PathBuf::from(path.unwrap_or(DEFAULT_PATH));
    if !explicit && !path.exists() {
        return Config::default();
    }
    match Config::from_path(&path) {
        Ok(cfg) => {
            log::info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
    }
}
