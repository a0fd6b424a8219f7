//! Named shapes, animations, strategy presets and usage presets.
//!
//! Loaded from `dotgrid_config.json` with support for an environment variable
//! override.

use std::{
    collections::BTreeMap,
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

use crate::grid::{position_set, GridSize, PositionSet};
use crate::strategy::HalftoneStrategy;
use crate::usage::UsageSeriesParams;

pub const BUILTIN_DOTGRID_CONFIG: &str = include_str!("data/dotgrid_config.json");
pub const DOTGRID_CONFIG_ENV: &str = "DOTGRID_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DotgridConfig {
    pub grid_size: u32,
    pub shapes: BTreeMap<String, Vec<[i32; 2]>>,
    pub animations: BTreeMap<String, Vec<Vec<[i32; 2]>>>,
    pub strategies: BTreeMap<String, HalftoneStrategy>,
    pub usage: BTreeMap<String, UsageSeriesParams>,
}

impl Default for DotgridConfig {
    fn default() -> Self {
        let mut strategies = BTreeMap::new();
        strategies.insert("soft".to_string(), HalftoneStrategy::halo());
        let mut usage = BTreeMap::new();
        usage.insert("dashboard".to_string(), UsageSeriesParams::dashboard());
        usage.insert("card".to_string(), UsageSeriesParams::card());
        Self {
            grid_size: 5,
            shapes: BTreeMap::new(),
            animations: BTreeMap::new(),
            strategies,
            usage,
        }
    }
}

impl DotgridConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_DOTGRID_CONFIG)
                .expect("builtin dotgrid config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, DotgridConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| DotgridConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = DotgridConfig::from_json_str(&contents)?;
        Ok(config)
    }

    pub fn grid(&self) -> GridSize {
        GridSize::square(self.grid_size)
    }

    pub fn shape(&self, name: &str) -> Option<PositionSet> {
        self.shapes.get(name).map(|cells| position_set(cells.iter().copied()))
    }

    pub fn animation(&self, name: &str) -> Option<Vec<PositionSet>> {
        self.animations.get(name).map(|frames| {
            frames
                .iter()
                .map(|cells| position_set(cells.iter().copied()))
                .collect()
        })
    }

    pub fn strategy(&self, name: &str) -> Option<HalftoneStrategy> {
        self.strategies.get(name).copied()
    }

    pub fn usage_preset(&self, name: &str) -> Option<UsageSeriesParams> {
        self.usage.get(name).copied()
    }
}

#[derive(Debug, Error)]
pub enum DotgridConfigError {
    #[error("failed to parse dotgrid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read dotgrid config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the active configuration came from; `None` means the builtin copy.
#[derive(Debug, Clone)]
pub struct DotgridConfigMetadata {
    path: Option<PathBuf>,
}

impl DotgridConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load the configuration named by `DOTGRID_CONFIG_PATH`, falling back to the
/// builtin copy when the variable is unset or the file cannot be used.
pub fn load_dotgrid_config_from_env() -> (Arc<DotgridConfig>, DotgridConfigMetadata) {
    let override_path = env::var(DOTGRID_CONFIG_ENV).ok().map(PathBuf::from);
    load_dotgrid_config(override_path.as_deref())
}

pub fn load_dotgrid_config(path: Option<&Path>) -> (Arc<DotgridConfig>, DotgridConfigMetadata) {
    if let Some(path) = path {
        match DotgridConfig::from_file(path) {
            Ok(config) => {
                tracing::info!(
                    target: "dotgrid::config",
                    path = %path.display(),
                    "dotgrid_config.loaded=file"
                );
                return (
                    Arc::new(config),
                    DotgridConfigMetadata::new(Some(path.to_path_buf())),
                );
            }
            Err(err) => {
                tracing::warn!(
                    target: "dotgrid::config",
                    path = %path.display(),
                    error = %err,
                    "dotgrid_config.load_failed"
                );
            }
        }
    }

    let config = DotgridConfig::builtin();
    tracing::info!(target: "dotgrid::config", "dotgrid_config.loaded=builtin");
    (config, DotgridConfigMetadata::new(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::GradientDirection;

    #[test]
    fn builtin_config_parses() {
        let config = DotgridConfig::builtin();
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.shape("dot").map(|s| s.len()), Some(1));
        assert_eq!(config.animation("orbit").map(|f| f.len()), Some(8));
        assert_eq!(
            config.strategy("rim"),
            Some(HalftoneStrategy::Gradient {
                direction: GradientDirection::Outward
            })
        );
        assert_eq!(config.usage_preset("card"), Some(UsageSeriesParams::card()));
        assert_eq!(
            config.usage_preset("dashboard"),
            Some(UsageSeriesParams::dashboard())
        );
    }

    #[test]
    fn builtin_shapes_fit_the_grid() {
        let config = DotgridConfig::builtin();
        let grid = config.grid();
        for name in config.shapes.keys() {
            let shape = config.shape(name).unwrap();
            assert!(shape.iter().all(|c| grid.contains(*c)), "shape {name}");
        }
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = DotgridConfig::from_json_str(r#"{"grid_size": 3}"#).unwrap();
        assert_eq!(config.grid(), GridSize::square(3));
        assert_eq!(config.strategy("soft"), Some(HalftoneStrategy::halo()));
        assert_eq!(config.usage_preset("card"), Some(UsageSeriesParams::card()));
    }

    #[test]
    fn unknown_strategy_fails_to_load() {
        let err = DotgridConfig::from_json_str(r#"{"strategies": {"odd": {"type": "unknown"}}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unsupported halftone strategy 'unknown'"));
    }

    #[test]
    fn unreadable_file_falls_back_to_builtin() {
        let (config, metadata) =
            load_dotgrid_config(Some(Path::new("/nonexistent/dotgrid_config.json")));
        assert!(metadata.path().is_none());
        assert_eq!(config.grid_size, 5);
    }

    #[test]
    fn read_error_names_path() {
        let err = DotgridConfig::from_file(Path::new("/nonexistent/dotgrid.json")).unwrap_err();
        assert!(matches!(err, DotgridConfigError::Read { .. }));
    }
}
