//! Core generators for dot-matrix visuals.
//!
//! Turns a sparse set of full cells into a three-level state map under one of
//! several halftone strategies, and synthesizes connected usage-series paths
//! that are rendered through the same neighbour halo logic.

pub mod config;
mod grid;
pub mod halftone;
mod neighbors;
mod state_map;
mod strategy;
pub mod strategy_text;
pub mod usage;

pub use config::{
    load_dotgrid_config, load_dotgrid_config_from_env, DotgridConfig, DotgridConfigError,
    DotgridConfigMetadata,
};
pub use grid::{centroid, position_set, GridCoord, GridSize, PositionSet};
pub use halftone::{generate_halftone_states, FrameHistory, MAX_TRAIL_FRAMES};
pub use neighbors::{neighbors_of, neighbors_of_set};
pub use state_map::{halo_state_map, DotState, StateEntry, StateMap};
pub use strategy::{GradientDirection, HalftoneError, HalftoneStrategy, StrategySpec};
pub use strategy_text::{parse_strategy, StrategyParseError};
pub use usage::{
    generate_usage_series, generate_usage_series_seeded, generate_usage_series_with_rng,
    JitterScale, UsageSeries, UsageSeriesParams,
};
