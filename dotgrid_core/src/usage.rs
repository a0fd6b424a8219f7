//! Usage series: a smoothed, connected column path synthesized from a usage
//! level and trend.
//!
//! Randomness is always injected. [`generate_usage_series_with_rng`] takes any
//! [`Rng`], [`generate_usage_series_seeded`] builds a `SmallRng` from a seed,
//! and [`generate_usage_series`] seeds from entropy for production callers.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::grid::{GridCoord, GridSize, PositionSet};
use crate::state_map::{halo_state_map, StateMap};

/// How far the random walk may stray from the base curve, scaled by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterScale {
    /// `max(2, round(level * 4))`
    Wide,
    /// `max(1, round(level * 2))`, used by the compact card layout.
    Narrow,
}

impl JitterScale {
    pub fn amplitude(self, level: f32) -> i32 {
        match self {
            JitterScale::Wide => ((level * 4.0).round() as i32).max(2),
            JitterScale::Narrow => ((level * 2.0).round() as i32).max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageSeriesParams {
    pub columns: u32,
    pub max_row: u32,
    /// Weight of the jittered target in the running exponential average.
    pub ease: f32,
    pub jitter: JitterScale,
    /// Weight of a column against its two neighbours in the tap-smoothing pass.
    pub center_weight: f32,
}

impl UsageSeriesParams {
    /// Dashboard smoothing with a caller-chosen grid.
    pub fn new(columns: u32, max_row: u32) -> Self {
        Self {
            columns,
            max_row,
            ..Self::dashboard()
        }
    }

    pub fn dashboard() -> Self {
        Self {
            columns: 23,
            max_row: 13,
            ease: 0.6,
            jitter: JitterScale::Wide,
            center_weight: 2.0,
        }
    }

    pub fn card() -> Self {
        Self {
            columns: 21,
            max_row: 12,
            ease: 0.45,
            jitter: JitterScale::Narrow,
            center_weight: 1.5,
        }
    }

    pub fn grid(&self) -> GridSize {
        GridSize::new(self.columns, self.max_row.saturating_add(1))
    }
}

impl Default for UsageSeriesParams {
    fn default() -> Self {
        Self::dashboard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSeries {
    heights: Vec<u32>,
    positions: PositionSet,
    grid: GridSize,
}

impl UsageSeries {
    /// One height per column, bottom-up.
    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    /// Path cells including gap-fill cells, y measured from the top row.
    pub fn positions(&self) -> &PositionSet {
        &self.positions
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Path cells as full, with a one-cell halo of mid cells.
    pub fn state_map(&self) -> StateMap {
        halo_state_map(&self.positions, self.grid)
    }
}

pub fn generate_usage_series(level: f32, trend: f32, params: &UsageSeriesParams) -> UsageSeries {
    let mut rng = SmallRng::from_entropy();
    generate_usage_series_with_rng(level, trend, params, &mut rng)
}

pub fn generate_usage_series_seeded(
    level: f32,
    trend: f32,
    params: &UsageSeriesParams,
    seed: u64,
) -> UsageSeries {
    let mut rng = SmallRng::seed_from_u64(seed);
    generate_usage_series_with_rng(level, trend, params, &mut rng)
}

pub fn generate_usage_series_with_rng<R: Rng + ?Sized>(
    level: f32,
    trend: f32,
    params: &UsageSeriesParams,
    rng: &mut R,
) -> UsageSeries {
    let level = clamp_input(level, 0.0, 1.0);
    let trend = clamp_input(trend, -1.0, 1.0);
    let max_row = params.max_row.min(i32::MAX as u32) as i32;

    let base = base_curve(level, trend, params.columns as usize, max_row);
    let walked = jitter_walk(&base, level, params, max_row, rng);
    let heights = tap_smooth(&walked, params.center_weight);
    let positions = path_positions(&heights, max_row);

    tracing::trace!(
        target: "dotgrid::usage",
        level,
        trend,
        columns = params.columns,
        cells = positions.len(),
        "usage_series.generated"
    );

    UsageSeries {
        heights: heights.into_iter().map(|h| h as u32).collect(),
        positions,
        grid: params.grid(),
    }
}

fn clamp_input(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(min, max)
    }
}

/// Rising curve whose slope follows the trend; a falling trend also droops the
/// last 40% of the series.
fn base_curve(level: f32, trend: f32, columns: usize, max_row: i32) -> Vec<i32> {
    let max_row_f = max_row as f32;
    (0..columns)
        .map(|c| {
            let t = if columns > 1 {
                c as f32 / (columns - 1) as f32
            } else {
                0.0
            };
            let tail_drop = if trend < 0.0 && t > 0.6 {
                trend.abs() * ((t - 0.6) / 0.4) * max_row_f * 0.6
            } else {
                0.0
            };
            let rise = level * (0.2 + 0.8 * t * t) * max_row_f;
            let slope = trend * t.powf(1.4) * max_row_f * 0.9;
            let height = rise + slope - tail_drop;
            height.round() as i32
        })
        .collect()
}

fn jitter_walk<R: Rng + ?Sized>(
    base: &[i32],
    level: f32,
    params: &UsageSeriesParams,
    max_row: i32,
    rng: &mut R,
) -> Vec<i32> {
    let Some(&first) = base.first() else {
        return Vec::new();
    };
    let amplitude = params.jitter.amplitude(level);
    let ease = params.ease.clamp(0.0, 1.0);
    let mut current = first.clamp(0, max_row);

    base.iter()
        .map(|&height| {
            let offset = rng.gen_range(-amplitude..=amplitude);
            let target = (height + offset).clamp(0, max_row);
            current = (current as f32 * (1.0 - ease) + target as f32 * ease).round() as i32;
            current
        })
        .collect()
}

fn tap_smooth(heights: &[i32], center_weight: f32) -> Vec<i32> {
    let weight = center_weight.max(0.0);
    let last = heights.len().saturating_sub(1);
    (0..heights.len())
        .map(|i| {
            let left = heights[i.saturating_sub(1)] as f32;
            let right = heights[(i + 1).min(last)] as f32;
            let center = heights[i] as f32;
            ((left + center * weight + right) / (2.0 + weight)).round() as i32
        })
        .collect()
}

/// One cell per column plus gap-fill: when the next column's row is more than
/// one away, this column also gets every row strictly between the two.
fn path_positions(heights: &[i32], max_row: i32) -> PositionSet {
    let rows: Vec<i32> = heights.iter().map(|h| max_row - h).collect();
    let mut positions: PositionSet = rows
        .iter()
        .enumerate()
        .map(|(column, &row)| GridCoord::new(column as i32, row))
        .collect();

    for (column, pair) in rows.windows(2).enumerate() {
        let (row, next) = (pair[0], pair[1]);
        if (next - row).abs() <= 1 {
            continue;
        }
        let step = (next - row).signum();
        let mut fill = row + step;
        while fill != next {
            positions.insert(GridCoord::new(column as i32, fill));
            fill += step;
        }
    }
    positions
}
