use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use dotgrid_core::{
    generate_halftone_states, generate_usage_series, generate_usage_series_seeded,
    load_dotgrid_config, load_dotgrid_config_from_env, parse_strategy, DotgridConfig,
    FrameHistory, GridCoord, GridSize, HalftoneStrategy, PositionSet, StateEntry, StateMap,
};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Dot-grid halftone preview", long_about = None)]
struct Cli {
    /// Configuration file; defaults to DOTGRID_CONFIG_PATH or the builtin presets.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print state entries as JSON instead of an ASCII grid.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a static shape under a halftone strategy.
    Shape {
        /// Named shape from the configuration.
        #[arg(long, conflicts_with = "cells")]
        name: Option<String>,
        /// Explicit cells, e.g. "2,2;1,2;3,2".
        #[arg(long)]
        cells: Option<String>,
        #[command(flatten)]
        strategy: StrategyArgs,
        /// Square grid size; defaults to the configured size.
        #[arg(long)]
        grid: Option<u32>,
    },
    /// Step through an animation, feeding earlier frames to the strategy.
    Animate {
        name: String,
        #[command(flatten)]
        strategy: StrategyArgs,
        #[arg(long, default_value_t = 1)]
        loops: u32,
    },
    /// Generate a usage series path with its halo.
    Usage {
        #[arg(long, allow_negative_numbers = true)]
        level: f32,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        trend: f32,
        #[arg(long, default_value = "dashboard")]
        preset: String,
        /// Seed for a reproducible series.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct StrategyArgs {
    /// Strategy in text form, e.g. "neighbors 1 orthogonal" or "trail 3".
    #[arg(long, conflicts_with = "preset")]
    strategy: Option<String>,
    /// Named strategy preset from the configuration.
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Serialize)]
struct FrameOutput {
    width: u32,
    height: u32,
    cells: Vec<StateEntry>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (config, metadata) = match cli.config.as_deref() {
        Some(path) => load_dotgrid_config(Some(path)),
        None => load_dotgrid_config_from_env(),
    };
    debug!(path = ?metadata.path(), "config.resolved");

    match cli.command {
        Command::Shape {
            name,
            cells,
            strategy,
            grid,
        } => {
            let full = match (name, cells) {
                (Some(name), _) => config
                    .shape(&name)
                    .ok_or_else(|| eyre!("unknown shape '{name}'"))?,
                (None, Some(cells)) => parse_cells(&cells)?,
                (None, None) => return Err(eyre!("either --name or --cells is required")),
            };
            let strategy = resolve_strategy(&config, &strategy, HalftoneStrategy::halo())?;
            let grid = grid.map(GridSize::square).unwrap_or_else(|| config.grid());
            let states = generate_halftone_states(&full, &strategy, grid, &[])?;
            print_frame(&states, grid, cli.json)?;
        }
        Command::Animate {
            name,
            strategy,
            loops,
        } => {
            let frames = config
                .animation(&name)
                .ok_or_else(|| eyre!("unknown animation '{name}'"))?;
            let strategy =
                resolve_strategy(&config, &strategy, HalftoneStrategy::Trail { length: 3 })?;
            let grid = config.grid();
            let mut history = FrameHistory::default();
            for _ in 0..loops.max(1) {
                for frame in &frames {
                    let states = generate_halftone_states(frame, &strategy, grid, history.frames())?;
                    print_frame(&states, grid, cli.json)?;
                    if !cli.json {
                        println!();
                    }
                    history.record(frame.clone());
                }
            }
            info!(frames = frames.len(), loops, %strategy, "animation.rendered");
        }
        Command::Usage {
            level,
            trend,
            preset,
            seed,
        } => {
            let params = config
                .usage_preset(&preset)
                .ok_or_else(|| eyre!("unknown usage preset '{preset}'"))?;
            let series = match seed {
                Some(seed) => generate_usage_series_seeded(level, trend, &params, seed),
                None => generate_usage_series(level, trend, &params),
            };
            debug!(heights = ?series.heights(), "usage.heights");
            print_frame(&series.state_map(), series.grid(), cli.json)?;
        }
    }

    Ok(())
}

fn resolve_strategy(
    config: &DotgridConfig,
    args: &StrategyArgs,
    fallback: HalftoneStrategy,
) -> Result<HalftoneStrategy> {
    if let Some(text) = &args.strategy {
        return Ok(parse_strategy(text)?);
    }
    if let Some(name) = &args.preset {
        return config
            .strategy(name)
            .ok_or_else(|| eyre!("unknown strategy preset '{name}'"));
    }
    Ok(fallback)
}

fn parse_cells(input: &str) -> Result<PositionSet> {
    input
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| -> Result<GridCoord> {
            let (x, y) = token
                .split_once(',')
                .ok_or_else(|| eyre!("cell '{token}' must be written as x,y"))?;
            Ok(GridCoord::new(x.trim().parse()?, y.trim().parse()?))
        })
        .collect()
}

fn print_frame(states: &StateMap, grid: GridSize, json: bool) -> Result<()> {
    if json {
        let output = FrameOutput {
            width: grid.width,
            height: grid.height,
            cells: states.entries(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", states.render(grid));
    }
    Ok(())
}
