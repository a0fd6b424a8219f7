//! Whitespace-separated text form of [`HalftoneStrategy`]. Keywords are
//! case-insensitive; omitted arguments take the same defaults as the JSON form.
//!
//! ```text
//! neighbors [<distance>] [orthogonal]    neighbors 2 orthogonal
//! trail [<length>]                       trail 4
//! distance [<radius>]                    distance 1.5
//! gradient [outward|inward]              gradient inward
//! ```

use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use thiserror::Error;

use crate::strategy::{
    GradientDirection, HalftoneError, HalftoneStrategy, DEFAULT_NEIGHBOR_DISTANCE,
    DEFAULT_RADIUS, DEFAULT_TRAIL_LENGTH,
};

#[derive(Debug, Error)]
pub enum StrategyParseError {
    #[error("empty strategy")]
    Empty,
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("invalid float '{value}' for {context}: {source}")]
    InvalidFloat {
        value: String,
        context: &'static str,
        source: ParseFloatError,
    },
    #[error("invalid gradient direction '{0}'")]
    InvalidDirection(String),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error(transparent)]
    Strategy(#[from] HalftoneError),
}

pub fn parse_strategy(input: &str) -> Result<HalftoneStrategy, StrategyParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(StrategyParseError::Empty);
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts
        .next()
        .map(|v| v.to_ascii_lowercase())
        .ok_or(StrategyParseError::Empty)?;

    let strategy = match verb.as_str() {
        HalftoneStrategy::NEIGHBORS => {
            let mut distance = DEFAULT_NEIGHBOR_DISTANCE;
            let mut orthogonal_only = false;
            for token in parts.by_ref() {
                match token.to_ascii_lowercase().as_str() {
                    "orthogonal" => orthogonal_only = true,
                    _ => distance = parse_u32(token, "neighbors distance")?,
                }
            }
            HalftoneStrategy::Neighbors {
                orthogonal_only,
                distance,
            }
        }
        HalftoneStrategy::TRAIL => {
            let length = match parts.next() {
                Some(token) => parse_usize(token, "trail length")?,
                None => DEFAULT_TRAIL_LENGTH,
            };
            HalftoneStrategy::Trail { length }
        }
        HalftoneStrategy::DISTANCE => {
            let radius = match parts.next() {
                Some(token) => parse_f32(token, "distance radius")?,
                None => DEFAULT_RADIUS,
            };
            HalftoneStrategy::Distance { radius }
        }
        HalftoneStrategy::GRADIENT => {
            let direction = match parts.next() {
                Some(token) => parse_direction(token)?,
                None => GradientDirection::Outward,
            };
            HalftoneStrategy::Gradient { direction }
        }
        other => return Err(HalftoneError::UnsupportedStrategy(other.to_string()).into()),
    };

    if let Some(extra) = parts.next() {
        return Err(StrategyParseError::UnexpectedToken(extra.to_string()));
    }
    strategy.validate()?;
    Ok(strategy)
}

impl FromStr for HalftoneStrategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_strategy(s)
    }
}

fn parse_u32(value: &str, context: &'static str) -> Result<u32, StrategyParseError> {
    value
        .parse::<u32>()
        .map_err(|source| StrategyParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_usize(value: &str, context: &'static str) -> Result<usize, StrategyParseError> {
    value
        .parse::<usize>()
        .map_err(|source| StrategyParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_f32(value: &str, context: &'static str) -> Result<f32, StrategyParseError> {
    value
        .parse::<f32>()
        .map_err(|source| StrategyParseError::InvalidFloat {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_direction(token: &str) -> Result<GradientDirection, StrategyParseError> {
    match token.to_ascii_lowercase().as_str() {
        "outward" => Ok(GradientDirection::Outward),
        "inward" => Ok(GradientDirection::Inward),
        other => Err(StrategyParseError::InvalidDirection(other.to_string())),
    }
}
