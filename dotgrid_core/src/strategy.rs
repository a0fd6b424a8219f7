//! Halftone strategies and their validation.
//!
//! The engine dispatches on [`HalftoneStrategy`] with an exhaustive `match`,
//! so an unknown strategy can only show up at a parsing boundary (JSON or the
//! text form in [`crate::strategy_text`]). Both boundaries reject it with
//! [`HalftoneError::UnsupportedStrategy`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HalftoneError {
    #[error("unsupported halftone strategy '{0}'")]
    UnsupportedStrategy(String),
    #[error("invalid {parameter} for {strategy} strategy: {reason}")]
    InvalidParameter {
        strategy: &'static str,
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Keep neighbours lying further from the centroid than the shape.
    Outward,
    /// Keep neighbours lying closer to the centroid than the shape.
    Inward,
}

impl GradientDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            GradientDirection::Outward => "outward",
            GradientDirection::Inward => "inward",
        }
    }
}

/// Rule for deriving mid cells from the full cells of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrategySpec", into = "StrategySpec")]
pub enum HalftoneStrategy {
    Neighbors { orthogonal_only: bool, distance: u32 },
    Trail { length: usize },
    Distance { radius: f32 },
    Gradient { direction: GradientDirection },
}

impl HalftoneStrategy {
    pub const NEIGHBORS: &'static str = "neighbors";
    pub const TRAIL: &'static str = "trail";
    pub const DISTANCE: &'static str = "distance";
    pub const GRADIENT: &'static str = "gradient";

    /// Single-cell halo in every direction; also used for usage series halos.
    pub const fn halo() -> Self {
        HalftoneStrategy::Neighbors {
            orthogonal_only: false,
            distance: 1,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HalftoneStrategy::Neighbors { .. } => Self::NEIGHBORS,
            HalftoneStrategy::Trail { .. } => Self::TRAIL,
            HalftoneStrategy::Distance { .. } => Self::DISTANCE,
            HalftoneStrategy::Gradient { .. } => Self::GRADIENT,
        }
    }

    pub fn validate(&self) -> Result<(), HalftoneError> {
        match *self {
            HalftoneStrategy::Neighbors { distance, .. } if distance == 0 => {
                Err(HalftoneError::InvalidParameter {
                    strategy: Self::NEIGHBORS,
                    parameter: "distance",
                    reason: "must be at least 1".to_string(),
                })
            }
            HalftoneStrategy::Distance { radius } if !(radius.is_finite() && radius > 0.0) => {
                Err(HalftoneError::InvalidParameter {
                    strategy: Self::DISTANCE,
                    parameter: "radius",
                    reason: format!("must be a positive finite number, got {radius}"),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for HalftoneStrategy {
    fn default() -> Self {
        Self::halo()
    }
}

impl fmt::Display for HalftoneStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalftoneStrategy::Neighbors {
                orthogonal_only,
                distance,
            } => {
                write!(f, "neighbors {distance}")?;
                if *orthogonal_only {
                    write!(f, " orthogonal")?;
                }
                Ok(())
            }
            HalftoneStrategy::Trail { length } => write!(f, "trail {length}"),
            HalftoneStrategy::Distance { radius } => write!(f, "distance {radius}"),
            HalftoneStrategy::Gradient { direction } => {
                write!(f, "gradient {}", direction.as_str())
            }
        }
    }
}

/// Wire shape of a strategy: a `type` tag plus whichever parameters the tag
/// uses. Missing parameters fall back to the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orthogonal_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<GradientDirection>,
}

pub const DEFAULT_NEIGHBOR_DISTANCE: u32 = 1;
pub const DEFAULT_TRAIL_LENGTH: usize = 3;
pub const DEFAULT_RADIUS: f32 = 1.5;

impl TryFrom<StrategySpec> for HalftoneStrategy {
    type Error = HalftoneError;

    fn try_from(spec: StrategySpec) -> Result<Self, Self::Error> {
        let strategy = match spec.kind.as_str() {
            Self::NEIGHBORS => HalftoneStrategy::Neighbors {
                orthogonal_only: spec.orthogonal_only.unwrap_or(false),
                distance: spec.distance.unwrap_or(DEFAULT_NEIGHBOR_DISTANCE),
            },
            Self::TRAIL => HalftoneStrategy::Trail {
                length: spec.length.unwrap_or(DEFAULT_TRAIL_LENGTH),
            },
            Self::DISTANCE => HalftoneStrategy::Distance {
                radius: spec.radius.unwrap_or(DEFAULT_RADIUS),
            },
            Self::GRADIENT => HalftoneStrategy::Gradient {
                direction: spec.direction.unwrap_or(GradientDirection::Outward),
            },
            _ => return Err(HalftoneError::UnsupportedStrategy(spec.kind)),
        };
        strategy.validate()?;
        Ok(strategy)
    }
}

impl From<HalftoneStrategy> for StrategySpec {
    fn from(strategy: HalftoneStrategy) -> Self {
        let mut spec = StrategySpec {
            kind: strategy.kind().to_string(),
            ..StrategySpec::default()
        };
        match strategy {
            HalftoneStrategy::Neighbors {
                orthogonal_only,
                distance,
            } => {
                spec.orthogonal_only = Some(orthogonal_only);
                spec.distance = Some(distance);
            }
            HalftoneStrategy::Trail { length } => spec.length = Some(length),
            HalftoneStrategy::Distance { radius } => spec.radius = Some(radius),
            HalftoneStrategy::Gradient { direction } => spec.direction = Some(direction),
        }
        spec
    }
}
