use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CadenceError;

/// Policy for filling missing target values within one group.
///
/// No policy invents values outside a group's observed span except by
/// carrying the span's own edge values forward or backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationPolicy {
    /// Carry the last observed value forward; leading gaps stay missing.
    #[serde(rename = "ffill")]
    ForwardFill,
    /// Carry the next observed value backward; trailing gaps stay missing.
    #[serde(rename = "bfill")]
    BackwardFill,
    /// Forward fill, then backward fill whatever is left.
    #[default]
    #[serde(rename = "ffill_bfill")]
    ForwardBackward,
    /// Linear interpolation weighted by elapsed time; edges stay missing.
    Interpolate,
    /// Time-weighted interpolation, then forward/backward fill of the edges.
    #[serde(rename = "interpolate_ffill_bfill")]
    InterpolateForwardBackward,
}

impl ImputationPolicy {
    /// All policies in selector order.
    pub const ALL: [Self; 5] = [
        Self::ForwardFill,
        Self::BackwardFill,
        Self::ForwardBackward,
        Self::Interpolate,
        Self::InterpolateForwardBackward,
    ];

    /// Selector token for this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ForwardFill => "ffill",
            Self::BackwardFill => "bfill",
            Self::ForwardBackward => "ffill_bfill",
            Self::Interpolate => "interpolate",
            Self::InterpolateForwardBackward => "interpolate_ffill_bfill",
        }
    }
}

impl fmt::Display for ImputationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImputationPolicy {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| {
                CadenceError::InvalidArg(format!(
                    "unknown imputation policy '{token}' (expected one of ffill, bfill, ffill_bfill, interpolate, interpolate_ffill_bfill)"
                ))
            })
    }
}
