//! Tolerances and built-in engine defaults.
//!
//! Policy
//! - Tolerances travel in a single `NumericCfg` owned by a `NumericContext`;
//!   predicates never read them from globals.
//! - Engine defaults are fixed constants. Commands override them per call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default `NumericCfg::distance_eps`.
pub const DISTANCE_EPS: f64 = 1e-9;
/// Default `NumericCfg::angle_eps`.
pub const ANGLE_EPS: f64 = 1e-9;

/// Number of random points when a command names no count.
pub(crate) const DEFAULT_POINT_COUNT: usize = 1000;
/// Dimension when a command has no `D` option.
pub(crate) const DEFAULT_DIMENSION: usize = 3;
/// Half-width of the bounding box when a command has no `B` option.
pub(crate) const DEFAULT_BOX: f64 = 0.5;
/// Seed when a command has no `t` option.
pub(crate) const DEFAULT_SEED: u64 = 1;

/// Tolerances used by hyperplane predicates.
///
/// - `distance_eps` bounds `|offset - other.offset|` (linear scale).
/// - `angle_eps` bounds `Σ (n_i - m_i)^2` (squared scale).
///
/// The two bound quantities of different scale and are not combined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericCfg {
    pub distance_eps: f64,
    pub angle_eps: f64,
}

impl Default for NumericCfg {
    fn default() -> Self {
        Self {
            distance_eps: DISTANCE_EPS,
            angle_eps: ANGLE_EPS,
        }
    }
}

/// Rejected tolerance configuration.
#[derive(Debug, Error, PartialEq)]
pub enum CfgError {
    #[error("tolerance {name} = {value} must be finite and >= 0")]
    InvalidTolerance { name: &'static str, value: f64 },
}

impl NumericCfg {
    #[inline]
    pub fn new(distance_eps: f64, angle_eps: f64) -> Self {
        Self {
            distance_eps,
            angle_eps,
        }
    }

    pub fn validate(&self) -> Result<(), CfgError> {
        for (name, value) in [
            ("distance_eps", self.distance_eps),
            ("angle_eps", self.angle_eps),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CfgError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }
}
