//! Engine configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                          | Default | Meaning                                  |
//! |-----------------------------------|---------|------------------------------------------|
//! | `TRIPSPLIT_AMOUNT_TOLERANCE`      | `0`     | custom-amount sum slack, minor units     |
//! | `TRIPSPLIT_PERCENT_TOLERANCE_BPS` | `1`     | percentage sum slack, basis points       |
//! | `TRIPSPLIT_SETTLEMENT_TOLERANCE`  | `1`     | planner leftover that may be dropped     |
//! | `TRIPSPLIT_INCLUDE_BALANCES`      | `true`  | include per-participant balances         |

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tripsplit_core::{
    Money, SettlementPlanner, SplitCalculator, DEFAULT_AMOUNT_TOLERANCE,
    DEFAULT_PERCENT_TOLERANCE_BPS, DEFAULT_SETTLEMENT_TOLERANCE,
};

pub const AMOUNT_TOLERANCE_VAR: &str = "TRIPSPLIT_AMOUNT_TOLERANCE";
pub const PERCENT_TOLERANCE_VAR: &str = "TRIPSPLIT_PERCENT_TOLERANCE_BPS";
pub const SETTLEMENT_TOLERANCE_VAR: &str = "TRIPSPLIT_SETTLEMENT_TOLERANCE";
pub const INCLUDE_BALANCES_VAR: &str = "TRIPSPLIT_INCLUDE_BALANCES";

/// Tunables for one settlement service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Allowed `|sum(custom amounts) - total|`, minor units
    pub amount_tolerance: Money,

    /// Allowed `|sum(percentages) - 100%|`, basis points
    pub percent_tolerance_bps: u32,

    /// Largest leftover the planner may drop, minor units
    pub settlement_tolerance: Money,

    /// Whether responses carry the per-participant balance breakdown
    pub include_balances: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            amount_tolerance: DEFAULT_AMOUNT_TOLERANCE,
            percent_tolerance_bps: DEFAULT_PERCENT_TOLERANCE_BPS,
            settlement_tolerance: DEFAULT_SETTLEMENT_TOLERANCE,
            include_balances: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();

        let amount_tolerance = parse_or(&lookup, AMOUNT_TOLERANCE_VAR, defaults.amount_tolerance.minor())?;
        let settlement_tolerance =
            parse_or(&lookup, SETTLEMENT_TOLERANCE_VAR, defaults.settlement_tolerance.minor())?;

        for (var, value) in [
            (AMOUNT_TOLERANCE_VAR, amount_tolerance),
            (SETTLEMENT_TOLERANCE_VAR, settlement_tolerance),
        ] {
            if value < 0 {
                return Err(ConfigError::InvalidValue(var.to_string()));
            }
        }

        Ok(EngineConfig {
            amount_tolerance: Money::from_minor(amount_tolerance),
            percent_tolerance_bps: parse_or(&lookup, PERCENT_TOLERANCE_VAR, defaults.percent_tolerance_bps)?,
            settlement_tolerance: Money::from_minor(settlement_tolerance),
            include_balances: parse_or(&lookup, INCLUDE_BALANCES_VAR, defaults.include_balances)?,
        })
    }

    /// A calculator using these tolerances.
    pub fn calculator(&self) -> SplitCalculator {
        SplitCalculator::new(self.amount_tolerance, self.percent_tolerance_bps)
    }

    /// A planner using these tolerances.
    pub fn planner(&self) -> SettlementPlanner {
        SettlementPlanner::new(self.settlement_tolerance)
    }
}

fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
