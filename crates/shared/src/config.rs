//! Runtime configuration.
//!
//! Configuration is layered: `config/default.toml`, then an optional
//! `config/{RUN_MODE}.toml`, then environment variables prefixed with
//! `STEWARD` (nested keys separated by `__`, e.g.
//! `STEWARD__MATCHING__FUZZY_MIN_SCORE=0.5`). Every knob has a documented
//! default, so a bare process with no config files still runs.

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level configuration for the ledger core.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreConfig {
    /// Statement matching thresholds.
    #[serde(default)]
    pub matching: MatchingConfig,
}

impl CoreConfig {
    /// Loads configuration from files and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("STEWARD").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// Thresholds driving automatic statement matching.
///
/// The defaults reproduce the matcher's shipped behavior: exact matches
/// require equal amounts within a cent and dates within one day; fuzzy
/// candidates are scored as `0.6 * date + 0.4 * description` and accepted
/// at `0.3` or above.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Maximum amount difference still considered equal.
    #[serde(default = "default_amount_epsilon")]
    pub amount_epsilon: Decimal,
    /// Date tolerance in days for the exact pass.
    #[serde(default = "default_exact_date_tolerance_days")]
    pub exact_date_tolerance_days: i64,
    /// Date tolerance in days for the fuzzy pass.
    #[serde(default = "default_fuzzy_date_tolerance_days")]
    pub fuzzy_date_tolerance_days: i64,
    /// Minimum combined score a fuzzy candidate must reach.
    #[serde(default = "default_fuzzy_min_score")]
    pub fuzzy_min_score: Decimal,
    /// Weight of date proximity in the combined score.
    #[serde(default = "default_date_weight")]
    pub date_weight: Decimal,
    /// Weight of description similarity in the combined score.
    #[serde(default = "default_description_weight")]
    pub description_weight: Decimal,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            amount_epsilon: default_amount_epsilon(),
            exact_date_tolerance_days: default_exact_date_tolerance_days(),
            fuzzy_date_tolerance_days: default_fuzzy_date_tolerance_days(),
            fuzzy_min_score: default_fuzzy_min_score(),
            date_weight: default_date_weight(),
            description_weight: default_description_weight(),
        }
    }
}

fn default_amount_epsilon() -> Decimal {
    crate::types::AMOUNT_EPSILON
}

fn default_exact_date_tolerance_days() -> i64 {
    1
}

fn default_fuzzy_date_tolerance_days() -> i64 {
    3
}

fn default_fuzzy_min_score() -> Decimal {
    Decimal::new(3, 1) // 0.3
}

fn default_date_weight() -> Decimal {
    Decimal::new(6, 1) // 0.6
}

fn default_description_weight() -> Decimal {
    Decimal::new(4, 1) // 0.4
}
