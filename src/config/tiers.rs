//! Price-tier configuration loading from config.toml
//!
//! The price tiers ("tipos de precio") offered in the product wizard are a
//! deployment concern: each store defines its own names and profit margins.
//! They are loaded from a TOML file at startup and handed to the wizard as
//! [`PriceTier`] values.

use crate::{
    errors::{Error, Result},
    models::{PriceTier, DEFAULT_CURRENCY},
};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Currency code applied when a price entry leaves it unset
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Price tiers offered in the wizard
    pub tiers: Vec<TierConfig>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Configuration for a single price tier
#[derive(Debug, Deserialize, Clone)]
pub struct TierConfig {
    /// Unique identifier of the tier
    pub id: i64,
    /// Display name (e.g. "minorista", "mayorista")
    pub name: String,
    /// Profit margin applied on top of the cost, in percent
    pub profit_percent: f64,
}

impl Config {
    /// Converts the configured tiers into domain values.
    #[must_use]
    pub fn price_tiers(&self) -> Vec<PriceTier> {
        self.tiers
            .iter()
            .map(|t| PriceTier {
                id: t.id,
                name: t.name.clone(),
                profit_percent: t.profit_percent,
            })
            .collect()
    }
}

/// Loads tier configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
/// - Two tiers share an id
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    validate(&config)?;
    Ok(config)
}

/// Loads tier configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

fn validate(config: &Config) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for tier in &config.tiers {
        if !seen.insert(tier.id) {
            return Err(Error::Config {
                message: format!("Duplicate tier id {} in config.toml", tier.id),
            });
        }
        if !tier.profit_percent.is_finite() {
            return Err(Error::Config {
                message: format!("Tier '{}' has a non-finite profit percentage", tier.name),
            });
        }
    }
    Ok(())
}
