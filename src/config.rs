use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::*;
use crate::error::{ConfigError, DashboardError, Result};

/// Simulation constants, read once at start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub births_per_second: f64,
    pub initial_price: f64,
    /// Largest per-tick price move as a fraction, e.g. `0.005` for ±0.5%.
    pub price_volatility: f64,
    pub price_floor: f64,
    pub initial_population: f64,
    /// Annual growth as a fraction, e.g. `0.008` for 0.8%.
    pub population_growth_rate: f64,
    /// Points retained per chart.
    pub window_size: usize,
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            births_per_second: BIRTHS_PER_SECOND,
            initial_price: INITIAL_PRICE,
            price_volatility: PRICE_VOLATILITY,
            price_floor: PRICE_FLOOR,
            initial_population: INITIAL_POPULATION,
            population_growth_rate: POPULATION_GROWTH_RATE,
            window_size: WINDOW_SIZE,
            tick_ms: TICK_RATE_MS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::WindowSize);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::TickPeriod);
        }
        for (field, value) in [
            ("births_per_second", self.births_per_second),
            ("initial_price", self.initial_price),
            ("initial_population", self.initial_population),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(0.0..1.0).contains(&self.price_volatility) {
            return Err(ConfigError::Volatility(self.price_volatility));
        }
        for (field, value) in [
            ("price_floor", self.price_floor),
            ("population_growth_rate", self.population_growth_rate),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.price_floor < 0.0 {
            return Err(ConfigError::NegativeFloor(self.price_floor));
        }
        if self.initial_price < self.price_floor {
            return Err(ConfigError::PriceBelowFloor {
                initial: self.initial_price,
                floor: self.price_floor,
            });
        }
        Ok(())
    }
}

/// Load configuration from a TOML file. A missing file yields the defaults.
pub fn load(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(Config::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DashboardError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: Config =
        toml::from_str(&raw).map_err(|e| DashboardError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}
