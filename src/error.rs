use std::io;
use thiserror::Error;

use crate::series::SeriesId;

/// Rejected configuration. Raised before the update loop starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window_size must be greater than zero")]
    WindowSize,
    #[error("tick_ms must be greater than zero")]
    TickPeriod,
    #[error("{field} must be a finite number greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("price_volatility must lie in [0, 1) (got {0})")]
    Volatility(f64),
    #[error("price_floor must not be negative (got {0})")]
    NegativeFloor(f64),
    #[error("initial_price {initial} is below price_floor {floor}")]
    PriceBelowFloor { initial: f64, floor: f64 },
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },
}

/// The display side failed to take an update.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("display sink failed for {series}: {reason}")]
pub struct SinkFault {
    pub series: SeriesId,
    pub reason: String,
}

impl SinkFault {
    pub fn new(series: SeriesId, reason: impl Into<String>) -> Self {
        Self {
            series,
            reason: reason.into(),
        }
    }
}

/// An update rule produced a value that cannot be shown.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SeriesFault {
    #[error("{series} update produced a non-finite value")]
    NonFinite { series: SeriesId },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
    #[error(transparent)]
    Sink(#[from] SinkFault),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
