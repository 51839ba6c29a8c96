use std::fmt;

use crate::config::Config;
use crate::constants::SECONDS_PER_YEAR;
use crate::error::SeriesFault;
use crate::sampler::UniformSampler;
use crate::util::{format_count, format_price};
use crate::window::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesId {
    Births,
    Price,
    Population,
}

impl SeriesId {
    pub const ALL: [SeriesId; 3] = [SeriesId::Births, SeriesId::Price, SeriesId::Population];

    pub fn index(self) -> usize {
        match self {
            Self::Births => 0,
            Self::Price => 1,
            Self::Population => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Births => "Births",
            Self::Price => "Unit Price",
            Self::Population => "Population",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Births => "births",
            Self::Price => "price",
            Self::Population => "population",
        })
    }
}

/// How a series moves forward by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateRule {
    /// Fixed amount per tick; shown floored.
    Accumulate { per_tick: f64 },
    /// Multiplicative shock in `[-volatility, volatility]`, clamped to the series floor.
    RandomWalk { volatility: f64 },
    /// Fixed increment derived once from an annual growth rate; shown floored.
    LinearGrowth { per_tick: f64 },
}

impl UpdateRule {
    /// Per-tick increment for a yearly growth rate, not compounded.
    pub fn growth_per_tick(initial: f64, annual_rate: f64) -> f64 {
        (initial * annual_rate) / SECONDS_PER_YEAR
    }

    /// Map a unit draw onto a symmetric shock.
    pub fn shock(volatility: f64, unit: f64) -> f64 {
        (unit * 2.0 - 1.0) * volatility
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesState {
    pub value: f64,
    pub running: bool,
    /// Hard lower bound applied after each step.
    pub floor: Option<f64>,
    pub initial: f64,
    /// Ticks advanced since start or the last reset.
    pub steps: u64,
}

impl SeriesState {
    fn new(initial: f64) -> Self {
        Self {
            value: initial,
            running: true,
            floor: None,
            initial,
            steps: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Series {
    pub id: SeriesId,
    pub state: SeriesState,
    pub rule: UpdateRule,
    pub window: RollingWindow,
}

impl Series {
    pub fn new(id: SeriesId, initial: f64, rule: UpdateRule, window_size: usize, label: &str) -> Self {
        let state = SeriesState::new(initial);
        let window = RollingWindow::filled(window_size, label, display_of(rule, initial));
        Self {
            id,
            state,
            rule,
            window,
        }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.state.floor = Some(floor);
        self
    }

    /// Build the three dashboard series from a validated config.
    pub fn from_config(config: &Config, label: &str) -> Vec<Series> {
        let w = config.window_size;
        vec![
            Series::new(
                SeriesId::Births,
                0.0,
                UpdateRule::Accumulate {
                    per_tick: config.births_per_second,
                },
                w,
                label,
            ),
            Series::new(
                SeriesId::Price,
                config.initial_price,
                UpdateRule::RandomWalk {
                    volatility: config.price_volatility,
                },
                w,
                label,
            )
            .with_floor(config.price_floor),
            Series::new(
                SeriesId::Population,
                config.initial_population,
                UpdateRule::LinearGrowth {
                    per_tick: UpdateRule::growth_per_tick(
                        config.initial_population,
                        config.population_growth_rate,
                    ),
                },
                w,
                label,
            ),
        ]
    }

    /// Compute and commit the next value. A fault leaves the state untouched.
    pub fn advance(&mut self, sampler: &mut dyn UniformSampler) -> Result<f64, SeriesFault> {
        let steps = self.state.steps + 1;
        let next = match self.rule {
            // Derived from the step count so repeated ticks do not drift.
            UpdateRule::Accumulate { per_tick } | UpdateRule::LinearGrowth { per_tick } => {
                self.state.initial + steps as f64 * per_tick
            }
            UpdateRule::RandomWalk { volatility } => {
                let s = UpdateRule::shock(volatility, sampler.next_unit());
                let walked = self.state.value * (1.0 + s);
                self.state.floor.map_or(walked, |floor| walked.max(floor))
            }
        };
        if !next.is_finite() {
            return Err(SeriesFault::NonFinite { series: self.id });
        }
        self.state.value = next;
        self.state.steps = steps;
        Ok(self.display_value())
    }

    /// Value as plotted and shown on the counter.
    pub fn display_value(&self) -> f64 {
        display_of(self.rule, self.state.value)
    }

    pub fn counter_text(&self) -> String {
        match self.rule {
            UpdateRule::RandomWalk { .. } => format_price(self.display_value()),
            _ => format_count(self.display_value()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn toggle(&mut self) -> bool {
        self.state.running = !self.state.running;
        self.state.running
    }

    /// Restore the start value and refill the window. Run state and rule are kept.
    pub fn reset(&mut self, label: &str) {
        self.state.value = self.state.initial;
        self.state.steps = 0;
        let shown = self.display_value();
        self.window.replace_filled(label, shown);
    }
}

fn display_of(rule: UpdateRule, value: f64) -> f64 {
    match rule {
        UpdateRule::RandomWalk { .. } => value,
        UpdateRule::Accumulate { .. } | UpdateRule::LinearGrowth { .. } => value.floor(),
    }
}
