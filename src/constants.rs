pub const TICK_RATE_MS: u64 = 1000;
pub const WINDOW_SIZE: usize = 60;

pub const BIRTHS_PER_SECOND: f64 = 4.3;
pub const INITIAL_PRICE: f64 = 0.80;
pub const PRICE_VOLATILITY: f64 = 0.005; // ±0.5% per tick
pub const PRICE_FLOOR: f64 = 0.05;
pub const INITIAL_POPULATION: f64 = 4.02e9;
pub const POPULATION_GROWTH_RATE: f64 = 0.008; // per year

pub const SECONDS_PER_YEAR: f64 = (365 * 24 * 3600) as f64;
