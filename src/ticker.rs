use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::simulation::Simulation;
use crate::sink::DisplaySink;

/// Wall-clock label attached to each plotted point.
pub fn now_label() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Shared stop flag. Only the first `stop` call has any effect.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this call stopped the loop.
    pub fn stop(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fixed-period trigger polled from the event loop.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_tick: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left before the next tick is due.
    pub fn timeout(&self) -> Duration {
        self.period
            .checked_sub(self.last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0))
    }

    pub fn due(&self) -> bool {
        self.last_tick.elapsed() >= self.period
    }

    pub fn mark(&mut self) {
        self.last_tick = Instant::now();
    }
}

/// Drive the simulation without a terminal until stopped or `max_ticks` is reached.
pub fn run_headless(
    sim: &mut Simulation,
    sink: &mut dyn DisplaySink,
    mut ticker: Ticker,
    stop: &StopHandle,
    max_ticks: Option<u64>,
) -> u64 {
    let mut fired = 0;
    while !stop.is_stopped() && max_ticks.map_or(true, |max| fired < max) {
        thread::sleep(ticker.timeout());
        if stop.is_stopped() {
            break;
        }
        if ticker.due() {
            sim.tick(sink, &now_label());
            ticker.mark();
            fired += 1;
        }
    }
    log::info!("update loop stopped after {fired} ticks");
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sampler::SeededSampler;
    use crate::series::SeriesId;
    use crate::sink::LogSink;

    #[test]
    fn stop_is_idempotent() {
        let stop = StopHandle::new();
        let other = stop.clone();
        assert!(!stop.is_stopped());
        assert!(other.stop());
        assert!(!stop.stop());
        assert!(stop.is_stopped());
    }

    #[test]
    fn ticker_reports_due_after_period() {
        let mut ticker = Ticker::new(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(10));
        assert!(ticker.due());
        assert_eq!(ticker.timeout(), Duration::from_secs(0));
        ticker.mark();
        assert!(ticker.timeout() <= ticker.period());
    }

    #[test]
    fn headless_runs_requested_ticks() {
        let config = Config::default();
        let mut sim = Simulation::new(&config, Box::new(SeededSampler::new(Some(1))), "").unwrap();
        let mut sink = LogSink::default();
        sim.attach(&mut sink).unwrap();

        let fired = run_headless(
            &mut sim,
            &mut sink,
            Ticker::new(Duration::from_millis(1)),
            &StopHandle::new(),
            Some(3),
        );
        assert_eq!(fired, 3);
        assert_eq!(sim.tick_count(), 3);
        assert_eq!(sim.series(SeriesId::Births).state.steps, 3);
    }

    #[test]
    fn no_ticks_after_stop() {
        let config = Config::default();
        let mut sim = Simulation::new(&config, Box::new(SeededSampler::new(Some(1))), "").unwrap();
        let mut sink = LogSink::default();
        let stop = StopHandle::new();
        stop.stop();

        let fired = run_headless(
            &mut sim,
            &mut sink,
            Ticker::new(Duration::from_millis(1)),
            &stop,
            None,
        );
        assert_eq!(fired, 0);
        assert_eq!(sim.tick_count(), 0);
    }
}
