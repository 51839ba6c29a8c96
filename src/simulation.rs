use crate::config::Config;
use crate::error::{ConfigError, SinkFault};
use crate::sampler::UniformSampler;
use crate::series::{Series, SeriesId};
use crate::sink::{DisplaySink, SeriesHandle};

/// Outcome of one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub advanced: usize,
    pub paused: usize,
    pub faults: usize,
}

/// Owns the three series and the random source; the only place they change.
pub struct Simulation {
    series: Vec<Series>,
    handles: Vec<Option<SeriesHandle>>,
    sampler: Box<dyn UniformSampler>,
    ticks: u64,
}

impl Simulation {
    pub fn new(
        config: &Config,
        sampler: Box<dyn UniformSampler>,
        label: &str,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let series = Series::from_config(config, label);
        Ok(Self {
            handles: vec![None; series.len()],
            series,
            sampler,
            ticks: 0,
        })
    }

    /// Register every series with the sink and show the starting counters.
    pub fn attach(&mut self, sink: &mut dyn DisplaySink) -> Result<(), SinkFault> {
        for (series, handle) in self.series.iter().zip(self.handles.iter_mut()) {
            let points = series.window.to_vec();
            *handle = Some(sink.init_series(series.id, series.window.capacity(), &points)?);
            sink.set_counter_text(series.id, &series.counter_text())?;
        }
        Ok(())
    }

    /// Advance every running series by one step and notify the sink.
    ///
    /// Faults stay inside the series that raised them.
    pub fn tick(&mut self, sink: &mut dyn DisplaySink, label: &str) -> TickReport {
        let mut report = TickReport::default();
        self.ticks += 1;

        for (series, handle) in self.series.iter_mut().zip(self.handles.iter()) {
            if !series.is_running() {
                report.paused += 1;
                continue;
            }
            let shown = match series.advance(self.sampler.as_mut()) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("tick {}: {e}", self.ticks);
                    report.faults += 1;
                    continue;
                }
            };
            series.window.push(label, shown);
            report.advanced += 1;

            if let Err(e) = notify_append(sink, series, *handle, label, shown) {
                log::warn!("tick {}: {e}", self.ticks);
                report.faults += 1;
            }
        }

        log::debug!(
            "tick {}: {} advanced, {} paused, {} faults",
            self.ticks,
            report.advanced,
            report.paused,
            report.faults
        );
        report
    }

    /// Flip run/pause for one series. Returns the new running flag.
    pub fn toggle(&mut self, id: SeriesId) -> bool {
        let running = self.series_mut(id).toggle();
        log::info!("{id}: {}", if running { "resumed" } else { "paused" });
        running
    }

    /// Return one series to its start value with a freshly filled window.
    pub fn reset(&mut self, id: SeriesId, sink: &mut dyn DisplaySink, label: &str) {
        let handle = self.handles[id.index()];
        let series = self.series_mut(id);
        series.reset(label);
        log::info!("{id}: reset to {}", series.counter_text());

        let series = &self.series[id.index()];
        let points = series.window.to_vec();
        let notified = match handle {
            Some(h) => sink.reset_series(h, &points),
            None => Ok(()),
        }
        .and_then(|()| sink.set_counter_text(id, &series.counter_text()));
        if let Err(e) = notified {
            log::warn!("{e}");
        }
    }

    pub fn series(&self, id: SeriesId) -> &Series {
        &self.series[id.index()]
    }

    fn series_mut(&mut self, id: SeriesId) -> &mut Series {
        &mut self.series[id.index()]
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

fn notify_append(
    sink: &mut dyn DisplaySink,
    series: &Series,
    handle: Option<SeriesHandle>,
    label: &str,
    shown: f64,
) -> Result<(), SinkFault> {
    if let Some(h) = handle {
        sink.append_point(h, label, shown)?;
    }
    sink.set_counter_text(series.id, &series.counter_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::FixedSampler;
    use crate::sink::ChartSink;
    use crate::window::Point;

    /// Records every call; can be told to fail for one series.
    #[derive(Default)]
    struct RecordingSink {
        inner: ChartSink,
        fail_on: Option<SeriesId>,
        appended: Vec<(SeriesId, String, f64)>,
        resets: Vec<(SeriesId, usize)>,
    }

    impl DisplaySink for RecordingSink {
        fn init_series(
            &mut self,
            id: SeriesId,
            window_size: usize,
            initial: &[Point],
        ) -> Result<SeriesHandle, SinkFault> {
            self.inner.init_series(id, window_size, initial)
        }

        fn append_point(
            &mut self,
            handle: SeriesHandle,
            label: &str,
            value: f64,
        ) -> Result<(), SinkFault> {
            if self.fail_on == Some(handle.id) {
                return Err(SinkFault::new(handle.id, "render failed"));
            }
            self.appended.push((handle.id, label.to_string(), value));
            self.inner.append_point(handle, label, value)
        }

        fn reset_series(&mut self, handle: SeriesHandle, initial: &[Point]) -> Result<(), SinkFault> {
            self.resets.push((handle.id, initial.len()));
            self.inner.reset_series(handle, initial)
        }

        fn set_counter_text(&mut self, id: SeriesId, text: &str) -> Result<(), SinkFault> {
            self.inner.set_counter_text(id, text)
        }
    }

    fn sim(config: &Config, draws: Vec<f64>) -> (Simulation, RecordingSink) {
        let mut sim = Simulation::new(config, Box::new(FixedSampler::new(draws)), "start").unwrap();
        let mut sink = RecordingSink::default();
        sim.attach(&mut sink).unwrap();
        (sim, sink)
    }

    fn counter(sink: &RecordingSink, id: SeriesId) -> String {
        sink.inner.get(id).unwrap().counter.clone()
    }

    #[test]
    fn invalid_config_never_builds() {
        let config = Config {
            window_size: 0,
            ..Config::default()
        };
        let built = Simulation::new(&config, Box::new(FixedSampler::new(vec![0.5])), "");
        assert!(matches!(built, Err(ConfigError::WindowSize)));
    }

    #[test]
    fn births_counter_after_ten_and_eleven_ticks() {
        let (mut sim, mut sink) = sim(&Config::default(), vec![0.5]);
        assert_eq!(counter(&sink, SeriesId::Births), "0");
        for i in 0..10 {
            sim.tick(&mut sink, &format!("t{i}"));
        }
        assert_eq!(counter(&sink, SeriesId::Births), "43");
        sim.tick(&mut sink, "t10");
        assert_eq!(counter(&sink, SeriesId::Births), "47");
        assert_eq!(sim.tick_count(), 11);
    }

    #[test]
    fn population_after_hundred_ticks() {
        let (mut sim, mut sink) = sim(&Config::default(), vec![0.5]);
        for _ in 0..100 {
            sim.tick(&mut sink, "t");
        }
        let per_tick = 4.02e9 * 0.008 / 31_536_000.0;
        let pop = sim.series(SeriesId::Population);
        assert!((pop.state.value - (4.02e9 + 100.0 * per_tick)).abs() < 1e-3);
        assert_eq!(pop.display_value(), pop.state.value.floor());
    }

    #[test]
    fn windows_hold_the_latest_points() {
        let config = Config {
            window_size: 4,
            ..Config::default()
        };
        let (mut sim, mut sink) = sim(&config, vec![0.5]);
        for i in 0..9 {
            sim.tick(&mut sink, &format!("t{i}"));
            assert!(sim.series(SeriesId::Births).window.len() <= 4);
        }
        let labels: Vec<String> = sim
            .series(SeriesId::Births)
            .window
            .iter()
            .map(|p| p.label.clone())
            .collect();
        assert_eq!(labels, ["t5", "t6", "t7", "t8"]);
        assert_eq!(sink.inner.get(SeriesId::Births).unwrap().window.len(), 4);
    }

    #[test]
    fn paused_series_holds_its_value() {
        let (mut sim, mut sink) = sim(&Config::default(), vec![0.9]);
        sim.tick(&mut sink, "t0");
        let before = sim.series(SeriesId::Price).state.clone();

        assert!(!sim.toggle(SeriesId::Price));
        let report = sim.tick(&mut sink, "t1");
        assert_eq!(report.paused, 1);
        assert_eq!(report.advanced, 2);
        assert_eq!(sim.series(SeriesId::Price).state.value, before.value);
        assert_eq!(sim.series(SeriesId::Price).window.latest().unwrap().label, "t0");

        assert!(sim.toggle(SeriesId::Price));
        sim.tick(&mut sink, "t2");
        assert!(sim.series(SeriesId::Price).state.value > before.value);
    }

    #[test]
    fn price_reset_restores_start() {
        let config = Config {
            initial_price: 0.80,
            ..Config::default()
        };
        let (mut sim, mut sink) = sim(&config, vec![0.1, 0.95, 0.4, 0.0, 0.7]);
        for _ in 0..5 {
            sim.tick(&mut sink, "t");
        }
        assert_ne!(sim.series(SeriesId::Price).state.value, 0.80);

        sim.reset(SeriesId::Price, &mut sink, "r");
        let price = sim.series(SeriesId::Price);
        assert_eq!(price.state.value, 0.80);
        assert_eq!(price.window.len(), config.window_size);
        assert!(price.window.iter().all(|p| p.value == 0.80));
        assert!(price.is_running());
        assert_eq!(sink.resets, vec![(SeriesId::Price, config.window_size)]);
        assert_eq!(counter(&sink, SeriesId::Price), "$0.80");
    }

    #[test]
    fn reset_keeps_pause_and_growth_constant() {
        let (mut sim, mut sink) = sim(&Config::default(), vec![0.5]);
        let rule = sim.series(SeriesId::Population).rule;
        sim.tick(&mut sink, "t");
        sim.toggle(SeriesId::Population);
        sim.reset(SeriesId::Population, &mut sink, "r");

        let pop = sim.series(SeriesId::Population);
        assert!(!pop.is_running());
        assert_eq!(pop.state.value, 4.02e9);
        assert_eq!(pop.rule, rule);
    }

    #[test]
    fn sink_fault_is_isolated() {
        let (mut sim, mut sink) = sim(&Config::default(), vec![0.5]);
        sink.fail_on = Some(SeriesId::Price);

        let report = sim.tick(&mut sink, "t0");
        assert_eq!(report.faults, 1);
        assert_eq!(report.advanced, 3);
        let appended: Vec<SeriesId> = sink.appended.iter().map(|(id, _, _)| *id).collect();
        assert_eq!(appended, vec![SeriesId::Births, SeriesId::Population]);

        sink.fail_on = None;
        let report = sim.tick(&mut sink, "t1");
        assert_eq!(report.faults, 0);
        assert_eq!(sim.series(SeriesId::Price).state.steps, 2);
    }

    #[test]
    fn price_stays_above_floor_on_long_runs() {
        let config = Config {
            initial_price: 0.06,
            price_volatility: 0.9,
            ..Config::default()
        };
        let (mut sim, mut sink) = sim(&config, vec![0.0, 0.01, 0.2]);
        for _ in 0..200 {
            sim.tick(&mut sink, "t");
            assert!(sim.series(SeriesId::Price).state.value >= config.price_floor);
        }
    }

    #[test]
    fn price_starting_at_floor_stays_there_through_reset() {
        let config = Config {
            initial_price: 0.05,
            ..Config::default()
        };
        let (mut sim, mut sink) = sim(&config, vec![0.0]);
        for _ in 0..3 {
            sim.tick(&mut sink, "t");
        }
        sim.reset(SeriesId::Price, &mut sink, "r");
        let price = sim.series(SeriesId::Price);
        assert!(price.state.value >= config.price_floor);
        assert!(price.window.min().is_some_and(|lo| lo >= config.price_floor));
        assert_eq!(price.state.floor, Some(config.price_floor));
    }
}
