use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::error::Result;
use crate::sampler::UniformSampler;
use crate::series::SeriesId;
use crate::simulation::{Simulation, TickReport};
use crate::sink::ChartSink;
use crate::ticker::{now_label, StopHandle, Ticker};

// Main application state
pub struct App {
    pub sim: Simulation,
    pub chart: ChartSink,
    pub selected: SeriesId,
    pub ticker: Ticker,
    pub stop: StopHandle,
    pub last_report: TickReport,
}

impl App {
    pub fn new(config: &Config, sampler: Box<dyn UniformSampler>, stop: StopHandle) -> Result<App> {
        let mut sim = Simulation::new(config, sampler, &now_label())?;
        let mut chart = ChartSink::new();
        sim.attach(&mut chart)?;
        Ok(App {
            sim,
            chart,
            selected: SeriesId::Births,
            ticker: Ticker::new(std::time::Duration::from_millis(config.tick_ms)),
            stop,
            last_report: TickReport::default(),
        })
    }

    pub fn on_tick(&mut self) {
        self.last_report = self.sim.tick(&mut self.chart, &now_label());
        self.ticker.mark();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.stop.stop();
            }
            // Raw mode swallows SIGINT.
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.stop.stop();
            }
            KeyCode::Tab | KeyCode::Right => self.selected = self.selected.next(),
            KeyCode::BackTab | KeyCode::Left => self.selected = self.selected.prev(),
            KeyCode::Char('1') => self.selected = SeriesId::Births,
            KeyCode::Char('2') => self.selected = SeriesId::Price,
            KeyCode::Char('3') => self.selected = SeriesId::Population,
            KeyCode::Char(' ') => {
                self.sim.toggle(self.selected);
            }
            KeyCode::Char('r') => self.sim.reset(self.selected, &mut self.chart, &now_label()),
            _ => {}
        }
    }

    pub fn is_running(&self, id: SeriesId) -> bool {
        self.sim.series(id).is_running()
    }
}
