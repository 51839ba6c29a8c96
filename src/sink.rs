use crate::error::SinkFault;
use crate::series::SeriesId;
use crate::window::{Point, RollingWindow};

/// Opaque reference handed out by a sink for one registered series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesHandle {
    pub id: SeriesId,
    pub slot: usize,
}

/// Whatever draws the counters and charts.
pub trait DisplaySink {
    fn init_series(
        &mut self,
        id: SeriesId,
        window_size: usize,
        initial: &[Point],
    ) -> Result<SeriesHandle, SinkFault>;

    fn append_point(&mut self, handle: SeriesHandle, label: &str, value: f64) -> Result<(), SinkFault>;

    fn reset_series(&mut self, handle: SeriesHandle, initial: &[Point]) -> Result<(), SinkFault>;

    fn set_counter_text(&mut self, id: SeriesId, text: &str) -> Result<(), SinkFault>;
}

/// Plot data for one series as the TUI sees it.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub id: SeriesId,
    pub window: RollingWindow,
    pub counter: String,
}

/// View model read by the renderer. Trims its own copy to the window size.
#[derive(Debug, Default)]
pub struct ChartSink {
    series: Vec<ChartSeries>,
}

impl ChartSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SeriesId) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.id == id)
    }

    fn slot(&mut self, handle: SeriesHandle) -> Result<&mut ChartSeries, SinkFault> {
        self.series
            .get_mut(handle.slot)
            .filter(|s| s.id == handle.id)
            .ok_or_else(|| SinkFault::new(handle.id, format!("unknown slot {}", handle.slot)))
    }
}

impl DisplaySink for ChartSink {
    fn init_series(
        &mut self,
        id: SeriesId,
        window_size: usize,
        initial: &[Point],
    ) -> Result<SeriesHandle, SinkFault> {
        let chart = ChartSeries {
            id,
            window: RollingWindow::from_points(window_size, initial),
            counter: String::new(),
        };
        let slot = match self.series.iter().position(|s| s.id == id) {
            Some(slot) => {
                self.series[slot] = chart;
                slot
            }
            None => {
                self.series.push(chart);
                self.series.len() - 1
            }
        };
        Ok(SeriesHandle { id, slot })
    }

    fn append_point(&mut self, handle: SeriesHandle, label: &str, value: f64) -> Result<(), SinkFault> {
        let slot = self.slot(handle)?;
        slot.window.push(label, value);
        Ok(())
    }

    fn reset_series(&mut self, handle: SeriesHandle, initial: &[Point]) -> Result<(), SinkFault> {
        let slot = self.slot(handle)?;
        slot.window = RollingWindow::from_points(slot.window.capacity(), initial);
        Ok(())
    }

    fn set_counter_text(&mut self, id: SeriesId, text: &str) -> Result<(), SinkFault> {
        let slot = self
            .series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SinkFault::new(id, "series not registered"))?;
        slot.counter.clear();
        slot.counter.push_str(text);
        Ok(())
    }
}

/// Headless sink: counters go to the log, points are dropped.
#[derive(Debug, Default)]
pub struct LogSink {
    ids: Vec<SeriesId>,
}

impl DisplaySink for LogSink {
    fn init_series(
        &mut self,
        id: SeriesId,
        window_size: usize,
        _initial: &[Point],
    ) -> Result<SeriesHandle, SinkFault> {
        log::debug!("{id}: window of {window_size} points");
        self.ids.push(id);
        Ok(SeriesHandle {
            id,
            slot: self.ids.len() - 1,
        })
    }

    fn append_point(&mut self, handle: SeriesHandle, label: &str, value: f64) -> Result<(), SinkFault> {
        log::trace!("{} @ {label}: {value}", handle.id);
        Ok(())
    }

    fn reset_series(&mut self, handle: SeriesHandle, initial: &[Point]) -> Result<(), SinkFault> {
        log::debug!("{}: reset with {} points", handle.id, initial.len());
        Ok(())
    }

    fn set_counter_text(&mut self, id: SeriesId, text: &str) -> Result<(), SinkFault> {
        log::info!("{:<10} {text}", id.title());
        Ok(())
    }
}
