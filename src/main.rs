mod app;
mod config;
mod constants;
mod error;
mod sampler;
mod series;
mod simulation;
mod sink;
mod ticker;
mod ui;
mod util;
mod window;

use std::{error::Error, fs::File, path::PathBuf, time::Duration};

use clap::Parser;

use crate::app::App;
use crate::config::Config;
use crate::sampler::SeededSampler;
use crate::simulation::Simulation;
use crate::sink::LogSink;
use crate::ticker::{now_label, run_headless, StopHandle, Ticker};

#[derive(Parser)]
#[command(name = "vitals")]
#[command(about = "Live births, unit price and population counters in the terminal")]
#[command(version)]
struct Cli {
    /// TOML file with simulation constants (missing file = defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the price random walk; omit for a fresh seed each run
    #[arg(long)]
    seed: Option<u64>,

    /// Override the tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Override the number of points kept per chart
    #[arg(long)]
    window: Option<usize>,

    /// Run without the TUI, logging counters every tick
    #[arg(long)]
    headless: bool,

    /// Stop after this many ticks (headless only)
    #[arg(long, requires = "headless")]
    ticks: Option<u64>,

    /// Write logs here; the TUI otherwise logs nothing
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match &cli.log_file {
        Some(path) => {
            builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
        }
        None if cli.headless => {
            builder.target(env_logger::Target::Stderr);
        }
        // Keep stderr clean while the alternate screen is up.
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = match &cli.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms;
    }
    if let Some(window) = cli.window {
        config.window_size = window;
    }
    config.validate()?;

    // Ctrl+C and the quit key share one stop handle.
    let stop = StopHandle::new();
    let on_signal = stop.clone();
    ctrlc::set_handler(move || {
        on_signal.stop();
    })?;

    let sampler = Box::new(SeededSampler::new(cli.seed));
    if cli.headless {
        let mut sim = Simulation::new(&config, sampler, &now_label())?;
        let mut sink = LogSink::default();
        sim.attach(&mut sink)?;
        let ticker = Ticker::new(Duration::from_millis(config.tick_ms));
        run_headless(&mut sim, &mut sink, ticker, &stop, cli.ticks);
    } else {
        let app = App::new(&config, sampler, stop)?;
        ui::run(app)?;
    }
    Ok(())
}
