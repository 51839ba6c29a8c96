use std::io;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, BorderType, Borders, Paragraph,
    },
    Frame, Terminal,
};

use crate::app::App;
use crate::series::SeriesId;
use crate::ticker::now_label;

pub fn run(app: App) -> io::Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_loop(&mut terminal, app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app_loop<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    log::info!("dashboard started, tick every {:?}", app.ticker.period());
    while !app.stop.is_stopped() {
        terminal.draw(|f| draw(f, &app))?;

        // Handle input
        if event::poll(app.ticker.timeout())? {
            if let Event::Key(key) = event::read()? {
                app.on_key(key);
            }
        }
        if app.stop.is_stopped() {
            break;
        }
        if app.ticker.due() {
            app.on_tick();
        }
    }
    log::info!("dashboard stopped after {} ticks", app.sim.tick_count());
    Ok(())
}

fn color_of(id: SeriesId) -> Color {
    match id {
        SeriesId::Births => Color::Magenta,
        SeriesId::Price => Color::Green,
        SeriesId::Population => Color::Cyan,
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    // ============= whole screen layout ============
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Counters
            Constraint::Min(10),   // Chart
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    draw_counters(f, main_chunks[0], app);
    draw_chart(f, main_chunks[1], app);
    draw_status(f, main_chunks[2], app);
}

fn draw_counters(f: &mut Frame, area: Rect, app: &App) {
    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (id, area) in SeriesId::ALL.into_iter().zip(boxes.iter()) {
        let running = app.is_running(id);
        let selected = app.selected == id;
        let color = if running { color_of(id) } else { Color::DarkGray };

        let mut border = Style::default().fg(color);
        if selected {
            border = border.add_modifier(Modifier::BOLD);
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected { BorderType::Thick } else { BorderType::Rounded })
            .border_style(border)
            .title(format!(" {} {} ", id.index() + 1, id.title()));

        let counter = app
            .chart
            .get(id)
            .map(|s| s.counter.as_str())
            .unwrap_or("—");
        let state = if running { "running" } else { "paused" };
        let text = vec![
            Line::from(Span::styled(
                counter.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(state, Style::default().fg(Color::DarkGray))),
        ];
        f.render_widget(Paragraph::new(text).block(block), *area);
    }
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App) {
    let id = app.selected;
    let color = color_of(id);
    let Some(series) = app.chart.get(id).filter(|s| !s.window.is_empty()) else {
        f.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };

    let values = series.window.values();
    let (y_min, y_max) = match (series.window.min(), series.window.max()) {
        (Some(lo), Some(hi)) => {
            // Flat series still need a visible band.
            let pad = ((hi - lo) * 0.1).max(hi.abs() * 1e-6).max(1e-3);
            (lo - pad, hi + pad)
        }
        _ => (0.0, 1.0),
    };
    let x_limit = (series.window.capacity().max(2) - 1) as f64;

    let first = series.window.oldest().map(|p| p.label.as_str()).unwrap_or("");
    let last = series.window.latest().map(|p| p.label.as_str()).unwrap_or("");

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!(" {} [{first} → {last}] ", id.title()))
                .title_style(Style::default().fg(color)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, x_limit])
        .y_bounds([y_min, y_max])
        .paint(|ctx| {
            for (i, pair) in values.windows(2).enumerate() {
                ctx.draw(&CanvasLine {
                    x1: i as f64,
                    y1: pair[0],
                    x2: (i + 1) as f64,
                    y2: pair[1],
                    color,
                });
            }
        });
    f.render_widget(canvas, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let report = app.last_report;
    let mut spans = vec![
        Span::styled(
            format!(" {} ", now_label()),
            Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" tick #{} ", app.sim.tick_count())),
    ];
    if report.faults > 0 {
        spans.push(Span::styled(
            format!("| {} faults ", report.faults),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        "| Tab/1-3: select  space: pause/resume  r: reset  q: quit",
        Style::default().fg(Color::DarkGray),
    ));

    let status_bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(status_bar, area);
}
