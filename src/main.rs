//! Terminal demo for the active-card tracker.
//!
//! Run the binary to scroll through a stack of cards and watch which one is
//! active.  Run with `--trace 0,120,250` to replay scroll offsets headlessly
//! and print one line per tracker pass.

mod app;
mod ui;

use std::io::{self, stderr, Stderr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use viewport_detector::config::AppConfig;
use viewport_detector::core::document::Document;
use viewport_detector::core::page::Page;
use viewport_detector::core::tracker::GeometryMode;
use viewport_detector::core::viewport::Strategy;

use crate::app::{
    event::{spawn_event_reader, AppEvent, LayoutEvent},
    handler,
    state::{geometry_label, AppState},
    trace,
};
use crate::ui::{card_list::CardList, layout::AppLayout, log_panel::LogPanel, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Active-card tracker demo")]
struct Cli {
    /// Number of cards on the page.
    #[arg(long, default_value_t = 12)]
    cards: usize,

    /// Height of each card, in rows.
    #[arg(long, default_value_t = 5.0)]
    card_height: f64,

    /// Rows between cards.
    #[arg(long, default_value_t = 1.0)]
    gap: f64,

    /// Extra rows below the last card.
    #[arg(long, default_value_t = 0.0)]
    trailing: f64,

    /// Viewport height for `--trace` (the TUI uses the terminal height).
    #[arg(long, default_value_t = 24.0)]
    viewport: f64,

    /// Fraction of the first card's height used as edge tolerance.
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Candidate selector (e.g. `li`, `li.slide`).
    #[arg(long)]
    selector: Option<String>,

    /// Marker class for the active card.
    #[arg(long)]
    active_class: Option<String>,

    /// Card kept when conflicting markers are repaired (e.g. `#card-3`).
    #[arg(long)]
    boundary: Option<String>,

    /// Viewport test: `offset` or `bounding-rect`.
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<Strategy>,

    /// Re-measure card and viewport heights on every pass.
    #[arg(long)]
    recompute_geometry: bool,

    /// Veto activation of this card index.
    #[arg(long)]
    veto: Option<usize>,

    /// Replay these scroll offsets without a TUI and exit.
    #[arg(long, value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
    trace: Option<Vec<f64>>,

    /// Write the effective settings to the config file.
    #[arg(long)]
    save_config: bool,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    Strategy::from_label(s).ok_or_else(|| format!("unknown viewport test `{s}` (offset, bounding-rect)"))
}

impl Cli {
    /// Command-line flags override the config file.
    fn apply(&self, config: &mut AppConfig) {
        let t = &mut config.tracker;
        if let Some(v) = self.sensitivity {
            t.sensitivity = v;
        }
        if let Some(v) = &self.selector {
            t.selector = v.clone();
        }
        if let Some(v) = &self.active_class {
            t.active_class = v.clone();
        }
        if let Some(v) = &self.boundary {
            t.boundary_selector = Some(v.clone());
        }
        if let Some(v) = self.strategy {
            t.strategy = v;
        }
        if self.recompute_geometry {
            t.geometry = GeometryMode::PerPass;
        }
    }

    fn page(&self, viewport: f64) -> Page {
        Page::stacked(self.cards, self.card_height.max(1.0), self.gap.max(0.0), viewport)
            .with_trailing_space(self.trailing)
    }
}

// ───────────────────────────────────────── drawing ──────────

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());
    let tracker = &state.tracker;

    let cards_block = Block::default()
        .title(format!(
            " {} cards · {} · threshold {:.1} ",
            state.page.cards.len(),
            tracker.strategy(),
            tracker.threshold(),
        ))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(
        CardList::new(&state.page, tracker.active_class())
            .threshold(tracker.threshold())
            .block(cards_block),
        layout.cards_area,
    );

    let log_block = Block::default()
        .title(" changes ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(LogPanel::new(&state.log).block(log_block), layout.log_area);

    let hint = state.config.status_bar_hint();
    let message = state.status_message.as_deref().unwrap_or(&hint);
    let active = tracker
        .active_index()
        .map_or_else(|| "-".to_string(), |i| (i + 1).to_string());
    let status = format!(
        " {message} │ scroll {:.0}/{:.0} · active {active} · geometry {} · passes {}",
        state.page.scroll_offset(),
        state.page.max_scroll(),
        geometry_label(tracker.geometry_mode()),
        state.passes,
    );
    frame.render_widget(
        Paragraph::new(status).style(Theme::status_bar_style()),
        layout.status_area,
    );
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only emits when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // stdout is reserved for --trace output
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load();
    cli.apply(&mut config);

    if cli.save_config {
        config.save().context("writing config file")?;
        tracing::info!("saved config to {}", viewport_detector::config::config_path().display());
    }

    // ── headless replay ───────────────────────────────────────
    if let Some(offsets) = &cli.trace {
        let lines = trace::replay(cli.page(cli.viewport), config.tracker.clone(), cli.veto, offsets)?;
        for line in lines {
            println!("{line}");
        }
        return Ok(());
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &cli, config).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    cli: &Cli,
    config: AppConfig,
) -> Result<()> {
    let size = terminal.size()?;
    let layout = AppLayout::from_area(Rect::new(0, 0, size.width, size.height));
    let page = cli.page(f64::from(layout.card_viewport_rows()));

    let mut state = AppState::new(page, config)?;
    state.tracker.observer_mut().veto = cli.veto;
    state.dispatch(LayoutEvent::Ready);

    let mut events = spawn_event_reader(Duration::from_millis(30));
    let mut loaded = false;

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &state))?;

        if !loaded {
            loaded = true;
            state.dispatch(LayoutEvent::Load);
        }

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
            AppEvent::Resize(w, h) => {
                let layout = AppLayout::from_area(Rect::new(0, 0, w, h));
                handler::handle_resize(&mut state, layout.card_viewport_rows());
            }
            AppEvent::Tick => handler::tick(&mut state),
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
