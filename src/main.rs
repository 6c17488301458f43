use std::error::Error;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};

use atom_reactor::core::config;
use atom_reactor::core::domain::{Params, ReactionRule};
use atom_reactor::interface::state::{AppState, Input};
use atom_reactor::interface::ui;
use atom_reactor::logging;

// --- CLI Definitions ---

#[derive(Parser, Debug)]
#[command(author, version, about = "Atom Reactor: collision-driven reaction sandbox", long_about = None)]
struct Args {
    /// Seed for atom placement and initial velocities
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Atoms spawned per type (A-E)
    #[arg(short, long, default_value_t = 10)]
    atoms: usize,

    /// Chamber width (world units)
    #[arg(long, default_value_t = 600.0)]
    width: f64,

    /// Chamber height (world units)
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// UI tick interval in milliseconds
    #[arg(short, long, default_value_t = 50)]
    tick_ms: u64,

    /// Physics steps per UI tick
    #[arg(long, default_value_t = 1)]
    steps: usize,

    /// JSON rule file to load at start and write back with 'w'
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Log level shown in the event panel (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

// --- Terminal Guard (RAII) ---

struct TuiContext {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TuiContext {
    fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal backend")?;
        Ok(Self { terminal })
    }
}

impl Drop for TuiContext {
    fn drop(&mut self) {
        // Best-effort restoration of terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

// --- Initialization Helpers ---

fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Forcefully restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));
}

fn build_params(args: &Args) -> Params {
    Params {
        seed: args.seed,
        width: args.width,
        height: args.height,
        atoms_per_kind: args.atoms,
        tick_rate_ms: args.tick_ms,
        steps_per_tick: args.steps.max(1),
        ..Default::default()
    }
}

/// Loads the rule file if it exists. A missing file starts an empty list
/// that 'w' will create.
fn initial_rules(path: Option<&PathBuf>) -> Result<Vec<ReactionRule>> {
    match path {
        Some(p) if p.exists() => config::load_rules(p)
            .with_context(|| format!("Failed to load rules from {}", p.display())),
        _ => Ok(Vec::new()),
    }
}

fn map_key(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Char(c) => Some(Input::Char(c)),
        KeyCode::Up => Some(Input::Up),
        KeyCode::Down => Some(Input::Down),
        KeyCode::Left => Some(Input::Left),
        KeyCode::Right => Some(Input::Right),
        KeyCode::Enter => Some(Input::Enter),
        KeyCode::Esc => Some(Input::Esc),
        _ => None,
    }
}

// --- Main ---

fn main() -> Result<(), Box<dyn Error>> {
    // 1. Safety & Parsing
    setup_panic_hook();
    let args = Args::parse();

    // 2. Configuration (before the terminal switches modes, so errors print plainly)
    let params = build_params(&args);
    let rules = initial_rules(args.rules.as_ref())?;
    let log_rx = logging::init(args.log_level).context("Failed to install logger")?;

    // 3. Setup TUI & App State
    let mut tui = TuiContext::new().context("Failed to initialize TUI")?;
    let mut app = AppState::new(params.clone(), rules);
    app.rules_path = args.rules.clone();
    app.set_log_channel(log_rx);
    log::info!("Seed {}, {} atoms per type", params.seed, params.atoms_per_kind);

    // 4. Event Loop
    let tick_rate = Duration::from_millis(params.tick_rate_ms.max(1));
    let mut last_tick = Instant::now();

    while !app.should_quit {
        // Draw
        tui.terminal.draw(|f| ui::draw(f, &mut app))?;

        // Handle Input
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    if let Some(input) = map_key(key.code) {
                        app.on_input(input);
                    }
                }
            }
        }

        // Logic Tick
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
