use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gridsnek::config::{Rules, SwipeConfig, GRID_SIZE};
use gridsnek::game::Game;
use gridsnek::input::{intent_for_key, Gesture, Intent, SwipeTracker};
use gridsnek::persist::{FileScoreStore, ScoreStore, BEST_SCORE_FILE};
use gridsnek::scheduler::FixedStep;
use gridsnek::tui::{Ui, CELL_WIDTH};
use log::info;
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long to wait for input before drawing the next frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

type Term = Terminal<CrosstermBackend<Stdout>>;

#[derive(Parser, Debug)]
#[command(name = "gridsnek")]
#[command(version, about = "Classic snake on a fixed grid, in the terminal")]
struct Cli {
    /// Cells per side of the board
    #[arg(long, default_value_t = GRID_SIZE)]
    grid: i32,

    /// Seed for food placement (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// File holding the best score
    #[arg(long, default_value = BEST_SCORE_FILE)]
    best_file: PathBuf,

    #[arg(long, default_value = "gridsnek.log")]
    log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Minimum mouse drag, in board cells, that counts as a swipe
    #[arg(long, default_value_t = 3.0)]
    swipe_distance: f64,

    /// Maximum duration of a swipe in milliseconds
    #[arg(long, default_value_t = 1000)]
    swipe_ms: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the UI, so logs go to a file.
    WriteLogger::init(
        cli.log_level,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?,
    )
    .context("Failed to initialize logger")?;

    info!("Starting gridsnek");

    let rules = Rules::with_grid_size(cli.grid);
    let swipe = SwipeConfig {
        min_distance: cli.swipe_distance,
        max_duration: Duration::from_millis(cli.swipe_ms),
    };

    let store = FileScoreStore::new(&cli.best_file);
    let mut game = match cli.seed {
        Some(seed) => Game::seeded(rules, store, seed)?,
        None => Game::new(rules, store)?,
    };

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))
        .context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;

    let result = run(&mut terminal, &mut game, swipe);

    restore_terminal(&mut terminal)?;
    info!("Exiting, best score {}", game.best());

    result
}

fn run<S: ScoreStore>(terminal: &mut Term, game: &mut Game<S>, swipe: SwipeConfig) -> Result<()> {
    let mut scheduler = FixedStep::new();
    let mut ui = Ui::new();
    let mut tracker = SwipeTracker::new(swipe);
    let grid_size = game.rules().grid_size;

    loop {
        scheduler
            .frame(Instant::now(), game, |game| {
                terminal
                    .draw(|frame| ui.draw(frame, game.state(), &game.hud(), grid_size))
                    .map(|_| ())
            })
            .context("Failed to draw frame")?;

        if !event::poll(FRAME_INTERVAL).context("Failed to poll events")? {
            continue;
        }
        // Drain everything that queued up during the frame.
        loop {
            let event = event::read().context("Failed to read event")?;
            if !handle_event(event, game, &mut scheduler, &mut ui, &mut tracker) {
                return Ok(());
            }
            if !event::poll(Duration::ZERO).context("Failed to poll events")? {
                break;
            }
        }
    }
}

/// Returns `false` when the player wants to quit.
fn handle_event<S: ScoreStore>(
    event: Event,
    game: &mut Game<S>,
    scheduler: &mut FixedStep,
    ui: &mut Ui,
    tracker: &mut SwipeTracker,
) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match intent_for_key(key) {
            Some(intent) => apply(intent, game, scheduler, ui),
            None => true,
        },
        Event::Mouse(mouse) => {
            handle_mouse(mouse, game, ui, tracker);
            true
        }
        _ => true,
    }
}

fn handle_mouse<S: ScoreStore>(
    mouse: MouseEvent,
    game: &mut Game<S>,
    ui: &Ui,
    tracker: &mut SwipeTracker,
) {
    // Measure drags in board cells so both axes use the same unit.
    let x = f64::from(mouse.column) / f64::from(CELL_WIDTH);
    let y = f64::from(mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => tracker.press(x, y, Instant::now()),
        MouseEventKind::Up(MouseButton::Left) => match tracker.release(x, y, Instant::now()) {
            Gesture::Swipe(direction) => {
                game.set_direction(direction);
            }
            Gesture::Tap if ui.cell_at(mouse.column, mouse.row).is_some() => {
                game.toggle_pause();
            }
            _ => {}
        },
        _ => {}
    }
}

fn apply<S: ScoreStore>(
    intent: Intent,
    game: &mut Game<S>,
    scheduler: &mut FixedStep,
    ui: &mut Ui,
) -> bool {
    match intent {
        Intent::Turn(direction) => {
            game.set_direction(direction);
        }
        Intent::TogglePause => {
            game.toggle_pause();
        }
        Intent::Restart => {
            game.reset();
            scheduler.reset();
            ui.clear_message();
        }
        Intent::Confirm => {
            let restarting = game.state().is_over();
            game.overlay_primary();
            if restarting {
                scheduler.reset();
                ui.clear_message();
            }
        }
        Intent::Share => {
            // No clipboard here: show the text for manual copying.
            let text = game.hud().share_text();
            info!("Share text: {}", text);
            ui.set_message(format!("Copy this text: {}", text));
        }
        Intent::Quit => return false,
    }
    true
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}
