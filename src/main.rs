//! BLOCKTRIS - a classic falling-block puzzle for the terminal

mod board;
mod difficulty;
mod error;
mod game;
mod game_loop;
mod input;
mod menu;
mod piece;
mod randomizer;
mod scheduler;
mod score;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Game, GameStatus};
use game_loop::GameLoop;
use input::{Command, KeyBindings, SwipeTracker};
use menu::{Menu, MenuAction};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Input poll timeout while no timer is running (menu open)
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Get the blocktris temp directory, creating it if needed
fn blocktris_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blocktris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = blocktris_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file; stdout belongs to the terminal UI
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blocktris=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKTRIS starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    // Remember the last difficulty
    if let Err(e) = settings.save() {
        tracing::warn!("Could not save settings: {}", e);
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if let Ok(game) = &result {
        println!("\nThanks for playing BLOCKTRIS!");
        if game.status() != GameStatus::Idle {
            let score = game.score();
            println!("Difficulty: {}", game.difficulty().name());
            println!("Final Score: {} | Lines: {}", score.points, score.lines);
        }
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
) -> io::Result<Game> {
    let bindings = KeyBindings::from_settings(settings);
    let mut swipe = SwipeTracker::new(settings.gameplay.swipe_step);
    let mut game_loop = GameLoop::new(Game::new(settings.game_config()), settings.frame_interval());
    let mut menu = Some(Menu::for_status(game_loop.status(), settings.gameplay.difficulty));
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            terminal.draw(|frame| {
                ui::render_game(frame, &game_loop.game().snapshot(), menu.as_ref(), settings)
            })?;
            needs_redraw = false;
        }

        let timeout = game_loop
            .next_deadline()
            .map_or(IDLE_POLL, |deadline| deadline.saturating_duration_since(Instant::now()));

        if event::poll(timeout)? {
            needs_redraw = true;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let now = Instant::now();
                    if let Some(open) = menu.as_mut() {
                        let action = menu_key(open, key, &bindings, game_loop.status());
                        match action {
                            Some(MenuAction::SetDifficulty(difficulty)) => {
                                game_loop.set_difficulty(difficulty, now);
                                settings.gameplay.difficulty = difficulty;
                            }
                            Some(MenuAction::Resume) => {
                                if game_loop.resume(now) {
                                    menu = None;
                                }
                            }
                            Some(MenuAction::NewGame) => {
                                game_loop.new_game(now);
                                menu = None;
                            }
                            Some(MenuAction::Quit) => return Ok(game_loop.into_game()),
                            None => {}
                        }
                    } else {
                        match bindings.command(key) {
                            Some(Command::Move(mv)) => game_loop.handle_move(mv),
                            Some(Command::Change) => game_loop.change_piece(),
                            Some(Command::Pause) => {
                                game_loop.pause(now);
                                menu = Some(Menu::for_status(
                                    game_loop.status(),
                                    game_loop.game().difficulty(),
                                ));
                            }
                            Some(Command::Quit) => return Ok(game_loop.into_game()),
                            None => {}
                        }
                    }
                }
                Event::Mouse(mouse) if menu.is_none() => {
                    if let Some(direction) = swipe.handle(mouse) {
                        game_loop.handle_directional_input(direction);
                    }
                }
                _ => {}
            }
        }

        let polled = game_loop.poll(Instant::now());
        if polled.redraw {
            needs_redraw = true;
        }
        if polled.finished {
            menu = Some(Menu::for_status(game_loop.status(), game_loop.game().difficulty()));
            needs_redraw = true;
        }
    }
}

/// Handle a key press while the menu is open
fn menu_key(
    menu: &mut Menu,
    key: KeyEvent,
    bindings: &KeyBindings,
    status: GameStatus,
) -> Option<MenuAction> {
    match key.code {
        KeyCode::Up => {
            menu.move_up();
            None
        }
        KeyCode::Down => {
            menu.move_down();
            None
        }
        KeyCode::Left => menu.adjust(false),
        KeyCode::Right => menu.adjust(true),
        KeyCode::Enter | KeyCode::Char(' ') => menu.select(),
        _ => match bindings.command(key) {
            Some(Command::Quit) => Some(MenuAction::Quit),
            // The pause key toggles back into the game
            Some(Command::Pause) if status == GameStatus::Paused => Some(MenuAction::Resume),
            _ => None,
        },
    }
}
