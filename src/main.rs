use std::cell::Cell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, stdout, BufWriter, Stdout};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{mpsc, Mutex};
use std::thread;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use neon_strike::config::{
    validate_fps, Arena, ConfigError, Tuning, DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH,
};
use neon_strike::display::{TerminalRenderer, Viewport};
use neon_strike::input::Key;
use neon_strike::render::{Frame, Renderer};
use neon_strike::scheduler::{self, CancellationToken, FrameClock};
use neon_strike::session::{Command, Phase, SessionController};

#[derive(Parser, Debug)]
#[command(author, version, about = "Single-screen arcade shooter for the terminal", long_about = None)]
struct Cli {
    /// Logical arena width in simulation units.
    #[arg(long, default_value_t = DEFAULT_ARENA_WIDTH)]
    width: f32,
    /// Logical arena height in simulation units.
    #[arg(long, default_value_t = DEFAULT_ARENA_HEIGHT)]
    height: f32,
    /// Frames (and simulation ticks) per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Seed for a reproducible spawn pattern.
    #[arg(long)]
    seed: Option<u64>,
    /// Write trace output here; `RUST_LOG` picks the filter.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so 8 frames (≈133 ms at 60 FPS) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn movement_key(code: &KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::W),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::A),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::S),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::D),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

// ── Renderer wrapper ──────────────────────────────────────────────────────────

/// Picks up terminal resizes seen by the input side before each draw.
struct ResizingRenderer {
    inner: TerminalRenderer<BufWriter<Stdout>>,
    viewport: Rc<Cell<Viewport>>,
}

impl Renderer for ResizingRenderer {
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let viewport = self.viewport.get();
        if viewport != self.inner.viewport() {
            self.inner.resize(viewport);
        }
        self.inner.draw(frame)
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// and push them into the controller's input state, so Space and movement
/// keys can be held together.
fn play(
    rx: &mpsc::Receiver<Event>,
    arena: Arena,
    fps: u32,
    rng: &mut StdRng,
) -> Result<(), AppError> {
    let (cols, rows) = terminal::size()?;
    let viewport = Rc::new(Cell::new(Viewport::new(cols, rows)));
    let mut renderer = ResizingRenderer {
        inner: TerminalRenderer::new(BufWriter::new(stdout()), viewport.get()),
        viewport: Rc::clone(&viewport),
    };

    let mut controller = SessionController::new(arena, Tuning::default(), rng);
    let mut clock = FrameClock::from_fps(fps);
    let token = CancellationToken::new();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pointer: Option<(u16, u16)> = None;
    let mut frame: u64 = 0;

    let stats = scheduler::run(
        &mut controller,
        &mut clock,
        &mut renderer,
        &token,
        rng,
        |controller, rng| {
            frame += 1;

            // ── Drain all pending input events (non-blocking) ─────────────────
            while let Ok(ev) = rx.try_recv() {
                match ev {
                    Event::Key(KeyEvent {
                        code,
                        kind,
                        modifiers,
                        ..
                    }) => match kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => {
                            key_frame.insert(code.clone(), frame);
                            let command = match code {
                                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                    return ControlFlow::Break(());
                                }
                                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                    return ControlFlow::Break(());
                                }
                                KeyCode::Char(' ') => {
                                    controller.fire();
                                    None
                                }
                                _ if kind == KeyEventKind::Repeat => None,
                                KeyCode::Enter => Some(Command::Start),
                                KeyCode::Char('p') | KeyCode::Char('P') => {
                                    match controller.phase() {
                                        Phase::Paused => Some(Command::Resume),
                                        _ => Some(Command::Pause),
                                    }
                                }
                                KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
                                _ => None,
                            };
                            if let Some(command) = command {
                                if let Err(err) = controller.apply(command, rng) {
                                    debug!(%err, "command ignored");
                                }
                            }
                        }
                        // Release: remove key immediately (keyboard-enhancement path)
                        KeyEventKind::Release => {
                            key_frame.remove(&code);
                        }
                    },
                    Event::Mouse(MouseEvent {
                        kind, column, row, ..
                    }) => match kind {
                        MouseEventKind::Down(_) => pointer = Some((column, row)),
                        MouseEventKind::Drag(_) => {
                            if let Some((last_col, last_row)) = pointer {
                                let (dx, dy) = viewport.get().cells_to_arena(
                                    column as i32 - last_col as i32,
                                    row as i32 - last_row as i32,
                                    &controller.state().arena,
                                );
                                if controller.is_active() {
                                    controller.input_mut().add_drag(dx, dy);
                                }
                            }
                            pointer = Some((column, row));
                        }
                        MouseEventKind::Up(_) => pointer = None,
                        _ => {}
                    },
                    Event::Resize(cols, rows) => viewport.set(Viewport::new(cols, rows)),
                    _ => {}
                }
            }

            // ── Publish held movement keys ────────────────────────────────────
            let held: Vec<Key> = key_frame
                .keys()
                .filter(|code| is_held(&key_frame, code, frame))
                .filter_map(movement_key)
                .collect();
            let input = controller.input_mut();
            for key in Key::ALL {
                input.set(key, held.contains(&key));
            }

            ControlFlow::Continue(())
        },
    )?;

    info!(frames = stats.frames, ticks = stats.ticks, "game closed");
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(path: &Path) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let arena = Arena::new(cli.width, cli.height)?;
    let fps = validate_fps(cli.fps)?;
    // The terminal is in raw mode while playing, so logs only go to a file.
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }
    info!(
        width = arena.width(),
        height = arena.height(),
        fps,
        seed = ?cli.seed,
        "=== Neon Strike startup ==="
    );

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = play(&rx, arena, fps, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
