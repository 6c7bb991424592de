use std::io;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use neon_strike::config::{Arena, Tuning};
use neon_strike::render::{Frame, Renderer};
use neon_strike::scheduler::*;
use neon_strike::session::{Phase, SessionController};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Remembers what it was asked to draw.
#[derive(Default)]
struct Recorder {
    frames: Vec<(u64, Phase, String)>,
}

impl Renderer for Recorder {
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        self.frames
            .push((frame.state.frame, frame.phase, frame.hud.score_text.clone()));
        Ok(())
    }
}

struct Broken;

impl Renderer for Broken {
    fn draw(&mut self, _frame: &Frame<'_>) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(99)
}

fn controller(rng: &mut StdRng) -> SessionController {
    SessionController::new(Arena::default(), Tuning::default(), rng)
}

fn keep_going(_: &mut SessionController, _: &mut StdRng) -> ControlFlow<()> {
    ControlFlow::Continue(())
}

#[test]
fn manual_ticks_drive_running_session() {
    let mut rng = seeded_rng();
    let mut c = controller(&mut rng);
    c.start(&mut rng).unwrap();
    let mut renderer = Recorder::default();

    let stats = run(
        &mut c,
        &mut ManualTicks::new(5),
        &mut renderer,
        &CancellationToken::new(),
        &mut rng,
        keep_going,
    )
    .unwrap();

    assert_eq!(stats, RunStats { frames: 5, ticks: 5 });
    assert_eq!(c.state().frame, 5);
    let drawn: Vec<u64> = renderer.frames.iter().map(|f| f.0).collect();
    assert_eq!(drawn, vec![1, 2, 3, 4, 5]);
}

#[test]
fn idle_session_renders_without_ticking() {
    let mut rng = seeded_rng();
    let mut c = controller(&mut rng);
    let mut renderer = Recorder::default();

    let stats = run(
        &mut c,
        &mut ManualTicks::new(3),
        &mut renderer,
        &CancellationToken::new(),
        &mut rng,
        keep_going,
    )
    .unwrap();

    assert_eq!(stats, RunStats { frames: 3, ticks: 0 });
    assert!(renderer.frames.iter().all(|f| f.1 == Phase::Idle));
}

#[test]
fn cancelled_token_stops_before_first_frame() {
    let mut rng = seeded_rng();
    let mut c = controller(&mut rng);
    c.start(&mut rng).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let stats = run(
        &mut c,
        &mut ManualTicks::new(10),
        &mut Recorder::default(),
        &token,
        &mut rng,
        keep_going,
    )
    .unwrap();

    assert_eq!(stats, RunStats::default());
    assert_eq!(c.state().frame, 0);
}

#[test]
fn poll_break_cancels_the_loop() {
    let mut rng = seeded_rng();
    let mut c = controller(&mut rng);
    c.start(&mut rng).unwrap();
    let token = CancellationToken::new();
    let mut polls = 0;

    let stats = run(
        &mut c,
        &mut ManualTicks::new(10),
        &mut Recorder::default(),
        &token,
        &mut rng,
        |_, _| {
            polls += 1;
            if polls == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    )
    .unwrap();

    assert_eq!(stats, RunStats { frames: 2, ticks: 2 });
    assert!(token.is_cancelled());
}

#[test]
fn pause_and_resume_from_poll() {
    let mut rng = seeded_rng();
    let mut c = controller(&mut rng);
    c.start(&mut rng).unwrap();
    let mut polls = 0;

    let stats = run(
        &mut c,
        &mut ManualTicks::new(8),
        &mut Recorder::default(),
        &CancellationToken::new(),
        &mut rng,
        |c, _| {
            polls += 1;
            match polls {
                3 => c.pause().unwrap(),
                6 => c.resume().unwrap(),
                _ => {}
            }
            ControlFlow::Continue(())
        },
    )
    .unwrap();

    // paused on frames 3, 4 and 5
    assert_eq!(stats, RunStats { frames: 8, ticks: 5 });
    assert_eq!(c.state().frame, 5);
}

#[test]
fn render_errors_surface() {
    let mut rng = seeded_rng();
    let mut c = controller(&mut rng);
    let err = run(
        &mut c,
        &mut ManualTicks::new(1),
        &mut Broken,
        &CancellationToken::new(),
        &mut rng,
        keep_going,
    )
    .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn token_clones_share_state() {
    let token = CancellationToken::new();
    let other = token.clone();
    assert!(!token.is_cancelled());
    other.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn frame_clock_waits_between_frames() {
    let period = Duration::from_millis(5);
    let mut clock = FrameClock::new(period);
    let start = Instant::now();
    assert!(clock.next_frame());
    assert!(clock.next_frame());
    assert!(start.elapsed() >= period);
}

#[test]
fn manual_ticks_run_dry() {
    let mut ticks = ManualTicks::new(2);
    assert!(ticks.next_frame());
    assert!(ticks.next_frame());
    assert!(!ticks.next_frame());
}
