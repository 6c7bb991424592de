/// Frame scheduling: a tick source plus a cancellation token.
///
/// Speeds in the simulation are per tick, so the frame rate is the game speed.
/// [`FrameClock`] paces a real terminal; [`ManualTicks`] lets tests drive a
/// fixed number of frames synchronously.

use std::io;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::render::Renderer;
use crate::session::SessionController;

pub trait TickSource {
    /// Block until the next frame is due.  `false` means no more frames.
    fn next_frame(&mut self) -> bool;
}

/// Sleeps so that consecutive frames start `period` apart.
pub struct FrameClock {
    period: Duration,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }
}

impl TickSource for FrameClock {
    fn next_frame(&mut self) -> bool {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());
        true
    }
}

/// Yields a fixed number of frames without waiting.
pub struct ManualTicks {
    remaining: u64,
}

impl ManualTicks {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl TickSource for ManualTicks {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub ticks: u64,
}

/// Main loop.  Each frame: `poll` (input, commands), a simulation tick if
/// the session is running, then one draw.  Stops when the source runs dry,
/// the token is cancelled or `poll` breaks.
pub fn run<S, R, G, F>(
    controller: &mut SessionController,
    source: &mut S,
    renderer: &mut R,
    token: &CancellationToken,
    rng: &mut G,
    mut poll: F,
) -> io::Result<RunStats>
where
    S: TickSource,
    R: Renderer,
    G: Rng,
    F: FnMut(&mut SessionController, &mut G) -> ControlFlow<()>,
{
    let mut stats = RunStats::default();

    while !token.is_cancelled() && source.next_frame() {
        if poll(controller, rng).is_break() {
            token.cancel();
            break;
        }
        if controller.tick(rng) {
            stats.ticks += 1;
        }
        renderer.draw(&controller.frame())?;
        stats.frames += 1;
    }

    debug!(frames = stats.frames, ticks = stats.ticks, "loop stopped");
    Ok(stats)
}
