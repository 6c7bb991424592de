/// Game session controller.
///
/// Owns the game state, the input snapshot and the screen visibility flags,
/// and is the only place where the session phase changes.
///
/// ```text
/// Idle ──start──▶ Running ──(win | loss)──▶ Ended ──restart──▶ Idle
///                  │   ▲
///             pause│   │resume
///                  ▼   │
///                 Paused ──restart──▶ Idle
/// ```

use std::fmt;

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::compute::{init_state, player_shoot, tick};
use crate::config::{Arena, Tuning};
use crate::entities::{GameState, GameStatus};
use crate::input::InputState;
use crate::render::{Frame, Hud};

pub const TITLE_PAUSED: &str = "SYSTEM PAUSED";
pub const TITLE_VICTORY: &str = "MISSION COMPLETE";
pub const TITLE_DEFEAT: &str = "PILOT DOWN";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Ended(Outcome),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Running => f.write_str("running"),
            Phase::Paused => f.write_str("paused"),
            Phase::Ended(Outcome::Victory) => f.write_str("ended (victory)"),
            Phase::Ended(Outcome::Defeat) => f.write_str("ended (defeat)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Restart,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Restart => "restart",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {command} while {phase}")]
    InvalidTransition { command: Command, phase: Phase },
}

/// Which screens and status buttons are showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiVisibility {
    pub start_screen: bool,
    pub hud: bool,
    pub status_screen: bool,
    pub resume_button: bool,
    pub restart_button: bool,
    pub status_title: Option<&'static str>,
}

impl UiVisibility {
    fn title_screen() -> Self {
        Self {
            start_screen: true,
            hud: false,
            status_screen: false,
            resume_button: false,
            restart_button: false,
            status_title: None,
        }
    }
}

pub struct SessionController {
    state: GameState,
    input: InputState,
    phase: Phase,
    ui: UiVisibility,
}

impl SessionController {
    /// A controller sitting on the start screen.  The initial state is inert
    /// until [`SessionController::start`].
    pub fn new(arena: Arena, tuning: Tuning, rng: &mut impl Rng) -> Self {
        Self {
            state: idle_state(arena, tuning, rng),
            input: InputState::new(),
            phase: Phase::Idle,
            ui: UiVisibility::title_screen(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tests and scripted scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ui(&self) -> &UiVisibility {
        &self.ui
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Running && self.state.session.active
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(&self.state)
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            state: &self.state,
            phase: self.phase,
            ui: &self.ui,
            hud: self.hud(),
        }
    }

    pub fn apply(&mut self, command: Command, rng: &mut impl Rng) -> Result<(), SessionError> {
        match command {
            Command::Start => self.start(rng),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Restart => self.restart(rng),
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    pub fn start(&mut self, rng: &mut impl Rng) -> Result<(), SessionError> {
        self.expect(Command::Start, |p| p == Phase::Idle)?;
        self.state = init_state(self.state.arena, self.state.tuning, rng);
        self.input.clear();
        self.phase = Phase::Running;
        self.ui = UiVisibility {
            start_screen: false,
            hud: true,
            ..UiVisibility::title_screen()
        };
        info!("session started");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.expect(Command::Pause, |p| p == Phase::Running)?;
        self.state.session.active = false;
        self.phase = Phase::Paused;
        self.ui.status_screen = true;
        self.ui.status_title = Some(TITLE_PAUSED);
        self.ui.resume_button = true;
        self.ui.restart_button = true;
        info!(score = self.state.session.score, "session paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.expect(Command::Resume, |p| p == Phase::Paused)?;
        self.state.session.active = true;
        self.phase = Phase::Running;
        self.ui.status_screen = false;
        self.ui.status_title = None;
        self.ui.resume_button = false;
        self.ui.restart_button = false;
        info!("session resumed");
        Ok(())
    }

    /// Tear everything down and return to the start screen.
    pub fn restart(&mut self, rng: &mut impl Rng) -> Result<(), SessionError> {
        self.expect(Command::Restart, |p| {
            matches!(p, Phase::Ended(_) | Phase::Paused)
        })?;
        self.state = idle_state(self.state.arena, self.state.tuning, rng);
        self.input.clear();
        self.phase = Phase::Idle;
        self.ui = UiVisibility::title_screen();
        info!("session reset");
        Ok(())
    }

    fn expect(
        &self,
        command: Command,
        allowed: impl FnOnce(Phase) -> bool,
    ) -> Result<(), SessionError> {
        if allowed(self.phase) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                command,
                phase: self.phase,
            })
        }
    }

    // ── Per-frame ────────────────────────────────────────────────────────────

    /// Discrete fire trigger, independent of the tick cadence.
    pub fn fire(&mut self) {
        if self.is_active() {
            self.state = player_shoot(&self.state);
        }
    }

    /// Run one simulation step if the session is running.  Returns whether a
    /// step was taken.
    pub fn tick(&mut self, rng: &mut impl Rng) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = tick(&self.state, &self.input, rng);
        self.input.take_drag();

        let outcome = match self.state.status {
            GameStatus::Playing => return true,
            GameStatus::Won => Outcome::Victory,
            GameStatus::Lost => Outcome::Defeat,
        };
        self.end(outcome);
        true
    }

    fn end(&mut self, outcome: Outcome) {
        self.phase = Phase::Ended(outcome);
        self.ui = UiVisibility {
            start_screen: false,
            hud: false,
            status_screen: true,
            resume_button: false,
            restart_button: true,
            status_title: Some(match outcome {
                Outcome::Victory => TITLE_VICTORY,
                Outcome::Defeat => TITLE_DEFEAT,
            }),
        };
        info!(?outcome, score = self.state.session.score, "game over");
    }
}

fn idle_state(arena: Arena, tuning: Tuning, rng: &mut impl Rng) -> GameState {
    let mut state = init_state(arena, tuning, rng);
    state.session.active = false;
    state
}
