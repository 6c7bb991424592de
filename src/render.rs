/// Drawing contract between the session and whatever puts pixels on screen.

use std::io;

use crate::entities::GameState;
use crate::session::{Phase, UiVisibility};

/// Everything a renderer may look at for one frame.  Read-only.
pub struct Frame<'a> {
    pub state: &'a GameState,
    pub phase: Phase,
    pub ui: &'a UiVisibility,
    pub hud: Hud,
}

pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// HUD text and gauges, derived once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    /// Score zero-padded to five digits.
    pub score_text: String,
    /// Health bar fill, 0..=100.
    pub health_percent: u8,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score_text: format!("{:05}", state.session.score),
            health_percent: health_percent(state.player.hp, state.tuning.player_max_hp),
        }
    }
}

pub fn health_percent(hp: i32, max_hp: i32) -> u8 {
    if max_hp <= 0 {
        return 0;
    }
    let pct = (hp.clamp(0, max_hp) as i64 * 100) / max_hp as i64;
    pct as u8
}

/// Fill fraction for the boss health bar.  A non-positive `max_hp` yields an
/// empty bar instead of dividing by zero.
pub fn boss_health_fraction(hp: i32, max_hp: i32) -> f32 {
    if max_hp <= 0 {
        return 0.0;
    }
    (hp as f32 / max_hp as f32).clamp(0.0, 1.0)
}
