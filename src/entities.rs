/// All game entity types — pure data, no logic.

use crate::config::{Arena, Tuning};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

/// Horizontal patrol direction of the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Heading {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Grunt,
    Boss { dir: Heading },
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Collision radius; also the clamp margin against the arena edges.
    pub size: f32,
    pub hp: i32,
    /// Bullets in flight, oldest first.
    pub bullets: Vec<Bullet>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }
}

/// Background particle. Never touches gameplay.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

// ── Session bookkeeping ───────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub score: u32,
    /// Set while a boss is alive; suspends grunt spawns.
    pub boss_mode: bool,
    /// Ticks since the last grunt spawn.
    pub spawn_timer: u32,
    /// Gates the simulation step.
    pub active: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so the tick can return a new copy
/// without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub stars: Vec<Star>,
    pub session: SessionState,
    pub status: GameStatus,
    /// Simulation ticks executed since the session started.
    pub frame: u64,
    pub arena: Arena,
    pub tuning: Tuning,
}

impl GameState {
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }
}
