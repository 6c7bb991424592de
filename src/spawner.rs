/// Enemy spawn policy.
///
/// Grunts arrive on a score-driven interval; a single boss appears once the
/// score reaches the trigger and holds the stage alone until destroyed.

use rand::Rng;
use tracing::{debug, trace};

use crate::config::{Arena, Tuning};
use crate::entities::{Enemy, EnemyKind, Heading, SessionState};

/// Ticks between grunt spawns at `score`.  Shrinks by one every
/// `spawn_interval_score_step` points, never below `spawn_interval_floor`.
pub fn spawn_interval(score: u32, tuning: &Tuning) -> u32 {
    let step = tuning.spawn_interval_score_step.max(1);
    tuning
        .spawn_interval_base
        .saturating_sub(score / step)
        .max(tuning.spawn_interval_floor)
}

pub fn new_grunt(x: f32, tuning: &Tuning) -> Enemy {
    Enemy {
        x,
        y: tuning.grunt_spawn_y,
        size: tuning.grunt_size,
        hp: tuning.grunt_hp,
        max_hp: tuning.grunt_hp,
        kind: EnemyKind::Grunt,
    }
}

pub fn new_boss(arena: &Arena, tuning: &Tuning) -> Enemy {
    Enemy {
        x: arena.width() / 2.0,
        y: tuning.boss_spawn_y,
        size: tuning.boss_size,
        hp: tuning.boss_hp,
        max_hp: tuning.boss_hp,
        kind: EnemyKind::Boss { dir: Heading::Right },
    }
}

/// Run the spawn policy for one tick.  Advances `session.spawn_timer`, may
/// flip `session.boss_mode`, and returns the enemy to add, if any.
pub fn spawn(
    session: &mut SessionState,
    arena: &Arena,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<Enemy> {
    session.spawn_timer = session.spawn_timer.saturating_add(1);

    if session.score >= tuning.boss_trigger_score && !session.boss_mode {
        session.boss_mode = true;
        debug!(score = session.score, "boss incoming");
        return Some(new_boss(arena, tuning));
    }

    if !session.boss_mode && session.spawn_timer >= spawn_interval(session.score, tuning) {
        session.spawn_timer = 0;
        let x = rng.gen_range(0.0..arena.width());
        trace!(x, "grunt spawned");
        return Some(new_grunt(x, tuning));
    }

    None
}
