/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, the input snapshot and an RNG handle) and
/// returns a brand-new `GameState`.  Side effects are limited to the injected
/// RNG.

use rand::Rng;
use tracing::{debug, info};

use crate::config::{Arena, Tuning};
use crate::entities::{
    Bullet, Enemy, EnemyKind, GameState, GameStatus, Player, SessionState, Star,
};
use crate::input::InputState;
use crate::spawner;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh, running session: zero score, full health, empty skies.
pub fn init_state(arena: Arena, tuning: Tuning, rng: &mut impl Rng) -> GameState {
    let size = tuning.player_size;
    let player = Player {
        x: clamp_axis(arena.width() / 2.0, size, arena.width()),
        y: clamp_axis(arena.height() - tuning.player_start_offset, size, arena.height()),
        size,
        hp: tuning.player_max_hp,
        bullets: Vec::new(),
    };

    let stars = (0..tuning.star_count)
        .map(|_| Star {
            x: rng.gen_range(0.0..arena.width()),
            y: rng.gen_range(0.0..arena.height()),
            // An empty range would panic; a zero jitter leaves the base speed.
            speed: if tuning.star_max_speed > 0.0 {
                rng.gen_range(0.0..tuning.star_max_speed)
            } else {
                0.0
            },
        })
        .collect();

    GameState {
        player,
        enemies: Vec::new(),
        stars,
        session: SessionState {
            active: true,
            ..SessionState::default()
        },
        status: GameStatus::Playing,
        frame: 0,
        arena,
        tuning,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Fire one bullet from the nose of the ship.  No cap on bullets in flight.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut bullets = state.player.bullets.clone();
    bullets.push(Bullet {
        x: state.player.x,
        y: state.player.y - state.tuning.bullet_muzzle_offset,
    });
    GameState {
        player: Player {
            bullets,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Apply held-key direction and pending drag, then clamp to the arena.
pub fn move_player(
    player: &Player,
    direction: (f32, f32),
    drag: (f32, f32),
    arena: &Arena,
    tuning: &Tuning,
) -> Player {
    let x = player.x + direction.0 * tuning.player_speed + drag.0 * tuning.drag_gain;
    let y = player.y + direction.1 * tuning.player_speed + drag.1 * tuning.drag_gain;
    Player {
        x: clamp_axis(x, player.size, arena.width()),
        y: clamp_axis(y, player.size, arena.height()),
        ..player.clone()
    }
}

fn clamp_axis(value: f32, margin: f32, extent: f32) -> f32 {
    // Arena validation guarantees margin <= extent - margin.
    value.max(margin).min(extent - margin)
}

pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (ax - bx).hypot(ay - by)
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// An inactive or finished session is returned unchanged.
pub fn tick(state: &GameState, input: &InputState, rng: &mut impl Rng) -> GameState {
    if !state.session.active || state.status != GameStatus::Playing {
        return state.clone();
    }
    let arena = &state.arena;
    let tuning = &state.tuning;

    // ── 1. Player movement ───────────────────────────────────────────────────
    let player = move_player(&state.player, input.direction(), input.drag(), arena, tuning);

    // ── 2. Spawn ─────────────────────────────────────────────────────────────
    let mut session = state.session.clone();
    let mut enemies = state.enemies.clone();
    if let Some(enemy) = spawner::spawn(&mut session, arena, tuning, rng) {
        enemies.push(enemy);
    }

    // ── 3. Background ────────────────────────────────────────────────────────
    let stars = advance_stars(&state.stars, arena, tuning);

    // ── 4. Bullets ───────────────────────────────────────────────────────────
    let bullets = advance_bullets(&player.bullets, tuning);

    // ── 5. Enemies ───────────────────────────────────────────────────────────
    let enemies = advance_enemies(enemies, arena, tuning);

    // ── 6. Collision: bullets ↔ enemies ─────────────────────────────────────
    let volley = resolve_bullet_hits(enemies, bullets, tuning);
    session.score = session.score.saturating_add(volley.score_gain);
    if volley.boss_destroyed {
        session.boss_mode = false;
        debug!(score = session.score, "boss destroyed");
    }
    let enemies = volley.enemies;

    // ── 7. Collision: enemies ↔ player ──────────────────────────────────────
    let damage = contact_damage(&player, &enemies, tuning);
    let player = Player {
        hp: (player.hp - damage).max(0),
        bullets: volley.bullets,
        ..player
    };

    // ── 8. Off-screen cleanup ────────────────────────────────────────────────
    let floor = arena.height() + tuning.offscreen_margin;
    let enemies: Vec<Enemy> = enemies.into_iter().filter(|e| e.y <= floor).collect();

    // ── 9. End conditions ────────────────────────────────────────────────────
    // The win check runs last, so a kill that reaches the target on the same
    // tick as a fatal hit still counts as a win.
    let mut status = GameStatus::Playing;
    if player.hp <= 0 {
        status = GameStatus::Lost;
    }
    if session.score >= tuning.win_score {
        status = GameStatus::Won;
    }
    if status != GameStatus::Playing {
        session.active = false;
        info!(?status, score = session.score, frame = state.frame + 1, "session ended");
    }

    GameState {
        player,
        enemies,
        stars,
        session,
        status,
        frame: state.frame + 1,
        ..state.clone()
    }
}

fn advance_stars(stars: &[Star], arena: &Arena, tuning: &Tuning) -> Vec<Star> {
    stars
        .iter()
        .map(|s| {
            let y = s.y + s.speed + tuning.star_base_speed;
            Star {
                y: if y > arena.height() { tuning.star_wrap_y } else { y },
                ..s.clone()
            }
        })
        .collect()
}

fn advance_bullets(bullets: &[Bullet], tuning: &Tuning) -> Vec<Bullet> {
    bullets
        .iter()
        .map(|b| Bullet {
            y: b.y - tuning.bullet_speed,
            ..b.clone()
        })
        .filter(|b| b.y >= 0.0)
        .collect()
}

fn advance_enemies(enemies: Vec<Enemy>, arena: &Arena, tuning: &Tuning) -> Vec<Enemy> {
    enemies
        .into_iter()
        .map(|mut e| {
            match e.kind {
                EnemyKind::Boss { dir } => {
                    // Eases toward the hover line without ever landing on it.
                    e.y += (tuning.boss_hover_y - e.y) * tuning.boss_easing;
                    e.x += dir.sign() * tuning.boss_patrol_speed;
                    let margin = tuning.boss_patrol_margin;
                    if e.x > arena.width() - margin || e.x < margin {
                        e.kind = EnemyKind::Boss { dir: dir.reversed() };
                    }
                }
                EnemyKind::Grunt => e.y += tuning.grunt_fall_speed,
            }
            e
        })
        .collect()
}

struct Volley {
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    score_gain: u32,
    boss_destroyed: bool,
}

/// Enemy-major sweep.  A bullet is consumed by its first hit and never tested
/// again; an enemy stops absorbing bullets once its hp is gone.
fn resolve_bullet_hits(enemies: Vec<Enemy>, bullets: Vec<Bullet>, tuning: &Tuning) -> Volley {
    let mut consumed = vec![false; bullets.len()];
    let mut survivors = Vec::with_capacity(enemies.len());
    let mut score_gain = 0u32;
    let mut boss_destroyed = false;

    for mut enemy in enemies {
        let reach = enemy.size + tuning.bullet_hit_radius;
        for (bullet, used) in bullets.iter().zip(consumed.iter_mut()) {
            if enemy.hp <= 0 {
                break;
            }
            if *used {
                continue;
            }
            if distance(bullet.x, bullet.y, enemy.x, enemy.y) < reach {
                enemy.hp -= 1;
                *used = true;
            }
        }

        if enemy.hp > 0 {
            survivors.push(enemy);
            continue;
        }
        match enemy.kind {
            EnemyKind::Boss { .. } => {
                score_gain = score_gain.saturating_add(tuning.boss_score);
                boss_destroyed = true;
            }
            EnemyKind::Grunt => score_gain = score_gain.saturating_add(tuning.grunt_score),
        }
    }

    let bullets = bullets
        .into_iter()
        .zip(consumed)
        .filter_map(|(b, used)| (!used).then_some(b))
        .collect();

    Volley {
        enemies: survivors,
        bullets,
        score_gain,
        boss_destroyed,
    }
}

/// Total damage the player takes this tick from every overlapping enemy.
fn contact_damage(player: &Player, enemies: &[Enemy], tuning: &Tuning) -> i32 {
    enemies
        .iter()
        .filter(|e| {
            distance(player.x, player.y, e.x, e.y) < e.size + tuning.player_contact_radius
        })
        .map(|e| match e.kind {
            EnemyKind::Boss { .. } => tuning.boss_contact_damage,
            EnemyKind::Grunt => tuning.grunt_contact_damage,
        })
        .sum()
}
