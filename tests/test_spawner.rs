use neon_strike::config::{Arena, Tuning};
use neon_strike::entities::*;
use neon_strike::spawner::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

// ── spawn_interval ────────────────────────────────────────────────────────────

#[test]
fn interval_reference_points() {
    let t = Tuning::default();
    assert_eq!(spawn_interval(0, &t), 60);
    assert_eq!(spawn_interval(499, &t), 60);
    assert_eq!(spawn_interval(500, &t), 59);
    assert_eq!(spawn_interval(999, &t), 59);
    assert_eq!(spawn_interval(20_000, &t), 20);
}

#[test]
fn interval_never_drops_below_floor() {
    let t = Tuning::default();
    assert_eq!(spawn_interval(30_000, &t), 20);
    assert_eq!(spawn_interval(u32::MAX, &t), 20);
}

#[test]
fn interval_is_non_increasing_in_score() {
    let t = Tuning::default();
    let mut previous = spawn_interval(0, &t);
    for score in (0..40_000).step_by(125) {
        let current = spawn_interval(score, &t);
        assert!(current <= previous, "interval grew at score {score}");
        assert!(current >= 20);
        previous = current;
    }
}

// ── spawn ─────────────────────────────────────────────────────────────────────

#[test]
fn timer_counts_every_tick() {
    let mut session = SessionState::default();
    let arena = Arena::default();
    let t = Tuning::default();
    let mut rng = seeded_rng();
    for expected in 1..=10 {
        assert!(spawn(&mut session, &arena, &t, &mut rng).is_none());
        assert_eq!(session.spawn_timer, expected);
    }
}

#[test]
fn grunt_spawns_when_interval_elapses() {
    let mut session = SessionState {
        spawn_timer: 59,
        ..SessionState::default()
    };
    let arena = Arena::default();
    let t = Tuning::default();
    let g = spawn(&mut session, &arena, &t, &mut seeded_rng()).expect("grunt due");
    assert_eq!(g.kind, EnemyKind::Grunt);
    assert_eq!(g.y, -50.0);
    assert_eq!(g.hp, 1);
    assert_eq!(g.size, 22.0);
    assert!((0.0..800.0).contains(&g.x));
    assert_eq!(session.spawn_timer, 0);
}

#[test]
fn grunts_come_every_sixty_ticks_at_zero_score() {
    let mut session = SessionState::default();
    let arena = Arena::default();
    let t = Tuning::default();
    let mut rng = seeded_rng();
    let spawned_on: Vec<u32> = (1..=180)
        .filter(|_| spawn(&mut session, &arena, &t, &mut rng).is_some())
        .collect();
    assert_eq!(spawned_on, vec![60, 120, 180]);
}

#[test]
fn boss_spawns_at_trigger_score() {
    let mut session = SessionState {
        score: 7000,
        spawn_timer: 59,
        ..SessionState::default()
    };
    let arena = Arena::default();
    let t = Tuning::default();
    let b = spawn(&mut session, &arena, &t, &mut seeded_rng()).expect("boss due");
    assert!(b.is_boss());
    assert_eq!((b.x, b.y), (400.0, -100.0));
    assert_eq!(b.hp, 80);
    assert_eq!(b.max_hp, 80);
    assert_eq!(b.size, 75.0);
    assert!(session.boss_mode);
    // boss spawns leave the grunt timer alone
    assert_eq!(session.spawn_timer, 60);
}

#[test]
fn no_boss_just_below_trigger() {
    let mut session = SessionState {
        score: 6999,
        ..SessionState::default()
    };
    let out = spawn(&mut session, &Arena::default(), &Tuning::default(), &mut seeded_rng());
    assert!(out.is_none());
    assert!(!session.boss_mode);
}

#[test]
fn boss_mode_suspends_everything() {
    let mut session = SessionState {
        score: 9000,
        boss_mode: true,
        spawn_timer: 1000,
        ..SessionState::default()
    };
    let arena = Arena::default();
    let t = Tuning::default();
    let mut rng = seeded_rng();
    for _ in 0..200 {
        assert!(spawn(&mut session, &arena, &t, &mut rng).is_none());
    }
    assert_eq!(session.spawn_timer, 1200);
}

#[test]
fn boss_spawns_once_while_score_stays_above_trigger() {
    let mut session = SessionState {
        score: 7500,
        ..SessionState::default()
    };
    let arena = Arena::default();
    let t = Tuning::default();
    let mut rng = seeded_rng();
    let spawned: Vec<Enemy> = (0..500)
        .filter_map(|_| spawn(&mut session, &arena, &t, &mut rng))
        .collect();
    assert_eq!(spawned.len(), 1);
    assert!(spawned[0].is_boss());
}

#[test]
fn constructors_follow_tuning() {
    let t = Tuning {
        grunt_hp: 3,
        boss_hp: 10,
        ..Tuning::default()
    };
    let g = new_grunt(12.0, &t);
    assert_eq!((g.hp, g.max_hp), (3, 3));
    let b = new_boss(&Arena::new(300.0, 300.0).unwrap(), &t);
    assert_eq!(b.x, 150.0);
    assert_eq!((b.hp, b.max_hp), (10, 10));
    assert_eq!(b.kind, EnemyKind::Boss { dir: Heading::Right });
}
