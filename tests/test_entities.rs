use neon_strike::config::{Arena, Tuning};
use neon_strike::entities::*;

fn make_state() -> GameState {
    GameState {
        player: Player {
            x: 400.0,
            y: 500.0,
            size: 22.0,
            hp: 100,
            bullets: Vec::new(),
        },
        enemies: Vec::new(),
        stars: Vec::new(),
        session: SessionState::default(),
        status: GameStatus::Playing,
        frame: 0,
        arena: Arena::default(),
        tuning: Tuning::default(),
    }
}

fn enemy(kind: EnemyKind) -> Enemy {
    Enemy {
        x: 10.0,
        y: 10.0,
        size: 22.0,
        hp: 1,
        max_hp: 1,
        kind,
    }
}

#[test]
fn heading_sign_and_reverse() {
    assert_eq!(Heading::Left.sign(), -1.0);
    assert_eq!(Heading::Right.sign(), 1.0);
    assert_eq!(Heading::Left.reversed(), Heading::Right);
    assert_eq!(Heading::Right.reversed().reversed(), Heading::Right);
}

#[test]
fn only_boss_variant_is_boss() {
    assert!(!enemy(EnemyKind::Grunt).is_boss());
    assert!(enemy(EnemyKind::Boss { dir: Heading::Left }).is_boss());
}

#[test]
fn boss_lookup_finds_the_boss() {
    let mut s = make_state();
    assert!(s.boss().is_none());
    s.enemies.push(enemy(EnemyKind::Grunt));
    s.enemies.push(enemy(EnemyKind::Boss { dir: Heading::Right }));
    assert_eq!(s.boss().map(|b| b.kind), Some(EnemyKind::Boss { dir: Heading::Right }));
}

#[test]
fn fresh_session_state_is_zeroed() {
    let session = SessionState::default();
    assert_eq!(session.score, 0);
    assert!(!session.boss_mode);
    assert_eq!(session.spawn_timer, 0);
    assert!(!session.active);
}

#[test]
fn game_state_clone_is_independent() {
    let original = make_state();
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.player.bullets.push(Bullet { x: 1.0, y: 2.0 });
    cloned.session.score = 999;
    cloned.enemies.push(enemy(EnemyKind::Grunt));

    assert_eq!(original.player.x, 400.0);
    assert!(original.player.bullets.is_empty());
    assert_eq!(original.session.score, 0);
    assert!(original.enemies.is_empty());
}
