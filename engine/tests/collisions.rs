use macan_run_core::{EffectKind, EnemyKind, Event};
use macan_run_engine::{
    collisions::{self, Feedback, Scoreboard, STOMP_BOUNCE_VELOCITY},
    NullAudio,
};
use macan_run_system_particles::ParticleSystem;
use macan_run_world::{query, InMemoryLevels, LevelManager};

// Ground enemy spawns at (96, 96).
const ENEMY_LEVEL: &str = "P.....\n......\n..E...";

struct Harness {
    level: LevelManager,
    scoreboard: Scoreboard,
    particles: ParticleSystem,
    events: Vec<Event>,
}

impl Harness {
    fn load(text: &str) -> Self {
        let mut events = Vec::new();
        let mut level = LevelManager::new();
        level.load_level(1, &InMemoryLevels::new().with_level(1, text), &mut events);
        events.clear();
        Self {
            level,
            scoreboard: Scoreboard::default(),
            particles: ParticleSystem::new(7),
            events,
        }
    }

    fn place_player(&mut self, x: f32, y: f32, vy: f32) {
        let player = self.level.player_mut().expect("player");
        player.x = x;
        player.y = y;
        player.vy = vy;
    }

    fn resolve(&mut self) -> bool {
        let mut parts = self.level.parts_mut().expect("loaded level");
        collisions::resolve(
            &mut parts,
            &mut self.scoreboard,
            &mut Feedback {
                audio: &mut NullAudio,
                particles: &mut self.particles,
                out_events: &mut self.events,
            },
        )
    }
}

#[test]
fn falling_onto_an_enemy_from_above_is_a_stomp() {
    let mut harness = Harness::load(ENEMY_LEVEL);
    harness.place_player(100.0, 90.0, 50.0);

    assert!(!harness.resolve());

    let enemies = query::enemies(&harness.level);
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].health(), 1);
    assert_eq!(harness.scoreboard.score, 25);
    let player = query::player(&harness.level).expect("player");
    assert_eq!(player.vy, STOMP_BOUNCE_VELOCITY);
    assert_eq!(player.health, 3);
    assert_eq!(
        harness.events,
        vec![Event::EnemyStomped {
            kind: EnemyKind::Ground,
            killed: false,
        }]
    );
}

#[test]
fn a_second_stomp_kills_and_removes_the_enemy() {
    let mut harness = Harness::load(ENEMY_LEVEL);
    harness.place_player(100.0, 90.0, 50.0);
    let _ = harness.resolve();
    harness.place_player(100.0, 90.0, 50.0);
    let _ = harness.resolve();

    assert!(query::enemies(&harness.level).is_empty());
    assert_eq!(harness.scoreboard.score, 25 + 50);
    assert!(harness.events.contains(&Event::EnemyStomped {
        kind: EnemyKind::Ground,
        killed: true,
    }));
    assert!(!harness.particles.is_empty());
}

#[test]
fn touching_an_enemy_from_the_side_hurts_the_player() {
    let mut harness = Harness::load(ENEMY_LEVEL);
    harness.place_player(80.0, 96.0, 0.0);
    let _ = harness.resolve();

    let player = query::player(&harness.level).expect("player");
    assert_eq!(player.health, 2);
    assert!(player.is_invulnerable());
    assert_eq!(query::enemies(&harness.level)[0].health(), 2);
    assert_eq!(harness.events, vec![Event::PlayerDamaged { health: 2 }]);

    let _ = harness.resolve();
    assert_eq!(query::player(&harness.level).map(|p| p.health), Some(2));
    assert_eq!(harness.events.len(), 1);
}

#[test]
fn rising_through_an_enemy_is_not_a_stomp() {
    let mut harness = Harness::load(ENEMY_LEVEL);
    harness.place_player(100.0, 90.0, -50.0);
    let _ = harness.resolve();
    assert_eq!(query::enemies(&harness.level)[0].health(), 2);
    assert_eq!(query::player(&harness.level).map(|p| p.health), Some(2));
}

#[test]
fn a_shield_absorbs_contact_damage_silently() {
    let mut harness = Harness::load(ENEMY_LEVEL);
    harness.level.player_mut().expect("player").has_shield = true;
    harness.place_player(80.0, 96.0, 0.0);
    let _ = harness.resolve();
    assert_eq!(query::player(&harness.level).map(|p| p.health), Some(3));
    assert!(harness.events.is_empty());
}

#[test]
fn overlapping_coins_are_collected_in_one_pass() {
    let mut harness = Harness::load("PCC\n...");
    harness.place_player(70.0, 0.0, 0.0);
    let _ = harness.resolve();
    assert_eq!(harness.scoreboard, Scoreboard { score: 200, coins: 2 });
    assert!(query::coins(&harness.level).is_empty());
}

#[test]
fn pickups_that_apply_are_removed() {
    let mut harness = Harness::load("PJ.\n...");
    harness.place_player(40.0, 0.0, 0.0);
    let _ = harness.resolve();
    assert!(query::power_ups(&harness.level).is_empty());
    let player = query::player(&harness.level).expect("player");
    assert_eq!((player.max_jumps, player.jumps_remaining), (3, 3));
    assert_eq!(
        harness.events,
        vec![Event::PowerUpCollected {
            kind: EffectKind::TripleJump,
        }]
    );
}

#[test]
fn a_refused_pickup_reports_every_pass() {
    let mut harness = Harness::load("PH.\n...");
    harness.place_player(40.0, 0.0, 0.0);
    let _ = harness.resolve();
    let _ = harness.resolve();
    assert_eq!(query::power_ups(&harness.level).len(), 1);
    assert_eq!(
        harness.events,
        vec![
            Event::PowerUpRejected {
                kind: EffectKind::Health,
            };
            2
        ]
    );
}

#[test]
fn a_wounded_player_takes_the_health_pickup() {
    let mut harness = Harness::load("PH.\n...");
    harness.level.player_mut().expect("player").health = 1;
    harness.place_player(40.0, 0.0, 0.0);
    let _ = harness.resolve();
    assert!(query::power_ups(&harness.level).is_empty());
    assert_eq!(query::player(&harness.level).map(|p| p.health), Some(2));
}

#[test]
fn the_finish_is_reported_on_overlap() {
    let mut harness = Harness::load("P.G\n...");
    assert!(!harness.resolve());
    harness.place_player(80.0, 40.0, 0.0);
    assert!(harness.resolve());
}
