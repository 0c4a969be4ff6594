use glam::Vec2;
use macan_run_core::{Facing, MAX_PARTICLES};
use macan_run_system_particles::{ParticleSystem, BURST_COLOR};

#[test]
fn oversized_burst_is_capped_without_error() {
    let mut system = ParticleSystem::new(7);
    system.emit_burst(Vec2::new(100.0, 100.0), 600, BURST_COLOR);
    assert_eq!(system.len(), MAX_PARTICLES);

    system.emit_coin_sparkle(Vec2::ZERO);
    assert_eq!(system.len(), MAX_PARTICLES);
}

#[test]
fn presets_emit_their_fixed_counts() {
    let mut system = ParticleSystem::new(1);
    system.emit_coin_sparkle(Vec2::ZERO);
    assert_eq!(system.len(), 12);
    system.emit_damage(Vec2::ZERO);
    assert_eq!(system.len(), 27);
    system.emit_enemy_death(Vec2::ZERO);
    assert_eq!(system.len(), 47);
    system.emit_jump_dust(Vec2::ZERO, None);
    assert_eq!(system.len(), 55);
    system.emit_jump_dust(Vec2::ZERO, Some(Facing::Left));
    system.emit_trail(Vec2::ZERO, Vec2::new(200.0, 0.0), 3);
    assert_eq!(system.len(), 66);
}

#[test]
fn particles_expire_after_their_lifetime() {
    let mut system = ParticleSystem::new(2);
    system.emit_burst(Vec2::ZERO, 40, BURST_COLOR);
    system.update(0.2);
    assert_eq!(system.len(), 40, "burst lifetimes start at half a second");

    system.update(1.5);
    assert!(system.is_empty());
}

#[test]
fn clear_empties_the_pool() {
    let mut system = ParticleSystem::new(2);
    system.emit_enemy_death(Vec2::new(10.0, 10.0));
    system.clear();
    assert!(system.is_empty());
    assert!(system.particles().is_empty());
}

#[test]
fn same_seed_reproduces_the_same_particles() {
    let mut first = ParticleSystem::new(99);
    let mut second = ParticleSystem::new(99);
    for system in [&mut first, &mut second] {
        system.emit_burst(Vec2::new(5.0, 5.0), 10, BURST_COLOR);
        system.update(0.1);
    }
    assert_eq!(first.particles(), second.particles());
}

#[test]
fn trail_drifts_against_the_movement() {
    let mut system = ParticleSystem::new(4);
    system.emit_trail(Vec2::ZERO, Vec2::new(1000.0, 0.0), 20);
    assert!(system
        .particles()
        .iter()
        .all(|particle| particle.velocity().x < 0.0));
}
