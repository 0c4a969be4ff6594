use macan_run_core::Aabb;
use macan_run_system_physics::{apply_jump, check_collision, Physics, PhysicsConfig};
use macan_run_world::{Player, TileGrid};

const DT: f32 = 1.0 / 60.0;

#[test]
fn falling_speed_never_exceeds_terminal_velocity() {
    let physics = Physics::default();
    let mut player = Player::new(0.0, 0.0);

    for _ in 0..600 {
        physics.integrate(DT, &mut player, None);
        assert!(player.vy.abs() <= 600.0, "vy = {}", player.vy);
    }
    assert_eq!(player.vy, 600.0);
}

#[test]
fn large_step_is_still_clamped() {
    let physics = Physics::default();
    let mut player = Player::new(0.0, 0.0);
    physics.integrate(5.0, &mut player, None);
    assert_eq!(player.vy, 600.0);
}

#[test]
fn landing_on_a_tile_grounds_the_player_and_restores_jumps() {
    let physics = Physics::default();
    let tiles = TileGrid::load("...\n...\n###");
    let mut player = Player::new(48.0, 96.0 - 48.0 - 2.0);
    player.vy = 300.0;
    player.jumps_remaining = 0;

    physics.integrate(DT, &mut player, Some(&tiles));

    assert!(player.on_ground);
    assert_eq!(player.vy, 0.0);
    assert_eq!(player.jumps_remaining, player.max_jumps);
    assert_eq!(player.y, 96.0 - 48.0);
}

#[test]
fn hitting_a_ceiling_stops_upward_motion() {
    let physics = Physics::default();
    let tiles = TileGrid::load("###\n...\n...");
    let mut player = Player::new(48.0, 50.0);
    player.vy = -400.0;

    physics.integrate(DT, &mut player, Some(&tiles));

    assert_eq!(player.y, 48.0);
    assert_eq!(player.vy, 0.0);
    assert!(!player.on_ground);
}

#[test]
fn walking_into_a_wall_zeroes_horizontal_velocity() {
    let physics = Physics::default();
    let tiles = TileGrid::load("..|\n..|\n..|");
    let mut player = Player::new(96.0 - 32.0 - 1.0, 20.0);
    player.vx = 200.0;
    player.vy = 0.0;

    physics.integrate(DT, &mut player, Some(&tiles));

    assert_eq!(player.vx, 0.0);
    assert_eq!(player.x, 96.0 - 32.0);
}

#[test]
fn equal_overlaps_prefer_the_top_face() {
    let physics = Physics::default();
    let tiles = TileGrid::load("..\n.#");
    let mut player = Player::new(20.0, 4.0);
    player.vx = 10.0;
    player.vy = 10.0;

    physics.integrate(0.0, &mut player, Some(&tiles));

    assert!(player.on_ground);
    assert_eq!(player.y, 0.0);
    assert_eq!(player.x, 20.0);
    assert!(player.vx > 0.0, "side resolution fired instead of top");
}

#[test]
fn friction_decays_velocity_without_snapping_to_zero() {
    let physics = Physics::default();
    let mut grounded = Player::new(0.0, 0.0);
    grounded.on_ground = true;
    grounded.vx = 200.0;
    physics.integrate(DT, &mut grounded, None);
    assert!((grounded.vx - 170.0).abs() < 1e-3);

    let mut airborne = Player::new(0.0, 0.0);
    airborne.vx = 200.0;
    physics.integrate(DT, &mut airborne, None);
    assert!((airborne.vx - 196.0).abs() < 1e-3);
}

#[test]
fn markers_do_not_block_the_body() {
    let physics = Physics::default();
    let tiles = TileGrid::load("...\n...\nCG^");
    let mut player = Player::new(48.0, 96.0 - 48.0 - 2.0);
    player.vy = 300.0;

    physics.integrate(DT, &mut player, Some(&tiles));

    assert!(!player.on_ground);
    assert!(player.vy > 0.0);
}

#[test]
fn jump_requires_a_remaining_jump() {
    let mut player = Player::new(0.0, 0.0);
    player.on_ground = true;

    assert!(apply_jump(&mut player, 500.0));
    assert_eq!(player.vy, -500.0);
    assert!(!player.on_ground);
    assert!(apply_jump(&mut player, 500.0));
    assert_eq!(player.jumps_remaining, 0);

    player.vy = 12.0;
    assert!(!apply_jump(&mut player, 500.0));
    assert_eq!(player.vy, 12.0);
    assert_eq!(player.jumps_remaining, 0);
}

#[test]
fn collision_check_is_strict_on_shared_edges() {
    let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
    let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
    assert!(!check_collision(&a, &b));

    let player = Player::new(5.0, 0.0);
    assert!(check_collision(&player, &a));
}

#[test]
fn custom_config_is_honored() {
    let physics = Physics::new(PhysicsConfig::new(100.0, 50.0, 1.0, 1.0));
    let mut player = Player::new(0.0, 0.0);
    player.vx = 60.0;
    physics.integrate(1.0, &mut player, None);
    assert_eq!(player.vy, 50.0);
    assert_eq!(player.vx, 60.0);
    assert_eq!(player.y, 50.0);
}
