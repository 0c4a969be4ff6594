#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gravity, damping and tile collision for the player body.
//!
//! Only the player is integrated here. Enemies follow scripted motion and
//! never collide with terrain.

use macan_run_core::{Aabb, Bounded};
use macan_run_world::{Player, TileGrid};

/// Tunable constants of the physics step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    gravity: f32,
    terminal_velocity: f32,
    ground_friction: f32,
    air_resistance: f32,
}

impl PhysicsConfig {
    /// Creates a configuration from explicit constants.
    #[must_use]
    pub const fn new(
        gravity: f32,
        terminal_velocity: f32,
        ground_friction: f32,
        air_resistance: f32,
    ) -> Self {
        Self {
            gravity,
            terminal_velocity,
            ground_friction,
            air_resistance,
        }
    }

    /// Downward acceleration in units per second squared.
    #[must_use]
    pub const fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Fastest downward speed gravity can reach.
    #[must_use]
    pub const fn terminal_velocity(&self) -> f32 {
        self.terminal_velocity
    }

    /// Per-tick multiplier applied to `vx` while grounded.
    #[must_use]
    pub const fn ground_friction(&self) -> f32 {
        self.ground_friction
    }

    /// Per-tick multiplier applied to `vx` while airborne.
    #[must_use]
    pub const fn air_resistance(&self) -> f32 {
        self.air_resistance
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new(980.0, 600.0, 0.85, 0.98)
    }
}

/// Integrates the player and resolves its overlap with solid tiles.
#[derive(Debug, Default)]
pub struct Physics {
    config: PhysicsConfig,
}

impl Physics {
    /// Creates the system with the provided constants.
    #[must_use]
    pub const fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Constants in use.
    #[must_use]
    pub const fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advances the player by `dt` seconds.
    ///
    /// Without a tile grid the body moves freely and never lands.
    pub fn integrate(&self, dt: f32, player: &mut Player, tiles: Option<&TileGrid>) {
        if !player.on_ground {
            player.vy = (player.vy + self.config.gravity * dt).min(self.config.terminal_velocity);
        }

        player.vx *= if player.on_ground {
            self.config.ground_friction
        } else {
            self.config.air_resistance
        };

        player.x += player.vx * dt;
        player.y += player.vy * dt;
        player.on_ground = false;

        if let Some(tiles) = tiles {
            resolve_tile_collisions(player, tiles);
        }
    }
}

/// Strict AABB overlap between two bodies; touching edges do not collide.
#[must_use]
pub fn check_collision<A, B>(a: &A, b: &B) -> bool
where
    A: Bounded + ?Sized,
    B: Bounded + ?Sized,
{
    a.bounds().overlaps(&b.bounds())
}

/// Launches the player upward if a jump is left, reporting whether it did.
pub fn apply_jump(player: &mut Player, force: f32) -> bool {
    if player.jumps_remaining == 0 {
        return false;
    }
    player.vy = -force;
    player.jumps_remaining -= 1;
    player.on_ground = false;
    true
}

fn resolve_tile_collisions(player: &mut Player, tiles: &TileGrid) {
    let tile_size = tiles.tile_size();
    let body = player.bounds();

    // Search window is fixed from the integrated position before any push-out.
    let start_column = (cell_index(body.x, tile_size) - 1).max(0);
    let end_column = (cell_index(body.right(), tile_size) + 2).min(tiles.width() as i64);
    let start_row = (cell_index(body.y, tile_size) - 1).max(0);
    let end_row = (cell_index(body.bottom(), tile_size) + 2).min(tiles.height() as i64);

    for row in start_row..end_row {
        for column in start_column..end_column {
            if !tiles.is_solid_at(column, row) {
                continue;
            }
            let cell = tiles.cell_bounds(column, row);
            if player.bounds().overlaps(&cell) {
                push_out(player, &cell);
            }
        }
    }
}

fn cell_index(coordinate: f32, tile_size: f32) -> i64 {
    (coordinate / tile_size).floor() as i64
}

/// Resolves along the face of least penetration, provided the body moves into
/// that face. Ties resolve top, bottom, left, right in that order.
fn push_out(player: &mut Player, cell: &Aabb) {
    let body = player.bounds();
    let overlap_left = body.right() - cell.x;
    let overlap_right = cell.right() - body.x;
    let overlap_top = body.bottom() - cell.y;
    let overlap_bottom = cell.bottom() - body.y;
    let least = overlap_left
        .min(overlap_right)
        .min(overlap_top)
        .min(overlap_bottom);

    if least == overlap_top && player.vy > 0.0 {
        player.y = cell.y - player.height;
        player.vy = 0.0;
        player.on_ground = true;
        player.jumps_remaining = player.max_jumps;
    } else if least == overlap_bottom && player.vy < 0.0 {
        player.y = cell.bottom();
        player.vy = 0.0;
    } else if least == overlap_left && player.vx > 0.0 {
        player.x = cell.x - player.width;
        player.vx = 0.0;
    } else if least == overlap_right && player.vx < 0.0 {
        player.x = cell.right();
        player.vx = 0.0;
    }
}
