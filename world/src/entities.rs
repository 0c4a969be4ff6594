//! Live actors spawned from level markers.

use std::collections::BTreeMap;

use macan_run_core::{
    Aabb, Action, Bounded, EffectKind, EnemyKind, Facing, InputSource, PlayerRecord,
    PlayerSnapshot,
};

/// Width of the player's body.
pub const PLAYER_WIDTH: f32 = 32.0;
/// Height of the player's body.
pub const PLAYER_HEIGHT: f32 = 48.0;
/// Walking speed without any effect applied.
pub const PLAYER_BASE_SPEED: f32 = 200.0;
/// Walking speed while the speed effect is active.
pub const PLAYER_BOOSTED_SPEED: f32 = 400.0;
/// Upward velocity applied by a jump.
pub const PLAYER_JUMP_FORCE: f32 = 500.0;
/// Health of a freshly spawned player.
pub const PLAYER_MAX_HEALTH: i32 = 3;
/// Jumps available between landings without any effect applied.
pub const PLAYER_BASE_JUMPS: u32 = 2;
/// Jumps available while the triple jump effect is active.
pub const PLAYER_BOOSTED_JUMPS: u32 = 3;
/// Seconds of damage immunity granted after each hit.
pub const INVULNERABILITY_SECONDS: f32 = 1.0;

const GROUND_ENEMY_SIZE: (f32, f32) = (32.0, 32.0);
const GROUND_ENEMY_SPEED: f32 = 80.0;
const GROUND_ENEMY_PATROL: f32 = 150.0;
const FLYING_ENEMY_SIZE: (f32, f32) = (36.0, 28.0);
const FLYING_ENEMY_SPEED: f32 = 100.0;
const FLYING_ENEMY_PATROL: f32 = 200.0;
const FLYING_AMPLITUDE: f32 = 60.0;
const FLYING_FREQUENCY: f32 = 2.0;
const SPIN_DEGREES_PER_SECOND: f32 = 180.0;

const COIN_SIZE: f32 = 24.0;
const SPIKE_SIZE: f32 = 48.0;
const FINISH_SIZE: (f32, f32) = (48.0, 96.0);
const POWER_UP_SIZE: f32 = 40.0;

/// The avatar steered by the input source.
///
/// Every field is populated at construction; the effect map starts empty and
/// the shield starts lowered.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Body width.
    pub width: f32,
    /// Body height.
    pub height: f32,
    /// Horizontal velocity in units per second.
    pub vx: f32,
    /// Vertical velocity in units per second, positive is downward.
    pub vy: f32,
    /// Whether the last physics step rested the player on a tile.
    pub on_ground: bool,
    /// Current health, never below zero.
    pub health: i32,
    /// Health ceiling.
    pub max_health: i32,
    /// Jumps allowed between landings.
    pub max_jumps: u32,
    /// Jump allowance restored when the triple jump effect expires.
    pub base_max_jumps: u32,
    /// Jumps left before the next landing.
    pub jumps_remaining: u32,
    /// Horizontal speed applied while a move action is held.
    pub move_speed: f32,
    /// Move speed restored when the speed effect expires.
    pub base_move_speed: f32,
    /// Seconds of damage immunity left.
    pub invulnerable_timer: f32,
    /// Direction of the last horizontal input.
    pub facing: Facing,
    /// Remaining seconds for every timed effect currently active.
    pub active_effects: BTreeMap<EffectKind, f32>,
    /// Whether incoming damage is absorbed.
    pub has_shield: bool,
}

impl Player {
    /// Spawns a player with its top-left corner at the provided position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            vx: 0.0,
            vy: 0.0,
            on_ground: false,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            max_jumps: PLAYER_BASE_JUMPS,
            base_max_jumps: PLAYER_BASE_JUMPS,
            jumps_remaining: PLAYER_BASE_JUMPS,
            move_speed: PLAYER_BASE_SPEED,
            base_move_speed: PLAYER_BASE_SPEED,
            invulnerable_timer: 0.0,
            facing: Facing::Right,
            active_effects: BTreeMap::new(),
            has_shield: false,
        }
    }

    /// Applies this tick's input and ages the invulnerability timer.
    ///
    /// Holding a move action overwrites `vx`; releasing both leaves `vx` to
    /// decay under friction. Returns `true` when a jump press was consumed;
    /// the caller decides whether the jump can actually happen.
    pub fn update<I: InputSource + ?Sized>(&mut self, dt: f32, input: &mut I) -> bool {
        if input.is_held(Action::MoveLeft) {
            self.vx = -self.move_speed;
            self.facing = Facing::Left;
        } else if input.is_held(Action::MoveRight) {
            self.vx = self.move_speed;
            self.facing = Facing::Right;
        }

        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        }

        input.take_just_pressed(Action::Jump)
    }

    /// Reports whether a recent hit still protects the player.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    /// Reports whether the player has run out of health.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Removes health unless the player is invulnerable or shielded.
    ///
    /// Returns whether the hit landed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_invulnerable() || self.has_shield {
            return false;
        }
        self.health = (self.health - amount).max(0);
        self.invulnerable_timer = INVULNERABILITY_SECONDS;
        true
    }

    /// Restores health up to the ceiling, reporting whether any was gained.
    pub fn heal(&mut self, amount: i32) -> bool {
        if self.health >= self.max_health {
            return false;
        }
        self.health = (self.health + amount).min(self.max_health);
        true
    }

    /// Center of the body.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }

    /// Read-only copy for presentation.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            bounds: self.bounds(),
            vx: self.vx,
            vy: self.vy,
            on_ground: self.on_ground,
            facing: self.facing,
            health: self.health,
            max_health: self.max_health,
            jumps_remaining: self.jumps_remaining,
            max_jumps: self.max_jumps,
            invulnerable: self.is_invulnerable(),
            has_shield: self.has_shield,
        }
    }

    /// Persistable subset of the player's state.
    #[must_use]
    pub fn record(&self) -> PlayerRecord {
        PlayerRecord {
            x: self.x,
            y: self.y,
            health: self.health,
        }
    }

    /// Restores position and health from a save.
    pub fn restore(&mut self, record: &PlayerRecord) {
        self.x = record.x;
        self.y = record.y;
        self.health = record.health.clamp(0, self.max_health);
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// Hostile actor sharing one shape across its behavioral variants.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    kind: EnemyKind,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    health: i32,
    max_health: i32,
    direction: Facing,
    spawn_x: f32,
    spawn_y: f32,
    patrol_range: f32,
    speed: f32,
    alive: bool,
    age: f32,
    spin_angle: f32,
}

impl Enemy {
    /// Walker that paces around its spawn point.
    #[must_use]
    pub fn ground(x: f32, y: f32) -> Self {
        Self::spawn(
            EnemyKind::Ground,
            x,
            y,
            GROUND_ENEMY_SIZE,
            2,
            GROUND_ENEMY_SPEED,
            GROUND_ENEMY_PATROL,
        )
    }

    /// Flyer that patrols horizontally while bobbing on a sine wave.
    #[must_use]
    pub fn flying(x: f32, y: f32) -> Self {
        Self::spawn(
            EnemyKind::Flying,
            x,
            y,
            FLYING_ENEMY_SIZE,
            2,
            FLYING_ENEMY_SPEED,
            FLYING_ENEMY_PATROL,
        )
    }

    /// Stationary spinner.
    #[must_use]
    pub fn spin(x: f32, y: f32) -> Self {
        Self::spawn(EnemyKind::Spin, x, y, GROUND_ENEMY_SIZE, 3, 0.0, 0.0)
    }

    fn spawn(
        kind: EnemyKind,
        x: f32,
        y: f32,
        (width, height): (f32, f32),
        health: i32,
        speed: f32,
        patrol_range: f32,
    ) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            height,
            health,
            max_health: health,
            direction: Facing::Right,
            spawn_x: x,
            spawn_y: y,
            patrol_range,
            speed,
            alive: true,
            age: 0.0,
            spin_angle: 0.0,
        }
    }

    /// Steps the scripted motion of the enemy. Dead enemies stay put.
    pub fn advance(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.age += dt;

        match self.kind {
            EnemyKind::Ground => self.patrol(dt),
            EnemyKind::Flying => {
                self.patrol(dt);
                self.y = self.spawn_y + (self.age * FLYING_FREQUENCY).sin() * FLYING_AMPLITUDE;
            }
            EnemyKind::Spin => {
                self.spin_angle = (self.spin_angle + SPIN_DEGREES_PER_SECOND * dt) % 360.0;
            }
        }
    }

    fn patrol(&mut self, dt: f32) {
        self.x += self.speed * self.direction.sign() * dt;
        if (self.x - self.spawn_x).abs() > self.patrol_range {
            self.direction = self.direction.reversed();
        }
    }

    /// Removes health, returning `true` when this hit killed the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        if self.health <= 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Behavioral variant.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Current patrol direction.
    #[must_use]
    pub const fn direction(&self) -> Facing {
        self.direction
    }

    /// Spawn position.
    #[must_use]
    pub const fn spawn_point(&self) -> (f32, f32) {
        (self.spawn_x, self.spawn_y)
    }

    /// Whether the enemy can still move and be hit.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Rotation in degrees, cosmetic only.
    #[must_use]
    pub const fn spin_angle(&self) -> f32 {
        self.spin_angle
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// Collectible worth score and a coin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coin {
    x: f32,
    y: f32,
}

impl Coin {
    /// Places a coin at the cell's top-left corner.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Bounded for Coin {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, COIN_SIZE, COIN_SIZE)
    }
}

/// Static hazard that hurts on contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spike {
    x: f32,
    y: f32,
}

impl Spike {
    /// Places a spike filling one cell.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Bounded for Spike {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, SPIKE_SIZE, SPIKE_SIZE)
    }
}

/// Flag that completes the level, two cells tall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finish {
    x: f32,
    y: f32,
}

impl Finish {
    /// Places the flag with its top at the marker cell.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Bounded for Finish {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, FINISH_SIZE.0, FINISH_SIZE.1)
    }
}

/// Pickup granting an [`EffectKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUp {
    x: f32,
    y: f32,
    kind: EffectKind,
}

impl PowerUp {
    /// Places a power-up of the provided kind.
    #[must_use]
    pub const fn new(x: f32, y: f32, kind: EffectKind) -> Self {
        Self { x, y, kind }
    }

    /// Effect granted on pickup.
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Grants the effect, reporting whether the player accepted it.
    ///
    /// Timed effects always succeed and restart their timer at full length.
    /// Health fails at full health, in which case the pickup must stay in
    /// the level.
    pub fn apply_to_player(&self, player: &mut Player) -> bool {
        match self.kind {
            EffectKind::Speed => player.move_speed = PLAYER_BOOSTED_SPEED,
            EffectKind::Shield => player.has_shield = true,
            EffectKind::TripleJump => {
                player.max_jumps = PLAYER_BOOSTED_JUMPS;
                player.jumps_remaining = PLAYER_BOOSTED_JUMPS;
            }
            EffectKind::Health => return player.heal(1),
        }

        if let Some(duration) = self.kind.duration() {
            let _ = player.active_effects.insert(self.kind, duration);
        }
        true
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, POWER_UP_SIZE, POWER_UP_SIZE)
    }
}
