#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Macan Run platformer.
//!
//! This crate defines the vocabulary that connects adapters, the level world,
//! and the pure systems. Adapters feed logical [`Action`] values through an
//! [`InputSource`], the engine advances the simulation one tick at a time and
//! reports what happened as [`Event`] values, while collaborators outside the
//! simulation (levels on disk, audio, save files) are reached only through the
//! [`LevelSource`], [`AudioSink`] and [`SaveStore`] traits.

use std::{error::Error, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Side length of a single square tile expressed in world units.
pub const TILE_SIZE: f32 = 48.0;

/// Number of simulation ticks the external timer aims to drive per second.
pub const TICK_RATE_HZ: u32 = 60;

/// Longest span of simulated time a single tick may advance.
pub const MAX_TICK_DELTA: Duration = Duration::from_millis(100);

/// Vertical coordinate past which the player has fallen out of the level.
pub const FALL_OUT_Y: f32 = 1000.0;

/// Upper bound on concurrently live particles.
pub const MAX_PARTICLES: usize = 500;

/// Version tag stamped onto every save record written by the engine.
pub const SAVE_VERSION: &str = "1.0";

/// Prefix shared by every level name, e.g. `level3`.
pub const LEVEL_PREFIX: &str = "level";

/// Symbolic names of the sound effects the simulation can trigger.
pub mod sounds {
    /// Coin or power-up pickup, also used for the finish fanfare.
    pub const COIN: &str = "coin";
    /// Stomping an enemy or being hurt.
    pub const HIT: &str = "hit";
    /// Player death.
    pub const DEATH: &str = "death";
    /// Player jump.
    pub const JUMP: &str = "jump";
}

/// Axis-aligned rectangle used for every collision test.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Aabb {
    /// Left edge in world units.
    pub x: f32,
    /// Top edge in world units (y grows downward).
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Aabb {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge in world units.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge in world units.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Reports whether two rectangles overlap.
    ///
    /// All four comparisons are strict, so rectangles that merely share an
    /// edge do not collide.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Anything that occupies an axis-aligned rectangle in the world.
pub trait Bounded {
    /// Current bounding rectangle.
    fn bounds(&self) -> Aabb;
}

impl Bounded for Aabb {
    fn bounds(&self) -> Aabb {
        *self
    }
}

/// Timed (or instant) effect granted by a power-up.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EffectKind {
    /// Raises the player's move speed.
    Speed,
    /// Absorbs incoming damage while active.
    Shield,
    /// Grants a third mid-air jump.
    TripleJump,
    /// Instantly restores one point of health.
    Health,
}

impl EffectKind {
    /// Every effect kind in declaration order.
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Speed,
        EffectKind::Shield,
        EffectKind::TripleJump,
        EffectKind::Health,
    ];

    /// Full timer duration in seconds, or `None` for instant effects.
    #[must_use]
    pub const fn duration(self) -> Option<f32> {
        match self {
            Self::Speed => Some(10.0),
            Self::Shield => Some(15.0),
            Self::TripleJump => Some(20.0),
            Self::Health => None,
        }
    }

    /// Stable identifier used in HUD maps and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Shield => "shield",
            Self::TripleJump => "triple_jump",
            Self::Health => "health",
        }
    }

    /// Human-readable label for presentation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Speed => "Speed Boost",
            Self::Shield => "Shield",
            Self::TripleJump => "Triple Jump",
            Self::Health => "Health",
        }
    }

    /// Level-text symbol that spawns a power-up of this kind.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Speed => 'S',
            Self::Shield => 'D',
            Self::TripleJump => 'J',
            Self::Health => 'H',
        }
    }

    /// Resolves a level-text symbol into the power-up kind it spawns.
    #[must_use]
    pub fn from_marker(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.marker() == symbol)
    }
}

/// Behavioral variant of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks back and forth around its spawn point.
    Ground,
    /// Patrols horizontally while bobbing on a sine wave.
    Flying,
    /// Stationary and spinning in place.
    Spin,
}

/// Horizontal direction an actor faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    #[default]
    Right,
}

impl Facing {
    /// Unit sign along the x axis.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Top-level game state driven by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen; no level is being simulated.
    #[default]
    Menu,
    /// The level is being simulated.
    Running,
    /// Simulation is frozen until unpaused.
    Paused,
    /// The player died or fell out of the level.
    GameOver,
    /// The player reached the finish.
    LevelComplete,
}

impl GameState {
    /// Reports whether the state belongs to a live play session.
    #[must_use]
    pub const fn is_gameplay(self) -> bool {
        !matches!(self, Self::Menu)
    }
}

/// Logical input actions understood by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Held to walk left.
    MoveLeft,
    /// Held to walk right.
    MoveRight,
    /// Pressed to jump.
    Jump,
    /// Pressed to toggle pause.
    Pause,
    /// Pressed to return to the menu.
    Back,
    /// Pressed to start, continue or advance.
    Confirm,
    /// Pressed to restart from the first level.
    Restart,
    /// Pressed to resume from the save file.
    LoadSave,
}

impl Action {
    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Source of logical input consumed at the start of every tick.
///
/// Movement is level-triggered (`is_held`), everything else is
/// edge-triggered (`just_pressed`). Edge flags persist until the consumer
/// clears them.
pub trait InputSource {
    /// Reports whether the action is currently held down.
    fn is_held(&self, action: Action) -> bool;

    /// Reports whether the action was pressed and not yet consumed.
    fn just_pressed(&self, action: Action) -> bool;

    /// Clears the pending press of the action.
    fn clear_just_pressed(&mut self, action: Action);

    /// Returns and clears the pending press of the action.
    fn take_just_pressed(&mut self, action: Action) -> bool {
        let pressed = self.just_pressed(action);
        if pressed {
            self.clear_just_pressed(action);
        }
        pressed
    }
}

/// Press/release tracker adapters feed with logical actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    held: u16,
    just_pressed: u16,
}

impl InputState {
    /// Creates an input state with nothing held.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: 0,
            just_pressed: 0,
        }
    }

    /// Records that the action went down. Auto-repeat does not re-arm the edge.
    pub fn press(&mut self, action: Action) {
        if self.held & action.bit() == 0 {
            self.just_pressed |= action.bit();
        }
        self.held |= action.bit();
    }

    /// Records that the action went up.
    pub fn release(&mut self, action: Action) {
        self.held &= !action.bit();
        self.just_pressed &= !action.bit();
    }

    /// Drops every pending edge while keeping held actions.
    pub fn clear_all_just_pressed(&mut self) {
        self.just_pressed = 0;
    }
}

impl InputSource for InputState {
    fn is_held(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed & action.bit() != 0
    }

    fn clear_just_pressed(&mut self, action: Action) {
        self.just_pressed &= !action.bit();
    }
}

/// Visual color used by particles and presentation hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Events reported by the engine after each tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The engine moved between two game states.
    StateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// A level finished loading.
    LevelLoaded {
        /// Identifier of the level that was requested.
        level: u32,
        /// Whether the built-in fallback layout replaced missing level text.
        fallback: bool,
    },
    /// The player picked up a coin.
    CoinCollected {
        /// Score after the pickup.
        score: u64,
        /// Coin count after the pickup.
        coins: u32,
    },
    /// The player consumed a power-up.
    PowerUpCollected {
        /// Effect that was applied.
        kind: EffectKind,
    },
    /// The player touched a power-up that could not be applied.
    PowerUpRejected {
        /// Effect that was refused.
        kind: EffectKind,
    },
    /// A timed effect ran out and was reverted.
    PowerUpExpired {
        /// Effect that ended.
        kind: EffectKind,
    },
    /// The player landed on an enemy from above.
    EnemyStomped {
        /// Variant of the enemy that was hit.
        kind: EnemyKind,
        /// Whether the stomp killed the enemy.
        killed: bool,
    },
    /// The player lost health.
    PlayerDamaged {
        /// Health remaining after the hit.
        health: i32,
    },
    /// The player left the ground or jumped mid-air.
    PlayerJumped {
        /// Jumps left before landing again.
        jumps_remaining: u32,
    },
    /// Progress was handed to the save store.
    GameSaved {
        /// Level name stored in the record.
        level: String,
        /// Whether the store accepted the record.
        success: bool,
    },
}

/// Immutable copy of the player's state used for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Bounding rectangle of the player's body.
    pub bounds: Aabb,
    /// Horizontal velocity in units per second.
    pub vx: f32,
    /// Vertical velocity in units per second.
    pub vy: f32,
    /// Whether the player stood on a solid tile after the last tick.
    pub on_ground: bool,
    /// Direction the player faces.
    pub facing: Facing,
    /// Current health.
    pub health: i32,
    /// Health ceiling.
    pub max_health: i32,
    /// Jumps left before landing.
    pub jumps_remaining: u32,
    /// Current jump allowance.
    pub max_jumps: u32,
    /// Whether recent damage still protects the player.
    pub invulnerable: bool,
    /// Whether a shield effect is active.
    pub has_shield: bool,
}

/// Formats the canonical level name for an identifier, e.g. `level3`.
#[must_use]
pub fn level_name(level_id: u32) -> String {
    format!("{LEVEL_PREFIX}{level_id}")
}

/// Extracts the identifier from a canonical level name.
#[must_use]
pub fn parse_level_id(name: &str) -> Option<u32> {
    name.strip_prefix(LEVEL_PREFIX)?.parse().ok()
}

/// Player portion of a persisted save.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Health at the time of saving.
    pub health: i32,
}

/// Persisted progress exchanged with a [`SaveStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Level name; must start with `level`.
    pub level: String,
    /// Accumulated score.
    pub score: u64,
    /// Coins collected across levels.
    pub coins: u32,
    /// Player state.
    pub player: PlayerRecord,
    /// Wall-clock stamp added by the engine when saving.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Format version added by the engine when saving.
    #[serde(default)]
    pub version: Option<String>,
}

impl SaveRecord {
    /// Creates an unstamped record for the provided level.
    #[must_use]
    pub fn new(level_id: u32, score: u64, coins: u32, player: PlayerRecord) -> Self {
        Self {
            level: level_name(level_id),
            score,
            coins,
            player,
            timestamp: None,
            version: None,
        }
    }

    /// Adds the timestamp and the current format version.
    #[must_use]
    pub fn stamped(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self.version = Some(SAVE_VERSION.to_owned());
        self
    }

    /// Checks the invariants serde cannot express on its own.
    pub fn validate(&self) -> Result<(), SaveValidationError> {
        if !self.level.starts_with(LEVEL_PREFIX) {
            return Err(SaveValidationError::InvalidLevel(self.level.clone()));
        }
        Ok(())
    }

    /// Numeric level identifier; an unparsable suffix maps to the first level.
    #[must_use]
    pub fn level_id(&self) -> u32 {
        parse_level_id(&self.level).unwrap_or(1)
    }
}

/// Reasons a persisted save is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveValidationError {
    /// A required key is absent.
    MissingKey(&'static str),
    /// A key is present with the wrong type.
    InvalidType(&'static str),
    /// The level name does not start with `level`.
    InvalidLevel(String),
}

impl fmt::Display for SaveValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey(key) => write!(f, "save is missing required key '{key}'"),
            Self::InvalidType(key) => write!(f, "save key '{key}' has the wrong type"),
            Self::InvalidLevel(level) => write!(f, "save level '{level}' is not a level name"),
        }
    }
}

impl Error for SaveValidationError {}

/// Supplies raw level text by identifier.
pub trait LevelSource {
    /// Returns the text of `level<id>`, or `None` when it is unavailable.
    fn level_text(&self, level_id: u32) -> Option<String>;
}

/// Receives audio cues by symbolic name.
pub trait AudioSink {
    /// Triggers a one-shot sound effect.
    fn play_effect(&mut self, name: &str);
    /// Starts the named background track from the beginning.
    fn play_music(&mut self, track: &str);
    /// Stops the background track.
    fn stop_music(&mut self);
    /// Pauses the background track.
    fn pause_music(&mut self);
    /// Resumes a paused background track.
    fn resume_music(&mut self);
}

/// Persists and restores progress.
///
/// A missing save and a corrupt save are indistinguishable to callers: both
/// load as `None`.
pub trait SaveStore {
    /// Stores the record, reporting whether it was written.
    fn save(&mut self, record: &SaveRecord) -> bool;
    /// Loads the most recent valid record.
    fn load(&mut self) -> Option<SaveRecord>;
}
