#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Macan Run.
//!
//! The [`LevelManager`] owns the tile grid and every live entity of the
//! current level. Systems borrow the pieces they need for one tick through
//! [`LevelManager::parts_mut`]; adapters and tests read state through the
//! [`query`] module.

mod entities;
mod tiles;

use std::collections::HashMap;

use macan_run_core::{EffectKind, Event, LevelSource};

pub use entities::{
    Coin, Enemy, Finish, Player, PowerUp, Spike, INVULNERABILITY_SECONDS, PLAYER_BASE_JUMPS,
    PLAYER_BASE_SPEED, PLAYER_BOOSTED_JUMPS, PLAYER_BOOSTED_SPEED, PLAYER_HEIGHT,
    PLAYER_JUMP_FORCE, PLAYER_MAX_HEALTH, PLAYER_WIDTH,
};
pub use tiles::{TileGrid, EMPTY_TILE, ENTITY_MARKERS};

/// Layout used whenever the requested level text is unavailable.
pub const FALLBACK_LEVEL: &str = "
.........................................
.........................................
.........................................
.........................................
......C.....C.....C......................
.....###...###...###.....................
P...............................E........
########............#####################
........C...C...C........................
....#################..........^.........
................................##########
..........................C.............G
##############################.###########
";

/// Lifecycle of the level manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LevelState {
    /// Nothing has been loaded yet.
    #[default]
    Empty,
    /// A level is loaded and its entities are live.
    Loaded,
}

/// Owns the tile grid and the live entity collections of one level.
#[derive(Debug, Default)]
pub struct LevelManager {
    state: LevelState,
    level_id: u32,
    used_fallback: bool,
    tiles: Option<TileGrid>,
    player: Option<Player>,
    enemies: Vec<Enemy>,
    coins: Vec<Coin>,
    spikes: Vec<Spike>,
    power_ups: Vec<PowerUp>,
    finish: Option<Finish>,
}

/// Mutable view over a loaded level, valid for one tick.
#[derive(Debug)]
pub struct LevelPartsMut<'a> {
    /// Static terrain.
    pub tiles: &'a TileGrid,
    /// The player.
    pub player: &'a mut Player,
    /// Live enemies.
    pub enemies: &'a mut Vec<Enemy>,
    /// Coins not yet collected.
    pub coins: &'a mut Vec<Coin>,
    /// Hazards.
    pub spikes: &'a [Spike],
    /// Power-ups not yet consumed.
    pub power_ups: &'a mut Vec<PowerUp>,
    /// Finish flag, if the level has one.
    pub finish: Option<&'a Finish>,
}

impl LevelManager {
    /// Creates an empty manager with no level loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current level with `level<id>`.
    ///
    /// Every collection is rebuilt from the source text, never from the
    /// depleted in-memory state. Missing text loads [`FALLBACK_LEVEL`].
    pub fn load_level(
        &mut self,
        level_id: u32,
        source: &dyn LevelSource,
        out_events: &mut Vec<Event>,
    ) {
        self.clear();

        let (text, fallback) = match source.level_text(level_id) {
            Some(text) => (text, false),
            None => {
                tracing::warn!(level_id, "level text unavailable, using fallback layout");
                (FALLBACK_LEVEL.to_owned(), true)
            }
        };

        let tiles = TileGrid::load(&text);
        self.spawn_entities(&tiles);
        tracing::info!(
            level_id,
            columns = tiles.width(),
            rows = tiles.height(),
            enemies = self.enemies.len(),
            coins = self.coins.len(),
            "level loaded"
        );

        self.tiles = Some(tiles);
        self.level_id = level_id;
        self.used_fallback = fallback;
        self.state = LevelState::Loaded;
        out_events.push(Event::LevelLoaded {
            level: level_id,
            fallback,
        });
    }

    fn clear(&mut self) {
        self.tiles = None;
        self.player = None;
        self.enemies.clear();
        self.coins.clear();
        self.spikes.clear();
        self.power_ups.clear();
        self.finish = None;
    }

    fn spawn_entities(&mut self, tiles: &TileGrid) {
        let tile_size = tiles.tile_size();
        for (column, row, symbol) in tiles.cells() {
            let x = column as f32 * tile_size;
            let y = row as f32 * tile_size;
            match symbol {
                'P' => self.player = Some(Player::new(x, y)),
                'E' => self.enemies.push(Enemy::ground(x, y)),
                'F' => self.enemies.push(Enemy::flying(x, y)),
                'C' => self.coins.push(Coin::new(x, y)),
                '^' => self.spikes.push(Spike::new(x, y)),
                'G' => self.finish = Some(Finish::new(x, y)),
                other => {
                    if let Some(kind) = EffectKind::from_marker(other) {
                        self.power_ups.push(PowerUp::new(x, y, kind));
                    }
                }
            }
        }
    }

    /// Mutable access to the player, if the level spawned one.
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Splits the level into disjoint borrows for one tick.
    ///
    /// Returns `None` until a level with a player spawn is loaded.
    pub fn parts_mut(&mut self) -> Option<LevelPartsMut<'_>> {
        let tiles = self.tiles.as_ref()?;
        let player = self.player.as_mut()?;
        Some(LevelPartsMut {
            tiles,
            player,
            enemies: &mut self.enemies,
            coins: &mut self.coins,
            spikes: &self.spikes,
            power_ups: &mut self.power_ups,
            finish: self.finish.as_ref(),
        })
    }
}

/// Level source backed by a map, used by tests and embedded layouts.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLevels {
    levels: HashMap<u32, String>,
}

impl InMemoryLevels {
    /// Creates a source with no levels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a level, returning the source for chaining.
    #[must_use]
    pub fn with_level(mut self, level_id: u32, text: impl Into<String>) -> Self {
        self.insert(level_id, text);
        self
    }

    /// Adds or replaces a level.
    pub fn insert(&mut self, level_id: u32, text: impl Into<String>) {
        let _ = self.levels.insert(level_id, text.into());
    }
}

impl LevelSource for InMemoryLevels {
    fn level_text(&self, level_id: u32) -> Option<String> {
        self.levels.get(&level_id).cloned()
    }
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use super::{Coin, Enemy, Finish, LevelManager, LevelState, Player, PowerUp, Spike, TileGrid};

    /// Lifecycle state of the manager.
    #[must_use]
    pub fn state(level: &LevelManager) -> LevelState {
        level.state
    }

    /// Identifier of the most recently loaded level.
    #[must_use]
    pub fn level_id(level: &LevelManager) -> u32 {
        level.level_id
    }

    /// Whether the built-in layout replaced missing level text.
    #[must_use]
    pub fn used_fallback(level: &LevelManager) -> bool {
        level.used_fallback
    }

    /// Static terrain of the loaded level.
    #[must_use]
    pub fn tile_grid(level: &LevelManager) -> Option<&TileGrid> {
        level.tiles.as_ref()
    }

    /// The player, if one spawned.
    #[must_use]
    pub fn player(level: &LevelManager) -> Option<&Player> {
        level.player.as_ref()
    }

    /// Live enemies.
    #[must_use]
    pub fn enemies(level: &LevelManager) -> &[Enemy] {
        &level.enemies
    }

    /// Coins still in the level.
    #[must_use]
    pub fn coins(level: &LevelManager) -> &[Coin] {
        &level.coins
    }

    /// Hazards.
    #[must_use]
    pub fn spikes(level: &LevelManager) -> &[Spike] {
        &level.spikes
    }

    /// Power-ups still in the level.
    #[must_use]
    pub fn power_ups(level: &LevelManager) -> &[PowerUp] {
        &level.power_ups
    }

    /// Finish flag, if the level has one.
    #[must_use]
    pub fn finish(level: &LevelManager) -> Option<&Finish> {
        level.finish.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macan_run_core::{Bounded, EnemyKind};

    const SMALL_LEVEL: &str = "\
P..C.S
#F.^HG
######";

    fn loaded(text: &str) -> (LevelManager, Vec<Event>) {
        let mut level = LevelManager::new();
        let mut events = Vec::new();
        let source = InMemoryLevels::new().with_level(1, text);
        level.load_level(1, &source, &mut events);
        (level, events)
    }

    #[test]
    fn new_manager_is_empty() {
        let mut level = LevelManager::new();
        assert_eq!(query::state(&level), LevelState::Empty);
        assert!(query::player(&level).is_none());
        assert!(level.parts_mut().is_none());
    }

    #[test]
    fn markers_spawn_one_entity_each() {
        let (level, events) = loaded(SMALL_LEVEL);

        assert_eq!(query::state(&level), LevelState::Loaded);
        assert_eq!(
            events,
            vec![Event::LevelLoaded {
                level: 1,
                fallback: false
            }]
        );

        let player = query::player(&level).expect("player");
        assert_eq!((player.x, player.y), (0.0, 0.0));
        assert_eq!(query::coins(&level).len(), 1);
        assert_eq!(query::spikes(&level).len(), 1);
        assert_eq!(query::power_ups(&level).len(), 2);
        assert_eq!(query::power_ups(&level)[0].kind(), EffectKind::Speed);
        assert_eq!(query::power_ups(&level)[1].kind(), EffectKind::Health);

        let enemies = query::enemies(&level);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].kind(), EnemyKind::Flying);

        let finish = query::finish(&level).expect("finish");
        assert_eq!(finish.bounds().x, 5.0 * 48.0);
        assert_eq!(finish.bounds().y, 48.0);
    }

    #[test]
    fn last_player_marker_wins() {
        let (level, _) = loaded("P..P\n####");
        let player = query::player(&level).expect("player");
        assert_eq!(player.x, 3.0 * 48.0);
    }

    #[test]
    fn missing_text_loads_the_fallback_layout() {
        let mut level = LevelManager::new();
        let mut events = Vec::new();
        level.load_level(9, &InMemoryLevels::new(), &mut events);

        assert_eq!(
            events,
            vec![Event::LevelLoaded {
                level: 9,
                fallback: true
            }]
        );
        assert!(query::used_fallback(&level));
        assert_eq!(query::level_id(&level), 9);
        assert!(query::player(&level).is_some());
        assert!(query::finish(&level).is_some());
        assert_eq!(query::coins(&level).len(), 7);
        assert_eq!(query::enemies(&level).len(), 1);
        assert_eq!(query::spikes(&level).len(), 1);
    }

    #[test]
    fn reload_rescans_the_original_text() {
        let (mut level, _) = loaded(SMALL_LEVEL);
        {
            let parts = level.parts_mut().expect("parts");
            parts.coins.clear();
            parts.power_ups.clear();
            parts.player.x = 200.0;
        }
        assert!(query::coins(&level).is_empty());

        let source = InMemoryLevels::new().with_level(1, SMALL_LEVEL);
        let mut events = Vec::new();
        level.load_level(1, &source, &mut events);

        assert_eq!(query::coins(&level).len(), 1);
        assert_eq!(query::power_ups(&level).len(), 2);
        assert_eq!(query::player(&level).map(|player| player.x), Some(0.0));
    }

    #[test]
    fn markers_are_not_solid_terrain() {
        let (level, _) = loaded(SMALL_LEVEL);
        let tiles = query::tile_grid(&level).expect("tiles");
        assert!(!tiles.is_solid_at(0, 0));
        assert!(!tiles.is_solid_at(1, 1));
        assert!(tiles.is_solid_at(0, 1));
        assert!(tiles.is_solid_at(3, 2));
    }

    #[test]
    fn level_without_player_has_no_parts() {
        let (mut level, _) = loaded("C..\n###");
        assert_eq!(query::state(&level), LevelState::Loaded);
        assert!(level.player_mut().is_none());
        assert!(level.parts_mut().is_none());
    }
}
