#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step game engine for Macan Run.
//!
//! [`GameEngine`] exclusively owns the level, every system and the run
//! totals. Each call to [`GameEngine::tick`] samples input, advances the
//! simulation by at most [`MAX_TICK_DELTA`] and reports what happened as
//! [`Event`] values. Presentation reads [`FrameSnapshot`] and the read-only
//! accessors; nothing outside the engine receives a mutable handle.

mod camera;
mod collaborators;
pub mod collisions;

use std::{
    collections::BTreeMap,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use glam::Vec2;
use macan_run_core::{
    sounds, Action, AudioSink, Bounded, Event, GameState, InputSource, LevelSource, PlayerSnapshot,
    SaveRecord, SaveStore, FALL_OUT_Y, MAX_TICK_DELTA,
};
use macan_run_system_particles::{Particle, ParticleSystem, BURST_COLOR};
use macan_run_system_physics::{apply_jump, Physics, PhysicsConfig};
use macan_run_system_power_ups::PowerUpManager;
use macan_run_world::{query, LevelManager, LevelPartsMut, PLAYER_JUMP_FORCE};
use serde::{Deserialize, Serialize};

pub use camera::Camera;
pub use collaborators::{MemorySaveStore, NullAudio};
use collisions::{center_of, Feedback, Scoreboard};

/// Engine settings that adapters may load from a file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewport width used by camera follow.
    pub viewport_width: f32,
    /// Viewport height used by camera follow.
    pub viewport_height: f32,
    /// Level loaded by a fresh start.
    pub first_level: u32,
    /// Background track started whenever play begins.
    pub music_track: String,
    /// Seed of the cosmetic particle stream.
    pub particle_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1024.0,
            viewport_height: 768.0,
            first_level: 1,
            music_track: "run_bgm".to_owned(),
            particle_seed: 0x6d61_6361_6e72_756e,
        }
    }
}

/// Read-only state handed to presentation after each tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Current game state.
    pub state: GameState,
    /// Accumulated score.
    pub score: u64,
    /// Coins collected.
    pub coins: u32,
    /// Identifier of the current level.
    pub level: u32,
    /// Whether a valid save was found or written.
    pub has_save: bool,
    /// Player state, once a level with a player is loaded.
    pub player: Option<PlayerSnapshot>,
    /// Remaining seconds of every active effect, keyed by effect name.
    pub active_effects: BTreeMap<&'static str, f32>,
    /// Camera origin in world units.
    pub camera: Vec2,
    /// Number of live particles.
    pub particle_count: usize,
}

/// Converts elapsed wall time into simulated seconds, never more than
/// [`MAX_TICK_DELTA`].
#[must_use]
pub fn clamp_delta(elapsed: Duration) -> f32 {
    elapsed.min(MAX_TICK_DELTA).as_secs_f32()
}

/// Root simulation object owning the level, systems and collaborators.
#[derive(Debug)]
pub struct GameEngine<L, A, S> {
    config: EngineConfig,
    state: GameState,
    level: LevelManager,
    physics: Physics,
    power_ups: PowerUpManager,
    particles: ParticleSystem,
    camera: Camera,
    scoreboard: Scoreboard,
    current_level: u32,
    has_save: bool,
    levels: L,
    audio: A,
    saves: S,
}

impl<L, A, S> GameEngine<L, A, S>
where
    L: LevelSource,
    A: AudioSink,
    S: SaveStore,
{
    /// Creates an engine in the menu and probes the store for a save.
    pub fn new(config: EngineConfig, levels: L, audio: A, saves: S) -> Self {
        Self::with_physics(config, PhysicsConfig::default(), levels, audio, saves)
    }

    /// Creates an engine with explicit physics constants.
    pub fn with_physics(
        config: EngineConfig,
        physics: PhysicsConfig,
        levels: L,
        audio: A,
        mut saves: S,
    ) -> Self {
        let has_save = saves.load().is_some();
        Self {
            camera: Camera::new(config.viewport_width, config.viewport_height),
            particles: ParticleSystem::new(config.particle_seed),
            current_level: config.first_level,
            config,
            state: GameState::Menu,
            level: LevelManager::new(),
            physics: Physics::new(physics),
            power_ups: PowerUpManager::new(),
            scoreboard: Scoreboard::default(),
            has_save,
            levels,
            audio,
            saves,
        }
    }

    /// Runs one fixed step: input, then simulation while running.
    pub fn tick<I>(&mut self, elapsed: Duration, input: &mut I, out_events: &mut Vec<Event>)
    where
        I: InputSource + ?Sized,
    {
        let dt = clamp_delta(elapsed);
        self.handle_input(input, out_events);
        if self.state == GameState::Running {
            self.update(dt, input, out_events);
        }
    }

    fn handle_input<I>(&mut self, input: &mut I, out_events: &mut Vec<Event>)
    where
        I: InputSource + ?Sized,
    {
        if input.take_just_pressed(Action::Pause) {
            self.toggle_pause(out_events);
        }
        if input.take_just_pressed(Action::Back) {
            self.return_to_menu(out_events);
        }

        match self.state {
            GameState::Menu => {
                if input.take_just_pressed(Action::Confirm) {
                    self.start_game(out_events);
                } else if self.has_save && input.take_just_pressed(Action::LoadSave) {
                    self.load_game(out_events);
                }
            }
            GameState::GameOver => {
                if input.take_just_pressed(Action::Confirm) {
                    self.continue_game(out_events);
                } else if input.take_just_pressed(Action::Restart) {
                    self.start_game(out_events);
                }
            }
            GameState::LevelComplete => {
                if input.take_just_pressed(Action::Confirm) {
                    self.next_level(out_events);
                }
            }
            GameState::Running | GameState::Paused => {}
        }
    }

    fn update<I>(&mut self, dt: f32, input: &mut I, out_events: &mut Vec<Event>)
    where
        I: InputSource + ?Sized,
    {
        let Some(mut parts) = self.level.parts_mut() else {
            return;
        };

        if parts.player.update(dt, input) && apply_jump(parts.player, PLAYER_JUMP_FORCE) {
            self.audio.play_effect(sounds::JUMP);
            let body = parts.player.bounds();
            let feet = Vec2::new(body.x + body.width * 0.5, body.bottom());
            self.particles.emit_jump_dust(feet, None);
            out_events.push(Event::PlayerJumped {
                jumps_remaining: parts.player.jumps_remaining,
            });
        }

        self.physics.integrate(dt, parts.player, Some(parts.tiles));
        self.power_ups.update(dt, parts.player, out_events);
        self.particles.update(dt);
        for enemy in parts.enemies.iter_mut() {
            enemy.advance(dt);
        }

        let reached_finish = collisions::resolve(
            &mut parts,
            &mut self.scoreboard,
            &mut Feedback {
                audio: &mut self.audio,
                particles: &mut self.particles,
                out_events: &mut *out_events,
            },
        );

        let LevelPartsMut { player, .. } = parts;
        self.camera.follow(&player.bounds());

        if reached_finish {
            let origin = center_of(&*player);
            self.complete_level(origin, out_events);
            return;
        }

        if player.y > FALL_OUT_Y {
            player.health = 0;
        }
        if player.is_dead() {
            self.audio.play_effect(sounds::DEATH);
            self.audio.stop_music();
            self.transition(GameState::GameOver, out_events);
        }
    }

    fn complete_level(&mut self, origin: Vec2, out_events: &mut Vec<Event>) {
        self.transition(GameState::LevelComplete, out_events);
        self.audio.play_effect(sounds::COIN);
        self.audio.stop_music();
        let _ = self.save_game(out_events);
        self.particles.emit_burst(origin, 30, BURST_COLOR);
    }

    /// Starts a fresh run from the first level with zeroed totals.
    pub fn start_game(&mut self, out_events: &mut Vec<Event>) {
        self.scoreboard = Scoreboard::default();
        self.current_level = self.config.first_level;
        self.begin_level(out_events);
    }

    /// Reloads the current level after a game over, keeping the totals.
    pub fn continue_game(&mut self, out_events: &mut Vec<Event>) {
        self.begin_level(out_events);
    }

    /// Advances to the next level and saves the progress.
    pub fn next_level(&mut self, out_events: &mut Vec<Event>) {
        self.current_level = self.current_level.saturating_add(1);
        self.begin_level(out_events);
        let _ = self.save_game(out_events);
    }

    fn begin_level(&mut self, out_events: &mut Vec<Event>) {
        self.particles.clear();
        self.camera.reset();
        self.level
            .load_level(self.current_level, &self.levels, out_events);
        self.transition(GameState::Running, out_events);
        self.audio.play_music(&self.config.music_track);
    }

    /// Resumes from the save store; a missing or corrupt save starts fresh.
    pub fn load_game(&mut self, out_events: &mut Vec<Event>) {
        let Some(record) = self.saves.load() else {
            tracing::info!("no usable save, starting a new game");
            self.start_game(out_events);
            return;
        };

        self.scoreboard = Scoreboard {
            score: record.score,
            coins: record.coins,
        };
        self.current_level = record.level_id();
        self.begin_level(out_events);
        if let Some(player) = self.level.player_mut() {
            player.restore(&record.player);
        }
        tracing::info!(level = %record.level, score = record.score, "save restored");
    }

    /// Hands the current progress to the save store.
    ///
    /// Returns `false` without side effects when no player is loaded.
    pub fn save_game(&mut self, out_events: &mut Vec<Event>) -> bool {
        let Some(player) = query::player(&self.level) else {
            return false;
        };

        let record = SaveRecord::new(
            self.current_level,
            self.scoreboard.score,
            self.scoreboard.coins,
            player.record(),
        )
        .stamped(unix_timestamp());
        let success = self.saves.save(&record);
        if success {
            self.has_save = true;
            tracing::info!(level = %record.level, score = record.score, "game saved");
        } else {
            tracing::warn!(level = %record.level, "save store rejected the record");
        }
        out_events.push(Event::GameSaved {
            level: record.level,
            success,
        });
        success
    }

    /// Flips between running and paused; other states are unaffected.
    pub fn toggle_pause(&mut self, out_events: &mut Vec<Event>) {
        match self.state {
            GameState::Running => {
                self.audio.pause_music();
                self.transition(GameState::Paused, out_events);
            }
            GameState::Paused => {
                self.audio.resume_music();
                self.transition(GameState::Running, out_events);
            }
            _ => {}
        }
    }

    /// Leaves any gameplay state for the menu, saving if play was live.
    pub fn return_to_menu(&mut self, out_events: &mut Vec<Event>) {
        if !self.state.is_gameplay() {
            return;
        }
        if self.state == GameState::Running {
            let _ = self.save_game(out_events);
        }
        self.audio.stop_music();
        self.transition(GameState::Menu, out_events);
    }

    /// Final teardown: one best-effort save if play was live.
    pub fn shutdown(&mut self, out_events: &mut Vec<Event>) {
        if self.state == GameState::Running {
            let _ = self.save_game(out_events);
        }
        self.particles.clear();
        self.audio.stop_music();
        tracing::info!(score = self.scoreboard.score, "engine shut down");
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        tracing::info!(?from, ?to, level = self.current_level, "state changed");
        out_events.push(Event::StateChanged { from, to });
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.scoreboard.score
    }

    /// Coins collected.
    #[must_use]
    pub fn coins(&self) -> u32 {
        self.scoreboard.coins
    }

    /// Identifier of the current level.
    #[must_use]
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Whether a valid save is known to exist.
    #[must_use]
    pub fn has_save(&self) -> bool {
        self.has_save
    }

    /// Read-only level state for drawing and inspection.
    #[must_use]
    pub fn level(&self) -> &LevelManager {
        &self.level
    }

    /// Live particles for drawing.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// Camera state.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Audio collaborator.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Save collaborator.
    #[must_use]
    pub fn save_store(&self) -> &S {
        &self.saves
    }

    /// Consistent copy of everything the HUD needs.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let player = query::player(&self.level);
        FrameSnapshot {
            state: self.state,
            score: self.scoreboard.score,
            coins: self.scoreboard.coins,
            level: self.current_level,
            has_save: self.has_save,
            player: player.map(|player| player.snapshot()),
            active_effects: player
                .map(|player| {
                    player
                        .active_effects
                        .iter()
                        .map(|(kind, remaining)| (kind.name(), *remaining))
                        .collect()
                })
                .unwrap_or_default(),
            camera: self.camera.position(),
            particle_count: self.particles.len(),
        }
    }
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped_to_a_tenth_of_a_second() {
        assert_eq!(clamp_delta(Duration::from_secs(5)), 0.1);
        assert!((clamp_delta(Duration::from_millis(16)) - 0.016).abs() < 1e-6);
        assert_eq!(clamp_delta(Duration::ZERO), 0.0);
    }

    #[test]
    fn default_config_uses_the_standard_viewport() {
        let config = EngineConfig::default();
        assert_eq!((config.viewport_width, config.viewport_height), (1024.0, 768.0));
        assert_eq!(config.first_level, 1);
        assert_eq!(config.music_track, "run_bgm");
    }
}
