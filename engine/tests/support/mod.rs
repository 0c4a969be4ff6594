#![allow(dead_code)]

use std::time::Duration;

use macan_run_core::{Action, AudioSink, Event, InputState};
use macan_run_engine::{EngineConfig, GameEngine, MemorySaveStore};
use macan_run_world::InMemoryLevels;

pub const STEP: Duration = Duration::from_micros(16_667);

pub type TestEngine = GameEngine<InMemoryLevels, RecordingAudio, MemorySaveStore>;

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub effects: Vec<String>,
    pub music: Vec<String>,
}

impl AudioSink for RecordingAudio {
    fn play_effect(&mut self, name: &str) {
        self.effects.push(name.to_owned());
    }

    fn play_music(&mut self, track: &str) {
        self.music.push(format!("play:{track}"));
    }

    fn stop_music(&mut self) {
        self.music.push("stop".to_owned());
    }

    fn pause_music(&mut self) {
        self.music.push("pause".to_owned());
    }

    fn resume_music(&mut self) {
        self.music.push("resume".to_owned());
    }
}

pub fn engine_with(levels: InMemoryLevels, saves: MemorySaveStore) -> TestEngine {
    GameEngine::new(
        EngineConfig::default(),
        levels,
        RecordingAudio::default(),
        saves,
    )
}

pub fn single_level(text: &str) -> TestEngine {
    engine_with(
        InMemoryLevels::new().with_level(1, text),
        MemorySaveStore::new(),
    )
}

pub fn tap(input: &mut InputState, action: Action) {
    input.release(action);
    input.press(action);
}

pub fn start(engine: &mut TestEngine, input: &mut InputState) -> Vec<Event> {
    let mut events = Vec::new();
    tap(input, Action::Confirm);
    engine.tick(STEP, input, &mut events);
    events
}

/// Ticks until the predicate holds, returning whether it did within `limit`.
pub fn tick_until<F>(
    engine: &mut TestEngine,
    input: &mut InputState,
    events: &mut Vec<Event>,
    limit: usize,
    mut done: F,
) -> bool
where
    F: FnMut(&TestEngine) -> bool,
{
    for _ in 0..limit {
        engine.tick(STEP, input, events);
        if done(engine) {
            return true;
        }
    }
    false
}
