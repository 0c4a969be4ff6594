use macan_run_core::{AudioSink, SaveRecord, SaveStore};

/// Audio sink that drops every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_effect(&mut self, _name: &str) {}

    fn play_music(&mut self, _track: &str) {}

    fn stop_music(&mut self) {}

    fn pause_music(&mut self) {}

    fn resume_music(&mut self) {}
}

/// Save store that keeps the latest record in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySaveStore {
    record: Option<SaveRecord>,
}

impl MemorySaveStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a record.
    #[must_use]
    pub fn with_record(record: SaveRecord) -> Self {
        Self {
            record: Some(record),
        }
    }

    /// Most recently stored record.
    #[must_use]
    pub fn record(&self) -> Option<&SaveRecord> {
        self.record.as_ref()
    }
}

impl SaveStore for MemorySaveStore {
    fn save(&mut self, record: &SaveRecord) -> bool {
        if record.validate().is_err() {
            return false;
        }
        self.record = Some(record.clone());
        true
    }

    fn load(&mut self) -> Option<SaveRecord> {
        self.record
            .as_ref()
            .filter(|record| record.validate().is_ok())
            .cloned()
    }
}
