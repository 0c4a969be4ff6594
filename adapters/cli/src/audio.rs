use macan_run_core::AudioSink;

/// Audio sink for headless runs: every cue becomes a trace line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LogAudio {
    effects_played: u64,
    track: Option<String>,
}

impl LogAudio {
    pub(crate) fn effects_played(&self) -> u64 {
        self.effects_played
    }
}

impl AudioSink for LogAudio {
    fn play_effect(&mut self, name: &str) {
        self.effects_played += 1;
        tracing::trace!(effect = name, "sound effect");
    }

    fn play_music(&mut self, track: &str) {
        tracing::debug!(track, "music started");
        self.track = Some(track.to_owned());
    }

    fn stop_music(&mut self) {
        if let Some(track) = self.track.take() {
            tracing::debug!(track = %track, "music stopped");
        }
    }

    fn pause_music(&mut self) {
        tracing::debug!(track = ?self.track, "music paused");
    }

    fn resume_music(&mut self) {
        tracing::debug!(track = ?self.track, "music resumed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_effects_and_tracks_the_current_song() {
        let mut audio = LogAudio::default();
        audio.play_music("run_bgm");
        audio.play_effect("coin");
        audio.play_effect("jump");
        assert_eq!(audio.effects_played(), 2);
        assert_eq!(audio.track.as_deref(), Some("run_bgm"));

        audio.stop_music();
        assert!(audio.track.is_none());
    }
}
