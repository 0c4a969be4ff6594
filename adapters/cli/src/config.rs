use std::{fs, path::Path, path::PathBuf};

use anyhow::{ensure, Context, Result};
use macan_run_engine::EngineConfig;
use serde::Deserialize;

/// Settings file layout: an `[engine]` table and a `[run]` table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub(crate) engine: EngineConfig,
    pub(crate) run: RunConfig,
}

/// Headless run settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RunConfig {
    /// Directory holding `level<N>.txt` files.
    pub(crate) levels_dir: PathBuf,
    /// Save file override; the platform data directory is used otherwise.
    pub(crate) save_path: Option<PathBuf>,
    /// Number of fixed steps to simulate.
    pub(crate) ticks: u64,
    /// Seed of the autopilot's jump decisions.
    pub(crate) seed: u64,
    /// Chance per tick that the autopilot taps jump.
    pub(crate) jump_chance: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("levels"),
            save_path: None,
            ticks: 3_600,
            seed: 1,
            jump_chance: 0.02,
        }
    }
}

impl CliConfig {
    /// Reads the file when one is given, falling back to defaults otherwise.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("invalid config toml")?;
        ensure!(
            (0.0..=1.0).contains(&config.run.jump_chance),
            "run.jump_chance must lie in 0..=1, got {}",
            config.run.jump_chance
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_argument_yields_defaults() {
        let config = CliConfig::load(None).expect("defaults");
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.run.levels_dir, PathBuf::from("levels"));
    }

    #[test]
    fn tables_override_individual_fields() {
        let config = CliConfig::parse(
            r#"
            [engine]
            first_level = 2
            music_track = "night_bgm"

            [run]
            ticks = 120
            save_path = "/tmp/macan/save.json"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.engine.first_level, 2);
        assert_eq!(config.engine.music_track, "night_bgm");
        assert_eq!(config.engine.viewport_width, 1024.0);
        assert_eq!(config.run.ticks, 120);
        assert_eq!(
            config.run.save_path,
            Some(PathBuf::from("/tmp/macan/save.json"))
        );
        assert_eq!(config.run.seed, 1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CliConfig::parse("[run]\nspeed = 3\n").is_err());
    }

    #[test]
    fn jump_chance_must_be_a_probability() {
        let error = CliConfig::parse("[run]\njump_chance = 1.5\n").expect_err("out of range");
        assert!(error.to_string().contains("jump_chance"));
    }

    #[test]
    fn unreadable_files_name_the_path() {
        let error = CliConfig::load(Some(Path::new("/nonexistent/macan.toml")))
            .expect_err("missing file");
        assert!(error.to_string().contains("/nonexistent/macan.toml"));
    }
}
