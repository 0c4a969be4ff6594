use std::{
    fs, io,
    path::{Path, PathBuf},
};

use macan_run_core::{level_name, LevelSource};

/// Level source reading `level<N>.txt` files from a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DirectoryLevels {
    root: PathBuf,
}

impl DirectoryLevels {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, level_id: u32) -> PathBuf {
        self.root.join(format!("{}.txt", level_name(level_id)))
    }
}

impl LevelSource for DirectoryLevels {
    fn level_text(&self, level_id: u32) -> Option<String> {
        let path = self.path_of(level_id);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "level file not found");
                None
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "level file unreadable");
                None
            }
        }
    }
}
