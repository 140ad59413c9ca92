// src/watch/filter.rs

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::event::FsEvent;

/// Swap, backup and temp files editors drop next to the file being edited.
static EDITOR_TEMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\..*\.sw[px]$|~$|\.subl.*\.tmp$").expect("editor temp pattern is valid")
});

/// True for vim swap files, `~` backups and Sublime Text save temps.
pub fn is_editor_temp(path: &Path) -> bool {
    path.file_name()
        .map(|name| EDITOR_TEMP.is_match(&name.to_string_lossy()))
        .unwrap_or(false)
}

/// Decides which filesystem events may require a bundler restart.
///
/// Only adds and removals of files strictly inside one of the entry
/// directories change the set of entrypoints; edits are picked up by the
/// bundler's own watch mode. Editor temp files never count.
#[derive(Debug, Clone)]
pub struct RestartFilter {
    dirs: Vec<PathBuf>,
}

impl RestartFilter {
    /// `dirs` may be relative; they are resolved against `root`.
    pub fn new(root: &Path, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().map(|d| root.join(d)).collect(),
        }
    }

    /// The layout and templates directories under `scripts_dir`.
    pub fn for_entry_dirs(root: &Path, scripts_dir: &Path) -> Self {
        Self::new(
            root,
            [scripts_dir.join("layout"), scripts_dir.join("templates")],
        )
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn should_restart(&self, event: &FsEvent) -> bool {
        self.watched_path(event).is_some()
    }

    /// The event's path, spelled with the same prefix as the entry
    /// directories, when the event adds or removes a watched file.
    pub fn watched_path(&self, event: &FsEvent) -> Option<PathBuf> {
        if !event.kind.changes_file_set() || is_editor_temp(&event.path) {
            return None;
        }
        self.resolve(&event.path)
    }

    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        if self.contains(path) {
            return Some(path.to_path_buf());
        }
        // Event paths may use a different absolute prefix for the same
        // directory (symlinks, /private/var on macOS). The file itself may be
        // gone already, so resolve its parent instead.
        let (parent, name) = (path.parent()?, path.file_name()?);
        let resolved = parent.canonicalize().ok()?.join(name);
        self.contains(&resolved).then_some(resolved)
    }

    /// Every file currently under the entry directories.
    ///
    /// Missing directories are skipped; discovery reports those.
    pub fn existing_files(&self, fs: &dyn FileSystem) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending: Vec<PathBuf> = self.dirs.iter().filter(|d| fs.is_dir(d)).cloned().collect();

        while let Some(dir) = pending.pop() {
            for path in fs.read_dir(&dir)? {
                if fs.is_dir(&path) {
                    pending.push(path);
                } else if fs.is_file(&path) && !is_editor_temp(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn contains(&self, path: &Path) -> bool {
        self.dirs
            .iter()
            .any(|dir| path != dir && path.starts_with(dir))
    }
}
