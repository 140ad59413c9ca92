// src/watch/event.rs

//! Filesystem events in the add/change/unlink vocabulary.
//!
//! notify reports platform-flavoured event kinds; the orchestrator only cares
//! whether a file appeared, disappeared or changed, so events are folded into
//! [`FsEventKind`] here.

use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    Add,
    AddDir,
    Change,
    Unlink,
    UnlinkDir,
}

impl FsEventKind {
    /// File added or removed; directory events and edits don't count.
    pub fn changes_file_set(self) -> bool {
        matches!(self, FsEventKind::Add | FsEventKind::Unlink)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: FsEventKind,
    pub path: PathBuf,
}

impl FsEvent {
    pub fn new(kind: FsEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Translate one notify event into zero or more [`FsEvent`]s.
///
/// Renames become an unlink of the old path plus an add of the new one.
/// Access events are dropped.
pub fn from_notify(event: &Event) -> Vec<FsEvent> {
    let each = |kind: FsEventKind| -> Vec<FsEvent> {
        event
            .paths
            .iter()
            .map(|p| FsEvent::new(kind, p.clone()))
            .collect()
    };

    match event.kind {
        EventKind::Access(_) => Vec::new(),
        EventKind::Create(CreateKind::File) => each(FsEventKind::Add),
        EventKind::Create(CreateKind::Folder) => each(FsEventKind::AddDir),
        EventKind::Create(_) => event.paths.iter().map(|p| appeared(p)).collect(),
        EventKind::Remove(RemoveKind::Folder) => each(FsEventKind::UnlinkDir),
        EventKind::Remove(_) => each(FsEventKind::Unlink),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => each(FsEventKind::Unlink),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().map(|p| appeared(p)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => vec![
            FsEvent::new(FsEventKind::Unlink, event.paths[0].clone()),
            appeared(&event.paths[1]),
        ],
        EventKind::Modify(ModifyKind::Name(_)) => event
            .paths
            .iter()
            .map(|p| {
                if p.exists() {
                    appeared(p)
                } else {
                    FsEvent::new(FsEventKind::Unlink, p.clone())
                }
            })
            .collect(),
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => each(FsEventKind::Change),
    }
}

fn appeared(path: &Path) -> FsEvent {
    let kind = if path.is_dir() {
        FsEventKind::AddDir
    } else {
        FsEventKind::Add
    };
    FsEvent::new(kind, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::DataChange;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut ev = Event::new(kind);
        for p in paths {
            ev = ev.add_path(PathBuf::from(p));
        }
        ev
    }

    #[test]
    fn created_file_is_add() {
        let out = from_notify(&event(EventKind::Create(CreateKind::File), &["/p/a.js"]));
        assert_eq!(out, vec![FsEvent::new(FsEventKind::Add, "/p/a.js")]);
    }

    #[test]
    fn content_write_is_change() {
        let out = from_notify(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/p/a.js"],
        ));
        assert_eq!(out[0].kind, FsEventKind::Change);
    }

    #[test]
    fn rename_pair_is_unlink_then_add() {
        let out = from_notify(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/nonexistent/old.js", "/nonexistent/new.js"],
        ));
        assert_eq!(
            out,
            vec![
                FsEvent::new(FsEventKind::Unlink, "/nonexistent/old.js"),
                FsEvent::new(FsEventKind::Add, "/nonexistent/new.js"),
            ]
        );
    }

    #[test]
    fn removed_folder_is_unlink_dir() {
        let out = from_notify(&event(EventKind::Remove(RemoveKind::Folder), &["/p/dir"]));
        assert_eq!(out[0].kind, FsEventKind::UnlinkDir);
        assert!(!out[0].kind.changes_file_set());
    }

    #[test]
    fn access_is_dropped() {
        let out = from_notify(&event(
            EventKind::Access(notify::event::AccessKind::Any),
            &["/p/a.js"],
        ));
        assert!(out.is_empty());
    }
}
