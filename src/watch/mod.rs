// src/watch/mod.rs

//! File watching.
//!
//! Turns `notify` events into add/change/unlink events and decides which of
//! them require the bundler to be restarted. It knows nothing about the
//! processes themselves.

pub mod event;
pub mod filter;
pub mod watcher;

pub use event::{from_notify, FsEvent, FsEventKind};
pub use filter::RestartFilter;
pub use watcher::{spawn_watcher, WatcherHandle};
