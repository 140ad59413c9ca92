// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`process`] spawns children with their output routed into `tracing`, and
//!   supervises long-lived ones.
//! - [`build`] provides the [`BuildController`] trait and the shell-backed
//!   bundler controller used in production.
//! - [`sync`] starts the theme sync tool with credentials from the
//!   environment.

pub mod build;
pub mod process;
pub mod sync;

pub use build::{BuildController, ShellBuildController, ENTRYPOINTS_ENV};
pub use process::{ProcessHandle, run_to_completion, shell_command, supervise};
pub use sync::{spawn_theme_sync, theme_sync_args, SyncCredentials};
