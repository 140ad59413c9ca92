// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::Mode;

/// Command-line arguments for `themewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "themewatch",
    version,
    about = "Development pipeline for storefront themes: entrypoints, asset snippets, watch and sync.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Themewatch.toml` in the current directory if present,
    /// otherwise built-in defaults.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `THEMEWATCH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the bundler in watch mode and sync the theme (default).
    Watch {
        /// Resolve config and entrypoints, print them, run nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Production build followed by snippet rendering.
    Build,

    /// Print the discovered entrypoints.
    Entries {
        /// Print the JSON manifest handed to the bundler.
        #[arg(long)]
        json: bool,
    },

    /// Render the script/style snippets for generated assets.
    Render {
        #[arg(long, value_enum, default_value_t = Mode::Development)]
        mode: Mode,

        /// Print the snippets instead of writing them into the dist dir.
        #[arg(long)]
        stdout: bool,

        /// Generated filenames, in load order. Defaults to the contents of
        /// the dist assets directory.
        files: Vec<String>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Watch { dry_run: false }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
