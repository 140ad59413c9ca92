// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Required source directory is missing: {0:?}")]
    MissingSourceDir(PathBuf),

    #[error("No entrypoint '{key}' for generated file '{filename}'")]
    UnresolvedEntry { filename: String, key: String },

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ThemewatchError>;
