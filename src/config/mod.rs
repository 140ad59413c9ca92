// src/config/mod.rs

//! Configuration loading and validation for themewatch.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a config file (or falling back to defaults).
//! - `validate.rs`: invariants enforced when turning `RawConfig` into `Config`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    BuildSection, Config, DevServerSection, PathsSection, RawConfig, RenderSection, SyncSection,
    WatchSection,
};
pub use validate::validate_config;
