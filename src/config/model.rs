// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::MissingEntryPolicy;

/// Top-level configuration as read from `Themewatch.toml`.
///
/// ```toml
/// [paths]
/// scripts_dir = "src/scripts"
/// dist_dir = "dist"
///
/// [build]
/// watch_cmd = "npx webpack --watch --mode development"
///
/// [render]
/// on_missing_entry = "skip"
/// ```
///
/// All sections are optional; the defaults describe the standard theme
/// layout, so a project following it needs no config file at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub dev_server: DevServerSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub render: RenderSection,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfig>` (see `validate.rs`), so
/// holders of a `Config` can rely on its invariants.
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: PathsSection,
    pub dev_server: DevServerSection,
    pub build: BuildSection,
    pub sync: SyncSection,
    pub watch: WatchSection,
    pub render: RenderSection,
}

impl Config {
    pub(crate) fn new_unchecked(raw: RawConfig) -> Self {
        Self {
            paths: raw.paths,
            dev_server: raw.dev_server,
            build: raw.build,
            sync: raw.sync,
            watch: raw.watch,
            render: raw.render,
        }
    }

    /// Directory holding the bundler output that gets synced to the store.
    pub fn assets_dir(&self) -> PathBuf {
        self.paths.dist_dir.join("assets")
    }

    pub fn snippets_dir(&self) -> PathBuf {
        self.paths.dist_dir.join("snippets")
    }

    /// Where the entrypoint manifest for the bundler is written.
    pub fn manifest_path(&self) -> PathBuf {
        self.paths.dist_dir.join("entrypoints.json")
    }
}

/// `[paths]` section. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Root of the recursive file watch.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Parent of the `layout/`, `templates/` and `templates/customers/`
    /// entrypoint directories.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Theme output directory; also the directory the sync tool uploads.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

fn default_source_root() -> PathBuf {
    PathBuf::from("src")
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("src/scripts")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            scripts_dir: default_scripts_dir(),
            dist_dir: default_dist_dir(),
        }
    }
}

/// `[dev_server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevServerSection {
    /// Prefix for asset URLs in development mode. Must end with `/`.
    #[serde(default = "default_asset_url")]
    pub asset_url: String,
}

fn default_asset_url() -> String {
    "https://localhost:3000/assets/".to_string()
}

impl Default for DevServerSection {
    fn default() -> Self {
        Self {
            asset_url: default_asset_url(),
        }
    }
}

/// `[build]` section: bundler commands, run through the platform shell.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default = "default_watch_cmd")]
    pub watch_cmd: String,

    #[serde(default = "default_build_cmd")]
    pub build_cmd: String,
}

fn default_watch_cmd() -> String {
    "npx webpack --watch --mode development".to_string()
}

fn default_build_cmd() -> String {
    "npx webpack --mode production".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            watch_cmd: default_watch_cmd(),
            build_cmd: default_build_cmd(),
        }
    }
}

/// `[sync]` section: the theme sync tool and where its credentials come from.
///
/// Credentials are never stored in the config file itself, only the names of
/// the environment variables holding them.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    #[serde(default = "default_sync_cmd")]
    pub cmd: String,

    #[serde(default = "default_password_env")]
    pub password_env: String,

    #[serde(default = "default_store_env")]
    pub store_env: String,

    #[serde(default = "default_theme_id_env")]
    pub theme_id_env: String,
}

fn default_sync_cmd() -> String {
    "theme".to_string()
}

fn default_password_env() -> String {
    "SHOPIFY_PASSWORD".to_string()
}

fn default_store_env() -> String {
    "SHOPIFY_STORE".to_string()
}

fn default_theme_id_env() -> String {
    "SHOPIFY_THEME_ID".to_string()
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            cmd: default_sync_cmd(),
            password_env: default_password_env(),
            store_env: default_store_env(),
            theme_id_env: default_theme_id_env(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Window in which add/remove events are coalesced into one restart.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSection {
    #[serde(default)]
    pub on_missing_entry: MissingEntryPolicy,
}
