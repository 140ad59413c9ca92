use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Runtime build mode.
///
/// Controls where rendered asset references point: the theme CDN via the
/// `asset_url` filter in production, or the local dev server otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            other => Err(format!(
                "invalid mode: {other} (expected \"development\" or \"production\")"
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}

/// How the bundler process is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Long-lived incremental rebuilds.
    Watch,
    /// One-off production build that exits when done.
    Build,
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Watch => f.write_str("watch"),
            BuildMode::Build => f.write_str("build"),
        }
    }
}

/// Kind of generated asset a snippet is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Script,
    Style,
}

impl AssetKind {
    /// Value of the `as` attribute on prefetch hints.
    pub fn prefetch_as(self) -> &'static str {
        match self {
            AssetKind::Script => "script",
            AssetKind::Style => "style",
        }
    }

    /// Classify a generated filename by extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext.to_lowercase().as_str() {
            "js" => Some(AssetKind::Script),
            "css" => Some(AssetKind::Style),
            _ => None,
        }
    }
}

/// What the renderer does when a generated filename names an entrypoint that
/// discovery did not produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingEntryPolicy {
    /// Abort rendering with `ThemewatchError::UnresolvedEntry`.
    #[default]
    Fail,
    /// Log a warning and leave the partial out of the condition.
    Skip,
}

impl FromStr for MissingEntryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(MissingEntryPolicy::Fail),
            "skip" => Ok(MissingEntryPolicy::Skip),
            other => Err(format!(
                "invalid on_missing_entry: {other} (expected \"fail\" or \"skip\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_short_and_long_names() {
        assert_eq!("prod".parse::<Mode>(), Ok(Mode::Production));
        assert_eq!(" Development ".parse::<Mode>(), Ok(Mode::Development));
        assert!("staging".parse::<Mode>().is_err());
    }

    #[test]
    fn asset_kind_follows_extension() {
        assert_eq!(AssetKind::from_filename("theme.abc.js"), Some(AssetKind::Script));
        assert_eq!(AssetKind::from_filename("theme.abc.CSS"), Some(AssetKind::Style));
        assert_eq!(AssetKind::from_filename("theme.js.map"), None);
        assert_eq!(AssetKind::from_filename("README"), None);
    }
}
