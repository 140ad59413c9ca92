// src/config/validate.rs

use crate::config::model::{Config, RawConfig};
use crate::errors::{Result, ThemewatchError};

/// Upper bound for `[watch].debounce_ms`; longer windows make the dev loop
/// feel stuck.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

impl TryFrom<RawConfig> for Config {
    type Error = ThemewatchError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(Config::new_unchecked(raw))
    }
}

/// Validate a raw config without consuming it.
pub fn validate_config(cfg: &RawConfig) -> Result<()> {
    validate_raw_config(cfg)
}

fn validate_raw_config(cfg: &RawConfig) -> Result<()> {
    validate_paths(cfg)?;
    validate_commands(cfg)?;
    validate_dev_server(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &RawConfig) -> Result<()> {
    let paths = [
        ("source_root", &cfg.paths.source_root),
        ("scripts_dir", &cfg.paths.scripts_dir),
        ("dist_dir", &cfg.paths.dist_dir),
    ];
    for (name, path) in paths {
        if path.as_os_str().is_empty() {
            return Err(ThemewatchError::ConfigError(format!(
                "[paths].{name} must not be empty"
            )));
        }
    }
    Ok(())
}

fn validate_commands(cfg: &RawConfig) -> Result<()> {
    let commands = [
        ("[build].watch_cmd", &cfg.build.watch_cmd),
        ("[build].build_cmd", &cfg.build.build_cmd),
        ("[sync].cmd", &cfg.sync.cmd),
    ];
    for (name, cmd) in commands {
        if cmd.trim().is_empty() {
            return Err(ThemewatchError::ConfigError(format!(
                "{name} must not be empty"
            )));
        }
    }
    Ok(())
}

fn validate_dev_server(cfg: &RawConfig) -> Result<()> {
    if !cfg.dev_server.asset_url.ends_with('/') {
        return Err(ThemewatchError::ConfigError(format!(
            "[dev_server].asset_url must end with '/' (got {:?})",
            cfg.dev_server.asset_url
        )));
    }
    Ok(())
}

fn validate_watch(cfg: &RawConfig) -> Result<()> {
    if cfg.watch.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(ThemewatchError::ConfigError(format!(
            "[watch].debounce_ms must be <= {MAX_DEBOUNCE_MS} (got {})",
            cfg.watch.debounce_ms
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::try_from(RawConfig::default()).is_ok());
    }

    #[test]
    fn asset_url_without_trailing_slash_is_rejected() {
        let mut raw = RawConfig::default();
        raw.dev_server.asset_url = "https://localhost:3000/assets".to_string();

        match Config::try_from(raw) {
            Err(ThemewatchError::ConfigError(msg)) => assert!(msg.contains("asset_url")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn blank_command_is_rejected() {
        let mut raw = RawConfig::default();
        raw.build.watch_cmd = "   ".to_string();

        assert!(matches!(
            Config::try_from(raw),
            Err(ThemewatchError::ConfigError(msg)) if msg.contains("watch_cmd")
        ));
    }

    #[test]
    fn oversized_debounce_is_rejected() {
        let mut raw = RawConfig::default();
        raw.watch.debounce_ms = MAX_DEBOUNCE_MS + 1;

        assert!(validate_config(&raw).is_err());
    }
}
