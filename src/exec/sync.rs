// src/exec/sync.rs

//! Theme sync tool (Theme Kit `theme watch`).

use std::fmt;
use std::path::Path;

use tokio::process::Command;
use tokio::sync::mpsc;

use crate::config::SyncSection;
use crate::engine::OrchestratorEvent;
use crate::errors::{Result, ThemewatchError};
use crate::exec::process::{supervise, ProcessHandle};

/// Store credentials for the sync tool.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncCredentials {
    pub password: String,
    pub store: String,
    pub theme_id: String,
}

impl fmt::Debug for SyncCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCredentials")
            .field("password", &"<redacted>")
            .field("store", &self.store)
            .field("theme_id", &self.theme_id)
            .finish()
    }
}

impl SyncCredentials {
    /// Read credentials from the environment variables named in `[sync]`.
    pub fn from_env(section: &SyncSection) -> Result<Self> {
        Self::from_lookup(section, |name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(section: &SyncSection, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ThemewatchError::MissingCredential(name.to_string()))
        };

        Ok(Self {
            password: get(&section.password_env)?,
            store: get(&section.store_env)?,
            theme_id: get(&section.theme_id_env)?,
        })
    }
}

/// Arguments for `<sync cmd> watch`, uploading `dist_dir`.
pub fn theme_sync_args(dist_dir: &Path, creds: &SyncCredentials) -> Vec<String> {
    vec![
        "watch".to_string(),
        "--dir".to_string(),
        dist_dir.to_string_lossy().into_owned(),
        "--password".to_string(),
        creds.password.clone(),
        "--store".to_string(),
        creds.store.clone(),
        "--themeid".to_string(),
        creds.theme_id.clone(),
    ]
}

/// Start the sync tool as a supervised process.
pub fn spawn_theme_sync(
    section: &SyncSection,
    dist_dir: &Path,
    creds: &SyncCredentials,
    event_tx: mpsc::Sender<OrchestratorEvent>,
) -> Result<ProcessHandle> {
    let mut cmd = Command::new(&section.cmd);
    cmd.args(theme_sync_args(dist_dir, creds));
    supervise("theme-sync", cmd, event_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SHOPIFY_PASSWORD", "shppa_secret"),
            ("SHOPIFY_STORE", "demo.myshopify.com"),
            ("SHOPIFY_THEME_ID", "123456"),
        ])
    }

    #[test]
    fn credentials_come_from_configured_variables() {
        let vars = env();
        let creds = SyncCredentials::from_lookup(&SyncSection::default(), |name| {
            vars.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(creds.store, "demo.myshopify.com");
        assert_eq!(creds.theme_id, "123456");
        assert!(!format!("{creds:?}").contains("shppa_secret"));
    }

    #[test]
    fn missing_variable_is_named_in_the_error() {
        let mut vars = env();
        vars.remove("SHOPIFY_THEME_ID");

        let err = SyncCredentials::from_lookup(&SyncSection::default(), |name| {
            vars.get(name).map(|v| v.to_string())
        })
        .unwrap_err();

        assert!(matches!(err, ThemewatchError::MissingCredential(name) if name == "SHOPIFY_THEME_ID"));
    }

    #[test]
    fn sync_args_watch_the_dist_dir() {
        let creds = SyncCredentials {
            password: "p".into(),
            store: "s".into(),
            theme_id: "1".into(),
        };

        let args = theme_sync_args(Path::new("dist"), &creds);

        assert_eq!(
            args,
            vec!["watch", "--dir", "dist", "--password", "p", "--store", "s", "--themeid", "1"]
        );
    }
}
