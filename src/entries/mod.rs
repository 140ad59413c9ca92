// src/entries/mod.rs

//! Entrypoint discovery.
//!
//! Scans the layout, template and customer template script directories and
//! produces an [`EntrypointMap`] keyed by `<category>.<name>`, e.g.
//! `layout.theme` or `templates.product`. Customer templates share the
//! `templates` prefix; their subdirectory is recovered from the path when
//! rendering.

pub mod discover;
pub mod whitelist;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::Result;
use crate::fs::FileSystem;

pub use discover::{discover_entrypoints, ENTRY_CATEGORIES};
pub use whitelist::{is_valid_template, VALID_TEMPLATES};

/// Mapping from entry key to the entry's source file.
///
/// Built fresh by each discovery run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntrypointMap {
    entries: BTreeMap<String, PathBuf>,
}

impl EntrypointMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: String, path: PathBuf) {
        self.entries.insert(key, path);
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.entries.get(key).map(PathBuf::as_path)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Serialize as a JSON object, the form the bundler config reads.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON manifest to `path`.
    pub fn write_manifest(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs.write(path, json.as_bytes())?;
        Ok(())
    }
}

impl FromIterator<(String, PathBuf)> for EntrypointMap {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn manifest_is_a_flat_json_object() {
        let map: EntrypointMap = [
            ("layout.theme".to_string(), PathBuf::from("src/scripts/layout/theme.js")),
            ("templates.cart".to_string(), PathBuf::from("src/scripts/templates/cart.js")),
        ]
        .into_iter()
        .collect();

        let fs = MockFileSystem::new();
        map.write_manifest(&fs, Path::new("dist/entrypoints.json"))
            .unwrap();

        let written = fs.read_to_string(Path::new("dist/entrypoints.json")).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["layout.theme"], "src/scripts/layout/theme.js");
        assert_eq!(parsed["templates.cart"], "src/scripts/templates/cart.js");
        assert_eq!(parsed.len(), 2);
    }
}
