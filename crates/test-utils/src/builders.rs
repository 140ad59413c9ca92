#![allow(dead_code)]

use std::path::{Path, PathBuf};

use themewatch::entries::EntrypointMap;
use themewatch::fs::mock::MockFileSystem;

/// Builder for a theme source tree under `src/scripts`.
///
/// The three entry directories always exist, so discovery never fails on a
/// tree built here unless a test removes one.
pub struct ThemeTreeBuilder {
    files: Vec<PathBuf>,
}

pub const SCRIPTS_DIR: &str = "src/scripts";

impl ThemeTreeBuilder {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    pub fn layout(self, name: &str) -> Self {
        self.file(format!("{SCRIPTS_DIR}/layout/{name}.js"))
    }

    pub fn template(self, name: &str) -> Self {
        self.file(format!("{SCRIPTS_DIR}/templates/{name}.js"))
    }

    pub fn customer_template(self, name: &str) -> Self {
        self.file(format!("{SCRIPTS_DIR}/templates/customers/{name}.js"))
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    fn dirs() -> [String; 3] {
        [
            format!("{SCRIPTS_DIR}/layout"),
            format!("{SCRIPTS_DIR}/templates"),
            format!("{SCRIPTS_DIR}/templates/customers"),
        ]
    }

    pub fn build_mock(&self) -> MockFileSystem {
        let fs = MockFileSystem::new();
        for dir in Self::dirs() {
            fs.add_dir(dir);
        }
        for file in &self.files {
            fs.add_file(file, "");
        }
        fs
    }

    /// Materialise the tree under `root` on the real filesystem.
    pub fn write_to(&self, root: &Path) -> std::io::Result<()> {
        for dir in Self::dirs() {
            std::fs::create_dir_all(root.join(dir))?;
        }
        for file in &self.files {
            let path = root.join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
        }
        Ok(())
    }
}

impl Default for ThemeTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entrypoint map from `(key, path)` pairs.
pub fn entrypoints(pairs: &[(&str, &str)]) -> EntrypointMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), PathBuf::from(v)))
        .collect()
}

/// The entrypoints of a typical theme.
pub fn standard_entrypoints() -> EntrypointMap {
    entrypoints(&[
        ("layout.theme", "./src/scripts/layout/theme.js"),
        ("templates.cart", "./src/scripts/templates/cart.js"),
        ("templates.collection", "./src/scripts/templates/collection.js"),
        ("templates.product", "./src/scripts/templates/product.js"),
        ("templates.login", "./src/scripts/templates/customers/login.js"),
        ("templates.register", "./src/scripts/templates/customers/register.js"),
    ])
}
