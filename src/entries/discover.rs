// src/entries/discover.rs

use std::path::Path;

use tracing::{debug, info};

use crate::entries::whitelist::is_valid_template;
use crate::entries::EntrypointMap;
use crate::errors::{Result, ThemewatchError};
use crate::fs::FileSystem;

/// Entry directories under the scripts dir, scanned in this order.
///
/// The key prefix of an entry is the first segment of its category, so
/// `templates/customers/login.js` is keyed `templates.login`.
pub const ENTRY_CATEGORIES: &[&str] = &["layout", "templates", "templates/customers"];

/// Scan `scripts_dir` and build the entrypoint map.
///
/// An entry is any directory item whose stem has a sibling `<stem>.js`; this
/// drops subdirectories and stray non-script files. Under `templates` the stem
/// must also start with a known storefront template name.
///
/// A missing category directory is fatal: `ThemewatchError::MissingSourceDir`.
pub fn discover_entrypoints(fs: &dyn FileSystem, scripts_dir: &Path) -> Result<EntrypointMap> {
    let mut entrypoints = EntrypointMap::new();

    for category in ENTRY_CATEGORIES {
        let dir = scripts_dir.join(category);
        if !fs.is_dir(&dir) {
            return Err(ThemewatchError::MissingSourceDir(dir));
        }

        let entry_type = category.split('/').next().unwrap_or(category);

        for item in fs.read_dir(&dir)? {
            let Some(name) = item.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let entry_file = dir.join(format!("{name}.js"));

            if !fs.is_file(&entry_file) {
                continue;
            }

            if entry_type == "templates" && !is_valid_template(name) {
                debug!(name, "ignoring template without a storefront counterpart");
                continue;
            }

            entrypoints.insert(format!("{entry_type}.{name}"), entry_file);
        }
    }

    info!(count = entrypoints.len(), "discovered entrypoints");
    for (key, path) in entrypoints.iter() {
        debug!(key, path = %path.display(), "entrypoint");
    }

    Ok(entrypoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::PathBuf;

    fn scaffold() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_dir("src/scripts/layout");
        fs.add_dir("src/scripts/templates/customers");
        fs
    }

    #[test]
    fn keys_use_top_level_category() {
        let fs = scaffold();
        fs.add_file("src/scripts/layout/theme.js", "");
        fs.add_file("src/scripts/templates/product.js", "");
        fs.add_file("src/scripts/templates/customers/login.js", "");

        let map = discover_entrypoints(&fs, Path::new("src/scripts")).unwrap();

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["layout.theme", "templates.login", "templates.product"]);
        assert_eq!(
            map.get("templates.login"),
            Some(PathBuf::from("src/scripts/templates/customers/login.js").as_path())
        );
    }

    #[test]
    fn items_without_script_sibling_are_skipped() {
        let fs = scaffold();
        fs.add_file("src/scripts/layout/theme.js", "");
        fs.add_file("src/scripts/layout/theme.scss", "");
        fs.add_file("src/scripts/layout/checkout.scss", "");
        fs.add_dir("src/scripts/layout/partials");

        let map = discover_entrypoints(&fs, Path::new("src/scripts")).unwrap();

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["layout.theme"]);
    }

    #[test]
    fn customers_directory_is_not_an_entry_of_templates() {
        let fs = scaffold();
        fs.add_file("src/scripts/templates/customers/account.js", "");

        let map = discover_entrypoints(&fs, Path::new("src/scripts")).unwrap();

        assert!(!map.contains_key("templates.customers"));
        assert!(map.contains_key("templates.account"));
    }

    #[test]
    fn layout_entries_skip_the_template_whitelist() {
        let fs = scaffold();
        fs.add_file("src/scripts/layout/robots.js", "");
        fs.add_file("src/scripts/templates/robots.js", "");

        let map = discover_entrypoints(&fs, Path::new("src/scripts")).unwrap();

        assert!(map.contains_key("layout.robots"));
        assert!(!map.contains_key("templates.robots"));
    }

    #[test]
    fn missing_customers_dir_is_fatal() {
        let fs = MockFileSystem::new();
        fs.add_file("src/scripts/layout/theme.js", "");
        fs.add_file("src/scripts/templates/cart.js", "");

        match discover_entrypoints(&fs, Path::new("src/scripts")) {
            Err(ThemewatchError::MissingSourceDir(dir)) => {
                assert_eq!(dir, PathBuf::from("src/scripts/templates/customers"));
            }
            other => panic!("expected MissingSourceDir, got {other:?}"),
        }
    }

    #[test]
    fn empty_directories_yield_an_empty_map() {
        let fs = scaffold();
        let map = discover_entrypoints(&fs, Path::new("src/scripts")).unwrap();
        assert!(map.is_empty());
    }
}
