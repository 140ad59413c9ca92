mod common;
use crate::common::builders::ThemeTreeBuilder;
use crate::common::init_tracing;

use std::error::Error;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use themewatch::entries::discover_entrypoints;
use themewatch::errors::ThemewatchError;
use themewatch::fs::RealFileSystem;

type TestResult = Result<(), Box<dyn Error>>;

fn standard_tree() -> ThemeTreeBuilder {
    ThemeTreeBuilder::new()
        .layout("theme")
        .file("src/scripts/layout/theme.scss")
        .template("product")
        .template("product-recommendations")
        .template("robots")
        .file("src/scripts/templates/robots.liquid")
        .template("collection")
        .customer_template("login")
        .customer_template("register")
        .file("src/scripts/templates/partials/gallery.js")
}

#[test]
fn discovers_entries_on_disk() -> TestResult {
    init_tracing();

    let tmp = TempDir::new()?;
    standard_tree().write_to(tmp.path())?;
    let scripts = tmp.path().join("src/scripts");

    let map = discover_entrypoints(&RealFileSystem, &scripts)?;

    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(
        keys,
        vec![
            "layout.theme",
            "templates.collection",
            "templates.login",
            "templates.product",
            "templates.product-recommendations",
            "templates.register",
        ]
    );
    assert_eq!(
        map.get("templates.register"),
        Some(scripts.join("templates/customers/register.js").as_path())
    );
    assert!(!map.contains_key("templates.robots"));
    assert!(!map.contains_key("templates.partials"));

    Ok(())
}

#[test]
fn discovery_is_idempotent() -> TestResult {
    init_tracing();

    let tmp = TempDir::new()?;
    standard_tree().write_to(tmp.path())?;
    let scripts = tmp.path().join("src/scripts");

    let first = discover_entrypoints(&RealFileSystem, &scripts)?;
    let second = discover_entrypoints(&RealFileSystem, &scripts)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn missing_templates_dir_aborts() -> TestResult {
    init_tracing();

    let tmp = TempDir::new()?;
    std::fs::create_dir_all(tmp.path().join("src/scripts/layout"))?;

    let scripts = tmp.path().join("src/scripts");
    match discover_entrypoints(&RealFileSystem, &scripts) {
        Err(ThemewatchError::MissingSourceDir(dir)) => {
            assert_eq!(dir, scripts.join("templates"));
        }
        other => panic!("expected MissingSourceDir, got {other:?}"),
    }
    Ok(())
}

#[test]
fn mock_and_real_filesystems_agree() -> TestResult {
    init_tracing();

    let tree = standard_tree();
    let tmp = TempDir::new()?;
    tree.write_to(tmp.path())?;

    let real = discover_entrypoints(&RealFileSystem, &tmp.path().join("src/scripts"))?;
    let mock = discover_entrypoints(&tree.build_mock(), Path::new("src/scripts"))?;

    assert_eq!(real.keys().collect::<Vec<_>>(), mock.keys().collect::<Vec<_>>());
    assert_eq!(
        mock.get("templates.login"),
        Some(PathBuf::from("src/scripts/templates/customers/login.js").as_path())
    );
    Ok(())
}
