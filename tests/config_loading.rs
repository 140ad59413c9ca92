mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use themewatch::config::{load_and_validate, load_or_default};
use themewatch::errors::ThemewatchError;
use themewatch::types::MissingEntryPolicy;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn partial_config_keeps_defaults() -> TestResult {
    init_tracing();

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[paths]
dist_dir = "build"

[render]
on_missing_entry = "skip"
"#
    )?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.paths.dist_dir, PathBuf::from("build"));
    assert_eq!(cfg.paths.scripts_dir, PathBuf::from("src/scripts"));
    assert_eq!(cfg.render.on_missing_entry, MissingEntryPolicy::Skip);
    assert_eq!(cfg.dev_server.asset_url, "https://localhost:3000/assets/");
    assert_eq!(cfg.watch.debounce_ms, 100);
    assert_eq!(cfg.snippets_dir(), PathBuf::from("build/snippets"));
    assert_eq!(cfg.manifest_path(), PathBuf::from("build/entrypoints.json"));
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    init_tracing();

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[paths]
script_dir = "src/js"
"#
    )?;

    match load_and_validate(file.path()) {
        Err(ThemewatchError::TomlError(e)) => assert!(e.to_string().contains("script_dir")),
        other => panic!("expected TomlError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn invalid_policy_is_a_parse_error() -> TestResult {
    init_tracing();

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[render]
on_missing_entry = "ignore"
"#
    )?;

    assert!(matches!(
        load_and_validate(file.path()),
        Err(ThemewatchError::TomlError(_))
    ));
    Ok(())
}

#[test]
fn semantic_errors_are_config_errors() -> TestResult {
    init_tracing();

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[dev_server]
asset_url = "https://localhost:3000/assets"
"#
    )?;

    match load_and_validate(file.path()) {
        Err(ThemewatchError::ConfigError(msg)) => assert!(msg.contains("asset_url")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn explicit_missing_config_is_an_error() {
    init_tracing();

    let result = load_or_default(Some(PathBuf::from("/definitely/not/here.toml").as_path()));
    assert!(matches!(result, Err(ThemewatchError::IoError(_))));
}
