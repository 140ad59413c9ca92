// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod entries;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod render;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::cli::{CliArgs, Command};
use crate::config::{load_or_default, Config};
use crate::engine::{Orchestrator, OrchestratorCore, OrchestratorEvent, OrchestratorOptions};
use crate::entries::{discover_entrypoints, EntrypointMap};
use crate::errors::Result;
use crate::exec::{spawn_theme_sync, ShellBuildController, SyncCredentials};
use crate::fs::{FileSystem, RealFileSystem};
use crate::render::{collect_assets, split_by_kind, write_snippets, TagRenderer};
use crate::types::Mode;
use crate::watch::RestartFilter;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    match args.command.unwrap_or_default() {
        Command::Watch { dry_run } => watch(&cfg, fs, dry_run).await,
        Command::Build => build(&cfg, fs).await,
        Command::Entries { json } => print_entries(&cfg, fs.as_ref(), json),
        Command::Render {
            mode,
            stdout,
            files,
        } => render(&cfg, fs.as_ref(), mode, stdout, files),
    }
}

/// Build a renderer honouring the `[dev_server]` and `[render]` config.
pub fn renderer_for<'a>(cfg: &'a Config, entries: &'a EntrypointMap, mode: Mode) -> TagRenderer<'a> {
    TagRenderer::new(entries, mode)
        .with_dev_asset_url(&cfg.dev_server.asset_url)
        .with_missing_entry_policy(cfg.render.on_missing_entry)
}

/// Watch session:
/// - discover entrypoints and write the manifest (fatal if a directory is missing)
/// - start the theme sync tool
/// - start the file watcher and Ctrl-C handler
/// - run the bundler under the orchestrator until shutdown or a process exits
async fn watch(cfg: &Config, fs: Arc<dyn FileSystem>, dry_run: bool) -> Result<()> {
    if dry_run {
        let entries = discover_entrypoints(fs.as_ref(), &cfg.paths.scripts_dir)?;
        print_dry_run(cfg, &entries);
        return Ok(());
    }

    let creds = SyncCredentials::from_env(&cfg.sync)?;

    let (tx, rx) = mpsc::channel::<OrchestratorEvent>(64);

    let controller = ShellBuildController::new(cfg, fs.clone(), tx.clone());
    // Creates the dist dir before the sync tool starts watching it.
    controller.refresh_manifest()?;

    let filter = RestartFilter::for_entry_dirs(&project_root(), &cfg.paths.scripts_dir);
    let known = filter.existing_files(fs.as_ref())?;
    let core = OrchestratorCore::new(filter).with_known_files(known);

    let _sync = spawn_theme_sync(&cfg.sync, &cfg.paths.dist_dir, &creds, tx.clone())?;
    let _watcher = crate::watch::spawn_watcher(&cfg.paths.source_root, tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(OrchestratorEvent::ShutdownRequested).await;
        });
    }
    drop(tx);

    let options = OrchestratorOptions {
        debounce: std::time::Duration::from_millis(cfg.watch.debounce_ms),
    };

    Orchestrator::new(core, rx, controller, options).run().await?;
    info!("watch session finished");
    Ok(())
}

/// One-off production build, then snippets for whatever it emitted.
async fn build(cfg: &Config, fs: Arc<dyn FileSystem>) -> Result<()> {
    let (tx, _rx) = mpsc::channel::<OrchestratorEvent>(1);
    let controller = ShellBuildController::new(cfg, fs.clone(), tx);

    let entries = controller.run_once().await?;
    let files = collect_assets(fs.as_ref(), &cfg.assets_dir())?;
    let renderer = renderer_for(cfg, &entries, Mode::Production);
    write_snippets(fs.as_ref(), &cfg.snippets_dir(), &files, &renderer)?;
    Ok(())
}

fn render(
    cfg: &Config,
    fs: &dyn FileSystem,
    mode: Mode,
    stdout: bool,
    files: Vec<String>,
) -> Result<()> {
    let entries = discover_entrypoints(fs, &cfg.paths.scripts_dir)?;
    let files = if files.is_empty() {
        collect_assets(fs, &cfg.assets_dir())?
    } else {
        files
    };
    let renderer = renderer_for(cfg, &entries, mode);

    if stdout {
        let (scripts, styles) = split_by_kind(&files);
        print!("{}", renderer.render_script_tags(&scripts)?);
        print!("{}", renderer.render_style_tags(&styles)?);
    } else {
        write_snippets(fs, &cfg.snippets_dir(), &files, &renderer)?;
    }
    Ok(())
}

fn print_entries(cfg: &Config, fs: &dyn FileSystem, json: bool) -> Result<()> {
    let entries = discover_entrypoints(fs, &cfg.paths.scripts_dir)?;
    if json {
        println!("{}", entries.to_json()?);
    } else {
        for (key, path) in entries.iter() {
            println!("{key}\t{}", path.display());
        }
    }
    Ok(())
}

/// Directory event paths are compared against: the working directory, which
/// relative config paths are resolved from.
fn project_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    cwd.canonicalize().unwrap_or(cwd)
}

fn print_dry_run(cfg: &Config, entries: &EntrypointMap) {
    println!("themewatch dry-run");
    println!("  paths.source_root = {}", cfg.paths.source_root.display());
    println!("  paths.scripts_dir = {}", cfg.paths.scripts_dir.display());
    println!("  paths.dist_dir = {}", cfg.paths.dist_dir.display());
    println!("  build.watch_cmd = {}", cfg.build.watch_cmd);
    println!(
        "  sync = {} watch --dir {}",
        cfg.sync.cmd,
        cfg.paths.dist_dir.display()
    );
    println!("  watch.debounce_ms = {}", cfg.watch.debounce_ms);
    println!("  render.on_missing_entry = {:?}", cfg.render.on_missing_entry);
    println!();

    println!("entrypoints ({}):", entries.len());
    for (key, path) in entries.iter() {
        println!("  - {key}: {}", path.display());
    }
}
