// src/render/snippet.rs

//! Liquid snippets that load generated bundles.
//!
//! Every bundle except the runtime chunk is wrapped in a template condition:
//! pages whose template or layout contributed to the bundle get the real tag,
//! all other pages get a prefetch hint for the same file.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::entries::EntrypointMap;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::render::asset::{asset_src, DEFAULT_DEV_ASSET_URL};
use crate::render::partial::{
    bundle_identity, conditions_from_partials, is_bundle_output, is_runtime_chunk,
    normalize_filename, resolve_partials,
};
use crate::types::{AssetKind, MissingEntryPolicy, Mode};

pub const SCRIPT_TAGS_SNIPPET: &str = "script-tags.liquid";
pub const STYLE_TAGS_SNIPPET: &str = "style-tags.liquid";

/// Renders script/style snippets for one build.
#[derive(Debug, Clone, Copy)]
pub struct TagRenderer<'a> {
    entries: &'a EntrypointMap,
    mode: Mode,
    dev_asset_url: &'a str,
    on_missing_entry: MissingEntryPolicy,
}

impl<'a> TagRenderer<'a> {
    pub fn new(entries: &'a EntrypointMap, mode: Mode) -> Self {
        Self {
            entries,
            mode,
            dev_asset_url: DEFAULT_DEV_ASSET_URL,
            on_missing_entry: MissingEntryPolicy::Fail,
        }
    }

    pub fn with_dev_asset_url(mut self, url: &'a str) -> Self {
        self.dev_asset_url = url;
        self
    }

    pub fn with_missing_entry_policy(mut self, policy: MissingEntryPolicy) -> Self {
        self.on_missing_entry = policy;
        self
    }

    pub fn render_script_tags<S: AsRef<str>>(&self, files: &[S]) -> Result<String> {
        self.render(files, AssetKind::Script)
    }

    pub fn render_style_tags<S: AsRef<str>>(&self, files: &[S]) -> Result<String> {
        self.render(files, AssetKind::Style)
    }

    fn render<S: AsRef<str>>(&self, files: &[S], kind: AssetKind) -> Result<String> {
        let mut out = String::new();
        for raw in files {
            let filename = normalize_filename(raw.as_ref());
            out.push_str(&self.render_one(&filename, kind)?);
        }
        Ok(out)
    }

    fn render_one(&self, filename: &str, kind: AssetKind) -> Result<String> {
        let src = asset_src(filename, self.mode, self.dev_asset_url);

        if kind == AssetKind::Script && is_runtime_chunk(filename) {
            return Ok(format!("<script src=\"{src}\"></script>\n"));
        }

        let partials = resolve_partials(filename, self.entries, self.on_missing_entry)?;
        let prefetch = format!(
            "<link rel=\"prefetch\" href=\"{src}\" as=\"{}\">",
            kind.prefetch_as()
        );

        if partials.is_empty() {
            debug!(filename, "no resolvable entrypoints; emitting prefetch hint only");
            return Ok(format!("{prefetch}\n"));
        }

        let conditions = conditions_from_partials(&partials);
        let tag = match kind {
            AssetKind::Script => format!("<script src=\"{src}\" defer></script>"),
            AssetKind::Style => format!("<link href=\"{src}\" rel=\"stylesheet\">"),
        };

        Ok(format!(
            "{{%- if {conditions} -%}}\n    {tag}\n{{%- else -%}}\n    {prefetch}\n{{%- endif -%}}\n"
        ))
    }
}

/// Render the script snippet with the default dev server and `Fail` policy.
pub fn render_script_tags<S: AsRef<str>>(
    files: &[S],
    entries: &EntrypointMap,
    mode: Mode,
) -> Result<String> {
    TagRenderer::new(entries, mode).render_script_tags(files)
}

/// Render the style snippet with the default dev server and `Fail` policy.
pub fn render_style_tags<S: AsRef<str>>(
    files: &[S],
    entries: &EntrypointMap,
    mode: Mode,
) -> Result<String> {
    TagRenderer::new(entries, mode).render_style_tags(files)
}

/// Paths written by [`write_snippets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSnippets {
    pub scripts: PathBuf,
    pub styles: PathBuf,
}

/// Split `files` by kind and write both snippets into `snippets_dir`.
///
/// Files that are neither `.js` nor `.css` (source maps, fonts) are ignored.
pub fn write_snippets<S: AsRef<str>>(
    fs: &dyn FileSystem,
    snippets_dir: &Path,
    files: &[S],
    renderer: &TagRenderer<'_>,
) -> Result<WrittenSnippets> {
    let (scripts, styles) = split_by_kind(files);

    let scripts_path = snippets_dir.join(SCRIPT_TAGS_SNIPPET);
    let styles_path = snippets_dir.join(STYLE_TAGS_SNIPPET);

    fs.write(&scripts_path, renderer.render_script_tags(&scripts)?.as_bytes())?;
    fs.write(&styles_path, renderer.render_style_tags(&styles)?.as_bytes())?;

    info!(
        scripts = scripts.len(),
        styles = styles.len(),
        dir = %snippets_dir.display(),
        "wrote asset snippets"
    );

    Ok(WrittenSnippets {
        scripts: scripts_path,
        styles: styles_path,
    })
}

/// Partition generated filenames into scripts and styles, dropping the rest.
pub fn split_by_kind<S: AsRef<str>>(files: &[S]) -> (Vec<&str>, Vec<&str>) {
    let mut scripts = Vec::new();
    let mut styles = Vec::new();
    for file in files {
        let file = file.as_ref();
        match AssetKind::from_filename(file) {
            Some(AssetKind::Script) => scripts.push(file),
            Some(AssetKind::Style) => styles.push(file),
            None => {}
        }
    }
    (scripts, styles)
}

/// List the bundler's current scripts and styles in `assets_dir`.
///
/// The directory also holds static theme assets and outputs of earlier
/// builds. Only files named like bundler outputs are kept, and of several
/// hashed outputs of one bundle only the most recently written.
///
/// Sorted by name with runtime chunks first, so the bootstrap tag precedes
/// anything that depends on it.
pub fn collect_assets(fs: &dyn FileSystem, assets_dir: &Path) -> Result<Vec<String>> {
    let mut newest: BTreeMap<String, (SystemTime, String)> = BTreeMap::new();

    for path in fs.read_dir(assets_dir)? {
        if !fs.is_file(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if AssetKind::from_filename(name).is_none() {
            continue;
        }
        if !is_bundle_output(name) {
            debug!(file = name, "not a bundler output; leaving it out of the snippets");
            continue;
        }

        let modified = fs.modified(&path)?;
        let candidate = (modified, name.to_string());
        match newest.entry(bundle_identity(name)) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                let (stale, kept) = if candidate > *slot.get() {
                    (slot.insert(candidate), &slot.get().1)
                } else {
                    (candidate, &slot.get().1)
                };
                debug!(stale = %stale.1, current = %kept, "ignoring output of an earlier build");
            }
        }
    }

    let mut files: Vec<String> = newest.into_values().map(|(_, name)| name).collect();
    files.sort_by(|a, b| {
        is_runtime_chunk(b)
            .cmp(&is_runtime_chunk(a))
            .then_with(|| a.cmp(b))
    });

    Ok(files)
}
