// src/render/partial.rs

//! Decoding generated bundle filenames back into the entrypoints they carry.
//!
//! The bundler names each output after the entries it contains, e.g.
//! `layout.theme@templates.cart.3f9a1c.js`: outer segments are separated by
//! [`ENTRY_NAME_DELIMITER`], and each segment is `<type>.<name>[.<hash>]`.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::warn;

use crate::entries::EntrypointMap;
use crate::errors::{Result, ThemewatchError};
use crate::types::MissingEntryPolicy;

pub const ENTRY_NAME_DELIMITER: char = '@';
pub const ENTRY_PARTS_DELIMITER: char = '.';

/// One entrypoint contributing to a generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    /// Source file of the entrypoint.
    pub entrypoint: PathBuf,
    /// Name compared against the template variable, e.g. `product`.
    pub filename: String,
    /// Subdirectory under `templates/` (e.g. `customers`), if any.
    pub parent_directory: Option<String>,
    /// Liquid variable the condition tests: `template` or `layout`.
    pub entry_type: String,
}

impl Partial {
    /// `template == 'product'`, or `template == 'customers/login'` for
    /// templates living in a subdirectory.
    pub fn condition(&self) -> String {
        match &self.parent_directory {
            Some(dir) => format!("{} == '{}/{}'", self.entry_type, dir, self.filename),
            None => format!("{} == '{}'", self.entry_type, self.filename),
        }
    }
}

/// Join the conditions of all partials of one file with `or`.
pub fn conditions_from_partials(partials: &[Partial]) -> String {
    partials
        .iter()
        .map(Partial::condition)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Reduce a bundler-reported path or URL to its percent-decoded base name.
pub fn normalize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    percent_decode_str(base).decode_utf8_lossy().into_owned()
}

/// The bundler's bootstrap chunk, required on every page.
pub fn is_runtime_chunk(filename: &str) -> bool {
    filename == "runtime.js" || (filename.starts_with("runtime.") && filename.ends_with(".js"))
}

/// A decoded outer segment before it is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentName<'a> {
    pub entry_type: &'a str,
    /// First token after the type.
    pub filename: &'a str,
    /// Entrypoint map key, `<type>.<name>`.
    pub key: String,
}

impl<'a> SegmentName<'a> {
    fn parse(segment: &'a str) -> Self {
        let (entry_type, rest) = segment
            .split_once(ENTRY_PARTS_DELIMITER)
            .unwrap_or((segment, ""));
        let filename = rest.split(ENTRY_PARTS_DELIMITER).next().unwrap_or("");
        let key = format!("{entry_type}.{}", strip_extension(rest));
        Self {
            entry_type,
            filename,
            key,
        }
    }
}

fn is_vendor_segment(segment: &str) -> bool {
    segment.starts_with("vendor")
}

/// Split a generated filename into its non-vendor segments.
pub fn decode_segments(filename: &str) -> Vec<SegmentName<'_>> {
    strip_extension(filename)
        .split(ENTRY_NAME_DELIMITER)
        .filter(|segment| !is_vendor_segment(segment))
        .map(SegmentName::parse)
        .collect()
}

/// Entry types the bundler names its outputs after.
const BUNDLE_ENTRY_TYPES: [&str; 2] = ["layout", "templates"];

/// Whether `filename` follows the bundler's output naming: the runtime
/// chunk, or segments that are all vendor chunks or `layout`/`templates`
/// entries. Static theme assets (`jquery.min.js`, `theme.css`) do not.
pub fn is_bundle_output(filename: &str) -> bool {
    if is_runtime_chunk(filename) {
        return true;
    }
    strip_extension(filename)
        .split(ENTRY_NAME_DELIMITER)
        .all(|segment| {
            is_vendor_segment(segment) || {
                let parsed = SegmentName::parse(segment);
                BUNDLE_ENTRY_TYPES.contains(&parsed.entry_type) && !parsed.filename.is_empty()
            }
        })
}

/// The bundle a generated file belongs to, without its content hash.
///
/// Outputs of successive builds of one bundle share an identity:
/// `layout.theme.abc.js` and `layout.theme.def.js` are both
/// `layout.theme.js`.
pub fn bundle_identity(filename: &str) -> String {
    let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    if is_runtime_chunk(filename) {
        return format!("runtime.{extension}");
    }
    let segments: Vec<String> = strip_extension(filename)
        .split(ENTRY_NAME_DELIMITER)
        .map(|segment| {
            if is_vendor_segment(segment) {
                segment
                    .split(ENTRY_PARTS_DELIMITER)
                    .next()
                    .unwrap_or(segment)
                    .to_string()
            } else {
                SegmentName::parse(segment).key
            }
        })
        .collect();
    format!(
        "{}.{extension}",
        segments.join(&*ENTRY_NAME_DELIMITER.to_string())
    )
}

/// Resolve every segment of `filename` against `entries`.
///
/// Misses are handled per `policy`: `Fail` returns
/// `ThemewatchError::UnresolvedEntry`, `Skip` logs and drops the segment.
pub fn resolve_partials(
    filename: &str,
    entries: &EntrypointMap,
    policy: MissingEntryPolicy,
) -> Result<Vec<Partial>> {
    let mut partials = Vec::new();

    for segment in decode_segments(filename) {
        let Some(entrypoint) = entries.get(&segment.key) else {
            match policy {
                MissingEntryPolicy::Fail => {
                    return Err(ThemewatchError::UnresolvedEntry {
                        filename: filename.to_string(),
                        key: segment.key,
                    });
                }
                MissingEntryPolicy::Skip => {
                    warn!(filename, key = %segment.key, "no entrypoint for bundle segment; skipping");
                    continue;
                }
            }
        };

        let parent_directory = if segment.entry_type == "templates" {
            parent_dir_name(entrypoint)
                .filter(|name| name != "templates")
                .map(Cow::into_owned)
        } else {
            None
        };

        let entry_type = if segment.entry_type == "templates" {
            "template".to_string()
        } else {
            segment.entry_type.to_string()
        };

        partials.push(Partial {
            entrypoint: entrypoint.to_path_buf(),
            filename: segment.filename.to_string(),
            parent_directory,
            entry_type,
        });
    }

    Ok(partials)
}

fn parent_dir_name(path: &Path) -> Option<Cow<'_, str>> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy())
}

/// Drop the last `.ext` of a name, keeping dotfiles intact.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
