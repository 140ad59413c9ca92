// src/render/mod.rs

//! Asset tag rendering.
//!
//! - [`partial`] decodes generated filenames into the entrypoints they carry.
//! - [`asset`] resolves where an asset is loaded from in each [`Mode`](crate::types::Mode).
//! - [`snippet`] assembles the conditional Liquid markup and writes snippet files.

pub mod asset;
pub mod partial;
pub mod snippet;

pub use asset::{asset_src, DEFAULT_DEV_ASSET_URL};
pub use partial::{
    bundle_identity, conditions_from_partials, decode_segments, is_bundle_output,
    is_runtime_chunk, normalize_filename, resolve_partials, Partial, ENTRY_NAME_DELIMITER,
    ENTRY_PARTS_DELIMITER,
};
pub use snippet::{
    collect_assets, render_script_tags, render_style_tags, split_by_kind, write_snippets, TagRenderer,
    WrittenSnippets, SCRIPT_TAGS_SNIPPET, STYLE_TAGS_SNIPPET,
};
