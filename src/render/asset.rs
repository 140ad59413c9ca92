// src/render/asset.rs

use crate::types::Mode;

/// Dev server prefix used when no config overrides it.
pub const DEFAULT_DEV_ASSET_URL: &str = "https://localhost:3000/assets/";

/// Where a rendered tag should load `filename` from.
///
/// Production goes through the theme's `asset_url` filter; development points
/// straight at the dev server.
pub fn asset_src(filename: &str, mode: Mode, dev_asset_url: &str) -> String {
    match mode {
        Mode::Production => format!("{{{{ '{filename}' | asset_url }}}}"),
        Mode::Development => format!("{dev_asset_url}{filename}"),
    }
}
