//! Static files a resolved theme needs next to the artifact.
//!
//! A handful of style keys reference images under `assets/` (parchment
//! backgrounds, the compass back-to-top icon, ...). Only specific key values
//! pull in files; a dimension left at a file-less key contributes nothing.
//! The storage layer copies these from the shared asset library when saving.

use crate::theme::{ResolvedTheme, StyleDimension};
use std::path::PathBuf;

/// Folder, relative to the artifact, that theme assets are copied into.
pub const ASSETS_DIR: &str = "assets";

/// One file to copy: `source` is relative to the asset library,
/// `destination` relative to the project folder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssetCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl AssetCopy {
    fn new(file: &str) -> Self {
        Self {
            source: PathBuf::from(file),
            destination: PathBuf::from(ASSETS_DIR).join(file),
        }
    }
}

const ASSET_TABLE: &[(StyleDimension, &str, &[&str])] = &[
    (
        StyleDimension::Background,
        "parchment",
        &["backgrounds/parchment.jpg", "textures/paper-fibers.png"],
    ),
    (
        StyleDimension::Background,
        "starfield",
        &["backgrounds/starfield.jpg"],
    ),
    (
        StyleDimension::BackgroundOverlay,
        "grain",
        &["textures/grain.png"],
    ),
    (
        StyleDimension::BannerStyle,
        "scroll",
        &["banners/scroll-edge.png", "textures/paper-fibers.png"],
    ),
    (
        StyleDimension::PageHeader,
        "ornate",
        &["ornaments/flourish.svg"],
    ),
    (
        StyleDimension::BackToTop,
        "compass",
        &["icons/compass.svg"],
    ),
];

/// Deduplicated files required by `theme`'s selected style keys, in table order.
pub fn required_assets(theme: &ResolvedTheme) -> Vec<AssetCopy> {
    let mut assets: Vec<AssetCopy> = Vec::new();
    for (dimension, key, files) in ASSET_TABLE {
        if theme.key(*dimension) != *key {
            continue;
        }
        for file in *files {
            let copy = AssetCopy::new(file);
            if !assets.contains(&copy) {
                assets.push(copy);
            }
        }
    }
    assets
}
