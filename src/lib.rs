//! # Worldsheet
//!
//! Assembles a self-contained world reference page (one HTML file) from a
//! project's structured content and its appearance settings, and reads that
//! file back for further editing.
//!
//! # Architecture: Resolve → Assemble → Embed
//!
//! ```text
//! 1. Resolve   AppearanceConfig + Catalogs  →  ResolvedTheme   (never fails)
//! 2. Assemble  ContentModel + ResolvedTheme →  Artifact        (sections, overlays, styles)
//! 3. Embed     ContentModel                 →  snapshot        (inside the artifact)
//! ```
//!
//! Importing runs the codec in reverse and resolves the appearance again, so
//! an artifact written by an older version comes back with every style
//! dimension filled in.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | The content model: entity families, custom pages, visibility and hidden tags |
//! | [`theme`] | Appearance config, legacy migration, defaulting and the resolved theme |
//! | [`templates`] | Custom page templates, registration rules and failure-isolated rendering |
//! | [`assemble`] | Builds the single-file artifact: sections, navigation, overlays, styles |
//! | [`codec`] | Versioned snapshot envelope embedded in the artifact |
//! | [`assets`] | Static files a resolved theme depends on |
//! | [`storage`] | Project storage trait and the filesystem implementation |
//! | [`session`] | Owns the open project; save with verification and one retry |
//! | [`markdown`] | Markdown to HTML for overview, descriptions and text elements |
//! | [`naming`] | DOM ids for sections, custom pages and detail panels |
//! | [`config`] | `worldsheet.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Content Problems Degrade, Never Abort
//!
//! An unknown style key falls back to the dimension default. A page naming an
//! unregistered template, or a template that fails to render, becomes a
//! placeholder section while the rest of the document renders. Every such
//! decision is logged and recorded in the [`assemble::AssemblyReport`].
//!
//! ## Hidden Is Not Deleted
//!
//! Hidden entities and `!`-prefixed tags never reach the rendered markup, but
//! the embedded snapshot is the whole model. Re-importing an artifact loses
//! nothing.
//!
//! ## Maud For Markup
//!
//! All HTML is produced with [Maud](https://maud.lambda.xyz/): interpolation is
//! escaped by default and malformed markup is a build error.

pub mod assemble;
pub mod assets;
pub mod codec;
pub mod config;
pub mod markdown;
pub mod model;
pub mod naming;
pub mod output;
pub mod session;
pub mod storage;
pub mod templates;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_helpers;
