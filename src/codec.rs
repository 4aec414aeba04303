//! Snapshot encoding and artifact import.
//!
//! Every exported artifact carries a complete copy of the content model so it
//! can be re-opened for editing. The copy lives in a versioned envelope:
//!
//! ```text
//! <script type="application/json" id="world-snapshot">
//! {"checksum":"9f2c…","formatVersion":2,"payload":{ …content model… }}
//! </script>
//! ```
//!
//! - `payload` is the *unfiltered* model: hidden entities, `!` tags and notes
//!   included, with the fully resolved appearance rather than the sparse one.
//! - `checksum` is the SHA-256 of the payload serialized with sorted keys. It is
//!   optional on import, but must match when present.
//! - A bare payload (no envelope) is read as format version 1.
//!
//! `<`, `>` and `&` inside the JSON are written as `\u003c`, `\u003e` and
//! `\u0026`, so no string value can close the surrounding script element.
//!
//! Import always runs the appearance through [`theme::resolve`], so artifacts
//! using the retired combined `template` field, or keys removed from the
//! catalog, come back as a valid, migrated configuration.

use crate::model::ContentModel;
use crate::theme::{self, Catalogs, ResolvedTheme};
use maud::{Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// DOM id of the script element holding the snapshot.
pub const SNAPSHOT_ELEMENT_ID: &str = "world-snapshot";

/// Envelope version written by [`encode`]. Imports accept `1..=FORMAT_VERSION`.
pub const FORMAT_VERSION: u32 = 2;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to serialize content model: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no `{SNAPSHOT_ELEMENT_ID}` snapshot found in artifact")]
    MissingSnapshot,
    #[error("snapshot element is not closed")]
    Unterminated,
    #[error("snapshot format version {found} is not supported (expected 1..={FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },
    #[error("snapshot checksum mismatch (recorded {recorded}, computed {computed})")]
    ChecksumMismatch { recorded: String, computed: String },
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    format_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
    payload: Value,
}

/// Hex SHA-256 of a payload's canonical (key-sorted, compact) JSON.
pub fn checksum(payload: &Value) -> String {
    format!("{:x}", Sha256::digest(payload.to_string().as_bytes()))
}

/// Serialize `content` with `theme`'s resolved appearance into embeddable text.
pub fn encode(content: &ContentModel, theme: &ResolvedTheme) -> Result<String, EncodeError> {
    let mut snapshot = content.clone();
    snapshot.appearance = theme.appearance.clone();
    let payload = serde_json::to_value(&snapshot)?;
    let envelope = Envelope {
        format_version: FORMAT_VERSION,
        checksum: Some(checksum(&payload)),
        payload,
    };
    Ok(escape_for_script(&serde_json::to_string(&envelope)?))
}

/// The script element carrying an encoded snapshot.
pub fn embed(snapshot: &str) -> Markup {
    html! {
        script type="application/json" id=(SNAPSHOT_ELEMENT_ID) {
            (PreEscaped(snapshot))
        }
    }
}

fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

/// Locate the raw snapshot text inside an artifact.
///
/// The artifact's own snapshot element follows all rendered content, so the
/// last matching element wins. Snapshot-looking tags that user markdown
/// passed through into the page body are ignored.
pub fn extract(artifact: &str) -> Result<&str, ImportError> {
    let mut search_end = artifact.len();
    while let Some(tag_start) = artifact[..search_end].rfind("<script") {
        search_end = tag_start;
        let Some(tag_len) = artifact[tag_start..].find('>') else {
            continue;
        };
        if !has_snapshot_id(&artifact[tag_start..tag_start + tag_len]) {
            continue;
        }
        let body = &artifact[tag_start + tag_len + 1..];
        return match body.find("</script>") {
            Some(end) => Ok(body[..end].trim()),
            None => Err(ImportError::Unterminated),
        };
    }
    Err(ImportError::MissingSnapshot)
}

fn has_snapshot_id(tag: &str) -> bool {
    tag.contains(&format!("id=\"{SNAPSHOT_ELEMENT_ID}\""))
        || tag.contains(&format!("id='{SNAPSHOT_ELEMENT_ID}'"))
}

/// Read a content model back out of an exported artifact.
///
/// Fails without side effects: on any error the caller's model is untouched.
pub fn decode(artifact: &str, catalogs: &Catalogs) -> Result<ContentModel, ImportError> {
    decode_snapshot(extract(artifact)?, catalogs)
}

/// Parse snapshot text (envelope or bare payload) into a migrated content model.
pub fn decode_snapshot(snapshot: &str, catalogs: &Catalogs) -> Result<ContentModel, ImportError> {
    let value: Value = serde_json::from_str(snapshot)?;
    let payload = if value.get("formatVersion").is_some() {
        let envelope: Envelope = serde_json::from_value(value)?;
        if envelope.format_version == 0 || envelope.format_version > FORMAT_VERSION {
            return Err(ImportError::UnsupportedVersion {
                found: envelope.format_version,
            });
        }
        if let Some(recorded) = envelope.checksum {
            let computed = checksum(&envelope.payload);
            if recorded != computed {
                return Err(ImportError::ChecksumMismatch { recorded, computed });
            }
        }
        envelope.payload
    } else {
        log::debug!("snapshot has no envelope, reading as format version 1");
        value
    };

    let mut content: ContentModel = serde_json::from_value(payload)?;
    content.appearance = theme::resolve(&content.appearance, catalogs).appearance;
    Ok(content)
}
