//! Tool configuration.
//!
//! Handles loading, validating and merging `worldsheet.toml`. Stock defaults
//! are serialized to a TOML table and the user file is merged over it, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [storage]
//! root = "projects"          # One folder per project
//! asset_library = "assets"   # Shared theme assets (backgrounds, textures, icons)
//!
//! [export]
//! file_name = "index.html"   # Artifact file name inside the project folder
//! backup = true              # Keep the previous artifact as <file_name>.bak
//! verify = true              # Re-read and decode after saving, retry once on mismatch
//!
//! [icons]
//! size = 128                 # Edge of generated square icons, in pixels (16-1024)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "worldsheet.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `worldsheet.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldsheetConfig {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub icons: IconsConfig,
}

impl WorldsheetConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.file_name must not be empty".into(),
            ));
        }
        if self.export.file_name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "export.file_name must be a plain file name".into(),
            ));
        }
        if !(16..=1024).contains(&self.icons.size) {
            return Err(ConfigError::Validation(
                "icons.size must be 16-1024".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one folder per project.
    pub root: PathBuf,
    /// Directory holding the shared theme assets.
    pub asset_library: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("projects"),
            asset_library: PathBuf::from("assets"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub file_name: String,
    pub backup: bool,
    pub verify: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "index.html".to_string(),
            backup: true,
            verify: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    pub size: u32,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self { size: 128 }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(WorldsheetConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<WorldsheetConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: WorldsheetConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `worldsheet.toml` from a directory, falling back to stock defaults
/// when there is none.
pub fn load_config(dir: &Path) -> Result<WorldsheetConfig, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILE_NAME))?;
    resolve_config(stock_defaults_value()?, overlay)
}

/// Load an explicitly named config file, which must exist.
pub fn load_config_file(path: &Path) -> Result<WorldsheetConfig, ConfigError> {
    let overlay =
        load_raw_config(path)?.ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `worldsheet.toml` with all keys.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Worldsheet Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Project storage
# ---------------------------------------------------------------------------
[storage]
# Directory holding one folder per project. Overridden by --storage.
root = "projects"

# Directory with the shared theme assets (backgrounds/, textures/, banners/,
# ornaments/, icons/). Files a theme needs are copied into each project.
asset_library = "assets"

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Artifact file name inside the project folder.
file_name = "index.html"

# Copy the previous artifact to <file_name>.bak before overwriting it.
backup = true

# Read the saved artifact back and check its snapshot. On mismatch, restore
# the backup, regenerate and write once more before reporting an error.
verify = true

# ---------------------------------------------------------------------------
# Generated icons
# ---------------------------------------------------------------------------
[icons]
# Edge length of saved square icons in pixels (16-1024).
size = 128
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = WorldsheetConfig::default();
        assert_eq!(config.storage.root, PathBuf::from("projects"));
        assert_eq!(config.storage.asset_library, PathBuf::from("assets"));
        assert_eq!(config.export.file_name, "index.html");
        assert!(config.export.backup);
        assert!(config.export.verify);
        assert_eq!(config.icons.size, 128);
    }

    #[test]
    fn parse_partial_config() {
        let config: WorldsheetConfig = toml::from_str("[export]\nbackup = false\n").unwrap();
        assert!(!config.export.backup);
        assert!(config.export.verify);
        assert_eq!(config.icons.size, 128);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, WorldsheetConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[storage]
root = "worlds"

[icons]
size = 64
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.storage.root, PathBuf::from("worlds"));
        assert_eq!(config.icons.size, 64);
        // Unspecified values should be defaults
        assert_eq!(config.storage.asset_library, PathBuf::from("assets"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_requires_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        assert!(matches!(load_config_file(&path), Err(ConfigError::NotFound(_))));

        fs::write(&path, "[export]\nfile_name = \"world.html\"\n").unwrap();
        assert_eq!(load_config_file(&path).unwrap().export.file_name, "world.html");
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[export]
backup = true
verify = true
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[export]\nverify = false\n").unwrap();
        let merged = merge_toml(base, overlay);
        let export = merged.get("export").unwrap();
        assert_eq!(export.get("verify").unwrap().as_bool(), Some(false));
        assert_eq!(export.get("backup").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("size = 128").unwrap();
        let overlay: toml::Value = toml::from_str("size = 64").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("size").unwrap().as_integer(), Some(64));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<WorldsheetConfig, _> = toml::from_str("[export]\nfilename = \"x\"\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<WorldsheetConfig, _> = toml::from_str("[exports]\nbackup = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_icon_size_bounds() {
        let base = stock_defaults_value().unwrap();
        for (size, ok) in [(15, false), (16, true), (1024, true), (1025, false)] {
            let overlay: toml::Value = toml::from_str(&format!("[icons]\nsize = {size}\n")).unwrap();
            let result = resolve_config(base.clone(), Some(overlay));
            assert_eq!(result.is_ok(), ok, "size {size}");
        }
    }

    #[test]
    fn validate_rejects_path_like_file_name() {
        let mut config = WorldsheetConfig::default();
        config.export.file_name = "../index.html".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.export.file_name = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: WorldsheetConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, WorldsheetConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[storage]"));
        assert!(content.contains("[export]"));
        assert!(content.contains("[icons]"));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        assert!(val.get("storage").is_some());
        assert!(val.get("export").is_some());
        assert!(val.get("icons").is_some());
    }
}
