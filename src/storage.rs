//! Project storage.
//!
//! The core never touches the filesystem directly: loading, saving and asset
//! handling go through the [`ProjectStorage`] trait. [`FsStorage`] is the
//! on-disk implementation used by the CLI:
//!
//! ```text
//! projects/                     ← storage root
//! └── sunken-coast/             ← one folder per project
//!     ├── index.html            ← the artifact
//!     ├── index.html.bak        ← previous artifact (unless skip_backup)
//!     ├── assets/               ← theme assets copied from the asset library
//!     │   └── backgrounds/parchment.jpg
//!     └── icons/
//!         └── factions/
//!             └── tide-guild.png
//! ```
//!
//! Every call is a single synchronous request; callers do not overlap
//! requests against the same project.

use crate::assets::{ASSETS_DIR, AssetCopy};
use crate::naming::slugify;
use image::ImageFormat;
use image::imageops::FilterType;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Subfolder of a project holding generated icons.
pub const ICONS_DIR: &str = "icons";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("invalid {kind} name `{name}`")]
    InvalidName { kind: &'static str, name: String },
    #[error("`{file}` not found in project `{project}`")]
    NotFound { project: String, file: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to list projects: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("icon image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Flags for [`ProjectStorage::save_artifact`].
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Do not copy the previous artifact to `<file>.bak` first.
    pub skip_backup: bool,
    /// Theme assets to copy next to the artifact.
    pub assets: Vec<AssetCopy>,
}

/// What a save did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReceipt {
    pub path: PathBuf,
    pub backed_up: bool,
    pub copied_assets: Vec<PathBuf>,
    /// Assets missing from the library. The artifact still renders; those
    /// images just fail to load.
    pub missing_assets: Vec<PathBuf>,
}

/// The storage collaborator the editing session talks to.
pub trait ProjectStorage {
    /// Project names, sorted.
    fn list_projects(&self) -> Result<Vec<String>, StorageError>;

    /// The stored artifact text.
    fn load_project(&self, project: &str, file_name: &str) -> Result<String, StorageError>;

    fn save_artifact(
        &self,
        project: &str,
        file_name: &str,
        artifact: &str,
        options: &SaveOptions,
    ) -> Result<SaveReceipt, StorageError>;

    /// Put the last backup back in place. `Ok(false)` when there is none.
    fn restore_backup(&self, project: &str, file_name: &str) -> Result<bool, StorageError>;

    /// Create the project's assets folder if needed and return its path.
    fn ensure_assets_folder(&self, project: &str) -> Result<PathBuf, StorageError>;

    /// Store a generated icon for one entity and return where it went.
    fn save_icon(
        &self,
        project: &str,
        category: &str,
        item_id: &str,
        image: &[u8],
    ) -> Result<PathBuf, StorageError>;
}

/// Backup file name for an artifact.
pub fn backup_name(file_name: &str) -> String {
    format!("{file_name}.bak")
}

/// Reject names that could escape the project folder.
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), StorageError> {
    let bad = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(StorageError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Filesystem-backed storage.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    asset_library: PathBuf,
    icon_size: u32,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, asset_library: impl Into<PathBuf>, icon_size: u32) -> Self {
        Self {
            root: root.into(),
            asset_library: asset_library.into(),
            icon_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_dir(&self, project: &str) -> Result<PathBuf, StorageError> {
        validate_name("project", project)?;
        Ok(self.root.join(project))
    }

    fn artifact_path(&self, project: &str, file_name: &str) -> Result<PathBuf, StorageError> {
        validate_name("file", file_name)?;
        Ok(self.project_dir(project)?.join(file_name))
    }

    fn copy_assets(
        &self,
        project_dir: &Path,
        assets: &[AssetCopy],
        receipt: &mut SaveReceipt,
    ) -> Result<(), StorageError> {
        for asset in assets {
            let source = self.asset_library.join(&asset.source);
            if !source.is_file() {
                log::warn!("theme asset {} not found in library", source.display());
                receipt.missing_assets.push(asset.source.clone());
                continue;
            }
            let destination = project_dir.join(&asset.destination);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&source, &destination)?;
            receipt.copied_assets.push(asset.destination.clone());
        }
        Ok(())
    }
}

impl ProjectStorage for FsStorage {
    fn list_projects(&self) -> Result<Vec<String>, StorageError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut projects = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.starts_with('.') {
                projects.push(name.into_owned());
            }
        }
        projects.sort();
        Ok(projects)
    }

    fn load_project(&self, project: &str, file_name: &str) -> Result<String, StorageError> {
        let path = self.artifact_path(project, file_name)?;
        fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound {
                project: project.to_string(),
                file: file_name.to_string(),
            },
            _ => StorageError::Io(err),
        })
    }

    fn save_artifact(
        &self,
        project: &str,
        file_name: &str,
        artifact: &str,
        options: &SaveOptions,
    ) -> Result<SaveReceipt, StorageError> {
        let path = self.artifact_path(project, file_name)?;
        let project_dir = self.project_dir(project)?;
        fs::create_dir_all(&project_dir)?;

        let mut receipt = SaveReceipt {
            path: path.clone(),
            ..Default::default()
        };
        if !options.skip_backup && path.is_file() {
            fs::copy(&path, project_dir.join(backup_name(file_name)))?;
            receipt.backed_up = true;
        }
        fs::write(&path, artifact)?;
        log::debug!("wrote {} ({} bytes)", path.display(), artifact.len());

        if !options.assets.is_empty() {
            self.ensure_assets_folder(project)?;
            self.copy_assets(&project_dir, &options.assets, &mut receipt)?;
        }
        Ok(receipt)
    }

    fn restore_backup(&self, project: &str, file_name: &str) -> Result<bool, StorageError> {
        let path = self.artifact_path(project, file_name)?;
        let backup = self.project_dir(project)?.join(backup_name(file_name));
        if !backup.is_file() {
            return Ok(false);
        }
        fs::copy(&backup, &path)?;
        log::debug!("restored {} from backup", path.display());
        Ok(true)
    }

    fn ensure_assets_folder(&self, project: &str) -> Result<PathBuf, StorageError> {
        let dir = self.project_dir(project)?.join(ASSETS_DIR);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn save_icon(
        &self,
        project: &str,
        category: &str,
        item_id: &str,
        image: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let category_slug = slugify(category);
        let item_slug = slugify(item_id);
        if category_slug.is_empty() {
            return Err(StorageError::InvalidName {
                kind: "icon category",
                name: category.to_string(),
            });
        }
        if item_slug.is_empty() {
            return Err(StorageError::InvalidName {
                kind: "icon item",
                name: item_id.to_string(),
            });
        }

        let dir = self
            .project_dir(project)?
            .join(ICONS_DIR)
            .join(&category_slug);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{item_slug}.png"));

        let icon = image::load_from_memory(image)?.resize_to_fill(
            self.icon_size,
            self.icon_size,
            FilterType::Lanczos3,
        );
        icon.save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn storage(tmp: &TempDir) -> FsStorage {
        FsStorage::new(tmp.path().join("projects"), tmp.path().join("library"), 32)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 80, 20, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn list_projects_on_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(storage(&tmp).list_projects().unwrap().is_empty());
    }

    #[test]
    fn list_projects_sorted_dirs_only() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("projects");
        fs::create_dir_all(root.join("zeta")).unwrap();
        fs::create_dir_all(root.join("alpha")).unwrap();
        fs::create_dir_all(root.join(".trash")).unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        assert_eq!(storage(&tmp).list_projects().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let s = storage(&tmp);
        let receipt = s
            .save_artifact("coast", "index.html", "<p>v1</p>", &SaveOptions::default())
            .unwrap();
        assert!(!receipt.backed_up);
        assert_eq!(s.load_project("coast", "index.html").unwrap(), "<p>v1</p>");
    }

    #[test]
    fn second_save_backs_up_unless_skipped() {
        let tmp = TempDir::new().unwrap();
        let s = storage(&tmp);
        s.save_artifact("coast", "index.html", "v1", &SaveOptions::default())
            .unwrap();
        let receipt = s
            .save_artifact("coast", "index.html", "v2", &SaveOptions::default())
            .unwrap();
        assert!(receipt.backed_up);
        let backup = tmp.path().join("projects/coast/index.html.bak");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "v1");

        let skip = SaveOptions {
            skip_backup: true,
            ..Default::default()
        };
        let receipt = s.save_artifact("coast", "index.html", "v3", &skip).unwrap();
        assert!(!receipt.backed_up);
        assert_eq!(fs::read_to_string(&backup).unwrap(), "v1");
    }

    #[test]
    fn restore_backup_puts_previous_artifact_back() {
        let tmp = TempDir::new().unwrap();
        let s = storage(&tmp);
        assert!(!s.restore_backup("coast", "index.html").unwrap());
        s.save_artifact("coast", "index.html", "good", &SaveOptions::default())
            .unwrap();
        s.save_artifact("coast", "index.html", "bad", &SaveOptions::default())
            .unwrap();
        assert!(s.restore_backup("coast", "index.html").unwrap());
        assert_eq!(s.load_project("coast", "index.html").unwrap(), "good");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = storage(&tmp).load_project("coast", "index.html").unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn names_cannot_escape_root() {
        let tmp = TempDir::new().unwrap();
        let s = storage(&tmp);
        for name in ["", "..", "../etc", "a/b", ".hidden"] {
            assert!(
                matches!(
                    s.load_project(name, "index.html"),
                    Err(StorageError::InvalidName { .. })
                ),
                "{name:?}"
            );
        }
        assert!(matches!(
            s.save_artifact("coast", "../x.html", "", &SaveOptions::default()),
            Err(StorageError::InvalidName { .. })
        ));
    }

    #[test]
    fn assets_copied_and_missing_reported() {
        let tmp = TempDir::new().unwrap();
        let library = tmp.path().join("library/backgrounds");
        fs::create_dir_all(&library).unwrap();
        fs::write(library.join("parchment.jpg"), "jpeg").unwrap();

        let options = SaveOptions {
            skip_backup: false,
            assets: vec![
                AssetCopy {
                    source: "backgrounds/parchment.jpg".into(),
                    destination: "assets/backgrounds/parchment.jpg".into(),
                },
                AssetCopy {
                    source: "textures/paper-fibers.png".into(),
                    destination: "assets/textures/paper-fibers.png".into(),
                },
            ],
        };
        let receipt = storage(&tmp)
            .save_artifact("coast", "index.html", "x", &options)
            .unwrap();
        assert_eq!(
            receipt.copied_assets,
            vec![PathBuf::from("assets/backgrounds/parchment.jpg")]
        );
        assert_eq!(
            receipt.missing_assets,
            vec![PathBuf::from("textures/paper-fibers.png")]
        );
        assert!(
            tmp.path()
                .join("projects/coast/assets/backgrounds/parchment.jpg")
                .is_file()
        );
    }

    #[test]
    fn ensure_assets_folder_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let s = storage(&tmp);
        let first = s.ensure_assets_folder("coast").unwrap();
        let second = s.ensure_assets_folder("coast").unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn save_icon_resizes_to_square_png() {
        let tmp = TempDir::new().unwrap();
        let path = storage(&tmp)
            .save_icon("coast", "Factions", "Tide Guild", &png_bytes(80, 40))
            .unwrap();
        assert!(path.ends_with("icons/factions/tide-guild.png"));
        let icon = image::open(&path).unwrap();
        assert_eq!((icon.width(), icon.height()), (32, 32));
    }

    #[test]
    fn save_icon_rejects_garbage() {
        let tmp = TempDir::new().unwrap();
        let s = storage(&tmp);
        assert!(matches!(
            s.save_icon("coast", "factions", "guild", b"not an image"),
            Err(StorageError::Image(_))
        ));
        assert!(matches!(
            s.save_icon("coast", "!!!", "guild", &png_bytes(4, 4)),
            Err(StorageError::InvalidName { .. })
        ));
    }
}
