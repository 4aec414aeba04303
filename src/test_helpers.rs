//! Shared test utilities.
//!
//! Provides a sample project, lookup helpers that panic with the available
//! ids on a miss, and an in-memory [`ProjectStorage`] whose writes can be made
//! to fail verification.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let content = sample_content();
//! let mira = find_character(&content, "mira");
//! assert_eq!(mira.name, "Mira Vance");
//!
//! let storage = MemoryStorage::default();
//! storage.corrupt_next_writes(1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::codec::SNAPSHOT_ELEMENT_ID;
use crate::model::{
    BasicInfo, Character, ContentModel, CustomPage, Element, Event, InfoField, Plan, Playlist,
    Storyline, SubArc, Subevent, Track, Visibility, WorldItem,
};
use crate::storage::{ProjectStorage, SaveOptions, SaveReceipt, StorageError, backup_name};
use crate::theme::AppearanceConfig;

// =========================================================================
// Sample project
// =========================================================================

/// A small project touching every entity family.
///
/// - `mira`: visible, with image, gallery, details, notes and a `!secret` tag
/// - `oren`: visible, no image
/// - `ghost`: hidden character
/// - `saltmarket` (visible) and `vault` (hidden) world items in "Places"
/// - custom page `lore` on the standard template, orders 0..=2, with the
///   page's only character list
pub fn sample_content() -> ContentModel {
    ContentModel {
        basic: BasicInfo {
            title: "The Sunken Coast".into(),
            subtitle: "A drowned frontier".into(),
            overview: "Tides swallowed the old cities *centuries* ago.".into(),
            banner_image: Some("banner.jpg".into()),
            footer: "Made for the Thursday table".into(),
            ..Default::default()
        },
        appearance: AppearanceConfig::default(),
        characters: vec![
            Character {
                id: "mira".into(),
                name: "Mira Vance".into(),
                role: "Harbor pilot".into(),
                description: "Knows every reef by *feel*.".into(),
                image: Some("mira.png".into()),
                gallery: vec!["mira-docks.png".into()],
                details: vec![InfoField {
                    label: "Age".into(),
                    value: "34".into(),
                }],
                tags: vec!["harbor".into(), "!secret".into()],
                notes: "knows about the vault".into(),
                ..Default::default()
            },
            Character {
                id: "oren".into(),
                name: "Oren Hale".into(),
                role: "Diver".into(),
                tags: vec!["crew".into()],
                ..Default::default()
            },
            Character {
                id: "ghost".into(),
                name: "The Ghost".into(),
                visibility: Visibility::Hidden,
                ..Default::default()
            },
        ],
        storylines: vec![Storyline {
            id: "bell".into(),
            title: "The Drowned Bell".into(),
            summary: "Something rings beneath the bay.".into(),
            body: "Every night at low tide.".into(),
            characters: vec!["mira".into(), "ghost".into()],
            tags: vec!["mystery".into()],
            ..Default::default()
        }],
        plans: vec![Plan {
            id: "season-one".into(),
            title: "Season One".into(),
            description: "The first ten sessions.".into(),
            arcs: vec![SubArc {
                id: "tide".into(),
                title: "The Tide Rises".into(),
                events: vec![Event {
                    id: "flood".into(),
                    title: "The Flood".into(),
                    when: "Spring, year 12".into(),
                    subevents: vec![Subevent {
                        id: "levee".into(),
                        title: "Levee breaks".into(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }],
        playlists: vec![Playlist {
            id: "ambience".into(),
            title: "Harbor Ambience".into(),
            tracks: vec![Track {
                title: "Gulls".into(),
                artist: "Field recording".into(),
                url: Some("https://example.com/gulls".into()),
            }],
            ..Default::default()
        }],
        world_items: vec![
            WorldItem {
                id: "saltmarket".into(),
                name: "Salt Market".into(),
                category: "Places".into(),
                description: "Stalls on stilts.".into(),
                tags: vec!["harbor".into()],
                ..Default::default()
            },
            WorldItem {
                id: "vault".into(),
                name: "Sealed Vault".into(),
                category: "Places".into(),
                visibility: Visibility::Hidden,
                ..Default::default()
            },
        ],
        custom_pages: vec![CustomPage {
            id: "lore".into(),
            name: "Lore".into(),
            template: "standard".into(),
            elements: vec![
                Element::new("heading", 0).with_field("text", "Old songs"),
                Element::new("text", 1).with_field("content", "The bay *remembers*."),
                Element::new("character-list", 2),
            ],
        }],
        links: Vec::new(),
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a character by id. Panics if not found.
pub fn find_character<'a>(content: &'a ContentModel, id: &str) -> &'a Character {
    content.character(id).unwrap_or_else(|| {
        let ids: Vec<&str> = content.characters.iter().map(|c| c.id.as_str()).collect();
        panic!("character '{id}' not found. Available: {ids:?}")
    })
}

/// Find a world item by id. Panics if not found.
pub fn find_world_item<'a>(content: &'a ContentModel, id: &str) -> &'a WorldItem {
    content
        .world_items
        .iter()
        .find(|w| w.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = content.world_items.iter().map(|w| w.id.as_str()).collect();
            panic!("world item '{id}' not found. Available: {ids:?}")
        })
}

// =========================================================================
// In-memory storage
// =========================================================================

/// [`ProjectStorage`] over a map, counting writes.
///
/// After [`corrupt_next_writes(n)`](MemoryStorage::corrupt_next_writes) the
/// next `n` artifact writes lose their snapshot marker, so they no longer
/// decode.
#[derive(Default)]
pub struct MemoryStorage {
    files: RefCell<BTreeMap<(String, String), String>>,
    corrupt: Cell<usize>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn corrupt_next_writes(&self, n: usize) {
        self.corrupt.set(n);
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn key(project: &str, file: &str) -> (String, String) {
        (project.to_string(), file.to_string())
    }
}

impl ProjectStorage for MemoryStorage {
    fn list_projects(&self) -> Result<Vec<String>, StorageError> {
        let mut projects: Vec<String> = self.files.borrow().keys().map(|(p, _)| p.clone()).collect();
        projects.dedup();
        Ok(projects)
    }

    fn load_project(&self, project: &str, file_name: &str) -> Result<String, StorageError> {
        self.files
            .borrow()
            .get(&Self::key(project, file_name))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                project: project.to_string(),
                file: file_name.to_string(),
            })
    }

    fn save_artifact(
        &self,
        project: &str,
        file_name: &str,
        artifact: &str,
        options: &SaveOptions,
    ) -> Result<SaveReceipt, StorageError> {
        let mut files = self.files.borrow_mut();
        let key = Self::key(project, file_name);
        let mut backed_up = false;
        if !options.skip_backup {
            if let Some(previous) = files.get(&key).cloned() {
                files.insert(Self::key(project, &backup_name(file_name)), previous);
                backed_up = true;
            }
        }

        let text = if self.corrupt.get() > 0 {
            self.corrupt.set(self.corrupt.get() - 1);
            artifact.replace(SNAPSHOT_ELEMENT_ID, "lost-snapshot")
        } else {
            artifact.to_string()
        };
        files.insert(key, text);
        self.writes.set(self.writes.get() + 1);

        Ok(SaveReceipt {
            path: PathBuf::from(project).join(file_name),
            backed_up,
            copied_assets: options.assets.iter().map(|a| a.destination.clone()).collect(),
            missing_assets: Vec::new(),
        })
    }

    fn restore_backup(&self, project: &str, file_name: &str) -> Result<bool, StorageError> {
        let mut files = self.files.borrow_mut();
        match files.get(&Self::key(project, &backup_name(file_name))).cloned() {
            Some(backup) => {
                files.insert(Self::key(project, file_name), backup);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ensure_assets_folder(&self, project: &str) -> Result<PathBuf, StorageError> {
        Ok(PathBuf::from(project).join("assets"))
    }

    fn save_icon(
        &self,
        project: &str,
        category: &str,
        item_id: &str,
        _image: &[u8],
    ) -> Result<PathBuf, StorageError> {
        Ok(PathBuf::from(project)
            .join("icons")
            .join(category)
            .join(format!("{item_id}.png")))
    }
}
