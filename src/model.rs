//! The content model a world page is built from.
//!
//! A [`ContentModel`] is the single mutable source of truth for one project:
//! basic info, the appearance selection, every entity family, custom pages and
//! linked references. It is owned by the editing session and handed by
//! reference to the resolver, assembler and codec, which never mutate it.
//!
//! ## Hidden data
//!
//! Every entity family carries a [`Visibility`] (serialized as the `hidden`
//! boolean) and a tag list. Tags starting with `!` are *hidden tags*. Hidden
//! entities and hidden tags are never removed from the model: they are kept in
//! the embedded snapshot and only suppressed from the rendered page. All
//! families implement [`Entity`], so the assembler filters them with the one
//! shared pass in [`visible`] and [`visible_tags`] instead of per-type checks.
//!
//! ## Wire shape
//!
//! Field names are camelCase to match the snapshot embedded in exported
//! artifacts. Every struct is `#[serde(default)]`, so snapshots written by
//! older versions (missing fields) and newer versions (extra fields) both load.

use crate::naming;
use crate::theme::AppearanceConfig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Prefix that marks a tag as hidden.
pub const HIDDEN_TAG_PREFIX: char = '!';

/// Whether an entity is shown in the rendered page.
///
/// Serialized as a plain boolean (`true` = hidden) so the snapshot keeps the
/// `hidden` flag shape older artifacts use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_hidden(hidden: bool) -> Self {
        if hidden { Self::Hidden } else { Self::Visible }
    }

    pub fn is_hidden(self) -> bool {
        self == Self::Hidden
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_hidden())
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hidden = Option::<bool>::deserialize(deserializer)?.unwrap_or(false);
        Ok(Self::from_hidden(hidden))
    }
}

/// Returns true for tags that must not appear in rendered output.
pub fn is_hidden_tag(tag: &str) -> bool {
    tag.starts_with(HIDDEN_TAG_PREFIX)
}

/// Tags that may be rendered: hidden (`!`-prefixed) and blank tags are skipped.
pub fn visible_tags(tags: &[String]) -> impl Iterator<Item = &str> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && !is_hidden_tag(t))
}

/// Behaviour shared by every entity family.
pub trait Entity {
    fn id(&self) -> &str;
    fn visibility(&self) -> Visibility;
    fn tags(&self) -> &[String];

    fn is_visible(&self) -> bool {
        !self.visibility().is_hidden()
    }
}

/// The one visibility filter used for all entity families.
pub fn visible<T: Entity>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|item| item.is_visible())
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
                fn visibility(&self) -> Visibility {
                    self.visibility
                }
                fn tags(&self) -> &[String] {
                    &self.tags
                }
            }
        )*
    };
}

impl_entity!(
    Character, Storyline, Plan, SubArc, Event, Subevent, Playlist, WorldItem
);

/// The complete project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentModel {
    pub basic: BasicInfo,
    pub appearance: AppearanceConfig,
    pub characters: Vec<Character>,
    pub storylines: Vec<Storyline>,
    pub plans: Vec<Plan>,
    pub playlists: Vec<Playlist>,
    pub world_items: Vec<WorldItem>,
    pub custom_pages: Vec<CustomPage>,
    pub links: Vec<LinkedReference>,
}

impl ContentModel {
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn custom_page(&self, id: &str) -> Option<&CustomPage> {
        self.custom_pages.iter().find(|p| p.id == id)
    }

    pub fn custom_page_mut(&mut self, id: &str) -> Option<&mut CustomPage> {
        self.custom_pages.iter_mut().find(|p| p.id == id)
    }

    /// Detail panel id of every character, indexed like `characters`.
    pub fn character_panel_ids(&self) -> Vec<String> {
        naming::panel_ids("character", self.characters.iter().map(|c| c.id.as_str()))
    }

    /// Detail panel id of every world item, indexed like `world_items`.
    pub fn world_panel_ids(&self) -> Vec<String> {
        naming::panel_ids("world", self.world_items.iter().map(|w| w.id.as_str()))
    }
}

/// Title block, overview text and the per-section opt-out map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicInfo {
    pub title: String,
    pub subtitle: String,
    /// Markdown shown in the overview section.
    pub overview: String,
    pub banner_image: Option<String>,
    pub show_title: bool,
    pub show_subtitle: bool,
    pub show_banner: bool,
    /// Section id → included. A section renders unless explicitly `false`.
    pub included_pages: BTreeMap<String, bool>,
    pub footer: String,
}

impl Default for BasicInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            overview: String::new(),
            banner_image: None,
            show_title: true,
            show_subtitle: true,
            show_banner: true,
            included_pages: BTreeMap::new(),
            footer: String::new(),
        }
    }
}

impl BasicInfo {
    pub fn includes(&self, section: &str) -> bool {
        self.included_pages.get(section).copied().unwrap_or(true)
    }
}

/// A labelled value shown in an entity's info block (e.g. "Age: 34").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: String,
    /// Markdown.
    pub description: String,
    pub image: Option<String>,
    pub gallery: Vec<String>,
    pub details: Vec<InfoField>,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
    /// Internal notes, never rendered.
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Storyline {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Markdown.
    pub body: String,
    /// Ids of the characters involved.
    pub characters: Vec<String>,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub title: String,
    pub description: String,
    pub arcs: Vec<SubArc>,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubArc {
    pub id: String,
    pub title: String,
    pub description: String,
    pub events: Vec<Event>,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-form in-world date ("Third Age, 3019").
    pub when: String,
    pub subevents: Vec<Subevent>,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subevent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover: Option<String>,
    pub tracks: Vec<Track>,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldItem {
    pub id: String,
    pub name: String,
    /// Grouping label ("Places", "Factions"). Empty groups under "General".
    pub category: String,
    /// Markdown.
    pub description: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "hidden")]
    pub visibility: Visibility,
    pub notes: String,
}

/// A link to something outside the page (wiki, map tool, moodboard).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedReference {
    pub title: String,
    pub url: String,
    pub note: String,
}

/// A user-built page rendered by a registered template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomPage {
    pub id: String,
    pub name: String,
    /// Id of the [`PageTemplate`](crate::templates::PageTemplate) that renders this page.
    pub template: String,
    pub elements: Vec<Element>,
}

impl CustomPage {
    /// Elements in render order: ascending `order`, ties kept in insertion order.
    pub fn ordered_elements(&self) -> Vec<&Element> {
        let mut elements: Vec<&Element> = self.elements.iter().collect();
        elements.sort_by_key(|e| e.order);
        elements
    }

    /// Number of elements of a given type.
    pub fn count_of(&self, element_type: &str) -> usize {
        self.elements
            .iter()
            .filter(|e| e.element_type == element_type)
            .count()
    }

    /// The `order` a newly appended element should get. Saturates at
    /// `i64::MAX`; ties still render in insertion order.
    pub fn next_order(&self) -> i64 {
        self.elements
            .iter()
            .map(|e| e.order)
            .max()
            .map_or(0, |m| m.saturating_add(1))
    }
}

/// One content element on a custom page.
///
/// Only `type` and `order` are common; everything else is type-specific and
/// kept verbatim in `fields` so templates can define their own vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub order: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Element {
    pub fn new(element_type: impl Into<String>, order: i64) -> Self {
        Self {
            element_type: element_type.into(),
            order,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// A string field, if present and non-blank.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// A list-of-strings field. Non-string entries are skipped.
    pub fn strings(&self, key: &str) -> Vec<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }
}
