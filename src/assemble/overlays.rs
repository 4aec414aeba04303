//! Overlay structures outside `main`: the shared image viewer and one detail
//! panel per visible character and world item. Sections link to panels by id
//! (see [`panel_ids`](crate::naming::panel_ids)).

use super::sections::{non_blank, tag_list};
use crate::markdown;
use crate::model::{Character, ContentModel, Entity, InfoField, WorldItem};
use maud::{Markup, html};

pub(super) fn image_viewer() -> Markup {
    html! {
        div.image-viewer id="image-viewer" hidden role="dialog" aria-modal="true" {
            button.viewer-close type="button" aria-label="Close" { "×" }
            button.viewer-prev type="button" aria-label="Previous image" { "‹" }
            img.viewer-image alt="";
            button.viewer-next type="button" aria-label="Next image" { "›" }
            p.viewer-caption {}
        }
    }
}

pub(super) fn detail_panels(content: &ContentModel) -> Markup {
    let character_ids = content.character_panel_ids();
    let world_ids = content.world_panel_ids();
    html! {
        @for (id, character) in character_ids.iter().zip(&content.characters) {
            @if character.is_visible() {
                (character_panel(id, character))
            }
        }
        @for (id, item) in world_ids.iter().zip(&content.world_items) {
            @if item.is_visible() {
                (world_panel(id, item))
            }
        }
    }
}

fn panel(id: &str, title: &str, body: Markup) -> Markup {
    html! {
        aside.detail-panel id=(id) hidden aria-label=(title) {
            a.panel-close href="#" aria-label="Close" { "×" }
            h2 { (title) }
            (body)
        }
    }
}

fn character_panel(id: &str, character: &Character) -> Markup {
    let images: Vec<&str> = non_blank(character.image.as_deref())
        .into_iter()
        .chain(character.gallery.iter().map(String::as_str))
        .filter(|src| !src.trim().is_empty())
        .collect();

    let body = html! {
        @if !character.role.trim().is_empty() {
            p.role { (character.role) }
        }
        @if !images.is_empty() {
            div.gallery data-gallery {
                @for (i, src) in images.iter().enumerate() {
                    img src=(src) alt=(character.name) loading="lazy" data-viewer class=[(i == 0).then_some("current")];
                }
            }
        }
        (info_fields(&character.details))
        (markdown::render(&character.description))
        (tag_list(&character.tags))
    };
    panel(id, &character.name, body)
}

fn world_panel(id: &str, item: &WorldItem) -> Markup {
    let body = html! {
        @if !item.category.trim().is_empty() {
            p.category { (item.category) }
        }
        @if let Some(src) = non_blank(item.image.as_deref()) {
            img.panel-image src=(src) alt=(item.name) loading="lazy" data-viewer;
        }
        (markdown::render(&item.description))
        (tag_list(&item.tags))
    };
    panel(id, &item.name, body)
}

/// Label/value pairs, laid out by the `infoDisplay` style.
fn info_fields(fields: &[InfoField]) -> Markup {
    let fields: Vec<&InfoField> = fields
        .iter()
        .filter(|f| !f.label.trim().is_empty() || !f.value.trim().is_empty())
        .collect();
    html! {
        @if !fields.is_empty() {
            dl.info-fields {
                @for field in fields {
                    dt { (field.label) }
                    dd { (field.value) }
                }
            }
        }
    }
}
