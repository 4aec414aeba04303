//! Built-in section bodies.
//!
//! Every list here goes through [`visible`] and every tag list through
//! [`visible_tags`]; notes are never read.

use crate::markdown;
use crate::model::{
    Character, ContentModel, Entity, Event, Plan, Playlist, Storyline, WorldItem, visible,
    visible_tags,
};
use maud::{Markup, html};

const GENERAL_CATEGORY: &str = "General";

pub(super) fn overview(content: &ContentModel) -> Markup {
    let links: Vec<_> = content
        .links
        .iter()
        .filter(|l| !l.url.trim().is_empty())
        .collect();
    html! {
        div.overview-body {
            (markdown::render(&content.basic.overview))
        }
        @if !links.is_empty() {
            div.content-container.linked-references {
                h3 { "Links" }
                ul {
                    @for link in links {
                        li {
                            a href=(link.url) target="_blank" rel="noopener" {
                                @if link.title.trim().is_empty() { (link.url) } @else { (link.title) }
                            }
                            @if !link.note.trim().is_empty() {
                                " "
                                small.link-note { (link.note) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub(super) fn world(content: &ContentModel) -> Markup {
    let panel_ids = content.world_panel_ids();
    // Categories in order of first appearance.
    let mut groups: Vec<(&str, Vec<(usize, &WorldItem)>)> = Vec::new();
    for (index, item) in content.world_items.iter().enumerate() {
        if !item.is_visible() {
            continue;
        }
        let category = match item.category.trim() {
            "" => GENERAL_CATEGORY,
            c => c,
        };
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, items)) => items.push((index, item)),
            None => groups.push((category, vec![(index, item)])),
        }
    }

    html! {
        @if groups.is_empty() {
            p.empty-state { "Nothing recorded about this world yet." }
        } @else {
            (filter_bar("world"))
            @for (category, items) in &groups {
                div.content-container.collapsible {
                    button.collapsible-toggle type="button" aria-expanded="true" {
                        (category)
                    }
                    div.collapsible-body.card-grid {
                        @for (index, item) in items {
                            (world_card(&panel_ids[*index], item))
                        }
                    }
                }
            }
        }
    }
}

fn world_card(panel_id: &str, item: &WorldItem) -> Markup {
    html! {
        article.entity-card data-tags=(tag_data(&item.tags)) {
            @if let Some(src) = non_blank(item.image.as_deref()) {
                img.card-image src=(src) alt=(item.name) loading="lazy" data-viewer;
            }
            h3 { (item.name) }
            (tag_list(&item.tags))
            a.panel-link href={ "#" (panel_id) } { "Details" }
        }
    }
}

pub(super) fn characters(content: &ContentModel) -> Markup {
    let panel_ids = content.character_panel_ids();
    let cards: Vec<(usize, &Character)> = content
        .characters
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_visible())
        .collect();

    html! {
        @if cards.is_empty() {
            p.empty-state { "No characters yet." }
        } @else {
            (filter_bar("characters"))
            div.card-grid {
                @for (index, character) in cards {
                    article.entity-card data-tags=(tag_data(&character.tags)) {
                        @match non_blank(character.image.as_deref()) {
                            Some(src) => {
                                img.card-image src=(src) alt=(character.name) loading="lazy" data-viewer;
                            }
                            None => div.image-placeholder aria-hidden="true" {}
                        }
                        h3 { (character.name) }
                        @if !character.role.trim().is_empty() {
                            p.role { (character.role) }
                        }
                        (tag_list(&character.tags))
                        a.panel-link href={ "#" (panel_ids[index]) } {
                            "Details"
                        }
                    }
                }
            }
        }
    }
}

pub(super) fn storylines(content: &ContentModel) -> Markup {
    let storylines: Vec<&Storyline> = visible(&content.storylines).collect();
    html! {
        @if storylines.is_empty() {
            p.empty-state { "No storylines yet." }
        } @else {
            (filter_bar("storylines"))
            @for storyline in storylines {
                article.content-container.collapsible data-tags=(tag_data(&storyline.tags)) {
                    button.collapsible-toggle type="button" aria-expanded="true" {
                        (storyline.title)
                    }
                    div.collapsible-body {
                        @if !storyline.summary.trim().is_empty() {
                            p.summary { (storyline.summary) }
                        }
                        (markdown::render(&storyline.body))
                        (cast(content, &storyline.characters))
                        (tag_list(&storyline.tags))
                    }
                }
            }
        }
    }
}

/// Linked names of the visible characters a storyline involves.
/// Unknown and hidden ids are dropped.
fn cast(content: &ContentModel, ids: &[String]) -> Markup {
    let panel_ids = content.character_panel_ids();
    let involved: Vec<(usize, &Character)> = ids
        .iter()
        .filter_map(|id| content.characters.iter().enumerate().find(|(_, c)| &c.id == id))
        .filter(|(_, c)| c.is_visible())
        .collect();
    html! {
        @if !involved.is_empty() {
            div.sub-container.cast {
                span.label { "Characters: " }
                @for (i, (index, character)) in involved.iter().enumerate() {
                    @if i > 0 { ", " }
                    a.panel-link href={ "#" (panel_ids[*index]) } {
                        (character.name)
                    }
                }
            }
        }
    }
}

pub(super) fn plans(content: &ContentModel) -> Markup {
    let plans: Vec<&Plan> = visible(&content.plans).collect();
    html! {
        @if plans.is_empty() {
            p.empty-state { "No plans yet." }
        } @else {
            @for plan in plans {
                article.content-container.collapsible data-tags=(tag_data(&plan.tags)) {
                    button.collapsible-toggle type="button" aria-expanded="true" {
                        (plan.title)
                    }
                    div.collapsible-body {
                        (markdown::render(&plan.description))
                        (tag_list(&plan.tags))
                        @for arc in visible(&plan.arcs) {
                            div.sub-container.arc {
                                h4 { (arc.title) }
                                (markdown::render(&arc.description))
                                @let events: Vec<&Event> = visible(&arc.events).collect();
                                @if !events.is_empty() {
                                    ol.timeline {
                                        @for event in events {
                                            (timeline_event(event))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn timeline_event(event: &Event) -> Markup {
    html! {
        li.timeline-event data-tags=(tag_data(&event.tags)) {
            @if !event.when.trim().is_empty() {
                span.when { (event.when) }
            }
            strong { (event.title) }
            (markdown::render(&event.description))
            @let subevents: Vec<_> = visible(&event.subevents).collect();
            @if !subevents.is_empty() {
                ul.subevents {
                    @for sub in subevents {
                        li {
                            strong { (sub.title) }
                            @if !sub.description.trim().is_empty() {
                                " " (sub.description)
                            }
                        }
                    }
                }
            }
        }
    }
}

pub(super) fn playlists(content: &ContentModel) -> Markup {
    let playlists: Vec<&Playlist> = visible(&content.playlists).collect();
    html! {
        @if playlists.is_empty() {
            p.empty-state { "No playlists yet." }
        } @else {
            div.card-grid {
                @for playlist in playlists {
                    article.content-container.playlist data-tags=(tag_data(&playlist.tags)) {
                        @if let Some(cover) = non_blank(playlist.cover.as_deref()) {
                            img.cover src=(cover) alt=(playlist.title) loading="lazy";
                        }
                        h3 { (playlist.title) }
                        (markdown::render(&playlist.description))
                        @if !playlist.tracks.is_empty() {
                            ol.tracks {
                                @for track in &playlist.tracks {
                                    li {
                                        @match non_blank(track.url.as_deref()) {
                                            Some(url) => a href=(url) target="_blank" rel="noopener" { (track.title) },
                                            None => span { (track.title) },
                                        }
                                        @if !track.artist.trim().is_empty() {
                                            " — " span.artist { (track.artist) }
                                        }
                                    }
                                }
                            }
                        }
                        (tag_list(&playlist.tags))
                    }
                }
            }
        }
    }
}

fn filter_bar(section: &str) -> Markup {
    html! {
        input.filter-input type="search" placeholder="Filter by name or tag" data-filter=(section);
    }
}

/// Rendered tag chips. Hidden tags never appear.
pub(super) fn tag_list(tags: &[String]) -> Markup {
    let shown: Vec<&str> = visible_tags(tags).collect();
    html! {
        @if !shown.is_empty() {
            ul.tag-list {
                @for tag in shown {
                    li.tag { (tag) }
                }
            }
        }
    }
}

/// Lowercased visible tags for the filter script.
fn tag_data(tags: &[String]) -> String {
    visible_tags(tags)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
