//! Document assembly.
//!
//! Turns a [`ContentModel`] plus a [`ResolvedTheme`] into one self-contained
//! [`Artifact`]: markup, a single stylesheet, the behavior script and the
//! embedded snapshot.
//!
//! ## Page layout
//!
//! ```text
//! body.<one class per style dimension>
//! ├── div.site#top
//! │   ├── header.site-header        title / subtitle / banner
//! │   ├── nav.site-nav              one link per rendered section
//! │   ├── main
//! │   │   ├── section#overview      always present
//! │   │   ├── section#world         built-ins in canonical order,
//! │   │   ├── section#characters    unless opted out in includedPages
//! │   │   ├── ...
//! │   │   └── section#<custom-id>   custom pages, via the template registry
//! │   └── footer.site-footer
//! ├── div#image-viewer              overlays, referenced by id
//! ├── aside.detail-panel ...
//! ├── a.back-to-top
//! ├── script#world-snapshot         the codec envelope
//! └── script                        behavior
//! ```
//!
//! Exactly one section carries `.active`: the one named by the URL fragment if
//! it exists, else the overview ([`initial_section`]).
//!
//! ## Failure isolation
//!
//! Content problems never abort assembly. Missing sub-records render as empty
//! placeholders, and a custom page whose template is unknown or fails becomes
//! a visible placeholder while every other section renders normally. What
//! happened to each section is recorded in the [`AssemblyReport`].

mod overlays;
mod sections;

use crate::codec::{self, EncodeError};
use crate::markdown;
use crate::model::{ContentModel, CustomPage};
use crate::naming;
use crate::templates::{RenderOutcome, TemplateRegistry};
use crate::theme::{ResolvedTheme, StyleDimension};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use thiserror::Error;

const BASE_CSS: &str = include_str!("../../static/base.css");
const BEHAVIOR_JS: &str = include_str!("../../static/behavior.js");

/// Id of the section that is active when no fragment selects another.
pub const OVERVIEW_SECTION: &str = "overview";

/// Built-in sections in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinSection {
    Overview,
    World,
    Characters,
    Storylines,
    Plans,
    Playlists,
}

impl BuiltinSection {
    pub const ALL: [BuiltinSection; 6] = [
        Self::Overview,
        Self::World,
        Self::Characters,
        Self::Storylines,
        Self::Plans,
        Self::Playlists,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Overview => OVERVIEW_SECTION,
            Self::World => "world",
            Self::Characters => "characters",
            Self::Storylines => "storylines",
            Self::Plans => "plans",
            Self::Playlists => "playlists",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::World => "World",
            Self::Characters => "Characters",
            Self::Storylines => "Storylines",
            Self::Plans => "Plans",
            Self::Playlists => "Playlists",
        }
    }

    /// Whether the section renders for this content. The overview always does.
    pub fn is_included(self, content: &ContentModel) -> bool {
        self == Self::Overview || content.basic.includes(self.id())
    }

    fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.id()).collect()
    }
}

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] EncodeError),
}

/// How one section came out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Rendered,
    Placeholder { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub id: String,
    pub title: String,
    pub status: SectionStatus,
}

/// Per-section outcome of one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    pub sections: Vec<SectionReport>,
    pub active_section: String,
}

impl AssemblyReport {
    pub fn placeholders(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections
            .iter()
            .filter(|s| matches!(s.status, SectionStatus::Placeholder { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.placeholders().next().is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// URL fragment (with or without `#`) selecting the initially active section.
    pub fragment: Option<String>,
}

/// The exported document, still in parts.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub title: String,
    pub body_class: String,
    pub markup: Markup,
    pub styles: String,
    pub behavior: String,
    pub snapshot: String,
    pub report: AssemblyReport,
}

impl Artifact {
    /// The complete HTML document.
    pub fn document(&self) -> Markup {
        let content = html! {
            (self.markup)
            (codec::embed(&self.snapshot))
            script { (PreEscaped(&self.behavior)) }
        };
        base_document(&self.title, &self.styles, &self.body_class, content)
    }

    pub fn to_html(&self) -> String {
        self.document().into_string()
    }
}

/// Pick the initially active section: `fragment` if it names a known
/// section, otherwise the overview.
pub fn initial_section(fragment: Option<&str>, known_ids: &[String]) -> String {
    fragment
        .map(|f| f.trim().trim_start_matches('#'))
        .filter(|f| known_ids.iter().any(|id| id == f))
        .unwrap_or(OVERVIEW_SECTION)
        .to_string()
}

/// A fragment naming a custom page by its own id (`Lore Notes`) selects that
/// page's section (`lore-notes`). Section ids take precedence.
fn section_for_fragment<'a>(
    fragment: &'a str,
    content: &ContentModel,
    custom_ids: &'a [String],
    known_ids: &[String],
) -> &'a str {
    let wanted = fragment.trim().trim_start_matches('#');
    if known_ids.iter().any(|id| id == wanted) {
        return wanted;
    }
    content
        .custom_pages
        .iter()
        .zip(custom_ids)
        .find(|(page, _)| page.id.trim() == wanted)
        .map_or(wanted, |(_, id)| id.as_str())
}

pub fn assemble(
    content: &ContentModel,
    theme: &ResolvedTheme,
    registry: &TemplateRegistry,
) -> Result<Artifact, AssembleError> {
    assemble_with(content, theme, registry, &AssembleOptions::default())
}

pub fn assemble_with(
    content: &ContentModel,
    theme: &ResolvedTheme,
    registry: &TemplateRegistry,
    options: &AssembleOptions,
) -> Result<Artifact, AssembleError> {
    let builtins: Vec<BuiltinSection> = BuiltinSection::ALL
        .into_iter()
        .filter(|s| s.is_included(content))
        .collect();

    let custom_ids = naming::custom_page_ids(
        content.custom_pages.iter().map(|p| p.id.as_str()),
        &BuiltinSection::ids(),
    );

    let known_ids: Vec<String> = builtins
        .iter()
        .map(|s| s.id().to_string())
        .chain(custom_ids.iter().cloned())
        .collect();
    let fragment = options
        .fragment
        .as_deref()
        .map(|f| section_for_fragment(f, content, &custom_ids, &known_ids));
    let active = initial_section(fragment, &known_ids);

    let mut report = AssemblyReport {
        sections: Vec::new(),
        active_section: active.clone(),
    };

    let mut nav_entries: Vec<(String, String)> = Vec::new();
    let mut rendered: Vec<Markup> = Vec::new();

    for section in &builtins {
        let body = match section {
            BuiltinSection::Overview => sections::overview(content),
            BuiltinSection::World => sections::world(content),
            BuiltinSection::Characters => sections::characters(content),
            BuiltinSection::Storylines => sections::storylines(content),
            BuiltinSection::Plans => sections::plans(content),
            BuiltinSection::Playlists => sections::playlists(content),
        };
        rendered.push(section_shell(section.id(), section.title(), &active, None, body));
        nav_entries.push((section.id().to_string(), section.title().to_string()));
        report.sections.push(SectionReport {
            id: section.id().to_string(),
            title: section.title().to_string(),
            status: SectionStatus::Rendered,
        });
    }

    for (page, id) in content.custom_pages.iter().zip(&custom_ids) {
        for violation in registry.validate_page(page) {
            log::warn!("custom page `{}`: {violation}", page.id);
        }
        let title = if page.name.trim().is_empty() {
            id.clone()
        } else {
            page.name.clone()
        };
        let outcome = registry.render_page(page, content);
        let status = match &outcome {
            RenderOutcome::Rendered(_) => SectionStatus::Rendered,
            RenderOutcome::Failed { reason } => SectionStatus::Placeholder {
                reason: reason.clone(),
            },
        };
        rendered.push(section_shell(
            id,
            &title,
            &active,
            Some(page),
            outcome.into_markup(),
        ));
        nav_entries.push((id.clone(), title.clone()));
        report.sections.push(SectionReport {
            id: id.clone(),
            title,
            status,
        });
    }

    let markup = html! {
        div.site id="top" {
            (site_header(content))
            (site_nav(&nav_entries, &active))
            main {
                @for section in &rendered {
                    (section)
                }
            }
            (site_footer(content))
        }
        (overlays::image_viewer())
        (overlays::detail_panels(content))
        (back_to_top(theme))
    };

    let styles = [
        BASE_CSS.trim().to_string(),
        theme.stylesheet(),
        registry.render_styles_for(&content.custom_pages, theme),
    ]
    .into_iter()
    .filter(|css| !css.trim().is_empty())
    .collect::<Vec<_>>()
    .join("\n\n");

    let snapshot = codec::encode(content, theme)?;

    let title = content.basic.title.trim();
    Ok(Artifact {
        title: if title.is_empty() {
            "Untitled world".to_string()
        } else {
            title.to_string()
        },
        body_class: theme.body_classes(),
        markup,
        styles,
        behavior: BEHAVIOR_JS.to_string(),
        snapshot,
        report,
    })
}

fn base_document(title: &str, css: &str, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content={ "worldsheet " (env!("CARGO_PKG_VERSION")) };
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

fn section_shell(
    id: &str,
    title: &str,
    active: &str,
    page: Option<&CustomPage>,
    body: Markup,
) -> Markup {
    let template = page.map(|p| p.template.as_str());
    let page_id = page.map(|p| p.id.trim()).filter(|raw| *raw != id);
    html! {
        section.page-section.active[id == active] id=(id) data-template=[template] data-page-id=[page_id] {
            div.section-header {
                h2 { (title) }
            }
            (body)
        }
    }
}

fn site_header(content: &ContentModel) -> Markup {
    let basic = &content.basic;
    let banner = basic
        .banner_image
        .as_deref()
        .filter(|src| basic.show_banner && !src.trim().is_empty());
    let title = Some(basic.title.trim()).filter(|t| basic.show_title && !t.is_empty());
    let subtitle = Some(basic.subtitle.trim()).filter(|s| basic.show_subtitle && !s.is_empty());

    html! {
        header.site-header {
            @if let Some(src) = banner {
                div.banner {
                    img src=(src) alt="";
                }
            }
            @if let Some(title) = title {
                h1.site-title { (title) }
            }
            @if let Some(subtitle) = subtitle {
                p.site-subtitle { (subtitle) }
            }
        }
    }
}

fn site_nav(entries: &[(String, String)], active: &str) -> Markup {
    html! {
        nav.site-nav {
            @for (id, title) in entries {
                a.nav-link.active[id == active] href={ "#" (id) } data-section=(id) {
                    (title)
                }
            }
        }
    }
}

fn site_footer(content: &ContentModel) -> Markup {
    html! {
        @if !content.basic.footer.trim().is_empty() {
            footer.site-footer {
                (markdown::render(&content.basic.footer))
            }
        }
    }
}

fn back_to_top(theme: &ResolvedTheme) -> Markup {
    html! {
        @if theme.key(StyleDimension::BackToTop) != "none" {
            a.back-to-top href="#top" aria-label="Back to top" { "↑" }
        }
    }
}
