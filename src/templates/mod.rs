//! Custom page templates.
//!
//! A [`PageTemplate`] is a trusted, compiled-in plugin that renders one kind of
//! custom page. Each template declares its own element vocabulary
//! ([`ElementSlot`]s) and cardinality rules (a per-type [`ElementLimit`] and a
//! page-wide `max_elements`). The [`TemplateRegistry`] holds them by id and:
//!
//! - validates a template's shape once, at [`register`](TemplateRegistry::register);
//! - answers [`can_add_element`](TemplateRegistry::can_add_element) for the editor;
//! - dispatches [`render_page`](TemplateRegistry::render_page) inside a failure
//!   boundary, so one broken page becomes a visible placeholder instead of
//!   aborting the whole document;
//! - emits each used template's styles exactly once
//!   ([`render_styles_for`](TemplateRegistry::render_styles_for)).

pub mod standard;

pub use standard::StandardTemplate;

use crate::model::{ContentModel, CustomPage, Element};
use crate::theme::{AppearanceConfig, ColorSet, FontSet, ResolvedTheme};
use maud::{Markup, html};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// How many elements of one type a page may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementLimit {
    Unlimited,
    AtMost(usize),
}

impl ElementLimit {
    /// Whether one more element fits next to `existing` of the same type.
    pub fn allows_another(self, existing: usize) -> bool {
        match self {
            Self::Unlimited => true,
            Self::AtMost(max) => existing < max,
        }
    }
}

impl fmt::Display for ElementLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::AtMost(max) => write!(f, "max {max}"),
        }
    }
}

/// One element type a template accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSlot {
    pub element_type: String,
    pub max: ElementLimit,
    /// Label shown in the editor's "add element" menu.
    pub name: String,
}

impl ElementSlot {
    pub fn new(element_type: impl Into<String>, max: ElementLimit, name: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            max,
            name: name.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("unsupported element type `{0}`")]
    UnsupportedElement(String),
    #[error("element `{element_type}` is missing `{field}`")]
    MissingField {
        element_type: String,
        field: &'static str,
    },
    #[error("{0}")]
    Render(String),
}

/// A custom page layout.
pub trait PageTemplate: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Total elements a page using this template may hold.
    fn max_elements(&self) -> usize;
    fn available_elements(&self) -> &[ElementSlot];
    fn generate_markup(
        &self,
        page: &CustomPage,
        content: &ContentModel,
    ) -> Result<Markup, TemplateError>;
    /// Rules for this template, scoped to `.template-{id}`.
    fn generate_styles(
        &self,
        appearance: &AppearanceConfig,
        colors: &ColorSet,
        fonts: &FontSet,
    ) -> String;

    fn slot(&self, element_type: &str) -> Option<&ElementSlot> {
        self.available_elements()
            .iter()
            .find(|s| s.element_type == element_type)
    }
}

/// Why a template was refused at registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("template id is empty")]
    EmptyId,
    #[error("template id `{0}` has surrounding whitespace")]
    PaddedId(String),
    #[error("template `{0}` has an empty name")]
    EmptyName(String),
    #[error("template name `{name}` is already used by `{owner}`")]
    DuplicateName { name: String, owner: String },
    #[error("template `{0}` declares an element slot with an empty type")]
    EmptyElementType(String),
    #[error("template `{template}` declares element type `{element_type}` twice")]
    DuplicateElementType {
        template: String,
        element_type: String,
    },
}

/// A cardinality rule a page breaks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageViolation {
    #[error("template `{0}` is not registered")]
    UnknownTemplate(String),
    #[error("{count} elements exceed the template maximum of {max}")]
    TooManyElements { count: usize, max: usize },
    #[error("{count} `{element_type}` elements exceed the maximum of {max}")]
    TooManyOfType {
        element_type: String,
        count: usize,
        max: usize,
    },
    #[error("element type `{0}` is not offered by the template")]
    UnknownElementType(String),
}

/// Result of rendering one section.
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    Rendered(Markup),
    Failed { reason: String },
}

impl RenderOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    /// The rendered markup, or the error placeholder for a failure.
    pub fn into_markup(self) -> Markup {
        match self {
            Self::Rendered(markup) => markup,
            Self::Failed { reason } => placeholder(&reason),
        }
    }
}

/// The visible stand-in for a page that could not be rendered.
pub fn placeholder(reason: &str) -> Markup {
    html! {
        div.render-error role="alert" {
            p { "This page could not be displayed." }
            small { (reason) }
        }
    }
}

fn check_shape(template: &dyn PageTemplate) -> Result<(), Rejection> {
    let id = template.id().trim();
    if id.is_empty() {
        return Err(Rejection::EmptyId);
    }
    if id != template.id() {
        return Err(Rejection::PaddedId(template.id().to_string()));
    }
    if template.name().trim().is_empty() {
        return Err(Rejection::EmptyName(id.to_string()));
    }
    let mut seen = BTreeSet::new();
    for slot in template.available_elements() {
        if slot.element_type.trim().is_empty() {
            return Err(Rejection::EmptyElementType(id.to_string()));
        }
        if !seen.insert(slot.element_type.as_str()) {
            return Err(Rejection::DuplicateElementType {
                template: id.to_string(),
                element_type: slot.element_type.clone(),
            });
        }
    }
    Ok(())
}

/// Registered templates by id.
#[derive(Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Box<dyn PageTemplate>>,
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in templates.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(StandardTemplate));
        registry
    }

    /// Check a template's shape against the registry without storing it.
    pub fn validate(&self, template: &dyn PageTemplate) -> Result<(), Rejection> {
        check_shape(template)?;
        let name = template.name().trim();
        let owner = self
            .templates
            .values()
            .find(|t| t.id() != template.id() && t.name().trim() == name);
        if let Some(owner) = owner {
            return Err(Rejection::DuplicateName {
                name: name.to_string(),
                owner: owner.id().to_string(),
            });
        }
        Ok(())
    }

    /// Store a template under its id, replacing any previous one with that id.
    ///
    /// Returns `false` (and logs why) when the template is malformed; the
    /// registry is left untouched in that case.
    pub fn register(&mut self, template: Box<dyn PageTemplate>) -> bool {
        if let Err(rejection) = self.validate(template.as_ref()) {
            log::warn!("rejected page template: {rejection}");
            return false;
        }
        let id = template.id().to_string();
        if self.templates.insert(id.clone(), template).is_some() {
            log::debug!("page template `{id}` replaced");
        }
        true
    }

    pub fn get(&self, id: &str) -> Option<&dyn PageTemplate> {
        self.templates.get(id).map(|t| t.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Whether one more `element_type` element may join `existing` on a page
    /// using `template_id`. Element types the template does not offer are refused.
    pub fn can_add_element(&self, template_id: &str, element_type: &str, existing: &[Element]) -> bool {
        let Some(template) = self.get(template_id) else {
            return false;
        };
        if existing.len() >= template.max_elements() {
            return false;
        }
        let Some(slot) = template.slot(element_type) else {
            return false;
        };
        let same_type = existing
            .iter()
            .filter(|e| e.element_type == element_type)
            .count();
        slot.max.allows_another(same_type)
    }

    /// Every cardinality rule `page` currently breaks.
    pub fn validate_page(&self, page: &CustomPage) -> Vec<PageViolation> {
        let Some(template) = self.get(&page.template) else {
            return vec![PageViolation::UnknownTemplate(page.template.clone())];
        };
        let mut violations = Vec::new();
        if page.elements.len() > template.max_elements() {
            violations.push(PageViolation::TooManyElements {
                count: page.elements.len(),
                max: template.max_elements(),
            });
        }
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for element in &page.elements {
            *counts.entry(element.element_type.as_str()).or_default() += 1;
        }
        for (element_type, count) in counts {
            match template.slot(element_type).map(|s| s.max) {
                None => violations.push(PageViolation::UnknownElementType(element_type.to_string())),
                Some(ElementLimit::AtMost(max)) if count > max => {
                    violations.push(PageViolation::TooManyOfType {
                        element_type: element_type.to_string(),
                        count,
                        max,
                    })
                }
                Some(_) => {}
            }
        }
        violations
    }

    /// Render a custom page through its template.
    ///
    /// An unknown template or a template error yields
    /// [`RenderOutcome::Failed`]; the caller renders the placeholder.
    pub fn render_page(&self, page: &CustomPage, content: &ContentModel) -> RenderOutcome {
        let Some(template) = self.get(&page.template) else {
            log::warn!(
                "custom page `{}` uses unknown template `{}`",
                page.id,
                page.template
            );
            return RenderOutcome::Failed {
                reason: format!("Unknown page template \"{}\".", page.template),
            };
        };
        match template.generate_markup(page, content) {
            Ok(markup) => RenderOutcome::Rendered(markup),
            Err(err) => {
                log::warn!(
                    "template `{}` failed to render page `{}`: {err}",
                    template.id(),
                    page.id
                );
                RenderOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Styles of every template used by `pages`, each emitted once.
    pub fn render_styles_for(&self, pages: &[CustomPage], theme: &ResolvedTheme) -> String {
        let used: BTreeSet<&str> = pages.iter().map(|p| p.template.as_str()).collect();
        used.into_iter()
            .filter_map(|id| self.get(id))
            .map(|t| t.generate_styles(&theme.appearance, &theme.colors, &theme.fonts))
            .filter(|css| !css.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Catalogs, resolve};

    /// Minimal template for exercising the registry.
    struct Sketch {
        id: &'static str,
        name: &'static str,
        slots: Vec<ElementSlot>,
        max: usize,
        fail: bool,
    }

    impl Sketch {
        fn new(id: &'static str, name: &'static str) -> Self {
            Self {
                id,
                name,
                slots: vec![
                    ElementSlot::new("note", ElementLimit::AtMost(2), "Note"),
                    ElementSlot::new("line", ElementLimit::Unlimited, "Line"),
                ],
                max: 4,
                fail: false,
            }
        }
    }

    impl PageTemplate for Sketch {
        fn id(&self) -> &str {
            self.id
        }
        fn name(&self) -> &str {
            self.name
        }
        fn max_elements(&self) -> usize {
            self.max
        }
        fn available_elements(&self) -> &[ElementSlot] {
            &self.slots
        }
        fn generate_markup(&self, page: &CustomPage, _: &ContentModel) -> Result<Markup, TemplateError> {
            if self.fail {
                return Err(TemplateError::Render("sketch exploded".into()));
            }
            Ok(html! { p.sketch { (self.name) ": " (page.name) } })
        }
        fn generate_styles(&self, _: &AppearanceConfig, colors: &ColorSet, _: &FontSet) -> String {
            format!(".template-{} {{ color: {}; }}", self.id, colors.text)
        }
    }

    fn page(template: &str, types: &[&str]) -> CustomPage {
        CustomPage {
            id: "p".into(),
            name: "Page".into(),
            template: template.into(),
            elements: types
                .iter()
                .enumerate()
                .map(|(i, t)| Element::new(*t, i as i64))
                .collect(),
        }
    }

    #[test]
    fn register_rejects_empty_id_and_name() {
        let mut registry = TemplateRegistry::new();
        assert!(!registry.register(Box::new(Sketch::new("", "Nameless id"))));
        assert!(!registry.register(Box::new(Sketch::new("sketch", "  "))));
        assert!(registry.is_empty());
    }

    #[test]
    fn register_rejects_padded_id() {
        let mut registry = TemplateRegistry::with_builtin();
        let padded = Sketch::new(" standard", "Padded standard");
        assert_eq!(
            registry.validate(&padded),
            Err(Rejection::PaddedId(" standard".into()))
        );
        assert!(!registry.register(Box::new(padded)));
        assert!(!registry.register(Box::new(Sketch::new("sketch\t", "Tabbed"))));
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["standard"]);
    }

    #[test]
    fn register_rejects_duplicate_slot_types() {
        let mut sketch = Sketch::new("sketch", "Sketch");
        sketch
            .slots
            .push(ElementSlot::new("note", ElementLimit::Unlimited, "Again"));
        let registry = TemplateRegistry::new();
        assert!(matches!(
            registry.validate(&sketch),
            Err(Rejection::DuplicateElementType { .. })
        ));
    }

    #[test]
    fn register_rejects_name_taken_by_other_id() {
        let mut registry = TemplateRegistry::new();
        assert!(registry.register(Box::new(Sketch::new("a", "Shared"))));
        assert!(!registry.register(Box::new(Sketch::new("b", "Shared"))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistering_same_id_overwrites() {
        let mut registry = TemplateRegistry::new();
        assert!(registry.register(Box::new(Sketch::new("sketch", "First"))));
        assert!(registry.register(Box::new(Sketch::new("sketch", "Second"))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("sketch").unwrap().name(), "Second");

        let html = registry
            .render_page(&page("sketch", &[]), &ContentModel::default())
            .into_markup()
            .into_string();
        assert!(html.contains("Second"));
        assert!(!html.contains("First"));
    }

    #[test]
    fn can_add_element_unknown_template() {
        let registry = TemplateRegistry::new();
        assert!(!registry.can_add_element("missing", "note", &[]));
    }

    #[test]
    fn can_add_element_respects_type_limit() {
        let mut registry = TemplateRegistry::new();
        registry.register(Box::new(Sketch::new("sketch", "Sketch")));
        let one = page("sketch", &["note"]);
        let two = page("sketch", &["note", "note"]);
        assert!(registry.can_add_element("sketch", "note", &one.elements));
        assert!(!registry.can_add_element("sketch", "note", &two.elements));
        assert!(registry.can_add_element("sketch", "line", &two.elements));
    }

    #[test]
    fn can_add_element_refuses_undeclared_types() {
        let mut registry = TemplateRegistry::new();
        registry.register(Box::new(Sketch::new("sketch", "Sketch")));
        assert!(!registry.can_add_element("sketch", "video", &[]));
    }

    #[test]
    fn can_add_element_never_exceeds_page_maximum() {
        let mut registry = TemplateRegistry::new();
        registry.register(Box::new(Sketch::new("sketch", "Sketch")));
        let full = page("sketch", &["line", "line", "line", "line"]);
        for element_type in ["line", "note", "video"] {
            assert!(!registry.can_add_element("sketch", element_type, &full.elements));
        }
    }

    #[test]
    fn unlimited_slot_only_bounded_by_page_maximum() {
        let mut registry = TemplateRegistry::new();
        registry.register(Box::new(Sketch::new("sketch", "Sketch")));
        let three = page("sketch", &["line", "line", "line"]);
        assert!(registry.can_add_element("sketch", "line", &three.elements));
    }

    #[test]
    fn validate_page_reports_every_violation() {
        let mut registry = TemplateRegistry::new();
        registry.register(Box::new(Sketch::new("sketch", "Sketch")));
        let bad = page("sketch", &["note", "note", "note", "video", "line"]);
        let violations = registry.validate_page(&bad);
        assert!(violations.contains(&PageViolation::TooManyElements { count: 5, max: 4 }));
        assert!(violations.contains(&PageViolation::TooManyOfType {
            element_type: "note".into(),
            count: 3,
            max: 2
        }));
        assert!(violations.contains(&PageViolation::UnknownElementType("video".into())));
    }

    #[test]
    fn validate_page_unknown_template() {
        let registry = TemplateRegistry::new();
        assert_eq!(
            registry.validate_page(&page("ghost", &[])),
            vec![PageViolation::UnknownTemplate("ghost".into())]
        );
    }

    #[test]
    fn render_page_unknown_template_is_placeholder() {
        let registry = TemplateRegistry::new();
        let outcome = registry.render_page(&page("ghost", &[]), &ContentModel::default());
        assert!(!outcome.is_rendered());
        let html = outcome.into_markup().into_string();
        assert!(html.contains("render-error"));
        assert!(html.contains("ghost"));
    }

    #[test]
    fn render_page_template_error_is_placeholder() {
        let mut registry = TemplateRegistry::new();
        let mut sketch = Sketch::new("sketch", "Sketch");
        sketch.fail = true;
        registry.register(Box::new(sketch));
        let outcome = registry.render_page(&page("sketch", &[]), &ContentModel::default());
        let html = outcome.into_markup().into_string();
        assert!(html.contains("render-error"));
        assert!(html.contains("sketch exploded"));
    }

    #[test]
    fn styles_emitted_once_per_used_template() {
        let mut registry = TemplateRegistry::new();
        registry.register(Box::new(Sketch::new("sketch", "Sketch")));
        registry.register(Box::new(Sketch::new("unused", "Unused")));
        let theme = resolve(&AppearanceConfig::default(), &Catalogs::builtin());
        let pages = vec![page("sketch", &[]), page("sketch", &[]), page("ghost", &[])];
        let css = registry.render_styles_for(&pages, &theme);
        assert_eq!(css.matches(".template-sketch").count(), 1);
        assert!(!css.contains(".template-unused"));
    }

    #[test]
    fn builtin_registry_has_standard_template() {
        let registry = TemplateRegistry::with_builtin();
        assert!(registry.get("standard").is_some());
    }
}
