//! Style catalogs.
//!
//! For each [`StyleDimension`] the catalog maps a key to a descriptor. Color
//! schemes and font sets carry concrete values ([`ColorSet`], [`FontSet`]);
//! every other dimension carries a [`StyleDescriptor`] whose generator emits
//! the CSS for that choice. Generators scope their rules to the body class
//! `{prefix}-{key}` (see [`StyleDimension::class_prefix`]), so the order in
//! which dimensions are concatenated never matters.
//!
//! [`Catalogs::builtin`] ships a small set per dimension. Catalogs can be
//! extended with the `with_*` builders but never shrunk, which is what lets
//! the resolver promise that each dimension's default key always exists.

use super::StyleDimension;
use std::collections::BTreeMap;
use std::fmt;

/// CSS generator for one catalog entry.
pub type CssGenerator = fn(&StyleContext<'_>) -> String;

/// Concrete values a generator may reference.
pub struct StyleContext<'a> {
    pub colors: &'a ColorSet,
    pub fonts: &'a FontSet,
}

/// `{name, description, cssGenerator}` for one key of a visual dimension.
#[derive(Clone)]
pub struct StyleDescriptor {
    pub name: String,
    pub description: String,
    pub css: CssGenerator,
}

impl StyleDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, css: CssGenerator) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            css,
        }
    }

    pub fn render(&self, ctx: &StyleContext<'_>) -> String {
        (self.css)(ctx)
    }
}

impl fmt::Debug for StyleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Characters that could break out of a declaration or the `<style>` element.
fn is_safe_css_value(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains(['<', '>', '{', '}', ';'])
}

/// The palette every generator draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSet {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
    pub primary: String,
    pub accent: String,
    pub border: String,
    pub link: String,
}

impl Default for ColorSet {
    fn default() -> Self {
        Self {
            background: "#f7f4ee".to_string(),
            surface: "#ffffff".to_string(),
            text: "#2b2622".to_string(),
            text_muted: "#6f655c".to_string(),
            primary: "#5b3f8c".to_string(),
            accent: "#c58b2c".to_string(),
            border: "#ddd3c4".to_string(),
            link: "#5b3f8c".to_string(),
        }
    }
}

impl ColorSet {
    /// Merge `customColors` over this palette. Keys use the snapshot's camelCase.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) {
        for (key, value) in overrides {
            if !is_safe_css_value(value) {
                log::warn!("ignoring unsafe color override {key}={value:?}");
                continue;
            }
            let slot = match key.as_str() {
                "background" => &mut self.background,
                "surface" => &mut self.surface,
                "text" => &mut self.text,
                "textMuted" => &mut self.text_muted,
                "primary" => &mut self.primary,
                "accent" => &mut self.accent,
                "border" => &mut self.border,
                "link" => &mut self.link,
                other => {
                    log::debug!("ignoring unknown color override '{other}'");
                    continue;
                }
            };
            *slot = value.clone();
        }
    }

    /// CSS custom properties for the palette.
    pub fn to_css(&self) -> String {
        format!(
            r#":root {{
    --color-bg: {background};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-primary: {primary};
    --color-accent: {accent};
    --color-border: {border};
    --color-link: {link};
}}"#,
            background = self.background,
            surface = self.surface,
            text = self.text,
            text_muted = self.text_muted,
            primary = self.primary,
            accent = self.accent,
            border = self.border,
            link = self.link,
        )
    }
}

/// Font stacks for headings, body text and interface chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSet {
    pub heading: String,
    pub body: String,
    pub ui: String,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            heading: "Georgia, \"Times New Roman\", serif".to_string(),
            body: "Georgia, \"Times New Roman\", serif".to_string(),
            ui: "system-ui, -apple-system, \"Segoe UI\", sans-serif".to_string(),
        }
    }
}

impl FontSet {
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) {
        for (key, value) in overrides {
            if !is_safe_css_value(value) {
                log::warn!("ignoring unsafe font override {key}={value:?}");
                continue;
            }
            let slot = match key.as_str() {
                "heading" => &mut self.heading,
                "body" => &mut self.body,
                "ui" => &mut self.ui,
                other => {
                    log::debug!("ignoring unknown font override '{other}'");
                    continue;
                }
            };
            *slot = value.clone();
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            ":root {{\n    --font-heading: {};\n    --font-body: {};\n    --font-ui: {};\n}}",
            self.heading, self.body, self.ui
        )
    }
}

#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub name: String,
    pub description: String,
    pub colors: ColorSet,
}

#[derive(Debug, Clone)]
pub struct FontPairing {
    pub name: String,
    pub description: String,
    pub fonts: FontSet,
}

/// Every dimension's catalog.
#[derive(Debug, Clone)]
pub struct Catalogs {
    color_schemes: BTreeMap<String, ColorScheme>,
    font_sets: BTreeMap<String, FontPairing>,
    styles: BTreeMap<StyleDimension, BTreeMap<String, StyleDescriptor>>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalogs {
    pub fn builtin() -> Self {
        Self {
            color_schemes: builtin_color_schemes(),
            font_sets: builtin_font_sets(),
            styles: builtin_styles(),
        }
    }

    pub fn with_color_scheme(mut self, key: impl Into<String>, scheme: ColorScheme) -> Self {
        self.color_schemes.insert(key.into(), scheme);
        self
    }

    pub fn with_font_set(mut self, key: impl Into<String>, pairing: FontPairing) -> Self {
        self.font_sets.insert(key.into(), pairing);
        self
    }

    /// Add a generator entry. Color scheme and font set entries are added
    /// with their own builders; passing those dimensions here is ignored.
    pub fn with_style(
        mut self,
        dimension: StyleDimension,
        key: impl Into<String>,
        descriptor: StyleDescriptor,
    ) -> Self {
        if dimension.is_visual() {
            self.styles
                .entry(dimension)
                .or_default()
                .insert(key.into(), descriptor);
        } else {
            log::warn!(
                "{} entries carry concrete values, not generators; ignoring",
                dimension.field_name()
            );
        }
        self
    }

    pub fn contains(&self, dimension: StyleDimension, key: &str) -> bool {
        match dimension {
            StyleDimension::ColorScheme => self.color_schemes.contains_key(key),
            StyleDimension::FontSet => self.font_sets.contains_key(key),
            _ => self.style(dimension, key).is_some(),
        }
    }

    /// Keys of one dimension, sorted.
    pub fn keys(&self, dimension: StyleDimension) -> Vec<&str> {
        match dimension {
            StyleDimension::ColorScheme => self.color_schemes.keys().map(String::as_str).collect(),
            StyleDimension::FontSet => self.font_sets.keys().map(String::as_str).collect(),
            _ => self
                .styles
                .get(&dimension)
                .map(|entries| entries.keys().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }

    /// Display name and description of an entry, whatever its dimension.
    pub fn describe(&self, dimension: StyleDimension, key: &str) -> Option<(&str, &str)> {
        match dimension {
            StyleDimension::ColorScheme => self
                .color_schemes
                .get(key)
                .map(|s| (s.name.as_str(), s.description.as_str())),
            StyleDimension::FontSet => self
                .font_sets
                .get(key)
                .map(|f| (f.name.as_str(), f.description.as_str())),
            _ => self
                .style(dimension, key)
                .map(|d| (d.name.as_str(), d.description.as_str())),
        }
    }

    pub fn color_scheme(&self, key: &str) -> Option<&ColorScheme> {
        self.color_schemes.get(key)
    }

    pub fn font_set(&self, key: &str) -> Option<&FontPairing> {
        self.font_sets.get(key)
    }

    pub fn style(&self, dimension: StyleDimension, key: &str) -> Option<&StyleDescriptor> {
        self.styles.get(&dimension).and_then(|entries| entries.get(key))
    }
}

// ============================================================================
// Built-in entries
// ============================================================================

fn scheme(name: &str, description: &str, colors: [&str; 8]) -> ColorScheme {
    let [background, surface, text, text_muted, primary, accent, border, link] = colors;
    ColorScheme {
        name: name.to_string(),
        description: description.to_string(),
        colors: ColorSet {
            background: background.to_string(),
            surface: surface.to_string(),
            text: text.to_string(),
            text_muted: text_muted.to_string(),
            primary: primary.to_string(),
            accent: accent.to_string(),
            border: border.to_string(),
            link: link.to_string(),
        },
    }
}

fn builtin_color_schemes() -> BTreeMap<String, ColorScheme> {
    let mut schemes = BTreeMap::new();
    schemes.insert(
        "current".to_string(),
        ColorScheme {
            name: "Current".to_string(),
            description: "Warm paper with violet accents".to_string(),
            colors: ColorSet::default(),
        },
    );
    schemes.insert(
        "parchment".to_string(),
        scheme(
            "Parchment",
            "Aged paper and sepia ink",
            ["#efe4cc", "#f7efdc", "#3b2f22", "#7a6a55", "#7b4a1e", "#a0522d", "#cdb994", "#7b4a1e"],
        ),
    );
    schemes.insert(
        "midnight".to_string(),
        scheme(
            "Midnight",
            "Deep blue night with silver text",
            ["#0f1424", "#182038", "#e4e8f4", "#9aa3bd", "#7aa2ff", "#f2c46d", "#2a3452", "#9bb8ff"],
        ),
    );
    schemes.insert(
        "forest".to_string(),
        scheme(
            "Forest",
            "Moss greens and bark browns",
            ["#eef2ea", "#fbfdf8", "#1f2a1d", "#5d6b58", "#2f5d3a", "#9c6b30", "#c9d3c2", "#2f5d3a"],
        ),
    );
    schemes
}

fn pairing(name: &str, description: &str, heading: &str, body: &str, ui: &str) -> FontPairing {
    FontPairing {
        name: name.to_string(),
        description: description.to_string(),
        fonts: FontSet {
            heading: heading.to_string(),
            body: body.to_string(),
            ui: ui.to_string(),
        },
    }
}

fn builtin_font_sets() -> BTreeMap<String, FontPairing> {
    let ui = "system-ui, -apple-system, \"Segoe UI\", sans-serif";
    let mut sets = BTreeMap::new();
    sets.insert(
        "serif".to_string(),
        FontPairing {
            name: "Serif".to_string(),
            description: "Classic book serif throughout".to_string(),
            fonts: FontSet::default(),
        },
    );
    sets.insert(
        "sans".to_string(),
        pairing(
            "Sans",
            "Clean humanist sans-serif",
            "\"Helvetica Neue\", Arial, sans-serif",
            "\"Helvetica Neue\", Arial, sans-serif",
            ui,
        ),
    );
    sets.insert(
        "typewriter".to_string(),
        pairing(
            "Typewriter",
            "Monospaced field-report look",
            "\"Courier New\", Courier, monospace",
            "\"Courier New\", Courier, monospace",
            "\"Courier New\", Courier, monospace",
        ),
    );
    sets.insert(
        "storybook".to_string(),
        pairing(
            "Storybook",
            "Decorative headings over a readable serif",
            "\"Palatino Linotype\", Palatino, \"Book Antiqua\", serif",
            "Georgia, serif",
            ui,
        ),
    );
    sets
}

type Entry = (&'static str, &'static str, &'static str, CssGenerator);

fn entry(key: &'static str, name: &'static str, description: &'static str, css: CssGenerator) -> Entry {
    (key, name, description, css)
}

fn builtin_styles() -> BTreeMap<StyleDimension, BTreeMap<String, StyleDescriptor>> {
    let table: Vec<(StyleDimension, Vec<Entry>)> = vec![
        (StyleDimension::Overview, overview_styles()),
        (StyleDimension::Navigation, navigation_styles()),
        (StyleDimension::Card, card_styles()),
        (StyleDimension::Container, container_styles()),
        (StyleDimension::Subcontainer, subcontainer_styles()),
        (StyleDimension::InfoDisplay, info_display_styles()),
        (StyleDimension::BannerStyle, banner_styles()),
        (StyleDimension::BannerSize, banner_sizes()),
        (StyleDimension::Background, background_styles()),
        (StyleDimension::BackgroundOverlay, background_overlays()),
        (StyleDimension::PageHeader, page_header_styles()),
        (StyleDimension::BackToTop, back_to_top_styles()),
        (StyleDimension::SiteWidth, site_widths()),
    ];
    table
        .into_iter()
        .map(|(dimension, entries)| {
            let entries = entries
                .into_iter()
                .map(|(key, name, description, css)| {
                    (key.to_string(), StyleDescriptor::new(name, description, css))
                })
                .collect();
            (dimension, entries)
        })
        .collect()
}

fn overview_styles() -> Vec<Entry> {
    vec![
        entry("original", "Original", "Centered introduction with a link list", |_| {
            ".overview-original #overview .overview-body { max-width: 46rem; margin: 0 auto; }".to_string()
        }),
        entry("journal", "Journal", "Ruled-paper entry with a dated margin", |ctx| {
            format!(
                ".overview-journal #overview .overview-body {{ border-left: 3px double {}; padding-left: 1.5rem; \
                 background-image: repeating-linear-gradient(transparent, transparent 1.7rem, {} 1.75rem); }}",
                ctx.colors.accent, ctx.colors.border
            )
        }),
        entry("codex", "Codex", "Two-column manuscript with drop cap", |ctx| {
            format!(
                ".overview-codex #overview .overview-body {{ column-count: 2; column-gap: 2.5rem; }}\n\
                 .overview-codex #overview .overview-body > p:first-child::first-letter {{ \
                 float: left; font-size: 3.2em; line-height: 0.9; padding-right: 0.4rem; color: {}; font-family: {}; }}",
                ctx.colors.primary, ctx.fonts.heading
            )
        }),
    ]
}

fn navigation_styles() -> Vec<Entry> {
    vec![
        entry("original", "Original", "Horizontal link bar under the header", |ctx| {
            format!(
                ".nav-original .site-nav ul {{ display: flex; flex-wrap: wrap; gap: 1rem; justify-content: center; }}\n\
                 .nav-original .site-nav .nav-link.active {{ border-bottom: 2px solid {}; }}",
                ctx.colors.accent
            )
        }),
        entry("journal", "Journal", "Bookmark ribbons along the top edge", |ctx| {
            format!(
                ".nav-journal .site-nav ul {{ display: flex; gap: 0.4rem; justify-content: flex-start; }}\n\
                 .nav-journal .site-nav .nav-link {{ background: {}; color: {}; padding: 0.6rem 0.9rem 1rem; \
                 clip-path: polygon(0 0, 100% 0, 100% 100%, 50% 80%, 0 100%); }}",
                ctx.colors.primary, ctx.colors.surface
            )
        }),
        entry("tabs", "Tabs", "Folder tabs joined to the content area", |ctx| {
            format!(
                ".nav-tabs .site-nav ul {{ display: flex; gap: 0.25rem; border-bottom: 1px solid {border}; }}\n\
                 .nav-tabs .site-nav .nav-link {{ border: 1px solid {border}; border-bottom: none; \
                 border-radius: 6px 6px 0 0; padding: 0.4rem 1rem; }}\n\
                 .nav-tabs .site-nav .nav-link.active {{ background: {surface}; }}",
                border = ctx.colors.border,
                surface = ctx.colors.surface
            )
        }),
        entry("sidebar", "Sidebar", "Fixed vertical menu on wide screens", |ctx| {
            format!(
                "@media (min-width: 960px) {{\n\
                 .nav-sidebar .site-nav {{ position: fixed; top: 0; left: 0; width: 14rem; height: 100vh; \
                 overflow-y: auto; background: {}; border-right: 1px solid {}; }}\n\
                 .nav-sidebar .site-nav ul {{ display: flex; flex-direction: column; }}\n\
                 .nav-sidebar .site {{ margin-left: 14rem; }}\n}}",
                ctx.colors.surface, ctx.colors.border
            )
        }),
    ]
}

fn card_styles() -> Vec<Entry> {
    vec![
        entry("current", "Current", "Soft surface with a light shadow", |ctx| {
            format!(
                ".card-current .entity-card {{ background: {}; border-radius: 8px; \
                 box-shadow: 0 1px 3px rgba(0, 0, 0, 0.12); }}",
                ctx.colors.surface
            )
        }),
        entry("bordered", "Bordered", "Flat cards with an accent outline", |ctx| {
            format!(
                ".card-bordered .entity-card {{ background: {}; border: 2px solid {}; border-radius: 4px; }}",
                ctx.colors.surface, ctx.colors.accent
            )
        }),
        entry("elevated", "Elevated", "Raised cards that lift on hover", |ctx| {
            format!(
                ".card-elevated .entity-card {{ background: {}; border-radius: 12px; \
                 box-shadow: 0 6px 18px rgba(0, 0, 0, 0.18); transition: transform 0.2s; }}\n\
                 .card-elevated .entity-card:hover {{ transform: translateY(-4px); }}",
                ctx.colors.surface
            )
        }),
        entry("minimal", "Minimal", "No chrome, just a divider", |ctx| {
            format!(
                ".card-minimal .entity-card {{ background: transparent; border-bottom: 1px solid {}; border-radius: 0; }}",
                ctx.colors.border
            )
        }),
    ]
}

fn container_styles() -> Vec<Entry> {
    vec![
        entry("current", "Current", "Surface panel with rounded corners", |ctx| {
            format!(
                ".container-current .content-container {{ background: {}; border-radius: 10px; padding: 1.5rem; }}",
                ctx.colors.surface
            )
        }),
        entry("framed", "Framed", "Double-ruled frame", |ctx| {
            format!(
                ".container-framed .content-container {{ border: 4px double {}; padding: 1.5rem; }}",
                ctx.colors.border
            )
        }),
        entry("flat", "Flat", "No panel, content sits on the page", |_| {
            ".container-flat .content-container { background: none; padding: 0; }".to_string()
        }),
    ]
}

fn subcontainer_styles() -> Vec<Entry> {
    vec![
        entry("current", "Current", "Indented block with a left rule", |ctx| {
            format!(
                ".subcontainer-current .sub-container {{ border-left: 3px solid {}; padding-left: 1rem; margin: 1rem 0; }}",
                ctx.colors.primary
            )
        }),
        entry("inset", "Inset", "Tinted inset panel", |ctx| {
            format!(
                ".subcontainer-inset .sub-container {{ background: {}; border-radius: 6px; padding: 1rem; margin: 1rem 0; }}",
                ctx.colors.background
            )
        }),
        entry("outlined", "Outlined", "Thin outline box", |ctx| {
            format!(
                ".subcontainer-outlined .sub-container {{ border: 1px solid {}; padding: 1rem; margin: 1rem 0; }}",
                ctx.colors.border
            )
        }),
    ]
}

fn info_display_styles() -> Vec<Entry> {
    vec![
        entry("table", "Table", "Label/value grid", |ctx| {
            format!(
                ".info-table .info-fields {{ display: grid; grid-template-columns: max-content 1fr; gap: 0.3rem 1rem; }}\n\
                 .info-table .info-fields dt {{ color: {}; font-family: var(--font-ui); }}",
                ctx.colors.text_muted
            )
        }),
        entry("list", "List", "Stacked label above value", |_| {
            ".info-list .info-fields dt { font-weight: bold; margin-top: 0.5rem; }\n\
             .info-list .info-fields dd { margin: 0; }"
                .to_string()
        }),
        entry("inline", "Inline", "Label and value on one line, wrapped", |ctx| {
            format!(
                ".info-inline .info-fields {{ display: flex; flex-wrap: wrap; gap: 0.5rem 1.5rem; }}\n\
                 .info-inline .info-fields dt::after {{ content: \":\"; }}\n\
                 .info-inline .info-fields dt {{ display: inline; color: {}; }}\n\
                 .info-inline .info-fields dd {{ display: inline; margin: 0 0 0 0.3rem; }}",
                ctx.colors.text_muted
            )
        }),
    ]
}

fn banner_styles() -> Vec<Entry> {
    vec![
        entry("standard", "Standard", "Full-bleed image", |_| {
            ".banner-standard .banner img { width: 100%; object-fit: cover; }".to_string()
        }),
        entry("fade", "Fade", "Image fading into the page background", |ctx| {
            format!(
                ".banner-fade .banner {{ position: relative; }}\n\
                 .banner-fade .banner::after {{ content: \"\"; position: absolute; inset: 0; \
                 background: linear-gradient(to bottom, transparent 40%, {}); }}",
                ctx.colors.background
            )
        }),
        entry("scroll", "Scroll", "Unrolled parchment edges", |_| {
            ".banner-scroll .banner { border-image: url('assets/banners/scroll-edge.png') 30 round; \
             border-width: 18px; border-style: solid; background: url('assets/textures/paper-fibers.png'); }"
                .to_string()
        }),
    ]
}

fn banner_sizes() -> Vec<Entry> {
    vec![
        entry("small", "Small", "Short strip", |_| {
            ".banner-size-small .banner img { height: 160px; }".to_string()
        }),
        entry("medium", "Medium", "Standard height", |_| {
            ".banner-size-medium .banner img { height: 280px; }".to_string()
        }),
        entry("large", "Large", "Tall hero image", |_| {
            ".banner-size-large .banner img { height: 440px; }".to_string()
        }),
    ]
}

fn background_styles() -> Vec<Entry> {
    vec![
        entry("none", "None", "Plain background color", |_| String::new()),
        entry("gradient", "Gradient", "Soft vertical wash", |ctx| {
            format!(
                "body.bg-gradient {{ background: linear-gradient(180deg, {} 0%, {} 100%); background-attachment: fixed; }}",
                ctx.colors.background, ctx.colors.border
            )
        }),
        entry("parchment", "Parchment", "Paper texture", |_| {
            "body.bg-parchment { background-image: url('assets/backgrounds/parchment.jpg'), \
             url('assets/textures/paper-fibers.png'); background-size: cover, auto; }"
                .to_string()
        }),
        entry("starfield", "Starfield", "Night sky", |_| {
            "body.bg-starfield { background-image: url('assets/backgrounds/starfield.jpg'); \
             background-size: cover; background-attachment: fixed; }"
                .to_string()
        }),
    ]
}

fn background_overlays() -> Vec<Entry> {
    vec![
        entry("none", "None", "No overlay", |_| String::new()),
        entry("vignette", "Vignette", "Darkened edges", |_| {
            "body.overlay-vignette::before { content: \"\"; position: fixed; inset: 0; pointer-events: none; \
             box-shadow: inset 0 0 160px rgba(0, 0, 0, 0.45); }"
                .to_string()
        }),
        entry("grain", "Grain", "Film grain texture", |_| {
            "body.overlay-grain::before { content: \"\"; position: fixed; inset: 0; pointer-events: none; \
             background: url('assets/textures/grain.png'); opacity: 0.18; }"
                .to_string()
        }),
    ]
}

fn page_header_styles() -> Vec<Entry> {
    vec![
        entry("current", "Current", "Plain heading", |ctx| {
            format!(
                ".page-header-current .section-header h2 {{ font-family: var(--font-heading); color: {}; }}",
                ctx.colors.primary
            )
        }),
        entry("underlined", "Underlined", "Heading with an accent rule", |ctx| {
            format!(
                ".page-header-underlined .section-header h2 {{ border-bottom: 2px solid {}; padding-bottom: 0.3rem; }}",
                ctx.colors.accent
            )
        }),
        entry("ornate", "Ornate", "Centered heading between flourishes", |_| {
            ".page-header-ornate .section-header { text-align: center; }\n\
             .page-header-ornate .section-header h2::before, .page-header-ornate .section-header h2::after { \
             content: \"\"; display: inline-block; width: 3rem; height: 1rem; vertical-align: middle; \
             background: url('assets/ornaments/flourish.svg') no-repeat center / contain; margin: 0 0.75rem; }"
                .to_string()
        }),
    ]
}

fn back_to_top_styles() -> Vec<Entry> {
    vec![
        entry("current", "Current", "Round button in the corner", |ctx| {
            format!(
                ".back-to-top-current .back-to-top {{ background: {}; color: {}; border-radius: 50%; width: 2.75rem; height: 2.75rem; }}",
                ctx.colors.primary, ctx.colors.surface
            )
        }),
        entry("none", "None", "No back-to-top button", |_| String::new()),
        entry("compass", "Compass", "Compass rose icon", |_| {
            ".back-to-top-compass .back-to-top { width: 3rem; height: 3rem; font-size: 0; \
             background: url('assets/icons/compass.svg') no-repeat center / contain; }"
                .to_string()
        }),
    ]
}

fn site_widths() -> Vec<Entry> {
    vec![
        entry("standard", "Standard", "Comfortable reading width", |_| {
            ".width-standard .site { max-width: 1100px; }".to_string()
        }),
        entry("wide", "Wide", "Room for large grids", |_| {
            ".width-wide .site { max-width: 1440px; }".to_string()
        }),
        entry("full", "Full", "Edge to edge", |_| {
            ".width-full .site { max-width: none; }".to_string()
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_every_default() {
        let catalogs = Catalogs::builtin();
        for dimension in StyleDimension::ALL {
            assert!(
                catalogs.contains(dimension, dimension.default_key()),
                "default '{}' missing for {}",
                dimension.default_key(),
                dimension.field_name()
            );
        }
    }

    #[test]
    fn generators_scope_rules_to_their_class() {
        let catalogs = Catalogs::builtin();
        let colors = ColorSet::default();
        let fonts = FontSet::default();
        let ctx = StyleContext {
            colors: &colors,
            fonts: &fonts,
        };
        for dimension in StyleDimension::ALL.into_iter().filter(|d| d.is_visual()) {
            for key in catalogs.keys(dimension) {
                let css = catalogs.style(dimension, key).unwrap().render(&ctx);
                if css.is_empty() {
                    continue;
                }
                let scope = format!("{}-{}", dimension.class_prefix(), key);
                assert!(css.contains(&scope), "{scope} rules not scoped:\n{css}");
            }
        }
    }

    #[test]
    fn extending_adds_entries() {
        let catalogs = Catalogs::builtin().with_style(
            StyleDimension::Card,
            "glass",
            StyleDescriptor::new("Glass", "Frosted", |_| ".card-glass .entity-card {}".into()),
        );
        assert!(catalogs.contains(StyleDimension::Card, "glass"));
        assert!(catalogs.contains(StyleDimension::Card, "current"));
    }

    #[test]
    fn with_style_ignores_value_dimensions() {
        let catalogs = Catalogs::builtin().with_style(
            StyleDimension::ColorScheme,
            "neon",
            StyleDescriptor::new("Neon", "", |_| String::new()),
        );
        assert!(!catalogs.contains(StyleDimension::ColorScheme, "neon"));
    }

    #[test]
    fn color_overrides_reject_unsafe_values() {
        let mut colors = ColorSet::default();
        let overrides = BTreeMap::from([
            ("text".to_string(), "red; } body { display: none".to_string()),
            ("accent".to_string(), "</style><script>".to_string()),
            ("link".to_string(), "#123456".to_string()),
        ]);
        colors.apply_overrides(&overrides);
        assert_eq!(colors.text, ColorSet::default().text);
        assert_eq!(colors.accent, ColorSet::default().accent);
        assert_eq!(colors.link, "#123456");
    }

    #[test]
    fn color_css_lists_every_property() {
        let css = ColorSet::default().to_css();
        for var in [
            "--color-bg:",
            "--color-surface:",
            "--color-text:",
            "--color-text-muted:",
            "--color-primary:",
            "--color-accent:",
            "--color-border:",
            "--color-link:",
        ] {
            assert!(css.contains(var), "missing {var}");
        }
    }

    #[test]
    fn describe_covers_value_dimensions() {
        let catalogs = Catalogs::builtin();
        assert_eq!(
            catalogs.describe(StyleDimension::ColorScheme, "midnight").map(|d| d.0),
            Some("Midnight")
        );
        assert_eq!(
            catalogs.describe(StyleDimension::FontSet, "serif").map(|d| d.0),
            Some("Serif")
        );
        assert!(catalogs.describe(StyleDimension::Card, "nope").is_none());
    }
}
