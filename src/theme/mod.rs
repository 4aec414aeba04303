//! Theme resolution.
//!
//! An [`AppearanceConfig`] stores one catalog key per [`StyleDimension`], plus
//! free-form override maps. What is stored may be partial, null, reference a
//! key a later version removed, or still use the retired combined `template`
//! field. [`resolve`] turns any of that into a [`ResolvedTheme`] in three steps:
//!
//! 1. **Migration** ([`migrate`]): a legacy `template` value is copied into
//!    `overviewStyle` and `navigationStyle` when either is missing, then the
//!    legacy field is dropped. Running it twice changes nothing.
//! 2. **Defaulting** ([`apply_defaults`]): every dimension whose value is
//!    absent or not a key of its catalog gets the dimension's fixed default
//!    ([`StyleDimension::default_key`]).
//! 3. **Lookup**: the color scheme and font set are fetched and the
//!    `customColors`/`customFonts` overrides are merged over them, override
//!    wins per key. Every other dimension contributes its CSS generator.
//!
//! Resolution never fails. Old artifacts routinely reference styles that no
//! longer exist, so an unknown key quietly becomes the default.

pub mod catalog;

pub use catalog::{
    Catalogs, ColorScheme, ColorSet, CssGenerator, FontPairing, FontSet, StyleContext,
    StyleDescriptor,
};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One independently selectable axis of visual presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleDimension {
    Overview,
    Navigation,
    ColorScheme,
    FontSet,
    Card,
    Container,
    Subcontainer,
    InfoDisplay,
    BannerStyle,
    BannerSize,
    Background,
    BackgroundOverlay,
    PageHeader,
    BackToTop,
    SiteWidth,
}

impl StyleDimension {
    pub const ALL: [StyleDimension; 15] = [
        StyleDimension::Overview,
        StyleDimension::Navigation,
        StyleDimension::ColorScheme,
        StyleDimension::FontSet,
        StyleDimension::Card,
        StyleDimension::Container,
        StyleDimension::Subcontainer,
        StyleDimension::InfoDisplay,
        StyleDimension::BannerStyle,
        StyleDimension::BannerSize,
        StyleDimension::Background,
        StyleDimension::BackgroundOverlay,
        StyleDimension::PageHeader,
        StyleDimension::BackToTop,
        StyleDimension::SiteWidth,
    ];

    /// Key of this dimension in a serialized appearance config.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Overview => "overviewStyle",
            Self::Navigation => "navigationStyle",
            Self::ColorScheme => "colorScheme",
            Self::FontSet => "fontSet",
            Self::Card => "cardStyle",
            Self::Container => "containerStyle",
            Self::Subcontainer => "subcontainerStyle",
            Self::InfoDisplay => "infoDisplay",
            Self::BannerStyle => "bannerStyle",
            Self::BannerSize => "bannerSize",
            Self::Background => "backgroundStyle",
            Self::BackgroundOverlay => "backgroundOverlay",
            Self::PageHeader => "pageHeaderStyle",
            Self::BackToTop => "backToTopStyle",
            Self::SiteWidth => "siteWidth",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Navigation => "Navigation",
            Self::ColorScheme => "Color scheme",
            Self::FontSet => "Font set",
            Self::Card => "Cards",
            Self::Container => "Containers",
            Self::Subcontainer => "Subcontainers",
            Self::InfoDisplay => "Info display",
            Self::BannerStyle => "Banner style",
            Self::BannerSize => "Banner size",
            Self::Background => "Background",
            Self::BackgroundOverlay => "Background overlay",
            Self::PageHeader => "Page headers",
            Self::BackToTop => "Back to top",
            Self::SiteWidth => "Site width",
        }
    }

    /// The hard-coded fallback key. Always present in [`Catalogs`].
    pub fn default_key(self) -> &'static str {
        match self {
            Self::Overview | Self::Navigation => "original",
            Self::ColorScheme | Self::Card | Self::Container | Self::Subcontainer => "current",
            Self::PageHeader | Self::BackToTop => "current",
            Self::FontSet => "serif",
            Self::InfoDisplay => "table",
            Self::BannerStyle => "standard",
            Self::BannerSize => "medium",
            Self::Background | Self::BackgroundOverlay => "none",
            Self::SiteWidth => "standard",
        }
    }

    /// Prefix of the body class that scopes this dimension's rules
    /// (`card-bordered`, `bg-parchment`, ...).
    pub fn class_prefix(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Navigation => "nav",
            Self::ColorScheme => "scheme",
            Self::FontSet => "fonts",
            Self::Card => "card",
            Self::Container => "container",
            Self::Subcontainer => "subcontainer",
            Self::InfoDisplay => "info",
            Self::BannerStyle => "banner",
            Self::BannerSize => "banner-size",
            Self::Background => "bg",
            Self::BackgroundOverlay => "overlay",
            Self::PageHeader => "page-header",
            Self::BackToTop => "back-to-top",
            Self::SiteWidth => "width",
        }
    }

    /// Dimensions rendered through a CSS generator. Color scheme and font set
    /// instead resolve to concrete [`ColorSet`]/[`FontSet`] values.
    pub fn is_visual(self) -> bool {
        !matches!(self, Self::ColorScheme | Self::FontSet)
    }
}

/// Dimensions the retired `template` field was split into.
const TEMPLATE_SUCCESSORS: [StyleDimension; 2] = [StyleDimension::Overview, StyleDimension::Navigation];

/// Stored appearance selection. Every field is optional; see [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppearanceConfig {
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub overview_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub navigation_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub font_set: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub card_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub container_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub subcontainer_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub info_display: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub banner_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub banner_size: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub background_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub background_overlay: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub page_header_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub back_to_top_style: Option<String>,
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub site_width: Option<String>,
    /// Retired combined layout key, replaced by `overviewStyle` + `navigationStyle`.
    #[serde(deserialize_with = "lenient_key", skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Per-key overrides merged over the selected color scheme.
    #[serde(deserialize_with = "lenient_overrides", skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_colors: BTreeMap<String, String>,
    /// Per-key overrides merged over the selected font set.
    #[serde(deserialize_with = "lenient_overrides", skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fonts: BTreeMap<String, String>,
}

/// Accepts any JSON value; only strings count as a selected key.
fn lenient_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(key)) => Some(key),
        _ => None,
    })
}

/// Accepts any JSON value; only string entries of an object are kept.
fn lenient_overrides<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    })
}

impl AppearanceConfig {
    pub fn get(&self, dimension: StyleDimension) -> Option<&str> {
        self.slot(dimension).as_deref()
    }

    pub fn set(&mut self, dimension: StyleDimension, key: impl Into<String>) {
        *self.slot_mut(dimension) = Some(key.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, dimension: StyleDimension, key: impl Into<String>) -> Self {
        self.set(dimension, key);
        self
    }

    fn slot(&self, dimension: StyleDimension) -> &Option<String> {
        match dimension {
            StyleDimension::Overview => &self.overview_style,
            StyleDimension::Navigation => &self.navigation_style,
            StyleDimension::ColorScheme => &self.color_scheme,
            StyleDimension::FontSet => &self.font_set,
            StyleDimension::Card => &self.card_style,
            StyleDimension::Container => &self.container_style,
            StyleDimension::Subcontainer => &self.subcontainer_style,
            StyleDimension::InfoDisplay => &self.info_display,
            StyleDimension::BannerStyle => &self.banner_style,
            StyleDimension::BannerSize => &self.banner_size,
            StyleDimension::Background => &self.background_style,
            StyleDimension::BackgroundOverlay => &self.background_overlay,
            StyleDimension::PageHeader => &self.page_header_style,
            StyleDimension::BackToTop => &self.back_to_top_style,
            StyleDimension::SiteWidth => &self.site_width,
        }
    }

    fn slot_mut(&mut self, dimension: StyleDimension) -> &mut Option<String> {
        match dimension {
            StyleDimension::Overview => &mut self.overview_style,
            StyleDimension::Navigation => &mut self.navigation_style,
            StyleDimension::ColorScheme => &mut self.color_scheme,
            StyleDimension::FontSet => &mut self.font_set,
            StyleDimension::Card => &mut self.card_style,
            StyleDimension::Container => &mut self.container_style,
            StyleDimension::Subcontainer => &mut self.subcontainer_style,
            StyleDimension::InfoDisplay => &mut self.info_display,
            StyleDimension::BannerStyle => &mut self.banner_style,
            StyleDimension::BannerSize => &mut self.banner_size,
            StyleDimension::Background => &mut self.background_style,
            StyleDimension::BackgroundOverlay => &mut self.background_overlay,
            StyleDimension::PageHeader => &mut self.page_header_style,
            StyleDimension::BackToTop => &mut self.back_to_top_style,
            StyleDimension::SiteWidth => &mut self.site_width,
        }
    }
}

/// Split the retired `template` field into its successors.
///
/// When `template` is set and at least one successor is missing, its value is
/// written to every successor. The legacy field is always dropped afterwards.
pub fn migrate(mut config: AppearanceConfig) -> AppearanceConfig {
    if let Some(legacy) = config.template.take() {
        let split_needed = TEMPLATE_SUCCESSORS
            .iter()
            .any(|dimension| config.get(*dimension).is_none());
        if split_needed {
            log::debug!("migrating legacy template '{legacy}' into overview and navigation styles");
            for dimension in TEMPLATE_SUCCESSORS {
                config.set(dimension, legacy.clone());
            }
        }
    }
    config
}

/// Replace absent or unknown keys with each dimension's default.
pub fn apply_defaults(mut config: AppearanceConfig, catalogs: &Catalogs) -> AppearanceConfig {
    for dimension in StyleDimension::ALL {
        let known = config
            .get(dimension)
            .is_some_and(|key| catalogs.contains(dimension, key));
        if !known {
            if let Some(stale) = config.get(dimension) {
                log::debug!(
                    "unknown {} '{stale}', falling back to '{}'",
                    dimension.field_name(),
                    dimension.default_key()
                );
            }
            config.set(dimension, dimension.default_key());
        }
    }
    config
}

/// A fully defaulted, migrated appearance plus the concrete style objects.
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub appearance: AppearanceConfig,
    pub colors: ColorSet,
    pub fonts: FontSet,
    styles: BTreeMap<StyleDimension, StyleDescriptor>,
}

impl ResolvedTheme {
    /// The selected key for a dimension.
    pub fn key(&self, dimension: StyleDimension) -> &str {
        self.appearance
            .get(dimension)
            .unwrap_or(dimension.default_key())
    }

    /// The generator descriptor of a visual dimension.
    pub fn style(&self, dimension: StyleDimension) -> Option<&StyleDescriptor> {
        self.styles.get(&dimension)
    }

    /// Body classes scoping each dimension's rules, e.g. `card-bordered`.
    pub fn body_classes(&self) -> String {
        StyleDimension::ALL
            .iter()
            .map(|d| format!("{}-{}", d.class_prefix(), self.key(*d)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Color and font custom properties followed by every visual dimension's rules.
    pub fn stylesheet(&self) -> String {
        let ctx = StyleContext {
            colors: &self.colors,
            fonts: &self.fonts,
        };
        let mut css = vec![self.colors.to_css(), self.fonts.to_css()];
        for (dimension, descriptor) in &self.styles {
            let rules = descriptor.render(&ctx);
            if !rules.trim().is_empty() {
                css.push(format!(
                    "/* {}: {} */\n{}",
                    dimension.field_name(),
                    self.key(*dimension),
                    rules.trim()
                ));
            }
        }
        css.join("\n\n")
    }
}

/// Migrate, default and look up an appearance config. Never fails.
pub fn resolve(config: &AppearanceConfig, catalogs: &Catalogs) -> ResolvedTheme {
    let appearance = apply_defaults(migrate(config.clone()), catalogs);

    let color_key = appearance
        .get(StyleDimension::ColorScheme)
        .unwrap_or(StyleDimension::ColorScheme.default_key());
    let mut colors = catalogs
        .color_scheme(color_key)
        .map(|scheme| scheme.colors.clone())
        .unwrap_or_default();
    colors.apply_overrides(&appearance.custom_colors);

    let font_key = appearance
        .get(StyleDimension::FontSet)
        .unwrap_or(StyleDimension::FontSet.default_key());
    let mut fonts = catalogs
        .font_set(font_key)
        .map(|pairing| pairing.fonts.clone())
        .unwrap_or_default();
    fonts.apply_overrides(&appearance.custom_fonts);

    let styles = StyleDimension::ALL
        .into_iter()
        .filter(|d| d.is_visual())
        .filter_map(|d| {
            let key = appearance.get(d).unwrap_or(d.default_key());
            catalogs.style(d, key).map(|descriptor| (d, descriptor.clone()))
        })
        .collect();

    ResolvedTheme {
        appearance,
        colors,
        fonts,
        styles,
    }
}
