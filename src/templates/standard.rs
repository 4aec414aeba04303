//! The built-in "standard" page template: a single column of headings,
//! markdown text, images, quotes and a character roster.

use super::{ElementLimit, ElementSlot, PageTemplate, TemplateError};
use crate::markdown;
use crate::model::{ContentModel, CustomPage, Element, Entity};
use crate::theme::{AppearanceConfig, ColorSet, FontSet};
use maud::{Markup, html};
use std::sync::LazyLock;

pub const STANDARD_TEMPLATE_ID: &str = "standard";

static SLOTS: LazyLock<Vec<ElementSlot>> = LazyLock::new(|| {
    vec![
        ElementSlot::new("heading", ElementLimit::AtMost(4), "Heading"),
        ElementSlot::new("text", ElementLimit::Unlimited, "Text block"),
        ElementSlot::new("image", ElementLimit::AtMost(6), "Image"),
        ElementSlot::new("gallery", ElementLimit::AtMost(1), "Gallery"),
        ElementSlot::new("quote", ElementLimit::AtMost(3), "Quote"),
        ElementSlot::new("character-list", ElementLimit::AtMost(1), "Character list"),
        ElementSlot::new("divider", ElementLimit::Unlimited, "Divider"),
    ]
});

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTemplate;

impl PageTemplate for StandardTemplate {
    fn id(&self) -> &str {
        STANDARD_TEMPLATE_ID
    }

    fn name(&self) -> &str {
        "Standard"
    }

    fn max_elements(&self) -> usize {
        12
    }

    fn available_elements(&self) -> &[ElementSlot] {
        &SLOTS
    }

    fn generate_markup(
        &self,
        page: &CustomPage,
        content: &ContentModel,
    ) -> Result<Markup, TemplateError> {
        let elements = page
            .ordered_elements()
            .into_iter()
            .map(|element| render_element(element, content))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(html! {
            div.template-standard {
                @for element in elements {
                    (element)
                }
            }
        })
    }

    fn generate_styles(
        &self,
        _appearance: &AppearanceConfig,
        colors: &ColorSet,
        fonts: &FontSet,
    ) -> String {
        format!(
            r#".template-standard {{ display: flex; flex-direction: column; gap: 1.25rem; }}
.template-standard h2, .template-standard h3, .template-standard h4 {{ font-family: {heading}; margin: 0; }}
.template-standard figure {{ margin: 0; }}
.template-standard figcaption {{ color: {muted}; font-size: 0.9em; }}
.template-standard blockquote {{ border-left: 3px solid {accent}; margin: 0; padding: 0.5rem 1rem; font-style: italic; }}
.template-standard blockquote cite {{ display: block; margin-top: 0.5rem; color: {muted}; font-style: normal; }}
.template-standard .roster {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(10rem, 1fr)); gap: 0.75rem; list-style: none; padding: 0; }}
.template-standard hr {{ border: 0; border-top: 1px solid {border}; width: 100%; }}"#,
            heading = fonts.heading,
            muted = colors.text_muted,
            accent = colors.accent,
            border = colors.border,
        )
    }
}

fn render_element(element: &Element, content: &ContentModel) -> Result<Markup, TemplateError> {
    let markup = match element.element_type.as_str() {
        "heading" => {
            let Some(text) = element.text("text") else {
                return Ok(html! {});
            };
            match element.integer("level").unwrap_or(2).clamp(2, 4) {
                2 => html! { h2 { (text) } },
                3 => html! { h3 { (text) } },
                _ => html! { h4 { (text) } },
            }
        }
        "text" => html! {
            div.text-block { (markdown::render(element.text("content").unwrap_or_default())) }
        },
        "image" => match element.text("src") {
            Some(src) => {
                let caption = element.text("caption");
                html! {
                    figure.page-image {
                        img src=(src) alt=(caption.unwrap_or_default()) loading="lazy";
                        @if let Some(caption) = caption {
                            figcaption { (caption) }
                        }
                    }
                }
            }
            None => html! {},
        },
        "gallery" => {
            let images = element.strings("images");
            if images.is_empty() {
                html! {}
            } else {
                html! {
                    div.gallery data-gallery {
                        @for (i, src) in images.iter().enumerate() {
                            img src=(src) alt="" loading="lazy" data-viewer class=[(i == 0).then_some("current")];
                        }
                    }
                }
            }
        }
        "quote" => {
            let text = element
                .text("text")
                .ok_or_else(|| TemplateError::MissingField {
                    element_type: "quote".into(),
                    field: "text",
                })?;
            html! {
                blockquote {
                    (text)
                    @if let Some(attribution) = element.text("attribution") {
                        cite { (attribution) }
                    }
                }
            }
        }
        "character-list" => {
            let panel_ids = content.character_panel_ids();
            html! {
                ul.roster {
                    @for (panel_id, character) in panel_ids.iter().zip(&content.characters) {
                        @if character.is_visible() {
                            li {
                                a.panel-link href={ "#" (panel_id) } {
                                    (character.name)
                                }
                            }
                        }
                    }
                }
            }
        }
        "divider" => html! { hr; },
        other => return Err(TemplateError::UnsupportedElement(other.to_string())),
    };
    Ok(markup)
}
