//! Markdown to markup.
//!
//! Free-text fields (overview, descriptions, storyline bodies, text elements)
//! are written in markdown and converted with pulldown-cmark at assembly time.

use maud::{Markup, PreEscaped};
use pulldown_cmark::{Options, Parser, html as md_html};

/// Convert markdown to an HTML fragment. Blank input yields an empty string.
pub fn to_html(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(text, options);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    body_html
}

/// [`to_html`] wrapped for direct interpolation into maud templates.
pub fn render(text: &str) -> Markup {
    PreEscaped(to_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_emphasis() {
        let html = to_html("This is **bold** and *italic*.");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(to_html("   \n"), "");
    }

    #[test]
    fn tables_are_enabled() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }
}
