//! HTML sanitizer

use scraper::{ElementRef, Html};

use crate::domain::Sanitizer;

/// Elements whose content is dropped entirely
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "iframe", "object"];

/// Strips every tag from a value, keeping only its text.
///
/// The text is re-escaped on output, so the result never parses back into
/// markup and cleaning it again is a no-op.
#[derive(Debug, Clone, Default)]
pub struct HtmlSanitizer;

impl HtmlSanitizer {
    pub fn new() -> Self {
        Self
    }

    fn collect_text(element: &ElementRef, out: &mut String) {
        for node in element.children() {
            if let Some(el) = ElementRef::wrap(node) {
                if DROPPED_ELEMENTS.contains(&el.value().name()) {
                    continue;
                }
                Self::collect_text(&el, out);
            } else if let Some(txt) = node.value().as_text() {
                out.push_str(txt);
            }
        }
    }

    fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());

        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                _ => escaped.push(c),
            }
        }

        escaped
    }
}

impl Sanitizer for HtmlSanitizer {
    fn clean(&self, value: &str) -> String {
        // Fast path: nothing that could start markup or an entity
        if !value.contains(['<', '>', '&', '"']) {
            return value.to_string();
        }

        let fragment = Html::parse_fragment(value);
        let mut text = String::with_capacity(value.len());
        Self::collect_text(&fragment.root_element(), &mut text);

        Self::escape(&text)
    }
}
