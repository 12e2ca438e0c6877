//! Visible text extraction.

use super::{walk_document, DomVisitor, Element, Visit};

/// Elements whose content never renders as page text.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript"];

#[derive(Default)]
struct VisibleText {
    out: String,
}

impl DomVisitor for VisibleText {
    fn element(&mut self, element: &Element<'_>) -> Visit {
        if HIDDEN_ELEMENTS.contains(&element.name()) {
            Visit::Skip
        } else {
            Visit::Descend
        }
    }

    fn text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            if !self.out.is_empty() {
                self.out.push(' ');
            }
            self.out.push_str(word);
        }
    }
}

/// Extract lower-cased, whitespace-collapsed visible text from raw HTML.
///
/// Script, style and noscript subtrees are dropped along with all markup.
pub fn extract_visible_text(html: &str) -> String {
    let mut visitor = VisibleText::default();
    walk_document(html, &mut visitor);
    visitor.out.to_lowercase()
}
