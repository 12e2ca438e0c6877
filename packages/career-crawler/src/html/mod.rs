//! Minimal DOM visitor over parsed HTML.
//!
//! Text and link extraction are written against [`DomVisitor`] so the
//! concrete parser (`scraper`, backed by html5ever) stays inside this
//! module. html5ever recovers from any malformed markup, so walking a
//! document never fails; broken pages simply yield less text.

mod links;
mod text;

pub use links::extract_links;
pub use text::extract_visible_text;

use scraper::{ElementRef, Html};

/// Whether the walker should descend into an element's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    Skip,
}

/// Read-only view of an element handed to a visitor.
pub struct Element<'a> {
    inner: &'a scraper::node::Element,
}

impl<'a> Element<'a> {
    /// Lower-case tag name (`a`, `script`, ...).
    pub fn name(&self) -> &'a str {
        self.inner.name()
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.attr(name)
    }
}

/// Callbacks invoked in document order while walking a parsed page.
pub trait DomVisitor {
    /// Called when an element opens. Returning [`Visit::Skip`] prunes its subtree.
    fn element(&mut self, element: &Element<'_>) -> Visit;

    /// Called for every text node outside pruned subtrees.
    fn text(&mut self, text: &str);
}

/// Parse `html` and walk it depth-first with `visitor`.
///
/// The walk keeps its own stack, so nesting depth is bounded by memory
/// rather than by the thread's call stack.
pub fn walk_document<V: DomVisitor>(html: &str, visitor: &mut V) {
    let document = Html::parse_document(html);
    let mut pending = vec![*document.root_element()];

    while let Some(node) = pending.pop() {
        if let Some(element) = ElementRef::wrap(node) {
            let view = Element {
                inner: element.value(),
            };
            if visitor.element(&view) == Visit::Descend {
                // Reversed so the first child is popped first
                pending.extend(node.children().rev());
            }
        } else if let Some(text) = node.value().as_text() {
            visitor.text(text);
        }
    }
}
