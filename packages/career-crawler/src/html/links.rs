//! Anchor link extraction.

use indexmap::IndexSet;
use url::Url;

use super::{walk_document, DomVisitor, Element, Visit};

struct AnchorLinks<'a> {
    base: &'a Url,
    links: IndexSet<String>,
}

impl DomVisitor for AnchorLinks<'_> {
    fn element(&mut self, element: &Element<'_>) -> Visit {
        if element.name() == "a" {
            if let Some(resolved) = element.attr("href").and_then(|href| resolve(self.base, href)) {
                self.links.insert(resolved);
            }
        }
        Visit::Descend
    }

    fn text(&mut self, _text: &str) {}
}

/// Resolve an href against the page URL, dropping non-navigational targets.
fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

/// Absolute targets of every `<a href>` in `html`, in document order and
/// without duplicates.
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let mut visitor = AnchorLinks {
        base,
        links: IndexSet::new(),
    };
    walk_document(html, &mut visitor);
    visitor.links.into_iter().collect()
}
