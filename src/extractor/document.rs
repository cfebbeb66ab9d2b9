//! Parsed HTML document and the element helpers every checker leans on.

use scraper::{ElementRef, Html};

use super::snippet;

/// An immutable, parsed HTML page.
///
/// Wraps `scraper::Html`, which is neither `Send` nor `Sync`; keep it out of
/// any state held across an `.await`.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Every element in document order (depth-first, pre-order).
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Elements with the given lowercase tag name, in document order.
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements().filter(move |el| el.value().name() == tag)
    }

    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        if id.is_empty() {
            return None;
        }
        self.elements().find(|el| el.value().attr("id") == Some(id))
    }

    /// Text of the element an `aria-describedby` (or similar) reference points at.
    pub fn referenced_text(&self, id: &str) -> Option<String> {
        self.element_by_id(id.trim()).map(|el| el.text_content())
    }
}

/// Converts raw HTML into a `Document`. Parsing never fails.
pub trait HtmlParser: Send + Sync {
    fn parse(&self, html: &str) -> Document;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperHtmlParser;

impl HtmlParser for ScraperHtmlParser {
    fn parse(&self, html: &str) -> Document {
        Document::parse(html)
    }
}

/// Convenience accessors over `scraper::ElementRef`.
///
/// Missing attributes read as the empty string so rules never have to special-case absence.
pub trait ElementExt<'a> {
    fn tag(&self) -> &'a str;
    fn attr_or_empty(&self, name: &str) -> &'a str;
    fn has_attr(&self, name: &str) -> bool;
    fn text_content(&self) -> String;
    /// Text content with surrounding whitespace removed.
    fn trimmed_text(&self) -> String;
    fn has_text(&self) -> bool;
    fn parent_element(&self) -> Option<ElementRef<'a>>;
    fn following_elements(&self) -> Vec<ElementRef<'a>>;
    fn preceding_elements(&self) -> Vec<ElementRef<'a>>;
    fn descendant_elements(&self) -> Vec<ElementRef<'a>>;
    fn snippet(&self) -> String;
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn tag(&self) -> &'a str {
        self.value().name()
    }

    fn attr_or_empty(&self, name: &str) -> &'a str {
        self.value().attr(name).unwrap_or("")
    }

    fn has_attr(&self, name: &str) -> bool {
        self.value().attr(name).is_some()
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn trimmed_text(&self) -> String {
        self.text_content().trim().to_string()
    }

    fn has_text(&self) -> bool {
        self.text().any(|t| !t.trim().is_empty())
    }

    fn parent_element(&self) -> Option<ElementRef<'a>> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn following_elements(&self) -> Vec<ElementRef<'a>> {
        self.next_siblings().filter_map(ElementRef::wrap).collect()
    }

    /// Nearest sibling first.
    fn preceding_elements(&self) -> Vec<ElementRef<'a>> {
        self.prev_siblings().filter_map(ElementRef::wrap).collect()
    }

    fn descendant_elements(&self) -> Vec<ElementRef<'a>> {
        self.descendants().skip(1).filter_map(ElementRef::wrap).collect()
    }

    fn snippet(&self) -> String {
        snippet::serialize(*self)
    }
}
