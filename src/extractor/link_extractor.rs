use scraper::Selector;
use std::sync::OnceLock;

use super::Document;

/// Collects outbound references from anchor elements.
pub struct LinkExtractor;

impl LinkExtractor {
    /// Every non-empty `href` on an `a` element, verbatim and in document order.
    ///
    /// No trimming, normalization, deduplication or origin filtering is applied.
    pub fn extract_links(document: &Document) -> Vec<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());

        document
            .html()
            .select(selector)
            .filter_map(|el| el.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect()
    }
}
