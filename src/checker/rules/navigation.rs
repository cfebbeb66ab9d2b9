use crate::checker::Checker;
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};

/// A missing or blank `<title>`.
pub struct PageTitleChecker;

impl Checker for PageTitleChecker {
    fn name(&self) -> &'static str {
        "PageTitle"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        match document.elements_by_tag("title").next() {
            None => vec![Issue::new(IssueType::ClearPageTitles, "<title> missing")],
            Some(title) if !title.has_text() => {
                vec![Issue::new(IssueType::ClearPageTitles, "<title></title>")]
            }
            Some(_) => Vec::new(),
        }
    }
}

const VAGUE_LINK_TEXT: &[&str] = &["click here", "here", "read more", "more", "learn more"];

/// Anchors whose text is empty or says nothing about the destination.
pub struct DescriptiveLinkTextChecker;

impl Checker for DescriptiveLinkTextChecker {
    fn name(&self) -> &'static str {
        "DescriptiveLinkText"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements_by_tag("a")
            .filter(|a| {
                let text = a.trimmed_text().to_lowercase();
                text.is_empty() || VAGUE_LINK_TEXT.contains(&text.as_str())
            })
            .map(|a| Issue::new(IssueType::DescriptiveLinkText, a.snippet()))
            .collect()
    }
}

/// Pages offering a single route to content: no skip link, search or sitemap.
///
/// Reports at most one page-level issue with a descriptive snippet.
pub struct MultipleWaysChecker;

impl MultipleWaysChecker {
    fn has_skip_link(document: &Document) -> bool {
        document.elements_by_tag("a").any(|a| {
            let href = a.attr_or_empty("href");
            let lower = href.to_lowercase();
            let skip_href = href.starts_with('#')
                && (lower.contains("main") || lower.contains("content") || lower.contains("skip"));
            skip_href || a.text_content().to_lowercase().contains("skip")
        })
    }

    fn has_search(document: &Document) -> bool {
        document
            .elements_by_tag("form")
            .any(|form| form.attr_or_empty("role").eq_ignore_ascii_case("search"))
            || document
                .elements_by_tag("input")
                .any(|input| input.attr_or_empty("type").eq_ignore_ascii_case("search"))
    }

    fn has_sitemap_link(document: &Document) -> bool {
        document
            .elements_by_tag("a")
            .any(|a| a.attr_or_empty("href").to_lowercase().contains("sitemap"))
    }
}

impl Checker for MultipleWaysChecker {
    fn name(&self) -> &'static str {
        "MultipleWays"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        if Self::has_skip_link(document) || Self::has_search(document) || Self::has_sitemap_link(document) {
            return Vec::new();
        }
        vec![Issue::new(
            IssueType::MultipleWaysToNavigate,
            "No skip link, search, or sitemap detected",
        )]
    }
}

/// Positive `tabindex` values, which override the natural focus order.
pub struct FocusOrderChecker;

impl Checker for FocusOrderChecker {
    fn name(&self) -> &'static str {
        "FocusOrder"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| {
                el.attr_or_empty("tabindex")
                    .trim()
                    .parse::<i64>()
                    .is_ok_and(|index| index > 0)
            })
            .map(|el| Issue::new(IssueType::FocusOrderLogical, el.snippet()))
            .collect()
    }
}
