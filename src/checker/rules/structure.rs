use std::collections::HashMap;

use scraper::ElementRef;

use crate::checker::css::{class_and_id, compact_style_of, contains_any};
use crate::checker::Checker;
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};

/// Class/id words that describe a page landmark.
const LANDMARK_WORDS: &[&str] = &[
    "nav", "menu", "header", "banner", "footer", "main", "content", "article", "post", "section",
    "chapter", "sidebar", "aside",
];

const CONTROL_WORDS: &[&str] = &[
    "button", "btn", "link", "anchor", "emphasis", "highlight", "strong", "bold",
];

fn has_no_role(element: &ElementRef<'_>) -> bool {
    element.attr_or_empty("role").is_empty()
}

/// Generic containers styled as landmarks or controls instead of using the semantic element.
pub struct SemanticHtmlChecker;

impl SemanticHtmlChecker {
    fn keywords_for(tag: &str) -> &'static [&'static str] {
        match tag {
            "div" => LANDMARK_WORDS,
            "span" => CONTROL_WORDS,
            _ => &[],
        }
    }
}

impl Checker for SemanticHtmlChecker {
    fn name(&self) -> &'static str {
        "SemanticHtml"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        for tag in ["div", "span", "p"] {
            let keywords = Self::keywords_for(tag);
            for element in document.elements_by_tag(tag).filter(has_no_role) {
                let (class, id) = class_and_id(&element);
                if contains_any(&class, keywords) || contains_any(&id, keywords) {
                    issues.push(Issue::new(IssueType::SemanticHtmlMissing, element.snippet()));
                }
            }
        }

        issues
    }
}

const SECTIONING_TAGS: &[&str] = &[
    "div", "span", "p", "section", "article", "aside", "header", "footer", "main",
];

/// Sectioning markup that names a landmark in its class or id but carries no role.
pub struct ValidHtmlChecker;

impl Checker for ValidHtmlChecker {
    fn name(&self) -> &'static str {
        "ValidHtml"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| SECTIONING_TAGS.contains(&el.tag()) && has_no_role(el))
            .filter(|el| {
                let (class, id) = class_and_id(el);
                contains_any(&class, LANDMARK_WORDS) || contains_any(&id, LANDMARK_WORDS)
            })
            .map(|el| Issue::new(IssueType::InvalidHtml, el.snippet()))
            .collect()
    }
}

const REORDERING_STYLES: &[&str] = &[
    "position:absolute",
    "position:fixed",
    "float:left",
    "float:right",
    "margin-left:-",
    "margin-right:-",
    "margin-top:-",
    "margin-bottom:-",
    "transform:translate",
];

const REORDERING_ID_WORDS: &[&str] = &[
    "absolute", "fixed", "floating", "overlay", "popup", "modal", "dropdown", "tooltip", "sticky",
    "positioned", "offset",
];

const REORDERING_CLASS_WORDS: &[&str] = &[
    "absolute", "fixed", "floating", "overlay", "popup", "modal", "dropdown", "tooltip", "sticky",
    "positioned", "offset", "negative-margin", "pull-left", "pull-right", "float-left",
    "float-right",
];

/// Elements positioned out of flow, so visual order may differ from reading order.
pub struct MeaningfulSequenceChecker;

impl Checker for MeaningfulSequenceChecker {
    fn name(&self) -> &'static str {
        "MeaningfulSequence"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| {
                let (class, id) = class_and_id(el);
                contains_any(&compact_style_of(el), REORDERING_STYLES)
                    || contains_any(&class, REORDERING_CLASS_WORDS)
                    || contains_any(&id, REORDERING_ID_WORDS)
            })
            .map(|el| Issue::new(IssueType::ContentMeaningfulSequenceViolation, el.snippet()))
            .collect()
    }
}

/// `<meta http-equiv="refresh">`, which imposes a time limit the user cannot control.
pub struct TimeLimitsChecker;

impl Checker for TimeLimitsChecker {
    fn name(&self) -> &'static str {
        "TimeLimits"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements_by_tag("meta")
            .filter(|meta| meta.attr_or_empty("http-equiv").eq_ignore_ascii_case("refresh"))
            .map(|meta| Issue::new(IssueType::TimeLimits, meta.snippet()))
            .collect()
    }
}

/// Components that share an identity but are labeled differently across the page.
///
/// Each pass keeps its own map of identity key to first label seen; labels compare
/// case-insensitively. Snippets are prefixed with a short explanation.
pub struct ConsistentComponentsChecker;

/// Remembers the first label per key and reports the previous label on a mismatch.
#[derive(Default)]
struct LabelRegistry {
    seen: HashMap<String, String>,
}

impl LabelRegistry {
    /// Returns the earlier label when it disagrees with `label`; otherwise records `label`.
    fn conflict(&mut self, key: &str, label: &str) -> Option<String> {
        match self.seen.get(key) {
            Some(previous) if !previous.eq_ignore_ascii_case(label) => Some(previous.clone()),
            _ => {
                self.seen.insert(key.to_string(), label.to_string());
                None
            }
        }
    }
}

impl ConsistentComponentsChecker {
    fn issue(message: String) -> Issue {
        Issue::new(IssueType::ComponentsNotConsistent, message)
    }

    /// Buttons and anchors, keyed by id, name, href/onclick or their own text.
    fn check_text_components(document: &Document, tag: &str, issues: &mut Vec<Issue>) {
        let mut labels = LabelRegistry::default();

        for element in document.elements_by_tag(tag) {
            let label = element.trimmed_text();
            let fallback_attr = if tag == "a" { "href" } else { "onclick" };
            let key = ["id", "name", fallback_attr]
                .iter()
                .map(|attr| element.attr_or_empty(attr))
                .find(|value| !value.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| label.clone());

            if label.is_empty() {
                issues.push(Self::issue(format!(
                    "Missing label for {} element {}",
                    tag,
                    element.snippet()
                )));
                continue;
            }

            if let Some(previous) = labels.conflict(&key, &label) {
                issues.push(Self::issue(format!(
                    "Inconsistent labeling for {} with key '{}': '{}' vs '{}' {}",
                    tag,
                    key,
                    previous,
                    label,
                    element.snippet()
                )));
            }
        }
    }

    fn form_label(document: &Document, element: &ElementRef<'_>) -> Option<String> {
        let id = element.attr_or_empty("id");
        if !id.is_empty() {
            let explicit = document
                .elements_by_tag("label")
                .find(|label| label.attr_or_empty("for") == id)
                .map(|label| label.trimmed_text());
            if explicit.is_some() {
                return explicit;
            }
        }
        let placeholder = element.attr_or_empty("placeholder");
        (!placeholder.is_empty()).then(|| placeholder.to_string())
    }

    /// Form controls, keyed by id or by tag and type.
    fn check_form_components(document: &Document, tag: &str, issues: &mut Vec<Issue>) {
        let mut labels = LabelRegistry::default();

        for element in document.elements_by_tag(tag) {
            let id = element.attr_or_empty("id");
            let input_type = element.attr_or_empty("type");
            let key = if id.is_empty() {
                format!("{}-{}", tag, input_type)
            } else {
                id.to_string()
            };

            let label = match Self::form_label(document, &element) {
                Some(label) if !label.is_empty() => label,
                _ => {
                    issues.push(Self::issue(format!(
                        "Missing label for {} element {}",
                        tag,
                        element.snippet()
                    )));
                    continue;
                }
            };

            if let Some(previous) = labels.conflict(&key, &label) {
                issues.push(Self::issue(format!(
                    "Inconsistent labeling for {} type '{}': '{}' vs '{}' {}",
                    tag,
                    input_type,
                    previous,
                    label,
                    element.snippet()
                )));
            }
        }
    }

    fn check_images(document: &Document, issues: &mut Vec<Issue>) {
        let mut labels = LabelRegistry::default();

        for img in document.elements_by_tag("img") {
            let src = img.attr_or_empty("src");
            let alt = img.attr_or_empty("alt");

            if alt.is_empty() {
                issues.push(Self::issue(format!("Missing alt text for image {}", img.snippet())));
                continue;
            }
            if src.is_empty() {
                continue;
            }
            if let Some(previous) = labels.conflict(src, alt) {
                issues.push(Self::issue(format!(
                    "Inconsistent alt text for image '{}': '{}' vs '{}' {}",
                    src,
                    previous,
                    alt,
                    img.snippet()
                )));
            }
        }
    }

    fn check_roles(document: &Document, issues: &mut Vec<Issue>) {
        let mut labels = LabelRegistry::default();

        for element in document.elements() {
            let role = element.attr_or_empty("role");
            if role.is_empty() {
                continue;
            }

            let label = element.trimmed_text();
            if label.is_empty() {
                issues.push(Self::issue(format!(
                    "Missing label for role '{}' {}",
                    role,
                    element.snippet()
                )));
                continue;
            }
            if let Some(previous) = labels.conflict(role, &label) {
                issues.push(Self::issue(format!(
                    "Inconsistent label for role '{}': '{}' vs '{}' {}",
                    role,
                    previous,
                    label,
                    element.snippet()
                )));
            }
        }
    }
}

impl Checker for ConsistentComponentsChecker {
    fn name(&self) -> &'static str {
        "ConsistentComponents"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        Self::check_text_components(document, "button", &mut issues);
        Self::check_text_components(document, "a", &mut issues);
        for tag in ["input", "textarea", "select"] {
            Self::check_form_components(document, tag, &mut issues);
        }
        Self::check_images(document, &mut issues);
        Self::check_roles(document, &mut issues);

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_div_and_control_span() {
        let html = r#"<body>
            <div class="main-nav">Links</div>
            <div class="nav" role="navigation">ok</div>
            <span class="btn-primary">Go</span>
            <span class="note">fine</span>
            <p class="content">paragraphs are never flagged</p>
        </body>"#;
        let document = Document::parse(html);
        let issues = SemanticHtmlChecker.check(&document);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].html_snippet, r#"<div class="main-nav">Links</div>"#);
        assert_eq!(issues[1].html_snippet, r#"<span class="btn-primary">Go</span>"#);
    }

    #[test]
    fn test_sectioning_without_role() {
        let html = r#"<body>
            <section id="Sidebar">x</section>
            <header class="site-header" role="banner">ok</header>
            <p class="content">y</p>
            <nav class="menu">nav elements are not checked</nav>
        </body>"#;
        let document = Document::parse(html);
        let issues = ValidHtmlChecker.check(&document);

        assert_eq!(issues.len(), 2);
        assert!(issues[0].html_snippet.starts_with("<section"));
        assert!(issues[1].html_snippet.starts_with("<p"));
    }

    #[test]
    fn test_out_of_flow_positioning() {
        let html = r#"<body>
            <div style="position: absolute; top: 0">a</div>
            <div style="margin-top:-20px">b</div>
            <div class="Modal-dialog">c</div>
            <div id="pull-left">id words exclude pull-left</div>
            <div style="position: relative">d</div>
        </body>"#;
        let document = Document::parse(html);
        let issues = MeaningfulSequenceChecker.check(&document);

        assert_eq!(issues.len(), 3);
        assert!(issues[2].html_snippet.contains("Modal-dialog"));
    }

    #[test]
    fn test_meta_refresh_flagged() {
        let html = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8"/>
    <title>Unit Test Fixture</title>
    <meta http-equiv="refresh" content="5;url=/timeout"/>
</head>
<body></body>
</html>"#;
        let document = Document::parse(html);
        let issues = TimeLimitsChecker.check(&document);

        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].html_snippet,
            r#"<meta http-equiv="refresh" content="5;url=/timeout"/>"#
        );
    }

    #[test]
    fn test_inconsistent_button_labels() {
        let html = r#"<body>
            <button id="save">Save</button>
            <button id="save">SAVE</button>
            <button id="save">Store</button>
            <button></button>
        </body>"#;
        let document = Document::parse(html);
        let issues = ConsistentComponentsChecker.check(&document);

        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0].html_snippet,
            r#"Inconsistent labeling for button with key 'save': 'SAVE' vs 'Store' <button id="save">Store</button>"#
        );
        assert_eq!(issues[1].html_snippet, "Missing label for button element <button></button>");
    }

    #[test]
    fn test_form_image_and_role_consistency() {
        let html = r#"<body>
            <label for="email">Email</label><input id="email" type="email">
            <input type="text" placeholder="First name">
            <input type="text" placeholder="Surname">
            <input type="checkbox">
            <img src="logo.png" alt="Acme">
            <img src="logo.png" alt="Acme Corp">
            <div role="alert">Saved</div>
            <div role="alert">Deleted</div>
        </body>"#;
        let document = Document::parse(html);
        let issues = ConsistentComponentsChecker.check(&document);

        let snippets: Vec<&str> = issues.iter().map(|i| i.html_snippet.as_str()).collect();
        assert_eq!(snippets.len(), 4);
        assert!(snippets[0].starts_with("Inconsistent labeling for input type 'text': 'First name' vs 'Surname'"));
        assert!(snippets[1].starts_with("Missing label for input element <input type=\"checkbox\"/>"));
        assert!(snippets[2].starts_with("Inconsistent alt text for image 'logo.png': 'Acme' vs 'Acme Corp'"));
        assert!(snippets[3].starts_with("Inconsistent label for role 'alert': 'Saved' vs 'Deleted'"));
    }
}
