use std::sync::{Arc, OnceLock};

use regex::Regex;
use scraper::ElementRef;

use crate::checker::css::{self, class_or_id_contains, parse_length, Length};
use crate::checker::{Checker, LanguageDetector};
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};

/// One family of text-spacing properties and the smallest values that still allow
/// readers to override spacing.
struct SpacingRule {
    properties: &'static [&'static str],
    min_px: f64,
    min_em: f64,
    min_unitless: Option<f64>,
    zero_is_violation: bool,
    keywords: &'static [&'static str],
}

const SPACING_RULES: &[SpacingRule] = &[
    SpacingRule {
        properties: &["line-height"],
        min_px: 24.0,
        min_em: 1.5,
        min_unitless: Some(1.5),
        zero_is_violation: false,
        keywords: &[
            "line-height-1",
            "tight",
            "compact",
            "condensed",
            "narrow",
            "squeezed",
        ],
    },
    SpacingRule {
        properties: &["letter-spacing"],
        min_px: 1.92,
        min_em: 0.12,
        min_unitless: None,
        zero_is_violation: false,
        keywords: &[
            "letter-spacing-tight",
            "letter-spacing-compact",
            "letter-spacing-condensed",
            "tight-spacing",
            "compact-spacing",
            "condensed-spacing",
        ],
    },
    SpacingRule {
        properties: &["word-spacing"],
        min_px: 2.56,
        min_em: 0.16,
        min_unitless: None,
        zero_is_violation: false,
        keywords: &[
            "word-spacing-tight",
            "word-spacing-compact",
            "word-spacing-condensed",
            "tight-words",
            "compact-words",
            "condensed-words",
        ],
    },
    SpacingRule {
        properties: &["margin", "margin-bottom"],
        min_px: 2.0,
        min_em: 0.2,
        min_unitless: None,
        zero_is_violation: true,
        keywords: &[
            "no-margin",
            "zero-margin",
            "tight-margin",
            "compact-margin",
            "margin-0",
            "margin-zero",
            "margin-tight",
            "margin-compact",
        ],
    },
];

impl SpacingRule {
    fn violated_by(&self, value: &str) -> bool {
        if matches!(value, "normal" | "inherit" | "initial") {
            return false;
        }
        if self.zero_is_violation && matches!(value, "0" | "0px" | "0em" | "0rem") {
            return true;
        }
        match parse_length(value) {
            Some(Length::Px(px)) => px < self.min_px,
            Some(Length::Em(em)) => em < self.min_em,
            Some(Length::Number(n)) => self.min_unitless.is_some_and(|min| n < min),
            None => false,
        }
    }

    fn violated_in(&self, element: &ElementRef<'_>, style: &str) -> bool {
        let declared = self.properties.iter().any(|property| {
            css::declared_values(style, property).any(|value| self.violated_by(value))
        });
        declared || class_or_id_contains(element, self.keywords)
    }
}

/// Line height, letter spacing, word spacing or paragraph margins tighter than readers can
/// comfortably override.
pub struct TextSpacingChecker;

impl Checker for TextSpacingChecker {
    fn name(&self) -> &'static str {
        "TextSpacing"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| {
                let style = css::style_of(el);
                SPACING_RULES.iter().any(|rule| rule.violated_in(el, &style))
            })
            .map(|el| Issue::new(IssueType::LineHeightSpacingViolation, el.snippet()))
            .collect()
    }
}

const FIXED_FONT_SIZE_PREFIXES: &[&str] = &["text-", "font-", "size-"];
const FIXED_FONT_SIZE_STEPS: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl",
];
const FIXED_DIMENSION_WORDS: &[&str] =
    &["w-", "h-", "width-", "height-", "size-", "fixed-", "static-"];
const OVERFLOW_WORDS: &[&str] = &["overflow-hidden", "overflowhidden", "hidden", "clip", "truncate"];
const NOWRAP_WORDS: &[&str] = &[
    "whitespace-nowrap",
    "whitespacenowrap",
    "nowrap",
    "no-wrap",
    "text-nowrap",
];
const FIXED_POSITION_WORDS: &[&str] = &["fixed", "sticky"];

fn fixed_font_size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"font-size\s*:\s*[0-9.]+\s*(px|pt|pc|in|cm|mm)").unwrap()
    })
}

fn fixed_dimension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(width|height)\s*:\s*[0-9.]+\s*(px|pt|pc|in|cm|mm)").unwrap()
    })
}

/// Content that cannot grow with the user's text size: absolute font sizes, fixed boxes,
/// clipped overflow, nowrap and fixed or sticky positioning.
///
/// A fixed dimension is flagged on its own, which also covers absolutely positioned boxes.
pub struct TextResizeChecker;

impl TextResizeChecker {
    fn has_fixed_font_size(element: &ElementRef<'_>, style: &str) -> bool {
        if fixed_font_size_pattern().is_match(style) {
            return true;
        }
        let (class, id) = css::class_and_id(element);
        [class, id].iter().any(|attr| {
            FIXED_FONT_SIZE_PREFIXES.iter().any(|prefix| {
                FIXED_FONT_SIZE_STEPS
                    .iter()
                    .any(|step| attr.contains(&format!("{prefix}{step}")))
            })
        })
    }

    fn violates(element: &ElementRef<'_>) -> bool {
        let style = css::style_of(element);

        Self::has_fixed_font_size(element, &style)
            || fixed_dimension_pattern().is_match(&style)
            || class_or_id_contains(element, FIXED_DIMENSION_WORDS)
            || css::declared_values(&style, "overflow").any(|v| v == "hidden")
            || class_or_id_contains(element, OVERFLOW_WORDS)
            || css::declared_values(&style, "white-space").any(|v| v == "nowrap")
            || class_or_id_contains(element, NOWRAP_WORDS)
            || css::declared_values(&style, "position").any(|v| v == "fixed")
            || class_or_id_contains(element, FIXED_POSITION_WORDS)
    }
}

impl Checker for TextResizeChecker {
    fn name(&self) -> &'static str {
        "TextResize"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(Self::violates)
            .map(|el| Issue::new(IssueType::TextResizeViolation, el.snippet()))
            .collect()
    }
}

/// Passages written in a language other than the one declared by the nearest `lang`
/// ancestor, without their own `lang`.
pub struct LanguageChangeChecker {
    detector: Arc<dyn LanguageDetector>,
}

impl LanguageChangeChecker {
    pub fn new(detector: Arc<dyn LanguageDetector>) -> Self {
        Self { detector }
    }

    /// Primary subtag of the closest ancestor's `lang`, lowercased.
    fn inherited_language(element: &ElementRef<'_>) -> Option<String> {
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find_map(|ancestor| ancestor.value().attr("lang"))
            .map(|lang| {
                lang.split('-')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_lowercase()
            })
            .filter(|lang| !lang.is_empty())
    }

    fn is_unmarked_change(&self, element: &ElementRef<'_>) -> bool {
        if element.has_attr("lang") {
            return false;
        }
        let text = element.trimmed_text();
        if text.chars().count() <= 3 || !text.chars().any(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        let Some(declared) = Self::inherited_language(element) else {
            return false;
        };
        match self.detector.detect(&text) {
            Some(detected) => detected != declared,
            None => false,
        }
    }
}

impl Checker for LanguageChangeChecker {
    fn name(&self) -> &'static str {
        "LanguageChange"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| self.is_unmarked_change(el))
            .map(|el| Issue::new(IssueType::LanguageChangeNotMarked, el.snippet()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mocks::StubLanguageDetector;

    #[test]
    fn test_spacing_thresholds_per_family() {
        let html = r#"<body>
            <p style="line-height: 20px">a</p>
            <p style="line-height: 1.6">b</p>
            <p style="line-height: 1.2rem">c</p>
            <p style="letter-spacing: 0.1em">d</p>
            <p style="word-spacing: normal">e</p>
            <p style="margin-bottom: 0">f</p>
            <p style="margin-top: 0">g</p>
            <p class="Tight-Spacing">h</p>
            <p id="copy">i</p>
        </body>"#;
        let document = Document::parse(html);
        let issues = TextSpacingChecker.check(&document);

        let texts: Vec<&str> = issues
            .iter()
            .map(|i| &i.html_snippet[i.html_snippet.len() - 5..i.html_snippet.len() - 4])
            .collect();
        assert_eq!(texts, vec!["a", "c", "d", "f", "h"]);
        assert!(issues
            .iter()
            .all(|i| i.issue_type == IssueType::LineHeightSpacingViolation));
    }

    #[test]
    fn test_spacing_value_rules() {
        let margin = &SPACING_RULES[3];
        assert!(margin.violated_by("0rem"));
        assert!(margin.violated_by("1px"));
        assert!(!margin.violated_by("1em"));
        assert!(!margin.violated_by("inherit"));

        let letter = &SPACING_RULES[1];
        assert!(!letter.violated_by("1"));
        assert!(letter.violated_by("1px"));
    }

    #[test]
    fn test_text_resize_violations() {
        let html = r#"<body>
            <p style="font-size: 12px">fixed font</p>
            <p style="font-size: 1.2em">relative font</p>
            <div style="width: 300px">fixed box</div>
            <div style="overflow:hidden">clipped</div>
            <span class="truncate">long</span>
            <span style="white-space: nowrap">no wrap</span>
            <nav class="sticky-top">nav</nav>
            <p class="text-lg">utility</p>
            <p class="lead">fine</p>
        </body>"#;
        let document = Document::parse(html);
        let issues = TextResizeChecker.check(&document);

        assert_eq!(issues.len(), 7);
        assert!(issues[0].html_snippet.contains("12px"));
        assert!(issues.iter().all(|i| !i.html_snippet.contains("1.2em")));
        assert!(issues.iter().all(|i| !i.html_snippet.contains("lead")));
    }

    #[test]
    fn test_language_change_uses_nearest_ancestor() {
        let html = r#"<html lang="en-GB"><body>
            <p>Hello there, friend.</p>
            <blockquote lang="fr"><p>Bonjour tout le monde.</p></blockquote>
            <p>Bonjour encore une fois.</p>
            <p>Hi</p>
        </body></html>"#;
        let detector = StubLanguageDetector::keyword("bonjour", "fr", "en");
        let checker = LanguageChangeChecker::new(Arc::new(detector));
        let document = Document::parse(html);
        let issues = checker.check(&document);

        let snippets: Vec<&str> = issues.iter().map(|i| i.html_snippet.as_str()).collect();
        assert!(snippets.contains(&"<p>Bonjour encore une fois.</p>"));
        assert!(!snippets.contains(&"<p>Bonjour tout le monde.</p>"));
        assert!(!snippets.contains(&"<p>Hello there, friend.</p>"));
    }

    #[test]
    fn test_language_change_skips_without_declared_language() {
        let html = "<body><p>Bonjour tout le monde.</p></body>";
        let checker = LanguageChangeChecker::new(Arc::new(StubLanguageDetector::fixed("fr")));

        assert!(checker.check(&Document::parse(html)).is_empty());
    }

    #[test]
    fn test_language_change_skips_when_detector_is_unsure() {
        let html = r#"<html lang="en"><body><p>Bonjour tout le monde.</p></body></html>"#;
        let checker = LanguageChangeChecker::new(Arc::new(StubLanguageDetector::unsure()));

        assert!(checker.check(&Document::parse(html)).is_empty());
    }
}
