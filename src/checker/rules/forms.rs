use std::collections::HashMap;

use scraper::ElementRef;

use crate::checker::Checker;
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};

const FORM_CONTROLS: [&str; 3] = ["input", "textarea", "select"];

/// True when the element's `aria-describedby` target exists and has text.
fn described_by_text(document: &Document, element: &ElementRef<'_>) -> bool {
    let target = element.attr_or_empty("aria-describedby");
    if target.is_empty() {
        return false;
    }
    document
        .referenced_text(target)
        .is_some_and(|text| !text.trim().is_empty())
}

fn sibling_with_text(siblings: &[ElementRef<'_>], tags: &[&str]) -> bool {
    siblings
        .iter()
        .any(|sibling| tags.contains(&sibling.tag()) && sibling.has_text())
}

/// Constrained form controls with no visible error or format guidance.
pub struct ErrorSuggestionChecker;

impl ErrorSuggestionChecker {
    fn is_constrained(element: &ElementRef<'_>) -> bool {
        element.attr_or_empty("aria-required").eq_ignore_ascii_case("true")
            || ["pattern", "min", "max"].iter().any(|attr| element.has_attr(attr))
    }
}

impl Checker for ErrorSuggestionChecker {
    fn name(&self) -> &'static str {
        "ErrorSuggestion"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        for tag in FORM_CONTROLS {
            for element in document.elements_by_tag(tag) {
                if !Self::is_constrained(&element) {
                    continue;
                }
                let has_message = described_by_text(document, &element)
                    || sibling_with_text(&element.following_elements(), &["span", "div", "p"]);
                if !has_message {
                    issues.push(Issue::new(IssueType::ErrorSuggestionNotProvided, element.snippet()));
                }
            }
        }

        issues
    }
}

/// Form controls with no description, hint, placeholder, lead-in text or input pattern.
pub struct HelpAvailableChecker;

impl HelpAvailableChecker {
    fn has_help(document: &Document, element: &ElementRef<'_>) -> bool {
        described_by_text(document, element)
            || sibling_with_text(&element.following_elements(), &["small", "span"])
            || !element.attr_or_empty("placeholder").is_empty()
            || sibling_with_text(&element.preceding_elements(), &["p", "div"])
            || element.has_attr("pattern")
    }
}

impl Checker for HelpAvailableChecker {
    fn name(&self) -> &'static str {
        "HelpAvailable"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        for tag in FORM_CONTROLS {
            for element in document.elements_by_tag(tag) {
                let skipped = element.attr_or_empty("type").eq_ignore_ascii_case("hidden")
                    || element.attr_or_empty("aria-enabled").eq_ignore_ascii_case("false");
                if skipped || Self::has_help(document, &element) {
                    continue;
                }
                issues.push(Issue::new(IssueType::HelpNotAvailable, element.snippet()));
            }
        }

        issues
    }
}

/// Fields that ask again for information already entered under the same name without
/// pre-filling it.
///
/// One name map is shared across inputs, textareas and selects.
pub struct RedundantEntryChecker;

impl Checker for RedundantEntryChecker {
    fn name(&self) -> &'static str {
        "RedundantEntry"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut previous: HashMap<&str, &str> = HashMap::new();

        for tag in FORM_CONTROLS {
            for element in document.elements_by_tag(tag) {
                let sensitive = element.attr_or_empty("type").eq_ignore_ascii_case("password")
                    || element.has_attr("data-security");
                let name = element.attr_or_empty("name");
                if sensitive || name.is_empty() {
                    continue;
                }

                let value = element.attr_or_empty("value").trim();
                if previous.contains_key(name) {
                    let has_options = tag == "select"
                        && element.descendant_elements().iter().any(|el| el.tag() == "option");
                    if value.is_empty() && !has_options {
                        issues.push(Issue::new(IssueType::RedundantEntry, element.snippet()));
                    }
                } else if !value.is_empty() {
                    previous.insert(name, value);
                }
            }
        }

        issues
    }
}
