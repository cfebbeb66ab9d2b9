use scraper::ElementRef;

use crate::checker::css::{compact_style_of, declarations, parse_pixels};
use crate::checker::Checker;
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};

const POINTER_HANDLERS: &[&str] = &["onclick", "onmousedown", "onmouseup"];
const KEY_HANDLERS: &[&str] = &["onkeydown", "onkeyup", "onkeypress"];

fn has_any_attr(element: &ElementRef<'_>, names: &[&str]) -> bool {
    names.iter().any(|name| element.has_attr(name))
}

fn tabindex(element: &ElementRef<'_>) -> Option<i64> {
    element.attr_or_empty("tabindex").trim().parse().ok()
}

/// Elements that react to the mouse but expose no keyboard handler.
pub struct KeyboardOperableChecker;

impl Checker for KeyboardOperableChecker {
    fn name(&self) -> &'static str {
        "KeyboardOperable"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| has_any_attr(el, POINTER_HANDLERS) && !has_any_attr(el, KEY_HANDLERS))
            .map(|el| Issue::new(IssueType::KeyboardOperable, el.snippet()))
            .collect()
    }
}

/// Key handlers that swallow Tab/Escape, and focus handlers that pull focus back.
pub struct KeyboardTrapChecker;

impl KeyboardTrapChecker {
    fn blocks_tab_or_escape(element: &ElementRef<'_>) -> bool {
        ["onkeydown", "onkeypress"].iter().any(|attr| {
            let handler = element.attr_or_empty(attr).to_lowercase();
            let blocks = handler.contains("preventdefault()");
            let handles_exit = handler.contains("tab") || handler.contains("esc");
            blocks && !handles_exit
        })
    }

    fn forces_focus(element: &ElementRef<'_>) -> bool {
        element
            .attr_or_empty("onfocus")
            .to_lowercase()
            .contains("focus()")
    }
}

impl Checker for KeyboardTrapChecker {
    fn name(&self) -> &'static str {
        "KeyboardTrap"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        for element in document.elements() {
            if Self::blocks_tab_or_escape(&element) {
                issues.push(Issue::new(IssueType::NoKeyboardTraps, element.snippet()));
            }
            if Self::forces_focus(&element) {
                issues.push(Issue::new(IssueType::NoKeyboardTraps, element.snippet()));
            }
        }

        issues
    }
}

/// Focusable controls styled so focus cannot be seen. Reported tag by tag.
pub struct VisibleFocusChecker;

impl Checker for VisibleFocusChecker {
    fn name(&self) -> &'static str {
        "VisibleFocus"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        for tag in ["a", "button", "input", "textarea", "select"] {
            for element in document.elements_by_tag(tag) {
                let style = element.attr_or_empty("style");
                let hides_focus = style.contains("outline:none")
                    || style.contains("display:none")
                    || style.contains("visibility:hidden")
                    || element.attr_or_empty("class").to_lowercase().contains("no-focus");
                if hides_focus {
                    issues.push(Issue::new(IssueType::FocusNotVisible, element.snippet()));
                }
            }
        }

        issues
    }
}

const FOCUSABLE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea", "img", "div", "span"];
const FOCUSABLE_ROLES: &[&str] = &["button", "link", "checkbox", "radio", "menuitem", "tab"];

/// Focusable elements whose inline style removes the focus indicator or the element itself.
pub struct FocusIndicatorChecker;

impl FocusIndicatorChecker {
    fn is_focusable(element: &ElementRef<'_>) -> bool {
        FOCUSABLE_TAGS.contains(&element.tag())
            || FOCUSABLE_ROLES.contains(&element.attr_or_empty("role"))
            || tabindex(element).is_some_and(|index| index >= 0)
    }
}

impl Checker for FocusIndicatorChecker {
    fn name(&self) -> &'static str {
        "FocusIndicator"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(Self::is_focusable)
            .filter(|el| {
                let style = compact_style_of(el);
                ["outline:none", "display:none", "visibility:hidden", "opacity:0"]
                    .iter()
                    .any(|rule| style.contains(rule))
            })
            .map(|el| Issue::new(IssueType::FocusIndicatorHidden, el.snippet()))
            .collect()
    }
}

const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "textarea", "select", "img", "div", "span"];
const INTERACTIVE_ROLES: &[&str] = &["button", "link", "menuitem", "tab"];
const EVENT_HANDLERS: &[&str] = &[
    "onclick", "onkeypress", "onkeydown", "onkeyup", "onmouseover", "onfocus", "onmousedown",
    "onmouseup",
];

/// Minimum target edge in CSS pixels.
const MIN_TARGET_PX: i64 = 24;

/// Interactive elements whose declared size is under the minimum target size.
///
/// Sizes come from inline `width`/`height` declarations, overridden by the attributes.
/// An undeclared dimension counts as zero.
pub struct TargetSizeChecker;

impl TargetSizeChecker {
    fn is_interactive(element: &ElementRef<'_>) -> bool {
        INTERACTIVE_TAGS.contains(&element.tag())
            || INTERACTIVE_ROLES.contains(&element.attr_or_empty("role"))
            || has_any_attr(element, EVENT_HANDLERS)
            || tabindex(element).is_some_and(|index| index >= 0)
    }

    fn declared_size(element: &ElementRef<'_>) -> (i64, i64) {
        let mut width = 0;
        let mut height = 0;

        let style = element.attr_or_empty("style").to_lowercase();
        for (name, value) in declarations(&style) {
            match name {
                "width" => width = parse_pixels(value).unwrap_or(0),
                "height" => height = parse_pixels(value).unwrap_or(0),
                _ => {}
            }
        }

        if let Some(w) = element.value().attr("width").and_then(parse_pixels) {
            width = w;
        }
        if let Some(h) = element.value().attr("height").and_then(parse_pixels) {
            height = h;
        }

        (width, height)
    }
}

impl Checker for TargetSizeChecker {
    fn name(&self) -> &'static str {
        "TargetSize"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(Self::is_interactive)
            .filter(|el| {
                let (width, height) = Self::declared_size(el);
                width < MIN_TARGET_PX || height < MIN_TARGET_PX
            })
            .map(|el| Issue::new(IssueType::ElementTooSmall, el.snippet()))
            .collect()
    }
}
