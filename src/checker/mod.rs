//! Accessibility rule engine.
//!
//! Each rule implements the `Checker` trait and owns exactly one `IssueType`.
//! Rules are grouped by the part of the page they inspect:
//! - **media**: alt text, captions
//! - **aria**: role validity, live regions
//! - **navigation**: titles, link text, skip links, tab order
//! - **keyboard**: keyboard operability, traps, focus visibility, target size
//! - **forms**: help text, error suggestions, redundant entry
//! - **structure**: semantic markup, reading order, consistency, time limits
//! - **sensory**: color reliance, sensory cues, contrast
//! - **text**: spacing, resizing, language changes
//!
//! `CheckerRegistry` holds the fixed, ordered rule set and fans one document out to all of them.

pub mod css;
pub mod language;
pub mod rules;

pub use language::{LanguageDetector, WhatlangDetector};

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::domain::models::Issue;
use crate::error::{AppError, Result};
use crate::extractor::Document;

/// A stateless accessibility rule.
///
/// `check` must be deterministic for a given document, perform no I/O and return
/// issues in document order with unassigned ids.
pub trait Checker: Send + Sync {
    /// Human-readable name for this checker.
    fn name(&self) -> &'static str;

    fn check(&self, document: &Document) -> Vec<Issue>;
}

/// Ordered, fixed set of checkers resolved at startup.
pub struct CheckerRegistry {
    checkers: Vec<Box<dyn Checker>>,
}

impl CheckerRegistry {
    pub fn new(checkers: Vec<Box<dyn Checker>>) -> Self {
        Self { checkers }
    }

    /// Every built-in rule, in reporting order.
    pub fn standard(detector: Arc<dyn LanguageDetector>) -> Self {
        use rules::*;

        Self::new(vec![
            Box::new(AltTextChecker),
            Box::new(AriaRoleChecker),
            Box::new(CaptionsChecker),
            Box::new(PageTitleChecker),
            Box::new(ConsistentComponentsChecker),
            Box::new(MeaningfulSequenceChecker),
            Box::new(DescriptiveLinkTextChecker),
            Box::new(ErrorSuggestionChecker),
            Box::new(FocusOrderChecker),
            Box::new(HelpAvailableChecker),
            Box::new(TargetSizeChecker),
            Box::new(KeyboardOperableChecker),
            Box::new(LanguageChangeChecker::new(detector)),
            Box::new(TextSpacingChecker),
            Box::new(MultipleWaysChecker),
            Box::new(KeyboardTrapChecker),
            Box::new(SensoryCharacteristicsChecker),
            Box::new(NotJustColorChecker),
            Box::new(RedundantEntryChecker),
            Box::new(SemanticHtmlChecker),
            Box::new(StatusMessageChecker),
            Box::new(TextContrastChecker),
            Box::new(TextResizeChecker),
            Box::new(TimeLimitsChecker),
            Box::new(ValidHtmlChecker),
            Box::new(VisibleFocusChecker),
            Box::new(FocusIndicatorChecker),
        ])
    }

    pub fn checker_names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Runs every checker against the same document and concatenates the results in
    /// registry order. A checker that panics fails the whole run; partial results are dropped.
    pub fn check_all(&self, document: &Document) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for checker in &self.checkers {
            let found = catch_unwind(AssertUnwindSafe(|| checker.check(document))).map_err(
                |payload| AppError::CheckerFault {
                    checker: checker.name(),
                    message: panic_message(payload.as_ref()),
                },
            )?;

            if !found.is_empty() {
                log::debug!("[CHECK] {} found {} issue(s)", checker.name(), found.len());
            }
            issues.extend(found);
        }

        Ok(issues)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "checker panicked".to_string()
    }
}
