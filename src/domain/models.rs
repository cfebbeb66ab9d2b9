//! Scan domain entities: web pages, scans, issues and links.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id carried by issues and links that have not been persisted yet.
pub const UNASSIGNED_ID: i64 = -1;

// ====== Enums ======

/// Closed taxonomy of accessibility violations.
///
/// Persisted by name, so variants may be added but never renamed or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    AltTextMissing,
    AriaRoleMissingOrInvalid,
    CaptionsForVideoAudioMissing,
    ClearPageTitles,
    ComponentsNotConsistent,
    ContentMeaningfulSequenceViolation,
    DescriptiveLinkText,
    ElementTooSmall,
    ErrorSuggestionNotProvided,
    FocusIndicatorHidden,
    FocusNotVisible,
    FocusOrderLogical,
    HelpNotAvailable,
    InvalidHtml,
    KeyboardOperable,
    LanguageChangeNotMarked,
    LineHeightSpacingViolation,
    MultipleWaysToNavigate,
    NotJustColor,
    NoKeyboardTraps,
    NoSingleSensoryCharacteristic,
    RedundantEntry,
    SampleIssue,
    SemanticHtmlMissing,
    StatusMessageMissing,
    TextContrastViolation,
    TextResizeViolation,
    TimeLimits,
}

impl IssueType {
    pub const ALL: [IssueType; 28] = [
        IssueType::AltTextMissing,
        IssueType::AriaRoleMissingOrInvalid,
        IssueType::CaptionsForVideoAudioMissing,
        IssueType::ClearPageTitles,
        IssueType::ComponentsNotConsistent,
        IssueType::ContentMeaningfulSequenceViolation,
        IssueType::DescriptiveLinkText,
        IssueType::ElementTooSmall,
        IssueType::ErrorSuggestionNotProvided,
        IssueType::FocusIndicatorHidden,
        IssueType::FocusNotVisible,
        IssueType::FocusOrderLogical,
        IssueType::HelpNotAvailable,
        IssueType::InvalidHtml,
        IssueType::KeyboardOperable,
        IssueType::LanguageChangeNotMarked,
        IssueType::LineHeightSpacingViolation,
        IssueType::MultipleWaysToNavigate,
        IssueType::NotJustColor,
        IssueType::NoKeyboardTraps,
        IssueType::NoSingleSensoryCharacteristic,
        IssueType::RedundantEntry,
        IssueType::SampleIssue,
        IssueType::SemanticHtmlMissing,
        IssueType::StatusMessageMissing,
        IssueType::TextContrastViolation,
        IssueType::TextResizeViolation,
        IssueType::TimeLimits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::AltTextMissing => "ALT_TEXT_MISSING",
            IssueType::AriaRoleMissingOrInvalid => "ARIA_ROLE_MISSING_OR_INVALID",
            IssueType::CaptionsForVideoAudioMissing => "CAPTIONS_FOR_VIDEO_AUDIO_MISSING",
            IssueType::ClearPageTitles => "CLEAR_PAGE_TITLES",
            IssueType::ComponentsNotConsistent => "COMPONENTS_NOT_CONSISTENT",
            IssueType::ContentMeaningfulSequenceViolation => "CONTENT_MEANINGFUL_SEQUENCE_VIOLATION",
            IssueType::DescriptiveLinkText => "DESCRIPTIVE_LINK_TEXT",
            IssueType::ElementTooSmall => "ELEMENT_TOO_SMALL",
            IssueType::ErrorSuggestionNotProvided => "ERROR_SUGGESTION_NOT_PROVIDED",
            IssueType::FocusIndicatorHidden => "FOCUS_INDICATOR_HIDDEN",
            IssueType::FocusNotVisible => "FOCUS_NOT_VISIBLE",
            IssueType::FocusOrderLogical => "FOCUS_ORDER_LOGICAL",
            IssueType::HelpNotAvailable => "HELP_NOT_AVAILABLE",
            IssueType::InvalidHtml => "INVALID_HTML",
            IssueType::KeyboardOperable => "KEYBOARD_OPERABLE",
            IssueType::LanguageChangeNotMarked => "LANGUAGE_CHANGE_NOT_MARKED",
            IssueType::LineHeightSpacingViolation => "LINE_HEIGHT_SPACING_VIOLATION",
            IssueType::MultipleWaysToNavigate => "MULTIPLE_WAYS_TO_NAVIGATE",
            IssueType::NotJustColor => "NOT_JUST_COLOR",
            IssueType::NoKeyboardTraps => "NO_KEYBOARD_TRAPS",
            IssueType::NoSingleSensoryCharacteristic => "NO_SINGLE_SENSORY_CHARACTERISTIC",
            IssueType::RedundantEntry => "REDUNDANT_ENTRY",
            IssueType::SampleIssue => "SAMPLE_ISSUE",
            IssueType::SemanticHtmlMissing => "SEMANTIC_HTML_MISSING",
            IssueType::StatusMessageMissing => "STATUS_MESSAGE_MISSING",
            IssueType::TextContrastViolation => "TEXT_CONTRAST_VIOLATION",
            IssueType::TextResizeViolation => "TEXT_RESIZE_VIOLATION",
            IssueType::TimeLimits => "TIME_LIMITS",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown issue type: {}", s))
    }
}

// ====== Entities ======

/// A URL tracked by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    pub id: i64,
    pub account_id: i64,
    pub url: String,
}

/// Immutable snapshot of one fetch-and-check run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub id: i64,
    pub web_page_id: i64,
    pub time_scanned: DateTime<Utc>,
    pub html_content: String,
}

/// One concrete violation instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: i64,
    pub scan_id: i64,
    pub issue_type: IssueType,
    pub html_snippet: String,
}

impl Issue {
    /// A freshly detected issue, not yet tied to a scan.
    pub fn new(issue_type: IssueType, html_snippet: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            scan_id: UNASSIGNED_ID,
            issue_type,
            html_snippet: html_snippet.into(),
        }
    }

    pub fn with_scan_id(self, scan_id: i64) -> Self {
        Self { scan_id, ..self }
    }

    pub fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID && self.scan_id != UNASSIGNED_ID
    }
}

/// An outbound href found verbatim in an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: i64,
    pub scan_id: i64,
    pub link: String,
}

/// Everything a completed scan produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan: Scan,
    pub issues: Vec<Issue>,
    pub links: Vec<Link>,
}
