mod aria;
mod forms;
mod keyboard;
mod media;
mod navigation;
mod sensory;
mod structure;
mod text;

pub use aria::{AriaRoleChecker, StatusMessageChecker};
pub use forms::{ErrorSuggestionChecker, HelpAvailableChecker, RedundantEntryChecker};
pub use keyboard::{
    FocusIndicatorChecker, KeyboardOperableChecker, KeyboardTrapChecker, TargetSizeChecker,
    VisibleFocusChecker,
};
pub use media::{AltTextChecker, CaptionsChecker};
pub use navigation::{
    DescriptiveLinkTextChecker, FocusOrderChecker, MultipleWaysChecker, PageTitleChecker,
};
pub use sensory::{NotJustColorChecker, SensoryCharacteristicsChecker, TextContrastChecker};
pub use structure::{
    ConsistentComponentsChecker, MeaningfulSequenceChecker, SemanticHtmlChecker,
    TimeLimitsChecker, ValidHtmlChecker,
};
pub use text::{LanguageChangeChecker, TextResizeChecker, TextSpacingChecker};
