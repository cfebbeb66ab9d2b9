use scraper::ElementRef;

use crate::checker::css::{self, class_or_id_contains};
use crate::checker::Checker;
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};

const ALTERNATIVE_TEXT_ATTRS: &[&str] = &["aria-label", "aria-labelledby", "title", "alt"];

/// At least two non-whitespace characters of text.
fn has_meaningful_text(element: &ElementRef<'_>) -> bool {
    element
        .text()
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace())
        .nth(1)
        .is_some()
}

fn has_labelling_attr(element: &ElementRef<'_>, attrs: &[&str]) -> bool {
    attrs
        .iter()
        .any(|attr| !element.attr_or_empty(attr).trim().is_empty())
}

const SENSORY_COLOR_WORDS: &[&str] = &[
    "red", "green", "blue", "yellow", "orange", "purple", "pink", "black", "white", "success",
    "error", "warning", "danger", "info", "primary", "secondary",
];
const POSITION_WORDS: &[&str] = &[
    "left", "right", "top", "bottom", "center", "middle", "first", "last", "above", "below",
];
const SHAPE_WORDS: &[&str] = &[
    "circle", "square", "triangle", "diamond", "arrow", "star", "heart", "round", "oval",
];
const SIZE_WORDS: &[&str] = &[
    "small", "large", "big", "tiny", "huge", "mini", "maxi", "compact", "expanded",
];

/// Text-less elements whose meaning is carried only by color, position, shape or size,
/// plus `audio` without any alternative.
pub struct SensoryCharacteristicsChecker;

impl SensoryCharacteristicsChecker {
    fn relies_on_sensory_cue(element: &ElementRef<'_>) -> bool {
        if has_meaningful_text(element) || has_labelling_attr(element, ALTERNATIVE_TEXT_ATTRS) {
            return false;
        }

        let style = css::style_of(element);
        [SENSORY_COLOR_WORDS, POSITION_WORDS, SHAPE_WORDS, SIZE_WORDS]
            .iter()
            .any(|words| class_or_id_contains(element, words))
            || style.contains("color:")
            || element.tag() == "audio"
    }
}

impl Checker for SensoryCharacteristicsChecker {
    fn name(&self) -> &'static str {
        "SensoryCharacteristics"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(Self::relies_on_sensory_cue)
            .map(|el| Issue::new(IssueType::NoSingleSensoryCharacteristic, el.snippet()))
            .collect()
    }
}

const COLOR_ONLY_WORDS: &[&str] = &[
    "red", "green", "blue", "yellow", "orange", "purple", "pink", "black", "white", "success",
    "error", "warning", "danger", "info", "primary", "secondary", "pass", "fail", "ok", "bad",
    "good", "positive", "negative", "active", "inactive",
];
const STATUS_ALTERNATIVE_ATTRS: &[&str] = &[
    "aria-label",
    "aria-labelledby",
    "title",
    "alt",
    "role",
];
const STATUS_DATA_ATTRS: &[&str] = &["data-status", "data-state", "data-type", "data-role"];
const COLOR_PROPERTIES: &[&str] = &["color", "background-color", "border-color"];
const OTHER_VISUAL_PROPERTIES: &[&str] = &[
    "border",
    "border-style",
    "border-width",
    "outline",
    "text-decoration",
    "font-weight",
    "font-style",
    "text-transform",
    "background-image",
    "box-shadow",
    "text-shadow",
    "opacity",
    "visibility",
    "display",
];

/// Status conveyed through color alone, by class, id or inline style.
pub struct NotJustColorChecker;

impl NotJustColorChecker {
    fn has_other_indicator(element: &ElementRef<'_>, style: &str) -> bool {
        has_labelling_attr(element, STATUS_ALTERNATIVE_ATTRS)
            || STATUS_DATA_ATTRS.iter().any(|attr| element.has_attr(attr))
            || css::declarations(style).any(|(name, _)| OTHER_VISUAL_PROPERTIES.contains(&name))
    }

    fn uses_color_only(element: &ElementRef<'_>) -> bool {
        if has_meaningful_text(element) {
            return false;
        }
        let style = css::style_of(element);
        if Self::has_other_indicator(element, &style) {
            return false;
        }

        class_or_id_contains(element, COLOR_ONLY_WORDS)
            || css::declarations(&style).any(|(name, _)| COLOR_PROPERTIES.contains(&name))
    }
}

impl Checker for NotJustColorChecker {
    fn name(&self) -> &'static str {
        "NotJustColor"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(Self::uses_color_only)
            .map(|el| Issue::new(IssueType::NotJustColor, el.snippet()))
            .collect()
    }
}

pub const MINIMUM_CONTRAST_RATIO: f64 = 4.5;

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("pink", [255, 192, 203]),
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// Text whose resolved foreground and background colors fall below a 4.5:1 contrast ratio.
pub struct TextContrastChecker;

impl TextContrastChecker {
    /// Named colors and `#rgb`/`#rrggbb` hex. Anything else resolves to black.
    fn to_rgb(value: &str) -> [u8; 3] {
        let value = value.trim().to_lowercase();
        if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == value) {
            return *rgb;
        }
        value
            .strip_prefix('#')
            .and_then(parse_hex)
            .unwrap_or(BLACK)
    }

    /// First named color mentioned by a class/id hint such as `text-red` or `red-bg`.
    fn hinted_color(attr: &str, prefixes: &[&str], suffix: &str) -> Option<[u8; 3]> {
        NAMED_COLORS.iter().find_map(|(name, rgb)| {
            let hinted = prefixes
                .iter()
                .any(|prefix| attr.contains(&format!("{prefix}{name}")))
                || attr.contains(&format!("{name}{suffix}"));
            hinted.then_some(*rgb)
        })
    }

    fn resolve(
        element: &ElementRef<'_>,
        property: &str,
        prefixes: &[&str],
        suffix: &str,
        default: [u8; 3],
    ) -> [u8; 3] {
        let style = css::style_of(element);
        if let Some(value) = css::first_declared(&style, property) {
            return Self::to_rgb(value);
        }
        let (class, id) = css::class_and_id(element);
        Self::hinted_color(&class, prefixes, suffix)
            .or_else(|| Self::hinted_color(&id, prefixes, suffix))
            .unwrap_or(default)
    }

    fn foreground(element: &ElementRef<'_>) -> [u8; 3] {
        Self::resolve(element, "color", &["text-", "color-"], "-text", BLACK)
    }

    fn background(element: &ElementRef<'_>) -> [u8; 3] {
        Self::resolve(element, "background-color", &["bg-", "background-"], "-bg", WHITE)
    }
}

impl Checker for TextContrastChecker {
    fn name(&self) -> &'static str {
        "TextContrast"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| el.trimmed_text().chars().count() >= 2)
            .filter(|el| {
                contrast_ratio(Self::foreground(el), Self::background(el)) < MINIMUM_CONTRAST_RATIO
            })
            .map(|el| Issue::new(IssueType::TextContrastViolation, el.snippet()))
            .collect()
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                rgb[i] = channel(&c.to_string().repeat(2))?;
            }
            Some(rgb)
        }
        6 if hex.is_ascii() => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        _ => None,
    }
}

/// WCAG 2 relative luminance.
fn relative_luminance(rgb: [u8; 3]) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(rgb[0]) + 0.7152 * linear(rgb[1]) + 0.0722 * linear(rgb[2])
}

pub fn contrast_ratio(a: [u8; 3], b: [u8; 3]) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (lighter, darker) = if la > lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}
