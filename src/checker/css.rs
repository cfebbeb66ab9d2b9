//! Helpers for reading inline style declarations and class/id keyword hints.

use scraper::ElementRef;

use crate::extractor::ElementExt;

/// A CSS length with its unit family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    /// `em` or `rem`
    Em(f64),
    /// Unitless number
    Number(f64),
}

/// Lowercased inline style of an element.
pub fn style_of(element: &ElementRef<'_>) -> String {
    element.attr_or_empty("style").to_lowercase()
}

/// Lowercased style with all whitespace removed, so `outline: none` reads as `outline:none`.
pub fn compact_style_of(element: &ElementRef<'_>) -> String {
    element
        .attr_or_empty("style")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// `(property, value)` pairs of a style string, trimmed, in source order.
pub fn declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(name, value)| (name.trim(), value.trim()))
}

/// Values of every declaration of `property`, in source order.
pub fn declared_values<'a>(style: &'a str, property: &'a str) -> impl Iterator<Item = &'a str> {
    declarations(style)
        .filter(move |(name, _)| *name == property)
        .map(|(_, value)| value)
}

pub fn first_declared<'a>(style: &'a str, property: &'a str) -> Option<&'a str> {
    declared_values(style, property).next()
}

/// Parses `12px`, `1.5em`, `1.5rem` or a bare number. Anything else is `None`.
pub fn parse_length(value: &str) -> Option<Length> {
    let value = value.trim();
    if let Some(px) = value.strip_suffix("px") {
        return px.trim().parse().ok().map(Length::Px);
    }
    if let Some(em) = value.strip_suffix("rem").or_else(|| value.strip_suffix("em")) {
        return em.trim().parse().ok().map(Length::Em);
    }
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return value.parse().ok().map(Length::Number);
    }
    None
}

/// Integer pixel size from `24`, `24px` or ` 24 `. Unparseable input yields `None`.
pub fn parse_pixels(value: &str) -> Option<i64> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim();
    value.parse().ok()
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Lowercased `class` and `id` of an element.
pub fn class_and_id(element: &ElementRef<'_>) -> (String, String) {
    (
        element.attr_or_empty("class").to_lowercase(),
        element.attr_or_empty("id").to_lowercase(),
    )
}

/// True when the class or the id mentions any of the keywords.
pub fn class_or_id_contains(element: &ElementRef<'_>, keywords: &[&str]) -> bool {
    let (class, id) = class_and_id(element);
    contains_any(&class, keywords) || contains_any(&id, keywords)
}
