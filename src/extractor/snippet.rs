//! Serializes an element back into a self-contained markup snippet for issue reports.

use scraper::{ElementRef, Node};

/// Elements that never carry children and are written self-closed.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub fn serialize(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&name) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            write_element(child_element, out);
        } else if let Node::Text(text) = child.value() {
            escape_into(text, false, out);
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(raw: &str, in_attribute: bool, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::extractor::{Document, ElementExt};

    fn first(html: &str, tag: &str) -> String {
        let document = Document::parse(html);
        let snippet = document.elements_by_tag(tag).next().unwrap().snippet();
        snippet
    }

    #[test]
    fn test_void_element_self_closes() {
        assert_eq!(first(r#"<img src="img_2.jpg">"#, "img"), r#"<img src="img_2.jpg"/>"#);
    }

    #[test]
    fn test_attributes_keep_source_order() {
        let html = r#"<head><meta http-equiv="refresh" content="5;url=/x"></head>"#;
        assert_eq!(first(html, "meta"), r#"<meta http-equiv="refresh" content="5;url=/x"/>"#);
    }

    #[test]
    fn test_empty_container_gets_closing_tag() {
        let html = r#"<div id="bad" onclick="doIt()"></div>"#;
        assert_eq!(first(html, "div"), r#"<div id="bad" onclick="doIt()"></div>"#);
    }

    #[test]
    fn test_nested_children_and_escaping() {
        let html = r#"<p title="a &quot;b&quot;">x &lt; <b>y</b><!-- c --></p>"#;
        assert_eq!(first(html, "p"), r#"<p title="a &quot;b&quot;">x &lt; <b>y</b></p>"#);
    }
}
