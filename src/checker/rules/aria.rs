use crate::checker::Checker;
use crate::domain::models::{Issue, IssueType};
use crate::extractor::{Document, ElementExt};

/// WAI-ARIA 1.2 role names accepted in a `role` attribute.
const VALID_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "button", "cell", "checkbox",
    "columnheader", "combobox", "complementary", "contentinfo", "definition", "dialog",
    "directory", "document", "feed", "figure", "form", "grid", "gridcell", "group", "heading",
    "img", "link", "list", "listbox", "listitem", "log", "main", "marquee", "math", "menu",
    "menubar", "menuitem", "menuitemcheckbox", "menuitemradio", "navigation", "note", "option",
    "presentation", "progressbar", "radio", "radiogroup", "region", "row", "rowgroup",
    "rowheader", "scrollbar", "search", "searchbox", "separator", "slider", "spinbutton",
    "status", "switch", "tab", "table", "tablist", "tabpanel", "textbox", "timer", "toolbar",
    "tooltip", "tree", "treegrid", "treeitem",
];

/// Implicit role of elements whose semantics are built in.
fn native_role(tag: &str) -> Option<&'static str> {
    let role = match tag {
        "a" => "link",
        "button" => "button",
        "input" => "textbox",
        "select" => "listbox",
        "textarea" => "textbox",
        "img" => "img",
        "table" => "table",
        "th" => "columnheader",
        "td" => "cell",
        "ul" | "ol" => "list",
        "li" => "listitem",
        "form" => "form",
        "header" => "banner",
        "footer" => "contentinfo",
        "main" => "main",
        "nav" => "navigation",
        "section" => "region",
        "article" => "article",
        "aside" => "complementary",
        "dialog" => "dialog",
        "progress" => "progressbar",
        "fieldset" | "details" => "group",
        "legend" => "heading",
        "output" => "status",
        "summary" => "button",
        "video" | "audio" | "canvas" => "application",
        "svg" => "img",
        "math" => "math",
        _ => return None,
    };
    Some(role)
}

/// Missing, unknown or conflicting roles and empty `aria-*` attributes.
///
/// One element may produce several issues, one per rule it breaks.
pub struct AriaRoleChecker;

impl Checker for AriaRoleChecker {
    fn name(&self) -> &'static str {
        "AriaRole"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        let mut issues = Vec::new();

        for element in document.elements() {
            let tag = element.tag();
            let role = element.attr_or_empty("role").trim().to_lowercase();
            let snippet = element.snippet();

            if matches!(tag, "div" | "span" | "p") && role.is_empty() {
                issues.push(Issue::new(IssueType::AriaRoleMissingOrInvalid, snippet.clone()));
            }

            if !role.is_empty() && !VALID_ROLES.contains(&role.as_str()) {
                issues.push(Issue::new(IssueType::AriaRoleMissingOrInvalid, snippet.clone()));
            }

            if let Some(native) = native_role(tag) {
                if !role.is_empty() && role != native {
                    issues.push(Issue::new(IssueType::AriaRoleMissingOrInvalid, snippet.clone()));
                }
            }

            for (name, value) in element.value().attrs() {
                if name.starts_with("aria-") && value.trim().is_empty() {
                    issues.push(Issue::new(IssueType::AriaRoleMissingOrInvalid, snippet.clone()));
                }
            }
        }

        issues
    }
}

/// Visible text that is not announced through a live region.
pub struct StatusMessageChecker;

impl Checker for StatusMessageChecker {
    fn name(&self) -> &'static str {
        "StatusMessage"
    }

    fn check(&self, document: &Document) -> Vec<Issue> {
        document
            .elements()
            .filter(|el| el.has_text())
            .filter(|el| {
                let role = el.attr_or_empty("role");
                let live = el.attr_or_empty("aria-live");
                let is_live_region = role.eq_ignore_ascii_case("status")
                    || role.eq_ignore_ascii_case("alert")
                    || live.eq_ignore_ascii_case("polite")
                    || live.eq_ignore_ascii_case("assertive");
                !is_live_region
            })
            .filter(|el| {
                let style = el.attr_or_empty("style");
                let hidden = style.contains("display:none")
                    || style.contains("visibility:hidden")
                    || el.attr_or_empty("aria-hidden").eq_ignore_ascii_case("true");
                !hidden
            })
            .map(|el| Issue::new(IssueType::StatusMessageMissing, el.snippet()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippets(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.html_snippet.as_str()).collect()
    }

    #[test]
    fn test_invalid_and_conflicting_roles() {
        let html = r#"<body>
            <section role="banana">x</section>
            <nav role="navigation">ok</nav>
            <a href="/" role="button">Go</a>
            <ul role="LIST"><li>ok</li></ul>
        </body>"#;
        let document = Document::parse(html);
        let issues = AriaRoleChecker.check(&document);

        // "banana" is unknown and conflicts with the native region role
        assert_eq!(
            snippets(&issues),
            vec![
                r#"<section role="banana">x</section>"#,
                r#"<section role="banana">x</section>"#,
                r#"<a href="/" role="button">Go</a>"#,
            ]
        );
    }

    #[test]
    fn test_generic_containers_need_a_role() {
        let html = r#"<body><div>a</div><span role="note">b</span><p role=" Status ">c</p></body>"#;
        let document = Document::parse(html);
        let issues = AriaRoleChecker.check(&document);

        assert_eq!(snippets(&issues), vec!["<div>a</div>"]);
    }

    #[test]
    fn test_empty_aria_attribute() {
        let html = r#"<body><button aria-label=" " aria-pressed="false">B</button></body>"#;
        let document = Document::parse(html);
        let issues = AriaRoleChecker.check(&document);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::AriaRoleMissingOrInvalid);
    }

    #[test]
    fn test_live_regions_and_hidden_text_are_skipped() {
        let html = r#"<html><head></head><body role="status">
            <div role="alert">Saved</div>
            <div aria-live="POLITE">Loading</div>
            <div style="display:none">Hidden</div>
            <div aria-hidden="true">Also hidden</div>
        </body></html>"#;
        let document = Document::parse(html);
        let issues = StatusMessageChecker.check(&document);

        // only the root element carries unannounced text
        assert_eq!(issues.len(), 1);
        assert!(issues[0].html_snippet.starts_with("<html>"));
    }
}
