//! Guide page → [`Document`] extraction.
//!
//! A Steam guide page lays its content out as a `div.guide.subSections`
//! container holding one `div.subSection.detailBox` per section. Each box has
//! an optional `div.subSectionTitle` and a `div.subSectionDesc` body whose
//! line structure is carried by `<br>` tags.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use steam_mcp_core::{Document, Section};

struct GuideSelectors {
    container: Selector,
    section: Selector,
    title: Selector,
    body: Selector,
}

fn selector(css: &str) -> Selector {
    match Selector::parse(css) {
        Ok(selector) => selector,
        Err(err) => panic!("guide selector {css:?} is invalid: {err}"),
    }
}

static SELECTORS: LazyLock<GuideSelectors> = LazyLock::new(|| GuideSelectors {
    container: selector("div.guide.subSections"),
    section: selector("div.subSection.detailBox"),
    title: selector("div.subSectionTitle"),
    body: selector("div.subSectionDesc"),
});

/// Elements that start a new line in the rendered body.
const BLOCK_ELEMENTS: &[&str] = &[
    "div", "p", "li", "ul", "ol", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "tr",
];

/// Extract the sections of a guide page.
///
/// Returns `None` when the page has no section container at all (not a
/// guide, or a removed one). A container with no sections yields an empty
/// document.
pub fn extract_document(html: &str) -> Option<Document> {
    let page = Html::parse_document(html);
    let container = page.select(&SELECTORS.container).next()?;

    let sections = container
        .select(&SELECTORS.section)
        .map(|section_box| {
            let title = section_box
                .select(&SELECTORS.title)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty());
            let body = section_box
                .select(&SELECTORS.body)
                .next()
                .map(body_text)
                .unwrap_or_default();
            Section::new(title, body)
        })
        .collect();

    Some(Document::new(sections))
}

/// Body text with `<br>` and block boundaries as line breaks; each line
/// trimmed and blank lines dropped.
fn body_text(body: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(body, &mut raw);
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if name == "br" {
                out.push('\n');
            } else if BLOCK_ELEMENTS.contains(&name) {
                out.push('\n');
                push_text(child_el, out);
                out.push('\n');
            } else {
                push_text(child_el, out);
            }
        }
    }
}
