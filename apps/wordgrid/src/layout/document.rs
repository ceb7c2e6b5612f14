//! Multi-page assembly: each page is rendered on its own, then the bodies
//! are spliced into the first page's shell with explicit page breaks.

use crate::layout::paginator::Page;
use crate::layout::template::{render_page, GridTemplate, PageContext, PageSpec};

pub const PAGE_BREAK: &str = r#"<div style="page-break-before: always;"></div>"#;

const BODY_OPEN: &str = "<body>";
const BODY_CLOSE: &str = "</body>";

/// Renders every page and joins them into one HTML document.
pub fn render_document(
    template: &GridTemplate,
    spec: &PageSpec,
    pages: &[Page],
    title: &str,
) -> String {
    let total_pages = pages.len();
    let rendered: Vec<String> = pages
        .iter()
        .map(|page| {
            render_page(
                template,
                spec,
                &page.cells,
                &PageContext {
                    title,
                    current_page: page.number,
                    total_pages,
                },
            )
        })
        .collect();

    assemble_document(&rendered)
}

/// Joins per-page documents. A single page is returned unchanged; otherwise
/// the head and styles come from the first page and every body follows in
/// order, separated by `PAGE_BREAK`.
pub fn assemble_document(pages: &[String]) -> String {
    match pages {
        [] => String::new(),
        [only] => only.clone(),
        [first, ..] => {
            let mut bodies: Vec<&str> = Vec::with_capacity(pages.len() * 2);
            for (i, page) in pages.iter().enumerate() {
                if i > 0 {
                    bodies.push(PAGE_BREAK);
                }
                bodies.push(body_of(page));
            }
            let combined = bodies.join("\n");

            match body_bounds(first) {
                Some((start, end)) => {
                    format!("{}{}{}", &first[..start], combined, &first[end..])
                }
                None => combined,
            }
        }
    }
}

/// Byte range of the content between `<body>` and `</body>`.
fn body_bounds(html: &str) -> Option<(usize, usize)> {
    let start = html.find(BODY_OPEN)? + BODY_OPEN.len();
    let end = start + html[start..].find(BODY_CLOSE)?;
    Some((start, end))
}

/// Body content of a page, or the whole string if it has no `<body>`.
fn body_of(html: &str) -> &str {
    match body_bounds(html) {
        Some((start, end)) => &html[start..end],
        None => html,
    }
}
