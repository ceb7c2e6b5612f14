//! Page template: a stateless renderer turning one page of cells into HTML.
//!
//! Templates are plain values with `{placeholder}` slots; nothing is cached
//! between calls. Substitution is single-pass, so text inserted into a slot
//! is never re-scanned for placeholders.

use std::borrow::Cow;

use crate::layout::paginator::GridCell;

/// Physical page size and margin, injected into the `@page` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    /// CSS page size keyword, e.g. `A4`.
    pub size: &'static str,
    pub margin_cm: f32,
    /// Height of the 4×8 grid inside the margins. The page counter sits
    /// below it in the remaining space.
    pub grid_height_cm: f32,
}

impl Default for PageSpec {
    /// A4 with 1 cm margins.
    fn default() -> Self {
        Self {
            size: "A4",
            margin_cm: 1.0,
            grid_height_cm: 27.0,
        }
    }
}

/// Per-page values handed to the template.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub title: &'a str,
    pub current_page: usize,
    pub total_pages: usize,
}

/// The three fragments that make up a grid page.
///
/// - `document`: `{title}`, `{page_size}`, `{page_margin}`, `{grid_height}`,
///   `{cells}`, `{footer}`
/// - `image_cell`: `{index}`, `{word}`, `{media_type}`, `{data}`
/// - `empty_cell`: `{index}`, `{word}`
#[derive(Debug, Clone)]
pub struct GridTemplate {
    pub document: &'static str,
    pub image_cell: &'static str,
    pub empty_cell: &'static str,
}

impl Default for GridTemplate {
    fn default() -> Self {
        Self {
            document: GRID_DOCUMENT,
            image_cell: IMAGE_CELL,
            empty_cell: EMPTY_CELL,
        }
    }
}

const GRID_DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        @page {
            size: {page_size};
            margin: {page_margin};
        }

        @media print {
            body {
                -webkit-print-color-adjust: exact;
                print-color-adjust: exact;
            }
        }

        body {
            font-family: 'Helvetica', sans-serif;
            margin: 0;
            padding: 0;
        }

        .grid {
            display: grid;
            grid-template-columns: repeat(4, 1fr);
            grid-template-rows: repeat(8, 1fr);
            gap: 6px;
            height: {grid_height};
        }

        .cell {
            display: flex;
            flex-direction: column;
            position: relative;
            background-size: cover;
            background-position: center;
            background-repeat: no-repeat;
        }

        .cell:nth-child(1) { border-top-left-radius: 6px; }
        .cell:nth-child(4) { border-top-right-radius: 6px; }
        .cell:nth-child(29) { border-bottom-left-radius: 6px; }
        .cell:nth-child(32) { border-bottom-right-radius: 6px; }

        .cell.no-image {
            background: linear-gradient(135deg, #f8f9fa 0%, #e9ecef 100%);
        }

        .index {
            position: absolute;
            top: -1px;
            left: 0;
            background: white;
            color: black;
            font-size: 14px;
            padding: 2px 4px;
        }

        .word {
            font-size: 14pt;
            line-height: 2em;
            text-align: right;
            text-transform: capitalize;
            white-space: pre-line;
            padding: 5px 5px 0 0;
            color: white;
            paint-order: stroke fill;
            -webkit-text-stroke: 5px black;
        }

        .word.no-image-text {
            color: #2c3e50;
            -webkit-text-stroke: 0;
        }

        .page {
            position: relative;
            break-inside: avoid;
        }

        .footer {
            width: 100%;
            height: 0.6cm;
            display: flex;
            align-items: center;
            justify-content: center;
            font-size: 10pt;
            color: #666;
        }
    </style>
</head>
<body>
    <div class="page">
        <div class="grid">
{cells}
        </div>
        <div class="footer">{footer}</div>
    </div>
</body>
</html>
"#;

const IMAGE_CELL: &str = r#"        <div class="cell" style="background-image: url('data:image/{media_type};base64,{data}');">
            <div class="index">{index}</div>
            <div class="word">{word}</div>
        </div>"#;

const EMPTY_CELL: &str = r#"        <div class="cell no-image">
            <div class="index">{index}</div>
            <div class="word no-image-text">{word}</div>
        </div>"#;

/// Renders one page of cells into a complete HTML document.
pub fn render_page(
    template: &GridTemplate,
    spec: &PageSpec,
    cells: &[GridCell],
    context: &PageContext<'_>,
) -> String {
    let rendered_cells = cells
        .iter()
        .map(|cell| render_cell(template, cell))
        .collect::<Vec<_>>()
        .join("\n");

    let title = html_escape::encode_text(context.title).into_owned();
    let page_margin = format!("{}cm", spec.margin_cm);
    let grid_height = format!("{}cm", spec.grid_height_cm);
    let footer = format!("{:03}/{:03}", context.current_page, context.total_pages);

    fill(
        template.document,
        &[
            ("title", title.as_str()),
            ("page_size", spec.size),
            ("page_margin", page_margin.as_str()),
            ("grid_height", grid_height.as_str()),
            ("cells", rendered_cells.as_str()),
            ("footer", footer.as_str()),
        ],
    )
}

fn render_cell(template: &GridTemplate, cell: &GridCell) -> String {
    let index = format!("{:04}", cell.position);
    let word = display_word(&cell.word);

    match &cell.image {
        Some(image) => fill(
            template.image_cell,
            &[
                ("index", index.as_str()),
                ("word", word.as_str()),
                ("media_type", image.media_type.as_str()),
                ("data", image.data.as_str()),
            ],
        ),
        None => fill(
            template.empty_cell,
            &[("index", index.as_str()), ("word", word.as_str())],
        ),
    }
}

/// Escapes a word for HTML and puts each space-separated part on its own line.
fn display_word(word: &str) -> String {
    let escaped: Cow<'_, str> = html_escape::encode_text(word);
    escaped.replace(' ', "\n")
}

/// Single-pass `{key}` substitution. Unknown keys and braces that do not
/// enclose an identifier are copied through untouched.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let key_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let closes = after[key_len..].starts_with('}');

        match values.iter().find(|(k, _)| closes && key_len > 0 && *k == &after[..key_len]) {
            Some((_, value)) => {
                out.push_str(value);
                rest = &after[key_len + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
