//! Table extraction from detail-page markup
//!
//! Detail pages are late-90s layout soup: tables nested inside table cells for
//! decoration, a fixed print-button header row stamped on top, inline scripts.
//! The extractor flattens that into an ordered list of independent tables so
//! the layout-specific parsers only ever see clean rows and text.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::ParseError;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());
static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static NOISE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script, style").unwrap());

/// Which two-column header cells to remove before extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStrip {
    /// Only the decorative print-button header emitted by the source system
    PrintButton,
    /// Every header cell spanning two columns (the short inventory layout
    /// uses them purely as section titles)
    AllSpanning,
}

/// One extracted table: its raw text content and its rows
#[derive(Debug, Clone)]
pub struct Table {
    /// Concatenated text content, whitespace as in the source markup
    pub text: String,
    pub rows: Vec<TableRow>,
}

/// One table row with whitespace-normalized cell texts
#[derive(Debug, Clone)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// Row contains `<th>` cells
    pub header: bool,
    /// Raw `class` attribute of the `<tr>`, if any
    pub class_attr: Option<String>,
}

impl TableRow {
    /// True if the row's `class` attribute contains the given marker class
    pub fn has_class(&self, marker: &str) -> bool {
        self.class_attr
            .as_deref()
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == marker))
    }
}

impl Table {
    /// Rows after the first one, i.e. the data rows of a header-first table
    pub fn data_rows(&self) -> &[TableRow] {
        if self.rows.len() > 1 {
            &self.rows[1..]
        } else {
            &[]
        }
    }
}

/// Extracts every table of an HTML fragment as an independent [`Table`],
/// in document order.
///
/// Script/style subtrees and the requested two-column header cells are
/// removed first, then nested tables are detached from their parents in
/// reverse document order so that an outer table's text is not polluted by
/// nested content and each nested table is returned on its own.
///
/// Fails with [`ParseError::MalformedPage`] when the fragment contains no
/// tables; detail pages always have at least one.
pub fn extract_tables(html: &str, strip: HeaderStrip) -> Result<Vec<Table>, ParseError> {
    let mut doc = Html::parse_document(html);

    let noise: Vec<_> = doc.select(&NOISE).map(|el| el.id()).collect();
    for id in noise {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let spanning: Vec<_> = doc
        .select(&TH)
        .filter(|th| th.value().attr("colspan") == Some("2"))
        .filter(|th| strip == HeaderStrip::AllSpanning || is_print_button(th))
        .map(|el| el.id())
        .collect();
    for id in spanning {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let tables: Vec<_> = doc.select(&TABLE).map(|el| el.id()).collect();
    if tables.is_empty() {
        return Err(ParseError::MalformedPage);
    }

    // Reverse document order: inner tables come loose before their parents
    for &id in tables.iter().rev() {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    Ok(tables
        .into_iter()
        .filter_map(|id| {
            let node = doc.tree.get(id)?;
            ElementRef::wrap(node).map(build_table)
        })
        .collect())
}

/// The source system stamps `<th colspan="2" id="grpHeader">` with a print
/// button onto every page; it is layout noise, not data.
fn is_print_button(th: &ElementRef) -> bool {
    th.value().attr("id") == Some("grpHeader")
}

fn build_table(table: ElementRef) -> Table {
    let mut rows = Vec::new();
    for tr in table.select(&TR) {
        let cells: Vec<String> = tr
            .select(&CELL)
            .map(|cell| clean_text(&cell.text().collect::<String>()))
            .collect();
        if cells.is_empty() {
            // Rows emptied by header stripping carry no information
            continue;
        }
        rows.push(TableRow {
            cells,
            header: tr.select(&TH).next().is_some(),
            class_attr: tr.value().attr("class").map(str::to_string),
        });
    }

    Table {
        text: table.text().collect(),
        rows,
    }
}

/// Collapses runs of whitespace to single spaces and trims
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
