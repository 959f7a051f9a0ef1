//! Forest-notification parsing (metsateatis)
//!
//! A notification page lists general information and a table of planned work
//! orders. The page may cover several polygons; only the row highlighted
//! with the "selected" marker class applies to the polygon being parsed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::numeric::{self, parse_decimal};
use crate::table::{self, HeaderStrip, Table};
use crate::types::{Record, Value};
use crate::ParseError;

/// Marker class of the work-order row that applies to this polygon
const SELECTED_MARKER: &str = "selected";

/// Quarter numbers may be non-numeric ("KV108"), keep them as raw text
const QUARTER_COLUMN: &str = "Kv";

const WORK_FIELD: &str = "Töö";
const VOLUME_MARKER: &str = " tm";

/// `<work type> <amount> tm` with an optional trailing seed-tree clause
static WORK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<too>.+?)\s+(?P<maht>\d[\d\s.,]*)\s*tm(?:\s*\(seemnepuud\s+(?P<tk>\d+)\s*tk\))?\s*$")
        .unwrap()
});

/// Parses a forest-notification detail page into one attribute record:
/// the general-info table merged with the selected work-order row.
pub fn parse_notification(page: &str) -> Result<Record, ParseError> {
    let tables = table::extract_tables(page, HeaderStrip::PrintButton)?;

    let mut rec = Record::new();
    super::load_key_values(&tables[0], &mut rec);

    let orders = tables
        .get(1)
        .ok_or_else(|| ParseError::schema("work-order table missing"))?;
    let mut work = work_order_record(orders)?;
    decompose_work_description(&mut work);
    work.rename("Er", "Eraldis");
    work.rename("P", "Pindala (ha)");

    rec.extend(work);
    Ok(rec)
}

/// Reduces the work-order table to its header plus the one selected row and
/// loads that row as a record.
fn work_order_record(table: &Table) -> Result<Record, ParseError> {
    let rows: Vec<_> = table
        .rows
        .iter()
        .filter(|row| row.header || row.has_class(SELECTED_MARKER))
        .collect();

    let header = rows
        .iter()
        .find(|row| row.header)
        .ok_or_else(|| ParseError::schema("work-order header row missing"))?;
    let selected = rows
        .iter()
        .find(|row| !row.header)
        .ok_or_else(|| ParseError::schema("selected work-order row missing"))?;

    let mut rec = Record::new();
    for (index, name) in header.cells.iter().enumerate() {
        let Some(value) = selected.cells.get(index) else {
            continue;
        };
        if name == QUARTER_COLUMN {
            rec.insert(name.clone(), value.clone());
        } else {
            rec.insert(name.clone(), numeric::value_or_text(value));
        }
    }
    Ok(rec)
}

/// Splits the free-text work description into work type, volume and
/// seed-tree count.
///
/// Descriptions without a volume clause, and ones whose volume clause does
/// not match the expected shape, keep the raw text; the derived fields are
/// then set to the missing-value marker instead of failing the record.
fn decompose_work_description(rec: &mut Record) {
    let Some(desc) = rec.get(WORK_FIELD).and_then(Value::as_str).map(str::to_string) else {
        return;
    };

    if !desc.contains(VOLUME_MARKER) {
        rec.insert("Maht (tm)", Value::Missing);
        rec.insert("Seemnepuid", Value::Missing);
        return;
    }

    let parsed = WORK.captures(&desc).and_then(|caps| {
        let work = caps.name("too")?.as_str().to_string();
        let amount = parse_decimal(caps.name("maht")?.as_str()).ok()?;
        let seed = caps.name("tk").and_then(|m| m.as_str().parse::<f64>().ok());
        Some((work, amount, seed))
    });

    match parsed {
        Some((work, amount, seed)) => {
            rec.insert(WORK_FIELD, work);
            rec.insert("Maht (tm)", amount);
            rec.insert("Seemnepuid", seed.map(Value::Float).unwrap_or(Value::Missing));
        }
        None => {
            warn!(description = %desc, "unparseable work description, keeping raw text");
            rec.insert("Maht (tm)", Value::Missing);
            rec.insert("Seemnepuid", Value::Missing);
        }
    }
}
