//! Forest-stand inventory parsing (takseerandmed)
//!
//! Stand detail pages come in two layouts. The full description is mostly
//! free text with the key figures on `name: value` lines; the short
//! description is a plain key/value table. Both may carry a species
//! composition table whose first tree story is aggregated into summary
//! fields.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::numeric::{self, parse_decimal};
use crate::species::species_name;
use crate::table::{self, HeaderStrip, Table, TableRow};
use crate::types::Record;
use crate::ParseError;

/// Present only on short inventory pages
const SHORT_LAYOUT_MARKER: &str = "Üldised takseerandmed";

static KATASTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"katastritunnus ([^,\s]+)").unwrap());
static ERALDIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"eraldis ([^,\s]+)").unwrap());
static KVARTAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"kvartal ([^,\s]+)").unwrap());

/// Parses a forest-stand detail page, dispatching on the layout marker.
///
/// Pages containing "Üldised takseerandmed" use the short layout; all
/// others use the full one.
pub fn parse_stand(page: &str) -> Result<Record, ParseError> {
    if page.contains(SHORT_LAYOUT_MARKER) {
        debug!("short inventory layout");
        parse_short(page)
    } else {
        debug!("full inventory layout");
        parse_full(page)
    }
}

/// Full inventory description: free-text metadata in the first table,
/// species composition in the third.
fn parse_full(page: &str) -> Result<Record, ParseError> {
    let tables = table::extract_tables(page, HeaderStrip::PrintButton)?;
    let text = tables[0].text.as_str();

    let mut rec = Record::new();

    let kataster = token(&KATASTER, text)
        .ok_or_else(|| ParseError::schema("katastritunnus token missing"))?;
    rec.insert("Katastritunnus", kataster);

    let eraldis =
        token(&ERALDIS, text).ok_or_else(|| ParseError::schema("eraldis token missing"))?;
    let eraldis: i64 = eraldis
        .parse()
        .map_err(|_| ParseError::schema(format!("eraldis is not an integer: {eraldis:?}")))?;
    rec.insert("Eraldise nr.", eraldis);

    rec.insert("Kvartali nr.", token(&KVARTAL, text).unwrap_or("-"));

    for line in text.lines() {
        let line = table::clean_text(line);
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        let value = value.replace(" ha", "");
        let mut key = key.to_string();
        // Standardize area fields on an explicit unit suffix
        if key.to_lowercase().contains("pindala") {
            key.push_str(" (ha)");
        }
        rec.insert(key, numeric::value_or_text(&value));
    }

    rec.insert("Täiskirjeldusega", true);

    let kooslus = tables
        .get(2)
        .ok_or_else(|| ParseError::schema("species composition table missing"))?;
    let shares = full_composition(kooslus)?;
    apply_composition(&mut rec, &shares)?;

    Ok(rec)
}

/// Short inventory description: a key/value table, optionally followed by a
/// composition table keyed by species code.
fn parse_short(page: &str) -> Result<Record, ParseError> {
    let tables = table::extract_tables(page, HeaderStrip::AllSpanning)?;

    let mut rec = Record::new();
    super::load_key_values(&tables[0], &mut rec);
    rec.insert("Täiskirjeldusega", false);

    let Some(kooslus) = tables.get(1) else {
        return Ok(rec);
    };
    if kooslus.data_rows().is_empty() {
        return Ok(rec);
    }

    let shares = short_composition(kooslus)?;
    apply_composition(&mut rec, &shares)?;

    Ok(rec)
}

/// One composition row of the first tree story
struct SpeciesShare {
    name: String,
    share: f64,
    height: f64,
    age: f64,
}

/// Full layout: header `Rinne | Puuliik | % | H | Vanus`, species by full
/// name, rows filtered to the first story ("Esimene").
fn full_composition(table: &Table) -> Result<Vec<SpeciesShare>, ParseError> {
    let header = table
        .rows
        .first()
        .ok_or_else(|| ParseError::schema("composition table has no header row"))?;
    let rinne = column(header, "Rinne")?;
    let liik = column(header, "Puuliik")?;
    let pct = column(header, "%")?;
    let height = column(header, "H")?;
    let age = column(header, "Vanus")?;

    let mut shares = Vec::new();
    for row in table.data_rows() {
        let Some(level) = row.cells.get(rinne) else {
            continue;
        };
        if !level.ends_with("Esimene") {
            continue;
        }
        shares.push(SpeciesShare {
            name: cell(row, liik)?.to_lowercase(),
            share: numeric_cell(row, pct)?,
            height: numeric_cell(row, height)?,
            age: numeric_cell(row, age)?,
        });
    }
    Ok(shares)
}

/// Short layout: header `Liik | % | H | A`, species by two-letter code,
/// every row belongs to the first story.
fn short_composition(table: &Table) -> Result<Vec<SpeciesShare>, ParseError> {
    let header = table
        .rows
        .first()
        .ok_or_else(|| ParseError::schema("composition table has no header row"))?;
    let liik = column(header, "Liik")?;
    let pct = column(header, "%")?;
    let height = column(header, "H")?;
    let age = column(header, "A")?;

    let mut shares = Vec::new();
    for row in table.data_rows() {
        let name = species_name(cell(row, liik)?)?.to_string();
        shares.push(SpeciesShare {
            name,
            share: numeric_cell(row, pct)?,
            height: numeric_cell(row, height)?,
            age: numeric_cell(row, age)?,
        });
    }
    Ok(shares)
}

/// Derives the three summary fields and the per-species triples.
///
/// `Pealiik` is the species with the largest share (first wins on ties),
/// `Kõrgus` and `Vanus` are share-weighted averages.
fn apply_composition(rec: &mut Record, shares: &[SpeciesShare]) -> Result<(), ParseError> {
    let mut dominant = shares
        .first()
        .ok_or_else(|| ParseError::schema("composition has no first-story rows"))?;
    for share in &shares[1..] {
        if share.share > dominant.share {
            dominant = share;
        }
    }

    rec.insert("Pealiik", dominant.name.clone());
    rec.insert(
        "Kõrgus",
        shares.iter().map(|s| s.height * s.share).sum::<f64>() / 100.0,
    );
    rec.insert(
        "Vanus",
        shares.iter().map(|s| s.age * s.share).sum::<f64>() / 100.0,
    );

    for share in shares {
        rec.insert(format!("{} %", share.name), share.share);
        rec.insert(format!("{} H", share.name), share.height);
        rec.insert(format!("{} A", share.name), share.age);
    }
    Ok(())
}

fn token<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn column(header: &TableRow, name: &str) -> Result<usize, ParseError> {
    header
        .cells
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| ParseError::schema(format!("composition column {name:?} missing")))
}

fn cell<'r>(row: &'r TableRow, index: usize) -> Result<&'r str, ParseError> {
    row.cells
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| ParseError::schema("composition row is short a column"))
}

fn numeric_cell(row: &TableRow, index: usize) -> Result<f64, ParseError> {
    let raw = cell(row, index)?;
    parse_decimal(raw)
        .map_err(|_| ParseError::schema(format!("non-numeric composition value {raw:?}")))
}
