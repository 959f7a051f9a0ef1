//! GeoJSON export
//!
//! Writes an enriched table as a FeatureCollection with an explicit
//! EPSG:3301 CRS member. Attribute columns are the table's column union, so
//! every feature carries the same property set with `null` for fields its
//! detail page did not have.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use metsainfo::Value;
use tracing::info;

use crate::enrich::EnrichedTable;
use crate::layer::CRS_EPSG;

/// Writes the table to `path` as a GeoJSON FeatureCollection
pub fn write_geojson(table: &EnrichedTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    write!(
        out,
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::{CRS_EPSG}"}}}},"features":["#
    )?;
    for (i, feature) in table.features.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        write!(out, "{{\"type\":\"Feature\",\"id\":\"{}\",", escape_json(&feature.id))?;

        let mut geom_buf = Vec::new();
        let mut writer = GeoJsonWriter::new(&mut geom_buf);
        feature
            .geometry
            .process_geom(&mut writer)
            .with_context(|| format!("failed to encode geometry of feature {}", feature.id))?;
        out.write_all(b"\"geometry\":")?;
        out.write_all(&geom_buf)?;

        out.write_all(b",\"properties\":{")?;
        let mut first = true;
        if let Some(label) = &feature.label {
            write!(out, "\"label\":\"{}\"", escape_json(label))?;
            first = false;
        }
        if let Some(url) = &feature.url {
            if !first {
                out.write_all(b",")?;
            }
            write!(out, "\"url\":\"{}\"", escape_json(url))?;
            first = false;
        }
        for column in &table.columns {
            if !first {
                out.write_all(b",")?;
            }
            write!(out, "\"{}\":", escape_json(column))?;
            write_value(&mut out, feature.attributes.get(column))?;
            first = false;
        }
        out.write_all(b"}}")?;
    }
    out.write_all(b"]}")?;
    out.flush()?;

    info!(count = table.features.len(), path = %path.display(), "wrote GeoJSON");
    Ok(())
}

fn write_value(out: &mut impl Write, value: Option<&Value>) -> Result<()> {
    match value {
        Some(Value::Text(s)) => write!(out, "\"{}\"", escape_json(s))?,
        Some(Value::Float(f)) if f.is_finite() => write!(out, "{f}")?,
        Some(Value::Int(i)) => write!(out, "{i}")?,
        Some(Value::Bool(b)) => write!(out, "{b}")?,
        _ => out.write_all(b"null")?,
    }
    Ok(())
}

fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
