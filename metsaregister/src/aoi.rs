//! Area-of-interest loading
//!
//! The AOI comes in as a GeoJSON file in EPSG:3301. All polygonal geometries
//! found in it are unioned into one MultiPolygon and handed to the service as
//! a single WKT request area.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::{BooleanOps, Geometry, MultiPolygon, Polygon};
use geojson::GeoJson;
use wkt::ToWkt;

/// Reads the AOI file and returns its union as a WKT string
pub fn read_aoi(path: &Path) -> Result<String> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read AOI file {}", path.display()))?;
    let geojson: GeoJson = body
        .parse()
        .with_context(|| format!("failed to parse {} as GeoJSON", path.display()))?;

    let polygons = collect_polygons(&geojson)?;
    if polygons.is_empty() {
        bail!("AOI file {} contains no polygons", path.display());
    }

    let union = polygons[1..].iter().fold(
        MultiPolygon(vec![polygons[0].clone()]),
        |acc, polygon| acc.union(&MultiPolygon(vec![polygon.clone()])),
    );
    Ok(union.wkt_string())
}

fn collect_polygons(geojson: &GeoJson) -> Result<Vec<Polygon>> {
    let mut polygons = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                if let Some(geometry) = &feature.geometry {
                    push_polygons(geometry, &mut polygons)?;
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                push_polygons(geometry, &mut polygons)?;
            }
        }
        GeoJson::Geometry(geometry) => push_polygons(geometry, &mut polygons)?,
    }
    Ok(polygons)
}

fn push_polygons(geometry: &geojson::Geometry, out: &mut Vec<Polygon>) -> Result<()> {
    let geometry: Geometry<f64> = geometry
        .try_into()
        .context("failed to convert GeoJSON geometry")?;
    match geometry {
        Geometry::Polygon(polygon) => out.push(polygon),
        Geometry::MultiPolygon(multi) => out.extend(multi),
        other => bail!("AOI must be polygonal, found {other:?}"),
    }
    Ok(())
}
