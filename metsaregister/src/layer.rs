//! Layer-query response decoding
//!
//! The registry answers layer queries with a small XML document listing the
//! intersecting objects, each with a WKT geometry and an optional
//! percent-encoded detail-page URL.

use anyhow::{anyhow, bail, Context, Result};
use geo::{Geometry, MultiPolygon};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use wkt::TryFromWkt;

use metsainfo::Record;

/// L-EST97, the projected CRS everything upstream lives in
pub const CRS_EPSG: u32 = 3301;

/// Response body marker for an AOI that intersects nothing
const EMPTY_RESPONSE_MARKER: &str = ">0 objects<";

/// One geometry feature returned by a layer query
#[derive(Debug, Clone)]
pub struct Feature {
    /// Opaque object id, unique within a layer response
    pub id: String,
    pub geometry: Geometry,
    pub label: Option<String>,
    /// Detail-page URL, percent-decoded, relative to the service base
    pub url: Option<String>,
    /// Parsed detail-page attributes, filled in by the enrichment driver
    pub attributes: Record,
}

#[derive(Debug, Deserialize)]
struct Objects {
    #[serde(rename = "obj", default)]
    objects: Vec<Obj>,
}

#[derive(Debug, Deserialize)]
struct Obj {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@label", default)]
    label: Option<String>,
    #[serde(default)]
    wkt: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Decodes a layer-query response into features.
///
/// An empty response short-circuits to an empty vec; the endpoint reports it
/// with a "0 objects" body rather than an empty list.
pub fn parse_layer_response(xml: &str) -> Result<Vec<Feature>> {
    if xml.contains(EMPTY_RESPONSE_MARKER) {
        return Ok(Vec::new());
    }

    let objects: Objects =
        quick_xml::de::from_str(xml).context("failed to decode layer response XML")?;

    let mut features = Vec::with_capacity(objects.objects.len());
    for obj in objects.objects {
        let wkt_str = obj
            .wkt
            .as_deref()
            .ok_or_else(|| anyhow!("feature {} has no geometry", obj.id))?;
        let geometry = Geometry::try_from_wkt_str(wkt_str)
            .map_err(|e| anyhow!("invalid WKT for feature {}: {e}", obj.id))?;
        let geometry =
            coerce_to_areal(geometry).with_context(|| format!("feature {}", obj.id))?;
        let url = obj
            .url
            .map(|u| percent_decode_str(&u).decode_utf8_lossy().into_owned());

        features.push(Feature {
            id: obj.id,
            geometry,
            label: obj.label,
            url,
            attributes: Record::new(),
        });
    }
    Ok(features)
}

/// Coerces an upstream geometry to a polygonal type.
///
/// Some responses wrap the polygon in a GeometryCollection together with
/// stray LineStrings. That is an upstream data-quality quirk, not a general
/// geometry rule: non-areal members are dropped and the rest coerced to a
/// MultiPolygon.
fn coerce_to_areal(geometry: Geometry) -> Result<Geometry> {
    match geometry {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Ok(geometry),
        Geometry::GeometryCollection(collection) => {
            let mut polygons = Vec::new();
            for member in collection.0 {
                match member {
                    Geometry::Polygon(polygon) => polygons.push(polygon),
                    Geometry::MultiPolygon(multi) => polygons.extend(multi),
                    _ => {}
                }
            }
            if polygons.is_empty() {
                bail!("geometry collection contains no polygons");
            }
            Ok(Geometry::MultiPolygon(MultiPolygon(polygons)))
        }
        other => bail!("unsupported geometry type: {other:?}"),
    }
}

/// One entry of the layer listing
#[derive(Debug, Clone)]
pub struct LayerInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct Groups {
    #[serde(rename = "group", default)]
    groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
struct Group {
    #[serde(rename = "layer", default)]
    layers: Vec<LayerDef>,
}

#[derive(Debug, Deserialize)]
struct LayerDef {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@Lid")]
    id: String,
}

/// Decodes the layer listing (`?in=layers`), flattening the groups
pub fn parse_layer_list(xml: &str) -> Result<Vec<LayerInfo>> {
    let groups: Groups =
        quick_xml::de::from_str(xml).context("failed to decode layer list XML")?;
    Ok(groups
        .groups
        .into_iter()
        .flat_map(|group| group.layers)
        .map(|layer| LayerInfo {
            id: layer.id,
            name: layer.name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_short_circuits() {
        let xml = "<objects>0 objects</objects>";
        assert!(parse_layer_response(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_objects() {
        let xml = r#"<objects>
            <obj id="1001" label="Eramets">
                <wkt>POLYGON((0 0,10 0,10 10,0 10,0 0))</wkt>
                <url>info.php%3Fid%3D1001</url>
            </obj>
            <obj id="1002">
                <wkt>MULTIPOLYGON(((0 0,1 0,1 1,0 1,0 0)))</wkt>
            </obj>
        </objects>"#;

        let features = parse_layer_response(xml).unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].id, "1001");
        assert_eq!(features[0].label.as_deref(), Some("Eramets"));
        assert_eq!(features[0].url.as_deref(), Some("info.php?id=1001"));
        assert!(matches!(features[0].geometry, Geometry::Polygon(_)));

        assert_eq!(features[1].id, "1002");
        assert!(features[1].url.is_none());
        assert!(matches!(features[1].geometry, Geometry::MultiPolygon(_)));
    }

    #[test]
    fn test_geometry_collection_coerced_to_multipolygon() {
        let xml = r#"<objects>
            <obj id="7">
                <wkt>GEOMETRYCOLLECTION(LINESTRING(0 0,1 1),POLYGON((0 0,1 0,1 1,0 1,0 0)))</wkt>
            </obj>
        </objects>"#;
        let features = parse_layer_response(xml).unwrap();
        match &features[0].geometry {
            Geometry::MultiPolygon(multi) => assert_eq!(multi.0.len(), 1),
            other => panic!("expected MultiPolygon, got {other:?}"),
        }
    }

    #[test]
    fn test_non_areal_geometry_is_an_error() {
        let xml = r#"<objects>
            <obj id="8"><wkt>POINT(1 2)</wkt></obj>
        </objects>"#;
        assert!(parse_layer_response(xml).is_err());
    }

    #[test]
    fn test_parse_layer_list() {
        let xml = r#"<groups>
            <group name="Teatised">
                <layer name="Teatis" Lid="10"/>
            </group>
            <group name="Eraldised">
                <layer name="Eraldised Eramets: osaline kirjeldus" Lid="11"/>
                <layer name="Eraldised RMK" Lid="12"/>
            </group>
        </groups>"#;

        let layers = parse_layer_list(xml).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].id, "10");
        assert_eq!(layers[0].name, "Teatis");
        assert_eq!(layers[2].id, "12");
    }
}
