//! Query drivers: layer queries joined with parsed detail pages
//!
//! A driver queries one or more layers for the AOI, then walks the features
//! and fetches each one's detail page, parsing it into attributes. Features
//! whose page fails to parse are kept with empty attributes so the geometry
//! still reaches the export.

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::client::RegistryClient;
use crate::layer::{parse_layer_response, Feature};

/// Stand inventory layers, queried together: private forest with partial and
/// full descriptions, plus the state forest layer
pub const STAND_LAYER_IDS: &[u32] = &[11, 14, 12];

/// Forest notification layer
pub const NOTIFICATION_LAYER_IDS: &[u32] = &[10];

/// Which parser a detail page goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Stand,
    Notification,
}

/// Features plus the union of their attribute columns, in first-seen order
#[derive(Debug, Default)]
pub struct EnrichedTable {
    pub features: Vec<Feature>,
    pub columns: Vec<String>,
}

/// Queries the stand layers and joins the parsed inventory attributes
pub async fn query_forest_stands<C: RegistryClient>(
    client: &C,
    aoi: &str,
    wait: Duration,
) -> Result<EnrichedTable> {
    enrich(client, aoi, STAND_LAYER_IDS, PageKind::Stand, wait).await
}

/// Queries the notification layer and joins the parsed notification attributes
pub async fn query_forest_notifications<C: RegistryClient>(
    client: &C,
    aoi: &str,
    wait: Duration,
) -> Result<EnrichedTable> {
    enrich(
        client,
        aoi,
        NOTIFICATION_LAYER_IDS,
        PageKind::Notification,
        wait,
    )
    .await
}

/// Queries a single layer without touching the detail pages
pub async fn query_layer<C: RegistryClient>(
    client: &C,
    aoi: &str,
    layer_id: u32,
) -> Result<EnrichedTable> {
    let xml = client.query_layer(aoi, layer_id).await?;
    let features = parse_layer_response(&xml)?;
    info!(layer_id, count = features.len(), "layer query returned");
    Ok(collect_table(features))
}

async fn enrich<C: RegistryClient>(
    client: &C,
    aoi: &str,
    layer_ids: &[u32],
    kind: PageKind,
    wait: Duration,
) -> Result<EnrichedTable> {
    let mut features = Vec::new();
    for &layer_id in layer_ids {
        let xml = client.query_layer(aoi, layer_id).await?;
        let layer_features = parse_layer_response(&xml)?;
        info!(layer_id, count = layer_features.len(), "layer query returned");
        features.extend(layer_features);
    }

    if features.is_empty() {
        return Ok(EnrichedTable::default());
    }

    let mut fetched = 0usize;
    for feature in &mut features {
        let Some(url) = feature.url.clone() else {
            continue;
        };
        if fetched > 0 {
            tokio::time::sleep(wait).await;
        }
        let page = client.fetch_info(&url).await?;
        fetched += 1;

        let parsed = match kind {
            PageKind::Stand => metsainfo::parse_stand(&page),
            PageKind::Notification => metsainfo::parse_notification(&page),
        };
        match parsed {
            Ok(record) => feature.attributes = record,
            Err(err) => {
                warn!(id = %feature.id, %err, "skipping detail page");
            }
        }
    }
    info!(total = features.len(), fetched, "enrichment finished");

    Ok(collect_table(features))
}

/// Normalizes placeholders and builds the column union
fn collect_table(mut features: Vec<Feature>) -> EnrichedTable {
    let mut columns: Vec<String> = Vec::new();
    for feature in &mut features {
        feature.attributes.normalize_placeholders();
        if feature.label.as_deref() == Some("-") {
            feature.label = None;
        }
        for (key, _) in feature.attributes.iter() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    EnrichedTable { features, columns }
}
