//! CLI command definitions and implementations
//!
//! Commands:
//! - `list`: print the available map layers
//! - `query-layer`: raw layer query, geometry only
//! - `forest-stands` / `forest-notifications`: layer query joined with
//!   parsed detail pages

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use tracing::info;

use crate::aoi::read_aoi;
use crate::client::{HttpClient, RegistryClient};
use crate::enrich::{
    query_forest_notifications, query_forest_stands, query_layer, EnrichedTable,
};
use crate::export::geojson::write_geojson;
use crate::layer::parse_layer_list;

#[derive(Subcommand)]
pub enum Commands {
    /// List the available map layers
    List,

    /// Query a single layer for an AOI and export the geometries
    QueryLayer {
        /// Path to the AOI GeoJSON file (EPSG:3301)
        #[arg(short, long)]
        aoi: PathBuf,

        /// Layer id (see `list`)
        #[arg(short, long)]
        layer_id: u32,

        /// Output GeoJSON path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Query forest stands for an AOI, with parsed inventory attributes
    ForestStands {
        /// Path to the AOI GeoJSON file (EPSG:3301)
        #[arg(short, long)]
        aoi: PathBuf,

        /// Output GeoJSON path
        #[arg(short, long)]
        out: PathBuf,

        /// Seconds to wait between detail-page requests
        #[arg(long, default_value_t = 0.5)]
        wait: f64,
    },

    /// Query forest notifications for an AOI, with parsed work orders
    ForestNotifications {
        /// Path to the AOI GeoJSON file (EPSG:3301)
        #[arg(short, long)]
        aoi: PathBuf,

        /// Output GeoJSON path
        #[arg(short, long)]
        out: PathBuf,

        /// Seconds to wait between detail-page requests
        #[arg(long, default_value_t = 0.5)]
        wait: f64,
    },
}

pub async fn cmd_list() -> Result<()> {
    let client = HttpClient::new()?;
    let xml = client.layer_list().await?;
    for layer in parse_layer_list(&xml)? {
        println!("{}\t{}", layer.id, layer.name);
    }
    Ok(())
}

pub async fn cmd_query_layer(aoi_path: &Path, layer_id: u32, out: &Path) -> Result<()> {
    let client = HttpClient::new()?;
    let aoi = read_aoi(aoi_path)?;
    let table = query_layer(&client, &aoi, layer_id).await?;
    finish(&table, out)
}

pub async fn cmd_forest_stands(aoi_path: &Path, out: &Path, wait: f64) -> Result<()> {
    let client = HttpClient::new()?;
    let aoi = read_aoi(aoi_path)?;
    let table = query_forest_stands(&client, &aoi, Duration::from_secs_f64(wait)).await?;
    finish(&table, out)
}

pub async fn cmd_forest_notifications(aoi_path: &Path, out: &Path, wait: f64) -> Result<()> {
    let client = HttpClient::new()?;
    let aoi = read_aoi(aoi_path)?;
    let table =
        query_forest_notifications(&client, &aoi, Duration::from_secs_f64(wait)).await?;
    finish(&table, out)
}

fn finish(table: &EnrichedTable, out: &Path) -> Result<()> {
    write_geojson(table, out)?;
    info!(
        features = table.features.len(),
        columns = table.columns.len(),
        "export finished"
    );
    Ok(())
}
