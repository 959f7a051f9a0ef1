//! Client for the public Estonian forest registry map service.
//!
//! Queries map layers for an area of interest, fetches and parses the
//! legacy detail pages through [`metsainfo`], and exports the joined result
//! as GeoJSON in EPSG:3301.

pub mod aoi;
pub mod cli;
pub mod client;
pub mod enrich;
pub mod export;
pub mod layer;

pub use client::{HttpClient, RegistryClient};
pub use enrich::{
    query_forest_notifications, query_forest_stands, query_layer, EnrichedTable,
};
pub use layer::{Feature, LayerInfo};
