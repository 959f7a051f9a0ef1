//! # metsainfo
//!
//! Parser for the detail pages served by the Estonian forest registry's
//! legacy Flash-era endpoint. The pages are loosely structured HTML in three
//! layouts (full inventory description, short inventory description, forest
//! notification); this crate turns them into uniform attribute records.
//!
//! ## Features
//!
//! - Layout detection and layout-specific extraction
//! - Estonian locale number parsing (space thousands, comma decimal)
//! - Species-code resolution and composition aggregation
//! - Pure, synchronous parsing: no network, no I/O, no shared state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use metsainfo::{parse_stand, parse_notification};
//!
//! let record = parse_stand(&page_html)?;
//! for (field, value) in record.iter() {
//!     println!("{field}: {value}");
//! }
//! ```
//!
//! Field names are Estonian labels and vary per record; consumers must merge
//! records by field-name union, not by positional schema.

pub mod error;
pub mod numeric;
pub mod parser;
pub mod species;
pub mod table;
pub mod types;

pub use error::ParseError;
pub use parser::{parse_notification, parse_stand};
pub use types::{Record, Value};
