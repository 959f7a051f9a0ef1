//! Layout-specific detail-page parsers

pub mod notification;
pub mod stand;

pub use notification::parse_notification;
pub use stand::parse_stand;

use crate::numeric;
use crate::table::Table;
use crate::types::Record;

/// Loads a two-column key/value table into a record, numeric cells parsed
/// under locale rules with fallback to the original text.
pub(crate) fn load_key_values(table: &Table, rec: &mut Record) {
    for row in &table.rows {
        if row.cells.len() < 2 {
            continue;
        }
        let key = &row.cells[0];
        if key.is_empty() {
            continue;
        }
        rec.insert(key.clone(), numeric::value_or_text(&row.cells[1]));
    }
}
