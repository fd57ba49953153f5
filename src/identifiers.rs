//! Reads vendor item ids from a CSV file.

use std::path::Path;

use crate::Result;
use crate::utils::csv::parse_records;

/// Header names recognised for the id column, in priority order.
pub const ID_COLUMN_HEADERS: [&str; 3] = ["옵션 id", "option_id", "vendorItemId"];

pub async fn read_vendor_item_ids(path: &Path) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let ids = parse_vendor_item_ids(&contents);
    tracing::info!(path = %path.display(), count = ids.len(), "loaded vendor item ids");
    Ok(ids)
}

/// Parses CSV text whose first row is a header.
///
/// Every header in [`ID_COLUMN_HEADERS`] that is present contributes a column,
/// in priority order; each row takes its id from the first of those columns
/// with a non-empty cell. When no header matches, the first column is used.
pub fn parse_vendor_item_ids(contents: &str) -> Vec<String> {
    let mut records = parse_records(contents).into_iter();
    let Some(header) = records.next() else {
        return Vec::new();
    };

    let mut columns: Vec<usize> = ID_COLUMN_HEADERS
        .iter()
        .filter_map(|name| header.iter().position(|cell| cell.trim() == *name))
        .collect();
    if columns.is_empty() {
        tracing::warn!(
            header = ?header,
            "no known id column in header; using the first column"
        );
        columns.push(0);
    }

    records
        .filter_map(|record| {
            columns
                .iter()
                .filter_map(|&column| record.get(column))
                .map(|cell| cell.trim())
                .find(|cell| !cell.is_empty())
                .map(str::to_string)
        })
        .collect()
}
