//! Per-sheet synchronisation: schema reconciliation plus clear-then-write.
//!
//! The destination sheet may carry a column layout a human has curated or
//! reordered. [`reconcile`] keeps that layout for every column the incoming
//! table still has, drops columns the new data no longer carries, and
//! appends genuinely new columns at the end in source order. [`sync_sheet`]
//! applies the result with a full-region clear followed by a single write,
//! so re-running with identical data is idempotent and stale cells beyond
//! the new extent are always erased.

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::contract::{ApiError, Probe, SheetsApi};
use crate::table::{normalize, Table};

/// Sheet titles are truncated to this limit by the destination format.
pub const MAX_SHEET_TITLE: usize = 24;

/// Region cleared before every write; a fixed large row ceiling rather than
/// a diff against the previous extent.
const CLEAR_RANGE: &str = "A1:Z50000";

const WRITE_ORIGIN: &str = "A1";

/// Truncates a team name to a valid sheet title.
pub fn sheet_title(name: &str) -> String {
    name.chars().take(MAX_SHEET_TITLE).collect()
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to probe sheet: {0}")]
    Probe(#[source] ApiError),

    #[error("failed to create sheet: {0}")]
    Create(#[source] ApiError),

    #[error("failed to read header row: {0}")]
    Header(#[source] ApiError),

    #[error("failed to clear sheet region: {0}")]
    Clear(#[source] ApiError),

    #[error("failed to write sheet values: {0}")]
    Write(#[source] ApiError),
}

/// Computes the output column order from the sheet's existing header and the
/// incoming table's columns.
///
/// Empty `existing` means the sheet is new (or has no header) and the
/// incoming order is used unchanged. Otherwise the output is every existing
/// column still present in `incoming`, in existing order, followed by every
/// new incoming column in incoming order. Re-applying the function to its
/// own output yields the same order.
pub fn reconcile(existing: &[String], incoming: &[String]) -> Vec<String> {
    if existing.is_empty() {
        return incoming.to_vec();
    }
    let mut order: Vec<String> = existing
        .iter()
        .filter(|column| incoming.contains(column))
        .cloned()
        .collect();
    for column in incoming {
        if !order.contains(column) {
            order.push(column.clone());
        }
    }
    order
}

/// Synchronises one sheet to hold exactly `table`, preserving the sheet's
/// established column order. Returns the number of cells written.
pub async fn sync_sheet<A: SheetsApi>(
    api: &A,
    spreadsheet_id: &str,
    sheet: &str,
    table: &Table,
) -> Result<u64, SyncError> {
    match api.probe_sheet(spreadsheet_id, sheet).await {
        Ok(Probe::Found) => {}
        Ok(Probe::NotFound) => {
            api.create_sheet(spreadsheet_id, sheet)
                .await
                .map_err(SyncError::Create)?;
            info!(sheet, "created new sheet");
        }
        Err(e) => return Err(SyncError::Probe(e)),
    }

    let existing = api
        .read_header_row(spreadsheet_id, sheet)
        .await
        .map_err(SyncError::Header)?
        .unwrap_or_default();

    let order = reconcile(&existing, table.columns());
    if !existing.is_empty() && order != table.columns() {
        info!(sheet, "reordered columns to match existing sheet");
    }
    let projected = table.project(&order);

    let mut values: Vec<Vec<Value>> = Vec::with_capacity(projected.len() + 1);
    values.push(order.iter().map(|c| Value::String(c.clone())).collect());
    for row in projected.rows() {
        values.push(row.iter().map(normalize).collect());
    }

    api.clear_region(spreadsheet_id, sheet, CLEAR_RANGE)
        .await
        .map_err(SyncError::Clear)?;
    let cells = api
        .write_region(spreadsheet_id, sheet, WRITE_ORIGIN, values)
        .await
        .map_err(SyncError::Write)?;
    info!(sheet, cells, "updated sheet");
    Ok(cells)
}
