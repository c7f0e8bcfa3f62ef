//! Row-level reconciliation of a spreadsheet snapshot against a store snapshot.

use crate::core::order::{OrderId, OrderRow};
use std::collections::{BTreeSet, HashSet};

/// Returns the sheet rows that have no identical counterpart in the store.
///
/// Comparison is per whole row: a single differing field, including a
/// `rub_price` that only moved because the rate did, reports the full sheet
/// row. Identical sheet rows collapse into one entry. The result is sorted by
/// order id.
pub fn compute_changes(sheet_rows: &[OrderRow], store_rows: &[OrderRow]) -> Vec<OrderRow> {
    let stored: HashSet<&OrderRow> = store_rows.iter().collect();
    let changed: HashSet<&OrderRow> = sheet_rows
        .iter()
        .filter(|row| !stored.contains(row))
        .collect();

    let mut changes: Vec<OrderRow> = changed.into_iter().cloned().collect();
    changes.sort_by_key(|row| row.order_id);
    changes
}

/// Returns the ids present in the store but absent from the sheet, ascending.
pub fn compute_deletions(sheet_rows: &[OrderRow], store_rows: &[OrderRow]) -> Vec<OrderId> {
    let in_sheet: HashSet<OrderId> = sheet_rows.iter().map(|row| row.order_id).collect();
    store_rows
        .iter()
        .map(|row| row.order_id)
        .filter(|id| !in_sheet.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
