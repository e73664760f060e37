//! Keyed row diff between two renders.

use super::TableView;
use inventory_api::ProductId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowChange {
    Inserted(ProductId),
    Updated(ProductId),
    Unchanged(ProductId),
    Removed(ProductId),
}

/// Compares rows by product id.
///
/// Rows of `next` come first, in their order; rows that disappeared follow, in the
/// order they had in `previous`.
pub fn diff_rows(previous: &TableView, next: &TableView) -> Vec<RowChange> {
    let before: HashMap<ProductId, _> = previous.rows.iter().map(|row| (row.key, row)).collect();

    let mut changes: Vec<RowChange> = next
        .rows
        .iter()
        .map(|row| match before.get(&row.key) {
            None => RowChange::Inserted(row.key),
            Some(old) if *old != row => RowChange::Updated(row.key),
            Some(_) => RowChange::Unchanged(row.key),
        })
        .collect();

    changes.extend(
        previous
            .rows
            .iter()
            .filter(|row| next.row(row.key).is_none())
            .map(|row| RowChange::Removed(row.key)),
    );
    changes
}
