//! # View Renderer
//!
//! [`render`] turns a product list into a declarative [`TableView`]. Nothing here touches
//! a terminal or a network: a surface decides how to show the table, and the row
//! affordances carry everything needed to act on a row later.
//!
//! Each row has five cells (id, name, category badge, quantity, price with two decimals)
//! and four affordances, in this order:
//!
//! | action | label | data |
//! |---|---|---|
//! | `inc` | `+1` | `data-id` |
//! | `dec` | `-1` | `data-id` |
//! | `edit` | `Edit` | `data-id`, `data-name`, `data-category`, `data-quantity`, `data-price` |
//! | `del` | `Delete` | `data-id` |
//!
//! Text is kept as plain data, never spliced into markup.

mod action;
mod diff;

pub use action::{EditTarget, RowAction};
pub use diff::{diff_rows, RowChange};

use inventory_api::{Product, ProductId};
use std::collections::BTreeMap;

pub const DATA_ID: &str = "data-id";
pub const DATA_NAME: &str = "data-name";
pub const DATA_CATEGORY: &str = "data-category";
pub const DATA_QUANTITY: &str = "data-quantity";
pub const DATA_PRICE: &str = "data-price";

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Shown as a label rather than plain text.
    Badge(String),
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(text) | Cell::Badge(text) => text,
        }
    }
}

/// The four row actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Increment,
    Decrement,
    Edit,
    Delete,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Increment,
        ActionKind::Decrement,
        ActionKind::Edit,
        ActionKind::Delete,
    ];

    /// Action name as stored on the affordance.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Increment => "inc",
            ActionKind::Decrement => "dec",
            ActionKind::Edit => "edit",
            ActionKind::Delete => "del",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Increment => "+1",
            ActionKind::Decrement => "-1",
            ActionKind::Edit => "Edit",
            ActionKind::Delete => "Delete",
        }
    }

    pub fn parse(action: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == action)
    }
}

/// A clickable action on a row, with its data attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionAffordance {
    pub action: String,
    pub label: String,
    pub data: BTreeMap<String, String>,
}

impl ActionAffordance {
    fn new(kind: ActionKind, data: BTreeMap<String, String>) -> Self {
        Self {
            action: kind.as_str().to_string(),
            label: kind.label().to_string(),
            data,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub key: ProductId,
    pub cells: Vec<Cell>,
    pub actions: Vec<ActionAffordance>,
}

impl RowView {
    pub fn affordance(&self, kind: ActionKind) -> Option<&ActionAffordance> {
        self.actions.iter().find(|a| a.action == kind.as_str())
    }
}

/// The whole table body. Always replaced as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub rows: Vec<RowView>,
}

impl TableView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: ProductId) -> Option<&RowView> {
        self.rows.iter().find(|row| row.key == id)
    }

    pub fn affordance(&self, id: ProductId, kind: ActionKind) -> Option<&ActionAffordance> {
        self.row(id).and_then(|row| row.affordance(kind))
    }
}

/// Formats a money amount with exactly two decimals.
pub fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Projects `items` into a table, preserving their order.
pub fn render(items: &[Product]) -> TableView {
    TableView {
        rows: items.iter().map(render_row).collect(),
    }
}

fn render_row(product: &Product) -> RowView {
    let id = product.id.to_string();
    let id_only = BTreeMap::from([(DATA_ID.to_string(), id.clone())]);
    let snapshot = BTreeMap::from([
        (DATA_ID.to_string(), id.clone()),
        (DATA_NAME.to_string(), product.name.clone()),
        (DATA_CATEGORY.to_string(), product.category.clone()),
        (DATA_QUANTITY.to_string(), product.quantity.to_string()),
        (DATA_PRICE.to_string(), product.price.to_string()),
    ]);

    RowView {
        key: product.id,
        cells: vec![
            Cell::Text(id),
            Cell::Text(product.name.clone()),
            Cell::Badge(product.category.clone()),
            Cell::Text(product.quantity.to_string()),
            Cell::Text(format_money(product.price)),
        ],
        actions: vec![
            ActionAffordance::new(ActionKind::Increment, id_only.clone()),
            ActionAffordance::new(ActionKind::Decrement, id_only.clone()),
            ActionAffordance::new(ActionKind::Edit, snapshot),
            ActionAffordance::new(ActionKind::Delete, id_only),
        ],
    }
}
