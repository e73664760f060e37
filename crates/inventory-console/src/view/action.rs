//! Reading an affordance back into a typed action.

use super::{ActionAffordance, ActionKind, DATA_CATEGORY, DATA_ID, DATA_NAME, DATA_PRICE, DATA_QUANTITY};
use inventory_api::{Product, ProductId};

/// The product snapshot carried by an `edit` affordance.
///
/// Fields stay as the strings that were rendered; a missing attribute is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub id: ProductId,
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
}

impl From<&Product> for EditTarget {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: Some(product.name.clone()),
            category: Some(product.category.clone()),
            quantity: Some(product.quantity.to_string()),
            price: Some(product.price.to_string()),
        }
    }
}

/// A row action decoded from its affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Increment(ProductId),
    Decrement(ProductId),
    Delete(ProductId),
    Edit(EditTarget),
}

impl RowAction {
    /// Decodes `affordance`, or `None` for an unknown action or a malformed id.
    pub fn from_affordance(affordance: &ActionAffordance) -> Option<Self> {
        let kind = ActionKind::parse(&affordance.action)?;
        let id: ProductId = affordance.get(DATA_ID)?.parse().ok()?;
        let field = |key: &str| affordance.get(key).map(str::to_string);

        Some(match kind {
            ActionKind::Increment => RowAction::Increment(id),
            ActionKind::Decrement => RowAction::Decrement(id),
            ActionKind::Delete => RowAction::Delete(id),
            ActionKind::Edit => RowAction::Edit(EditTarget {
                id,
                name: field(DATA_NAME),
                category: field(DATA_CATEGORY),
                quantity: field(DATA_QUANTITY),
                price: field(DATA_PRICE),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::render;
    use std::collections::BTreeMap;

    #[test]
    fn test_edit_affordance_round_trip() {
        let products = vec![
            Product::new(3, "Bolt", "Hardware", 10, 0.5),
            Product::new(12, "Chain, 2m", "Outdoor & Garden", 0, 1234.125),
        ];
        let table = render(&products);

        for (row, product) in table.rows.iter().zip(&products) {
            let affordance = row.affordance(ActionKind::Edit).unwrap();
            let action = RowAction::from_affordance(affordance).unwrap();
            assert_eq!(action, RowAction::Edit(EditTarget::from(product)));
        }
    }

    #[test]
    fn test_simple_actions_decode() {
        let table = render(&[Product::new(8, "Nut", "Hardware", 1, 0.1)]);
        let row = &table.rows[0];

        let decoded: Vec<RowAction> = [ActionKind::Increment, ActionKind::Decrement, ActionKind::Delete]
            .into_iter()
            .filter_map(|kind| row.affordance(kind))
            .filter_map(RowAction::from_affordance)
            .collect();
        assert_eq!(
            decoded,
            vec![
                RowAction::Increment(ProductId(8)),
                RowAction::Decrement(ProductId(8)),
                RowAction::Delete(ProductId(8)),
            ]
        );
    }

    #[test]
    fn test_malformed_affordance_is_ignored() {
        let unknown = ActionAffordance {
            action: "archive".to_string(),
            label: "Archive".to_string(),
            data: BTreeMap::from([(DATA_ID.to_string(), "1".to_string())]),
        };
        assert_eq!(RowAction::from_affordance(&unknown), None);

        let bad_id = ActionAffordance {
            action: "inc".to_string(),
            label: "+1".to_string(),
            data: BTreeMap::from([(DATA_ID.to_string(), "one".to_string())]),
        };
        assert_eq!(RowAction::from_affordance(&bad_id), None);
    }

    #[test]
    fn test_missing_edit_fields_are_none() {
        let sparse = ActionAffordance {
            action: "edit".to_string(),
            label: "Edit".to_string(),
            data: BTreeMap::from([(DATA_ID.to_string(), "4".to_string())]),
        };
        let Some(RowAction::Edit(target)) = RowAction::from_affordance(&sparse) else {
            panic!("expected an edit action");
        };
        assert_eq!(target.id, ProductId(4));
        assert!(target.name.is_none() && target.price.is_none());
    }
}
