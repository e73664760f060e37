//! # Product Model
//!
//! Wire types exchanged with the product collection. Field names match the JSON the
//! service produces and consumes (`id`, `name`, `category`, `quantity`, `price`, `total`).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

/// Type-safe identifier for Products.
///
/// Assigned by the service and stable for the lifetime of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Reads a money amount sent either as a JSON number or as a decimal string (`"0.50"`).
fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount '{text}'"))),
    }
}

/// A single inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Expected to be non-negative, but nothing on the client enforces it.
    pub quantity: i64,
    /// Decimal columns may arrive as strings.
    #[serde(deserialize_with = "lenient_amount")]
    pub price: f64,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the service
    /// * `name` - Product name
    /// * `category` - Category label
    /// * `quantity` - Units in stock
    /// * `price` - Unit price
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            quantity,
            price,
        }
    }
}

/// Payload for creating a new product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price: f64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            quantity,
            price,
        }
    }
}

/// Relative quantity change, sent on the wire as the string `"+1"` or `"-1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityDelta {
    #[serde(rename = "+1")]
    Increment,
    #[serde(rename = "-1")]
    Decrement,
}

impl QuantityDelta {
    pub fn amount(self) -> i64 {
        match self {
            QuantityDelta::Increment => 1,
            QuantityDelta::Decrement => -1,
        }
    }
}

/// The quantity slot of a [`ProductPatch`].
///
/// Absolute values serialize as JSON numbers, deltas as their marker strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityValue {
    Absolute(i64),
    Delta(QuantityDelta),
}

/// Partial update for an existing product.
///
/// Absent fields are left untouched by the service and are omitted from the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<QuantityValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ProductPatch {
    /// A patch that only moves the quantity by one unit.
    pub fn quantity_delta(delta: QuantityDelta) -> Self {
        Self {
            quantity: Some(QuantityValue::Delta(delta)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.quantity.is_none() && self.price.is_none()
    }
}

/// Aggregate value of the whole collection, computed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(deserialize_with = "lenient_amount")]
    pub total: f64,
}
