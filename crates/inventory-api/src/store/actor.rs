//! # Product Store Actor
//!
//! The `ProductStore` owns an in-memory product collection and answers the same five
//! operations as the REST service, with the same observable rules:
//!
//! * **list** returns newest first (id descending). A non-blank search term matches
//!   case-insensitively as a substring of the name *or* the category.
//! * **total** is `Σ quantity × price`, `0` for an empty collection.
//! * **create** trims name and category and rejects either being empty. Ids are assigned
//!   sequentially starting at 1.
//! * **update** applies only the fields present; an empty patch, a quantity that is still
//!   a `+1`/`-1` marker, and an unknown id are all rejected.
//! * **delete** rejects an unknown id.
//!
//! **Concurrency Model**: the store processes its messages *sequentially* in one task,
//! so the collection needs no `Mutex`. Exclusive ownership inside the task is the lock.

use super::message::StoreRequest;
use super::{StoreClient, StoreError};
use crate::model::{Product, ProductDraft, ProductId, ProductPatch, QuantityValue};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// In-memory product collection served over a channel.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ProductStore::new()` returns the store (server) and a [`StoreClient`].
/// 2.  **Seed** (optional): insert initial products with [`ProductStore::seed`].
/// 3.  **Run**: spawn [`ProductStore::run`]; it exits once every client is dropped.
///
/// ```rust
/// use inventory_api::store::ProductStore;
/// use inventory_api::{ProductApi, ProductDraft};
///
/// #[tokio::main]
/// async fn main() {
///     let (mut store, client) = ProductStore::new(32);
///     store.seed(ProductDraft::new("Bolt", "Hardware", 10, 0.5)).unwrap();
///     tokio::spawn(store.run());
///
///     let products = client.list("").await.unwrap();
///     assert_eq!(products.len(), 1);
/// }
/// ```
pub struct ProductStore {
    receiver: mpsc::Receiver<StoreRequest>,
    products: BTreeMap<ProductId, Product>,
    next_id: u32,
}

impl ProductStore {
    /// Creates a new `ProductStore` and its associated `StoreClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls on the client wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            products: BTreeMap::new(),
            next_id: 1,
        };
        (store, StoreClient::new(sender))
    }

    /// Inserts a product before the store starts serving requests.
    pub fn seed(&mut self, draft: ProductDraft) -> Result<ProductId, StoreError> {
        self.create(draft).map(|product| product.id)
    }

    /// Runs the store's event loop, processing messages until the channel closes.
    pub async fn run(mut self) {
        info!(size = self.products.len(), "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::List { search, respond_to } => {
                    let items = self.list(&search);
                    debug!(%search, found = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                StoreRequest::Total { respond_to } => {
                    let total = self.total();
                    debug!(total, "Total");
                    let _ = respond_to.send(Ok(total));
                }
                StoreRequest::Create { draft, respond_to } => {
                    debug!(?draft, "Create");
                    let result = self.create(draft);
                    match &result {
                        Ok(product) => info!(id = %product.id, size = self.products.len(), "Created"),
                        Err(e) => warn!(error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update { id, patch, respond_to } => {
                    debug!(%id, ?patch, "Update");
                    let result = self.update(id, patch);
                    match &result {
                        Ok(_) => info!(%id, "Updated"),
                        Err(e) => warn!(%id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(%id, "Delete");
                    let result = self.delete(id);
                    match &result {
                        Ok(()) => info!(%id, size = self.products.len(), "Deleted"),
                        Err(e) => warn!(%id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(size = self.products.len(), "Shutdown");
    }

    fn list(&self, search: &str) -> Vec<Product> {
        let needle = search.trim().to_lowercase();
        self.products
            .values()
            .rev()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    fn total(&self) -> f64 {
        self.products
            .values()
            .map(|p| p.quantity as f64 * p.price)
            .sum()
    }

    fn create(&mut self, draft: ProductDraft) -> Result<Product, StoreError> {
        let name = draft.name.trim();
        let category = draft.category.trim();
        if name.is_empty() || category.is_empty() {
            return Err(StoreError::Rejected("name and category are required".to_string()));
        }

        let id = ProductId(self.next_id);
        self.next_id += 1;
        let product = Product::new(id, name, category, draft.quantity, draft.price);
        self.products.insert(id, product.clone());
        Ok(product)
    }

    fn update(&mut self, id: ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::Rejected("no fields to update".to_string()));
        }
        let quantity = match patch.quantity {
            Some(QuantityValue::Absolute(q)) => Some(q),
            Some(QuantityValue::Delta(_)) => {
                return Err(StoreError::Rejected("quantity must be number".to_string()));
            }
            None => None,
        };

        let product = self
            .products
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(quantity) = quantity {
            product.quantity = quantity;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        Ok(product.clone())
    }

    fn delete(&mut self, id: ProductId) -> Result<(), StoreError> {
        self.products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
