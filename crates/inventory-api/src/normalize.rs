//! # Quantity Normalizer
//!
//! Callers may express a quantity change as a relative delta (`+1` / `-1`) instead of an
//! absolute value. [`QuantityNormalizer`] resolves the delta against the current server
//! state just before the update is dispatched:
//!
//! 1. fetch the unfiltered list through the wrapped client,
//! 2. find the product being updated,
//! 3. replace the marker with `current.quantity + delta`,
//! 4. send the rewritten patch.
//!
//! If the product is not in the list, the patch is forwarded unmodified.
//!
//! ## Concurrency Note
//!
//! The read and the write are two separate requests with nothing guarding them. Two
//! increments for the same product that overlap can both read the same starting quantity,
//! and one of them is lost. Fixing this needs an atomic increment or a version check on
//! the service side.

use crate::client::ProductApi;
use crate::error::ApiResult;
use crate::model::{Product, ProductDraft, ProductId, ProductPatch, QuantityValue, Stats};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Decorator that rewrites delta quantity patches into absolute ones.
///
/// Every other operation is forwarded untouched.
#[derive(Debug, Clone)]
pub struct QuantityNormalizer<A> {
    inner: A,
}

impl<A: ProductApi> QuantityNormalizer<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    /// Resolves a delta marker in `patch` against the current quantity of `id`.
    ///
    /// Patches without a marker come back unchanged and cost no request.
    #[instrument(skip(self))]
    pub async fn normalize(&self, id: ProductId, patch: ProductPatch) -> ApiResult<ProductPatch> {
        let Some(QuantityValue::Delta(delta)) = patch.quantity else {
            return Ok(patch);
        };

        let items = self.inner.list("").await?;
        match items.iter().find(|p| p.id == id) {
            Some(current) => {
                let next = current.quantity + delta.amount();
                debug!(%id, from = current.quantity, to = next, "Resolved quantity delta");
                Ok(ProductPatch {
                    quantity: Some(QuantityValue::Absolute(next)),
                    ..patch
                })
            }
            None => {
                debug!(%id, "Product not listed, forwarding delta unchanged");
                Ok(patch)
            }
        }
    }
}

#[async_trait]
impl<A: ProductApi> ProductApi for QuantityNormalizer<A> {
    async fn list(&self, search: &str) -> ApiResult<Vec<Product>> {
        self.inner.list(search).await
    }

    async fn stats(&self) -> ApiResult<Stats> {
        self.inner.stats().await
    }

    async fn add(&self, draft: ProductDraft) -> ApiResult<Product> {
        self.inner.add(draft).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> ApiResult<Product> {
        let patch = self.normalize(id, patch).await?;
        self.inner.update(id, patch).await
    }

    async fn remove(&self, id: ProductId) -> ApiResult<()> {
        self.inner.remove(id).await
    }
}
