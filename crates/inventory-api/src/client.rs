//! # ProductApi Trait
//!
//! The contract every backend honours: list, stats, add, update, remove. The console only
//! ever talks to a `ProductApi`, so an HTTP client, the in-process store, a decorator or a
//! mock are interchangeable.
use crate::error::ApiResult;
use crate::model::{Product, ProductDraft, ProductId, ProductPatch, Stats};
use async_trait::async_trait;
use std::sync::Arc;

/// Remote operations on the product collection.
///
/// No implementation retries or applies timeouts; a failure is returned to the caller
/// immediately as [`ApiError::FetchFailed`](crate::ApiError::FetchFailed).
///
/// # Example
///
/// ```rust
/// use inventory_api::{ApiResult, ProductApi};
///
/// async fn inventory_value(api: &impl ProductApi) -> ApiResult<String> {
///     let stats = api.stats().await?;
///     Ok(format!("{:.2}", stats.total))
/// }
/// ```
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetch the collection, optionally filtered by `search` (empty means unfiltered).
    /// Ordering is decided by the service.
    async fn list(&self, search: &str) -> ApiResult<Vec<Product>>;

    /// Fetch the aggregate value of the collection.
    async fn stats(&self) -> ApiResult<Stats>;

    /// Create a product. Returns the stored record with its assigned id.
    async fn add(&self, draft: ProductDraft) -> ApiResult<Product>;

    /// Apply a partial patch. Returns the updated record.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> ApiResult<Product>;

    /// Delete a product.
    async fn remove(&self, id: ProductId) -> ApiResult<()>;
}

#[async_trait]
impl<T: ProductApi + ?Sized> ProductApi for Arc<T> {
    async fn list(&self, search: &str) -> ApiResult<Vec<Product>> {
        (**self).list(search).await
    }

    async fn stats(&self) -> ApiResult<Stats> {
        (**self).stats().await
    }

    async fn add(&self, draft: ProductDraft) -> ApiResult<Product> {
        (**self).add(draft).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> ApiResult<Product> {
        (**self).update(id, patch).await
    }

    async fn remove(&self, id: ProductId) -> ApiResult<()> {
        (**self).remove(id).await
    }
}

#[async_trait]
impl<T: ProductApi + ?Sized> ProductApi for Box<T> {
    async fn list(&self, search: &str) -> ApiResult<Vec<Product>> {
        (**self).list(search).await
    }

    async fn stats(&self) -> ApiResult<Stats> {
        (**self).stats().await
    }

    async fn add(&self, draft: ProductDraft) -> ApiResult<Product> {
        (**self).add(draft).await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> ApiResult<Product> {
        (**self).update(id, patch).await
    }

    async fn remove(&self, id: ProductId) -> ApiResult<()> {
        (**self).remove(id).await
    }
}
