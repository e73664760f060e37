//! # Store Messages
//!
//! Requests sent from a [`StoreClient`](super::StoreClient) to the
//! [`ProductStore`](super::ProductStore) actor. Each carries a `oneshot` sender for the
//! reply, so the actor never shares its collection with callers.

use super::StoreError;
use crate::model::{Product, ProductDraft, ProductId, ProductPatch};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// One variant per remote operation.
#[derive(Debug)]
pub enum StoreRequest {
    List {
        search: String,
        respond_to: Response<Vec<Product>>,
    },
    Total {
        respond_to: Response<f64>,
    },
    Create {
        draft: ProductDraft,
        respond_to: Response<Product>,
    },
    Update {
        id: ProductId,
        patch: ProductPatch,
        respond_to: Response<Product>,
    },
    Delete {
        id: ProductId,
        respond_to: Response<()>,
    },
}
