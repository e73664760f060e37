//! # Store Client
//!
//! `StoreClient` is the handle to a running [`ProductStore`](super::ProductStore). It is
//! cheap to clone (it only holds a sender) and implements [`ProductApi`], so the console
//! cannot tell it apart from the HTTP backend.

use super::message::StoreRequest;
use super::StoreError;
use crate::client::ProductApi;
use crate::error::{ApiError, ApiResult, Operation};
use crate::model::{Product, ProductDraft, ProductId, ProductPatch, Stats};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{instrument, warn};

/// A type-safe client for interacting with a `ProductStore`.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }
}

/// Collapses a store error into the operation's `FetchFailed`.
fn failed(operation: Operation) -> impl FnOnce(StoreError) -> ApiError {
    move |e| {
        warn!(%operation, error = %e, "Store request failed");
        ApiError::fetch_failed(operation)
    }
}

#[async_trait]
impl ProductApi for StoreClient {
    #[instrument(skip(self))]
    async fn list(&self, search: &str) -> ApiResult<Vec<Product>> {
        let search = search.to_string();
        self.request(|respond_to| StoreRequest::List { search, respond_to })
            .await
            .map_err(failed(Operation::List))
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> ApiResult<Stats> {
        self.request(|respond_to| StoreRequest::Total { respond_to })
            .await
            .map(|total| Stats { total })
            .map_err(failed(Operation::Stats))
    }

    #[instrument(skip(self))]
    async fn add(&self, draft: ProductDraft) -> ApiResult<Product> {
        self.request(|respond_to| StoreRequest::Create { draft, respond_to })
            .await
            .map_err(failed(Operation::Add))
    }

    #[instrument(skip(self))]
    async fn update(&self, id: ProductId, patch: ProductPatch) -> ApiResult<Product> {
        self.request(|respond_to| StoreRequest::Update { id, patch, respond_to })
            .await
            .map_err(failed(Operation::Update))
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: ProductId) -> ApiResult<()> {
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
            .map_err(failed(Operation::Remove))
    }
}
