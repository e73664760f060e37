//! # In-Process Store
//!
//! An actor-backed product collection that behaves like the REST service, for running the
//! console without a server (`--memory`) and for end-to-end tests.
//!
//! * [`ProductStore`] - the actor; owns the collection and processes one request at a time.
//! * [`StoreClient`] - a cloneable handle implementing [`ProductApi`](crate::ProductApi).
//! * [`StoreRequest`] - the messages exchanged between them.

mod actor;
mod client;
mod message;

pub use actor::ProductStore;
pub use client::StoreClient;
pub use message::{Response, StoreRequest};

use crate::model::ProductId;

/// Errors raised inside the store, before they are mapped to `ApiError`.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store closed")]
    ActorClosed,
    #[error("Store dropped response channel")]
    ActorDropped,
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Request rejected: {0}")]
    Rejected(String),
}
