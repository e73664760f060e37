//! # Inventory API
//!
//! This crate is the "remote" half of the inventory console: everything needed to talk
//! to a product collection that lives somewhere else, plus the test doubles used to stand
//! in for it.
//!
//! ## Architecture Overview
//!
//! 1. **Wire Layer** ([`model`]) - `Product`, drafts, partial patches and the aggregate `Stats`.
//! 2. **Contract Layer** ([`ProductApi`]) - the five remote operations every backend answers.
//! 3. **Backends** - [`HttpProductApi`] (REST over `reqwest`) and the in-process
//!    [`ProductStore`](store::ProductStore) actor.
//! 4. **Decorators** - [`QuantityNormalizer`] resolves `+1`/`-1` quantity patches before dispatch.
//!
//! ## Composing a Client
//!
//! Decorators are composed once, at construction time:
//!
//! ```rust,no_run
//! use inventory_api::{HttpProductApi, ProductApi, QuantityNormalizer, Url};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let base = Url::parse("http://localhost:3000")?;
//! let api = QuantityNormalizer::new(HttpProductApi::new(base));
//! let products = api.list("").await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Model
//!
//! Every failure, whatever its cause, surfaces as [`ApiError::FetchFailed`] carrying the
//! user-facing message of the operation that failed. Causes are logged with `tracing`.
//!
//! ## Testing
//!
//! See [`mock`] for the expectation-driven [`MockApi`](mock::MockApi) and [`store`] for a
//! real, stateful backend that needs no network.

pub mod client;
pub mod error;
pub mod http;
pub mod mock;
pub mod model;
pub mod normalize;
pub mod store;

// Re-export core types for convenience
pub use client::ProductApi;
pub use error::{ApiError, ApiResult, Operation};
pub use http::HttpProductApi;
pub use model::{Product, ProductDraft, ProductId, ProductPatch, QuantityDelta, QuantityValue, Stats};
pub use normalize::QuantityNormalizer;
pub use reqwest::Url;
