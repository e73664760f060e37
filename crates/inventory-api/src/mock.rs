//! # Mock API & Testing Guide
//!
//! [`MockApi`] implements [`ProductApi`] entirely in memory. Responses are scripted up
//! front with a fluent expectation API, every request is recorded, and [`MockApi::verify`]
//! asserts that all scripted responses were consumed.
//!
//! ## When to use the Mock vs the Store
//!
//! | Feature | MockApi | ProductStore |
//! |---------|---------|--------------|
//! | **State** | None (scripted responses) | Real collection |
//! | **Determinism** | Full, including response ordering via gates | Sequential actor |
//! | **Error Injection** | Easy (`return_err`) | Only through invalid requests |
//! | **Use Case** | Exact request assertions, failure paths | End-to-end workflows |
//!
//! ## Example
//!
//! ```rust
//! use inventory_api::mock::{Call, MockApi};
//! use inventory_api::{ProductApi, Stats};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockApi::new();
//!     mock.expect_stats().return_ok(Stats { total: 12.5 });
//!
//!     let stats = mock.stats().await.unwrap();
//!     assert_eq!(stats.total, 12.5);
//!     assert_eq!(mock.calls(), vec![Call::Stats]);
//!     mock.verify();
//! }
//! ```
//!
//! ## Controlling Resolution Order
//!
//! A response can be held back until a `oneshot` gate fires, which makes overlapping
//! requests resolve in a chosen order:
//!
//! ```rust
//! use inventory_api::mock::MockApi;
//! use inventory_api::ProductApi;
//! use tokio::sync::oneshot;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockApi::new();
//!     let (release, gate) = oneshot::channel();
//!     mock.expect_list().after(gate).return_ok(vec![]);
//!
//!     let pending = tokio::spawn({
//!         let mock = mock.clone();
//!         async move { mock.list("").await }
//!     });
//!     release.send(()).unwrap();
//!     assert!(pending.await.unwrap().unwrap().is_empty());
//! }
//! ```

use crate::client::ProductApi;
use crate::error::ApiResult;
use crate::model::{Product, ProductDraft, ProductId, ProductPatch, Stats};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A request received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(String),
    Stats,
    Add(ProductDraft),
    Update(ProductId, ProductPatch),
    Remove(ProductId),
}

/// A scripted response, optionally held back by a gate.
struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    response: ApiResult<T>,
}

type Queue<T> = Arc<Mutex<VecDeque<Scripted<T>>>>;

/// A mock `ProductApi` with expectation tracking for fluent testing.
///
/// Cloning is cheap and clones share expectations and the call log, so a test can keep
/// one handle while the code under test owns another.
#[derive(Clone, Default)]
pub struct MockApi {
    lists: Queue<Vec<Product>>,
    stats: Queue<Stats>,
    adds: Queue<Product>,
    updates: Queue<Product>,
    removes: Queue<()>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockApi {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `list` operation.
    pub fn expect_list(&self) -> ExpectationBuilder<Vec<Product>> {
        ExpectationBuilder::new(self.lists.clone())
    }

    /// Expects a `stats` operation.
    pub fn expect_stats(&self) -> ExpectationBuilder<Stats> {
        ExpectationBuilder::new(self.stats.clone())
    }

    /// Expects an `add` operation.
    pub fn expect_add(&self) -> ExpectationBuilder<Product> {
        ExpectationBuilder::new(self.adds.clone())
    }

    /// Expects an `update` operation.
    pub fn expect_update(&self) -> ExpectationBuilder<Product> {
        ExpectationBuilder::new(self.updates.clone())
    }

    /// Expects a `remove` operation.
    pub fn expect_remove(&self) -> ExpectationBuilder<()> {
        ExpectationBuilder::new(self.removes.clone())
    }

    /// Every request received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = [
            ("list", self.lists.lock().unwrap().len()),
            ("stats", self.stats.lock().unwrap().len()),
            ("add", self.adds.lock().unwrap().len()),
            ("update", self.updates.lock().unwrap().len()),
            ("remove", self.removes.lock().unwrap().len()),
        ];
        let unmet: Vec<String> = remaining
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(op, n)| format!("{op}: {n}"))
            .collect();
        if !unmet.is_empty() {
            panic!("Not all expectations were met. Remaining {}", unmet.join(", "));
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn next<T>(queue: &Queue<T>, op: &str) -> ApiResult<T> {
    let scripted = queue.lock().unwrap().pop_front();
    let Some(scripted) = scripted else {
        panic!("Unexpected {op} request");
    };
    if let Some(gate) = scripted.gate {
        // A dropped sender releases the response too
        let _ = gate.await;
    }
    scripted.response
}

#[async_trait]
impl ProductApi for MockApi {
    async fn list(&self, search: &str) -> ApiResult<Vec<Product>> {
        self.record(Call::List(search.to_string()));
        next(&self.lists, "list").await
    }

    async fn stats(&self) -> ApiResult<Stats> {
        self.record(Call::Stats);
        next(&self.stats, "stats").await
    }

    async fn add(&self, draft: ProductDraft) -> ApiResult<Product> {
        self.record(Call::Add(draft));
        next(&self.adds, "add").await
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> ApiResult<Product> {
        self.record(Call::Update(id, patch));
        next(&self.updates, "update").await
    }

    async fn remove(&self, id: ProductId) -> ApiResult<()> {
        self.record(Call::Remove(id));
        next(&self.removes, "remove").await
    }
}

/// Builder for a single scripted response.
pub struct ExpectationBuilder<T> {
    queue: Queue<T>,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> ExpectationBuilder<T> {
    fn new(queue: Queue<T>) -> Self {
        Self { queue, gate: None }
    }

    /// Holds the response back until `gate` fires or its sender is dropped.
    pub fn after(mut self, gate: oneshot::Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: crate::ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: ApiResult<T>) {
        self.queue.lock().unwrap().push_back(Scripted {
            gate: self.gate,
            response,
        });
    }
}
