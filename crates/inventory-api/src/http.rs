//! # HTTP Client
//!
//! [`HttpProductApi`] speaks to the REST collection:
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list | GET | `api/products[?search=<term>]` |
//! | stats | GET | `api/products/stats/value` |
//! | add | POST | `api/products` |
//! | update | PUT | `api/products/{id}` |
//! | remove | DELETE | `api/products/{id}` |
//!
//! Paths are resolved relative to the configured base URL, so a service mounted under a
//! prefix (`http://host/inventory/`) works the same as one at the root.

use crate::client::ProductApi;
use crate::error::{ApiError, ApiResult, Operation};
use crate::model::{Product, ProductDraft, ProductId, ProductPatch, Stats};
use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// `ProductApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpProductApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpProductApi {
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    /// Uses a preconfigured `reqwest::Client` (proxies, custom headers, ...).
    pub fn with_client(http: reqwest::Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { http, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Full URL of the list endpoint, with `search` encoded when non-empty.
    pub fn list_url(&self, search: &str) -> ApiResult<Url> {
        let mut url = self.endpoint(Operation::List, "api/products")?;
        if !search.is_empty() {
            url.query_pairs_mut().append_pair("search", search);
        }
        Ok(url)
    }

    fn endpoint(&self, operation: Operation, path: &str) -> ApiResult<Url> {
        self.base.join(path).map_err(|e| {
            warn!(%operation, error = %e, "Invalid request URL");
            ApiError::fetch_failed(operation)
        })
    }

    fn product_url(&self, operation: Operation, id: ProductId) -> ApiResult<Url> {
        self.endpoint(operation, &format!("api/products/{id}"))
    }
}

/// Rejects transport failures and non-2xx statuses.
async fn check(operation: Operation, sent: reqwest::Result<Response>) -> ApiResult<Response> {
    let response = sent.map_err(|e| {
        warn!(%operation, error = %e, "Request failed");
        ApiError::fetch_failed(operation)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(%operation, %status, %body, "Non-success response");
        return Err(ApiError::fetch_failed(operation));
    }
    Ok(response)
}

async fn decode<T: DeserializeOwned>(operation: Operation, sent: reqwest::Result<Response>) -> ApiResult<T> {
    let response = check(operation, sent).await?;
    response.json::<T>().await.map_err(|e| {
        warn!(%operation, error = %e, "Undecodable response body");
        ApiError::fetch_failed(operation)
    })
}

#[async_trait]
impl ProductApi for HttpProductApi {
    #[instrument(skip(self))]
    async fn list(&self, search: &str) -> ApiResult<Vec<Product>> {
        let url = self.list_url(search)?;
        debug!(%url, "Sending request");
        decode(Operation::List, self.http.get(url).send().await).await
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> ApiResult<Stats> {
        let url = self.endpoint(Operation::Stats, "api/products/stats/value")?;
        debug!(%url, "Sending request");
        decode(Operation::Stats, self.http.get(url).send().await).await
    }

    #[instrument(skip(self))]
    async fn add(&self, draft: ProductDraft) -> ApiResult<Product> {
        let url = self.endpoint(Operation::Add, "api/products")?;
        debug!(%url, "Sending request");
        decode(Operation::Add, self.http.post(url).json(&draft).send().await).await
    }

    #[instrument(skip(self))]
    async fn update(&self, id: ProductId, patch: ProductPatch) -> ApiResult<Product> {
        let url = self.product_url(Operation::Update, id)?;
        debug!(%url, "Sending request");
        decode(Operation::Update, self.http.put(url).json(&patch).send().await).await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: ProductId) -> ApiResult<()> {
        let url = self.product_url(Operation::Remove, id)?;
        debug!(%url, "Sending request");
        check(Operation::Remove, self.http.delete(url).send().await).await?;
        Ok(())
    }
}
