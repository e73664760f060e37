//! # Refresh Orchestrator
//!
//! Brings the local view back in line with the remote collection after every action:
//!
//! 1. raise the busy indicator (released by [`BusyGuard`] on every exit path),
//! 2. take the next request generation,
//! 3. fetch `list(search)` and `stats()` concurrently, all or nothing,
//! 4. drop the result if a newer refresh was issued meanwhile,
//! 5. otherwise render the table and the formatted total.
//!
//! On failure the previous table and total stay on screen and the error goes back to the
//! caller.

use crate::surface::ViewSurface;
use crate::view::{format_money, render, TableView};
use inventory_api::{ApiResult, ProductApi};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument};

/// Shows the busy indicator for as long as it lives.
pub struct BusyGuard<'a> {
    surface: &'a dyn ViewSurface,
}

impl<'a> BusyGuard<'a> {
    pub fn acquire(surface: &'a dyn ViewSurface) -> Self {
        surface.set_busy(true);
        Self { surface }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.surface.set_busy(false);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The view now shows this result.
    Applied { rows: usize, total: String },
    /// A newer refresh was issued before this one resolved; nothing was drawn.
    Superseded { generation: u64 },
}

pub struct Refresher<A> {
    api: A,
    surface: Arc<dyn ViewSurface>,
    generation: AtomicU64,
    shown: Mutex<TableView>,
}

impl<A: ProductApi> Refresher<A> {
    pub fn new(api: A, surface: Arc<dyn ViewSurface>) -> Self {
        Self {
            api,
            surface,
            generation: AtomicU64::new(0),
            shown: Mutex::new(TableView::default()),
        }
    }

    /// The table most recently applied to the surface.
    pub fn shown(&self) -> TableView {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[instrument(skip(self))]
    pub async fn refresh(&self, search: &str) -> ApiResult<RefreshOutcome> {
        let _busy = BusyGuard::acquire(self.surface.as_ref());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (items, stats) = tokio::try_join!(self.api.list(search), self.api.stats())?;

        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            debug!(generation, latest, "Discarding stale refresh");
            return Ok(RefreshOutcome::Superseded { generation });
        }

        let table = render(&items);
        let total = format_money(stats.total);
        self.surface.replace_rows(&table);
        self.surface.set_total(&total);
        let rows = table.len();
        *self.shown.lock().unwrap_or_else(PoisonError::into_inner) = table;

        info!(generation, rows, %total, "View refreshed");
        Ok(RefreshOutcome::Applied { rows, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use inventory_api::mock::{Call, MockApi};
    use inventory_api::{ApiError, Operation, Product, Stats};
    use tokio::sync::oneshot;

    fn stock() -> Vec<Product> {
        vec![
            Product::new(2, "Washer", "Hardware", 40, 0.05),
            Product::new(1, "Bolt", "Hardware", 5, 0.5),
        ]
    }

    #[tokio::test]
    async fn test_refresh_renders_rows_and_total() {
        let mock = MockApi::new();
        mock.expect_list().return_ok(stock());
        mock.expect_stats().return_ok(Stats { total: 4.5 });
        let surface = Arc::new(MemorySurface::new());
        let refresher = Refresher::new(mock.clone(), surface.clone());

        let outcome = refresher.refresh("hard").await.unwrap();

        assert_eq!(
            outcome,
            RefreshOutcome::Applied {
                rows: 2,
                total: "4.50".to_string()
            }
        );
        assert_eq!(surface.table(), render(&stock()));
        assert_eq!(surface.total(), "4.50");
        assert_eq!(surface.busy_changes(), vec![true, false]);
        assert_eq!(refresher.shown().len(), 2);
        assert!(mock.calls().contains(&Call::List("hard".to_string())));
        mock.verify();
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_view_and_clears_busy() {
        let mock = MockApi::new();
        mock.expect_list().return_ok(stock());
        mock.expect_stats().return_ok(Stats { total: 4.5 });
        mock.expect_list().return_err(ApiError::fetch_failed(Operation::List));
        mock.expect_stats().return_ok(Stats { total: 9.0 });
        let surface = Arc::new(MemorySurface::new());
        let refresher = Refresher::new(mock.clone(), surface.clone());

        refresher.refresh("").await.unwrap();
        let err = refresher.refresh("").await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch products");
        assert!(!surface.is_busy());
        assert_eq!(surface.renders(), 1);
        assert_eq!(surface.total(), "4.50");
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded() {
        let mock = MockApi::new();
        let (release_first, first_gate) = oneshot::channel();
        // The first refresh resolves last
        mock.expect_list().after(first_gate).return_ok(stock());
        mock.expect_stats().return_ok(Stats { total: 4.5 });
        mock.expect_list().return_ok(vec![Product::new(1, "Bolt", "Hardware", 5, 0.5)]);
        mock.expect_stats().return_ok(Stats { total: 2.5 });

        let surface = Arc::new(MemorySurface::new());
        let refresher = Arc::new(Refresher::new(mock.clone(), surface.clone()));

        let first = tokio::spawn({
            let refresher = refresher.clone();
            async move { refresher.refresh("").await }
        });
        // Let the first refresh take its generation and block on the gate
        while mock.calls().len() < 2 {
            tokio::task::yield_now().await;
        }

        let second = refresher.refresh("").await.unwrap();
        assert_eq!(
            second,
            RefreshOutcome::Applied {
                rows: 1,
                total: "2.50".to_string()
            }
        );

        release_first.send(()).unwrap();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, RefreshOutcome::Superseded { generation: 1 });

        // The newer result is still on screen
        assert_eq!(surface.table().len(), 1);
        assert_eq!(surface.total(), "2.50");
        assert_eq!(surface.renders(), 1);
    }

    #[test]
    fn test_busy_guard_releases_on_drop() {
        let surface = MemorySurface::new();
        {
            let _busy = BusyGuard::acquire(&surface);
            assert!(surface.is_busy());
        }
        assert!(!surface.is_busy());
    }
}
