//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a `tracing_subscriber` formatter for the whole binary.
//!
//! - Levels come from `RUST_LOG`; `info` when it is unset.
//! - Output goes to **stderr**, so logs never interleave with the table on stdout.
//! - The compact format hides module paths and keeps span names inline.
//!
//! ```bash
//! RUST_LOG=debug inventory --memory --seed       # full payloads and toast lifecycle
//! RUST_LOG=inventory_api=debug inventory         # only client and store traffic
//! inventory 2>/dev/null                          # table only
//! ```
//!
//! What gets traced:
//!
//! - **Client operations**: one span per remote call with its arguments
//! - **Store lifecycle**: `Store started`, `Created`, `Updated`, `Deleted`, `Shutdown`
//! - **View**: every applied refresh with its generation, row count and total
//! - **Failures**: the underlying cause (status, transport error) before it is reduced
//!   to the user-facing message

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Builds the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
