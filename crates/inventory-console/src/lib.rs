//! # Inventory Console Library
//!
//! The view-independent half of the inventory console, exposed as a library so the
//! workflows can be driven from integration tests.
//!
//! ## Core Components
//!
//! - **[view]**: Pure projection of products into a [`TableView`](view::TableView) with
//!   per-row action affordances, plus a keyed row diff.
//! - **[refresh]**: Re-synchronizes the view with the remote collection.
//! - **[edit]**: The modal edit session state machine.
//! - **[notify]**: Auto-expiring toasts.
//! - **[app]**: The [`InventoryApp`](app::InventoryApp) controller with one handler per user action.
//! - **[surface]**: The traits the controller renders through, with an in-memory and a
//!   terminal implementation.
//! - **[command]**, **[config]**, **[logging]**: the terminal front end plumbing.

pub mod app;
pub mod command;
pub mod config;
pub mod edit;
pub mod logging;
pub mod notify;
pub mod refresh;
pub mod surface;
pub mod view;
