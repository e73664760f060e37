//! # Presentation Surfaces
//!
//! The controller never draws anything itself. It pushes state through a
//! [`ViewSurface`] and asks blocking questions through a [`Prompt`]:
//!
//! | Implementation | Used by |
//! |---|---|
//! | [`MemorySurface`] / [`ScriptedPrompt`] | tests; records every call |
//! | [`TerminalSurface`] / [`ConsolePrompt`] | the `inventory` binary |
//!
//! Surface methods take `&self` because toast expiry publishes from background tasks.
//! Implementations keep their locks short and never hold one across an `.await`.

mod memory;
mod terminal;

pub use memory::{MemorySurface, ScriptedPrompt};
pub use terminal::{ConsolePrompt, SharedLines, TerminalSurface};

use crate::edit::EditForm;
use crate::notify::Toast;
use crate::view::TableView;
use async_trait::async_trait;
use inventory_api::ProductId;

/// Where rendered state goes.
pub trait ViewSurface: Send + Sync {
    /// Replaces the whole table body.
    fn replace_rows(&self, table: &TableView);

    /// Shows the aggregate total, already formatted.
    fn set_total(&self, total: &str);

    fn set_busy(&self, busy: bool);

    /// Publishes the currently visible toasts, oldest first.
    fn show_toasts(&self, toasts: &[Toast]);

    /// Shows the edit dialog for a product, or hides it with `None`.
    fn show_editor(&self, editor: Option<(ProductId, &EditForm)>);

    fn clear_add_form(&self);
}

/// Blocking questions for the user.
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;

    async fn alert(&self, message: &str);
}
