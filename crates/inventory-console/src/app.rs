//! # Inventory App
//!
//! [`InventoryApp`] wires the remote client, the refresher, the edit session and the
//! notifier together and exposes one handler per user action.
//!
//! ## Failure Policy
//!
//! Handlers never return errors. Every failure is caught at the handler boundary:
//!
//! | Where | Shown as |
//! |---|---|
//! | initial load | blocking alert |
//! | everything else | error toast |
//!
//! The message is the failed operation's own message, or a per-handler fallback when it
//! is blank.
//!
//! ## Refresh After Mutation
//!
//! Every successful mutation is followed by an unfiltered `refresh("")`, so the table
//! always reflects the server after an action, even if a search was active.

use crate::edit::{ClickTarget, EditField, EditSession, Key, SaveDecision};
use crate::notify::Notifier;
use crate::refresh::{BusyGuard, RefreshOutcome, Refresher};
use crate::surface::{Prompt, ViewSurface};
use crate::view::{ActionKind, RowAction};
use inventory_api::{ApiError, ApiResult, ProductApi, ProductDraft, ProductId, ProductPatch, QuantityDelta, QuantityNormalizer};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, instrument, warn};

pub const DELETE_QUESTION: &str = "Delete this product?";

/// Why the add form was refused before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddFormError {
    #[error("Name and Category are required")]
    MissingRequired,
    #[error("Quantity and Price must be numbers")]
    NotANumber,
}

/// The text of the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub price: String,
}

impl AddForm {
    /// Validates the form. Blank quantity and price count as zero.
    pub fn to_draft(&self) -> Result<ProductDraft, AddFormError> {
        let name = self.name.trim();
        let category = self.category.trim();
        if name.is_empty() || category.is_empty() {
            return Err(AddFormError::MissingRequired);
        }

        let quantity = match self.quantity.trim() {
            "" => 0,
            text => text.parse::<i64>().map_err(|_| AddFormError::NotANumber)?,
        };
        let price = match self.price.trim() {
            "" => 0.0,
            text => text
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or(AddFormError::NotANumber)?,
        };
        Ok(ProductDraft::new(name, category, quantity, price))
    }
}

type Api<A> = Arc<QuantityNormalizer<A>>;

/// The page controller.
///
/// # Example
///
/// ```rust
/// use inventory_api::store::ProductStore;
/// use inventory_api::ProductDraft;
/// use inventory_console::app::InventoryApp;
/// use inventory_console::surface::{MemorySurface, ScriptedPrompt};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let (mut store, client) = ProductStore::new(32);
///     store.seed(ProductDraft::new("Bolt", "Hardware", 10, 0.5)).unwrap();
///     tokio::spawn(store.run());
///
///     let surface = Arc::new(MemorySurface::new());
///     let app = InventoryApp::new(client, surface.clone(), Arc::new(ScriptedPrompt::new()));
///     app.initial_load().await;
///
///     assert_eq!(surface.table().len(), 1);
///     assert_eq!(surface.total(), "5.00");
/// }
/// ```
pub struct InventoryApp<A> {
    api: Api<A>,
    refresher: Refresher<Api<A>>,
    session: Mutex<EditSession>,
    notifier: Notifier,
    surface: Arc<dyn ViewSurface>,
    prompt: Arc<dyn Prompt>,
}

impl<A: ProductApi> InventoryApp<A> {
    /// Wraps `api` in a [`QuantityNormalizer`] and wires the controller to `surface`.
    pub fn new(api: A, surface: Arc<dyn ViewSurface>, prompt: Arc<dyn Prompt>) -> Self {
        let api = Arc::new(QuantityNormalizer::new(api));
        Self {
            refresher: Refresher::new(api.clone(), surface.clone()),
            api,
            session: Mutex::new(EditSession::new()),
            notifier: Notifier::new(surface.clone()),
            surface,
            prompt,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn refresher(&self) -> &Refresher<Api<A>> {
        &self.refresher
    }

    /// The product the edit dialog is open for.
    pub fn editing(&self) -> Option<ProductId> {
        self.session().editing()
    }

    fn session(&self) -> MutexGuard<'_, EditSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads the affordance of a row in the table on screen back into an action.
    pub fn resolve(&self, id: ProductId, kind: ActionKind) -> Option<RowAction> {
        self.refresher
            .shown()
            .affordance(id, kind)
            .and_then(RowAction::from_affordance)
    }

    fn toast_failure(&self, error: &ApiError, fallback: &str) {
        warn!(operation = %error.operation(), error = %error, "Action failed");
        self.notifier.error(error.message_or(fallback));
    }

    #[instrument(skip(self))]
    pub async fn initial_load(&self) {
        if let Err(e) = self.refresher.refresh("").await {
            self.prompt.alert(e.message_or("Failed to fetch products")).await;
        }
    }

    #[instrument(skip(self))]
    pub async fn refresh_clicked(&self) {
        if let Err(e) = self.refresher.refresh("").await {
            self.toast_failure(&e, "Failed to fetch products");
        }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Option<RefreshOutcome> {
        match self.refresher.refresh(term.trim()).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.toast_failure(&e, "Failed to fetch products");
                None
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn add(&self, form: &AddForm) {
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.prompt.alert(&e.to_string()).await;
                return;
            }
        };

        let _busy = BusyGuard::acquire(self.surface.as_ref());
        match self.add_and_refresh(draft).await {
            Ok(()) => {
                self.notifier.success("Product added");
            }
            Err(e) => self.toast_failure(&e, "Failed to add"),
        }
    }

    async fn add_and_refresh(&self, draft: ProductDraft) -> ApiResult<()> {
        let created = self.api.add(draft).await?;
        info!(id = %created.id, "Product added");
        self.surface.clear_add_form();
        self.refresher.refresh("").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn row_action(&self, action: RowAction) {
        let result = match action {
            RowAction::Edit(target) => {
                let mut session = self.session();
                session.open(&target);
                self.surface.show_editor(session.form().map(|form| (target.id, form)));
                return;
            }
            RowAction::Delete(id) => {
                if !self.prompt.confirm(DELETE_QUESTION).await {
                    return;
                }
                self.delete(id).await
            }
            RowAction::Increment(id) => self.bump(id, QuantityDelta::Increment).await,
            RowAction::Decrement(id) => self.bump(id, QuantityDelta::Decrement).await,
        };

        if let Err(e) = result {
            self.toast_failure(&e, "Operation failed");
        }
    }

    async fn bump(&self, id: ProductId, delta: QuantityDelta) -> ApiResult<()> {
        self.api.update(id, ProductPatch::quantity_delta(delta)).await?;
        self.refresher.refresh("").await?;
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> ApiResult<()> {
        self.api.remove(id).await?;
        self.notifier.success("Deleted");
        self.refresher.refresh("").await?;
        Ok(())
    }

    /// Changes one input of the open dialog. Returns `false` when no dialog is open.
    pub fn set_field(&self, field: EditField, text: &str) -> bool {
        let mut session = self.session();
        if !session.set_field(field, text) {
            return false;
        }
        if let (Some(id), Some(form)) = (session.editing(), session.form()) {
            self.surface.show_editor(Some((id, form)));
        }
        true
    }

    #[instrument(skip(self))]
    pub async fn save_edit(&self) {
        let decision = self.session().prepare_save();
        let (id, patch) = match decision {
            SaveDecision::Close => {
                self.close_editor();
                return;
            }
            SaveDecision::Invalid(message) => {
                self.notifier.error(message);
                return;
            }
            SaveDecision::Submit { id, patch } => (id, patch),
        };

        if let Err(e) = self.api.update(id, patch).await {
            self.toast_failure(&e, "Failed to save");
            return;
        }
        self.notifier.success("Saved");
        self.close_editor();
        if let Err(e) = self.refresher.refresh("").await {
            self.toast_failure(&e, "Failed to save");
        }
    }

    pub fn cancel_edit(&self) {
        self.close_editor();
    }

    pub fn key(&self, key: Key) {
        if self.session().handle_key(key) {
            self.surface.show_editor(None);
        }
    }

    pub fn click(&self, target: ClickTarget) {
        if self.session().handle_click(target) {
            self.surface.show_editor(None);
        }
    }

    fn close_editor(&self) {
        if self.session().close() {
            self.surface.show_editor(None);
        }
    }
}
