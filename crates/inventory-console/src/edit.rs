//! # Edit Session
//!
//! The edit dialog is a small state machine owned by the controller:
//!
//! ```text
//!            open(target)                 close() / Escape / backdrop
//! Closed ─────────────────▶ Open{id} ─────────────────────────────────▶ Closed
//!                             │  ▲
//!                             └──┘ open(other) replaces the target
//! ```
//!
//! While `Closed`, a save can never be attributed to a product. A save only sends the
//! fields the user actually changed: a field contributes when its text is non-empty and
//! differs from what the dialog opened with. Blank fields are left out, never cleared.

use crate::view::EditTarget;
use inventory_api::{ProductId, ProductPatch, QuantityValue};
use std::str::FromStr;
use tracing::debug;

/// An editable field of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Category,
    Quantity,
    Price,
}

impl EditField {
    pub const ALL: [EditField; 4] = [
        EditField::Name,
        EditField::Category,
        EditField::Quantity,
        EditField::Price,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EditField::Name => "name",
            EditField::Category => "category",
            EditField::Quantity => "quantity",
            EditField::Price => "price",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field '{0}' (expected name, category, quantity or price)")]
pub struct UnknownField(pub String);

impl FromStr for EditField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// The text in the dialog's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub price: String,
}

impl EditForm {
    pub fn get(&self, field: EditField) -> &str {
        match field {
            EditField::Name => &self.name,
            EditField::Category => &self.category,
            EditField::Quantity => &self.quantity,
            EditField::Price => &self.price,
        }
    }

    pub fn set(&mut self, field: EditField, text: impl Into<String>) {
        let slot = match field {
            EditField::Name => &mut self.name,
            EditField::Category => &mut self.category,
            EditField::Quantity => &mut self.quantity,
            EditField::Price => &mut self.price,
        };
        *slot = text.into();
    }
}

impl From<&EditTarget> for EditForm {
    fn from(target: &EditTarget) -> Self {
        Self {
            name: target.name.clone().unwrap_or_default(),
            category: target.category.clone().unwrap_or_default(),
            quantity: target.quantity.clone().unwrap_or_default(),
            price: target.price.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum EditState {
    Closed,
    Open {
        id: ProductId,
        snapshot: EditForm,
        form: EditForm,
    },
}

/// What a save request should do.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveDecision {
    /// Nothing to send; just close the dialog.
    Close,
    /// The form cannot be saved as it is. The dialog stays open.
    Invalid(String),
    Submit { id: ProductId, patch: ProductPatch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

/// Where a click on the open dialog landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the dialog.
    Backdrop,
    /// Anything inside the dialog.
    Dialog,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    state: EditState,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            state: EditState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditState::Open { .. })
    }

    /// The product being edited.
    pub fn editing(&self) -> Option<ProductId> {
        match &self.state {
            EditState::Open { id, .. } => Some(*id),
            EditState::Closed => None,
        }
    }

    pub fn form(&self) -> Option<&EditForm> {
        match &self.state {
            EditState::Open { form, .. } => Some(form),
            EditState::Closed => None,
        }
    }

    /// Opens the dialog for `target`, replacing any open one.
    pub fn open(&mut self, target: &EditTarget) {
        let form = EditForm::from(target);
        debug!(id = %target.id, ?form, "Edit session opened");
        self.state = EditState::Open {
            id: target.id,
            snapshot: form.clone(),
            form,
        };
    }

    /// Changes one input. Returns `false` when no dialog is open.
    pub fn set_field(&mut self, field: EditField, text: impl Into<String>) -> bool {
        match &mut self.state {
            EditState::Open { form, .. } => {
                form.set(field, text);
                true
            }
            EditState::Closed => false,
        }
    }

    /// Returns `true` if a dialog was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        if was_open {
            debug!(id = ?self.editing(), "Edit session closed");
        }
        self.state = EditState::Closed;
        was_open
    }

    /// Escape closes an open dialog; every other key is ignored.
    pub fn handle_key(&mut self, key: Key) -> bool {
        key == Key::Escape && self.close()
    }

    /// Only a click on the backdrop itself closes the dialog.
    pub fn handle_click(&mut self, target: ClickTarget) -> bool {
        target == ClickTarget::Backdrop && self.close()
    }

    /// Decides what saving the current form would do.
    pub fn prepare_save(&self) -> SaveDecision {
        let EditState::Open { id, snapshot, form } = &self.state else {
            return SaveDecision::Close;
        };

        match build_patch(snapshot, form) {
            Ok(patch) if patch.is_empty() => SaveDecision::Close,
            Ok(patch) => SaveDecision::Submit { id: *id, patch },
            Err(message) => SaveDecision::Invalid(message),
        }
    }
}

fn changed_text(before: &str, after: &str) -> Option<String> {
    let after = after.trim();
    (!after.is_empty() && after != before.trim()).then(|| after.to_string())
}

fn build_patch(snapshot: &EditForm, form: &EditForm) -> Result<ProductPatch, String> {
    let mut patch = ProductPatch {
        name: changed_text(&snapshot.name, &form.name),
        category: changed_text(&snapshot.category, &form.category),
        ..ProductPatch::default()
    };

    let quantity = form.quantity.trim();
    if !quantity.is_empty() {
        let value: i64 = quantity
            .parse()
            .map_err(|_| "Quantity must be a number".to_string())?;
        if snapshot.quantity.trim().parse::<i64>().ok() != Some(value) {
            patch.quantity = Some(QuantityValue::Absolute(value));
        }
    }

    let price = form.price.trim();
    if !price.is_empty() {
        let value: f64 = price
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| "Price must be a number".to_string())?;
        if snapshot.price.trim().parse::<f64>().ok() != Some(value) {
            patch.price = Some(value);
        }
    }

    Ok(patch)
}
