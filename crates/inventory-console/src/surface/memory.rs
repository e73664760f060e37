//! Recording surface and scripted prompt for tests.

use super::{Prompt, ViewSurface};
use crate::edit::EditForm;
use crate::notify::Toast;
use crate::view::TableView;
use async_trait::async_trait;
use inventory_api::ProductId;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Recorded {
    table: TableView,
    renders: usize,
    total: String,
    busy: bool,
    busy_changes: Vec<bool>,
    toasts: Vec<Toast>,
    editor: Option<(ProductId, EditForm)>,
    add_form_clears: usize,
}

/// A `ViewSurface` that keeps the latest state of everything it was shown.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<Recorded>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, Recorded> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn table(&self) -> TableView {
        self.state().table.clone()
    }

    /// How many times the table body was replaced.
    pub fn renders(&self) -> usize {
        self.state().renders
    }

    pub fn total(&self) -> String {
        self.state().total.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    /// Every `set_busy` call, in order.
    pub fn busy_changes(&self) -> Vec<bool> {
        self.state().busy_changes.clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.state().toasts.clone()
    }

    pub fn toast_messages(&self) -> Vec<String> {
        self.state().toasts.iter().map(|t| t.message.clone()).collect()
    }

    pub fn editor(&self) -> Option<(ProductId, EditForm)> {
        self.state().editor.clone()
    }

    pub fn add_form_clears(&self) -> usize {
        self.state().add_form_clears
    }
}

impl ViewSurface for MemorySurface {
    fn replace_rows(&self, table: &TableView) {
        let mut state = self.state();
        state.table = table.clone();
        state.renders += 1;
    }

    fn set_total(&self, total: &str) {
        self.state().total = total.to_string();
    }

    fn set_busy(&self, busy: bool) {
        let mut state = self.state();
        state.busy = busy;
        state.busy_changes.push(busy);
    }

    fn show_toasts(&self, toasts: &[Toast]) {
        self.state().toasts = toasts.to_vec();
    }

    fn show_editor(&self, editor: Option<(ProductId, &EditForm)>) {
        self.state().editor = editor.map(|(id, form)| (id, form.clone()));
    }

    fn clear_add_form(&self) {
        self.state().add_form_clears += 1;
    }
}

/// A `Prompt` with queued confirm answers.
///
/// An unscripted `confirm` answers `false`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    questions: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the answer to the next `confirm`.
    pub fn answer(&self, yes: bool) -> &Self {
        lock(&self.answers).push_back(yes);
        self
    }

    /// Every confirm message asked so far.
    pub fn questions(&self) -> Vec<String> {
        lock(&self.questions).clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn confirm(&self, message: &str) -> bool {
        lock(&self.questions).push(message.to_string());
        lock(&self.answers).pop_front().unwrap_or(false)
    }

    async fn alert(&self, message: &str) {
        lock(&self.alerts).push(message.to_string());
    }
}
