//! # Notifications
//!
//! Short-lived toasts. Each toast is shown immediately and removed
//! [`TOAST_TTL`] later by its own timer task. Toasts are independent: no queue, no
//! de-duplication and no limit on how many are visible at once.

use crate::surface::ViewSurface;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// Publishes toasts to a surface and expires them.
///
/// Clones share the visible list.
#[derive(Clone)]
pub struct Notifier {
    surface: Arc<dyn ViewSurface>,
    visible: Arc<Mutex<Vec<Toast>>>,
    next_id: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new(surface: Arc<dyn ViewSurface>) -> Self {
        Self {
            surface,
            visible: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn visible_mut(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows `message` and schedules its removal. Must be called inside a tokio runtime.
    pub fn toast(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            message: message.into(),
            kind,
        };
        debug!(id, message = %toast.message, ?kind, "Toast shown");
        self.visible_mut().push(toast);
        self.publish();

        let notifier = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            notifier.expire(id);
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.toast(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.toast(message, ToastKind::Error)
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.visible_mut().clone()
    }

    fn expire(&self, id: u64) {
        self.visible_mut().retain(|t| t.id != id);
        debug!(id, "Toast expired");
        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.visible();
        self.surface.show_toasts(&snapshot);
    }
}
