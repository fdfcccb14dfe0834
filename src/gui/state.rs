use std::cell::RefCell;

use crate::core::{db::WorkspaceDb, tags::Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct AppState {
    pub workspace: Option<WorkspaceDb>,
    pub toasts: Vec<Toast>,
}

impl AppState {
    /// Keeps the most recent toasts only.
    pub fn push_toasts(&mut self, toasts: impl IntoIterator<Item = Toast>) {
        const MAX_TOASTS: usize = 4;
        self.toasts.extend(toasts);
        let overflow = self.toasts.len().saturating_sub(MAX_TOASTS);
        self.toasts.drain(..overflow);
    }
}

/// Notifier that buffers toasts during a single update.
#[derive(Debug, Default)]
pub struct ToastCollector {
    toasts: RefCell<Vec<Toast>>,
}

impl ToastCollector {
    pub fn into_toasts(self) -> Vec<Toast> {
        self.toasts.into_inner()
    }
}

impl Notifier for ToastCollector {
    fn notify(&self, message: &str) {
        self.toasts.borrow_mut().push(Toast::Success(message.to_string()));
    }

    fn notify_error(&self, message: &str) {
        self.toasts.borrow_mut().push(Toast::Error(message.to_string()));
    }
}
