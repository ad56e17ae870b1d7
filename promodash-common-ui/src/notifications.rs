use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Shared toast queue. Editors push, the shell drains after each command.
#[derive(Clone)]
pub struct Notifications {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
    max_toasts: usize,
}

impl Notifications {
    pub fn new() -> Self {
        Self {
            toasts: Arc::new(Mutex::new(VecDeque::new())),
            max_toasts: 50,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        let mut toasts = self.lock();
        toasts.push_back(Toast {
            level,
            message: message.into(),
        });

        // Trim old toasts
        while toasts.len() > self.max_toasts {
            toasts.pop_front();
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn drain(&self) -> Vec<Toast> {
        self.lock().drain(..).collect()
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}
