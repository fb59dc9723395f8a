use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        };
        f.write_str(s)
    }
}

/// Transient, auto-dismissing message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Interactive controls that are disabled while their request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    UploadPolicy,
    UploadDocuments,
    Analyze,
    Ask,
}

/// Everything the controller needs from whatever is drawing the screens
pub trait Frontend: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Blocking yes/no question; `false` aborts the action.
    fn confirm(&self, prompt: &str) -> bool;

    /// `Some(label)` disables the control and shows progress, `None` restores it.
    fn set_busy(&self, control: Control, label: Option<&str>);
}

/// Marks a control busy for its lifetime; dropping it always re-enables the control.
pub struct BusyGuard {
    frontend: Arc<dyn Frontend>,
    control: Control,
}

impl BusyGuard {
    pub fn new(frontend: Arc<dyn Frontend>, control: Control, label: &str) -> Self {
        frontend.set_busy(control, Some(label));
        Self { frontend, control }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.frontend.set_busy(self.control, None);
    }
}
