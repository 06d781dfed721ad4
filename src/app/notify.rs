//! Transient toast notifications
//!
//! Notifications go through an injectable [`Notifier`]; nothing here keeps
//! global state. The browser implementation lives in `dom::DomNotifier`.

#[cfg(test)]
use std::cell::RefCell;
use std::time::Duration;

/// Delay before the toast fades in.
pub const FADE_IN_DELAY: Duration = Duration::from_millis(100);
/// Time between creation and the start of the fade out.
pub const DISPLAY_DURATION: Duration = Duration::from_millis(3000);
/// Time between the start of the fade out and removal.
pub const FADE_OUT_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Success,
    Warning,
    Danger,
}

impl NotificationKind {
    /// Anything unrecognised is shown as a success toast.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "warning" => NotificationKind::Warning,
            "danger" => NotificationKind::Danger,
            _ => NotificationKind::Success,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            NotificationKind::Success => "#2dce89",
            NotificationKind::Warning => "#fb6340",
            NotificationKind::Danger => "#f5365c",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Warning)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Danger)
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Native notifier: notifications become log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => log::info!("{}", notification.message),
            NotificationKind::Warning => log::warn!("{}", notification.message),
            NotificationKind::Danger => log::error!("{}", notification.message),
        }
    }
}

/// Keeps every notification so tests can inspect them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    seen: RefCell<Vec<Notification>>,
}

#[cfg(test)]
impl CollectingNotifier {
    pub fn take(&self) -> Vec<Notification> {
        self.seen.take()
    }
}

#[cfg(test)]
impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}
