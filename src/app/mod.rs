//! Application module - handles the page behaviour
//!
//! Dropdown cascades, notifications, button spinners and the instructor
//! report form. Everything here is platform independent; the browser
//! wiring lives in `crate::dom`.

pub mod cascade;
pub mod notify;
pub mod report;
pub mod spinner;

pub use cascade::{DependentSelector, Render, UpdateOutcome};
pub use notify::{LogNotifier, Notification, NotificationKind, Notifier};
pub use report::{submit_instructor_report, SubmitOutcome};
pub use spinner::{add_spinner, ButtonState};
