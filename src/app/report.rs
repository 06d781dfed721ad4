//! Instructor report form
//!
//! Submitting either warns about the missing instructor or yields the
//! navigation the page should perform once the "generating" state rendered.

use std::time::Duration;

use super::notify::{Notification, Notifier};
use super::spinner::{add_spinner, ButtonState};
use crate::config::ReportUrls;

pub const REPORT_NAVIGATION_DELAY: Duration = Duration::from_millis(500);
pub const GENERATING_TEXT: &str = "Generating...";
pub const MISSING_INSTRUCTOR_MESSAGE: &str = "Please select an instructor to generate a report";
pub const INSTRUCTOR_PLACEHOLDER: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Navigate {
        url: String,
        delay: Duration,
        button: ButtonState,
    },
    Rejected,
}

/// Templates are rendered with instructor id `0`, so the placeholder is the last `0`.
pub fn instructor_report_url(template: &str, instructor_id: &str) -> String {
    match template.rfind(INSTRUCTOR_PLACEHOLDER) {
        Some(at) => {
            let mut url = String::with_capacity(template.len() + instructor_id.len());
            url.push_str(&template[..at]);
            url.push_str(instructor_id);
            url.push_str(&template[at + INSTRUCTOR_PLACEHOLDER.len()..]);
            url
        }
        None => template.to_string(),
    }
}

pub fn submit_instructor_report<N: Notifier>(
    urls: &ReportUrls,
    selected: Option<&str>,
    notifier: &N,
) -> SubmitOutcome {
    match selected.map(str::trim).filter(|id| !id.is_empty()) {
        Some(instructor_id) => {
            let url = instructor_report_url(&urls.instructor_report, instructor_id);
            log::debug!("navigating to instructor report {url}");
            SubmitOutcome::Navigate {
                url,
                delay: REPORT_NAVIGATION_DELAY,
                button: add_spinner(Some(GENERATING_TEXT)),
            }
        }
        None => {
            notifier.notify(Notification::warning(MISSING_INSTRUCTOR_MESSAGE));
            SubmitOutcome::Rejected
        }
    }
}
