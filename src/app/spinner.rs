use crate::state::escape_html;

pub const DEFAULT_SPINNER_TEXT: &str = "Loading...";
pub const SPINNER_ICON: &str = r#"<i class="tim-icons icon-refresh-01 spinning"></i>"#;

/// What a submit button shows while the page is busy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label_html: String,
    pub disabled: bool,
}

pub fn add_spinner(text: Option<&str>) -> ButtonState {
    let text = text.unwrap_or(DEFAULT_SPINNER_TEXT);
    ButtonState {
        label_html: format!("{SPINNER_ICON} {}", escape_html(text)),
        disabled: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_disables_and_prefixes_icon() {
        let state = add_spinner(Some("Generating..."));
        assert!(state.disabled);
        assert_eq!(
            state.label_html,
            r#"<i class="tim-icons icon-refresh-01 spinning"></i> Generating..."#
        );
    }

    #[test]
    fn default_text() {
        assert!(add_spinner(None).label_html.ends_with(" Loading..."));
    }
}
