//! In-memory model of the select controls
//!
//! Each control owns its full option list, its wrapper visibility and the
//! token of the most recent request issued on its behalf. The DOM (or any
//! other view) is only ever a projection of this state, see
//! [`SelectControl::options_html`].

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Placeholders carry an empty value so forms treat them as "nothing selected".
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self::new(String::new(), label)
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Hands out increasing tokens; only the last one issued is current.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    latest: u64,
}

impl Sequencer {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[derive(Debug, Clone)]
pub struct SelectControl {
    id: String,
    options: Vec<SelectOption>,
    selected: Option<String>,
    visible: bool,
    status: ControlStatus,
    requests: Sequencer,
}

impl SelectControl {
    pub fn new(id: impl Into<String>, placeholder: &str) -> Self {
        Self {
            id: id.into(),
            options: vec![SelectOption::placeholder(placeholder)],
            selected: None,
            visible: true,
            status: ControlStatus::Idle,
            requests: Sequencer::default(),
        }
    }

    pub fn hidden(id: impl Into<String>, placeholder: &str) -> Self {
        let mut control = Self::new(id, placeholder);
        control.visible = false;
        control
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn status(&self) -> ControlStatus {
        self.status
    }

    pub fn issue_token(&mut self) -> RequestToken {
        self.requests.issue()
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.requests.is_current(token)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Picks one of the existing non-placeholder values. Unknown values are ignored.
    pub fn select(&mut self, value: &str) -> bool {
        let known = self
            .options
            .iter()
            .any(|o| !o.is_placeholder() && o.value == value);
        if known {
            self.selected = Some(value.to_string());
        }
        known
    }

    pub fn show_loading(&mut self, label: &str) {
        self.replace(vec![SelectOption::placeholder(label)], ControlStatus::Loading);
    }

    pub fn reset(&mut self, placeholder: &str) {
        self.replace(vec![SelectOption::placeholder(placeholder)], ControlStatus::Idle);
    }

    pub fn populate<I>(&mut self, placeholder: &str, items: I)
    where
        I: IntoIterator<Item = SelectOption>,
    {
        let mut options = vec![SelectOption::placeholder(placeholder)];
        options.extend(items);
        self.replace(options, ControlStatus::Ready);
    }

    pub fn fail(&mut self, label: &str) {
        self.replace(vec![SelectOption::placeholder(label)], ControlStatus::Failed);
    }

    fn replace(&mut self, options: Vec<SelectOption>, status: ControlStatus) {
        self.options = options;
        self.selected = None;
        self.status = status;
    }

    /// `<option>` markup for the current option set, suitable for `innerHTML`.
    pub fn options_html(&self) -> String {
        let mut html = String::new();
        for option in &self.options {
            let selected = match self.selected.as_deref() {
                Some(value) if !option.is_placeholder() && value == option.value => " selected",
                _ => "",
            };
            let _ = write!(
                html,
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(&option.value),
                selected,
                escape_html(&option.label)
            );
        }
        html
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years() -> Vec<SelectOption> {
        vec![
            SelectOption::new("1", "Year 1"),
            SelectOption::new("2", "Year 2"),
        ]
    }

    #[test]
    fn populate_replaces_instead_of_appending() {
        let mut control = SelectControl::new("year", "-- Select College First --");
        control.populate("-- Select Year --", years());
        control.populate("-- Select Year --", years());
        assert_eq!(control.labels(), ["-- Select Year --", "Year 1", "Year 2"]);
        assert_eq!(control.status(), ControlStatus::Ready);
    }

    #[test]
    fn replacing_options_drops_the_selection() {
        let mut control = SelectControl::new("year", "-");
        control.populate("-- Select Year --", years());
        assert!(control.select("2"));
        assert!(!control.select(""));
        assert_eq!(control.selected(), Some("2"));

        control.show_loading("Loading...");
        assert_eq!(control.selected(), None);
        assert_eq!(control.status(), ControlStatus::Loading);
    }

    #[test]
    fn only_the_latest_token_is_current() {
        let mut control = SelectControl::new("year", "-");
        let first = control.issue_token();
        let second = control.issue_token();
        assert!(!control.is_current(first));
        assert!(control.is_current(second));
        assert!(first < second);
    }

    #[test]
    fn html_projection_escapes_and_marks_selection() {
        let mut control = SelectControl::new("module", "-");
        control.populate(
            "-- Select Module --",
            vec![SelectOption::new("9", "Algebra <I> & \"II\"")],
        );
        control.select("9");
        assert_eq!(
            control.options_html(),
            concat!(
                r#"<option value="">-- Select Module --</option>"#,
                r#"<option value="9" selected>Algebra &lt;I&gt; &amp; &quot;II&quot;</option>"#
            )
        );
    }

    #[test]
    fn hidden_controls_start_invisible() {
        let control = SelectControl::hidden("term", "-- Select Term --");
        assert!(!control.is_visible());
        assert_eq!(control.labels(), ["-- Select Term --"]);
    }
}
