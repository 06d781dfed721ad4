//! Page configuration
//!
//! Element identifiers form the contract between this crate and the page
//! markup; renaming an element in a template means overriding it here.
//! Every section falls back to the identifiers the admin pages ship with.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, Result};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub api: ApiConfig,
    #[serde(rename = "reportsUrls")]
    pub report_urls: ReportUrls,
    pub year_edges: Vec<DependencyEdge>,
    pub subject_cascade: SubjectCascadeIds,
    pub instructor_form: InstructorFormIds,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix for every endpoint path. Empty means page-relative.
    pub base_url: String,
    pub accept_invalid_certs: bool,
}

/// Mirrors the `window.reportsUrls` object the templates render.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReportUrls {
    #[serde(rename = "instructorReport")]
    pub instructor_report: String,
}

impl Default for ReportUrls {
    fn default() -> Self {
        Self {
            instructor_report: "/instructor_report/0".to_string(),
        }
    }
}

/// A college select driving a year select.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DependencyEdge {
    pub parent: String,
    pub child: String,
}

impl DependencyEdge {
    pub fn new(parent: &str, child: &str) -> Self {
        Self {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SubjectCascadeIds {
    pub college_select: String,
    pub year_select: String,
    pub term_select: String,
    pub term_wrapper: String,
    pub module_select: String,
    pub module_wrapper: String,
}

impl Default for SubjectCascadeIds {
    fn default() -> Self {
        Self {
            college_select: "subject-college-select".to_string(),
            year_select: "subject-year-select".to_string(),
            term_select: "term-select".to_string(),
            term_wrapper: "term-select-wrapper".to_string(),
            module_select: "module-select".to_string(),
            module_wrapper: "module-select-wrapper".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstructorFormIds {
    pub form: String,
    pub select: String,
}

impl Default for InstructorFormIds {
    fn default() -> Self {
        Self {
            form: "instructor-report-form".to_string(),
            select: "instructor-select".to_string(),
        }
    }
}

pub fn default_year_edges() -> Vec<DependencyEdge> {
    vec![
        DependencyEdge::new("term-college-select", "term-year-select"),
        DependencyEdge::new("module-college-select", "module-year-select"),
    ]
}

impl PageConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: PageConfig = serde_json::from_str(text)?;
        config.fill_defaults();
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "no-wasm")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reads the file named by `CAMPUS_SELECT_CONFIG`, or falls back to defaults.
    #[cfg(feature = "no-wasm")]
    pub fn from_env() -> Result<Self> {
        match std::env::var("CAMPUS_SELECT_CONFIG") {
            Ok(path) => {
                log::debug!("loading page config from {path}");
                Self::load(path)
            }
            Err(_) => {
                let mut config = Self::default();
                config.fill_defaults();
                Ok(config)
            }
        }
    }

    fn fill_defaults(&mut self) {
        if self.year_edges.is_empty() {
            self.year_edges = default_year_edges();
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.report_urls.instructor_report.contains('0') {
            return Err(ErrorKind::ConfigError(format!(
                "instructor report template {:?} has no \"0\" placeholder",
                self.report_urls.instructor_report
            ))
            .into());
        }
        for edge in &self.year_edges {
            if edge.parent.is_empty() || edge.child.is_empty() {
                return Err(ErrorKind::ConfigError(format!("incomplete edge {edge:?}")).into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_page_defaults() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config.year_edges, default_year_edges());
        assert_eq!(config.subject_cascade.term_wrapper, "term-select-wrapper");
        assert_eq!(config.instructor_form.select, "instructor-select");
        assert_eq!(config.report_urls.instructor_report, "/instructor_report/0");
        assert!(config.api.base_url.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = PageConfig::from_json(
            r#"{
                "api": { "base_url": "http://localhost:5000/api" },
                "reportsUrls": { "instructorReport": "/reports/instructor/0" },
                "subject_cascade": { "year_select": "year-x" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.report_urls.instructor_report, "/reports/instructor/0");
        assert_eq!(config.subject_cascade.year_select, "year-x");
        assert_eq!(config.subject_cascade.college_select, "subject-college-select");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = PageConfig::from_json(r#"{ "reportsUrls": { "instructorReport": "/r/x" } }"#)
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ConfigError(_)));
    }
}
