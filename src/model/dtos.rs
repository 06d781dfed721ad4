use crate::error::{ErrorKind, Result};

/// Common parameters for the second-level (term/module) queries
#[derive(Debug, Clone)]
pub struct CascadeParams {
    pub college_id: String,
    pub year: String,
}

/// The four GET endpoints the cascade consumes.
#[derive(Debug, Clone, Copy)]
pub enum Endpoint<'a> {
    CollegeYears { college_id: &'a str },
    CollegeStructure { college_id: &'a str },
    Terms { college_id: &'a str, year: &'a str },
    Modules { college_id: &'a str, year: &'a str },
}

impl Endpoint<'_> {
    /// Path relative to the API base, with every identifier validated.
    pub fn path(&self) -> Result<String> {
        let path = match *self {
            Endpoint::CollegeYears { college_id } => {
                format!("/get_college_years/{}", segment(college_id)?)
            }
            Endpoint::CollegeStructure { college_id } => {
                format!("/get_college_structure/{}", segment(college_id)?)
            }
            Endpoint::Terms { college_id, year } => {
                format!("/get_terms/{}/{}", segment(college_id)?, segment(year)?)
            }
            Endpoint::Modules { college_id, year } => {
                format!("/get_modules/{}/{}", segment(college_id)?, segment(year)?)
            }
        };
        Ok(path)
    }
}

fn segment(value: &str) -> Result<&str> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(value)
    } else {
        Err(ErrorKind::InvalidIdentifier(value.to_string()).into())
    }
}
