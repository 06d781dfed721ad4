//! Dependent selector controller
//!
//! Keeps a year control in step with its college control and, on the subject
//! page, the term/module controls in step with the selected year. Every state
//! change is pushed to the injected [`Render`] view.

use std::cell::{Ref, RefCell};
use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::interface::CollegeApi;
use crate::model::dtos::CascadeParams;
use crate::model::structs::{NamedItem, StructureDescriptor, StructureType, YearInfo};
use crate::state::{RequestToken, SelectControl, SelectOption, Sequencer};

pub const LOADING_LABEL: &str = "Loading...";
pub const SELECT_COLLEGE_FIRST: &str = "-- Select College First --";
pub const SELECT_YEAR: &str = "-- Select Year --";
pub const SELECT_TERM: &str = "-- Select Term --";
pub const SELECT_MODULE: &str = "-- Select Module --";
pub const YEARS_ERROR: &str = "Error loading years";
pub const TERMS_ERROR: &str = "Error loading terms";
pub const MODULES_ERROR: &str = "Error loading modules";

/// Receives every control after it changed.
pub trait Render {
    fn render(&self, control: &SelectControl);
}

impl Render for () {
    fn render(&self, _control: &SelectControl) {}
}

impl<R: Render> Render for &R {
    fn render(&self, control: &SelectControl) {
        (**self).render(control)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Fresh options were rendered.
    Applied,
    /// The parent was cleared; the child shows its "select parent first" placeholder.
    Reset,
    /// The request failed and the affected control shows an error option.
    Failed,
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
    /// Preconditions not met, nothing was requested.
    Skipped,
    /// The college reported a structure type other than `term` or `module`.
    UnsupportedStructure(String),
}

#[derive(Debug)]
struct SecondLevel {
    terms: SelectControl,
    modules: SelectControl,
    chain: Sequencer,
}

#[derive(Debug, Clone, Copy)]
enum Branch {
    Term,
    Module,
}

impl Branch {
    fn placeholder(self) -> &'static str {
        match self {
            Branch::Term => SELECT_TERM,
            Branch::Module => SELECT_MODULE,
        }
    }

    fn error_label(self) -> &'static str {
        match self {
            Branch::Term => TERMS_ERROR,
            Branch::Module => MODULES_ERROR,
        }
    }

    fn payload_key(self) -> &'static str {
        match self {
            Branch::Term => "terms",
            Branch::Module => "modules",
        }
    }
}

pub struct DependentSelector<C, V> {
    api: C,
    view: V,
    years: RefCell<SelectControl>,
    second: Option<RefCell<SecondLevel>>,
}

impl<C: CollegeApi, V: Render> DependentSelector<C, V> {
    /// College → year only (structure pages).
    pub fn years_only(api: C, view: V, year_id: &str) -> Self {
        Self {
            api,
            view,
            years: RefCell::new(SelectControl::new(year_id, SELECT_COLLEGE_FIRST)),
            second: None,
        }
    }

    /// College → year → term or module (subject page).
    pub fn with_structure(api: C, view: V, year_id: &str, term_id: &str, module_id: &str) -> Self {
        let second = SecondLevel {
            terms: SelectControl::hidden(term_id, SELECT_TERM),
            modules: SelectControl::hidden(module_id, SELECT_MODULE),
            chain: Sequencer::default(),
        };
        Self {
            api,
            view,
            years: RefCell::new(SelectControl::new(year_id, SELECT_COLLEGE_FIRST)),
            second: Some(RefCell::new(second)),
        }
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn years(&self) -> Ref<'_, SelectControl> {
        self.years.borrow()
    }

    pub fn terms(&self) -> Option<Ref<'_, SelectControl>> {
        self.second
            .as_ref()
            .map(|second| Ref::map(second.borrow(), |s| &s.terms))
    }

    pub fn modules(&self) -> Option<Ref<'_, SelectControl>> {
        self.second
            .as_ref()
            .map(|second| Ref::map(second.borrow(), |s| &s.modules))
    }

    /// Mirrors a user picking a year in the rendered control.
    pub fn select_year(&self, value: &str) -> bool {
        self.years.borrow_mut().select(value)
    }

    /// Pushes the initial state of every control to the view.
    pub fn render_all(&self) {
        self.view.render(&self.years.borrow());
        if let Some(second) = &self.second {
            let second = second.borrow();
            self.view.render(&second.terms);
            self.view.render(&second.modules);
        }
    }

    pub async fn on_parent_change(&self, parent_value: &str) -> UpdateOutcome {
        let token = {
            let mut years = self.years.borrow_mut();
            let token = years.issue_token();
            years.show_loading(LOADING_LABEL);
            self.view.render(&years);
            token
        };
        self.hide_second_level();

        if parent_value.is_empty() {
            let mut years = self.years.borrow_mut();
            years.reset(SELECT_COLLEGE_FIRST);
            self.view.render(&years);
            return UpdateOutcome::Reset;
        }

        let result = load_list::<YearInfo, _>(
            self.api.get_college_years(parent_value),
            "years",
        )
        .await;

        let mut years = self.years.borrow_mut();
        if !years.is_current(token) {
            log::debug!("dropping stale years response for college {parent_value}");
            return UpdateOutcome::Stale;
        }

        let outcome = match result {
            Ok(items) => {
                years.populate(SELECT_YEAR, items.iter().map(year_option));
                UpdateOutcome::Applied
            }
            Err(e) => {
                log::warn!("failed to load years for college {parent_value}: {e}");
                years.fail(YEARS_ERROR);
                UpdateOutcome::Failed
            }
        };
        self.view.render(&years);
        outcome
    }

    pub async fn on_second_level_change(&self, parent_value: &str, child_value: &str) -> UpdateOutcome {
        let Some(second) = self.second.as_ref() else {
            return UpdateOutcome::Skipped;
        };
        // Even a cleared year supersedes whatever chain is still in flight.
        let token = second.borrow_mut().chain.issue();
        if parent_value.is_empty() || child_value.is_empty() {
            return UpdateOutcome::Skipped;
        }

        let structure = match load_structure(&self.api, parent_value).await {
            Ok(structure) => structure,
            Err(e) => {
                log::warn!("failed to load structure of college {parent_value}: {e}");
                return if second.borrow().chain.is_current(token) {
                    UpdateOutcome::Failed
                } else {
                    UpdateOutcome::Stale
                };
            }
        };
        if !second.borrow().chain.is_current(token) {
            log::debug!("dropping stale structure response for college {parent_value}");
            return UpdateOutcome::Stale;
        }

        let params = CascadeParams {
            college_id: parent_value.to_string(),
            year: child_value.to_string(),
        };
        match structure {
            StructureType::Term => {
                let result = load_list::<NamedItem, _>(
                    self.api.get_terms(params),
                    Branch::Term.payload_key(),
                )
                .await;
                self.apply_branch(token, Branch::Term, result)
            }
            StructureType::Module => {
                let result = load_list::<NamedItem, _>(
                    self.api.get_modules(params),
                    Branch::Module.payload_key(),
                )
                .await;
                self.apply_branch(token, Branch::Module, result)
            }
            StructureType::Unknown(tag) => {
                log::warn!("college {parent_value} reported unsupported structure type {tag:?}");
                UpdateOutcome::UnsupportedStructure(tag)
            }
        }
    }

    fn hide_second_level(&self) {
        let Some(second) = &self.second else {
            return;
        };
        let mut second = second.borrow_mut();
        // Any chain still in flight belongs to the previous college.
        second.chain.issue();
        second.terms.set_visible(false);
        second.modules.set_visible(false);
        self.view.render(&second.terms);
        self.view.render(&second.modules);
    }

    fn apply_branch(
        &self,
        token: RequestToken,
        branch: Branch,
        result: Result<Vec<NamedItem>>,
    ) -> UpdateOutcome {
        let Some(second) = &self.second else {
            return UpdateOutcome::Skipped;
        };
        let mut second = second.borrow_mut();
        if !second.chain.is_current(token) {
            log::debug!("dropping stale {} response", branch.payload_key());
            return UpdateOutcome::Stale;
        }

        let second = &mut *second;
        let (shown, hidden) = match branch {
            Branch::Term => (&mut second.terms, &mut second.modules),
            Branch::Module => (&mut second.modules, &mut second.terms),
        };

        let outcome = match result {
            Ok(items) => {
                shown.populate(branch.placeholder(), items.iter().map(named_option));
                UpdateOutcome::Applied
            }
            Err(e) => {
                log::warn!("failed to load {}: {e}", branch.payload_key());
                shown.fail(branch.error_label());
                UpdateOutcome::Failed
            }
        };
        shown.set_visible(true);
        hidden.set_visible(false);
        self.view.render(shown);
        self.view.render(hidden);
        outcome
    }
}

async fn load_list<T, F>(request: F, key: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: Future<Output = Result<Value>>,
{
    let resp = request.await?;
    Ok(serde_json::from_value(resp[key].clone())?)
}

async fn load_structure<C: CollegeApi>(api: &C, college_id: &str) -> Result<StructureType> {
    let resp = api.get_college_structure(college_id).await?;
    let descriptor: StructureDescriptor = serde_json::from_value(resp)?;
    Ok(descriptor.structure_type)
}

fn year_option(year: &YearInfo) -> SelectOption {
    SelectOption::new(
        year.year_number.to_string(),
        format!("Year {}", year.year_number),
    )
}

fn named_option(item: &NamedItem) -> SelectOption {
    SelectOption::new(item.id.to_string(), item.name.clone())
}

#[cfg(test)]
#[path = "tests/cascade_tests.rs"]
mod tests;
