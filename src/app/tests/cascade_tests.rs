use super::*;
use crate::error::ErrorKind;
use crate::state::ControlStatus;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

enum Scripted {
    Json(Value),
    Fail,
    Gate(oneshot::Receiver<Value>),
}

/// In-memory `CollegeApi` answering from per-endpoint queues.
#[derive(Default)]
struct ScriptedApi {
    scripts: RefCell<HashMap<String, VecDeque<Scripted>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedApi {
    fn reply(self, key: &str, body: Value) -> Self {
        self.push(key, Scripted::Json(body));
        self
    }

    fn failing(self, key: &str) -> Self {
        self.push(key, Scripted::Fail);
        self
    }

    fn push(&self, key: &str, scripted: Scripted) {
        self.scripts
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .push_back(scripted);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    async fn answer(&self, key: String) -> Result<Value> {
        self.calls.borrow_mut().push(key.clone());
        let next = self
            .scripts
            .borrow_mut()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());
        match next {
            Some(Scripted::Json(body)) => Ok(body),
            Some(Scripted::Fail) => Err(ErrorKind::ParseError("connection reset".to_string()).into()),
            Some(Scripted::Gate(rx)) => rx
                .await
                .map_err(|_| ErrorKind::ParseError("gate dropped".to_string()).into()),
            None => Err(ErrorKind::ParseError(format!("unscripted request {key}")).into()),
        }
    }
}

impl CollegeApi for ScriptedApi {
    async fn get_college_years(&self, college_id: &str) -> Result<Value> {
        self.answer(format!("years/{college_id}")).await
    }

    async fn get_college_structure(&self, college_id: &str) -> Result<Value> {
        self.answer(format!("structure/{college_id}")).await
    }

    async fn get_terms(&self, params: CascadeParams) -> Result<Value> {
        self.answer(format!("terms/{}/{}", params.college_id, params.year))
            .await
    }

    async fn get_modules(&self, params: CascadeParams) -> Result<Value> {
        self.answer(format!("modules/{}/{}", params.college_id, params.year))
            .await
    }
}

/// Records every rendered frame as (control id, labels, visible).
#[derive(Default)]
struct RecordingView {
    frames: RefCell<Vec<(String, Vec<String>, bool)>>,
}

impl RecordingView {
    fn frames_for(&self, id: &str) -> Vec<Vec<String>> {
        self.frames
            .borrow()
            .iter()
            .filter(|(control, _, _)| control == id)
            .map(|(_, labels, _)| labels.clone())
            .collect()
    }
}

impl Render for RecordingView {
    fn render(&self, control: &SelectControl) {
        self.frames.borrow_mut().push((
            control.id().to_string(),
            control.labels().iter().map(|l| l.to_string()).collect(),
            control.is_visible(),
        ));
    }
}

fn subject_page(api: ScriptedApi) -> DependentSelector<ScriptedApi, RecordingView> {
    DependentSelector::with_structure(
        api,
        RecordingView::default(),
        "subject-year-select",
        "term-select",
        "module-select",
    )
}

#[tokio::test]
async fn college_change_lists_years_in_response_order() {
    let api = ScriptedApi::default().reply(
        "years/7",
        json!({"years": [{"id": 11, "year_number": 1}, {"id": 12, "year_number": 2}]}),
    );
    let selector = DependentSelector::years_only(api, RecordingView::default(), "term-year-select");

    let outcome = selector.on_parent_change("7").await;

    assert_eq!(outcome, UpdateOutcome::Applied);
    assert_eq!(selector.years().labels(), ["-- Select Year --", "Year 1", "Year 2"]);
    let values: Vec<_> = selector.years().options().iter().map(|o| o.value.clone()).collect();
    assert_eq!(values, ["", "1", "2"]);
    assert_eq!(
        selector.view().frames_for("term-year-select"),
        vec![
            vec!["Loading...".to_string()],
            vec!["-- Select Year --".into(), "Year 1".into(), "Year 2".into()],
        ]
    );
}

#[tokio::test]
async fn empty_college_resets_without_a_request() {
    let selector = DependentSelector::years_only(ScriptedApi::default(), (), "term-year-select");

    let outcome = selector.on_parent_change("").await;

    assert_eq!(outcome, UpdateOutcome::Reset);
    assert_eq!(selector.years().labels(), ["-- Select College First --"]);
    assert!(selector.api().calls().is_empty());
}

#[tokio::test]
async fn failed_years_request_leaves_single_error_option() {
    let api = ScriptedApi::default().failing("years/4");
    let selector = DependentSelector::years_only(api, (), "module-year-select");

    let outcome = selector.on_parent_change("4").await;

    assert_eq!(outcome, UpdateOutcome::Failed);
    assert_eq!(selector.years().labels(), ["Error loading years"]);
    assert_eq!(selector.years().status(), ControlStatus::Failed);
}

#[tokio::test]
async fn malformed_years_payload_counts_as_failure() {
    let api = ScriptedApi::default().reply("years/4", json!({"items": []}));
    let selector = DependentSelector::years_only(api, (), "module-year-select");

    assert_eq!(selector.on_parent_change("4").await, UpdateOutcome::Failed);
    assert_eq!(selector.years().labels(), ["Error loading years"]);
}

#[tokio::test]
async fn repeated_change_does_not_accumulate_options() {
    let body = json!({"years": [{"year_number": 1}, {"year_number": 2}]});
    let api = ScriptedApi::default()
        .reply("years/7", body.clone())
        .reply("years/7", body);
    let selector = DependentSelector::years_only(api, (), "term-year-select");

    selector.on_parent_change("7").await;
    let first = selector.years().options().to_vec();
    selector.on_parent_change("7").await;

    assert_eq!(selector.years().options(), first.as_slice());
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn older_response_resolving_last_is_discarded() {
    let (old_tx, old_rx) = oneshot::channel();
    let (new_tx, new_rx) = oneshot::channel();
    let api = ScriptedApi::default();
    api.push("years/1", Scripted::Gate(old_rx));
    api.push("years/2", Scripted::Gate(new_rx));
    let selector = DependentSelector::years_only(api, (), "term-year-select");

    let resolve = async {
        let _ = new_tx.send(json!({"years": [{"year_number": 5}]}));
        tokio::task::yield_now().await;
        let _ = old_tx.send(json!({"years": [{"year_number": 9}]}));
    };
    let (first, second, ()) = futures::join!(
        selector.on_parent_change("1"),
        selector.on_parent_change("2"),
        resolve
    );

    assert_eq!(first, UpdateOutcome::Stale);
    assert_eq!(second, UpdateOutcome::Applied);
    assert_eq!(selector.years().labels(), ["-- Select Year --", "Year 5"]);
}

#[tokio::test]
async fn module_structure_shows_module_control_only() {
    let api = ScriptedApi::default()
        .reply("structure/3", json!({"structure_type": "module"}))
        .reply("modules/3/2", json!({"modules": [{"id": 9, "name": "Algebra"}]}));
    let selector = subject_page(api);

    let outcome = selector.on_second_level_change("3", "2").await;

    assert_eq!(outcome, UpdateOutcome::Applied);
    let modules = selector.modules().unwrap();
    assert_eq!(modules.labels(), ["-- Select Module --", "Algebra"]);
    assert_eq!(modules.options()[1].value, "9");
    assert!(modules.is_visible());
    assert!(!selector.terms().unwrap().is_visible());
    assert_eq!(selector.api().calls(), ["structure/3", "modules/3/2"]);
}

#[tokio::test]
async fn term_structure_shows_term_control_only() {
    let api = ScriptedApi::default()
        .reply("structure/5", json!({"structure_type": "term"}))
        .reply(
            "terms/5/1",
            json!({"terms": [{"id": 1, "name": "Autumn"}, {"id": "t2", "name": "Spring"}]}),
        );
    let selector = subject_page(api);

    assert_eq!(selector.on_second_level_change("5", "1").await, UpdateOutcome::Applied);

    let terms = selector.terms().unwrap();
    assert_eq!(terms.labels(), ["-- Select Term --", "Autumn", "Spring"]);
    assert_eq!(terms.options()[2].value, "t2");
    assert!(terms.is_visible());
    assert!(!selector.modules().unwrap().is_visible());
}

#[tokio::test]
async fn second_level_needs_both_values() {
    let selector = subject_page(ScriptedApi::default());

    assert_eq!(selector.on_second_level_change("3", "").await, UpdateOutcome::Skipped);
    assert_eq!(selector.on_second_level_change("", "2").await, UpdateOutcome::Skipped);
    assert!(selector.api().calls().is_empty());
}

#[tokio::test]
async fn years_only_selector_ignores_second_level() {
    let selector = DependentSelector::years_only(ScriptedApi::default(), (), "term-year-select");
    assert_eq!(selector.on_second_level_change("3", "2").await, UpdateOutcome::Skipped);
    assert!(selector.terms().is_none());
}

#[tokio::test]
async fn unknown_structure_leaves_wrappers_untouched() {
    let api = ScriptedApi::default()
        .reply("structure/3", json!({"structure_type": "module"}))
        .reply("modules/3/2", json!({"modules": [{"id": 9, "name": "Algebra"}]}))
        .reply("structure/3", json!({"structure_type": "semester"}));
    let selector = subject_page(api);
    selector.on_second_level_change("3", "2").await;

    let outcome = selector.on_second_level_change("3", "2").await;

    assert_eq!(outcome, UpdateOutcome::UnsupportedStructure("semester".to_string()));
    assert!(selector.modules().unwrap().is_visible());
    assert!(!selector.terms().unwrap().is_visible());
    assert_eq!(selector.modules().unwrap().labels(), ["-- Select Module --", "Algebra"]);
}

#[tokio::test]
async fn structure_failure_aborts_chain_without_touching_controls() {
    let api = ScriptedApi::default().failing("structure/3");
    let selector = subject_page(api);

    assert_eq!(selector.on_second_level_change("3", "2").await, UpdateOutcome::Failed);
    assert_eq!(selector.api().calls(), ["structure/3"]);
    assert!(!selector.terms().unwrap().is_visible());
    assert!(!selector.modules().unwrap().is_visible());
}

#[tokio::test]
async fn module_failure_shows_error_option() {
    let api = ScriptedApi::default()
        .reply("structure/3", json!({"structure_type": "module"}))
        .failing("modules/3/2");
    let selector = subject_page(api);

    assert_eq!(selector.on_second_level_change("3", "2").await, UpdateOutcome::Failed);
    let modules = selector.modules().unwrap();
    assert_eq!(modules.labels(), ["Error loading modules"]);
    assert!(modules.is_visible());
}

#[tokio::test]
async fn college_change_hides_second_level_and_drops_pending_chain() {
    let (terms_tx, terms_rx) = oneshot::channel();
    let api = ScriptedApi::default()
        .reply("structure/3", json!({"structure_type": "term"}))
        .reply("years/8", json!({"years": [{"year_number": 1}]}));
    api.push("terms/3/2", Scripted::Gate(terms_rx));
    let selector = subject_page(api);

    let resolve = async {
        tokio::task::yield_now().await;
        let _ = terms_tx.send(json!({"terms": [{"id": 1, "name": "Autumn"}]}));
    };
    let (chain, college, ()) = futures::join!(
        selector.on_second_level_change("3", "2"),
        selector.on_parent_change("8"),
        resolve
    );

    assert_eq!(chain, UpdateOutcome::Stale);
    assert_eq!(college, UpdateOutcome::Applied);
    let terms = selector.terms().unwrap();
    assert!(!terms.is_visible());
    assert_eq!(terms.labels(), ["-- Select Term --"]);
}

#[tokio::test]
async fn full_subject_page_walkthrough() {
    let api = ScriptedApi::default()
        .reply("years/3", json!({"years": [{"year_number": 1}, {"year_number": 2}]}))
        .reply("structure/3", json!({"structure_type": "module"}))
        .reply("modules/3/2", json!({"modules": [{"id": 9, "name": "Algebra"}]}));
    let selector = subject_page(api);
    selector.render_all();

    assert_eq!(selector.on_parent_change("3").await, UpdateOutcome::Applied);
    assert!(selector.select_year("2"));
    assert_eq!(selector.on_second_level_change("3", "2").await, UpdateOutcome::Applied);

    assert_eq!(selector.years().selected(), Some("2"));
    let module_frames = selector.view().frames_for("module-select");
    assert_eq!(
        module_frames.last().unwrap(),
        &vec!["-- Select Module --".to_string(), "Algebra".to_string()]
    );
}

#[tokio::test]
async fn clearing_the_year_drops_pending_chain() {
    let (modules_tx, modules_rx) = oneshot::channel();
    let api = ScriptedApi::default().reply("structure/3", json!({"structure_type": "module"}));
    api.push("modules/3/2", Scripted::Gate(modules_rx));
    let selector = subject_page(api);

    let resolve = async {
        tokio::task::yield_now().await;
        let _ = modules_tx.send(json!({"modules": [{"id": 9, "name": "Algebra"}]}));
    };
    let (chain, cleared, ()) = futures::join!(
        selector.on_second_level_change("3", "2"),
        selector.on_second_level_change("3", ""),
        resolve
    );

    assert_eq!(chain, UpdateOutcome::Stale);
    assert_eq!(cleared, UpdateOutcome::Skipped);
    let modules = selector.modules().unwrap();
    assert!(!modules.is_visible());
    assert_eq!(modules.labels(), ["-- Select Module --"]);
    assert_eq!(selector.api().calls(), ["structure/3", "modules/3/2"]);
}

#[tokio::test]
async fn newer_year_change_drops_pending_chain() {
    let (old_tx, old_rx) = oneshot::channel();
    let api = ScriptedApi::default()
        .reply("structure/5", json!({"structure_type": "term"}))
        .reply("structure/5", json!({"structure_type": "term"}))
        .reply("terms/5/2", json!({"terms": [{"id": 2, "name": "New"}]}));
    api.push("terms/5/1", Scripted::Gate(old_rx));
    let selector = subject_page(api);

    let resolve = async {
        tokio::task::yield_now().await;
        let _ = old_tx.send(json!({"terms": [{"id": 1, "name": "Old"}]}));
    };
    let (older, newer, ()) = futures::join!(
        selector.on_second_level_change("5", "1"),
        selector.on_second_level_change("5", "2"),
        resolve
    );

    assert_eq!(older, UpdateOutcome::Stale);
    assert_eq!(newer, UpdateOutcome::Applied);
    let terms = selector.terms().unwrap();
    assert_eq!(terms.labels(), ["-- Select Term --", "New"]);
    assert!(terms.is_visible());
}

#[tokio::test]
async fn term_failure_shows_error_option() {
    let api = ScriptedApi::default()
        .reply("structure/5", json!({"structure_type": "term"}))
        .failing("terms/5/1");
    let selector = subject_page(api);

    assert_eq!(selector.on_second_level_change("5", "1").await, UpdateOutcome::Failed);
    let terms = selector.terms().unwrap();
    assert_eq!(terms.labels(), ["Error loading terms"]);
    assert_eq!(terms.status(), ControlStatus::Failed);
    assert!(terms.is_visible());
    assert!(!selector.modules().unwrap().is_visible());
}
