//! Browser wiring (wasm only)
//!
//! Binds the controllers to the page elements named in [`PageConfig`] and
//! projects controller state onto the DOM. Elements that are missing from the
//! current page are skipped, so one bundle serves every admin page.

use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlSelectElement, Window};

use crate::app::notify::{
    Notification, NotificationKind, Notifier, DISPLAY_DURATION, FADE_IN_DELAY, FADE_OUT_DURATION,
};
use crate::app::report::{submit_instructor_report, SubmitOutcome};
use crate::app::spinner::{add_spinner, ButtonState};
use crate::app::{DependentSelector, Render};
use crate::client::gloo::WasmClient;
use crate::config::{DependencyEdge, PageConfig, ReportUrls, SubjectCascadeIds};
use crate::error::{ErrorKind, Result};
use crate::interface::HttpClient;
use crate::state::{escape_html, SelectControl};

type PageSelector = DependentSelector<WasmClient, DomView>;

/// WASM entry point, runs once the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init().await.map_err(|e| JsValue::from_str(&e.to_string()))
}

async fn init() -> Result<()> {
    let window = web_sys::window().ok_or(ErrorKind::JsError("no window".to_string()))?;
    let document = window
        .document()
        .ok_or(ErrorKind::JsError("no document".to_string()))?;

    let mut config = PageConfig::from_json("{}")?;
    if let Some(urls) = read_report_urls(&window) {
        config.report_urls = urls;
    }

    let client = WasmClient::new(&config.api).await?;

    for edge in &config.year_edges {
        bind_year_edge(&document, client.clone(), edge)?;
    }
    bind_subject_cascade(&document, client, &config.subject_cascade)?;
    bind_instructor_form(&window, &document, &config)?;

    Ok(())
}

/// Renders select controls by id and toggles their wrappers.
#[derive(Clone)]
pub struct DomView {
    document: Document,
    wrappers: HashMap<String, String>,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            wrappers: HashMap::new(),
        }
    }

    pub fn with_wrapper(mut self, control_id: &str, wrapper_id: &str) -> Self {
        self.wrappers
            .insert(control_id.to_string(), wrapper_id.to_string());
        self
    }
}

impl Render for DomView {
    fn render(&self, control: &SelectControl) {
        if let Some(select) = select_by_id(&self.document, control.id()) {
            select.set_inner_html(&control.options_html());
        }

        let Some(wrapper) = self
            .wrappers
            .get(control.id())
            .and_then(|id| self.document.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let display = if control.is_visible() { "block" } else { "none" };
        if let Err(e) = wrapper.style().set_property("display", display) {
            log::warn!("failed to toggle wrapper of {}: {e:?}", control.id());
        }
    }
}

/// Fixed-position toast appended to `<body>`, removed after its lifecycle.
#[derive(Clone)]
pub struct DomNotifier {
    document: Document,
}

impl DomNotifier {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn show(&self, notification: &Notification) -> Result<()> {
        let body = self
            .document
            .body()
            .ok_or(ErrorKind::JsError("no body".to_string()))?;
        let toast = self.document.create_element("div")?;
        toast.set_attribute("style", &toast_style(notification.kind.color(), false))?;
        toast.set_inner_html(&format!(
            r#"<i class="tim-icons icon-bell-55"></i> {}"#,
            escape_html(&notification.message)
        ));
        body.append_child(&toast)?;

        let color = notification.kind.color();
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(millis(FADE_IN_DELAY)).await;
            if let Err(e) = toast.set_attribute("style", &toast_style(color, true)) {
                log::warn!("failed to fade in notification: {e:?}");
            }
            TimeoutFuture::new(millis(DISPLAY_DURATION) - millis(FADE_IN_DELAY)).await;
            if let Err(e) = toast.set_attribute("style", &toast_style(color, false)) {
                log::warn!("failed to fade out notification: {e:?}");
            }
            TimeoutFuture::new(millis(FADE_OUT_DURATION)).await;
            toast.remove();
        });
        Ok(())
    }
}

impl Notifier for DomNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.show(&notification) {
            log::warn!("failed to show notification {:?}: {e}", notification.message);
        }
    }
}

/// `window.showNotification(message, type)` for page scripts.
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, kind: Option<String>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("no document to show notification {message:?}");
        return;
    };
    let kind = NotificationKind::parse(kind.as_deref().unwrap_or_default());
    DomNotifier::new(document).notify(Notification::new(message, kind));
}

/// `window.addSpinner(button, text)` for page scripts.
#[wasm_bindgen(js_name = addSpinner)]
pub fn add_spinner_to(button: &HtmlElement, text: Option<String>) {
    apply_button_state(button, &add_spinner(text.as_deref()));
}

fn apply_button_state(el: &Element, state: &ButtonState) {
    el.set_inner_html(&state.label_html);
    if let Some(btn) = el.dyn_ref::<HtmlButtonElement>() {
        btn.set_disabled(state.disabled);
    } else if state.disabled {
        if let Err(e) = el.set_attribute("disabled", "") {
            log::warn!("failed to disable {}: {e:?}", el.id());
        }
    }
}

fn toast_style(color: &str, shown: bool) -> String {
    let (opacity, offset) = if shown { (1, 0) } else { (0, -20) };
    format!(
        "position:fixed;top:20px;right:20px;\
         background:linear-gradient(135deg, {color} 0%, {color}dd 100%);\
         color:#fff;padding:16px 24px;border-radius:12px;\
         box-shadow:0 8px 24px rgba(0,0,0,0.3);z-index:9999;\
         font-size:15px;font-weight:500;opacity:{opacity};\
         transform:translateY({offset}px);transition:all 0.3s ease"
    )
}

fn millis(duration: std::time::Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

fn select_by_id(document: &Document, id: &str) -> Option<HtmlSelectElement> {
    document
        .get_element_by_id(id)?
        .dyn_into::<HtmlSelectElement>()
        .ok()
}

fn listen<F>(target: &Element, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn bind_year_edge(document: &Document, client: WasmClient, edge: &DependencyEdge) -> Result<bool> {
    let (Some(parent), Some(_)) = (
        select_by_id(document, &edge.parent),
        select_by_id(document, &edge.child),
    ) else {
        return Ok(false);
    };

    let selector: Rc<PageSelector> = Rc::new(DependentSelector::years_only(
        client,
        DomView::new(document.clone()),
        &edge.child,
    ));

    let source = parent.clone();
    listen(&parent, "change", move |_| {
        let selector = Rc::clone(&selector);
        let college_id = source.value();
        wasm_bindgen_futures::spawn_local(async move {
            selector.on_parent_change(&college_id).await;
        });
    })?;

    log::debug!("bound {} -> {}", edge.parent, edge.child);
    Ok(true)
}

fn bind_subject_cascade(document: &Document, client: WasmClient, ids: &SubjectCascadeIds) -> Result<bool> {
    let (Some(college), Some(year)) = (
        select_by_id(document, &ids.college_select),
        select_by_id(document, &ids.year_select),
    ) else {
        return Ok(false);
    };

    let view = DomView::new(document.clone())
        .with_wrapper(&ids.term_select, &ids.term_wrapper)
        .with_wrapper(&ids.module_select, &ids.module_wrapper);
    let selector: Rc<PageSelector> = Rc::new(DependentSelector::with_structure(
        client,
        view,
        &ids.year_select,
        &ids.term_select,
        &ids.module_select,
    ));

    {
        let selector = Rc::clone(&selector);
        let source = college.clone();
        listen(&college, "change", move |_| {
            let selector = Rc::clone(&selector);
            let college_id = source.value();
            wasm_bindgen_futures::spawn_local(async move {
                selector.on_parent_change(&college_id).await;
            });
        })?;
    }

    let college_source = college.clone();
    let year_source = year.clone();
    listen(&year, "change", move |_| {
        let selector = Rc::clone(&selector);
        let college_id = college_source.value();
        let year_value = year_source.value();
        wasm_bindgen_futures::spawn_local(async move {
            selector
                .on_second_level_change(&college_id, &year_value)
                .await;
        });
    })?;

    Ok(true)
}

fn bind_instructor_form(window: &Window, document: &Document, config: &PageConfig) -> Result<bool> {
    let Some(form) = document.get_element_by_id(&config.instructor_form.form) else {
        return Ok(false);
    };

    let window = window.clone();
    let document = document.clone();
    let select_id = config.instructor_form.select.clone();
    let urls = config.report_urls.clone();
    let notifier = DomNotifier::new(document.clone());
    let source = form.clone();

    listen(&form, "submit", move |event| {
        event.prevent_default();
        let selected = select_by_id(&document, &select_id).map(|s| s.value());

        let SubmitOutcome::Navigate { url, delay, button } =
            submit_instructor_report(&urls, selected.as_deref(), &notifier)
        else {
            return;
        };

        if let Ok(Some(el)) = source.query_selector(r#"button[type="submit"]"#) {
            apply_button_state(&el, &button);
        }

        let window = window.clone();
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(millis(delay)).await;
            if let Err(e) = window.location().set_href(&url) {
                log::warn!("navigation to {url} failed: {e:?}");
            }
        });
    })?;

    Ok(true)
}

/// Reads `window.reportsUrls` as rendered by the page template.
fn read_report_urls(window: &Window) -> Option<ReportUrls> {
    let urls = js_sys::Reflect::get(window, &JsValue::from_str("reportsUrls")).ok()?;
    if urls.is_undefined() || urls.is_null() {
        return None;
    }
    let template = js_sys::Reflect::get(&urls, &JsValue::from_str("instructorReport"))
        .ok()?
        .as_string()?;
    Some(ReportUrls {
        instructor_report: template,
    })
}
