//! Browser glue. Owns the page-wide `Session`, turns DOM events into session
//! commands and applies the resulting `UiEvent`s to the document.
//!
//! Expected markup: `.section` elements with ids `section1`..`section8`,
//! `#yesBtn`, `#noBtn` (inside its positioning container), `#summaryContent`,
//! `#confettiCanvas`, `#heartsContainer`, `#musicToggle`, `#bgMusic` and
//! `#countdownTimer`.

mod ambient;
mod effects;
mod scheduler;
mod storage;

use std::cell::RefCell;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlElement, HtmlInputElement, ScrollBehavior,
    ScrollToOptions, Window, window,
};

use crate::config::Config;
use crate::copy;
use crate::evasive::{Bounds, Placement};
use crate::flow::Step;
use crate::logging;
use crate::selection::{Category, InputSnapshot};
use crate::session::{Session, UiEvent};

use self::scheduler::BrowserScheduler;
pub use self::storage::LocalStorage;

const YES_ID: &str = "yesBtn";
const NO_ID: &str = "noBtn";
const SUMMARY_ID: &str = "summaryContent";
const MUSIC_TOGGLE_ID: &str = "musicToggle";
const COUNTDOWN_ID: &str = "countdownTimer";

const TEMP_MESSAGE_STYLE: &str = "position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); background: rgba(124, 179, 66, 0.95); color: white; padding: 20px 30px; border-radius: 15px; font-size: 1.2rem; z-index: 10000; box-shadow: 0 10px 30px rgba(0,0,0,0.3); animation: fadeInOut 2s ease; pointer-events: none; text-align: center; max-width: 80%;";
const CELEBRATE_CLASS_MS: u32 = 600;

type PageSession = Session<LocalStorage, BrowserScheduler, ChaCha8Rng>;

struct App {
    session: PageSession,
    win: Window,
    doc: Document,
    // Cosmetic randomness for effects, kept apart from the session's stream.
    fx_rng: ChaCha8Rng,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

pub(crate) fn start(config: Config) -> Result<(), JsValue> {
    if APP.with(|cell| cell.try_borrow().map_or(true, |app| app.is_some())) {
        log::warn!("start called twice; keeping the running page");
        return Err(JsValue::from_str("already started"));
    }
    logging::init(config.level_filter());
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    for (text, css) in copy::BANNER {
        web_sys::console::log_2(&JsValue::from_str(text), &JsValue::from_str(css));
    }

    let countdown_target = config.countdown_target.clone();
    let storage = LocalStorage::from_window(&win);
    let mut session = Session::new(config, storage, BrowserScheduler, seeded_rng());
    session.start();

    APP.with(|cell| {
        cell.replace(Some(App {
            session,
            win: win.clone(),
            doc: doc.clone(),
            fx_rng: seeded_rng(),
        }))
    });
    with_app(|_| ());

    if let Some(el) = doc.get_element_by_id(MUSIC_TOGGLE_ID) {
        el.set_text_content(Some(copy::MUSIC_OFF));
    }

    wire_buttons(&doc)?;
    wire_page(&win, &doc)?;
    effects::start_ambient_hearts(&win, seeded_rng())?;
    ambient::start_countdown(&win, &doc, COUNTDOWN_ID, &countdown_target)?;
    Ok(())
}

pub(crate) fn next_section(step: u8) {
    with_app(|app| {
        let inputs = read_inputs(&app.doc, app.session.current_step());
        app.session.advance(step, &inputs);
    });
}

pub(crate) fn restart() {
    with_app(|app| app.session.reset());
}

pub(crate) fn dispatch(task: crate::scheduler::Task) {
    with_app(|app| app.session.fire(task));
}

/// Run `f` against the app and apply whatever it queued. A signal that
/// arrives while the app is already borrowed is dropped.
fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
    APP.with(|cell| {
        let Ok(mut guard) = cell.try_borrow_mut() else {
            log::debug!("app busy; dropping signal");
            return None;
        };
        let app = guard.as_mut()?;
        let out = f(app);
        for event in app.session.take_events() {
            app.apply(event);
        }
        Some(out)
    })
}

impl App {
    fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::ShowStep(step) => self.show_step(step),
            UiEvent::ScrollToTop => {
                let opts = ScrollToOptions::new();
                opts.set_top(0.0);
                opts.set_behavior(ScrollBehavior::Smooth);
                self.win.scroll_to_with_scroll_to_options(&opts);
            }
            UiEvent::RenderSummary(summary) => {
                if let Some(el) = self.doc.get_element_by_id(SUMMARY_ID) {
                    el.set_inner_html(&summary.to_html());
                }
            }
            UiEvent::MoveButton(placement) => self.place_no_button(placement),
            UiEvent::SetButtonLabel(text) => {
                if let Some(el) = self.doc.get_element_by_id(NO_ID) {
                    el.set_text_content(Some(&text));
                }
            }
            UiEvent::ButtonShake(on) => {
                if let Some(el) = self.doc.get_element_by_id(NO_ID) {
                    toggle_class(&el, "shake", on);
                }
            }
            UiEvent::ShowMessage { id, text } => {
                if let Err(err) = self.show_message(id.0, &text) {
                    log::warn!("could not show message: {err:?}");
                }
            }
            UiEvent::DismissMessage(id) => {
                let selector = format!(".temp-message[data-message-id=\"{}\"]", id.0);
                if let Ok(Some(el)) = self.doc.query_selector(&selector) {
                    el.remove();
                }
            }
            UiEvent::Celebrate => self.celebrate(),
            UiEvent::ClearInputs => {
                if let Ok(nodes) = self
                    .doc
                    .query_selector_all("input[type=\"checkbox\"], input[type=\"radio\"]")
                {
                    for i in 0..nodes.length() {
                        if let Some(input) = nodes
                            .get(i)
                            .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
                        {
                            input.set_checked(false);
                        }
                    }
                }
            }
        }
    }

    fn show_step(&self, step: Step) {
        if let Ok(sections) = self.doc.query_selector_all(".section") {
            for i in 0..sections.length() {
                if let Some(el) = sections.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    toggle_class(&el, "active", false);
                }
            }
        }
        match self.doc.get_element_by_id(&step.section_id()) {
            Some(el) => toggle_class(&el, "active", true),
            None => log::warn!("missing #{}", step.section_id()),
        }
    }

    fn place_no_button(&self, placement: Placement) {
        let Some(btn) = html_element(&self.doc, NO_ID) else {
            return;
        };
        let style = btn.style();
        let result = match placement {
            Placement::At { x, y } => style
                .set_property("position", "absolute")
                .and_then(|_| style.set_property("left", &format!("{x}px")))
                .and_then(|_| style.set_property("top", &format!("{y}px")))
                .and_then(|_| style.set_property("transition", "all 0.3s ease")),
            Placement::Natural => style
                .set_property("position", "relative")
                .and_then(|_| style.set_property("left", "auto"))
                .and_then(|_| style.set_property("top", "auto")),
        };
        if let Err(err) = result {
            log::warn!("could not place no button: {err:?}");
        }
    }

    fn show_message(&self, id: u32, text: &str) -> Result<(), JsValue> {
        let body = self
            .doc
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;
        let div = self.doc.create_element("div")?;
        div.set_class_name("temp-message");
        div.set_attribute("data-message-id", &id.to_string())?;
        div.set_attribute("style", TEMP_MESSAGE_STYLE)?;
        div.set_text_content(Some(text));
        body.append_child(&div)?;
        Ok(())
    }

    fn celebrate(&mut self) {
        if let Some(yes) = self.doc.get_element_by_id(YES_ID) {
            toggle_class(&yes, "celebrate", true);
            after(CELEBRATE_CLASS_MS, move || toggle_class(&yes, "celebrate", false));
        }
        ambient::play_music(&self.doc);
        effects::launch_confetti(&self.win, &self.doc, &mut self.fx_rng);
        effects::celebration_hearts(&self.doc, &mut self.fx_rng);
    }
}

/// Checked values of every category present in the step's section.
fn read_inputs(doc: &Document, step: Step) -> InputSnapshot {
    let mut snapshot = InputSnapshot::new();
    let Some(section) = doc.get_element_by_id(&step.section_id()) else {
        return snapshot;
    };
    for category in Category::ALL {
        let selector = format!("input[name=\"{}\"]", category.input_name());
        let Ok(nodes) = section.query_selector_all(&selector) else {
            continue;
        };
        if nodes.length() == 0 {
            continue;
        }
        let checked: Vec<String> = (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|n| n.dyn_into::<HtmlInputElement>().ok())
            .filter(|input| input.checked())
            .map(|input| input.value())
            .collect();
        snapshot.insert(category, checked);
    }
    snapshot
}

fn no_button_bounds(doc: &Document) -> Option<Bounds> {
    let btn = doc.get_element_by_id(NO_ID)?;
    let container = btn.parent_element()?;
    let outer = container.get_bounding_client_rect();
    let inner = btn.get_bounding_client_rect();
    Some(Bounds {
        container_width: outer.width(),
        container_height: outer.height(),
        widget_width: inner.width(),
        widget_height: inner.height(),
    })
}

fn approach_no_button() {
    with_app(|app| match no_button_bounds(&app.doc) {
        Some(bounds) => {
            app.session.on_approach(bounds);
        }
        None => log::warn!("no button or its container is missing"),
    });
}

fn wire_buttons(doc: &Document) -> Result<(), JsValue> {
    let yes = doc
        .get_element_by_id(YES_ID)
        .ok_or_else(|| JsValue::from_str("missing #yesBtn"))?;
    let no = doc
        .get_element_by_id(NO_ID)
        .ok_or_else(|| JsValue::from_str("missing #noBtn"))?;

    // Yes: celebrate, then the session moves on to the next step.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_app(|app| app.session.accept());
        }) as Box<dyn FnMut(_)>);
        yes.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // No: run away from the pointer...
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            approach_no_button();
        }) as Box<dyn FnMut(_)>);
        no.add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // ...and from fingers.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            evt.prevent_default();
            approach_no_button();
        }) as Box<dyn FnMut(_)>);
        no.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Clicks only land once the button has given in.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let rejected = with_app(|app| app.session.on_confirm().is_err()).unwrap_or(true);
            if rejected {
                evt.prevent_default();
                evt.stop_propagation();
            }
        }) as Box<dyn FnMut(_)>);
        no.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(toggle) = doc.get_element_by_id(MUSIC_TOGGLE_ID) {
        let doc = doc.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            ambient::toggle_music(&doc);
        }) as Box<dyn FnMut(_)>);
        toggle.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn wire_page(win: &Window, doc: &Document) -> Result<(), JsValue> {
    // Block pinch-zoom on multi-touch; needs a non-passive listener.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            if evt.touches().length() > 1 {
                evt.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        doc.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            closure.as_ref().unchecked_ref(),
            &opts,
        )?;
        closure.forget();
    }
    {
        let win_resize = win.clone();
        let doc_resize = doc.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            effects::resize_canvas(&win_resize, &doc_resize);
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Fire-and-forget `setTimeout`.
fn after(delay_ms: u32, f: impl FnOnce() + 'static) {
    let Some(win) = window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if let Err(err) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        scheduler::timeout_ms(delay_ms),
    ) {
        log::warn!("setTimeout failed: {err:?}");
    }
}

fn toggle_class(el: &Element, class: &str, on: bool) {
    let list = el.class_list();
    let result = if on { list.add_1(class) } else { list.remove_1(class) };
    if let Err(err) = result {
        log::debug!("class {class} toggle failed: {err:?}");
    }
}

fn html_element(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// ChaCha seeded from the browser's entropy source, or the clock without one.
fn seeded_rng() -> ChaCha8Rng {
    let mut seed = [0u8; 32];
    match getrandom::getrandom(&mut seed) {
        Ok(()) => ChaCha8Rng::from_seed(seed),
        Err(err) => {
            log::warn!("no entropy source ({err}); seeding from the clock");
            ChaCha8Rng::seed_from_u64(performance_now().to_bits())
        }
    }
}
