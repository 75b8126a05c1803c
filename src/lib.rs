//! Swamp Valentine core crate.
//!
//! A guided eight-step greeting: an evasive No button that must be chased
//! before it can be clicked, a handful of date-planning screens whose choices
//! persist in `localStorage`, and a summary on the last screen. The state
//! machine in `session` is DOM-free and tested natively; `web` wires it to the
//! page.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod copy;
pub mod effects;
pub mod error;
pub mod evasive;
pub mod flow;
pub mod logging;
pub mod scheduler;
pub mod selection;
pub mod session;
pub mod summary;
mod web;

pub use config::Config;
pub use error::FlowError;
pub use evasive::{Bounds, EvasiveButton, LabelTier, Placement};
pub use flow::{STEP_COUNT, Step};
pub use scheduler::{ManualScheduler, MessageId, Scheduler, Task, TaskId};
pub use selection::{Category, InputSnapshot, KeyValueStore, MemoryStore, SelectionRecord};
pub use session::{Session, UiEvent};
pub use summary::{Summary, format_label};
pub use web::LocalStorage;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Boot the page with default settings.
#[wasm_bindgen]
pub fn start_app() -> Result<(), JsValue> {
    web::start(Config::default())
}

/// Boot the page with a JSON object overriding any `Config` field.
#[wasm_bindgen]
pub fn start_app_with_config(json: &str) -> Result<(), JsValue> {
    web::start(Config::from_json(json)?)
}

/// Inline `onclick` target of the "next" buttons on each section.
#[wasm_bindgen]
pub fn next_section(step: u8) {
    web::next_section(step);
}

/// Inline `onclick` target of the restart button.
#[wasm_bindgen]
pub fn restart_experience() {
    web::restart();
}
