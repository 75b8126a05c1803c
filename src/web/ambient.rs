//! Background music toggle and the countdown ticker.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlAudioElement, Window};

use crate::copy;
use crate::effects::format_countdown;

const AUDIO_ID: &str = "bgMusic";
const TOGGLE_ID: &str = "musicToggle";
const COUNTDOWN_TICK_MS: i32 = 1000;

fn audio(doc: &Document) -> Option<HtmlAudioElement> {
    doc.get_element_by_id(AUDIO_ID)?.dyn_into().ok()
}

fn set_toggle(doc: &Document, playing: bool) {
    let Some(btn) = doc.get_element_by_id(TOGGLE_ID) else {
        return;
    };
    btn.set_text_content(Some(if playing { copy::MUSIC_ON } else { copy::MUSIC_OFF }));
    let list = btn.class_list();
    let _ = if playing {
        list.add_1("playing")
    } else {
        list.remove_1("playing")
    };
}

pub(super) fn toggle_music(doc: &Document) {
    let Some(music) = audio(doc) else {
        log::warn!("missing #{AUDIO_ID}");
        return;
    };
    if music.paused() {
        play_music(doc);
    } else {
        if let Err(err) = music.pause() {
            log::warn!("pause failed: {err:?}");
        }
        set_toggle(doc, false);
    }
}

/// Start playback; the toggle only flips once the browser allows it.
pub(super) fn play_music(doc: &Document) {
    let Some(music) = audio(doc) else {
        return;
    };
    let promise = match music.play() {
        Ok(p) => p,
        Err(err) => {
            log::info!("music autoplay prevented: {err:?}");
            return;
        }
    };
    let doc_ok = doc.clone();
    let on_play = Closure::wrap(Box::new(move |_: JsValue| {
        set_toggle(&doc_ok, true);
    }) as Box<dyn FnMut(JsValue)>);
    let on_refuse = Closure::wrap(Box::new(move |err: JsValue| {
        log::info!("music autoplay prevented: {err:?}");
    }) as Box<dyn FnMut(JsValue)>);
    let _ = promise.then2(&on_play, &on_refuse);
    on_play.forget();
    on_refuse.forget();
}

pub(super) fn start_countdown(
    win: &Window,
    doc: &Document,
    el_id: &str,
    target: &str,
) -> Result<(), JsValue> {
    let Some(el) = doc.get_element_by_id(el_id) else {
        log::debug!("no #{el_id}; countdown disabled");
        return Ok(());
    };
    let target_ms = js_sys::Date::new(&JsValue::from_str(target)).get_time();
    if target_ms.is_nan() {
        log::warn!("countdown target {target:?} is not a date");
    }
    let tick = move || {
        el.set_text_content(Some(&format_countdown(target_ms - js_sys::Date::now())));
    };
    tick();
    let closure = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
    win.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        COUNTDOWN_TICK_MS,
    )?;
    closure.forget();
    Ok(())
}
