//! Canvas confetti and floating hearts.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Window, window};

use crate::effects::{
    AMBIENT_HEART_CHANCE, AMBIENT_HEART_INTERVAL_MS, CELEBRATION_HEART_SPACING_MS,
    CELEBRATION_HEARTS, Confetti, FloatingHeart, HEART_LIFETIME_MS,
};

const CANVAS_ID: &str = "confettiCanvas";
const HEARTS_ID: &str = "heartsContainer";

thread_local! {
    // Burst currently falling; `Some` while the frame loop runs.
    static CONFETTI: RefCell<Option<Confetti>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn confetti_canvas(doc: &Document) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas: HtmlCanvasElement = doc.get_element_by_id(CANVAS_ID)?.dyn_into().ok()?;
    let ctx = canvas.get_context("2d").ok()??.dyn_into().ok()?;
    Some((canvas, ctx))
}

fn viewport(win: &Window) -> (f64, f64) {
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
    (w, h)
}

fn set_display(canvas: &HtmlCanvasElement, value: &str) {
    if let Err(err) = canvas.style().set_property("display", value) {
        log::debug!("canvas display: {err:?}");
    }
}

pub(super) fn launch_confetti(win: &Window, doc: &Document, rng: &mut ChaCha8Rng) {
    let Some((canvas, ctx)) = confetti_canvas(doc) else {
        log::warn!("missing #{CANVAS_ID}");
        return;
    };
    let (w, h) = viewport(win);
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
    set_display(&canvas, "block");

    let burst = Confetti::burst(w, h, rng);
    let already_running = CONFETTI.with(|c| c.replace(Some(burst)).is_some());
    if !already_running {
        start_confetti_loop(canvas, ctx);
    }
}

fn start_confetti_loop(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let finished = CONFETTI.with(|cell| {
            let mut slot = cell.borrow_mut();
            let Some(confetti) = slot.as_mut() else {
                return true;
            };
            draw_confetti(&canvas, &ctx, confetti);
            confetti.step(canvas.height() as f64);
            if confetti.is_finished() {
                *slot = None;
                true
            } else {
                false
            }
        });
        if finished {
            ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
            set_display(&canvas, "none");
            // Drop our own handle so the closure is freed after this frame.
            let _ = f.borrow_mut().take();
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn draw_confetti(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, confetti: &Confetti) {
    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    for piece in confetti.pieces() {
        ctx.begin_path();
        ctx.set_line_width(piece.r / 2.0);
        ctx.set_stroke_style_str(piece.color);
        ctx.move_to(piece.x + piece.tilt + piece.r, piece.y);
        ctx.line_to(piece.x + piece.tilt, piece.y + piece.tilt + piece.r);
        ctx.stroke();
    }
}

/// Keep a visible confetti canvas full-window.
pub(super) fn resize_canvas(win: &Window, doc: &Document) {
    let Some((canvas, _)) = confetti_canvas(doc) else {
        return;
    };
    if canvas.style().get_property_value("display").ok().as_deref() != Some("block") {
        return;
    }
    let (w, h) = viewport(win);
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
}

fn spawn_heart(doc: &Document, heart: &FloatingHeart) -> Result<(), JsValue> {
    let container = doc
        .get_element_by_id(HEARTS_ID)
        .ok_or_else(|| JsValue::from_str("missing #heartsContainer"))?;
    let el: HtmlElement = doc.create_element("div")?.dyn_into()?;
    el.set_class_name("floating-heart");
    el.set_text_content(Some(heart.glyph));
    let style = el.style();
    style.set_property("left", &format!("{}%", heart.left_pct))?;
    style.set_property("animation-duration", &format!("{}s", heart.duration_s))?;
    style.set_property("font-size", &format!("{}px", heart.font_px))?;
    container.append_child(&el)?;
    super::after(HEART_LIFETIME_MS, move || el.remove());
    Ok(())
}

/// A short stream of hearts for the Yes celebration.
pub(super) fn celebration_hearts(doc: &Document, rng: &mut ChaCha8Rng) {
    for i in 0..CELEBRATION_HEARTS {
        let heart = FloatingHeart::random(rng);
        let doc = doc.clone();
        super::after(i * CELEBRATION_HEART_SPACING_MS, move || {
            if let Err(err) = spawn_heart(&doc, &heart) {
                log::debug!("heart: {err:?}");
            }
        });
    }
}

/// Background hearts that drift up now and then for the whole visit.
pub(super) fn start_ambient_hearts(win: &Window, mut rng: ChaCha8Rng) -> Result<(), JsValue> {
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let closure = Closure::wrap(Box::new(move || {
        if rng.gen_bool(AMBIENT_HEART_CHANCE) {
            let heart = FloatingHeart::random(&mut rng);
            if let Err(err) = spawn_heart(&doc, &heart) {
                log::debug!("heart: {err:?}");
            }
        }
    }) as Box<dyn FnMut()>);
    win.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        AMBIENT_HEART_INTERVAL_MS as i32,
    )?;
    closure.forget();
    Ok(())
}
