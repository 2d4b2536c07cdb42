use super::{enqueue, EventQueue};
use crate::constants::EV_KEYDOWN;
use crate::dom::{self, ListenerRegistry};
use crate::input::{key_action, KeyAction};
use std::cell::Cell;
use std::rc::Rc;
use trail_core::InputEvent;
use wasm_bindgen::JsValue;
use web_sys as web;

fn toggle_fullscreen(canvas: &web::HtmlCanvasElement) {
    if let Some(doc) = dom::window_document() {
        if doc.fullscreen_element().is_some() {
            _ = doc.exit_fullscreen();
        } else {
            _ = canvas.request_fullscreen();
        }
    }
}

pub fn handle_keydown(
    ev: &web::KeyboardEvent,
    queue: &EventQueue,
    paused: &Cell<bool>,
    canvas: &web::HtmlCanvasElement,
) {
    let Some(action) = key_action(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::CyclePalette => enqueue(queue, InputEvent::CyclePalette),
        KeyAction::TogglePause => {
            paused.set(!paused.get());
            log::info!("[keys] paused={}", paused.get());
            ev.prevent_default();
        }
        KeyAction::ToggleFullscreen => {
            toggle_fullscreen(canvas);
            ev.prevent_default();
        }
        KeyAction::ExitFullscreen => {
            if let Some(doc) = dom::window_document() {
                _ = doc.exit_fullscreen();
            }
        }
    }
}

pub fn wire_keyboard(
    registry: &mut ListenerRegistry,
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    queue: &EventQueue,
    paused: &Rc<Cell<bool>>,
) -> Result<(), JsValue> {
    let (c, q, p) = (canvas.clone(), queue.clone(), paused.clone());
    registry.add(window.as_ref(), EV_KEYDOWN, move |ev: web::KeyboardEvent| {
        handle_keydown(&ev, &q, &p, &c);
    })
}
