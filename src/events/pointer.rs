use super::{enqueue, EventQueue};
use crate::constants::{EV_CLICK, EV_POINTER_ENTER, EV_POINTER_LEAVE, EV_POINTER_MOVE};
use crate::dom::ListenerRegistry;
use crate::input::{self, CssRect};
use trail_core::{InputEvent, ScreenPoint};
use wasm_bindgen::JsValue;
use web_sys as web;

#[inline]
fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Option<ScreenPoint> {
    let rect = canvas.get_bounding_client_rect();
    input::css_to_backing_px(
        ev.client_x() as f32,
        ev.client_y() as f32,
        CssRect {
            left: rect.left() as f32,
            top: rect.top() as f32,
            width: rect.width() as f32,
            height: rect.height() as f32,
        },
        canvas.width(),
        canvas.height(),
    )
}

pub fn wire_pointer(
    registry: &mut ListenerRegistry,
    canvas: &web::HtmlCanvasElement,
    queue: &EventQueue,
) -> Result<(), JsValue> {
    let target: &web::EventTarget = canvas.as_ref();

    let (c, q) = (canvas.clone(), queue.clone());
    registry.add(target, EV_POINTER_MOVE, move |ev: web::PointerEvent| {
        if let Some(p) = pointer_canvas_px(&ev, &c) {
            enqueue(&q, InputEvent::Move(p));
        }
    })?;

    let (c, q) = (canvas.clone(), queue.clone());
    registry.add(target, EV_POINTER_ENTER, move |ev: web::PointerEvent| {
        if let Some(p) = pointer_canvas_px(&ev, &c) {
            enqueue(&q, InputEvent::Enter(p));
        }
    })?;

    let q = queue.clone();
    registry.add(target, EV_POINTER_LEAVE, move |_ev: web::PointerEvent| {
        enqueue(&q, InputEvent::Leave);
    })?;

    let q = queue.clone();
    registry.add(target, EV_CLICK, move |_ev: web::MouseEvent| {
        enqueue(&q, InputEvent::CyclePalette);
    })?;
    Ok(())
}
