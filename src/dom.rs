use crate::constants::{MAX_BACKING_EDGE, MAX_DEVICE_PIXEL_RATIO};
use crate::input;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Match the canvas backing store to its CSS size times devicePixelRatio.
/// Returns the new size when it changed.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> Option<(u32, u32)> {
    let w = web::window()?;
    let rect = canvas.get_bounding_client_rect();
    let (w_px, h_px) = input::backing_size(
        rect.width(),
        rect.height(),
        w.device_pixel_ratio(),
        MAX_DEVICE_PIXEL_RATIO,
        MAX_BACKING_EDGE,
    );
    if canvas.width() == w_px && canvas.height() == h_px {
        return None;
    }
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    Some((w_px, h_px))
}

struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Owns every DOM listener the app registers so teardown can detach them.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn add<E>(
        &mut self,
        target: &web::EventTarget,
        kind: &'static str,
        mut handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue>
    where
        E: JsCast + 'static,
    {
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            if let Ok(ev) = ev.dyn_into::<E>() {
                handler(ev);
            }
        }) as Box<dyn FnMut(web::Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn remove_all(&mut self) {
        for l in self.listeners.drain(..) {
            _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.closure.as_ref().unchecked_ref());
        }
    }
}
