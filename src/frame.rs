use crate::dom;
use crate::events::EventQueue;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use trail_core::{FrameResources, InputEvent, TrailSession};
use trail_render::{GpuState, MeshFactory};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub session: TrailSession,
    pub resources: FrameResources<MeshFactory>,
    pub gpu: GpuState<'static>,
    pub canvas: web::HtmlCanvasElement,
    pub queue: EventQueue,
    pub paused: Rc<Cell<bool>>,
    pub started_ms: f64,
    pub stopped: bool,
}

impl FrameContext {
    /// One animation frame. Returns false once the loop should stop.
    pub fn frame(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        let now_ms = instant::now();

        if let Some((w, h)) = dom::sync_canvas_backing_size(&self.canvas) {
            self.gpu.resize_if_needed(w, h);
            self.session.push_event(InputEvent::Resize {
                width: w as f32,
                height: h as f32,
            });
        }
        // drained even while paused; the session coalesces what it holds
        for ev in self.queue.borrow_mut().drain(..) {
            self.session.push_event(ev);
        }
        if self.paused.get() {
            return true;
        }

        let stats = self.session.step(now_ms);
        if stats.pulse_spawned {
            log::debug!("[frame] pulse live={}", stats.live_pulses);
        }
        self.session
            .render_into(self.gpu.factory_mut(), &mut self.resources);

        let camera = self.session.camera();
        let time_sec = ((now_ms - self.started_ms) / 1000.0) as f32;
        match self.gpu.render(&self.resources, &camera, time_sec) {
            Ok(()) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[frame] surface out of memory, stopping");
                self.stopped = true;
                false
            }
            Err(e) => {
                log::warn!("[frame] surface error: {:?}", e);
                true
            }
        }
    }

    /// Release session state and GPU geometry. Idempotent.
    pub fn teardown(&mut self) {
        self.stopped = true;
        self.queue.borrow_mut().clear();
        self.session
            .teardown(self.gpu.factory_mut(), &mut self.resources);
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> anyhow::Result<GpuState<'static>> {
    GpuState::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        canvas.width(),
        canvas.height(),
    )
    .await
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Handle to a running requestAnimationFrame loop.
pub struct LoopHandle {
    tick: TickSlot,
    raf_id: Rc<Cell<Option<i32>>>,
}

impl LoopHandle {
    /// Cancel the pending frame and drop the tick closure. Must not be called
    /// from inside the tick itself.
    pub fn cancel(&self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        self.tick.borrow_mut().take();
    }
}

fn request_frame(tick: &TickSlot, raf_id: &Cell<Option<i32>>) {
    let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref().map(|c| c.as_ref().clone()))
    else {
        raf_id.set(None);
        return;
    };
    match w.request_animation_frame(cb.unchecked_ref()) {
        Ok(id) => raf_id.set(Some(id)),
        Err(e) => {
            log::error!("[frame] requestAnimationFrame failed: {:?}", e);
            raf_id.set(None);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: TickSlot = Rc::new(RefCell::new(None));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_clone.set(None);
        let keep_going = frame_ctx.borrow_mut().frame();
        if keep_going {
            request_frame(&tick_clone, &raf_clone);
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &raf_id);
    LoopHandle { tick, raf_id }
}
