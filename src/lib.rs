#![cfg(target_arch = "wasm32")]
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use trail_core::{FrameResources, TrailConfig, TrailSession};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod input;

/// Everything a running session owns on the page.
struct App {
    frame_ctx: Rc<RefCell<frame::FrameContext>>,
    loop_handle: frame::LoopHandle,
    listeners: dom::ListenerRegistry,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("glow-trail starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    if APP.with(|app| app.borrow().is_some()) {
        log::warn!("session already running");
        return Ok(());
    }
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Backing store must match the layout size before the surface is configured
    dom::sync_canvas_backing_size(&canvas);

    let gpu = frame::init_gpu(&canvas).await?;
    let now_ms = instant::now();
    let session = TrailSession::new(
        TrailConfig::default(),
        canvas.width() as f32,
        canvas.height() as f32,
        now_ms,
    )?;

    let queue: events::EventQueue = Rc::new(RefCell::new(Vec::new()));
    let paused = Rc::new(Cell::new(false));
    let mut listeners = dom::ListenerRegistry::default();
    events::wire_pointer(&mut listeners, &canvas, &queue)
        .map_err(|e| anyhow::anyhow!("pointer listeners: {:?}", e))?;
    events::wire_keyboard(&mut listeners, &window, &canvas, &queue, &paused)
        .map_err(|e| anyhow::anyhow!("keyboard listener: {:?}", e))?;
    log::info!("[dom] {} listeners attached", listeners.len());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        session,
        resources: FrameResources::new(),
        gpu,
        canvas,
        queue,
        paused,
        started_ms: now_ms,
        stopped: false,
    }));
    let loop_handle = frame::start_loop(frame_ctx.clone());

    APP.with(|app| {
        *app.borrow_mut() = Some(App {
            frame_ctx,
            loop_handle,
            listeners,
        });
    });
    Ok(())
}

/// Stop the session: detach listeners, cancel the pending frame and release
/// all GPU geometry. Safe to call more than once.
#[wasm_bindgen]
pub fn teardown() {
    let Some(mut app) = APP.with(|app| app.borrow_mut().take()) else {
        return;
    };
    app.listeners.remove_all();
    app.loop_handle.cancel();
    app.frame_ctx.borrow_mut().teardown();
    log::info!("glow-trail stopped");
}
