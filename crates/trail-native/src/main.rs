use std::time::Instant;
use trail_core::{FrameResources, InputEvent, ScreenPoint, TrailConfig, TrailSession};
use trail_render::{GpuState, MeshFactory};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

struct NativeApp<'w> {
    window: &'w Window,
    gpu: GpuState<'w>,
    session: TrailSession,
    resources: FrameResources<MeshFactory>,
    start: Instant,
    // CursorEntered carries no position; the next CursorMoved supplies it
    entering: bool,
    torn_down: bool,
}

impl<'w> NativeApp<'w> {
    async fn new(window: &'w Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window, size.width, size.height).await?;
        let start = Instant::now();
        let session = TrailSession::new(
            TrailConfig::default(),
            size.width.max(1) as f32,
            size.height.max(1) as f32,
            0.0,
        )?;
        Ok(Self {
            window,
            gpu,
            session,
            resources: FrameResources::new(),
            start,
            entering: false,
            torn_down: false,
        })
    }

    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize_if_needed(size.width, size.height);
        self.session.push_event(InputEvent::Resize {
            width: size.width as f32,
            height: size.height as f32,
        });
    }

    fn cursor_moved(&mut self, x: f64, y: f64) {
        let p = ScreenPoint::new(x as f32, y as f32);
        if self.entering {
            self.entering = false;
            self.session.push_event(InputEvent::Enter(p));
        } else {
            self.session.push_event(InputEvent::Move(p));
        }
    }

    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now_ms = self.now_ms();
        self.session.step(now_ms);
        self.session
            .render_into(self.gpu.factory_mut(), &mut self.resources);
        let camera = self.session.camera();
        self.gpu
            .render(&self.resources, &camera, (now_ms / 1000.0) as f32)
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.session
            .teardown(self.gpu.factory_mut(), &mut self.resources);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("glow-trail")
        .build(&event_loop)?;

    let mut app = pollster::block_on(NativeApp::new(&window))?;
    log::info!("glow-trail native starting");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::CursorEntered { .. } => app.entering = true,
            WindowEvent::CursorMoved { position, .. } => app.cursor_moved(position.x, position.y),
            WindowEvent::CursorLeft { .. } => {
                app.entering = false;
                app.session.push_event(InputEvent::Leave);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => app.session.push_event(InputEvent::CyclePalette),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => {
                    app.teardown();
                    elwt.exit();
                }
                Key::Character(c) if c.eq_ignore_ascii_case("c") => {
                    app.session.push_event(InputEvent::CyclePalette)
                }
                _ => {}
            },
            WindowEvent::CloseRequested => {
                app.teardown();
                elwt.exit();
            }
            _ => {}
        },
        Event::AboutToWait if !app.torn_down => match app.frame() {
            Ok(()) => app.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                app.gpu.reconfigure()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                app.teardown();
                elwt.exit();
            }
            Err(e) => log::warn!("surface error: {:?}", e),
        },
        _ => {}
    })?;
    Ok(())
}
