//! The per-frame state machine.
//!
//! `TrailSession` is the single owner of every strand, pulse and smoothing
//! filter. Host event handlers only call [`TrailSession::push_event`]; the
//! queued intents are applied at the start of the next [`TrailSession::step`],
//! so no handler ever touches strand data directly.

use crate::config::TrailConfig;
use crate::constants::{MAX_PENDING_EVENTS, VISIBILITY_DRAW_MIN, VISIBILITY_PULSE_MIN};
use crate::error::ConfigError;
use crate::geometry::{build_tube, tube_radius, velocity_factor};
use crate::palette::{Palette, PaletteCycle};
use crate::pointer::PointerTracker;
use crate::pulse::{PulseManager, PulseVisual};
use crate::resources::{FrameResources, GeometryBackend, TubeMaterial};
use crate::spring::SpringIntegrator;
use crate::state::{Camera, Viewport};
use crate::strand::{ScreenPoint, Strand};
use crate::visibility::Visibility;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Move(ScreenPoint),
    Enter(ScreenPoint),
    Leave,
    Resize { width: f32, height: f32 },
    CyclePalette,
}

/// Summary of one frame, mostly for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub idle: bool,
    pub outside_viewport: bool,
    pub visibility: f32,
    pub smoothed_velocity: f32,
    pub step_scale: f32,
    pub pulse_spawned: bool,
    pub live_pulses: usize,
    pub tubes_emitted: usize,
}

pub struct TrailSession {
    config: TrailConfig,
    viewport: Viewport,
    pointer: PointerTracker,
    strands: Vec<Strand>,
    active_strand: usize,
    integrator: SpringIntegrator,
    pulses: PulseManager,
    visibility: Visibility,
    palette: PaletteCycle,
    palette_dirty: bool,
    pending: Vec<InputEvent>,
    last_frame_ms: Option<f64>,
    stats: FrameStats,
    points_scratch: Vec<Vec3>,
    visuals_scratch: Vec<PulseVisual>,
}

impl TrailSession {
    pub fn new(
        config: TrailConfig,
        width: f32,
        height: f32,
        now_ms: f64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = Viewport::new(width, height, &config.camera);
        let start = viewport.center();
        let strands = (0..config.strand_count)
            .map(|_| Strand::new(config.trail_length, start, &viewport))
            .collect();
        let mut pointer = PointerTracker::new(start, config.idle_timeout_ms, config.velocity_blend);
        pointer.arm_idle_timer(now_ms);
        log::info!(
            "[session] start strands={} length={} viewport={}x{}",
            config.strand_count,
            config.trail_length,
            viewport.width,
            viewport.height
        );
        Ok(Self {
            viewport,
            pointer,
            strands,
            active_strand: 0,
            integrator: SpringIntegrator::new(config.trail_length),
            pulses: PulseManager::new(config.pulse),
            visibility: Visibility::new(1.0, config.visibility_blend),
            palette: PaletteCycle::new(config.palettes.clone()),
            palette_dirty: true,
            pending: Vec::new(),
            last_frame_ms: None,
            stats: FrameStats::default(),
            points_scratch: Vec::with_capacity(config.trail_length),
            visuals_scratch: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> Camera {
        Camera::new(&self.config.camera, self.viewport.aspect())
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn active_strand(&self) -> Option<&Strand> {
        self.strands.get(self.active_strand)
    }

    pub fn pulses(&self) -> &PulseManager {
        &self.pulses
    }

    pub fn visibility(&self) -> f32 {
        self.visibility.value()
    }

    pub fn palette(&self) -> Palette {
        self.palette.current()
    }

    pub fn palette_index(&self) -> usize {
        self.palette.index()
    }

    pub fn last_stats(&self) -> FrameStats {
        self.stats
    }

    pub fn pending_events(&self) -> &[InputEvent] {
        &self.pending
    }

    /// Queue an input intent for the next frame.
    ///
    /// Consecutive moves and resizes collapse to the latest one, so a host
    /// that keeps queuing while no frame is stepped (a paused loop) holds at
    /// most [`MAX_PENDING_EVENTS`] intents. Past that the oldest is dropped.
    pub fn push_event(&mut self, ev: InputEvent) {
        if let Some(last) = self.pending.last_mut() {
            let supersedes = match (*last, ev) {
                (InputEvent::Move(_), InputEvent::Move(p)) => p.is_finite(),
                (InputEvent::Resize { .. }, InputEvent::Resize { width, height }) => {
                    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
                }
                _ => false,
            };
            if supersedes {
                *last = ev;
                return;
            }
        }
        if self.pending.len() >= MAX_PENDING_EVENTS {
            self.pending.remove(0);
        }
        self.pending.push(ev);
    }

    fn apply_event(&mut self, ev: InputEvent, now_ms: f64) {
        match ev {
            InputEvent::Move(p) => {
                self.pointer.on_move(p, now_ms);
            }
            InputEvent::Enter(p) => {
                if self.pointer.on_enter(p) {
                    let viewport = self.viewport;
                    if let Some(strand) = self.strands.get_mut(self.active_strand) {
                        strand.snap(p, &viewport);
                    }
                    log::debug!("[pointer] enter, snap to ({:.0},{:.0})", p.x, p.y);
                }
            }
            InputEvent::Leave => {
                self.pointer.on_leave();
                log::debug!("[pointer] leave");
            }
            InputEvent::Resize { width, height } => {
                if self.viewport.resize(width, height, &self.config.camera) {
                    log::info!("[viewport] resize {}x{}", width, height);
                }
            }
            InputEvent::CyclePalette => {
                self.palette.advance();
                self.palette_dirty = true;
                log::debug!("[palette] index {}", self.palette.index());
            }
        }
    }

    /// Advance the simulation by one frame at time `now_ms`.
    pub fn step(&mut self, now_ms: f64) -> FrameStats {
        let h = match self.last_frame_ms {
            Some(last) => self.config.step_mode.step_scale(now_ms - last),
            None => 1.0,
        };
        self.last_frame_ms = Some(now_ms);

        let pending = std::mem::take(&mut self.pending);
        for ev in &pending {
            self.apply_event(*ev, now_ms);
        }
        // hand the buffer back so queuing does not reallocate
        self.pending = pending;
        self.pending.clear();

        self.pointer.poll_idle(now_ms);
        self.pointer.update_velocity(h);
        let visibility = self.visibility.update(self.pointer.is_outside_viewport(), h);

        let idle = self.pointer.is_idle();
        let head = self.pointer.current_position();
        for strand in &mut self.strands {
            if idle {
                strand.collapse_to_head();
            } else {
                strand.scroll(head);
            }
        }
        for strand in &mut self.strands {
            self.integrator
                .step(strand, &self.viewport, &self.config.spring, h);
        }

        let head_world = self.active_strand().and_then(|s| s.head_position());
        let spawned = self
            .pulses
            .update(now_ms, idle, visibility, VISIBILITY_PULSE_MIN, head_world);

        self.stats = FrameStats {
            idle,
            outside_viewport: self.pointer.is_outside_viewport(),
            visibility,
            smoothed_velocity: self.pointer.smoothed_velocity(),
            step_scale: h,
            pulse_spawned: spawned.is_some(),
            live_pulses: self.pulses.live().len(),
            tubes_emitted: 0,
        };
        self.stats
    }

    /// Build this frame's tubes and ring visuals into `resources`.
    /// Returns the number of tubes emitted.
    pub fn render_into<B: GeometryBackend>(
        &mut self,
        backend: &mut B,
        resources: &mut FrameResources<B>,
    ) -> usize {
        if self.palette_dirty {
            backend.set_palette(&self.palette.current());
            self.palette_dirty = false;
        }

        let visibility = self.visibility.value();
        let mut next = Vec::with_capacity(self.strands.len());
        if visibility > VISIBILITY_DRAW_MIN {
            let vf = velocity_factor(self.pointer.smoothed_velocity(), self.config.max_velocity);
            let radius = tube_radius(&self.config.tube, vf, visibility);
            for (i, strand) in self.strands.iter().enumerate() {
                self.points_scratch.clear();
                self.points_scratch.extend(strand.positions());
                if let Some(mesh) = build_tube(&self.points_scratch, &self.config.tube, radius) {
                    let material = TubeMaterial {
                        strand: i,
                        opacity: visibility,
                    };
                    next.push(backend.create_tube(&mesh, &material));
                }
            }
        }
        let emitted = next.len();
        resources.replace_tubes(backend, next);

        let now_ms = self.last_frame_ms.unwrap_or(0.0);
        self.visuals_scratch.clear();
        self.visuals_scratch.extend(self.pulses.visuals(now_ms));
        resources.reconcile_rings(backend, &self.visuals_scratch);

        self.stats.tubes_emitted = emitted;
        emitted
    }

    /// `step` followed by `render_into`.
    pub fn frame<B: GeometryBackend>(
        &mut self,
        now_ms: f64,
        backend: &mut B,
        resources: &mut FrameResources<B>,
    ) -> FrameStats {
        self.step(now_ms);
        self.render_into(backend, resources);
        self.stats
    }

    /// End the session: drop queued input, clear the idle timer and live
    /// pulses, and release every resource still held by `resources`.
    pub fn teardown<B: GeometryBackend>(
        &mut self,
        backend: &mut B,
        resources: &mut FrameResources<B>,
    ) {
        self.pending.clear();
        self.pointer.clear_timer();
        self.pulses.clear();
        resources.release_all(backend);
        log::info!("[session] teardown");
    }
}
