use crate::config::scaled_blend;
use crate::strand::ScreenPoint;

/// One-shot deadline polled by the frame step. Re-arming replaces any pending
/// deadline; `clear` drops it without firing.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleTimer {
    deadline_ms: Option<f64>,
}

impl IdleTimer {
    pub fn arm(&mut self, now_ms: f64, timeout_ms: f64) {
        self.deadline_ms = Some(now_ms + timeout_ms);
    }

    pub fn clear(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Tracks raw pointer motion, idleness and viewport presence.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    current: ScreenPoint,
    previous: ScreenPoint,
    idle: bool,
    outside_viewport: bool,
    smoothed_velocity: f32,
    timer: IdleTimer,
    idle_timeout_ms: f64,
    velocity_blend: f32,
}

impl PointerTracker {
    pub fn new(start: ScreenPoint, idle_timeout_ms: f64, velocity_blend: f32) -> Self {
        Self {
            current: start,
            previous: start,
            idle: false,
            outside_viewport: false,
            smoothed_velocity: 0.0,
            timer: IdleTimer::default(),
            idle_timeout_ms,
            velocity_blend,
        }
    }

    pub fn current_position(&self) -> ScreenPoint {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn is_outside_viewport(&self) -> bool {
        self.outside_viewport
    }

    pub fn smoothed_velocity(&self) -> f32 {
        self.smoothed_velocity
    }

    pub fn idle_timer(&self) -> &IdleTimer {
        &self.timer
    }

    /// Arm the idle countdown without a move, used when a session starts.
    pub fn arm_idle_timer(&mut self, now_ms: f64) {
        self.timer.arm(now_ms, self.idle_timeout_ms);
    }

    /// Returns false when the event carried unusable coordinates.
    pub fn on_move(&mut self, p: ScreenPoint, now_ms: f64) -> bool {
        if !p.is_finite() {
            return false;
        }
        if self.idle {
            log::debug!("[pointer] active");
        }
        self.idle = false;
        self.timer.arm(now_ms, self.idle_timeout_ms);
        self.current = p;
        true
    }

    /// Clears the outside flag and moves the raw position to the entry point.
    /// The caller snaps the active strand.
    pub fn on_enter(&mut self, p: ScreenPoint) -> bool {
        if !p.is_finite() {
            return false;
        }
        self.outside_viewport = false;
        self.current = p;
        self.previous = p;
        true
    }

    pub fn on_leave(&mut self) {
        self.outside_viewport = true;
    }

    /// Fire the idle timer if due. Returns true on the frame idle begins.
    pub fn poll_idle(&mut self, now_ms: f64) -> bool {
        if self.timer.poll(now_ms) && !self.idle {
            self.idle = true;
            log::debug!("[pointer] idle after {:.0} ms", self.idle_timeout_ms);
            return true;
        }
        false
    }

    /// Blend this frame's raw displacement into the smoothed velocity.
    pub fn update_velocity(&mut self, h: f32) {
        let raw = self.current.distance(self.previous);
        let alpha = scaled_blend(self.velocity_blend, h);
        self.smoothed_velocity += (raw - self.smoothed_velocity) * alpha;
        self.previous = self.current;
    }

    /// Drop any pending idle deadline. Used on teardown.
    pub fn clear_timer(&mut self) {
        self.timer.clear();
    }
}
