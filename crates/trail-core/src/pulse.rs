use crate::config::PulseParams;
use glam::Vec3;
use smallvec::SmallVec;

/// Transient idle marker. Position is a copy of the chain head at spawn time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub start_ms: f64,
    pub position: Vec3,
}

impl Pulse {
    pub fn age_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.start_ms).max(0.0)
    }
}

/// Render-side view of a live pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PulseVisual {
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

/// Normalized age in [0, 1). `None` once the pulse is due for retirement.
#[inline]
pub fn pulse_progress(age_ms: f64, duration_ms: f64) -> Option<f32> {
    if age_ms < 0.0 || age_ms >= duration_ms {
        return None;
    }
    Some((age_ms / duration_ms) as f32)
}

#[inline]
pub fn pulse_scale(progress: f32, max_radius: f32) -> f32 {
    1.0 + max_radius * progress
}

#[inline]
pub fn pulse_opacity(progress: f32) -> f32 {
    1.0 - progress
}

/// Live pulses, all ages < duration after `update`. Two or three are alive at
/// once with the default interval/duration, so they stay inline.
pub type LivePulses = SmallVec<[Pulse; 4]>;

#[derive(Clone, Debug)]
pub struct PulseManager {
    params: PulseParams,
    live: LivePulses,
    last_spawn_ms: Option<f64>,
}

impl PulseManager {
    pub fn new(params: PulseParams) -> Self {
        Self {
            params,
            live: SmallVec::new(),
            last_spawn_ms: None,
        }
    }

    pub fn live(&self) -> &[Pulse] {
        &self.live
    }

    pub fn params(&self) -> &PulseParams {
        &self.params
    }

    fn may_spawn(&self, now_ms: f64) -> bool {
        match self.last_spawn_ms {
            None => true,
            Some(last) => now_ms - last >= self.params.interval_ms,
        }
    }

    /// Spawn (if eligible) and retire. Returns the pulse spawned this frame.
    pub fn update(
        &mut self,
        now_ms: f64,
        idle: bool,
        visibility: f32,
        visibility_min: f32,
        head: Option<Vec3>,
    ) -> Option<Pulse> {
        let before = self.live.len();
        let duration = self.params.duration_ms;
        self.live.retain(|p| p.age_ms(now_ms) < duration);
        let retired = before - self.live.len();
        if retired > 0 {
            log::debug!("[pulse] retired {}", retired);
        }

        if !(idle && visibility > visibility_min && self.may_spawn(now_ms)) {
            return None;
        }
        let position = head?;
        let pulse = Pulse {
            start_ms: now_ms,
            position,
        };
        self.live.push(pulse);
        self.last_spawn_ms = Some(now_ms);
        log::debug!(
            "[pulse] spawn at ({:.2},{:.2},{:.2}) live={}",
            position.x,
            position.y,
            position.z,
            self.live.len()
        );
        Some(pulse)
    }

    /// Visual state of every live pulse, in live-set order.
    pub fn visuals(&self, now_ms: f64) -> impl Iterator<Item = PulseVisual> + '_ {
        let PulseParams {
            duration_ms,
            max_radius,
            ..
        } = self.params;
        self.live.iter().map(move |p| {
            let progress = pulse_progress(p.age_ms(now_ms), duration_ms).unwrap_or(1.0);
            PulseVisual {
                position: p.position,
                scale: pulse_scale(progress, max_radius),
                opacity: pulse_opacity(progress),
            }
        })
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}
