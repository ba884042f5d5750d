use crate::easing::CubicBezier;
use crate::effects::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    Idle,
    Spinning,
}

/// One eased move of the track from wherever idle scrolling left it to the
/// landing offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTransition {
    pub start_offset: f64,
    pub target_offset: f64,
    pub started_at: f64,
    pub duration_ms: u32,
    pub easing: CubicBezier,
}

impl SpinTransition {
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn offset_at(&self, now: f64) -> f64 {
        let eased = self.easing.sample(self.progress(now));
        self.start_offset + (self.target_offset - self.start_offset) * eased
    }

    pub fn is_complete(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Sole owner of the track offset.
///
/// Idle: ambient scroll driven by animation frames, wrapped to one cycle.
/// Spinning: a single transition, no frames. Switching between the two never
/// moves the offset, so there is no visible jump.
#[derive(Debug, Clone)]
pub struct MotionController {
    offset: f64,
    transition: Option<SpinTransition>,
    last_frame: Option<f64>,
    frame_pending: bool,
    cycle_width: f64,
    velocity: f64,
    visible: bool,
    reduced_motion: bool,
    disposed: bool,
}

impl MotionController {
    pub fn new(cycle_width: f64, velocity: f64) -> Self {
        Self {
            offset: 0.0,
            transition: None,
            last_frame: None,
            frame_pending: false,
            cycle_width,
            velocity,
            visible: true,
            reduced_motion: false,
            disposed: false,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn mode(&self) -> MotionMode {
        if self.transition.is_some() {
            MotionMode::Spinning
        } else {
            MotionMode::Idle
        }
    }

    pub fn transition(&self) -> Option<&SpinTransition> {
        self.transition.as_ref()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn cycle_width(&self) -> f64 {
        self.cycle_width
    }

    /// Offset to draw at `now`; follows the eased curve while spinning.
    pub fn sample(&self, now: f64) -> f64 {
        match &self.transition {
            Some(transition) => transition.offset_at(now),
            None => self.offset,
        }
    }

    fn can_auto_scroll(&self) -> bool {
        !self.disposed
            && self.transition.is_none()
            && self.visible
            && !self.reduced_motion
            && self.cycle_width > 0.0
    }

    fn schedule_frame(&mut self, out: &mut Vec<Effect>) {
        if self.frame_pending || !self.can_auto_scroll() {
            return;
        }
        self.frame_pending = true;
        out.push(Effect::RequestFrame);
    }

    fn cancel_frame(&mut self, out: &mut Vec<Effect>) {
        if self.frame_pending {
            self.frame_pending = false;
            out.push(Effect::CancelFrame);
        }
        self.last_frame = None;
    }

    /// Starts (or restarts) ambient scrolling if nothing prevents it. The
    /// first frame after a resume moves the track by zero.
    pub fn resume_idle(&mut self, out: &mut Vec<Effect>) {
        if self.frame_pending {
            return;
        }
        self.last_frame = None;
        self.schedule_frame(out);
    }

    pub fn on_frame(&mut self, timestamp: f64, out: &mut Vec<Effect>) {
        if !self.frame_pending || self.disposed || self.transition.is_some() {
            return;
        }
        self.frame_pending = false;

        let delta_seconds = self
            .last_frame
            .map(|previous| ((timestamp - previous) / 1000.0).max(0.0))
            .unwrap_or(0.0);
        self.last_frame = Some(timestamp);
        self.advance(delta_seconds);

        out.push(Effect::RenderOffset(self.offset));
        self.schedule_frame(out);
    }

    fn advance(&mut self, delta_seconds: f64) {
        if self.cycle_width <= 0.0 {
            return;
        }
        self.offset += self.velocity * delta_seconds;
        if self.offset >= self.cycle_width {
            self.offset %= self.cycle_width;
        }
    }

    /// Switches to Spinning, cancelling the ambient frame first.
    pub fn begin_spin(
        &mut self,
        target_offset: f64,
        now: f64,
        duration_ms: u32,
        easing: CubicBezier,
        out: &mut Vec<Effect>,
    ) -> SpinTransition {
        self.cancel_frame(out);
        let transition = SpinTransition {
            start_offset: self.offset,
            target_offset,
            started_at: now,
            duration_ms,
            easing,
        };
        self.transition = Some(transition);
        out.push(Effect::StartTransition {
            from: transition.start_offset,
            to: transition.target_offset,
            duration_ms,
            easing,
        });
        transition
    }

    /// Ends the spin: the offset folds back into the first cycle (same cards
    /// on screen) and ambient scrolling picks up from there.
    pub fn complete_spin(&mut self, out: &mut Vec<Effect>) -> Option<f64> {
        let transition = self.transition.take()?;
        self.offset = if self.cycle_width > 0.0 {
            transition.target_offset.rem_euclid(self.cycle_width)
        } else {
            0.0
        };
        out.push(Effect::RenderOffset(self.offset));
        self.resume_idle(out);
        Some(self.offset)
    }

    /// New track for a new tier. Ignored while spinning.
    pub fn set_cycle_width(&mut self, cycle_width: f64, out: &mut Vec<Effect>) {
        if self.transition.is_some() {
            return;
        }
        self.cycle_width = cycle_width;
        self.offset = if cycle_width > 0.0 {
            self.offset.rem_euclid(cycle_width)
        } else {
            0.0
        };
        out.push(Effect::RenderOffset(self.offset));
        self.resume_idle(out);
    }

    pub fn set_visible(&mut self, visible: bool, out: &mut Vec<Effect>) {
        self.visible = visible;
        if visible {
            self.resume_idle(out);
        } else {
            self.cancel_frame(out);
        }
    }

    pub fn set_reduced_motion(&mut self, reduced: bool, out: &mut Vec<Effect>) {
        self.reduced_motion = reduced;
        if reduced {
            self.cancel_frame(out);
        } else {
            self.resume_idle(out);
        }
    }

    pub fn dispose(&mut self, out: &mut Vec<Effect>) {
        self.cancel_frame(out);
        self.transition = None;
        self.disposed = true;
    }
}
