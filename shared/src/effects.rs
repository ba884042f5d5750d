use std::fmt;

use crate::catalog::{PriceTier, PrizeDefinition};
use crate::easing::CubicBezier;
use crate::error::RouletteError;

/// Id of one spin session. Every timer and async call issued for a session
/// carries its ticket so late completions from an older session are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Fixed-length spin animation
    Spin,
    /// Grace period between dismissing a result and clearing it
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    /// Must be acknowledged before the user can continue
    Blocking,
    NonBlocking,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub error: RouletteError,
}

impl Notice {
    pub fn blocking(error: RouletteError) -> Self {
        Self { severity: NoticeSeverity::Blocking, error }
    }

    pub fn non_blocking(error: RouletteError) -> Self {
        Self { severity: NoticeSeverity::NonBlocking, error }
    }

    pub fn message(&self) -> &'static str {
        self.error.user_message()
    }
}

/// Instruction from the state machine to whatever hosts it.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Call back `on_frame` on the next animation frame
    RequestFrame,
    /// Drop the pending animation frame callback, if any
    CancelFrame,
    /// Draw the track at this offset with no transition
    RenderOffset(f64),
    /// Animate the track from `from` to `to`
    StartTransition {
        from: f64,
        to: f64,
        duration_ms: u32,
        easing: CubicBezier,
    },
    ScheduleTimer { token: TimerToken, delay_ms: u32 },
    CancelTimer(TimerToken),
    RequestPayment { ticket: Ticket, tier: PriceTier },
    RecordWin { ticket: Ticket, prize: PrizeDefinition, tier: PriceTier },
    Notify(Notice),
    /// Fire-and-forget vibration on result reveal
    Haptic,
    /// Anything the UI reads from the machine may have changed
    StateChanged,
}
