use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::{roulette_prizes, ChanceTable, PriceTier, PrizeDefinition, RoulettePrize, GIFTS_CATALOG};
use crate::constants::*;
use crate::easing::Platform;
use crate::effects::{Effect, Notice, Ticket, TimerKind, TimerToken};
use crate::error::RouletteError;
use crate::gateway::PaymentOutcome;
use crate::motion::MotionController;
use crate::selector::select_winner;
use crate::track::{CardSize, DisplayOrder, ExtendedTrack, TrackGeometry};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    AwaitingPayment,
    Spinning,
    ResultShown,
    /// Result dismissed, waiting out the close transition before clearing it
    Dismissing,
}

impl SpinState {
    /// Tier and demo switches are locked in these states.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::AwaitingPayment | Self::Spinning)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SpinMode {
    Demo,
    Paid,
}

/// Lives from the start of a spin until its result is dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSession {
    pub ticket: Ticket,
    pub mode: SpinMode,
    pub tier: PriceTier,
    pub winner_index: usize,
    pub prize: PrizeDefinition,
    pub start_offset: f64,
    pub target_offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinResult {
    pub prize: PrizeDefinition,
    pub was_demo: bool,
    pub tier: PriceTier,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub spin_duration_ms: u32,
    pub dismiss_grace_ms: u32,
    pub auto_scroll_speed: f64,
    pub track_cycles: usize,
    pub landing_cycle: usize,
    pub geometry: TrackGeometry,
    pub platform: Platform,
    pub initial_tier: PriceTier,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: SPIN_DURATION_MS,
            dismiss_grace_ms: RESULT_DISMISS_GRACE_MS,
            auto_scroll_speed: AUTO_SCROLL_SPEED,
            track_cycles: TRACK_CYCLES,
            landing_cycle: LANDING_CYCLE,
            geometry: TrackGeometry::default(),
            platform: Platform::default(),
            initial_tier: PriceTier::default(),
        }
    }
}

/// Orchestrates demo and paid spins.
///
/// The machine never performs I/O. Each input returns the effects the host
/// has to carry out, and asynchronous completions come back in through
/// `on_payment_outcome`, `on_delivery_outcome`, `on_timer` and `on_frame`,
/// each tagged with the ticket or token it was issued with.
pub struct SpinStateMachine {
    config: EngineConfig,
    state: SpinState,
    demo_mode: bool,
    payment_available: bool,
    order: DisplayOrder,
    track: ExtendedTrack,
    motion: MotionController,
    session: Option<SpinSession>,
    result: Option<SpinResult>,
    awaiting_payment: Option<Ticket>,
    dismissing: Option<Ticket>,
    pending_deliveries: Vec<Ticket>,
    next_ticket: u64,
    disposed: bool,
    rng: Box<dyn RngCore>,
}

impl SpinStateMachine {
    pub fn new(config: EngineConfig, payment_available: bool) -> Self {
        Self::with_rng(config, payment_available, StdRng::from_entropy())
    }

    pub fn with_rng(config: EngineConfig, payment_available: bool, rng: impl RngCore + 'static) -> Self {
        let mut rng: Box<dyn RngCore> = Box::new(rng);
        let tier = config.initial_tier;
        let table = ChanceTable::for_tier(tier);
        if let Err(e) = table.validate(tier) {
            log::error!("Chance table misconfigured: {}", e);
        }
        let order = DisplayOrder::build(tier, table, &mut *rng);
        let track = ExtendedTrack::new(&order, config.track_cycles);
        let motion = MotionController::new(config.geometry.cycle_width(order.len()), config.auto_scroll_speed);

        Self {
            config,
            state: SpinState::Idle,
            demo_mode: false,
            payment_available,
            order,
            track,
            motion,
            session: None,
            result: None,
            awaiting_payment: None,
            dismissing: None,
            pending_deliveries: Vec::new(),
            next_ticket: 0,
            disposed: false,
            rng,
        }
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn payment_available(&self) -> bool {
        self.payment_available
    }

    pub fn tier(&self) -> PriceTier {
        self.order.tier()
    }

    pub fn display_order(&self) -> &DisplayOrder {
        &self.order
    }

    pub fn track(&self) -> &ExtendedTrack {
        &self.track
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    pub fn result(&self) -> Option<&SpinResult> {
        self.result.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn can_spin(&self) -> bool {
        !self.disposed && self.state == SpinState::Idle
    }

    /// Every gift in catalog order with the active tier's chance label.
    pub fn prize_table(&self) -> Vec<RoulettePrize> {
        roulette_prizes(&GIFTS_CATALOG, ChanceTable::for_tier(self.tier()))
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Draws the track once and starts ambient scrolling.
    pub fn activate(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.disposed {
            return out;
        }
        out.push(Effect::RenderOffset(self.motion.offset()));
        self.motion.resume_idle(&mut out);
        out.push(Effect::StateChanged);
        out
    }

    pub fn request_spin(&mut self, now: f64) -> Vec<Effect> {
        let mut out = Vec::new();
        if !self.can_spin() {
            log::debug!("Spin request ignored in state {:?}", self.state);
            return out;
        }

        if self.demo_mode {
            let ticket = self.issue_ticket();
            self.begin_spin(SpinMode::Demo, ticket, now, &mut out);
            return out;
        }

        if !self.payment_available {
            log::warn!("Paid spin refused: payment capability missing");
            out.push(Effect::Notify(Notice::blocking(RouletteError::PaymentUnavailable)));
            return out;
        }

        let ticket = self.issue_ticket();
        self.awaiting_payment = Some(ticket);
        self.state = SpinState::AwaitingPayment;
        log::info!("Awaiting payment {} for tier {}", ticket, self.tier());
        out.push(Effect::RequestPayment { ticket, tier: self.tier() });
        out.push(Effect::StateChanged);
        out
    }

    pub fn on_payment_outcome(
        &mut self,
        ticket: Ticket,
        outcome: Result<PaymentOutcome, RouletteError>,
        now: f64,
    ) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.disposed || self.state != SpinState::AwaitingPayment || self.awaiting_payment != Some(ticket) {
            log::debug!("Dropping stale payment outcome for {}", ticket);
            return out;
        }

        match outcome {
            Ok(PaymentOutcome::Paid) => {
                log::info!("Payment {} confirmed", ticket);
                self.awaiting_payment = None;
                self.begin_spin(SpinMode::Paid, ticket, now, &mut out);
            }
            Ok(PaymentOutcome::Pending) => {
                // The invoice sheet reports once; an unsettled payment never starts a spin
                log::info!("Payment {} left pending, back to idle", ticket);
                self.awaiting_payment = None;
                self.state = SpinState::Idle;
                out.push(Effect::StateChanged);
            }
            Ok(declined) => {
                log::info!("Payment {} ended as {}", ticket, declined);
                self.awaiting_payment = None;
                self.state = SpinState::Idle;
                out.push(Effect::Notify(Notice::non_blocking(RouletteError::PaymentDeclined(declined))));
                out.push(Effect::StateChanged);
            }
            Err(e) => {
                log::warn!("Payment {} failed: {}", ticket, e);
                self.awaiting_payment = None;
                self.state = SpinState::Idle;
                out.push(Effect::Notify(Notice::non_blocking(e)));
                out.push(Effect::StateChanged);
            }
        }
        out
    }

    fn begin_spin(&mut self, mode: SpinMode, ticket: Ticket, now: f64, out: &mut Vec<Effect>) {
        // Always a fresh draw against the order on screen right now
        let winner_index = select_winner(self.order.prizes(), &mut *self.rng);
        let Some(winner) = self.order.get(winner_index).cloned() else {
            log::error!("Display order is empty, cannot spin");
            self.state = SpinState::Idle;
            out.push(Effect::StateChanged);
            return;
        };

        let target_offset = self
            .config
            .geometry
            .target_offset(self.order.len(), self.config.landing_cycle, winner_index);
        let transition = self.motion.begin_spin(
            target_offset,
            now,
            self.config.spin_duration_ms,
            self.config.platform.spin_easing(),
            out,
        );

        log::info!(
            "Spin {} ({:?}) started: slot {} -> {}, offset {:.1} -> {:.1}",
            ticket,
            mode,
            winner_index,
            winner.prize.id,
            transition.start_offset,
            target_offset
        );

        self.session = Some(SpinSession {
            ticket,
            mode,
            tier: self.tier(),
            winner_index,
            prize: winner.prize,
            start_offset: transition.start_offset,
            target_offset,
        });
        self.result = None;
        self.state = SpinState::Spinning;
        out.push(Effect::ScheduleTimer {
            token: TimerToken { kind: TimerKind::Spin, ticket },
            delay_ms: self.config.spin_duration_ms,
        });
        out.push(Effect::StateChanged);
    }

    pub fn on_timer(&mut self, token: TimerToken) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.disposed {
            return out;
        }

        match token.kind {
            TimerKind::Spin => {
                let live = self.state == SpinState::Spinning
                    && self.session.as_ref().map(|s| s.ticket) == Some(token.ticket);
                if live {
                    self.finish_spin(&mut out);
                } else {
                    log::debug!("Ignoring stale spin timer {}", token.ticket);
                }
            }
            TimerKind::Dismiss => {
                if self.state == SpinState::Dismissing && self.dismissing == Some(token.ticket) {
                    self.dismissing = None;
                    self.result = None;
                    self.state = SpinState::Idle;
                    out.push(Effect::StateChanged);
                } else {
                    log::debug!("Ignoring stale dismiss timer {}", token.ticket);
                }
            }
        }
        out
    }

    fn finish_spin(&mut self, out: &mut Vec<Effect>) {
        let Some(session) = self.session.clone() else {
            return;
        };
        self.motion.complete_spin(out);

        self.result = Some(SpinResult {
            prize: session.prize,
            was_demo: session.mode == SpinMode::Demo,
            tier: session.tier,
        });
        self.state = SpinState::ResultShown;
        log::info!("Spin {} landed on {}", session.ticket, session.prize.id);

        if session.mode == SpinMode::Paid {
            self.pending_deliveries.push(session.ticket);
            out.push(Effect::RecordWin {
                ticket: session.ticket,
                prize: session.prize,
                tier: session.tier,
            });
        }
        out.push(Effect::Haptic);
        out.push(Effect::StateChanged);
    }

    /// A failed delivery only produces a notice; the result stands.
    pub fn on_delivery_outcome(&mut self, ticket: Ticket, outcome: Result<(), RouletteError>) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.disposed {
            return out;
        }
        let Some(position) = self.pending_deliveries.iter().position(|t| *t == ticket) else {
            log::debug!("Dropping unknown delivery outcome for {}", ticket);
            return out;
        };
        self.pending_deliveries.remove(position);

        match outcome {
            Ok(()) => log::info!("Delivery for {} confirmed", ticket),
            Err(e) => {
                log::warn!("Delivery for {} failed: {}", ticket, e);
                let error = match e {
                    RouletteError::DeliveryConfirmationFailed(_) => e,
                    other => RouletteError::DeliveryConfirmationFailed(other.to_string()),
                };
                out.push(Effect::Notify(Notice::non_blocking(error)));
            }
        }
        out
    }

    pub fn dismiss(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.disposed || self.state != SpinState::ResultShown {
            return out;
        }
        let ticket = match self.session.take() {
            Some(session) => session.ticket,
            None => self.issue_ticket(),
        };
        self.dismissing = Some(ticket);
        self.state = SpinState::Dismissing;
        out.push(Effect::ScheduleTimer {
            token: TimerToken { kind: TimerKind::Dismiss, ticket },
            delay_ms: self.config.dismiss_grace_ms,
        });
        out.push(Effect::StateChanged);
        out
    }

    /// "Play for real" on a demo result: leaves demo mode and dismisses.
    pub fn disable_demo_and_dismiss(&mut self) -> Vec<Effect> {
        if self.disposed || self.state != SpinState::ResultShown {
            return Vec::new();
        }
        self.demo_mode = false;
        self.dismiss()
    }

    pub fn set_demo_mode(&mut self, enabled: bool) -> Vec<Effect> {
        if self.disposed || self.state.is_busy() || self.demo_mode == enabled {
            return Vec::new();
        }
        self.demo_mode = enabled;
        vec![Effect::StateChanged]
    }

    pub fn set_payment_available(&mut self, available: bool) {
        self.payment_available = available;
    }

    /// Switches tier and reshuffles the track. Locked while a payment or
    /// spin is in flight.
    pub fn select_tier(&mut self, tier: PriceTier) -> Result<Vec<Effect>, RouletteError> {
        let mut out = Vec::new();
        if self.disposed || tier == self.tier() {
            return Ok(out);
        }
        if self.state.is_busy() {
            return Err(RouletteError::Busy(self.state));
        }

        let table = ChanceTable::for_tier(tier);
        if let Err(e) = table.validate(tier) {
            log::error!("Chance table misconfigured: {}", e);
        }
        self.order = DisplayOrder::build(tier, table, &mut *self.rng);
        self.rebuild_track(&mut out);
        log::info!("Tier switched to {}", tier);
        out.push(Effect::StateChanged);
        Ok(out)
    }

    /// Viewport size class changed. Same lock as a tier switch.
    pub fn set_card_size(&mut self, size: CardSize) -> Result<Vec<Effect>, RouletteError> {
        let mut out = Vec::new();
        if self.disposed || self.config.geometry.card_width == size.width() {
            return Ok(out);
        }
        if self.state.is_busy() {
            return Err(RouletteError::Busy(self.state));
        }
        self.config.geometry.card_width = size.width();
        self.rebuild_track(&mut out);
        out.push(Effect::StateChanged);
        Ok(out)
    }

    fn rebuild_track(&mut self, out: &mut Vec<Effect>) {
        self.track = ExtendedTrack::new(&self.order, self.config.track_cycles);
        let cycle_width = self.config.geometry.cycle_width(self.order.len());
        self.motion.set_cycle_width(cycle_width, out);
    }

    /// Only affects where the next spin lands.
    pub fn set_container_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.config.geometry.container_width = width;
        }
    }

    pub fn set_platform(&mut self, platform: Platform) {
        self.config.platform = platform;
    }

    pub fn on_frame(&mut self, timestamp: f64) -> Vec<Effect> {
        let mut out = Vec::new();
        if !self.disposed {
            self.motion.on_frame(timestamp, &mut out);
        }
        out
    }

    pub fn set_visibility(&mut self, visible: bool) -> Vec<Effect> {
        let mut out = Vec::new();
        if !self.disposed {
            self.motion.set_visible(visible, &mut out);
        }
        out
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) -> Vec<Effect> {
        let mut out = Vec::new();
        if !self.disposed {
            self.motion.set_reduced_motion(reduced, &mut out);
        }
        out
    }

    /// Tears the engine down: cancels the frame and every live timer, and
    /// makes all later inputs no-ops.
    pub fn dispose(&mut self) -> Vec<Effect> {
        let mut out = Vec::new();
        if self.disposed {
            return out;
        }
        self.motion.dispose(&mut out);
        if self.state == SpinState::Spinning {
            if let Some(session) = &self.session {
                out.push(Effect::CancelTimer(TimerToken { kind: TimerKind::Spin, ticket: session.ticket }));
            }
        }
        if let Some(ticket) = self.dismissing.take() {
            out.push(Effect::CancelTimer(TimerToken { kind: TimerKind::Dismiss, ticket }));
        }
        self.awaiting_payment = None;
        self.pending_deliveries.clear();
        self.disposed = true;
        log::debug!("Roulette engine disposed in state {:?}", self.state);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(payments: bool) -> SpinStateMachine {
        let mut m = SpinStateMachine::with_rng(EngineConfig::default(), payments, StdRng::seed_from_u64(1));
        m.activate();
        m
    }

    fn spin_token(out: &[Effect]) -> TimerToken {
        out.iter()
            .find_map(|e| match e {
                Effect::ScheduleTimer { token, .. } if token.kind == TimerKind::Spin => Some(*token),
                _ => None,
            })
            .expect("spin timer scheduled")
    }

    #[test]
    fn test_demo_spin_skips_payment() {
        let mut m = machine(false);
        m.set_demo_mode(true);
        let out = m.request_spin(0.0);
        assert_eq!(m.state(), SpinState::Spinning);
        assert!(!out.iter().any(|e| matches!(e, Effect::RequestPayment { .. })));

        let out = m.on_timer(spin_token(&out));
        assert_eq!(m.state(), SpinState::ResultShown);
        assert!(m.result().unwrap().was_demo);
        assert!(!out.iter().any(|e| matches!(e, Effect::RecordWin { .. })));
        assert!(out.contains(&Effect::Haptic));
    }

    #[test]
    fn test_pending_payment_returns_to_idle() {
        let mut m = machine(true);
        let out = m.request_spin(0.0);
        let ticket = out
            .iter()
            .find_map(|e| match e {
                Effect::RequestPayment { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("payment requested");

        let out = m.on_payment_outcome(ticket, Ok(PaymentOutcome::Pending), 10.0);
        assert_eq!(m.state(), SpinState::Idle);
        assert_eq!(out, vec![Effect::StateChanged]);

        assert!(m.select_tier(PriceTier::Stars100).is_ok());
        m.set_demo_mode(true);
        assert!(m.demo_mode());
        m.request_spin(20.0);
        assert_eq!(m.state(), SpinState::Spinning);
    }

    #[test]
    fn test_paid_spin_without_payments_is_refused() {
        let mut m = machine(false);
        let out = m.request_spin(0.0);
        assert_eq!(m.state(), SpinState::Idle);
        assert_eq!(out, vec![Effect::Notify(Notice::blocking(RouletteError::PaymentUnavailable))]);
    }

    #[test]
    fn test_winner_matches_display_slot() {
        let mut m = machine(false);
        m.set_demo_mode(true);
        for _ in 0..20 {
            let out = m.request_spin(0.0);
            let session = m.session().unwrap().clone();
            assert_eq!(m.display_order().get(session.winner_index).unwrap().prize, session.prize);
            let expected = m.config().geometry.target_offset(13, LANDING_CYCLE, session.winner_index);
            assert_eq!(session.target_offset, expected);
            m.on_timer(spin_token(&out));
            let out = m.dismiss();
            let token = out.iter().find_map(|e| match e {
                Effect::ScheduleTimer { token, .. } => Some(*token),
                _ => None,
            });
            m.on_timer(token.unwrap());
            assert_eq!(m.state(), SpinState::Idle);
        }
    }

    #[test]
    fn test_tier_locked_while_awaiting_payment() {
        let mut m = machine(true);
        let before: Vec<_> = m.display_order().prizes().iter().map(|p| p.prize.id).collect();
        m.request_spin(0.0);
        assert_eq!(m.select_tier(PriceTier::Stars100), Err(RouletteError::Busy(SpinState::AwaitingPayment)));
        let after: Vec<_> = m.display_order().prizes().iter().map(|p| p.prize.id).collect();
        assert_eq!(before, after);
        assert_eq!(m.tier(), PriceTier::Stars25);
    }

    #[test]
    fn test_tier_switch_reweights_slots() {
        let mut m = machine(true);
        m.select_tier(PriceTier::Stars100).unwrap();
        assert_eq!(m.tier(), PriceTier::Stars100);
        let table = ChanceTable::for_tier(PriceTier::Stars100);
        for slot in m.display_order().prizes() {
            assert_eq!(slot.weight, table.weight(slot.prize.id));
        }
        assert_eq!(m.track().len(), 13 * TRACK_CYCLES);
    }

    #[test]
    fn test_demo_toggle_locked_while_spinning() {
        let mut m = machine(false);
        m.set_demo_mode(true);
        m.request_spin(0.0);
        assert!(m.set_demo_mode(false).is_empty());
        assert!(m.demo_mode());
    }
}
