//! Runs a [`SpinStateMachine`] against a concrete host.
//!
//! The driver owns the machine, both gateways and the host. It feeds user
//! input and completions into the machine and turns the returned effects into
//! host calls. Every callback handed to the host holds only a weak reference,
//! so nothing fires into a dropped engine, and the machine itself ignores
//! input once disposed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::catalog::{PriceTier, RoulettePrize};
use crate::easing::CubicBezier;
use crate::effects::{Effect, Notice, Ticket, TimerToken};
use crate::error::RouletteError;
use crate::gateway::{GiftDeliveryService, PaymentGateway, PaymentOutcome};
use crate::spin::{EngineConfig, SpinResult, SpinState, SpinStateMachine};
use crate::track::CardSize;

/// Scheduling and presentation primitives the engine needs from its host.
pub trait RouletteHost {
    /// Milliseconds on the same clock as animation frame timestamps.
    fn now(&self) -> f64;

    /// Runs `callback` with the frame timestamp on the next animation frame.
    /// A new request replaces any pending one.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>);
    fn cancel_frame(&self);

    fn schedule_timer(&self, token: TimerToken, delay_ms: u32, callback: Box<dyn FnOnce()>);
    fn cancel_timer(&self, token: TimerToken);

    fn spawn(&self, future: LocalBoxFuture<'static, ()>);

    fn render_offset(&self, offset: f64);
    fn start_transition(&self, from: f64, to: f64, duration_ms: u32, easing: CubicBezier);
    fn notify(&self, notice: &Notice);
    fn haptic(&self);
    fn state_changed(&self);
}

/// What the UI needs to draw one frame of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct RouletteSnapshot {
    pub state: SpinState,
    pub demo_mode: bool,
    pub payment_available: bool,
    pub tier: PriceTier,
    pub track: Vec<RoulettePrize>,
    pub prize_table: Vec<RoulettePrize>,
    pub result: Option<SpinResult>,
    pub offset: f64,
}

struct Shared<P, D, H> {
    machine: RefCell<SpinStateMachine>,
    payments: P,
    delivery: D,
    host: H,
}

pub struct RouletteDriver<P, D, H> {
    shared: Rc<Shared<P, D, H>>,
}

impl<P, D, H> Clone for RouletteDriver<P, D, H> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<P, D, H> RouletteDriver<P, D, H>
where
    P: PaymentGateway + 'static,
    D: GiftDeliveryService + 'static,
    H: RouletteHost + 'static,
{
    pub fn new(config: EngineConfig, payments: P, delivery: D, host: H) -> Self {
        let machine = SpinStateMachine::new(config, payments.is_available());
        Self::with_machine(machine, payments, delivery, host)
    }

    pub fn with_machine(mut machine: SpinStateMachine, payments: P, delivery: D, host: H) -> Self {
        machine.set_payment_available(payments.is_available());
        Self {
            shared: Rc::new(Shared {
                machine: RefCell::new(machine),
                payments,
                delivery,
                host,
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.shared.host
    }

    /// Read access to the machine. Do not call back into the driver from `f`.
    pub fn with_machine_ref<R>(&self, f: impl FnOnce(&SpinStateMachine) -> R) -> R {
        f(&*self.shared.machine.borrow())
    }

    pub fn snapshot(&self) -> RouletteSnapshot {
        let machine = self.shared.machine.borrow();
        RouletteSnapshot {
            state: machine.state(),
            demo_mode: machine.demo_mode(),
            payment_available: machine.payment_available(),
            tier: machine.tier(),
            track: machine.track().items().to_vec(),
            prize_table: machine.prize_table(),
            result: machine.result().cloned(),
            offset: machine.motion().sample(self.shared.host.now()),
        }
    }

    fn downgrade(&self) -> Weak<Shared<P, D, H>> {
        Rc::downgrade(&self.shared)
    }

    fn upgrade(weak: &Weak<Shared<P, D, H>>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    // The machine borrow always ends before effects reach the host, so host
    // callbacks are free to call back into the driver.
    fn dispatch(&self, f: impl FnOnce(&mut SpinStateMachine, f64) -> Vec<Effect>) {
        let now = self.shared.host.now();
        let effects = {
            let mut machine = self.shared.machine.borrow_mut();
            f(&mut *machine, now)
        };
        self.apply(effects);
    }

    fn apply(&self, effects: Vec<Effect>) {
        let host = &self.shared.host;
        for effect in effects {
            match effect {
                Effect::RequestFrame => {
                    let weak = self.downgrade();
                    host.request_frame(Box::new(move |timestamp| {
                        if let Some(driver) = Self::upgrade(&weak) {
                            driver.dispatch(|machine, _| machine.on_frame(timestamp));
                        }
                    }));
                }
                Effect::CancelFrame => host.cancel_frame(),
                Effect::RenderOffset(offset) => host.render_offset(offset),
                Effect::StartTransition { from, to, duration_ms, easing } => {
                    host.start_transition(from, to, duration_ms, easing)
                }
                Effect::ScheduleTimer { token, delay_ms } => {
                    let weak = self.downgrade();
                    host.schedule_timer(
                        token,
                        delay_ms,
                        Box::new(move || {
                            if let Some(driver) = Self::upgrade(&weak) {
                                driver.dispatch(|machine, _| machine.on_timer(token));
                            }
                        }),
                    );
                }
                Effect::CancelTimer(token) => host.cancel_timer(token),
                Effect::RequestPayment { ticket, tier } => {
                    let payment = self.shared.payments.request_payment(tier);
                    host.spawn(self.resume_payment(ticket, payment));
                }
                Effect::RecordWin { ticket, prize, tier } => {
                    let delivery = self.shared.delivery.record_win(prize.id, tier);
                    host.spawn(self.resume_delivery(ticket, delivery));
                }
                Effect::Notify(notice) => host.notify(&notice),
                Effect::Haptic => host.haptic(),
                Effect::StateChanged => host.state_changed(),
            }
        }
    }

    fn resume_payment(
        &self,
        ticket: Ticket,
        payment: LocalBoxFuture<'static, Result<PaymentOutcome, RouletteError>>,
    ) -> LocalBoxFuture<'static, ()> {
        let weak = self.downgrade();
        async move {
            let outcome = payment.await;
            if let Some(driver) = Self::upgrade(&weak) {
                driver.dispatch(|machine, now| machine.on_payment_outcome(ticket, outcome, now));
            }
        }
        .boxed_local()
    }

    fn resume_delivery(
        &self,
        ticket: Ticket,
        delivery: LocalBoxFuture<'static, Result<(), RouletteError>>,
    ) -> LocalBoxFuture<'static, ()> {
        let weak = self.downgrade();
        async move {
            let outcome = delivery.await;
            if let Some(driver) = Self::upgrade(&weak) {
                driver.dispatch(|machine, _| machine.on_delivery_outcome(ticket, outcome));
            }
        }
        .boxed_local()
    }

    /// First render plus ambient scrolling. Call once the track is mounted.
    pub fn start(&self) {
        self.dispatch(|machine, _| machine.activate());
    }

    pub fn request_spin(&self) {
        self.dispatch(|machine, now| machine.request_spin(now));
    }

    pub fn dismiss(&self) {
        self.dispatch(|machine, _| machine.dismiss());
    }

    pub fn disable_demo_and_dismiss(&self) {
        self.dispatch(|machine, _| machine.disable_demo_and_dismiss());
    }

    pub fn set_demo_mode(&self, enabled: bool) {
        self.dispatch(|machine, _| machine.set_demo_mode(enabled));
    }

    pub fn select_tier(&self, tier: PriceTier) -> Result<(), RouletteError> {
        let effects = self.shared.machine.borrow_mut().select_tier(tier)?;
        self.apply(effects);
        Ok(())
    }

    pub fn set_card_size(&self, size: CardSize) -> Result<(), RouletteError> {
        let effects = self.shared.machine.borrow_mut().set_card_size(size)?;
        self.apply(effects);
        Ok(())
    }

    pub fn set_container_width(&self, width: f64) {
        self.shared.machine.borrow_mut().set_container_width(width);
    }

    pub fn set_visibility(&self, visible: bool) {
        self.dispatch(|machine, _| machine.set_visibility(visible));
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.dispatch(|machine, _| machine.set_reduced_motion(reduced));
    }

    /// Idempotent. After this no host callback reaches the machine.
    pub fn dispose(&self) {
        self.dispatch(|machine, _| machine.dispose());
    }
}
