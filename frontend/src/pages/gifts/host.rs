use std::cell::RefCell;
use std::collections::HashMap;

use futures::future::LocalBoxFuture;
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use roulette_shared::driver::RouletteHost;
use roulette_shared::easing::CubicBezier;
use roulette_shared::effects::{Notice, NoticeSeverity, TimerKind, TimerToken};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::{Callback, NodeRef};

use crate::telegram;

/// Browser side of the roulette: animation frames, timeouts and the strip
/// element the track is drawn on.
pub struct GlooHost {
    strip: NodeRef,
    frame: RefCell<Option<AnimationFrame>>,
    // One live timer per kind is all the engine ever keeps
    timers: RefCell<HashMap<TimerKind, (TimerToken, Timeout)>>,
    on_notice: Callback<Notice>,
    on_change: Callback<()>,
}

impl GlooHost {
    pub fn new(strip: NodeRef, on_notice: Callback<Notice>, on_change: Callback<()>) -> Self {
        Self {
            strip,
            frame: RefCell::new(None),
            timers: RefCell::new(HashMap::new()),
            on_notice,
            on_change,
        }
    }

    fn strip_element(&self) -> Option<HtmlElement> {
        self.strip.get()?.dyn_into::<HtmlElement>().ok()
    }

    fn set_style(element: &HtmlElement, transition: &str, offset: f64) {
        let style = element.style();
        let _ = style.set_property("transition", transition);
        let _ = style.set_property("transform", &format!("translate3d({:.2}px, 0, 0)", -offset));
    }
}

impl RouletteHost for GlooHost {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|window| window.performance())
            .map(|performance| performance.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        *self.frame.borrow_mut() = Some(request_animation_frame(move |timestamp| callback(timestamp)));
    }

    fn cancel_frame(&self) {
        self.frame.borrow_mut().take();
    }

    fn schedule_timer(&self, token: TimerToken, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        let timeout = Timeout::new(delay_ms, move || callback());
        self.timers.borrow_mut().insert(token.kind, (token, timeout));
    }

    fn cancel_timer(&self, token: TimerToken) {
        let mut timers = self.timers.borrow_mut();
        if timers.get(&token.kind).is_some_and(|(live, _)| *live == token) {
            if let Some((_, timeout)) = timers.remove(&token.kind) {
                timeout.cancel();
            }
        }
    }

    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(future);
    }

    fn render_offset(&self, offset: f64) {
        if let Some(element) = self.strip_element() {
            Self::set_style(&element, "none", offset);
        }
    }

    fn start_transition(&self, from: f64, to: f64, duration_ms: u32, easing: CubicBezier) {
        let Some(element) = self.strip_element() else {
            return;
        };
        Self::set_style(&element, "none", from);
        // Flush layout so the browser animates from `from` instead of the last drawn offset
        let _ = element.offset_width();
        Self::set_style(&element, &format!("transform {}ms {}", duration_ms, easing.css()), to);
    }

    fn notify(&self, notice: &Notice) {
        log::warn!("Roulette notice: {}", notice.error);
        if notice.severity == NoticeSeverity::Blocking {
            telegram::show_alert(notice.message());
        }
        self.on_notice.emit(notice.clone());
    }

    fn haptic(&self) {
        telegram::haptic_success();
    }

    fn state_changed(&self) {
        self.on_change.emit(());
    }
}
