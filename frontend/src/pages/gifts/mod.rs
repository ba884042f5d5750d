mod host;
mod price_tabs;
mod prize_grid;
mod result_panel;
mod track_view;

use gloo::utils::{document, window};
use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use roulette_shared::driver::{RouletteDriver, RouletteSnapshot};
use roulette_shared::effects::{Notice, NoticeSeverity};
use roulette_shared::spin::{EngineConfig, SpinState};
use roulette_shared::track::{CardSize, TrackGeometry};
use roulette_shared::PriceTier;
use web_sys::{HtmlInputElement, MediaQueryList};
use yew::prelude::*;

use crate::gateways::{TelegramGiftDelivery, TelegramPayments};
use crate::styles;
use crate::telegram;
use host::GlooHost;
use price_tabs::PriceTabs;
use prize_grid::PrizeGrid;
use result_panel::ResultPanel;
use track_view::TrackView;

type PageDriver = RouletteDriver<TelegramPayments, TelegramGiftDelivery, GlooHost>;

const COMPACT_VIEWPORT_WIDTH: f64 = 400.0;
const NOTICE_TIMEOUT_MS: u32 = 4000;
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn viewport_card_size() -> CardSize {
    let width = window().inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(COMPACT_VIEWPORT_WIDTH);
    if width < COMPACT_VIEWPORT_WIDTH {
        CardSize::Compact
    } else {
        CardSize::Regular
    }
}

fn engine_config() -> EngineConfig {
    EngineConfig {
        platform: telegram::platform(),
        geometry: TrackGeometry::for_card_size(viewport_card_size()),
        ..EngineConfig::default()
    }
}

fn reduced_motion_query() -> Option<MediaQueryList> {
    window().match_media(REDUCED_MOTION_QUERY).ok().flatten()
}

fn measure(container: &NodeRef) -> Option<f64> {
    let width = container.cast::<web_sys::Element>()?.client_width();
    (width > 0).then_some(width as f64)
}

fn spin_label(snapshot: &RouletteSnapshot) -> String {
    match snapshot.state {
        SpinState::AwaitingPayment => "Waiting for payment…".to_string(),
        SpinState::Spinning => "Spinning…".to_string(),
        _ if snapshot.demo_mode => "Try for free".to_string(),
        _ => format!("Spin for {} ⭐", snapshot.tier.stars()),
    }
}

#[function_component(GiftsPage)]
pub fn gifts_page() -> Html {
    let strip_ref = use_node_ref();
    let container_ref = use_node_ref();
    let notice = use_state(|| None::<Notice>);
    let trigger = use_force_update();

    let driver = {
        let strip_ref = strip_ref.clone();
        let set_notice = notice.setter();
        let trigger = trigger.clone();
        use_memo((), move |_| {
            let host = GlooHost::new(
                strip_ref,
                Callback::from(move |notice| set_notice.set(Some(notice))),
                Callback::from(move |_| trigger.force_update()),
            );
            PageDriver::new(engine_config(), TelegramPayments, TelegramGiftDelivery, host)
        })
    };

    // Start the ambient scroll and wire page-level signals into the engine
    {
        let driver = (*driver).clone();
        let container_ref = container_ref.clone();
        use_effect_with((), move |_| {
            driver.start();
            if let Some(width) = measure(&container_ref) {
                driver.set_container_width(width);
            }

            let reduced_motion = reduced_motion_query();
            if let Some(query) = &reduced_motion {
                driver.set_reduced_motion(query.matches());
            }

            let mut listeners = Vec::new();
            {
                let driver = driver.clone();
                listeners.push(EventListener::new(&document(), "visibilitychange", move |_| {
                    driver.set_visibility(!document().hidden());
                }));
            }
            {
                let driver = driver.clone();
                let container_ref = container_ref.clone();
                listeners.push(EventListener::new(&window(), "resize", move |_| {
                    if let Some(width) = measure(&container_ref) {
                        driver.set_container_width(width);
                    }
                    // A spin in flight keeps its card size; the next resize catches up
                    if let Err(e) = driver.set_card_size(viewport_card_size()) {
                        log::debug!("Card size change deferred: {}", e);
                    }
                }));
            }
            if let Some(query) = reduced_motion {
                let driver = driver.clone();
                let target = query.clone();
                listeners.push(EventListener::new(&target, "change", move |_| {
                    driver.set_reduced_motion(query.matches());
                }));
            }

            move || {
                drop(listeners);
                driver.dispose();
            }
        });
    }

    // Non-blocking notices fade on their own
    {
        let notice = notice.clone();
        use_effect_with((*notice).clone(), move |current| {
            let timeout = current
                .as_ref()
                .filter(|n| n.severity == NoticeSeverity::NonBlocking)
                .map(|_| Timeout::new(NOTICE_TIMEOUT_MS, move || notice.set(None)));
            move || drop(timeout)
        });
    }

    let snapshot = driver.snapshot();
    let geometry = driver.with_machine_ref(|machine| machine.config().geometry);
    let busy = snapshot.state.is_busy();

    let on_spin = {
        let driver = driver.clone();
        Callback::from(move |_: MouseEvent| driver.request_spin())
    };

    let on_select_tier = {
        let driver = driver.clone();
        Callback::from(move |tier: PriceTier| {
            if let Err(e) = driver.select_tier(tier) {
                log::warn!("Tier switch to {} ignored: {}", tier.stars(), e);
            }
        })
    };

    let on_toggle_demo = {
        let driver = driver.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            driver.set_demo_mode(input.checked());
        })
    };

    let on_close_result = {
        let driver = driver.clone();
        Callback::from(move |_| driver.dismiss())
    };

    let on_play_for_real = {
        let driver = driver.clone();
        Callback::from(move |_| driver.disable_demo_and_dismiss())
    };

    let on_close_notice = {
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| notice.set(None))
    };

    html! {
        <div class={styles::CONTAINER}>
            <div class={styles::CONTAINER_SM}>
                <h2 class={styles::TEXT_H2}>{ "Gift Roulette" }</h2>

                if let Some(current) = (*notice).clone() {
                    <div class={styles::CARD_ERROR} onclick={on_close_notice}>
                        { current.message() }
                    </div>
                }

                <PriceTabs active={snapshot.tier} disabled={busy} on_select={on_select_tier} />

                <TrackView
                    items={snapshot.track.clone()}
                    card_width={geometry.card_width}
                    gap={geometry.gap}
                    strip_ref={strip_ref.clone()}
                    container_ref={container_ref.clone()}
                />

                <button class={styles::BUTTON_PRIMARY} onclick={on_spin} disabled={snapshot.state != SpinState::Idle}>
                    { spin_label(&snapshot) }
                </button>

                <label class="flex items-center justify-between">
                    <span class={styles::TEXT_LABEL}>{ "Demo mode" }</span>
                    <input
                        type="checkbox"
                        checked={snapshot.demo_mode}
                        disabled={busy}
                        onchange={on_toggle_demo}
                    />
                </label>

                if !snapshot.payment_available && !snapshot.demo_mode {
                    <p class={styles::TEXT_SMALL}>
                        { "Paid spins need a Telegram version with Stars payments. Demo spins work everywhere." }
                    </p>
                }

                <PrizeGrid prizes={snapshot.prize_table.clone()} />
            </div>

            if let Some(result) = snapshot.result.clone() {
                <ResultPanel
                    {result}
                    closing={snapshot.state == SpinState::Dismissing}
                    on_close={on_close_result}
                    {on_play_for_real}
                />
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: SpinState, demo_mode: bool) -> RouletteSnapshot {
        RouletteSnapshot {
            state,
            demo_mode,
            payment_available: true,
            tier: PriceTier::Stars50,
            track: Vec::new(),
            prize_table: Vec::new(),
            result: None,
            offset: 0.0,
        }
    }

    #[test]
    fn test_spin_label_follows_state() {
        assert_eq!(spin_label(&snapshot(SpinState::Idle, false)), "Spin for 50 ⭐");
        assert_eq!(spin_label(&snapshot(SpinState::Idle, true)), "Try for free");
        assert_eq!(spin_label(&snapshot(SpinState::AwaitingPayment, false)), "Waiting for payment…");
        assert_eq!(spin_label(&snapshot(SpinState::Spinning, true)), "Spinning…");
    }
}
