use roulette_shared::spin::SpinResult;
use yew::prelude::*;

use crate::config::get_asset_url;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct ResultPanelProps {
    pub result: SpinResult,
    /// Set during the dismiss grace period so the overlay can fade out
    pub closing: bool,
    pub on_close: Callback<()>,
    pub on_play_for_real: Callback<()>,
}

#[function_component(ResultPanel)]
pub fn result_panel(props: &ResultPanelProps) -> Html {
    let result = &props.result;
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let on_play_for_real = {
        let on_play_for_real = props.on_play_for_real.clone();
        Callback::from(move |_| on_play_for_real.emit(()))
    };

    let headline = if result.was_demo { "Demo result" } else { "You won!" };
    let footnote = if result.was_demo {
        "This was a demo spin. Nothing was charged and no gift will be sent."
    } else {
        "The gift is on its way to your Telegram profile."
    };

    html! {
        <div class={if props.closing { styles::OVERLAY_CLOSING } else { styles::OVERLAY }}>
            <div class={styles::RESULT_CARD}>
                <h2 class={styles::TEXT_H2}>{ headline }</h2>
                <img class={styles::RESULT_ICON} src={get_asset_url(result.prize.icon)} alt={result.prize.label} />
                <p class={styles::TEXT_H3}>{ result.prize.label }</p>
                <p class={styles::TEXT_SMALL}>{ format!("Worth {} ⭐", result.prize.price) }</p>
                <p class={styles::TEXT_BODY}>{ footnote }</p>
                if result.was_demo {
                    <button class={styles::BUTTON_PRIMARY} onclick={on_play_for_real} disabled={props.closing}>
                        { "Play for real" }
                    </button>
                }
                <button class={styles::BUTTON_SECONDARY} onclick={on_close} disabled={props.closing}>
                    { "Close" }
                </button>
            </div>
        </div>
    }
}
