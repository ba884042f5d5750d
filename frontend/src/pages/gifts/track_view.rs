use roulette_shared::catalog::RoulettePrize;
use yew::prelude::*;

use crate::config::get_asset_url;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct TrackViewProps {
    pub items: Vec<RoulettePrize>,
    pub card_width: f64,
    pub gap: f64,
    /// The host moves this element directly; nothing here sets its style.
    pub strip_ref: NodeRef,
    pub container_ref: NodeRef,
}

#[function_component(TrackView)]
pub fn track_view(props: &TrackViewProps) -> Html {
    let card_style = format!("width: {}px; margin-right: {}px;", props.card_width, props.gap);

    html! {
        <div ref={props.container_ref.clone()} class={styles::TRACK_VIEWPORT}>
            <div class={styles::TRACK_POINTER}></div>
            <div ref={props.strip_ref.clone()} class={styles::TRACK_STRIP}>
                { for props.items.iter().enumerate().map(|(slot, item)| html! {
                    <div key={slot} class={styles::PRIZE_CARD} style={card_style.clone()}>
                        <img class={styles::PRIZE_ICON} src={get_asset_url(item.prize.icon)} alt={item.prize.label} />
                        <span class={styles::PRIZE_LABEL}>{ item.prize.label }</span>
                        <span class={styles::PRIZE_PRICE}>{ format!("{} ⭐", item.prize.price) }</span>
                    </div>
                }) }
            </div>
        </div>
    }
}
