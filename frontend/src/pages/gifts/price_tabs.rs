use roulette_shared::PriceTier;
use yew::prelude::*;

use crate::styles;

#[derive(Properties, PartialEq)]
pub struct PriceTabsProps {
    pub active: PriceTier,
    pub disabled: bool,
    pub on_select: Callback<PriceTier>,
}

#[function_component(PriceTabs)]
pub fn price_tabs(props: &PriceTabsProps) -> Html {
    html! {
        <div class={styles::TABS}>
            { for PriceTier::ALL.iter().map(|tier| {
                let tier = *tier;
                let on_select = props.on_select.clone();
                let class = if tier == props.active { styles::TAB_ACTIVE } else { styles::TAB };
                html! {
                    <button
                        key={tier.stars()}
                        {class}
                        disabled={props.disabled}
                        onclick={Callback::from(move |_| on_select.emit(tier))}
                    >
                        { format!("{} ⭐", tier.stars()) }
                    </button>
                }
            }) }
        </div>
    }
}
