use roulette_shared::catalog::RoulettePrize;
use yew::prelude::*;

use crate::config::get_asset_url;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct PrizeGridProps {
    pub prizes: Vec<RoulettePrize>,
}

/// Every prize of the active tier with its published chance.
#[function_component(PrizeGrid)]
pub fn prize_grid(props: &PrizeGridProps) -> Html {
    html! {
        <div class={styles::CARD}>
            <h3 class={styles::TEXT_H3}>{ "Possible prizes" }</h3>
            <div class={classes!(styles::GRID, "mt-3")}>
                { for props.prizes.iter().map(|item| html! {
                    <div key={item.prize.id.as_str()} class={styles::GRID_ITEM}>
                        <img class={styles::GRID_ICON} src={get_asset_url(item.prize.icon)} alt={item.prize.label} />
                        <span class={styles::TEXT_LABEL}>{ item.prize.label }</span>
                        <span class={styles::TEXT_SMALL}>{ item.chance_label }</span>
                    </div>
                }) }
            </div>
        </div>
    }
}
