pub mod config;
pub mod gateways;
pub mod pages;
pub mod styles;
pub mod telegram;

use yew::prelude::*;
use yew_router::prelude::*;
use crate::pages::gifts::GiftsPage;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
   #[at("/")] Gifts,
   #[not_found]
   #[at("/404")] NotFound,
}

fn switch(route: Route) -> Html {
    match route {
        Route::Gifts => html! { <GiftsPage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Gifts} /> },
    }
}

#[function_component(App)]
pub fn app() -> Html {
    use_effect_with((), |_| {
        telegram::ready();
        || ()
    });

    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}
