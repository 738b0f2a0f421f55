use yew::prelude::*;

mod api;
mod config;
mod error;
mod format;
mod ledger;
mod models;
mod pages;
mod receipt;
mod state;
mod ui;

use config::{load_settings, AppSettings};
use pages::{PaymentSchedulePage, SettingsPage};
use ui::{Layout, Page};

#[function_component(App)]
fn app() -> Html {
    let active_page = use_state(|| Page::Schedules);
    let settings = use_state(load_settings);
    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    let content = match *active_page {
        Page::Schedules => html! { <PaymentSchedulePage /> },
        Page::Settings => html! { <SettingsPage /> },
    };

    html! {
        <ContextProvider<UseStateHandle<AppSettings>> context={settings}>
            <Layout active_page={*active_page} on_select={on_select}>
                { content }
            </Layout>
        </ContextProvider<UseStateHandle<AppSettings>>>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("payment schedule admin starting against {}", config::api_base_url());
    yew::Renderer::<App>::new().render();
}
