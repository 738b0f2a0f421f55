use yew::prelude::*;

use crate::config::{self, AppSettings, Capabilities};
use crate::ui::page_shell;

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let settings = use_context::<UseStateHandle<AppSettings>>();
    let current = settings
        .as_ref()
        .map(|s| s.capabilities)
        .unwrap_or_default();

    let toggle = |update: fn(&mut Capabilities)| {
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(settings) = settings.as_ref() {
                let mut next = (**settings).clone();
                update(&mut next.capabilities);
                config::save_settings(&next);
                log::info!("capabilities changed: {:?}", next.capabilities);
                settings.set(next);
            }
        })
    };

    html! {
        { page_shell(
            "Settings",
            html! {},
            html! {
                <div class="bg-card rounded-lg p-6 border border-border max-w-xl">
                    <h2 class="text-xl font-bold text-foreground mb-6">{"Payment Schedule Tools"}</h2>
                    <div class="space-y-4">
                        <div class="flex items-start gap-3 pb-4 border-b border-border">
                            <div class="flex-1 pt-1">
                                <p class="font-medium text-foreground">{"Breakdown Editing"}</p>
                                <p class="text-sm text-muted-foreground">{"Allow re-spreading the remaining balance over a new principal amount"}</p>
                            </div>
                            <input
                                type="checkbox"
                                checked={current.breakdown_editing}
                                onclick={toggle(|c| c.breakdown_editing = !c.breakdown_editing)}
                            />
                        </div>
                        <div class="flex items-start gap-3">
                            <div class="flex-1 pt-1">
                                <p class="font-medium text-foreground">{"Receipt Printing"}</p>
                                <p class="text-sm text-muted-foreground">{"Show a Receipt button on paid installments"}</p>
                            </div>
                            <input
                                type="checkbox"
                                checked={current.receipt_printing}
                                onclick={toggle(|c| c.receipt_printing = !c.receipt_printing)}
                            />
                        </div>
                    </div>
                    <p class="text-xs text-muted-foreground mt-6">{ format!("Server: {}", config::api_base_url()) }</p>
                </div>
            }
        ) }
    }
}
