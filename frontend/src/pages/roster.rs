use yew::prelude::*;

use crate::format::{format_currency, format_due_date};
use crate::models::AccountSummary;
use crate::state::RosterView;
use crate::ui::icon_search;

#[derive(Properties, PartialEq)]
pub struct RosterTableProps {
    pub roster: RosterView,
    pub on_query: Callback<String>,
    pub on_open: Callback<AccountSummary>,
}

#[function_component(RosterTable)]
pub fn roster_table(props: &RosterTableProps) -> Html {
    let visible = props.roster.visible();

    let on_input = {
        let on_query = props.on_query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                on_query.emit(input.value());
            }
        })
    };

    html! {
        <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
            <div class="p-6 flex justify-between items-center border-b border-border">
                <h3 class="font-bold text-foreground text-lg">{"Accounts"}</h3>
                <div class="flex items-center gap-2 border rounded px-2">
                    { icon_search() }
                    <input
                        type="text"
                        placeholder="Search Payments"
                        value={props.roster.query.clone()}
                        oninput={on_input}
                        class="p-2 outline-none"
                    />
                </div>
            </div>
            {
                if visible.is_empty() {
                    html! { <p class="p-6 text-sm text-muted-foreground">{"No ongoing schedules found."}</p> }
                } else {
                    html! {
                        <div class="overflow-x-auto max-h-[410px] overflow-y-auto">
                            <table class="w-full text-left border-collapse">
                                <thead>
                                    <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest sticky top-0">
                                        <th class="px-8 py-4 font-bold">{"Account Number"}</th>
                                        <th class="px-8 py-4 font-bold">{"Account Holder"}</th>
                                        <th class="px-8 py-4 font-bold">{"Next Due Date"}</th>
                                        <th class="px-8 py-4 font-bold text-right">{"Balance"}</th>
                                    </tr>
                                </thead>
                                <tbody class="divide-y divide-border">
                                    { for visible.into_iter().map(|summary| {
                                        let on_open = props.on_open.clone();
                                        let selected = summary.clone();
                                        let holder = if summary.account_holder.is_empty() {
                                            "N/A".to_string()
                                        } else {
                                            summary.account_holder.clone()
                                        };
                                        html! {
                                            <tr
                                                key={summary.account_number.clone()}
                                                class="text-sm hover:bg-muted/30 transition-colors cursor-pointer"
                                                onclick={Callback::from(move |_| on_open.emit(selected.clone()))}
                                            >
                                                <td class="px-8 py-4 text-[#1D617A] font-semibold">{ &summary.account_number }</td>
                                                <td class="px-8 py-4 text-foreground">{ holder }</td>
                                                <td class="px-8 py-4 text-muted-foreground">{ format_due_date(summary.next_due_date) }</td>
                                                <td class="px-8 py-4 text-right font-semibold text-foreground">{ format_currency(summary.total_balance) }</td>
                                            </tr>
                                        }
                                    }) }
                                </tbody>
                            </table>
                        </div>
                    }
                }
            }
        </div>
    }
}
