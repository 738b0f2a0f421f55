use yew::prelude::*;

use crate::config::Capabilities;
use crate::format::{format_currency, format_due_date};
use crate::ledger;
use crate::models::{Installment, LoanType};
use crate::state::{Activity, BreakdownDraft, DetailView, PayMode, PaymentDraft, Section};
use crate::ui::{error_banner, icon_arrow_left, icon_receipt, StatCard};

/// What the admin asked the detail view to do.
#[derive(Clone, Debug, PartialEq)]
pub enum DetailIntent {
    Back,
    SwitchLoanType(LoanType),
    Reload,
    OpenPayment(i64),
    PaymentInput(String),
    ClosePayment,
    Pay(PayMode),
    OpenBreakdown,
    BreakdownInput(String),
    CloseBreakdown,
    SaveBreakdown,
    Revert,
    Retry,
    DismissNotice,
    PrintReceipt(i64),
}

#[derive(Properties, PartialEq)]
pub struct ScheduleDetailProps {
    pub detail: DetailView,
    pub capabilities: Capabilities,
    pub on_intent: Callback<DetailIntent>,
}

#[function_component(ScheduleDetail)]
pub fn schedule_detail(props: &ScheduleDetailProps) -> Html {
    let detail = &props.detail;
    let on_intent = &props.on_intent;
    let busy = detail.activity.is_submitting();

    let holder = match &detail.member {
        Section::Loading => "Loading...".to_string(),
        Section::Loaded(_) => detail.holder_name().unwrap_or_else(|| "N/A".to_string()),
        Section::Failed(message) => message.clone(),
        Section::Skipped => "N/A".to_string(),
    };
    let loan_caption = match &detail.loan {
        Section::Loading => Some("Loading...".to_string()),
        Section::Loaded(Some(_)) => None,
        Section::Loaded(None) => Some(format!("No {} loan on file", detail.loan_type.as_str())),
        Section::Failed(message) => Some(message.clone()),
        Section::Skipped => Some("Not loaded".to_string()),
    };
    let loan_balance = detail
        .loan
        .loaded()
        .and_then(|loan| loan.as_ref())
        .map(|loan| loan.outstanding_balance);

    html! {
        <>
            <div class="flex flex-wrap items-center gap-3">
                <button disabled={busy} onclick={on_intent.reform(|_| DetailIntent::Back)} class="flex items-center gap-2 px-4 py-2 rounded-xl border border-border text-sm font-bold">
                    { icon_arrow_left() }
                    {"Back"}
                </button>
                { for LoanType::ALL.iter().map(|loan_type| {
                    let loan_type = *loan_type;
                    let class_name = if loan_type == detail.loan_type {
                        "px-4 py-2 text-sm font-bold text-green-600 underline"
                    } else {
                        "px-4 py-2 text-sm font-medium text-foreground"
                    };
                    html! {
                        <button class={class_name} disabled={busy} onclick={on_intent.reform(move |_| DetailIntent::SwitchLoanType(loan_type))}>
                            { loan_type.tab_label() }
                        </button>
                    }
                }) }
                if props.capabilities.breakdown_editing {
                    { breakdown_controls(detail, on_intent) }
                }
            </div>

            if let Some(notice) = &detail.notice {
                {
                    error_banner(
                        &notice.message,
                        notice.retry.as_ref().map(|_| on_intent.reform(|_| DetailIntent::Retry)),
                        Some(on_intent.reform(|_| DetailIntent::DismissNotice)),
                    )
                }
            }

            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
                    <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{"Payment History For"}</p>
                    <h3 class="text-lg font-bold text-foreground">{ holder }</h3>
                    <p class="text-sm text-muted-foreground">{ format!("Account Number: {}", detail.account_number) }</p>
                </div>
                <StatCard title="Remaining Balance" amount={Some(detail.remaining_balance)} />
                <StatCard title="Loan Outstanding Balance" amount={loan_balance} caption={loan_caption} />
            </div>

            if props.capabilities.breakdown_editing {
                <p class="text-sm text-muted-foreground">
                    {
                        match detail.projected_term {
                            Some(term) => format!("Updated loan term: {} installments", term),
                            None => "Updated loan term: not updated yet".to_string(),
                        }
                    }
                </p>
            }

            { schedule_table(detail, props.capabilities, on_intent) }

            {
                match payment_draft(&detail.activity) {
                    Some(draft) => payment_modal(detail, draft, busy, on_intent),
                    None => html! {},
                }
            }
        </>
    }
}

fn schedule_table(detail: &DetailView, capabilities: Capabilities, on_intent: &Callback<DetailIntent>) -> Html {
    let rows = match &detail.schedules {
        Section::Loading => {
            return html! { <p class="text-sm text-muted-foreground">{"Loading..."}</p> };
        }
        Section::Failed(message) => {
            return error_banner(message, Some(on_intent.reform(|_| DetailIntent::Reload)), None);
        }
        Section::Skipped => return html! {},
        Section::Loaded(rows) => rows,
    };
    if rows.is_empty() {
        return html! {
            <p class="text-sm text-muted-foreground">{"No payment schedules found for this account."}</p>
        };
    }
    let busy = detail.activity.is_submitting();

    html! {
        <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
            <div class="overflow-x-auto max-h-[365px] overflow-y-auto">
                <table class="w-full text-center border-collapse">
                    <thead>
                        <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest sticky top-0">
                            <th class="px-4 py-4 font-bold">{"Principal Amount"}</th>
                            <th class="px-4 py-4 font-bold">{"Payment Amount"}</th>
                            <th class="px-4 py-4 font-bold">{"Advance Payment"}</th>
                            <th class="px-4 py-4 font-bold">{"Previous Balance"}</th>
                            <th class="px-4 py-4 font-bold">{"Penalty"}</th>
                            <th class="px-4 py-4 font-bold">{"Due Date"}</th>
                            <th class="px-4 py-4 font-bold">{"Received Amount"}</th>
                            <th class="px-4 py-4 font-bold">{"Balance"}</th>
                            <th class="px-4 py-4 font-bold">{"Status"}</th>
                            <th class="px-4 py-4 font-bold">{"Action"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        { for rows.iter().map(|row| schedule_row(rows, row, busy, capabilities, on_intent)) }
                    </tbody>
                </table>
            </div>
        </div>
    }
}

fn schedule_row(
    rows: &[Installment],
    row: &Installment,
    busy: bool,
    capabilities: Capabilities,
    on_intent: &Callback<DetailIntent>,
) -> Html {
    let id = row.id;
    let payable = ledger::is_payable(rows, row);
    let (status, status_class) = if row.is_paid {
        ("Paid!", "px-4 py-3 font-bold text-green-600")
    } else {
        ("Ongoing", "px-4 py-3 font-bold text-red-600")
    };

    html! {
        <tr key={id.to_string()} class="text-sm hover:bg-muted/30 transition-colors">
            <td class="px-4 py-3">{ format_currency(row.principal_amount) }</td>
            <td class="px-4 py-3">{ format_currency(row.payment_amount) }</td>
            <td class="px-4 py-3">{ format_currency(row.advance_pay) }</td>
            <td class="px-4 py-3">{ format_currency(row.under_pay) }</td>
            <td class="px-4 py-3">{ format_currency(row.penalty) }</td>
            <td class="px-4 py-3 text-muted-foreground">{ format_due_date(row.due_date) }</td>
            <td class="px-4 py-3">{ format_currency(row.received_amnt) }</td>
            <td class="px-4 py-3">{ format_currency(row.balance) }</td>
            <td class={status_class}>{ status }</td>
            <td class="px-4 py-3">
                if !row.is_paid {
                    <button
                        class={if payable { "bg-amber-400 text-black px-3 py-1 rounded text-xs font-bold" } else { "bg-amber-200 text-slate-500 px-3 py-1 rounded text-xs font-bold cursor-not-allowed" }}
                        disabled={!payable || busy}
                        title={if payable { "" } else { "Earlier installments must be paid first" }}
                        onclick={on_intent.reform(move |_| DetailIntent::OpenPayment(id))}
                    >
                        {"Pay"}
                    </button>
                }
                if row.is_paid && capabilities.receipt_printing {
                    <button
                        class="flex items-center gap-1 mx-auto text-xs font-bold hover:text-amber-600"
                        onclick={on_intent.reform(move |_| DetailIntent::PrintReceipt(id))}
                    >
                        { icon_receipt() }
                        {"Receipt"}
                    </button>
                }
            </td>
        </tr>
    }
}

fn breakdown_controls(detail: &DetailView, on_intent: &Callback<DetailIntent>) -> Html {
    let busy = detail.activity.is_submitting();
    let draft = match breakdown_draft(&detail.activity) {
        Some(draft) => draft,
        None => {
            return html! {
                <button disabled={busy} onclick={on_intent.reform(|_| DetailIntent::OpenBreakdown)} class="ml-4 bg-primary text-primary-foreground px-4 py-2 rounded-xl text-sm font-bold">
                    {"Edit Breakdown"}
                </button>
            };
        }
    };

    let on_input = {
        let on_intent = on_intent.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                on_intent.emit(DetailIntent::BreakdownInput(input.value()));
            }
        })
    };

    html! {
        <div class="flex flex-wrap items-center gap-2 ml-4">
            <input
                type="number"
                placeholder="Principal Amount"
                value={draft.input.clone()}
                oninput={on_input}
                class="p-2 border rounded max-w-[200px]"
            />
            <button disabled={busy} onclick={on_intent.reform(|_| DetailIntent::SaveBreakdown)} class="bg-primary text-primary-foreground px-4 py-2 rounded-xl text-sm font-bold">
                { if busy { "Saving..." } else { "Save" } }
            </button>
            <button disabled={busy} onclick={on_intent.reform(|_| DetailIntent::Revert)} class="px-4 py-2 rounded-xl border border-border text-sm font-bold">
                {"Revert to Original"}
            </button>
            <button disabled={busy} onclick={on_intent.reform(|_| DetailIntent::CloseBreakdown)} class="px-4 py-2 rounded-xl text-sm">
                {"Cancel"}
            </button>
            if let Some(msg) = &draft.error {
                <p class="w-full text-sm text-red-500">{ msg.clone() }</p>
            }
        </div>
    }
}

fn payment_modal(detail: &DetailView, draft: &PaymentDraft, busy: bool, on_intent: &Callback<DetailIntent>) -> Html {
    let installment = detail.installment(draft.installment_id);
    let on_input = {
        let on_intent = on_intent.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                on_intent.emit(DetailIntent::PaymentInput(input.value()));
            }
        })
    };

    html! {
        <div class="fixed inset-0 bg-black/30 flex items-center justify-center z-50">
            <div class="bg-card rounded-[10px] p-6 w-[320px] shadow-lg space-y-4 text-center">
                <h3 class="font-bold text-foreground text-lg">{"Amount Payable"}</h3>
                <p class="text-sm">{ format!("Payment Amount: {}", format_currency(draft.suggested)) }</p>
                if let Some(installment) = installment {
                    <p class="text-xs text-muted-foreground">{ format!("Due {}", format_due_date(installment.due_date)) }</p>
                }
                <button
                    disabled={busy}
                    onclick={on_intent.reform(|_| DetailIntent::Pay(PayMode::Exact))}
                    class="w-full bg-green-600 text-white py-2 rounded font-bold"
                >
                    {"Exact Amount"}
                </button>
                <input
                    type="number"
                    placeholder="Enter Payment Amount"
                    value={draft.input.clone()}
                    oninput={on_input}
                    class="w-full p-2 border rounded"
                />
                if let Some(msg) = &draft.error {
                    <p class="text-sm text-red-500">{ msg.clone() }</p>
                }
                <div class="flex gap-2">
                    <button
                        disabled={busy}
                        onclick={on_intent.reform(|_| DetailIntent::Pay(PayMode::Manual))}
                        class="flex-1 bg-primary text-primary-foreground py-2 rounded font-bold"
                    >
                        { if busy { "Submitting..." } else { "Submit Payment" } }
                    </button>
                    <button
                        disabled={busy}
                        onclick={on_intent.reform(|_| DetailIntent::ClosePayment)}
                        class="flex-1 bg-red-600 text-white py-2 rounded font-bold"
                    >
                        {"Cancel"}
                    </button>
                </div>
            </div>
        </div>
    }
}

/// The open payment form, including while its submission is in flight.
fn payment_draft(activity: &Activity) -> Option<&PaymentDraft> {
    match activity {
        Activity::PaymentOpen(draft) => Some(draft),
        Activity::Submitting { resume, .. } => payment_draft(resume),
        _ => None,
    }
}

fn breakdown_draft(activity: &Activity) -> Option<&BreakdownDraft> {
    match activity {
        Activity::EditingBreakdown(draft) => Some(draft),
        Activity::Submitting { resume, .. } => breakdown_draft(resume),
        _ => None,
    }
}
