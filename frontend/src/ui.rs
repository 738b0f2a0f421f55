use yew::prelude::*;

use crate::format::format_currency;

#[derive(Clone, Copy, PartialEq)]
pub enum Page {
    Schedules,
    Settings,
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active_page={props.active_page} on_select={props.on_select.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center px-6">
                    <span class="text-sm font-bold text-[#173E63] uppercase tracking-widest">{"Loans Administration"}</span>
                </header>
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let nav_items = vec![
        NavItem {
            label: "Payment Schedules",
            page: Page::Schedules,
            icon: icon_calendar,
        },
        NavItem {
            label: "Settings",
            page: Page::Settings,
            icon: icon_settings,
        },
    ];

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"MPSU Coop"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items.iter().map(|item| {
                        let is_active = item.page == props.active_page;
                        let class_name = if is_active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = item.page;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>
            </div>
        </div>
    }
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    /// `None` renders a placeholder caption instead of an amount.
    pub amount: Option<f64>,
    #[prop_or_default]
    pub caption: Option<String>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.title }</p>
                {
                    match props.amount {
                        Some(amount) => html! {
                            <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ format_currency(amount) }</h3>
                        },
                        None => html! {},
                    }
                }
                if let Some(caption) = &props.caption {
                    <p class="text-xs text-muted-foreground mt-1">{ caption.clone() }</p>
                }
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                { icon_wallet() }
            </div>
        </div>
    }
}

/// Page-level message with optional Retry and Dismiss buttons.
pub fn error_banner(message: &str, on_retry: Option<Callback<MouseEvent>>, on_dismiss: Option<Callback<MouseEvent>>) -> Html {
    html! {
        <div class="flex items-center justify-between gap-4 bg-red-50 border border-red-200 text-red-700 text-sm rounded-[10px] px-4 py-3" role="alert">
            <span>{ message.to_string() }</span>
            <div class="flex items-center gap-2 shrink-0">
                if let Some(on_retry) = on_retry {
                    <button onclick={on_retry} class="px-3 py-1 rounded bg-red-600 text-white text-xs font-bold">{"Retry"}</button>
                }
                if let Some(on_dismiss) = on_dismiss {
                    <button onclick={on_dismiss} class="px-3 py-1 rounded border border-red-300 text-xs font-bold">{"Dismiss"}</button>
                }
            </div>
        </div>
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="text-foreground">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_calendar() -> Html {
    icon_base("M3 5h18v16H3zM3 10h18M8 3v4M16 3v4")
}
pub fn icon_settings() -> Html {
    icon_base("M12 1v3M12 20v3M4.2 4.2l2.1 2.1M17.7 17.7l2.1 2.1M1 12h3M20 12h3M4.2 19.8l2.1-2.1M17.7 6.3l2.1-2.1")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_arrow_left() -> Html {
    icon_base("M19 12H5M12 19l-7-7 7-7")
}
pub fn icon_search() -> Html {
    icon_base("M11 19a8 8 0 100-16 8 8 0 000 16zM21 21l-4.35-4.35")
}
pub fn icon_receipt() -> Html {
    icon_base("M6 2h12v20l-3-2-3 2-3-2-3 2zM9 7h6M9 11h6M9 15h4")
}
