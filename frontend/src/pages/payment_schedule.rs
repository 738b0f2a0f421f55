use chrono::Local;
use futures::future::join_all;
use wasm_bindgen_futures::spawn_local;
use yew::functional::UseReducerDispatcher;
use yew::prelude::*;

use super::detail::{DetailIntent, ScheduleDetail};
use super::roster::RosterTable;
use crate::api::ApiClient;
use crate::config::{self, AppSettings};
use crate::ledger;
use crate::models::{AccountSummary, LoanType};
use crate::receipt::{print_receipt, ReceiptData};
use crate::state::{DetailView, ScheduleAction, Session, Submission, ViewState};
use crate::ui::{error_banner, page_shell};

type Dispatch = UseReducerDispatcher<ViewState>;

#[function_component(PaymentSchedulePage)]
pub fn payment_schedule_page() -> Html {
    let settings = use_context::<UseStateHandle<AppSettings>>();
    let capabilities = settings
        .as_ref()
        .map(|s| s.capabilities)
        .unwrap_or_default();

    let state = use_reducer(|| ViewState::Idle);
    let session = use_state(|| Session::new(ApiClient::new(config::api_base_url())));

    {
        let session = (*session).clone();
        let dispatch = state.dispatcher();
        use_effect_with_deps(
            move |_| {
                load_roster(&session, dispatch);
                || ()
            },
            (),
        );
    }

    let on_retry_roster = {
        let session = (*session).clone();
        let dispatch = state.dispatcher();
        Callback::from(move |_| load_roster(&session, dispatch.clone()))
    };

    let on_query = {
        let dispatch = state.dispatcher();
        Callback::from(move |query: String| dispatch.dispatch(ScheduleAction::QueryChanged(query)))
    };

    let on_open = {
        let session = (*session).clone();
        let dispatch = state.dispatcher();
        Callback::from(move |summary: AccountSummary| {
            load_detail(
                &session,
                dispatch.clone(),
                summary.account_number,
                LoanType::Regular,
                Some(summary.total_balance),
            )
        })
    };

    let on_intent = {
        let state = state.clone();
        let session = (*session).clone();
        Callback::from(move |intent: DetailIntent| handle_intent(&state, &session, intent))
    };

    let content = match &*state {
        ViewState::Idle => html! {
            <p class="text-sm text-muted-foreground">{"Loading..."}</p>
        },
        ViewState::Error { message } => error_banner(message, Some(on_retry_roster), None),
        ViewState::ListLoaded(roster) => html! {
            <RosterTable roster={roster.clone()} on_query={on_query} on_open={on_open} />
        },
        ViewState::DetailLoaded { detail, .. } => html! {
            <ScheduleDetail detail={detail.clone()} capabilities={capabilities} on_intent={on_intent} />
        },
    };

    page_shell("Ongoing Payment Schedules", html! {}, content)
}

fn handle_intent(state: &UseReducerHandle<ViewState>, session: &Session, intent: DetailIntent) {
    let dispatch = state.dispatcher();
    let detail = match state.detail() {
        Some(detail) => detail,
        None => return,
    };
    let account_number = detail.account_number.clone();

    match intent {
        DetailIntent::Back => {
            // Pending loads and writes for this account no longer own the view.
            session.next_ticket();
            dispatch.dispatch(ScheduleAction::Back);
        }
        DetailIntent::SwitchLoanType(loan_type) => {
            load_detail(session, dispatch, account_number, loan_type, None)
        }
        DetailIntent::Reload => load_detail(session, dispatch, account_number, detail.loan_type, None),
        DetailIntent::OpenPayment(id) => dispatch.dispatch(ScheduleAction::PaymentOpened(id)),
        DetailIntent::PaymentInput(input) => dispatch.dispatch(ScheduleAction::PaymentInput(input)),
        DetailIntent::ClosePayment => dispatch.dispatch(ScheduleAction::PaymentClosed),
        DetailIntent::Pay(mode) => match detail.plan_payment(mode) {
            Ok(submission) => submit(session, dispatch, detail, submission),
            Err(err) => dispatch.dispatch(ScheduleAction::Rejected(err.to_string())),
        },
        DetailIntent::OpenBreakdown => dispatch.dispatch(ScheduleAction::BreakdownOpened),
        DetailIntent::BreakdownInput(input) => {
            dispatch.dispatch(ScheduleAction::BreakdownInput(input))
        }
        DetailIntent::CloseBreakdown => dispatch.dispatch(ScheduleAction::BreakdownClosed),
        DetailIntent::SaveBreakdown => match detail.plan_breakdown() {
            Ok(submission) => submit(session, dispatch, detail, submission),
            Err(err) => dispatch.dispatch(ScheduleAction::Rejected(err.to_string())),
        },
        DetailIntent::Revert => match detail.plan_revert() {
            Ok(submission) => submit(session, dispatch, detail, submission),
            Err(err) => dispatch.dispatch(ScheduleAction::Rejected(err.to_string())),
        },
        DetailIntent::Retry => {
            if let Some(submission) = detail.notice.as_ref().and_then(|n| n.retry.clone()) {
                submit(session, dispatch, detail, submission);
            }
        }
        DetailIntent::DismissNotice => dispatch.dispatch(ScheduleAction::NoticeDismissed),
        DetailIntent::PrintReceipt(id) => {
            let installment = match detail.installment(id) {
                Some(installment) => installment,
                None => return,
            };
            let receipt = ReceiptData::new(
                detail.loan_type,
                &detail.account_number,
                detail.holder_name(),
                installment,
                Local::now().date_naive(),
            );
            if let Err(err) = print_receipt(&receipt) {
                log::error!("printing receipt for installment {} failed: {}", id, err);
                dispatch.dispatch(ScheduleAction::NoticeRaised(err.to_string()));
            }
        }
    }
}

fn load_roster(session: &Session, dispatch: Dispatch) {
    dispatch.dispatch(ScheduleAction::RosterRequested);
    let api = session.api.clone();
    spawn_local(async move {
        let rows = match api.fetch_summaries().await {
            Ok(rows) => rows,
            Err(err) => {
                log::error!("fetching account summaries failed: {}", err);
                dispatch.dispatch(ScheduleAction::RosterFailed(
                    "Failed to fetch account summaries. Please try again.".to_string(),
                ));
                return;
            }
        };

        let mut summaries = ledger::merge_summaries(rows);
        let accounts: Vec<String> = summaries.iter().map(|s| s.account_number.clone()).collect();
        let members = join_all(accounts.iter().map(|account| api.fetch_member(account))).await;

        for (summary, member) in summaries.iter_mut().zip(members) {
            match member {
                Ok(Some(member)) => summary.account_holder = member.full_name(),
                Ok(None) => {}
                Err(err) => log::warn!("member lookup for {} failed: {}", summary.account_number, err),
            }
        }

        log::info!("loaded {} accounts with open schedules", summaries.len());
        dispatch.dispatch(ScheduleAction::RosterLoaded(summaries));
    });
}

/// Fetches the schedule first; member and loan only once it succeeds.
fn load_detail(
    session: &Session,
    dispatch: Dispatch,
    account_number: String,
    loan_type: LoanType,
    remaining_balance: Option<f64>,
) {
    let ticket = session.next_ticket();
    dispatch.dispatch(ScheduleAction::DetailRequested {
        ticket,
        account_number: account_number.clone(),
        loan_type,
        remaining_balance,
    });

    let api = session.api.clone();
    spawn_local(async move {
        match api.fetch_schedules(&account_number, loan_type).await {
            Ok(rows) => dispatch.dispatch(ScheduleAction::SchedulesLoaded { ticket, rows }),
            Err(err) => {
                log::error!("fetching {} schedules for {} failed: {}", loan_type.as_str(), account_number, err);
                dispatch.dispatch(ScheduleAction::SchedulesFailed {
                    ticket,
                    message: "Failed to fetch payment schedules. Please try again.".to_string(),
                });
                return;
            }
        }

        let (member, loan) = futures::join!(
            api.fetch_member(&account_number),
            api.fetch_loan(&account_number, loan_type)
        );

        match member {
            Ok(member) => dispatch.dispatch(ScheduleAction::MemberLoaded { ticket, member }),
            Err(err) => {
                log::warn!("member lookup for {} failed: {}", account_number, err);
                dispatch.dispatch(ScheduleAction::MemberFailed {
                    ticket,
                    message: "Member details are unavailable.".to_string(),
                });
            }
        }
        match loan {
            Ok(loan) => dispatch.dispatch(ScheduleAction::LoanLoaded { ticket, loan }),
            Err(err) => {
                log::warn!("loan lookup for {} failed: {}", account_number, err);
                dispatch.dispatch(ScheduleAction::LoanFailed {
                    ticket,
                    message: "Loan details are unavailable.".to_string(),
                });
            }
        }
    });
}

/// Sends a write and re-fetches the schedule once it lands. Refused while a
/// request of the same kind is still pending. If the admin has moved on by
/// the time it lands, the outcome is only logged.
fn submit(session: &Session, dispatch: Dispatch, detail: &DetailView, submission: Submission) {
    let ticket = detail.ticket;
    let account_number = detail.account_number.clone();
    let loan_type = detail.loan_type;
    let remaining_balance = detail.remaining_balance;

    let guard = match session.flights.try_begin(submission.flight()) {
        Some(guard) => guard,
        None => {
            log::warn!("{:?} request already in flight", submission.flight());
            return;
        }
    };
    dispatch.dispatch(ScheduleAction::Submitted(submission.clone()));

    let session = session.clone();
    spawn_local(async move {
        let result = match &submission {
            Submission::Payment { installment_id, body } => {
                session.api.mark_paid(*installment_id, body).await
            }
            Submission::Breakdown(body) => session.api.update_breakdown(body).await,
            Submission::Revert(body) => session.api.revert_to_original(body).await,
        };
        drop(guard);
        let still_open = session.current_ticket() == ticket;

        match result {
            Ok(()) => {
                log::info!("{:?} request for {} accepted", submission.flight(), account_number);
                if !still_open {
                    return;
                }
                let remaining = match &submission {
                    Submission::Payment { body, .. } => remaining_balance - body.received_amount,
                    _ => remaining_balance,
                };
                dispatch.dispatch(ScheduleAction::Settled { ticket, submission });
                load_detail(&session, dispatch, account_number, loan_type, Some(remaining));
            }
            Err(err) => {
                log::error!("{} {}", submission.failure_text(), err);
                if !still_open {
                    return;
                }
                let message = format!("{} {}", submission.failure_text(), err);
                dispatch.dispatch(ScheduleAction::SubmissionFailed {
                    ticket,
                    submission,
                    message,
                });
            }
        }
    });
}
