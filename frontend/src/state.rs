//! View state for the payment schedule screen.
//!
//! Everything the screen shows lives in one [`ViewState`] value driven by
//! [`ScheduleAction`]s through `use_reducer`. Network work happens elsewhere
//! and reports back by dispatching actions; responses tagged with a stale
//! ticket are dropped.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use yew::functional::Reducible;

use crate::api::{ApiClient, MarkPaidBody, RevertBody, UpdateBreakdownBody};
use crate::error::ActionError;
use crate::ledger;
use crate::models::{AccountSummary, Installment, Loan, LoanType, Member};

#[derive(Clone, Debug, PartialEq)]
pub enum Section<T> {
    Loading,
    Loaded(T),
    Failed(String),
    /// Not fetched because an earlier fetch failed.
    Skipped,
}

impl<T> Section<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RosterView {
    pub summaries: Vec<AccountSummary>,
    pub query: String,
}

impl RosterView {
    pub fn visible(&self) -> Vec<&AccountSummary> {
        ledger::filter_summaries(&self.summaries, &self.query)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayMode {
    /// Pay exactly the scheduled amount.
    Exact,
    /// Pay what the admin typed.
    Manual,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentDraft {
    pub installment_id: i64,
    pub suggested: f64,
    pub input: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BreakdownDraft {
    pub input: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Payment { installment_id: i64, body: MarkPaidBody },
    Breakdown(UpdateBreakdownBody),
    Revert(RevertBody),
}

impl Submission {
    pub fn flight(&self) -> Flight {
        match self {
            Submission::Payment { .. } => Flight::Payment,
            Submission::Breakdown(_) => Flight::Breakdown,
            Submission::Revert(_) => Flight::Revert,
        }
    }

    pub fn failure_text(&self) -> &'static str {
        match self {
            Submission::Payment { .. } => "The payment was not recorded.",
            Submission::Breakdown(_) => "The breakdown was not updated.",
            Submission::Revert(_) => "The schedule was not reverted.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Activity {
    Browsing,
    PaymentOpen(PaymentDraft),
    EditingBreakdown(BreakdownDraft),
    /// `resume` is where a failed submission returns to.
    Submitting {
        submission: Submission,
        resume: Box<Activity>,
    },
}

impl Activity {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Activity::Submitting { .. })
    }
}

/// Dismissible banner. Carries the submission to replay when it failed.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub retry: Option<Submission>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub ticket: u32,
    pub account_number: String,
    pub loan_type: LoanType,
    pub remaining_balance: f64,
    pub schedules: Section<Vec<Installment>>,
    pub member: Section<Option<Member>>,
    pub loan: Section<Option<Loan>>,
    pub activity: Activity,
    pub notice: Option<Notice>,
    pub projected_term: Option<u32>,
}

impl DetailView {
    fn new(ticket: u32, account_number: String, loan_type: LoanType, remaining_balance: f64) -> Self {
        Self {
            ticket,
            account_number,
            loan_type,
            remaining_balance,
            schedules: Section::Loading,
            member: Section::Loading,
            loan: Section::Loading,
            activity: Activity::Browsing,
            notice: None,
            projected_term: None,
        }
    }

    pub fn installments(&self) -> &[Installment] {
        self.schedules.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn installment(&self, id: i64) -> Option<&Installment> {
        self.installments().iter().find(|s| s.id == id)
    }

    pub fn holder_name(&self) -> Option<String> {
        self.member
            .loaded()
            .and_then(|m| m.as_ref())
            .map(Member::full_name)
            .filter(|name| !name.is_empty())
    }

    pub fn plan_payment(&self, mode: PayMode) -> Result<Submission, ActionError> {
        let draft = match &self.activity {
            Activity::PaymentOpen(draft) => draft,
            _ => return Err(ActionError::FormClosed),
        };
        let schedules = self
            .schedules
            .loaded()
            .ok_or(ActionError::ScheduleNotLoaded)?;
        let installment = ledger::check_payable(schedules, draft.installment_id)?;
        let amount = match mode {
            PayMode::Exact if installment.payment_amount > 0.0 => installment.payment_amount,
            PayMode::Exact => return Err(ActionError::InvalidAmount),
            PayMode::Manual => ledger::parse_amount(&draft.input)?,
        };
        Ok(Submission::Payment {
            installment_id: installment.id,
            body: MarkPaidBody {
                received_amount: amount,
                account_number: self.account_number.clone(),
            },
        })
    }

    pub fn plan_breakdown(&self) -> Result<Submission, ActionError> {
        let draft = match &self.activity {
            Activity::EditingBreakdown(draft) => draft,
            _ => return Err(ActionError::FormClosed),
        };
        let schedules = self
            .schedules
            .loaded()
            .ok_or(ActionError::ScheduleNotLoaded)?;
        let new_amount = ledger::parse_amount(&draft.input)?;
        let schedules_id = ledger::unpaid_ids(schedules);
        if schedules_id.is_empty() {
            return Err(ActionError::NothingToUpdate);
        }
        Ok(Submission::Breakdown(UpdateBreakdownBody {
            schedules_id,
            new_amount,
        }))
    }

    pub fn plan_revert(&self) -> Result<Submission, ActionError> {
        let schedules = self
            .schedules
            .loaded()
            .ok_or(ActionError::ScheduleNotLoaded)?;
        let schedules_id = ledger::all_ids(schedules);
        if schedules_id.is_empty() {
            return Err(ActionError::NothingToUpdate);
        }
        Ok(Submission::Revert(RevertBody { schedules_id }))
    }

    fn settle(&mut self, submission: &Submission) {
        match submission {
            Submission::Payment { body, .. } => {
                self.remaining_balance -= body.received_amount;
            }
            Submission::Breakdown(body) => {
                self.projected_term = ledger::project_term(self.remaining_balance, body.new_amount);
            }
            Submission::Revert(_) => {
                self.projected_term = None;
            }
        }
        self.activity = Activity::Browsing;
        self.notice = None;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState {
    /// Roster is being fetched.
    Idle,
    Error {
        message: String,
    },
    ListLoaded(RosterView),
    DetailLoaded {
        roster: Rc<RosterView>,
        detail: DetailView,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScheduleAction {
    RosterRequested,
    RosterLoaded(Vec<AccountSummary>),
    RosterFailed(String),
    QueryChanged(String),
    /// Opens an account from the roster, or reloads the open one.
    /// `remaining_balance` is only given when opening from the roster.
    DetailRequested {
        ticket: u32,
        account_number: String,
        loan_type: LoanType,
        remaining_balance: Option<f64>,
    },
    SchedulesLoaded { ticket: u32, rows: Vec<Installment> },
    SchedulesFailed { ticket: u32, message: String },
    MemberLoaded { ticket: u32, member: Option<Member> },
    MemberFailed { ticket: u32, message: String },
    LoanLoaded { ticket: u32, loan: Option<Loan> },
    LoanFailed { ticket: u32, message: String },
    Back,
    PaymentOpened(i64),
    PaymentInput(String),
    PaymentClosed,
    BreakdownOpened,
    BreakdownInput(String),
    BreakdownClosed,
    /// Inline validation message for whichever form is open.
    Rejected(String),
    Submitted(Submission),
    /// Outcomes carry the ticket of the detail that sent the write.
    Settled { ticket: u32, submission: Submission },
    SubmissionFailed {
        ticket: u32,
        submission: Submission,
        message: String,
    },
    NoticeRaised(String),
    NoticeDismissed,
}

impl Reducible for ViewState {
    type Action = ScheduleAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new((*self).clone().apply(action))
    }
}

impl ViewState {
    pub fn apply(self, action: ScheduleAction) -> ViewState {
        use ScheduleAction::*;

        match action {
            RosterRequested => ViewState::Idle,
            RosterLoaded(summaries) => ViewState::ListLoaded(RosterView {
                summaries,
                query: String::new(),
            }),
            RosterFailed(message) => ViewState::Error { message },
            QueryChanged(query) => match self {
                ViewState::ListLoaded(mut roster) => {
                    roster.query = query;
                    ViewState::ListLoaded(roster)
                }
                other => other,
            },
            DetailRequested {
                ticket,
                account_number,
                loan_type,
                remaining_balance,
            } => match self {
                ViewState::ListLoaded(roster) => ViewState::DetailLoaded {
                    roster: Rc::new(roster),
                    detail: DetailView::new(
                        ticket,
                        account_number,
                        loan_type,
                        remaining_balance.unwrap_or(0.0),
                    ),
                },
                ViewState::DetailLoaded { roster, detail } => {
                    let same_account = detail.account_number == account_number;
                    let carried = if same_account { detail.remaining_balance } else { 0.0 };
                    let mut next = DetailView::new(
                        ticket,
                        account_number,
                        loan_type,
                        remaining_balance.unwrap_or(carried),
                    );
                    if same_account && detail.loan_type == loan_type {
                        next.projected_term = detail.projected_term;
                        next.notice = detail.notice;
                    }
                    ViewState::DetailLoaded {
                        roster,
                        detail: next,
                    }
                }
                other => other,
            },
            SchedulesLoaded { ticket, rows } => self.with_detail(Some(ticket), |d| {
                d.schedules = Section::Loaded(ledger::order_installments(rows));
            }),
            SchedulesFailed { ticket, message } => self.with_detail(Some(ticket), |d| {
                d.schedules = Section::Failed(message);
                d.member = Section::Skipped;
                d.loan = Section::Skipped;
            }),
            MemberLoaded { ticket, member } => self.with_detail(Some(ticket), |d| {
                d.member = Section::Loaded(member);
            }),
            MemberFailed { ticket, message } => self.with_detail(Some(ticket), |d| {
                d.member = Section::Failed(message);
            }),
            LoanLoaded { ticket, loan } => self.with_detail(Some(ticket), |d| {
                d.loan = Section::Loaded(loan);
            }),
            LoanFailed { ticket, message } => self.with_detail(Some(ticket), |d| {
                d.loan = Section::Failed(message);
            }),
            Back => match self {
                ViewState::DetailLoaded { roster, .. } => {
                    ViewState::ListLoaded(Rc::try_unwrap(roster).unwrap_or_else(|rc| (*rc).clone()))
                }
                other => other,
            },
            PaymentOpened(installment_id) => self.with_detail(None, |d| {
                if d.activity.is_submitting() {
                    return;
                }
                let checked = d
                    .schedules
                    .loaded()
                    .ok_or(ActionError::ScheduleNotLoaded)
                    .and_then(|rows| ledger::check_payable(rows, installment_id).map(|i| i.payment_amount));
                match checked {
                    Ok(suggested) => {
                        d.activity = Activity::PaymentOpen(PaymentDraft {
                            installment_id,
                            suggested,
                            input: String::new(),
                            error: None,
                        });
                    }
                    Err(err) => {
                        d.notice = Some(Notice {
                            message: err.to_string(),
                            retry: None,
                        });
                    }
                }
            }),
            PaymentInput(input) => self.with_detail(None, |d| {
                if let Activity::PaymentOpen(draft) = &mut d.activity {
                    draft.input = input;
                    draft.error = None;
                }
            }),
            PaymentClosed => self.with_detail(None, |d| {
                if matches!(d.activity, Activity::PaymentOpen(_)) {
                    d.activity = Activity::Browsing;
                }
            }),
            BreakdownOpened => self.with_detail(None, |d| {
                if matches!(d.activity, Activity::Browsing) {
                    d.activity = Activity::EditingBreakdown(BreakdownDraft::default());
                }
            }),
            BreakdownInput(input) => self.with_detail(None, |d| {
                if let Activity::EditingBreakdown(draft) = &mut d.activity {
                    draft.input = input;
                    draft.error = None;
                }
            }),
            BreakdownClosed => self.with_detail(None, |d| {
                if matches!(d.activity, Activity::EditingBreakdown(_)) {
                    d.activity = Activity::Browsing;
                }
            }),
            Rejected(message) => self.with_detail(None, |d| match &mut d.activity {
                Activity::PaymentOpen(draft) => draft.error = Some(message),
                Activity::EditingBreakdown(draft) => draft.error = Some(message),
                _ => {
                    d.notice = Some(Notice {
                        message,
                        retry: None,
                    })
                }
            }),
            Submitted(submission) => self.with_detail(None, |d| {
                if d.activity.is_submitting() {
                    return;
                }
                let resume = std::mem::replace(&mut d.activity, Activity::Browsing);
                d.activity = Activity::Submitting {
                    submission,
                    resume: Box::new(resume),
                };
                d.notice = None;
            }),
            Settled { ticket, submission } => {
                self.with_detail(Some(ticket), |d| d.settle(&submission))
            }
            SubmissionFailed {
                ticket,
                submission,
                message,
            } => self.with_detail(Some(ticket), |d| {
                if let Activity::Submitting { resume, .. } =
                    std::mem::replace(&mut d.activity, Activity::Browsing)
                {
                    d.activity = *resume;
                }
                d.notice = Some(Notice {
                    message,
                    retry: Some(submission),
                });
            }),
            NoticeRaised(message) => self.with_detail(None, |d| {
                d.notice = Some(Notice {
                    message,
                    retry: None,
                });
            }),
            NoticeDismissed => self.with_detail(None, |d| d.notice = None),
        }
    }

    /// Applies `f` to the open detail. With a ticket, only if it is current.
    fn with_detail(self, ticket: Option<u32>, f: impl FnOnce(&mut DetailView)) -> ViewState {
        match self {
            ViewState::DetailLoaded { roster, mut detail } => {
                if ticket.map_or(true, |t| t == detail.ticket) {
                    f(&mut detail);
                } else {
                    log::debug!("dropping response for superseded load {:?}", ticket);
                }
                ViewState::DetailLoaded { roster, detail }
            }
            other => other,
        }
    }

    pub fn detail(&self) -> Option<&DetailView> {
        match self {
            ViewState::DetailLoaded { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flight {
    Payment,
    Breakdown,
    Revert,
}

/// At most one request of each kind may be outstanding.
#[derive(Clone, Debug, Default)]
pub struct SingleFlight {
    active: Rc<RefCell<HashSet<Flight>>>,
}

impl SingleFlight {
    pub fn try_begin(&self, flight: Flight) -> Option<FlightGuard> {
        if !self.active.borrow_mut().insert(flight) {
            return None;
        }
        Some(FlightGuard {
            flight,
            active: Rc::clone(&self.active),
        })
    }
}

/// Releases its flight when dropped.
#[derive(Debug)]
pub struct FlightGuard {
    flight: Flight,
    active: Rc<RefCell<HashSet<Flight>>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.active.borrow_mut().remove(&self.flight);
    }
}

/// Shared handles the screen's async work needs.
#[derive(Clone, Debug)]
pub struct Session {
    pub api: ApiClient,
    pub flights: SingleFlight,
    tickets: Rc<Cell<u32>>,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            flights: SingleFlight::default(),
            tickets: Rc::new(Cell::new(0)),
        }
    }

    pub fn next_ticket(&self) -> u32 {
        let ticket = self.tickets.get().wrapping_add(1);
        self.tickets.set(ticket);
        ticket
    }

    /// Ticket of the most recent detail load, or of the last time the detail
    /// was left.
    pub fn current_ticket(&self) -> u32 {
        self.tickets.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::ledger::tests::{installment, summary};

    fn roster() -> ViewState {
        ViewState::Idle.apply(ScheduleAction::RosterLoaded(vec![
            summary("1001", "Maria Santos", 2300.0),
            summary("1002", "Jose Rizal", 800.0),
        ]))
    }

    fn open_1001(state: ViewState, ticket: u32) -> ViewState {
        state
            .apply(ScheduleAction::DetailRequested {
                ticket,
                account_number: "1001".to_string(),
                loan_type: LoanType::Regular,
                remaining_balance: Some(2300.0),
            })
            .apply(ScheduleAction::SchedulesLoaded {
                ticket,
                rows: vec![
                    installment(12, (2024, 2, 15), 1150.0, false),
                    installment(11, (2024, 1, 31), 1150.0, true),
                    installment(13, (2024, 3, 1), 1150.0, false),
                ],
            })
    }

    fn detail(state: &ViewState) -> &DetailView {
        state.detail().expect("detail view")
    }

    #[test]
    fn pay_first_unpaid_row_end_to_end() {
        let state = open_1001(roster(), 1)
            .apply(ScheduleAction::PaymentOpened(12))
            .apply(ScheduleAction::PaymentInput("1000".to_string()));

        let submission = detail(&state).plan_payment(PayMode::Manual).unwrap();
        let (installment_id, body) = match &submission {
            Submission::Payment { installment_id, body } => (*installment_id, body.clone()),
            other => panic!("unexpected submission {:?}", other),
        };
        assert_eq!(
            Endpoint::MarkPaid(installment_id).path(),
            "/payment-schedules/12/mark-paid/"
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["received_amount"].as_f64(), Some(1000.0));
        assert_eq!(json["account_number"], "1001");

        let state = state.apply(ScheduleAction::Submitted(submission.clone()));
        assert!(detail(&state).activity.is_submitting());

        let state = state.apply(ScheduleAction::Settled { ticket: 1, submission });
        assert_eq!(detail(&state).remaining_balance, 1300.0);
        assert_eq!(detail(&state).activity, Activity::Browsing);

        // re-fetch after write keeps the locally adjusted balance
        let state = state.apply(ScheduleAction::DetailRequested {
            ticket: 2,
            account_number: "1001".to_string(),
            loan_type: LoanType::Regular,
            remaining_balance: None,
        });
        assert_eq!(detail(&state).remaining_balance, 1300.0);
        assert_eq!(detail(&state).schedules, Section::Loading);
    }

    #[test]
    fn invalid_manual_amounts_produce_no_submission() {
        let state = open_1001(roster(), 1).apply(ScheduleAction::PaymentOpened(12));
        for input in ["", "abc", "0", "-20"] {
            let state = state
                .clone()
                .apply(ScheduleAction::PaymentInput(input.to_string()));
            assert_eq!(
                detail(&state).plan_payment(PayMode::Manual),
                Err(ActionError::InvalidAmount)
            );
        }
    }

    #[test]
    fn exact_amount_pays_scheduled_amount_of_unpaid_row() {
        let state = open_1001(roster(), 1).apply(ScheduleAction::PaymentOpened(12));
        match detail(&state).plan_payment(PayMode::Exact) {
            Ok(Submission::Payment { body, .. }) => assert_eq!(body.received_amount, 1150.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn out_of_sequence_row_does_not_open_payment() {
        let state = open_1001(roster(), 1).apply(ScheduleAction::PaymentOpened(13));
        let d = detail(&state);
        assert_eq!(d.activity, Activity::Browsing);
        assert_eq!(
            d.notice.as_ref().map(|n| n.message.clone()),
            Some(ActionError::OutOfSequence.to_string())
        );
    }

    #[test]
    fn failed_submission_reopens_form_with_retry() {
        let state = open_1001(roster(), 1)
            .apply(ScheduleAction::PaymentOpened(12))
            .apply(ScheduleAction::PaymentInput("500".to_string()));
        let submission = detail(&state).plan_payment(PayMode::Manual).unwrap();
        let state = state
            .apply(ScheduleAction::Submitted(submission.clone()))
            .apply(ScheduleAction::SubmissionFailed {
                ticket: 1,
                submission: submission.clone(),
                message: "offline".to_string(),
            });

        let d = detail(&state);
        assert!(matches!(&d.activity, Activity::PaymentOpen(draft) if draft.input == "500"));
        assert_eq!(d.notice.as_ref().and_then(|n| n.retry.clone()), Some(submission));
        assert_eq!(d.remaining_balance, 2300.0);

        let state = state.apply(ScheduleAction::NoticeDismissed);
        assert_eq!(detail(&state).notice, None);
    }

    #[test]
    fn second_submission_is_ignored_while_one_is_pending() {
        let state = open_1001(roster(), 1)
            .apply(ScheduleAction::PaymentOpened(12))
            .apply(ScheduleAction::PaymentInput("500".to_string()));
        let first = detail(&state).plan_payment(PayMode::Manual).unwrap();
        let state = state.apply(ScheduleAction::Submitted(first.clone()));
        let state = state.apply(ScheduleAction::Submitted(Submission::Revert(RevertBody {
            schedules_id: vec![11],
        })));
        match &detail(&state).activity {
            Activity::Submitting { submission, .. } => assert_eq!(submission, &first),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn breakdown_save_projects_term() {
        let state = open_1001(roster(), 1)
            .apply(ScheduleAction::BreakdownOpened)
            .apply(ScheduleAction::BreakdownInput("500".to_string()));
        let submission = detail(&state).plan_breakdown().unwrap();
        assert_eq!(
            submission,
            Submission::Breakdown(UpdateBreakdownBody {
                schedules_id: vec![12, 13],
                new_amount: 500.0,
            })
        );

        let state = state
            .apply(ScheduleAction::Submitted(submission.clone()))
            .apply(ScheduleAction::Settled { ticket: 1, submission });
        assert_eq!(detail(&state).projected_term, Some(5));

        let revert = detail(&state).plan_revert().unwrap();
        assert_eq!(
            revert,
            Submission::Revert(RevertBody {
                schedules_id: vec![11, 12, 13],
            })
        );
        let state = state
            .apply(ScheduleAction::Submitted(revert.clone()))
            .apply(ScheduleAction::Settled { ticket: 1, submission: revert });
        assert_eq!(detail(&state).projected_term, None);
    }

    #[test]
    fn breakdown_rejects_bad_amount_inline() {
        let state = open_1001(roster(), 1)
            .apply(ScheduleAction::BreakdownOpened)
            .apply(ScheduleAction::BreakdownInput("zero".to_string()));
        let err = detail(&state).plan_breakdown().unwrap_err();
        let state = state.apply(ScheduleAction::Rejected(err.to_string()));
        match &detail(&state).activity {
            Activity::EditingBreakdown(draft) => {
                assert_eq!(draft.error.as_deref(), Some(err.to_string().as_str()))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn stale_responses_are_dropped() {
        let state = open_1001(roster(), 1).apply(ScheduleAction::DetailRequested {
            ticket: 2,
            account_number: "1001".to_string(),
            loan_type: LoanType::Emergency,
            remaining_balance: None,
        });
        let state = state.apply(ScheduleAction::SchedulesLoaded {
            ticket: 1,
            rows: vec![installment(99, (2024, 1, 1), 1.0, false)],
        });
        assert_eq!(detail(&state).schedules, Section::Loading);
        assert_eq!(detail(&state).loan_type, LoanType::Emergency);
        assert_eq!(detail(&state).remaining_balance, 2300.0);
    }

    #[test]
    fn schedule_failure_skips_member_and_loan() {
        let state = roster()
            .apply(ScheduleAction::DetailRequested {
                ticket: 1,
                account_number: "1002".to_string(),
                loan_type: LoanType::Regular,
                remaining_balance: Some(800.0),
            })
            .apply(ScheduleAction::SchedulesFailed {
                ticket: 1,
                message: "boom".to_string(),
            });
        let d = detail(&state);
        assert_eq!(d.schedules, Section::Failed("boom".to_string()));
        assert_eq!(d.member, Section::Skipped);
        assert_eq!(d.loan, Section::Skipped);
    }

    #[test]
    fn back_returns_to_filtered_roster() {
        let state = roster().apply(ScheduleAction::QueryChanged("rizal".to_string()));
        let state = open_1001(state, 1).apply(ScheduleAction::Back);
        match &state {
            ViewState::ListLoaded(roster) => {
                assert_eq!(roster.query, "rizal");
                assert_eq!(roster.visible().len(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    fn open_1002(state: ViewState, ticket: u32) -> ViewState {
        state
            .apply(ScheduleAction::DetailRequested {
                ticket,
                account_number: "1002".to_string(),
                loan_type: LoanType::Regular,
                remaining_balance: Some(800.0),
            })
            .apply(ScheduleAction::SchedulesLoaded {
                ticket,
                rows: vec![installment(21, (2024, 2, 15), 400.0, false)],
            })
    }

    #[test]
    fn write_outcome_for_a_left_account_leaves_the_open_one_alone() {
        let state = open_1001(roster(), 1)
            .apply(ScheduleAction::PaymentOpened(12))
            .apply(ScheduleAction::PaymentInput("500".to_string()));
        let submission = detail(&state).plan_payment(PayMode::Manual).unwrap();
        let state = state
            .apply(ScheduleAction::Submitted(submission.clone()))
            .apply(ScheduleAction::Back);
        let state = open_1002(state, 2);

        let settled = state.clone().apply(ScheduleAction::Settled {
            ticket: 1,
            submission: submission.clone(),
        });
        assert_eq!(detail(&settled).account_number, "1002");
        assert_eq!(detail(&settled).remaining_balance, 800.0);

        let failed = state.apply(ScheduleAction::SubmissionFailed {
            ticket: 1,
            submission,
            message: "offline".to_string(),
        });
        assert_eq!(detail(&failed).account_number, "1002");
        assert_eq!(detail(&failed).notice, None);
        assert_eq!(detail(&failed).activity, Activity::Browsing);
    }

    #[test]
    fn plans_need_an_open_form() {
        let state = open_1001(roster(), 1);
        assert_eq!(
            detail(&state).plan_payment(PayMode::Exact),
            Err(ActionError::FormClosed)
        );
        assert_eq!(detail(&state).plan_breakdown(), Err(ActionError::FormClosed));
    }

    #[test]
    fn flights_are_exclusive_until_released() {
        let flights = SingleFlight::default();
        let guard = flights.try_begin(Flight::Payment).unwrap();
        assert!(flights.try_begin(Flight::Payment).is_none());
        assert!(flights.try_begin(Flight::Breakdown).is_some());
        drop(guard);
        assert!(flights.try_begin(Flight::Payment).is_some());
    }

    #[test]
    fn tickets_increase() {
        let session = Session::new(ApiClient::new("http://localhost"));
        let a = session.next_ticket();
        let b = session.clone().next_ticket();
        assert!(b > a);
        assert_eq!(session.current_ticket(), b);
    }
}
