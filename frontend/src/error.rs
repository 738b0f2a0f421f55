use thiserror::Error;

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] gloo_net::Error),
    #[error("server responded with status {status}")]
    Status { status: u16, body: String },
}

/// An action the admin attempted that was refused before any request went out.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Please enter a valid amount greater than zero.")]
    InvalidAmount,
    #[error("Earlier installments must be paid first.")]
    OutOfSequence,
    #[error("This installment is already paid.")]
    AlreadyPaid,
    #[error("There are no unpaid installments to update.")]
    NothingToUpdate,
    #[error("Installment {0} is not on the current schedule.")]
    UnknownInstallment(i64),
    #[error("Wait for the schedule to finish loading.")]
    ScheduleNotLoaded,
    #[error("Open the form before submitting.")]
    FormClosed,
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("The receipt window was blocked. Allow pop-ups for this site and try again.")]
    PopupBlocked,
    #[error("Could not prepare the receipt window: {0}")]
    Dom(String),
}
