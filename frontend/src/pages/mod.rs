mod detail;
mod payment_schedule;
mod roster;
mod settings;

pub use payment_schedule::PaymentSchedulePage;
pub use settings::SettingsPage;
