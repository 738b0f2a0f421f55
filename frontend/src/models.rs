use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    #[default]
    Regular,
    Emergency,
}

impl LoanType {
    pub const ALL: [LoanType; 2] = [LoanType::Regular, LoanType::Emergency];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Regular => "Regular",
            LoanType::Emergency => "Emergency",
        }
    }

    pub fn tab_label(&self) -> &'static str {
        match self {
            LoanType::Regular => "Regular Loans",
            LoanType::Emergency => "Emergency Loans",
        }
    }

    fn parse(raw: &str) -> Option<LoanType> {
        LoanType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// One row of the roster. The backend may return several rows per account;
/// see `ledger::merge_summaries`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AccountSummary {
    #[serde(deserialize_with = "de_account_number")]
    pub account_number: String,
    #[serde(default, deserialize_with = "de_text")]
    pub account_holder: String,
    #[serde(default, deserialize_with = "de_optional_date")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_balance: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Installment {
    pub id: i64,
    #[serde(default, deserialize_with = "de_amount")]
    pub principal_amount: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub payment_amount: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub advance_pay: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub under_pay: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub penalty: f64,
    #[serde(default, deserialize_with = "de_optional_date")]
    pub due_date: Option<NaiveDate>,
    // older backends misspell this column
    #[serde(default, alias = "receied_amnt", deserialize_with = "de_amount")]
    pub received_amnt: f64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, deserialize_with = "de_amount")]
    pub balance: f64,
    /// Position in the repayment order, assigned by `ledger::order_installments`.
    #[serde(skip)]
    pub sequence: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "de_text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "de_account_number")]
    pub account_number: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Loan {
    #[serde(default, deserialize_with = "de_amount")]
    pub outstanding_balance: f64,
    #[serde(default, deserialize_with = "de_loan_type")]
    pub loan_type: Option<LoanType>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccountNumber {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

/// Accepts numbers, numeric strings and null. Anything unreadable is zero.
fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Option::<RawAmount>::deserialize(deserializer)? {
        Some(RawAmount::Number(n)) => n,
        Some(RawAmount::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    };
    Ok(if amount.is_finite() { amount } else { 0.0 })
}

fn de_account_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawAccountNumber>::deserialize(deserializer)? {
        Some(RawAccountNumber::Text(s)) => s.trim().to_string(),
        Some(RawAccountNumber::Unsigned(n)) => n.to_string(),
        Some(RawAccountNumber::Signed(n)) => n.to_string(),
        None => String::new(),
    })
}

fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(parse_iso_date))
}

fn de_loan_type<'de, D>(deserializer: D) -> Result<Option<LoanType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(LoanType::parse))
}

/// Reads `YYYY-MM-DD`, ignoring any time component that follows.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_numbers_strings_and_null() {
        let json = r#"{
            "id": 7,
            "principal_amount": "1500.50",
            "payment_amount": 1000,
            "advance_pay": null,
            "under_pay": "oops",
            "due_date": "2024-03-15",
            "is_paid": false
        }"#;
        let row: Installment = serde_json::from_str(json).unwrap();
        assert_eq!(row.principal_amount, 1500.5);
        assert_eq!(row.payment_amount, 1000.0);
        assert_eq!(row.advance_pay, 0.0);
        assert_eq!(row.under_pay, 0.0);
        assert_eq!(row.penalty, 0.0);
        assert_eq!(row.due_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn misspelled_received_column_is_read() {
        let json = r#"{"id": 1, "receied_amnt": "250.00", "due_date": null}"#;
        let row: Installment = serde_json::from_str(json).unwrap();
        assert_eq!(row.received_amnt, 250.0);
        assert_eq!(row.due_date, None);
    }

    #[test]
    fn numeric_account_numbers_become_strings() {
        let json = r#"[
            {"account_number": 1001, "total_balance": 50.25, "next_due_date": "2024-01-31T00:00:00Z"},
            {"account_number": "24-0007", "total_balance": null}
        ]"#;
        let rows: Vec<AccountSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].account_number, "1001");
        assert_eq!(rows[0].next_due_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(rows[1].account_number, "24-0007");
        assert_eq!(rows[1].total_balance, 0.0);
        assert!(rows[1].account_holder.is_empty());
    }

    #[test]
    fn member_name_skips_blank_parts() {
        let member: Member = serde_json::from_str(
            r#"{"first_name": "Ana", "middle_name": "", "last_name": "Cruz", "account_number": "1001"}"#,
        )
        .unwrap();
        assert_eq!(member.full_name(), "Ana Cruz");
    }

    #[test]
    fn unknown_loan_type_reads_as_none() {
        let loan: Loan =
            serde_json::from_str(r#"{"outstanding_balance": "9000", "loan_type": "Bridge"}"#)
                .unwrap();
        assert_eq!(loan.outstanding_balance, 9000.0);
        assert_eq!(loan.loan_type, None);

        let loan: Loan = serde_json::from_str(r#"{"loan_type": "emergency"}"#).unwrap();
        assert_eq!(loan.loan_type, Some(LoanType::Emergency));
    }
}
