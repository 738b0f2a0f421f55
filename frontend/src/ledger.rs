//! Pure bookkeeping over what the backend returns: roster merging and search,
//! repayment ordering, payability and term projection.

use std::collections::HashMap;

use crate::error::ActionError;
use crate::models::{AccountSummary, Installment};

/// Collapses rows sharing an account number into one, summing balances.
/// First-seen order is kept and the earliest due date wins.
pub fn merge_summaries(rows: Vec<AccountSummary>) -> Vec<AccountSummary> {
    let mut merged: Vec<AccountSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match index.get(&row.account_number) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.total_balance += row.total_balance;
                existing.next_due_date = match (existing.next_due_date, row.next_due_date) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                if existing.account_holder.is_empty() {
                    existing.account_holder = row.account_holder;
                }
            }
            None => {
                index.insert(row.account_number.clone(), merged.len());
                merged.push(row);
            }
        }
    }

    merged
}

/// Case-insensitive on the holder name, exact substring on the account number.
pub fn filter_summaries<'a>(rows: &'a [AccountSummary], query: &str) -> Vec<&'a AccountSummary> {
    let needle = query.to_lowercase();
    rows.iter()
        .filter(|row| {
            row.account_number.contains(query)
                || row.account_holder.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Sorts by due date (undated rows last, ties by id) and numbers the result.
pub fn order_installments(mut rows: Vec<Installment>) -> Vec<Installment> {
    rows.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    for (sequence, row) in rows.iter_mut().enumerate() {
        row.sequence = sequence;
    }
    rows
}

/// An unpaid installment is payable once everything before it is paid.
pub fn is_payable(schedules: &[Installment], installment: &Installment) -> bool {
    !installment.is_paid
        && schedules
            .iter()
            .filter(|s| s.sequence < installment.sequence)
            .all(|s| s.is_paid)
}

pub fn check_payable(schedules: &[Installment], installment_id: i64) -> Result<&Installment, ActionError> {
    let installment = schedules
        .iter()
        .find(|s| s.id == installment_id)
        .ok_or(ActionError::UnknownInstallment(installment_id))?;
    if installment.is_paid {
        return Err(ActionError::AlreadyPaid);
    }
    if !is_payable(schedules, installment) {
        return Err(ActionError::OutOfSequence);
    }
    Ok(installment)
}

/// Parses an admin-typed amount. Thousands separators and a peso sign are
/// tolerated; the result must be finite and positive.
pub fn parse_amount(input: &str) -> Result<f64, ActionError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('₱')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| ActionError::InvalidAmount)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ActionError::InvalidAmount);
    }
    Ok(amount)
}

/// Number of installments needed to clear `remaining` at `per_installment`.
/// Computed in centavos so `ceil` is not thrown off by float error.
pub fn project_term(remaining: f64, per_installment: f64) -> Option<u32> {
    let remaining = to_cents(remaining)?;
    let step = to_cents(per_installment)?;
    if remaining <= 0 || step <= 0 {
        return None;
    }
    u32::try_from((remaining + step - 1) / step).ok()
}

pub fn unpaid_ids(schedules: &[Installment]) -> Vec<i64> {
    schedules.iter().filter(|s| !s.is_paid).map(|s| s.id).collect()
}

pub fn all_ids(schedules: &[Installment]) -> Vec<i64> {
    schedules.iter().map(|s| s.id).collect()
}

fn to_cents(amount: f64) -> Option<i64> {
    amount.is_finite().then(|| (amount * 100.0).round() as i64)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn summary(account: &str, holder: &str, balance: f64) -> AccountSummary {
        AccountSummary {
            account_number: account.to_string(),
            account_holder: holder.to_string(),
            next_due_date: None,
            total_balance: balance,
        }
    }

    pub(crate) fn installment(id: i64, due: (i32, u32, u32), amount: f64, is_paid: bool) -> Installment {
        Installment {
            id,
            principal_amount: amount,
            payment_amount: amount,
            advance_pay: 0.0,
            under_pay: 0.0,
            penalty: 0.0,
            due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2),
            received_amnt: if is_paid { amount } else { 0.0 },
            is_paid,
            balance: 0.0,
            sequence: 0,
        }
    }

    #[test]
    fn duplicates_are_summed_once_per_account() {
        let mut late = summary("1001", "", 300.0);
        late.next_due_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        let mut early = summary("1001", "", 200.5);
        early.next_due_date = NaiveDate::from_ymd_opt(2024, 4, 15);

        let merged = merge_summaries(vec![
            late,
            summary("1002", "", 50.0),
            early,
            summary("1001", "", 0.25),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].account_number, "1001");
        assert_eq!(merged[0].total_balance, 500.75);
        assert_eq!(merged[0].next_due_date, NaiveDate::from_ymd_opt(2024, 4, 15));
        assert_eq!(merged[1].account_number, "1002");
        assert_eq!(merged[1].total_balance, 50.0);
    }

    #[test]
    fn search_matches_holder_case_insensitively_and_account_exactly() {
        let rows = vec![
            summary("1001", "Maria Santos", 0.0),
            summary("2002", "Jose Rizal", 0.0),
            summary("30AB", "Andres Bonifacio", 0.0),
        ];

        assert_eq!(filter_summaries(&rows, "").len(), 3);

        let hits = filter_summaries(&rows, "SANTOS");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].account_number, "1001");

        let hits = filter_summaries(&rows, "00");
        assert_eq!(hits.len(), 2);

        // account numbers are matched as typed
        assert!(filter_summaries(&rows, "30ab").is_empty());
        assert_eq!(filter_summaries(&rows, "30AB").len(), 1);
    }

    #[test]
    fn ordering_follows_due_date_not_fetch_order() {
        let rows = order_installments(vec![
            installment(3, (2024, 3, 1), 100.0, false),
            installment(1, (2024, 1, 1), 100.0, true),
            installment(2, (2024, 2, 1), 100.0, false),
        ]);
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rows[2].sequence, 2);
    }

    #[test]
    fn only_the_next_unpaid_installment_is_payable() {
        let rows = order_installments(vec![
            installment(1, (2024, 1, 1), 100.0, true),
            installment(2, (2024, 1, 16), 100.0, false),
            installment(3, (2024, 1, 31), 100.0, false),
        ]);
        assert!(!is_payable(&rows, &rows[0]));
        assert!(is_payable(&rows, &rows[1]));
        assert!(!is_payable(&rows, &rows[2]));

        assert_eq!(check_payable(&rows, 3), Err(ActionError::OutOfSequence));
        assert_eq!(check_payable(&rows, 1), Err(ActionError::AlreadyPaid));
        assert_eq!(check_payable(&rows, 9), Err(ActionError::UnknownInstallment(9)));
        assert_eq!(check_payable(&rows, 2).map(|i| i.id), Ok(2));
    }

    #[test]
    fn first_installment_is_always_payable() {
        let rows = order_installments(vec![installment(5, (2024, 1, 1), 100.0, false)]);
        assert!(is_payable(&rows, &rows[0]));
    }

    #[test]
    fn amounts_must_be_positive_numbers() {
        assert_eq!(parse_amount("1000"), Ok(1000.0));
        assert_eq!(parse_amount(" ₱1,250.75 "), Ok(1250.75));
        assert_eq!(parse_amount(""), Err(ActionError::InvalidAmount));
        assert_eq!(parse_amount("abc"), Err(ActionError::InvalidAmount));
        assert_eq!(parse_amount("0"), Err(ActionError::InvalidAmount));
        assert_eq!(parse_amount("-5"), Err(ActionError::InvalidAmount));
        assert_eq!(parse_amount("inf"), Err(ActionError::InvalidAmount));
        assert_eq!(parse_amount("NaN"), Err(ActionError::InvalidAmount));
    }

    #[test]
    fn term_is_rounded_up() {
        assert_eq!(project_term(2300.0, 500.0), Some(5));
        assert_eq!(project_term(2000.0, 500.0), Some(4));
        assert_eq!(project_term(1.1, 0.1), Some(11));
        assert_eq!(project_term(0.0, 500.0), None);
        assert_eq!(project_term(2300.0, 0.0), None);
    }

    #[test]
    fn id_lists_for_breakdown_and_revert() {
        let rows = vec![
            installment(1, (2024, 1, 1), 100.0, true),
            installment(2, (2024, 1, 16), 100.0, false),
        ];
        assert_eq!(unpaid_ids(&rows), vec![2]);
        assert_eq!(all_ids(&rows), vec![1, 2]);
    }
}
