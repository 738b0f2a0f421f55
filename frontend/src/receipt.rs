use chrono::NaiveDate;

use crate::error::PrintError;
use crate::format::{format_currency, format_date, format_due_date};
use crate::models::{Installment, LoanType};

#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptData {
    pub loan_type: LoanType,
    pub account_number: String,
    pub account_holder: Option<String>,
    pub payment_amount: f64,
    pub received_amount: f64,
    pub due_date: Option<NaiveDate>,
    pub is_paid: bool,
    pub printed_on: NaiveDate,
}

impl ReceiptData {
    pub fn new(
        loan_type: LoanType,
        account_number: &str,
        account_holder: Option<String>,
        installment: &Installment,
        printed_on: NaiveDate,
    ) -> Self {
        Self {
            loan_type,
            account_number: account_number.to_string(),
            account_holder,
            payment_amount: installment.payment_amount,
            received_amount: installment.received_amnt,
            due_date: installment.due_date,
            is_paid: installment.is_paid,
            printed_on,
        }
    }
}

const RECEIPT_STYLE: &str = "body { font-family: Arial, sans-serif; padding: 20px; } \
h1 { text-align: center; } \
table { width: 100%; border-collapse: collapse; margin-top: 20px; } \
th, td { border: 1px solid black; padding: 10px; text-align: left; } \
.footer { margin-top: 20px; text-align: center; font-size: 12px; }";

/// Inner markup of the receipt's `<html>` element.
pub fn render_receipt(receipt: &ReceiptData) -> String {
    let holder = receipt.account_holder.as_deref().unwrap_or("N/A");
    let rows = [
        ("Loan Type", receipt.loan_type.as_str().to_string()),
        ("Account Number", receipt.account_number.clone()),
        ("Account Holder", holder.to_string()),
        ("Payment Amount", format_currency(receipt.payment_amount)),
        ("Received Amount", format_currency(receipt.received_amount)),
        ("Due Date", format_due_date(receipt.due_date)),
        ("Status", if receipt.is_paid { "Paid" } else { "Ongoing" }.to_string()),
        ("Date Printed", format_date(receipt.printed_on)),
    ];

    let mut body = String::new();
    for (label, value) in rows.iter() {
        body.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>",
            label,
            escape_html(value)
        ));
    }

    format!(
        "<head><meta charset=\"UTF-8\"><title>Acknowledgement Receipt</title><style>{}</style></head>\
         <body><h1>Acknowledgement Receipt</h1><table>{}</table>\
         <div class=\"footer\"><p>Thank you for your payment!</p></div></body>",
        RECEIPT_STYLE, body
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Opens a pop-up, writes the receipt into it and starts printing.
pub fn print_receipt(receipt: &ReceiptData) -> Result<(), PrintError> {
    let window = web_sys::window().ok_or_else(|| PrintError::Dom("no window".to_string()))?;
    let popup = window
        .open_with_url_and_target_and_features("", "Receipt", "width=600,height=400")
        .map_err(|e| PrintError::Dom(format!("{:?}", e)))?
        .ok_or(PrintError::PopupBlocked)?;
    let root = popup
        .document()
        .and_then(|doc| doc.document_element())
        .ok_or_else(|| PrintError::Dom("receipt window has no document".to_string()))?;

    root.set_inner_html(&render_receipt(receipt));
    if let Err(e) = popup.focus() {
        log::warn!("could not focus receipt window: {:?}", e);
    }
    popup
        .print()
        .map_err(|e| PrintError::Dom(format!("{:?}", e)))?;
    log::info!("receipt sent to printer for account {}", receipt.account_number);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReceiptData {
        ReceiptData {
            loan_type: LoanType::Emergency,
            account_number: "1001".to_string(),
            account_holder: Some("Maria <b>Santos</b> & Co".to_string()),
            payment_amount: 1150.0,
            received_amount: 1200.5,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 15),
            is_paid: true,
            printed_on: NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(),
        }
    }

    #[test]
    fn receipt_lists_payment_details() {
        let html = render_receipt(&sample());
        assert!(html.contains("<h1>Acknowledgement Receipt</h1>"));
        assert!(html.contains("<tr><th>Loan Type</th><td>Emergency</td></tr>"));
        assert!(html.contains("<td>₱ 1,150.00</td>"));
        assert!(html.contains("<td>₱ 1,200.50</td>"));
        assert!(html.contains("<td>2/15/2024</td>"));
        assert!(html.contains("<td>Paid</td>"));
        assert!(html.contains("<td>2/16/2024</td>"));
        assert!(html.contains("Thank you for your payment!"));
    }

    #[test]
    fn holder_name_is_escaped() {
        let html = render_receipt(&sample());
        assert!(html.contains("Maria &lt;b&gt;Santos&lt;/b&gt; &amp; Co"));
        assert!(!html.contains("<b>Santos</b>"));
    }

    #[test]
    fn missing_holder_reads_na() {
        let mut receipt = sample();
        receipt.account_holder = None;
        receipt.is_paid = false;
        let html = render_receipt(&receipt);
        assert!(html.contains("<td>N/A</td>"));
        assert!(html.contains("<td>Ongoing</td>"));
    }
}
