//! # Payments Listing
//!
//! Flat payment records rendered to a [`Table`] for any tabular sink, and to
//! delimited text. Amount cells use plain decimal text so spreadsheet tools
//! can sum them; the footer carries the listed total.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};
use crate::types::PaymentMethod;

/// One recorded payment as the listing shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    pub invoice_no: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub account_name: String,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub amount: Money,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Headers plus string cells, ready for a CSV, spreadsheet or PDF writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
}

const HEADERS: [&str; 7] = [
    "Invoice", "Customer", "Date", "Method", "Account", "Amount", "Notes",
];

/// Sum of listed amounts.
pub fn payments_total(rows: &[PaymentRow]) -> Money {
    rows.iter().map(|r| r.amount).sum()
}

/// Builds the listing table. The footer row holds the total under "Amount".
pub fn payments_table(rows: &[PaymentRow]) -> Table {
    let body = rows
        .iter()
        .map(|r| {
            vec![
                r.invoice_no.clone(),
                r.customer_name.clone(),
                r.payment_date.format("%Y-%m-%d").to_string(),
                r.payment_method.to_string(),
                r.account_name.clone(),
                r.amount.to_decimal_string(),
                r.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut footer = vec![String::new(); HEADERS.len()];
    footer[0] = "Total".to_string();
    footer[5] = payments_total(rows).to_decimal_string();

    Table {
        headers: HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: body,
        footer,
    }
}

impl Table {
    /// Renders headers, rows and footer as delimited text, one record per line.
    pub fn to_delimited(&self, delimiter: char) -> String {
        let sep = delimiter.to_string();
        let render = |cells: &[String]| {
            cells
                .iter()
                .map(|c| escape_field(c, delimiter))
                .collect::<Vec<_>>()
                .join(&sep)
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render(&self.headers));
        lines.extend(self.rows.iter().map(|r| render(r)));
        if !self.footer.is_empty() {
            lines.push(render(&self.footer));
        }
        lines.join("\n")
    }

    pub fn to_csv(&self) -> String {
        self.to_delimited(',')
    }
}

fn escape_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
