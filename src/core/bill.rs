//! Bill records and their display helpers

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Default VAT percentage applied when the form leaves `pct` blank
pub const DEFAULT_PCT: i64 = 20;

/// Expense categories offered by the creation form
pub const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

/// Lifecycle status of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    /// Label shown in the bills table
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refused",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        })
    }
}

/// One expense report entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    #[serde(default)]
    pub name: String,
    pub amount: f64,
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub vat: Option<f64>,
    #[serde(default = "default_pct")]
    pub pct: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_admin: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

fn default_pct() -> i64 {
    DEFAULT_PCT
}

/// Accepts `80`, `"80"`, `""` and `null`
fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl Bill {
    /// Parsed calendar date, `None` when the stored string is malformed
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Parse an ISO `YYYY-MM-DD` calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Short French display form: `2004-04-04` → `4 Avr. 04`
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {}. {:02}",
        date.day(),
        SHORT_MONTHS[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}

/// Amount without a trailing `.0` for whole values
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

/// Ordering key for a bill date; malformed dates sort as the oldest entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Malformed,
    Date(NaiveDate),
}

impl DateKey {
    pub fn of(raw: &str) -> Self {
        parse_date(raw).map_or(DateKey::Malformed, DateKey::Date)
    }
}

/// A bill prepared for the bills table
#[derive(Debug, Clone, Serialize)]
pub struct BillRow {
    pub id: String,
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub status: String,
    pub file_url: String,
    #[serde(skip)]
    pub sort_key: DateKey,
}

impl BillRow {
    /// Row showing the stored date string unchanged
    pub fn raw(bill: &Bill) -> Self {
        Self::with_date(bill, bill.date.clone())
    }

    /// Row showing the short French date, or the raw string when unparsable
    pub fn formatted(bill: &Bill) -> Self {
        let display = match bill.parsed_date() {
            Some(date) => format_date(date),
            None => bill.date.clone(),
        };
        Self::with_date(bill, display)
    }

    fn with_date(bill: &Bill, date: String) -> Self {
        Self {
            id: bill.id.clone(),
            expense_type: bill.expense_type.clone(),
            name: bill.name.clone(),
            date,
            amount: format_amount(bill.amount),
            status: bill.status.label().to_string(),
            file_url: bill.file_url.clone().unwrap_or_default(),
            sort_key: DateKey::of(&bill.date),
        }
    }
}

/// Most recent first; ties keep their store order
pub fn anti_chrono(a: &BillRow, b: &BillRow) -> Ordering {
    b.sort_key.cmp(&a.sort_key)
}

/// Sort rows most recent first
pub fn sort_rows(rows: &mut [BillRow]) {
    rows.sort_by(anti_chrono);
}
