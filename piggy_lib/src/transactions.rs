//! Recent-transactions view model: the query window and day-grouped sections.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use piggy_api::types::{TransactionItem, TransactionQuery};
use serde::Serialize;

/// Title of the trailing section holding items without a parseable time.
pub const UNDATED_TITLE: &str = "Undated";

/// Inclusive UTC time window for a transaction query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn start_iso(&self) -> String {
        to_iso(self.start)
    }

    pub fn end_iso(&self) -> String {
        to_iso(self.end)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn to_iso(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Window shown by the recent-transactions screen: from two calendar months
/// before `now` up to the last millisecond of the current month.
pub fn recent_range(now: DateTime<Utc>) -> DateRange {
    let start = now.checked_sub_months(Months::new(2)).unwrap_or(now);
    DateRange {
        start,
        end: end_of_month(now),
    }
}

fn end_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .and_then(|d| d.and_hms_opt(0, 0, 0));
    match first {
        Some(next_month) => next_month.and_utc() - chrono::Duration::milliseconds(1),
        None => now,
    }
}

/// Builds the query the recent-transactions screen sends.
pub fn recent_query(kind: &str, account_id: Option<&str>, now: DateTime<Utc>) -> TransactionQuery {
    let range = recent_range(now);
    let query = TransactionQuery::new(kind, range.start_iso(), range.end_iso());
    match account_id {
        Some(id) => query.with_account_id(id),
        None => query,
    }
}

/// One day's worth of transactions, as rendered under a section header.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSection {
    pub title: String,
    pub date: Option<NaiveDate>,
    /// Sum of `amountInDefaultCurrency`, rounded half up.
    pub total_amount: i64,
    pub data: Vec<TransactionItem>,
}

/// Groups items by the UTC day of `transactionTime`.
///
/// Sections are ordered newest day first and keep the upstream order of their
/// items. Items whose time is missing or unparseable end up in a trailing
/// [`UNDATED_TITLE`] section.
pub fn group_by_day(items: Vec<TransactionItem>) -> Vec<TransactionSection> {
    let mut by_day: BTreeMap<NaiveDate, Vec<TransactionItem>> = BTreeMap::new();
    let mut undated = Vec::new();

    for item in items {
        match item.transaction_time().and_then(parse_day) {
            Some(day) => by_day.entry(day).or_default().push(item),
            None => undated.push(item),
        }
    }

    let mut sections: Vec<TransactionSection> = by_day
        .into_iter()
        .rev()
        .map(|(day, data)| section(day.format("%Y-%m-%d").to_string(), Some(day), data))
        .collect();

    if !undated.is_empty() {
        sections.push(section(UNDATED_TITLE.to_string(), None, undated));
    }
    sections
}

fn section(
    title: String,
    date: Option<NaiveDate>,
    data: Vec<TransactionItem>,
) -> TransactionSection {
    TransactionSection {
        title,
        date,
        total_amount: total_amount(&data),
        data,
    }
}

/// Rounded sum of `amountInDefaultCurrency`; items without an amount count as 0.
pub fn total_amount(items: &[TransactionItem]) -> i64 {
    let sum: f64 = items
        .iter()
        .filter_map(TransactionItem::amount_in_default_currency)
        .sum();
    (sum + 0.5).floor() as i64
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc).date_naive());
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(t.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
