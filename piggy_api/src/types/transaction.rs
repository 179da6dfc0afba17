//! Transaction query and item types.
//!
//! The upstream item schema is not contractually fixed, so items are kept as
//! opaque JSON objects. The only boundary check is that each item is an
//! object; typed accessors read the fields the views rely on and return
//! `None` when a field is missing or has the wrong type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST services/app/transaction/GetTransactionsAsync`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

impl TransactionQuery {
    pub fn new(
        kind: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            account_id: None,
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Restricts the query to a single account.
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }
}

/// A single transaction as returned by the upstream service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct TransactionItem(Map<String, Value>);

impl TransactionItem {
    /// Raw access to any upstream field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Item identifier. Numeric ids are rendered as strings.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn transaction_time(&self) -> Option<&str> {
        self.0.get("transactionTime")?.as_str()
    }

    pub fn amount_in_default_currency(&self) -> Option<f64> {
        self.0.get("amountInDefaultCurrency")?.as_f64()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description")?.as_str()
    }

    pub fn account_name(&self) -> Option<&str> {
        self.0.get("accountName")?.as_str()
    }
}
