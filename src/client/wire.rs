use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ClientError, Operation};
use crate::models::{Amount, LedgerEntry, NewEntry};

/// JSON shape of an entry as the service sends and accepts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct EntryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) id: Option<i64>,
    pub(super) name: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub(super) amount: Decimal,
    pub(super) date: NaiveDate,
    #[serde(default)]
    pub(super) category: Option<String>,
}

impl From<EntryRecord> for LedgerEntry {
    fn from(record: EntryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description.unwrap_or_default(),
            amount: Amount::from_signed(record.amount),
            date: record.date,
            category: record.category.unwrap_or_default(),
        }
    }
}

impl From<&NewEntry> for EntryRecord {
    fn from(entry: &NewEntry) -> Self {
        Self {
            id: None,
            name: entry.name.clone(),
            description: Some(entry.description.clone()),
            amount: entry.amount.to_signed(),
            date: entry.date,
            category: Some(entry.category.clone()),
        }
    }
}

/// `POST /add` answers with either a bare id or the full record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CreateReply {
    Record(EntryRecord),
    Created { id: i64 },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Items(Vec<DetailItem>),
}

#[derive(Debug, Deserialize)]
struct DetailItem {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    loc: Vec<serde_json::Value>,
}

impl DetailItem {
    fn describe(&self) -> String {
        match self.loc.last() {
            Some(serde_json::Value::String(field)) => format!("{field}: {}", self.msg),
            Some(other) => format!("{other}: {}", self.msg),
            None => self.msg.clone(),
        }
    }
}

/// Extract the `detail` message of an error body, if any.
pub(super) fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.detail? {
        Detail::Message(msg) => msg,
        Detail::Items(items) => items
            .iter()
            .map(DetailItem::describe)
            .collect::<Vec<_>>()
            .join("; "),
    };
    (!message.trim().is_empty()).then_some(message)
}

/// A 2xx body of the form `{"error": "..."}`.
pub(super) fn soft_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

/// Map a non-2xx status to the client error taxonomy.
pub(crate) fn classify_status(op: Operation, status: u16, body: &str) -> ClientError {
    if status == 403 {
        return ClientError::Auth;
    }
    if op.is_write() && (400..500).contains(&status) {
        return ClientError::Validation(
            error_detail(body).unwrap_or_else(|| op.fallback_message().to_string()),
        );
    }
    match error_detail(body) {
        Some(detail) => ClientError::Network(format!("HTTP {status}: {detail}")),
        None => ClientError::Network(format!("HTTP {status}")),
    }
}
