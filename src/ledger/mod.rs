use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::LedgerEntry;

/// Display record for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryRow {
    pub(crate) id: Option<i64>,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) date: NaiveDate,
    pub(crate) category: String,
    pub(crate) display_amount: Decimal,
    pub(crate) is_income: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) balance: Decimal,
    pub(crate) income_count: usize,
    pub(crate) expense_count: usize,
    /// Expense totals per category, largest first.
    pub(crate) expense_by_category: Vec<(String, Decimal)>,
    pub(crate) rows: Vec<EntryRow>,
}

/// Derive totals and render rows from an entry collection.
pub(crate) fn aggregate(entries: &[LedgerEntry]) -> Summary {
    let mut summary = Summary::default();
    let mut by_category: HashMap<&str, Decimal> = HashMap::new();

    for entry in entries {
        let magnitude = entry.amount.magnitude();
        if entry.is_income() {
            summary.income += magnitude;
            summary.income_count += 1;
        } else {
            summary.expense += magnitude;
            summary.expense_count += 1;
            *by_category.entry(entry.category.as_str()).or_default() += magnitude;
        }

        summary.rows.push(EntryRow {
            id: entry.id,
            name: entry.name.clone(),
            description: entry.description.clone(),
            date: entry.date,
            category: entry.category.clone(),
            display_amount: magnitude,
            is_income: entry.is_income(),
        });
    }

    summary.balance = summary.income - summary.expense;

    let mut categories: Vec<(String, Decimal)> = by_category
        .into_iter()
        .map(|(name, total)| {
            let label = if name.is_empty() { "Uncategorized" } else { name };
            (label.to_string(), total)
        })
        .collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    summary.expense_by_category = categories;

    summary
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Client-side view of the ledger. Always a function of the last successful fetch.
#[derive(Debug, Clone)]
pub(crate) struct ViewState {
    pub(crate) entries: Vec<LedgerEntry>,
    pub(crate) summary: Summary,
    pub(crate) load: LoadState,
}

impl ViewState {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            summary: Summary::default(),
            load: LoadState::Loading,
        }
    }

    /// Replace the cached collection wholesale, newest first.
    pub(crate) fn replace(&mut self, mut entries: Vec<LedgerEntry>) {
        sort_newest_first(&mut entries);
        self.summary = aggregate(&entries);
        self.entries = entries;
        self.load = LoadState::Loaded;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.entries.clear();
        self.summary = Summary::default();
        self.load = LoadState::Failed(message.into());
    }

    pub(crate) fn mark_loading(&mut self) {
        self.load = LoadState::Loading;
    }

    pub(crate) fn find(&self, id: i64) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id == Some(id))
    }

    #[cfg(test)]
    pub(crate) fn is_failed(&self) -> bool {
        matches!(self.load, LoadState::Failed(_))
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

/// Date descending, ties broken by id descending.
pub(crate) fn sort_newest_first(entries: &mut [LedgerEntry]) {
    entries.sort_by_key(|e| (Reverse(e.date), Reverse(e.id)));
}
