use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entry amount tagged with its direction. The magnitude is never negative;
/// the sign only exists on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Income(Decimal),
    Expense(Decimal),
}

impl Amount {
    pub fn new(kind: EntryKind, magnitude: Decimal) -> Self {
        match kind {
            EntryKind::Income => Self::Income(magnitude.abs()),
            EntryKind::Expense => Self::Expense(magnitude.abs()),
        }
    }

    /// Zero counts as income.
    pub fn from_signed(signed: Decimal) -> Self {
        if signed >= Decimal::ZERO {
            Self::Income(signed)
        } else {
            Self::Expense(signed.abs())
        }
    }

    pub fn to_signed(&self) -> Decimal {
        match *self {
            Self::Income(d) => d,
            Self::Expense(d) => -d,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Income(_) => EntryKind::Income,
            Self::Expense(_) => EntryKind::Expense,
        }
    }

    pub fn magnitude(&self) -> Decimal {
        match *self {
            Self::Income(d) | Self::Expense(d) => d,
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income(_))
    }

    #[cfg(test)]
    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense(_))
    }
}

/// Entry payload without a service-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub name: String,
    pub description: String,
    pub amount: Amount,
    pub date: NaiveDate,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub amount: Amount,
    pub date: NaiveDate,
    pub category: String,
}

impl LedgerEntry {
    pub fn from_new(id: i64, entry: NewEntry) -> Self {
        Self {
            id: Some(id),
            name: entry.name,
            description: entry.description,
            amount: entry.amount,
            date: entry.date,
            category: entry.category,
        }
    }

    #[cfg(test)]
    pub fn to_new(&self) -> NewEntry {
        NewEntry {
            name: self.name.clone(),
            description: self.description.clone(),
            amount: self.amount,
            date: self.date,
            category: self.category.clone(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_income()
    }

    #[cfg(test)]
    pub fn is_expense(&self) -> bool {
        self.amount.is_expense()
    }
}
