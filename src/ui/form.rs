use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::ApiConfig;
use crate::ledger::ViewState;
use crate::models::{Amount, EntryKind, NewEntry};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormState {
    Closed,
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryField {
    Kind,
    Name,
    Description,
    Amount,
    Date,
    Category,
}

impl EntryField {
    pub(crate) fn all() -> &'static [EntryField] {
        &[
            Self::Kind,
            Self::Name,
            Self::Description,
            Self::Amount,
            Self::Date,
            Self::Category,
        ]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Kind => "Type",
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Amount => "Amount",
            Self::Date => "Date",
            Self::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum FormError {
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// What a submitted form asks the service to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Submission {
    Create(NewEntry),
    Update(i64, NewEntry),
}

/// The add/edit entry modal.
#[derive(Debug, Clone)]
pub(crate) struct EntryForm {
    pub(crate) state: FormState,
    pub(crate) kind: EntryKind,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) date: String,
    pub(crate) category: String,
    pub(crate) focus: usize,
    pub(crate) error: Option<String>,
}

impl EntryForm {
    pub(crate) fn new() -> Self {
        Self {
            state: FormState::Closed,
            kind: EntryKind::Expense,
            name: String::new(),
            description: String::new(),
            amount: String::new(),
            date: String::new(),
            category: String::new(),
            focus: 0,
            error: None,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub(crate) fn open_for_create(&mut self, today: NaiveDate) {
        *self = Self::new();
        self.date = today.format(DATE_FORMAT).to_string();
        self.focus = 1;
        self.state = FormState::Create;
    }

    /// Populate from a cached entry. Does nothing if `id` is unknown.
    pub(crate) fn open_for_edit(&mut self, id: i64, view: &ViewState) -> bool {
        let Some(entry) = view.find(id) else {
            return false;
        };
        self.kind = entry.amount.kind();
        self.name = entry.name.clone();
        self.description = entry.description.clone();
        self.amount = entry.amount.magnitude().normalize().to_string();
        self.date = entry.date.format(DATE_FORMAT).to_string();
        self.category = entry.category.clone();
        self.focus = 1;
        self.error = None;
        self.state = FormState::Edit(id);
        true
    }

    pub(crate) fn close(&mut self) {
        self.state = FormState::Closed;
        self.error = None;
    }

    pub(crate) fn submission(&self) -> Result<Submission, FormError> {
        let raw_amount = self.amount.trim();
        let magnitude = Decimal::from_str(raw_amount)
            .map_err(|_| FormError::InvalidAmount(raw_amount.to_string()))?;
        let raw_date = self.date.trim();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
            .map_err(|_| FormError::InvalidDate(raw_date.to_string()))?;

        let entry = NewEntry {
            name: self.name.clone(),
            description: self.description.clone(),
            amount: Amount::new(self.kind, magnitude),
            date,
            category: self.category.clone(),
        };

        Ok(match self.state {
            FormState::Edit(id) => Submission::Update(id, entry),
            FormState::Create | FormState::Closed => Submission::Create(entry),
        })
    }

    pub(crate) fn focused(&self) -> EntryField {
        let fields = EntryField::all();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub(crate) fn next_field(&mut self) {
        self.focus = (self.focus + 1) % EntryField::all().len();
    }

    pub(crate) fn prev_field(&mut self) {
        let len = EntryField::all().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub(crate) fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub(crate) fn value(&self, field: EntryField) -> String {
        match field {
            EntryField::Kind => self.kind.to_string(),
            EntryField::Name => self.name.clone(),
            EntryField::Description => self.description.clone(),
            EntryField::Amount => self.amount.clone(),
            EntryField::Date => self.date.clone(),
            EntryField::Category => self.category.clone(),
        }
    }

    fn text_mut(&mut self, field: EntryField) -> Option<&mut String> {
        match field {
            EntryField::Kind => None,
            EntryField::Name => Some(&mut self.name),
            EntryField::Description => Some(&mut self.description),
            EntryField::Amount => Some(&mut self.amount),
            EntryField::Date => Some(&mut self.date),
            EntryField::Category => Some(&mut self.category),
        }
    }

    pub(crate) fn input_char(&mut self, c: char) {
        let field = self.focused();
        if field == EntryField::Kind {
            match c {
                'i' | 'I' | '+' => self.kind = EntryKind::Income,
                'e' | 'E' | '-' => self.kind = EntryKind::Expense,
                ' ' => self.toggle_kind(),
                _ => {}
            }
            return;
        }
        if let Some(text) = self.text_mut(field) {
            text.push(c);
        }
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.focused();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        match self.state {
            FormState::Edit(_) => " Edit Entry ",
            FormState::Create | FormState::Closed => " Add Entry ",
        }
    }
}

impl Default for EntryForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingsField {
    Endpoint,
    Credential,
}

/// The API settings modal.
#[derive(Debug, Clone, Default)]
pub(crate) struct SettingsForm {
    pub(crate) open: bool,
    pub(crate) endpoint: String,
    pub(crate) credential: String,
    pub(crate) focus_credential: bool,
}

impl SettingsForm {
    pub(crate) fn open(&mut self, current: &ApiConfig) {
        self.endpoint = current.endpoint.clone();
        self.credential = current.credential.clone();
        self.focus_credential = false;
        self.open = true;
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }

    pub(crate) fn focused(&self) -> SettingsField {
        if self.focus_credential {
            SettingsField::Credential
        } else {
            SettingsField::Endpoint
        }
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus_credential = !self.focus_credential;
    }

    pub(crate) fn input_char(&mut self, c: char) {
        match self.focused() {
            SettingsField::Endpoint => self.endpoint.push(c),
            SettingsField::Credential => self.credential.push(c),
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.focused() {
            SettingsField::Endpoint => self.endpoint.pop(),
            SettingsField::Credential => self.credential.pop(),
        };
    }

    pub(crate) fn to_config(&self) -> ApiConfig {
        ApiConfig::new(self.endpoint.clone(), self.credential.clone())
    }
}
