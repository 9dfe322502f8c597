use anyhow::Result;
use chrono::{Local, NaiveDate};
use ratatui::layout::{Position, Rect};
use tracing::{error, info, warn};

use super::form::{EntryForm, SettingsForm, Submission};
use super::util::{centered_rect, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};
use crate::client::{ClientError, LedgerApi};
use crate::config::{self, ApiConfig, SettingsStore};
use crate::ledger::ViewState;
use crate::models::LedgerEntry;

pub(crate) const ENTRY_FORM_WIDTH: u16 = 60;
pub(crate) const ENTRY_FORM_HEIGHT: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Transactions]
    }

    /// Page-title label.
    pub(crate) fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Transactions => "Transactions",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteEntry { id: i64, name: String },
}

/// Collaborators every remote operation needs. Settings are re-read on each call.
pub(crate) struct Context<'a> {
    pub(crate) settings: &'a mut dyn SettingsStore,
    pub(crate) api: &'a dyn LedgerApi,
    pub(crate) defaults: ApiConfig,
}

impl<'a> Context<'a> {
    pub(crate) fn new(settings: &'a mut dyn SettingsStore, api: &'a dyn LedgerApi) -> Self {
        Self {
            settings,
            api,
            defaults: ApiConfig::compiled_defaults(),
        }
    }

    pub(crate) fn config(&self) -> Result<ApiConfig> {
        config::resolve(&*self.settings, &self.defaults)
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    /// Blocking message; the next key press dismisses it.
    pub(crate) alert: Option<String>,

    pub(crate) view: ViewState,
    pub(crate) refresh_pending: bool,
    pub(crate) endpoint: String,

    pub(crate) entry_index: usize,
    pub(crate) entry_scroll: usize,

    pub(crate) form: EntryForm,
    pub(crate) settings_form: SettingsForm,

    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
    pub(crate) frame_area: Rect,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            alert: None,

            view: ViewState::new(),
            refresh_pending: false,
            endpoint: String::new(),

            entry_index: 0,
            entry_scroll: 0,

            form: EntryForm::new(),
            settings_form: SettingsForm::default(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
            frame_area: Rect::new(0, 0, 80, 24),
        }
    }

    // ── Navigation ────────────────────────────────────────────

    pub(crate) fn navigate(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub(crate) fn next_screen(&mut self) {
        let screens = Screen::all();
        let idx = screens.iter().position(|s| *s == self.screen).unwrap_or(0);
        self.navigate(screens[(idx + 1) % screens.len()]);
    }

    pub(crate) fn prev_screen(&mut self) {
        let screens = Screen::all();
        let idx = screens.iter().position(|s| *s == self.screen).unwrap_or(0);
        let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
        self.navigate(screens[prev]);
    }

    pub(crate) fn move_down(&mut self) {
        let len = self.view.entries.len();
        let page = self.visible_rows.max(1);
        scroll_down(&mut self.entry_index, &mut self.entry_scroll, len, page);
    }

    pub(crate) fn move_up(&mut self) {
        scroll_up(&mut self.entry_index, &mut self.entry_scroll);
    }

    pub(crate) fn goto_top(&mut self) {
        scroll_to_top(&mut self.entry_index, &mut self.entry_scroll);
    }

    pub(crate) fn goto_bottom(&mut self) {
        let len = self.view.entries.len();
        let page = self.visible_rows.max(1);
        scroll_to_bottom(&mut self.entry_index, &mut self.entry_scroll, len, page);
    }

    fn clamp_cursor(&mut self) {
        let len = self.view.entries.len();
        if self.entry_index >= len {
            self.entry_index = len.saturating_sub(1);
        }
        if self.entry_scroll > self.entry_index {
            self.entry_scroll = self.entry_index;
        }
    }

    pub(crate) fn selected_entry(&self) -> Option<&LedgerEntry> {
        self.view.entries.get(self.entry_index)
    }

    // ── Refresh ───────────────────────────────────────────────

    /// Mark the view as loading; the event loop fetches after the next frame.
    pub(crate) fn request_refresh(&mut self) {
        self.view.mark_loading();
        self.refresh_pending = true;
    }

    pub(crate) fn run_pending_refresh(&mut self, ctx: &mut Context) -> Result<()> {
        if self.refresh_pending {
            self.refresh(ctx)?;
        }
        Ok(())
    }

    /// Full re-fetch. Remote failures land in the view state, not in the result.
    pub(crate) fn refresh(&mut self, ctx: &mut Context) -> Result<()> {
        self.refresh_pending = false;
        let config = ctx.config()?;
        self.endpoint = config.endpoint.clone();
        self.view.mark_loading();

        info!(endpoint = %config.endpoint, "fetching entries");
        match ctx.api.list(&config) {
            Ok(entries) => {
                info!(count = entries.len(), "entries loaded");
                self.view.replace(entries);
                self.clamp_cursor();
            }
            Err(ClientError::Auth) => {
                warn!(endpoint = %config.endpoint, "credential rejected");
                self.view.fail(ClientError::Auth.to_string());
                self.clamp_cursor();
                self.raise_alert(ClientError::Auth.to_string());
                self.form.close();
                self.settings_form.open(&config);
            }
            Err(err) => {
                error!(error = %err, "failed to fetch entries");
                self.view.fail(err.to_string());
                self.clamp_cursor();
            }
        }
        Ok(())
    }

    // ── Entry form ────────────────────────────────────────────

    pub(crate) fn open_create_form(&mut self, today: NaiveDate) {
        self.form.open_for_create(today);
    }

    pub(crate) fn open_create_form_today(&mut self) {
        self.open_create_form(Local::now().date_naive());
    }

    pub(crate) fn open_edit_form(&mut self, id: i64) -> bool {
        self.form.open_for_edit(id, &self.view)
    }

    pub(crate) fn edit_selected(&mut self) {
        match self.selected_entry().and_then(|e| e.id) {
            Some(id) => {
                self.open_edit_form(id);
            }
            None => self.set_status("No entry selected"),
        }
    }

    /// Send the form to the service: create without a tracked id, update with one.
    pub(crate) fn submit_form(&mut self, ctx: &mut Context) -> Result<()> {
        let submission = match self.form.submission() {
            Ok(submission) => submission,
            Err(err) => {
                self.form.error = Some(err.to_string());
                self.raise_alert(format!("Error: {err}"));
                return Ok(());
            }
        };

        let config = ctx.config()?;
        let result = match &submission {
            Submission::Create(entry) => {
                info!(name = %entry.name, "creating entry");
                ctx.api
                    .create(&config, entry)
                    .map(|created| format!("Added: {}", created.name))
            }
            Submission::Update(id, entry) => {
                info!(id, name = %entry.name, "updating entry");
                ctx.api
                    .update(&config, *id, entry)
                    .map(|updated| format!("Updated: {}", updated.name))
            }
        };

        match result {
            Ok(message) => {
                self.form.close();
                self.set_status(message);
                self.request_refresh();
            }
            Err(err) => {
                warn!(error = %err, "entry submission failed");
                self.form.error = Some(err.to_string());
                self.raise_alert(format!("Error: {err}"));
            }
        }
        Ok(())
    }

    /// Left click at a terminal cell. Clicking outside the entry modal closes it.
    /// An open alert swallows the click and is dismissed by it.
    pub(crate) fn click(&mut self, column: u16, row: u16) {
        if self.alert.is_some() {
            self.dismiss_alert();
            return;
        }
        if self.show_help || self.settings_form.open || !self.form.is_open() {
            return;
        }
        let modal = centered_rect(self.frame_area, ENTRY_FORM_WIDTH, ENTRY_FORM_HEIGHT);
        if !modal.contains(Position::new(column, row)) {
            self.form.close();
        }
    }

    // ── Delete ────────────────────────────────────────────────

    pub(crate) fn confirm_delete_selected(&mut self) {
        let Some(entry) = self.selected_entry() else {
            self.set_status("No entry selected");
            return;
        };
        let Some(id) = entry.id else {
            return;
        };
        let name = entry.name.clone();
        self.confirm_message = format!("Delete '{name}'?");
        self.pending_action = Some(PendingAction::DeleteEntry { id, name });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn execute_pending(&mut self, ctx: &mut Context) -> Result<()> {
        if let Some(action) = self.pending_action.take() {
            match action {
                PendingAction::DeleteEntry { id, name } => self.delete_entry(id, &name, ctx)?,
            }
        }
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        Ok(())
    }

    pub(crate) fn cancel_pending(&mut self) {
        self.pending_action = None;
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        self.set_status("Cancelled");
    }

    pub(crate) fn delete_entry(&mut self, id: i64, name: &str, ctx: &mut Context) -> Result<()> {
        let config = ctx.config()?;
        info!(id, "deleting entry");
        match ctx.api.delete(&config, id) {
            Ok(()) => {
                self.set_status(format!("Deleted: {name}"));
                self.request_refresh();
            }
            Err(err) => {
                warn!(id, error = %err, "delete failed");
                match err {
                    ClientError::Validation(message) => self.raise_alert(message),
                    other => self.raise_alert(format!("Failed to delete: {other}")),
                }
            }
        }
        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn open_settings(&mut self, ctx: &Context) -> Result<()> {
        let current = ctx.config()?;
        self.settings_form.open(&current);
        Ok(())
    }

    pub(crate) fn save_settings(&mut self, ctx: &mut Context) -> Result<()> {
        config::save(&mut *ctx.settings, &self.settings_form.to_config())?;
        self.settings_form.close();
        self.set_status("Settings saved");
        self.request_refresh();
        Ok(())
    }

    // ── Messages ──────────────────────────────────────────────

    pub(crate) fn raise_alert(&mut self, msg: impl Into<String>) {
        self.alert = Some(msg.into());
    }

    pub(crate) fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
