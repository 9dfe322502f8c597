#![allow(clippy::unwrap_used)]

use std::cell::RefCell;

use chrono::NaiveDate;
use ratatui::layout::Rect;
use rust_decimal_macros::dec;

use super::app::*;
use super::commands::handle_command;
use super::form::FormState;
use crate::client::{ClientError, LedgerApi};
use crate::config::{self, ApiConfig};
use crate::db::Database;
use crate::ledger::LoadState;
use crate::models::{Amount, LedgerEntry, NewEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List(String),
    Create(NewEntry),
    Update(i64, NewEntry),
    Delete(i64),
}

struct FakeApi {
    entries: Vec<LedgerEntry>,
    list_error: Option<ClientError>,
    write_error: Option<ClientError>,
    calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    fn with_entries(entries: Vec<LedgerEntry>) -> Self {
        Self {
            entries,
            list_error: None,
            write_error: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl LedgerApi for FakeApi {
    fn list(&self, config: &ApiConfig) -> Result<Vec<LedgerEntry>, ClientError> {
        self.calls
            .borrow_mut()
            .push(Call::List(config.endpoint.clone()));
        match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.entries.clone()),
        }
    }

    fn create(&self, _config: &ApiConfig, entry: &NewEntry) -> Result<LedgerEntry, ClientError> {
        self.calls.borrow_mut().push(Call::Create(entry.clone()));
        match &self.write_error {
            Some(err) => Err(err.clone()),
            None => Ok(LedgerEntry::from_new(100, entry.clone())),
        }
    }

    fn update(
        &self,
        _config: &ApiConfig,
        id: i64,
        entry: &NewEntry,
    ) -> Result<LedgerEntry, ClientError> {
        self.calls.borrow_mut().push(Call::Update(id, entry.clone()));
        match &self.write_error {
            Some(err) => Err(err.clone()),
            None => Ok(LedgerEntry::from_new(id, entry.clone())),
        }
    }

    fn delete(&self, _config: &ApiConfig, id: i64) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(Call::Delete(id));
        match &self.write_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(id: i64, name: &str, amount: Amount, on: NaiveDate) -> LedgerEntry {
    LedgerEntry {
        id: Some(id),
        name: name.into(),
        description: String::new(),
        amount,
        date: on,
        category: "General".into(),
    }
}

fn sample_entries() -> Vec<LedgerEntry> {
    vec![
        entry(1, "Coffee", Amount::Expense(dec!(4.50)), date(2024, 5, 1)),
        entry(2, "Salary", Amount::Income(dec!(3000)), date(2024, 5, 31)),
        entry(3, "Books", Amount::Expense(dec!(30)), date(2024, 5, 15)),
    ]
}

fn context<'a>(db: &'a mut Database, api: &'a FakeApi) -> Context<'a> {
    let mut ctx = Context::new(db, api);
    ctx.defaults = ApiConfig::new("http://default", "");
    ctx
}

fn loaded_app(ctx: &mut Context) -> App {
    let mut app = App::new();
    app.refresh(ctx).unwrap();
    app
}

// ── Refresh ───────────────────────────────────────────────────

#[test]
fn test_refresh_loads_newest_first_and_aggregates() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(sample_entries());
    let mut ctx = context(&mut db, &api);
    let app = loaded_app(&mut ctx);

    assert_eq!(app.view.load, LoadState::Loaded);
    let names: Vec<&str> = app.view.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Salary", "Books", "Coffee"]);
    assert_eq!(app.view.summary.balance, dec!(2965.50));
    assert_eq!(app.endpoint, "http://default");
    assert_eq!(api.calls(), vec![Call::List("http://default".into())]);
}

#[test]
fn test_refresh_uses_stored_endpoint_override() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_api_settings("http://override", "key").unwrap();
    let api = FakeApi::with_entries(Vec::new());
    let mut ctx = context(&mut db, &api);
    let app = loaded_app(&mut ctx);

    assert_eq!(app.endpoint, "http://override");
    assert_eq!(api.calls(), vec![Call::List("http://override".into())]);
}

#[test]
fn test_refresh_network_failure_marks_failed() {
    let mut db = Database::open_in_memory().unwrap();
    let mut api = FakeApi::with_entries(sample_entries());
    api.list_error = Some(ClientError::Network("connection refused".into()));
    let mut ctx = context(&mut db, &api);
    let app = loaded_app(&mut ctx);

    assert!(app.view.is_failed());
    assert!(app.view.entries.is_empty());
    assert!(app.alert.is_none());
    assert!(!app.settings_form.open);
}

#[test]
fn test_refresh_auth_failure_opens_settings() {
    let mut db = Database::open_in_memory().unwrap();
    let mut api = FakeApi::with_entries(sample_entries());
    api.list_error = Some(ClientError::Auth);
    let mut ctx = context(&mut db, &api);

    let mut app = App::new();
    app.open_create_form(date(2024, 6, 1));
    app.refresh(&mut ctx).unwrap();

    assert!(app.view.is_failed());
    assert!(app.settings_form.open);
    assert_eq!(app.settings_form.endpoint, "http://default");
    assert!(!app.form.is_open());
    assert_eq!(app.alert.as_deref(), Some(ClientError::Auth.to_string().as_str()));
}

#[test]
fn test_request_refresh_defers_fetch() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(sample_entries());
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    app.request_refresh();
    assert!(app.refresh_pending);
    assert_eq!(app.view.load, LoadState::Loading);
    assert_eq!(api.calls().len(), 1);

    app.run_pending_refresh(&mut ctx).unwrap();
    assert!(!app.refresh_pending);
    assert_eq!(app.view.load, LoadState::Loaded);
    assert_eq!(api.calls().len(), 2);

    app.run_pending_refresh(&mut ctx).unwrap();
    assert_eq!(api.calls().len(), 2);
}

#[test]
fn test_refresh_clamps_cursor_when_list_shrinks() {
    let mut db = Database::open_in_memory().unwrap();
    let mut api = FakeApi::with_entries(sample_entries());
    let mut app = {
        let mut ctx = context(&mut db, &api);
        loaded_app(&mut ctx)
    };
    app.goto_bottom();
    assert_eq!(app.entry_index, 2);

    api.entries.truncate(1);
    let mut ctx = context(&mut db, &api);
    app.refresh(&mut ctx).unwrap();
    assert_eq!(app.entry_index, 0);
}

// ── Submit ────────────────────────────────────────────────────

#[test]
fn test_submit_create_dispatches_create() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(Vec::new());
    let mut ctx = context(&mut db, &api);
    let mut app = App::new();

    app.open_create_form(date(2024, 6, 1));
    app.form.name = "Lunch".into();
    app.form.amount = "25".into();
    app.submit_form(&mut ctx).unwrap();

    let calls = api.calls();
    let Call::Create(sent) = &calls[0] else {
        panic!("expected create, got {calls:?}");
    };
    assert_eq!(sent.amount.to_signed(), dec!(-25));
    assert!(!app.form.is_open());
    assert!(app.refresh_pending);
    assert_eq!(app.view.load, LoadState::Loading);
    assert_eq!(app.status_message, "Added: Lunch");
}

#[test]
fn test_submit_edit_dispatches_update_with_id() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(sample_entries());
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    assert!(app.open_edit_form(3));
    app.form.name = "Textbooks".into();
    app.submit_form(&mut ctx).unwrap();

    let calls = api.calls();
    let Call::Update(id, sent) = &calls[1] else {
        panic!("expected update, got {calls:?}");
    };
    assert_eq!(*id, 3);
    assert_eq!(sent.name, "Textbooks");
    assert_eq!(sent.amount, Amount::Expense(dec!(30)));
    assert_eq!(app.status_message, "Updated: Textbooks");
}

#[test]
fn test_submit_failure_keeps_form_open() {
    let mut db = Database::open_in_memory().unwrap();
    let mut api = FakeApi::with_entries(Vec::new());
    api.write_error = Some(ClientError::Validation("name: field required".into()));
    let mut ctx = context(&mut db, &api);
    let mut app = App::new();

    app.open_create_form(date(2024, 6, 1));
    app.form.amount = "10".into();
    app.submit_form(&mut ctx).unwrap();

    assert_eq!(app.form.state, FormState::Create);
    assert_eq!(app.form.error.as_deref(), Some("name: field required"));
    assert_eq!(app.alert.as_deref(), Some("Error: name: field required"));
    assert!(!app.refresh_pending);
}

#[test]
fn test_submit_unparseable_amount_sends_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(Vec::new());
    let mut ctx = context(&mut db, &api);
    let mut app = App::new();

    app.open_create_form(date(2024, 6, 1));
    app.form.amount = "ten".into();
    app.submit_form(&mut ctx).unwrap();

    assert!(api.calls().is_empty());
    assert!(app.form.is_open());
    assert!(app.alert.is_some());
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete_confirm_flow() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(sample_entries());
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    app.move_down();
    app.confirm_delete_selected();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete 'Books'?");

    app.execute_pending(&mut ctx).unwrap();
    assert_eq!(api.calls()[1], Call::Delete(3));
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Deleted: Books");
    assert!(app.refresh_pending);
}

#[test]
fn test_delete_cancel_sends_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(sample_entries());
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    app.confirm_delete_selected();
    app.cancel_pending();
    assert!(app.pending_action.is_none());
    assert_eq!(api.calls().len(), 1);
}

#[test]
fn test_delete_failure_raises_alert() {
    let mut db = Database::open_in_memory().unwrap();
    let mut api = FakeApi::with_entries(sample_entries());
    api.write_error = Some(ClientError::Network("HTTP 500".into()));
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    app.delete_entry(1, "Coffee", &mut ctx).unwrap();
    assert_eq!(
        app.alert.as_deref(),
        Some("Failed to delete: Network error: HTTP 500")
    );
    assert!(!app.refresh_pending);
}

#[test]
fn test_delete_rejection_shows_service_message_once() {
    let mut db = Database::open_in_memory().unwrap();
    let mut api = FakeApi::with_entries(sample_entries());
    api.write_error = Some(crate::client::classify_status(
        crate::client::Operation::Delete,
        404,
        "{}",
    ));
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    app.delete_entry(1, "Coffee", &mut ctx).unwrap();
    assert_eq!(app.alert.as_deref(), Some("Failed to delete"));
}

#[test]
fn test_delete_with_empty_view_sets_status() {
    let mut app = App::new();
    app.confirm_delete_selected();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "No entry selected");
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_save_settings_persists_and_refreshes() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(Vec::new());
    {
        let mut ctx = context(&mut db, &api);
        let mut app = App::new();
        app.open_settings(&ctx).unwrap();
        app.settings_form.endpoint = "http://new-host:9000/ ".into();
        app.settings_form.credential = "secret".into();
        app.save_settings(&mut ctx).unwrap();

        assert!(!app.settings_form.open);
        assert!(app.refresh_pending);
        assert_eq!(app.status_message, "Settings saved");
    }

    let resolved = config::resolve(&db, &ApiConfig::new("http://default", "")).unwrap();
    assert_eq!(resolved, ApiConfig::new("http://new-host:9000", "secret"));
}

// ── Mouse ─────────────────────────────────────────────────────

#[test]
fn test_click_outside_modal_closes_form() {
    let mut app = App::new();
    app.frame_area = Rect::new(0, 0, 100, 40);
    app.open_create_form(date(2024, 6, 1));

    // Modal spans columns 20..80 and rows 14..26.
    app.click(50, 20);
    assert!(app.form.is_open());

    app.click(5, 5);
    assert!(!app.form.is_open());
}

#[test]
fn test_click_during_alert_dismisses_alert_and_keeps_form() {
    let mut db = Database::open_in_memory().unwrap();
    let mut api = FakeApi::with_entries(Vec::new());
    api.write_error = Some(ClientError::Validation("name: field required".into()));
    let mut ctx = context(&mut db, &api);
    let mut app = App::new();
    app.frame_area = Rect::new(0, 0, 100, 40);

    app.open_create_form(date(2024, 6, 1));
    app.form.amount = "10".into();
    app.submit_form(&mut ctx).unwrap();
    assert!(app.alert.is_some());

    app.click(0, 0);
    assert!(app.alert.is_none());
    assert_eq!(app.form.state, FormState::Create);
    assert_eq!(app.form.error.as_deref(), Some("name: field required"));

    app.click(0, 0);
    assert!(!app.form.is_open());
}

#[test]
fn test_click_ignored_while_settings_open() {
    let mut app = App::new();
    app.frame_area = Rect::new(0, 0, 100, 40);
    app.open_create_form(date(2024, 6, 1));
    app.settings_form.open(&ApiConfig::new("http://a", ""));

    app.click(0, 0);
    assert!(app.form.is_open());
}

// ── Navigation ────────────────────────────────────────────────

#[test]
fn test_screen_cycle() {
    let mut app = App::new();
    app.next_screen();
    assert_eq!(app.screen, Screen::Transactions);
    app.next_screen();
    assert_eq!(app.screen, Screen::Dashboard);
    app.prev_screen();
    assert_eq!(app.screen, Screen::Transactions);
}

#[test]
fn test_cursor_bounds() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(sample_entries());
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    app.move_up();
    assert_eq!(app.entry_index, 0);
    app.goto_bottom();
    app.move_down();
    assert_eq!(app.entry_index, 2);
    assert_eq!(app.selected_entry().unwrap().name, "Coffee");
    app.goto_top();
    assert_eq!(app.entry_index, 0);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn test_unknown_command_suggests_closest() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(Vec::new());
    let mut ctx = context(&mut db, &api);
    let mut app = App::new();

    handle_command("refrsh", &mut app, &mut ctx).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :refrsh. Did you mean :refresh?"
    );
}

#[test]
fn test_edit_command_by_id() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(sample_entries());
    let mut ctx = context(&mut db, &api);
    let mut app = loaded_app(&mut ctx);

    handle_command("edit 42", &mut app, &mut ctx).unwrap();
    assert!(!app.form.is_open());
    assert_eq!(app.status_message, "No entry with id 42");

    handle_command("edit 1", &mut app, &mut ctx).unwrap();
    assert_eq!(app.form.state, FormState::Edit(1));
    assert_eq!(app.form.name, "Coffee");
}

#[test]
fn test_quit_and_navigation_commands() {
    let mut db = Database::open_in_memory().unwrap();
    let api = FakeApi::with_entries(Vec::new());
    let mut ctx = context(&mut db, &api);
    let mut app = App::new();

    handle_command("t", &mut app, &mut ctx).unwrap();
    assert_eq!(app.screen, Screen::Transactions);
    handle_command("settings", &mut app, &mut ctx).unwrap();
    assert!(app.settings_form.open);
    handle_command("q", &mut app, &mut ctx).unwrap();
    assert!(!app.running);
}
