use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

use crate::client::LedgerApi;
use crate::db::Database;
use crate::ui::app::{App, Context, InputMode, Screen};
use crate::ui::commands;
use crate::ui::form::EntryField;

pub(crate) fn as_tui(db: &mut Database, api: &dyn LedgerApi) -> Result<()> {
    let mut ctx = Context::new(db, api);
    let mut app = App::new();
    app.request_refresh();
    info!("starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &mut ctx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "TUI exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &mut Context,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, then table borders and header; rows are two lines
            let content_height = f.area().height.saturating_sub(6) / 2;
            app.visible_rows = (content_height as usize).max(1);
            app.frame_area = f.area();
            crate::ui::render::render(f, app);
        })?;

        // The frame above shows "Loading" while the blocking fetch runs.
        if app.refresh_pending {
            app.run_pending_refresh(ctx)?;
            continue;
        }

        match event::read()? {
            Event::Key(key) => handle_key(key, app, ctx)?,
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    app.click(mouse.column, mouse.row);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn handle_key(key: KeyEvent, app: &mut App, ctx: &mut Context) -> Result<()> {
    if app.alert.is_some() {
        app.dismiss_alert();
        return Ok(());
    }
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    if app.settings_form.open {
        return handle_settings_input(key, app, ctx);
    }
    if app.form.is_open() {
        return handle_form_input(key, app, ctx);
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, ctx),
        InputMode::Command => handle_command_input(key, app, ctx),
        InputMode::Confirm => handle_confirm_input(key, app, ctx),
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, ctx: &mut Context) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                app.move_down();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                app.move_up();
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') => app.goto_top(),
        KeyCode::Char('G') => app.goto_bottom(),
        KeyCode::Char('1') => app.navigate(Screen::Dashboard),
        KeyCode::Char('2') => app.navigate(Screen::Transactions),
        KeyCode::Tab => app.next_screen(),
        KeyCode::BackTab => app.prev_screen(),
        KeyCode::Char('a') => app.open_create_form_today(),
        KeyCode::Char('e') | KeyCode::Enter if app.screen == Screen::Transactions => {
            app.edit_selected();
        }
        KeyCode::Char('D') if app.screen == Screen::Transactions => {
            app.confirm_delete_selected();
        }
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('s') => app.open_settings(ctx)?,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, ctx: &mut Context) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, ctx)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, ctx: &mut Context) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.execute_pending(ctx)?,
        // Any other key cancels
        _ => app.cancel_pending(),
    }
    Ok(())
}

fn handle_form_input(key: KeyEvent, app: &mut App, ctx: &mut Context) -> Result<()> {
    let on_kind = app.form.focused() == EntryField::Kind;
    match key.code {
        KeyCode::Esc => app.form.close(),
        KeyCode::Enter => app.submit_form(ctx)?,
        KeyCode::Tab | KeyCode::Down => app.form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form.prev_field(),
        KeyCode::Left | KeyCode::Right if on_kind => app.form.toggle_kind(),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => app.form.input_char(c),
        _ => {}
    }
    Ok(())
}

fn handle_settings_input(key: KeyEvent, app: &mut App, ctx: &mut Context) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.settings_form.close(),
        KeyCode::Enter => app.save_settings(ctx)?,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.settings_form.toggle_focus();
        }
        KeyCode::Backspace => app.settings_form.backspace(),
        KeyCode::Char(c) => app.settings_form.input_char(c),
        _ => {}
    }
    Ok(())
}
