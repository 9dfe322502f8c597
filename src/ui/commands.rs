use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, Context, Screen};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Context) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit LedgerUI", cmd_quit, r);
    register_command!("quit", "Quit LedgerUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("a", "Add a new entry", cmd_add, r);
    register_command!("add", "Add a new entry", cmd_add, r);
    register_command!(
        "e",
        "Edit selected entry (or :edit <id>)",
        cmd_edit,
        r
    );
    register_command!(
        "edit",
        "Edit selected entry (or :edit <id>)",
        cmd_edit,
        r
    );
    register_command!("delete", "Delete selected entry", cmd_delete, r);
    register_command!("r", "Reload entries from the API", cmd_refresh, r);
    register_command!("refresh", "Reload entries from the API", cmd_refresh, r);
    register_command!("settings", "Edit API URL and key", cmd_settings, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, ctx: &mut Context) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, ctx)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    app.navigate(Screen::Dashboard);
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    app.navigate(Screen::Transactions);
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    app.open_create_form_today();
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    if args.is_empty() {
        app.edit_selected();
        return Ok(());
    }
    match args.parse::<i64>() {
        Ok(id) => {
            if !app.open_edit_form(id) {
                app.set_status(format!("No entry with id {id}"));
            }
        }
        Err(_) => app.set_status("Usage: :edit <id>"),
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    app.confirm_delete_selected();
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    app.request_refresh();
    Ok(())
}

fn cmd_settings(_args: &str, app: &mut App, ctx: &mut Context) -> anyhow::Result<()> {
    app.open_settings(ctx)
}

fn cmd_help(_args: &str, app: &mut App, _ctx: &mut Context) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}
