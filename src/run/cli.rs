use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::client::{ClientError, LedgerApi};
use crate::config::{self, ApiConfig, KEY_API_BASE_URL, KEY_API_KEY};
use crate::db::Database;
use crate::ledger::{aggregate, sort_newest_first};
use crate::models::{Amount, NewEntry};
use crate::ui::form::DATE_FORMAT;
use crate::ui::util::{format_amount, format_signed, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database, api: &dyn LedgerApi) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(db, api),
        "summary" | "s" => cli_summary(db, api),
        "add" => cli_add(&args[2..], db, api),
        "delete" | "rm" => cli_delete(&args[2..], db, api),
        "config" => cli_config(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("ledgerui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("LedgerUI: terminal client for a remote income/expense ledger");
    println!();
    println!("Usage: ledgerui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                               Launch interactive TUI");
    println!("  list                                 List entries, newest first");
    println!("  summary                              Print income, expense and balance");
    println!("  add <YYYY-MM-DD> <name> <amount> [category]");
    println!("                                       Add an entry (negative amount = expense)");
    println!("  delete <id>                          Delete an entry");
    println!("  config                               Show the effective API settings");
    println!("    --url <URL>                        Store an API base URL override");
    println!("    --key <KEY>                        Store an API key override");
    println!("    --reset                            Clear stored overrides");
    println!("  --help, -h                           Show this help");
    println!("  --version, -V                        Show version");
}

fn effective_config(db: &Database) -> Result<ApiConfig> {
    config::resolve(db, &ApiConfig::compiled_defaults())
}

/// Turn a client failure into a CLI error, with a hint for a rejected credential.
fn remote_error(err: ClientError) -> anyhow::Error {
    if err.is_auth() {
        anyhow::anyhow!("{err}\nhint: run `ledgerui config --key <KEY>`")
    } else {
        anyhow::Error::new(err)
    }
}

fn cli_list(db: &Database, api: &dyn LedgerApi) -> Result<()> {
    let config = effective_config(db)?;
    let mut entries = api.list(&config).map_err(remote_error)?;
    if entries.is_empty() {
        println!("No entries");
        return Ok(());
    }
    sort_newest_first(&mut entries);

    println!(
        "{:<6} {:<10}  {:<24} {:<16} {:>12}",
        "ID", "Date", "Name", "Category", "Amount"
    );
    println!("{}", "─".repeat(72));
    for entry in &entries {
        println!(
            "{:<6} {:<10}  {:<24} {:<16} {:>12}",
            entry.id.map(|id| id.to_string()).unwrap_or_default(),
            entry.date.format(DATE_FORMAT),
            truncate(&entry.name, 24),
            truncate(&entry.category, 16),
            format_signed(entry.amount.magnitude(), entry.is_income()),
        );
    }
    Ok(())
}

fn cli_summary(db: &Database, api: &dyn LedgerApi) -> Result<()> {
    let config = effective_config(db)?;
    let entries = api.list(&config).map_err(remote_error)?;
    let summary = aggregate(&entries);

    println!("LedgerUI: {}", config.endpoint);
    println!("{}", "─".repeat(40));
    println!(
        "  Income:     {} ({} entries)",
        format_amount(summary.income),
        summary.income_count
    );
    println!(
        "  Expense:    {} ({} entries)",
        format_amount(summary.expense),
        summary.expense_count
    );
    println!("  Balance:    {}", format_amount(summary.balance));
    println!("  Entries:    {}", entries.len());

    if !summary.expense_by_category.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &summary.expense_by_category {
            println!("  {name:<24} {}", format_amount(*amount));
        }
    }
    Ok(())
}

fn cli_add(args: &[String], db: &Database, api: &dyn LedgerApi) -> Result<()> {
    let [date, name, amount, rest @ ..] = args else {
        anyhow::bail!("Usage: ledgerui add <YYYY-MM-DD> <name> <amount> [category]");
    };
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| anyhow::anyhow!("Invalid date: '{date}' (expected YYYY-MM-DD)"))?;
    let signed = Decimal::from_str(amount)
        .map_err(|_| anyhow::anyhow!("Invalid amount: '{amount}'"))?;

    let entry = NewEntry {
        name: name.clone(),
        description: String::new(),
        amount: Amount::from_signed(signed),
        date,
        category: rest.first().cloned().unwrap_or_default(),
    };

    let config = effective_config(db)?;
    let created = api.create(&config, &entry).map_err(remote_error)?;
    match created.id {
        Some(id) => println!("Added: {} (id {id})", created.name),
        None => println!("Added: {}", created.name),
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &Database, api: &dyn LedgerApi) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: ledgerui delete <id>");
    };
    let id: i64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid id: '{raw}'"))?;

    let config = effective_config(db)?;
    api.delete(&config, id).map_err(remote_error)?;
    println!("Deleted entry {id}");
    Ok(())
}

fn cli_config(args: &[String], db: &mut Database) -> Result<()> {
    if args.iter().any(|a| a == "--reset") {
        db.clear_setting(KEY_API_BASE_URL)?;
        db.clear_setting(KEY_API_KEY)?;
        println!("Cleared stored API settings");
    }

    let flag = |name: &str| {
        args.windows(2)
            .find(|w| w[0] == name)
            .map(|w| w[1].as_str())
    };
    if let Some(url) = flag("--url") {
        db.set_setting(KEY_API_BASE_URL, &config::normalize_endpoint(url))?;
    }
    if let Some(key) = flag("--key") {
        db.set_setting(KEY_API_KEY, key.trim())?;
    }

    let effective = effective_config(db)?;
    println!("API URL: {}", effective.endpoint);
    if effective.credential.is_empty() {
        println!("API key: (not set)");
    } else {
        println!("API key: {}", effective.masked_credential());
    }
    Ok(())
}
