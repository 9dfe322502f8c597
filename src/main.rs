mod client;
mod config;
mod db;
mod ledger;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    logging::init(&data_dir)?;

    let mut db = db::Database::open(&data_dir.join("ledgerui.db"))?;
    let api = client::HttpLedgerClient::new();

    match args.len() {
        1 => run::as_tui(&mut db, &api),
        2.. => run::as_cli(&args, &mut db, &api),
        _ => {
            eprintln!("Usage: ledgerui [command]");
            Ok(())
        }
    }
}

fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "ledgerui", "LedgerUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
