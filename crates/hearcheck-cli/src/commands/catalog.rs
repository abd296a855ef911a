//! The `hearcheck catalog` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use hearcheck_core::catalog::load_catalog;
use hearcheck_players::config::load_config_from;

pub fn execute(catalog_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let catalog = match catalog_path {
        Some(path) => load_catalog(&path)?,
        None => load_config_from(config_path.as_deref())?.load_catalog()?,
    };

    let mut table = Table::new();
    table.set_header(vec!["#", "Frequency", "Heard by ages"]);
    for (i, tone) in catalog.tones().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{} Hz", tone.frequency_hz)),
            Cell::new(&tone.age_label),
        ]);
    }

    println!("{table}");
    println!("{} tone(s)", catalog.len());
    Ok(())
}
