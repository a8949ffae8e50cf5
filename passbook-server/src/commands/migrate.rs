//! Migrate command - apply pending schema migrations

use std::path::Path;

use anyhow::{Context, Result};

use passbook_core::adapters::DuckDbStore;
use passbook_core::DB_FILENAME;

pub fn run(data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let store = DuckDbStore::new(&data_dir.join(DB_FILENAME))
        .context("Failed to open database")?;
    let result = store.run_migrations().context("Migration failed")?;

    for name in &result.applied {
        println!("applied {}", name);
    }
    println!(
        "{} applied, {} already applied",
        result.applied.len(),
        result.already_applied
    );

    Ok(())
}
