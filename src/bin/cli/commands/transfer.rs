use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use cidian_lib::interchange::{self, Format};

use crate::app::App;
use crate::OutputFormat;

pub fn run_export(app: &App, format: Format, output: Option<&Path>) -> Result<()> {
    let content = interchange::export_cards(app.store.cards(), format, app.store.now())
        .context("Failed to export cards")?;

    match output {
        Some(path) => {
            fs::write(path, &content).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported {} cards to {}", app.store.len(), path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

pub fn run_import(app: &mut App, file: &Path, format: &OutputFormat) -> Result<()> {
    let records = interchange::import_file(file, app.store.now())
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let read = records.len();

    let summary = app.store.merge_records(records).context("Failed to merge cards")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "read": read,
                "added": summary.added,
                "replaced": summary.replaced,
                "kept": summary.kept,
                "total": app.store.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Imported {} records: {} added, {} updated, {} unchanged ({} cards total)",
                read,
                summary.added,
                summary.replaced,
                summary.kept,
                app.store.len()
            );
        }
    }
    Ok(())
}
