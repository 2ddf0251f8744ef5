use anyhow::{bail, Context, Result};

use crate::app::{short_id, App};
use crate::OutputFormat;

pub fn run_rm(app: &mut App, id: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(id)?;
    app.store.delete(&card.id).context("Failed to delete card")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": card.id }));
        }
        OutputFormat::Plain => {
            println!("Deleted {} ({}) [{}]", card.hanzi, card.meaning, short_id(&card.id));
        }
    }
    Ok(())
}

pub fn run_clear(app: &mut App, yes: bool, format: &OutputFormat) -> Result<()> {
    if !yes {
        bail!(
            "Refusing to delete all {} cards without --yes. Consider `cidian export json` first.",
            app.store.len()
        );
    }

    let count = app.store.clear().context("Failed to clear cards")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "deleted": count })),
        OutputFormat::Plain => println!("Deleted {} cards", count),
    }
    Ok(())
}

pub fn run_due_today(app: &mut App, id: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(id)?;
    let card = app.store
        .reset_due(&card.id)
        .context("Failed to update card")?
        .context("Card disappeared while updating")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("{} is due now", card.hanzi),
    }
    Ok(())
}
