use anyhow::Result;

use cidian_lib::vocab::SortOrder;

use crate::app::App;
use crate::render::terminal;
use crate::{FilterArgs, OutputFormat};

pub fn run(app: &App, filters: FilterArgs, sort: SortOrder, format: &OutputFormat, use_color: bool) -> Result<()> {
    let filters = App::filters(filters.query, filters.pos, filters.chapter);
    let cards = app.store.list(&filters, sort);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards found.");
                return Ok(());
            }

            for line in terminal::render_card_table(&cards, app.store.now(), use_color) {
                println!("{}", line);
            }
            println!("\n{} of {} cards", cards.len(), app.store.len());
        }
    }

    Ok(())
}
